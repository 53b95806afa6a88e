use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use uuid::Uuid;

use crate::form::drafts::DEFAULT_IDLE_TIMEOUT;
use crate::models::user::Identity;

/// Application configuration loaded from environment variables.
/// Every variable is optional; startup fails only on malformed values.
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL store when set; in-memory store otherwise.
    pub database_url: Option<String>,
    /// Exported PDFs are also saved here when set.
    pub export_dir: Option<PathBuf>,
    /// Write the `extras` column. `false` keeps the narrow schema and drops those fields.
    pub persist_full_record: bool,
    pub session_user: Option<Identity>,
    /// Open forms untouched for this long are discarded.
    pub draft_idle_timeout: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let session_user = match var("SESSION_USER_ID") {
            Some(id) => Some(Identity {
                id: Uuid::parse_str(id.trim())
                    .context("SESSION_USER_ID must be a valid UUID")?,
                email: var("SESSION_USER_EMAIL"),
            }),
            None => None,
        };

        Ok(Config {
            database_url: var("DATABASE_URL"),
            export_dir: var("EXPORT_DIR").map(PathBuf::from),
            persist_full_record: match var("PERSIST_FULL_RECORD") {
                Some(v) => parse_bool(&v).context("PERSIST_FULL_RECORD must be true or false")?,
                None => true,
            },
            session_user,
            draft_idle_timeout: match var("DRAFT_IDLE_MINUTES") {
                Some(v) => {
                    let minutes = v
                        .trim()
                        .parse::<u64>()
                        .context("DRAFT_IDLE_MINUTES must be a whole number of minutes")?;
                    if minutes == 0 {
                        bail!("DRAFT_IDLE_MINUTES must be at least 1");
                    }
                    Duration::from_secs(minutes * 60)
                }
                None => DEFAULT_IDLE_TIMEOUT,
            },
            port: var("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            export_dir: None,
            persist_full_record: true,
            session_user: None,
            draft_idle_timeout: DEFAULT_IDLE_TIMEOUT,
            port: 8080,
            rust_log: "info".to_string(),
        }
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => bail!("not a boolean: '{other}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
        assert!(config.persist_full_record);
        assert!(config.database_url.is_none());
        assert!(config.export_dir.is_none());
        assert!(config.session_user.is_none());
        assert_eq!(config.draft_idle_timeout, DEFAULT_IDLE_TIMEOUT);
    }

    #[test]
    fn test_draft_idle_minutes() {
        let cfg = config(&[("DRAFT_IDLE_MINUTES", "45")]).unwrap();
        assert_eq!(cfg.draft_idle_timeout, Duration::from_secs(45 * 60));
        assert!(config(&[("DRAFT_IDLE_MINUTES", "0")]).is_err());
        assert!(config(&[("DRAFT_IDLE_MINUTES", "soon")]).is_err());
    }

    #[test]
    fn test_session_user_and_flags() {
        let id = Uuid::new_v4().to_string();
        let config = config(&[
            ("SESSION_USER_ID", id.as_str()),
            ("SESSION_USER_EMAIL", "jane@x.com"),
            ("PERSIST_FULL_RECORD", "false"),
            ("EXPORT_DIR", "/tmp/exports"),
            ("PORT", "3000"),
        ])
        .unwrap();
        let user = config.session_user.unwrap();
        assert_eq!(user.id.to_string(), id);
        assert_eq!(user.email.as_deref(), Some("jane@x.com"));
        assert!(!config.persist_full_record);
        assert_eq!(config.export_dir, Some(PathBuf::from("/tmp/exports")));
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_malformed_values_fail() {
        assert!(config(&[("SESSION_USER_ID", "not-a-uuid")]).is_err());
        assert!(config(&[("PERSIST_FULL_RECORD", "maybe")]).is_err());
        assert!(config(&[("PORT", "99999")]).is_err());
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config = config(&[("DATABASE_URL", "  "), ("SESSION_USER_ID", "")]).unwrap();
        assert!(config.database_url.is_none());
        assert!(config.session_user.is_none());
    }
}
