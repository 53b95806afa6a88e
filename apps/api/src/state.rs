use std::sync::Arc;

use crate::config::Config;
use crate::form::drafts::DraftRegistry;
use crate::session::SessionAdapter;
use crate::store::RecordStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// PostgreSQL or in-memory, chosen at startup from `DATABASE_URL`.
    pub store: Arc<dyn RecordStore>,
    pub session: Arc<dyn SessionAdapter>,
    /// Open editing sessions and their mounted previews.
    pub drafts: DraftRegistry,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn RecordStore>,
        session: Arc<dyn SessionAdapter>,
    ) -> Self {
        Self {
            drafts: DraftRegistry::with_idle_timeout(config.draft_idle_timeout),
            config,
            store,
            session,
        }
    }
}
