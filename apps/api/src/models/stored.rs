use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::form::image::ProfileImage;
use crate::models::resume::{
    Achievement, Education, Experience, Language, Project, ResumeRecord, SectionToggles, Template,
};

/// One row of the `resumes` table.
///
/// The first columns mirror the narrow schema (`skills` holds the technical skills string).
/// `extras` widens it with everything else the in-memory record carries; it is `NULL` for
/// rows written with `PERSIST_FULL_RECORD=false` and for rows that predate the column.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub summary: Option<String>,
    pub experience: Value,
    pub education: Value,
    pub skills: Option<String>,
    pub template: String,
    pub extras: Option<Value>,
    pub created_at: DateTime<Utc>,
}

/// The fields the narrow schema drops.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecordExtras {
    pub soft_skills: String,
    pub projects: Vec<Project>,
    pub achievements: Vec<Achievement>,
    pub hobbies: String,
    pub languages: Vec<Language>,
    pub profile_image: Option<ProfileImage>,
    pub section_toggles: SectionToggles,
}

impl RecordExtras {
    pub fn from_record(record: &ResumeRecord) -> Self {
        Self {
            soft_skills: record.soft_skills.clone(),
            projects: record.projects.clone(),
            achievements: record.achievements.clone(),
            hobbies: record.hobbies.clone(),
            languages: record.languages.clone(),
            profile_image: record.profile_image.clone(),
            section_toggles: record.section_toggles,
        }
    }
}

/// A record as returned by the store: store-assigned identity plus the re-hydrated record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredResume {
    pub id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub record: ResumeRecord,
}

impl StoredResume {
    /// Re-hydrates a row. Malformed list columns read back as empty lists; an unknown
    /// template name falls back to the default layout.
    pub fn from_row(row: ResumeRow) -> Self {
        let experience: Vec<Experience> =
            serde_json::from_value(row.experience).unwrap_or_default();
        let education: Vec<Education> = serde_json::from_value(row.education).unwrap_or_default();
        let extras: RecordExtras = row
            .extras
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default();

        let record = ResumeRecord {
            full_name: row.full_name,
            email: row.email,
            phone: row.phone.unwrap_or_default(),
            location: row.location.unwrap_or_default(),
            summary: row.summary.unwrap_or_default(),
            experience,
            education,
            technical_skills: row.skills.unwrap_or_default(),
            soft_skills: extras.soft_skills,
            projects: extras.projects,
            achievements: extras.achievements,
            hobbies: extras.hobbies,
            languages: extras.languages,
            template: Template::parse(&row.template).unwrap_or_default(),
            profile_image: extras.profile_image,
            section_toggles: extras.section_toggles,
        };

        Self {
            id: row.id,
            user_id: row.user_id,
            created_at: row.created_at,
            record,
        }
    }
}

/// Builds the row for a new record. Identity and timestamp are supplied by the store.
pub fn to_row(
    record: &ResumeRecord,
    id: Uuid,
    user_id: Uuid,
    created_at: DateTime<Utc>,
    persist_full_record: bool,
) -> Result<ResumeRow, serde_json::Error> {
    let extras = if persist_full_record {
        Some(serde_json::to_value(RecordExtras::from_record(record))?)
    } else {
        None
    };

    Ok(ResumeRow {
        id,
        user_id,
        full_name: record.full_name.clone(),
        email: record.email.clone(),
        phone: Some(record.phone.clone()),
        location: Some(record.location.clone()),
        summary: Some(record.summary.clone()),
        experience: serde_json::to_value(&record.experience)?,
        education: serde_json::to_value(&record.education)?,
        skills: Some(record.technical_skills.clone()),
        template: record.template.as_str().to_string(),
        extras,
        created_at,
    })
}
