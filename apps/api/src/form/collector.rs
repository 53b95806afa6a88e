//! Form Collector: owns one in-progress `ResumeRecord` for the lifetime of an editing session.
//!
//! # Invariants
//! - Every repeated section keeps at least one row while editing; `remove_entry` on the last
//!   row is a no-op.
//! - Section toggles never touch entry contents, so toggling off and on again is lossless.
//! - A rejected image upload leaves the previous image in place.
//! - `begin_submit` validates and freezes a compacted snapshot; `finish_submit` returns to
//!   `Editing` whatever the outcome. The record is preserved either way.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::form::image::{ProfileImage, UploadError};
use crate::form::notify::Notification;
use crate::form::validation::{validate_required, ValidationError};
use crate::models::resume::{
    Achievement, Education, Experience, Language, Proficiency, Project, ResumeRecord, Template,
};

// ────────────────────────────────────────────────────────────────────────────
// Addressing types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScalarField {
    FullName,
    Email,
    Phone,
    Location,
    Summary,
    TechnicalSkills,
    SoftSkills,
    Hobbies,
    Template,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Experience,
    Education,
    Projects,
    Achievements,
    Languages,
}

impl SectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Experience => "experience",
            SectionKind::Education => "education",
            SectionKind::Projects => "projects",
            SectionKind::Achievements => "achievements",
            SectionKind::Languages => "languages",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionalSection {
    Projects,
    Achievements,
    Hobbies,
    Languages,
}

/// One Form Collector operation, as sent by the creation view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum FormCommand {
    UpdateScalar {
        field: ScalarField,
        value: String,
    },
    AddEntry {
        section: SectionKind,
    },
    RemoveEntry {
        section: SectionKind,
        index: usize,
    },
    UpdateEntry {
        section: SectionKind,
        index: usize,
        field: String,
        value: String,
    },
    ToggleSection {
        section: OptionalSection,
    },
    ClearProfileImage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormState {
    Editing,
    Submitting,
}

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error("No {} entry at index {index} (section has {len})", .section.as_str())]
    IndexOutOfRange {
        section: SectionKind,
        index: usize,
        len: usize,
    },

    #[error("Unknown field '{field}' for {}", .section.as_str())]
    UnknownField { section: SectionKind, field: String },

    #[error("Invalid value '{value}' for {field}")]
    InvalidValue { field: String, value: String },

    #[error("A submission is already in progress")]
    SubmitInProgress,
}

// ────────────────────────────────────────────────────────────────────────────
// Collector
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct FormCollector {
    record: ResumeRecord,
    state: FormState,
}

impl Default for FormCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl FormCollector {
    pub fn new() -> Self {
        Self {
            record: ResumeRecord::blank(),
            state: FormState::Editing,
        }
    }

    pub fn record(&self) -> &ResumeRecord {
        &self.record
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    /// Applies one wire command.
    pub fn apply(&mut self, command: FormCommand) -> Result<(), FormError> {
        debug!(?command, "Applying form command");
        match command {
            FormCommand::UpdateScalar { field, value } => self.update_scalar(field, value),
            FormCommand::AddEntry { section } => {
                self.add_entry(section);
                Ok(())
            }
            FormCommand::RemoveEntry { section, index } => {
                self.remove_entry(section, index).map(|_| ())
            }
            FormCommand::UpdateEntry {
                section,
                index,
                field,
                value,
            } => self.update_entry(section, index, &field, value),
            FormCommand::ToggleSection { section } => {
                self.toggle_section(section);
                Ok(())
            }
            FormCommand::ClearProfileImage => {
                self.clear_profile_image();
                Ok(())
            }
        }
    }

    pub fn update_scalar(&mut self, field: ScalarField, value: String) -> Result<(), FormError> {
        let record = &mut self.record;
        match field {
            ScalarField::FullName => record.full_name = value,
            ScalarField::Email => record.email = value,
            ScalarField::Phone => record.phone = value,
            ScalarField::Location => record.location = value,
            ScalarField::Summary => record.summary = value,
            ScalarField::TechnicalSkills => record.technical_skills = value,
            ScalarField::SoftSkills => record.soft_skills = value,
            ScalarField::Hobbies => record.hobbies = value,
            ScalarField::Template => {
                record.template =
                    Template::parse(&value).ok_or_else(|| FormError::InvalidValue {
                        field: "template".to_string(),
                        value,
                    })?;
            }
        }
        Ok(())
    }

    /// Appends a blank row to the section.
    pub fn add_entry(&mut self, section: SectionKind) {
        let record = &mut self.record;
        match section {
            SectionKind::Experience => record.experience.push(Experience::default()),
            SectionKind::Education => record.education.push(Education::default()),
            SectionKind::Projects => record.projects.push(Project::default()),
            SectionKind::Achievements => record.achievements.push(Achievement::default()),
            SectionKind::Languages => record.languages.push(Language::default()),
        }
    }

    /// Removes a row. Returns `Ok(false)` without removing when it is the section's last row.
    pub fn remove_entry(&mut self, section: SectionKind, index: usize) -> Result<bool, FormError> {
        let record = &mut self.record;
        match section {
            SectionKind::Experience => remove_at(&mut record.experience, section, index),
            SectionKind::Education => remove_at(&mut record.education, section, index),
            SectionKind::Projects => remove_at(&mut record.projects, section, index),
            SectionKind::Achievements => remove_at(&mut record.achievements, section, index),
            SectionKind::Languages => remove_at(&mut record.languages, section, index),
        }
    }

    pub fn update_entry(
        &mut self,
        section: SectionKind,
        index: usize,
        field: &str,
        value: String,
    ) -> Result<(), FormError> {
        let unknown = || FormError::UnknownField {
            section,
            field: field.to_string(),
        };
        let record = &mut self.record;

        match section {
            SectionKind::Experience => {
                let entry = entry_mut(&mut record.experience, section, index)?;
                match field {
                    "title" => entry.title = value,
                    "company" => entry.company = value,
                    "duration" => entry.duration = value,
                    "description" => entry.description = value,
                    _ => return Err(unknown()),
                }
            }
            SectionKind::Education => {
                let entry = entry_mut(&mut record.education, section, index)?;
                match field {
                    "degree" => entry.degree = value,
                    "institution" => entry.institution = value,
                    "year" => entry.year = value,
                    _ => return Err(unknown()),
                }
            }
            SectionKind::Projects => {
                let entry = entry_mut(&mut record.projects, section, index)?;
                match field {
                    "title" => entry.title = value,
                    "description" => entry.description = value,
                    "technologies" => entry.technologies = value,
                    _ => return Err(unknown()),
                }
            }
            SectionKind::Achievements => {
                let entry = entry_mut(&mut record.achievements, section, index)?;
                match field {
                    "title" => entry.title = value,
                    "description" => entry.description = value,
                    _ => return Err(unknown()),
                }
            }
            SectionKind::Languages => {
                let entry = entry_mut(&mut record.languages, section, index)?;
                match field {
                    "name" => entry.name = value,
                    "proficiency" => {
                        entry.proficiency = Proficiency::parse(&value).ok_or_else(|| {
                            FormError::InvalidValue {
                                field: "proficiency".to_string(),
                                value,
                            }
                        })?;
                    }
                    _ => return Err(unknown()),
                }
            }
        }
        Ok(())
    }

    pub fn toggle_section(&mut self, section: OptionalSection) {
        let toggles = &mut self.record.section_toggles;
        let flag = match section {
            OptionalSection::Projects => &mut toggles.projects,
            OptionalSection::Achievements => &mut toggles.achievements,
            OptionalSection::Hobbies => &mut toggles.hobbies,
            OptionalSection::Languages => &mut toggles.languages,
        };
        *flag = !*flag;
    }

    /// Stores an uploaded image. On rejection the current image is kept.
    pub fn set_profile_image(&mut self, bytes: &[u8]) -> Result<(), FormError> {
        match ProfileImage::from_upload(bytes) {
            Ok(image) => {
                self.record.profile_image = Some(image);
                Ok(())
            }
            Err(e) => {
                warn!("Profile image rejected: {e}");
                Err(FormError::Upload(e))
            }
        }
    }

    pub fn clear_profile_image(&mut self) {
        self.record.profile_image = None;
    }

    // ── submit ──────────────────────────────────────────────────────────────

    /// Validates and enters `Submitting`. Returns the frozen snapshot for the handler.
    pub fn begin_submit(&mut self) -> Result<ResumeRecord, FormError> {
        if self.state == FormState::Submitting {
            return Err(FormError::SubmitInProgress);
        }
        validate_required(&self.record)?;
        self.state = FormState::Submitting;
        Ok(self.record.compacted())
    }

    /// Returns to `Editing` and builds the notification for the handler's outcome.
    pub fn finish_submit<T, E: Display>(&mut self, outcome: &Result<T, E>) -> Notification {
        self.state = FormState::Editing;
        match outcome {
            Ok(_) => {
                info!("Resume submitted for {}", self.record.full_name);
                Notification::resume_saved()
            }
            Err(e) => {
                warn!("Resume submission failed: {e}");
                Notification::error("Error", e.to_string())
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Internal helpers
// ────────────────────────────────────────────────────────────────────────────

fn remove_at<T>(entries: &mut Vec<T>, section: SectionKind, index: usize) -> Result<bool, FormError> {
    if index >= entries.len() {
        return Err(FormError::IndexOutOfRange {
            section,
            index,
            len: entries.len(),
        });
    }
    if entries.len() == 1 {
        return Ok(false);
    }
    entries.remove(index);
    Ok(true)
}

fn entry_mut<T>(entries: &mut [T], section: SectionKind, index: usize) -> Result<&mut T, FormError> {
    let len = entries.len();
    entries
        .get_mut(index)
        .ok_or(FormError::IndexOutOfRange {
            section,
            index,
            len,
        })
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
