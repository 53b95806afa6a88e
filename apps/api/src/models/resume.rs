use serde::{Deserialize, Serialize};

use crate::form::image::ProfileImage;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Experience {
    pub title: String,
    pub company: String,
    pub duration: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    pub degree: String,
    pub institution: String,
    pub year: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub title: String,
    pub description: String,
    pub technologies: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Achievement {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Proficiency {
    Basic,
    #[default]
    Intermediate,
    Fluent,
    Native,
}

impl Proficiency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Proficiency::Basic => "Basic",
            Proficiency::Intermediate => "Intermediate",
            Proficiency::Fluent => "Fluent",
            Proficiency::Native => "Native",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Basic" => Some(Proficiency::Basic),
            "Intermediate" => Some(Proficiency::Intermediate),
            "Fluent" => Some(Proficiency::Fluent),
            "Native" => Some(Proficiency::Native),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Language {
    pub name: String,
    pub proficiency: Proficiency,
}

/// Selects which of the two layouts renders the record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Template {
    #[default]
    Modern,
    Classic,
}

impl Template {
    pub fn as_str(&self) -> &'static str {
        match self {
            Template::Modern => "modern",
            Template::Classic => "classic",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "modern" => Some(Template::Modern),
            "classic" => Some(Template::Classic),
            _ => None,
        }
    }
}

/// Visibility gates for the optional sections. Independent of entry contents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionToggles {
    pub projects: bool,
    pub achievements: bool,
    pub hobbies: bool,
    pub languages: bool,
}

/// The single entity collected by the form, rendered, exported and persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResumeRecord {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub summary: String,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub technical_skills: String,
    pub soft_skills: String,
    pub projects: Vec<Project>,
    pub achievements: Vec<Achievement>,
    pub hobbies: String,
    pub languages: Vec<Language>,
    pub template: Template,
    pub profile_image: Option<ProfileImage>,
    pub section_toggles: SectionToggles,
}

impl ResumeRecord {
    /// A fresh form record: every repeated section holds one blank row.
    pub fn blank() -> Self {
        Self {
            experience: vec![Experience::default()],
            education: vec![Education::default()],
            projects: vec![Project::default()],
            achievements: vec![Achievement::default()],
            languages: vec![Language::default()],
            ..Self::default()
        }
    }

    /// Copy with blank repeated entries removed (primary field empty).
    pub fn compacted(&self) -> Self {
        let mut record = self.clone();
        record.experience.retain(|e| !e.title.is_empty());
        record.education.retain(|e| !e.degree.is_empty());
        record.projects.retain(|p| !p.title.is_empty());
        record.achievements.retain(|a| !a.title.is_empty());
        record.languages.retain(|l| !l.name.is_empty());
        record
    }
}
