use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationVariant {
    Default,
    Destructive,
}

/// A user-visible toast attached to operation results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub variant: NotificationVariant,
    pub title: String,
    pub description: String,
}

impl Notification {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            variant: NotificationVariant::Default,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            variant: NotificationVariant::Destructive,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn resume_saved() -> Self {
        Self::success(
            "Resume Generated!",
            "Your professional resume is ready and saved.",
        )
    }

    pub fn missing_information() -> Self {
        Self::error(
            "Missing Information",
            "Please fill in at least your name and email",
        )
    }

    pub fn not_authenticated() -> Self {
        Self::error("Error", "User not authenticated")
    }

    pub fn image_too_large() -> Self {
        Self::error("Image too large", "Please upload an image smaller than 5MB")
    }

    pub fn resume_deleted() -> Self {
        Self::success(
            "Resume deleted",
            "The resume has been removed from your history.",
        )
    }

    pub fn delete_failed() -> Self {
        Self::error("Error", "Failed to delete resume.")
    }

    pub fn history_failed() -> Self {
        Self::error("Error", "Failed to load resume history.")
    }
}
