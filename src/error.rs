use std::fmt;

use thiserror::Error;

use crate::import::ImportError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] tokio_rusqlite::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Failed to save chapter content ({stage}): {source}")]
    ContentSave {
        stage: SaveStage,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Invalid stored value: {0}")]
    Mapping(String),

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Claude API error: {0}")]
    ClaudeApi(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Step of the chapter-content save transaction that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStage {
    UpsertContent,
    DeleteQuestions,
    InsertQuestions,
}

impl fmt::Display for SaveStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SaveStage::UpsertContent => "upsert_content",
            SaveStage::DeleteQuestions => "delete_questions",
            SaveStage::InsertQuestions => "insert_questions",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Client-side form errors, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// `Ok(())` when nothing was recorded, otherwise the collected errors.
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|e| e.message.as_str()).collect();
        f.write_str(&messages.join("; "))
    }
}

impl AppError {
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_) | AppError::Import(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_errors_pass() {
        assert!(ValidationErrors::new().into_result().is_ok());
    }

    #[test]
    fn collected_errors_join_messages() {
        let mut errors = ValidationErrors::new();
        errors.add("title", "Title is required");
        errors.add("slug", "Slug is required");
        assert_eq!(errors.get("slug"), Some("Slug is required"));

        let err = errors.into_result().unwrap_err();
        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "Validation failed: Title is required; Slug is required"
        );
    }

    #[test]
    fn save_stage_names_the_step() {
        let err = AppError::ContentSave {
            stage: SaveStage::InsertQuestions,
            source: rusqlite::Error::QueryReturnedNoRows,
        };
        assert!(err.to_string().starts_with("Failed to save chapter content (insert_questions)"));
    }
}
