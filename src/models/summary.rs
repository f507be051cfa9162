use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationErrors};

pub const LANGUAGE_OPTIONS: &[&str] = &[
    "English",
    "Spanish",
    "French",
    "German",
    "Italian",
    "Portuguese",
    "Japanese",
    "Chinese",
    "Korean",
];

/// Input of the public "generate summary" form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRequest {
    #[serde(default)]
    pub book_title: String,
    #[serde(default)]
    pub chapter_name: String,
    #[serde(default = "SummaryRequest::default_language1")]
    pub language1: String,
    #[serde(default = "SummaryRequest::default_language2")]
    pub language2: String,
}

impl Default for SummaryRequest {
    fn default() -> Self {
        Self {
            book_title: String::new(),
            chapter_name: String::new(),
            language1: Self::default_language1(),
            language2: Self::default_language2(),
        }
    }
}

impl SummaryRequest {
    fn default_language1() -> String {
        "English".to_string()
    }

    fn default_language2() -> String {
        "Spanish".to_string()
    }

    pub fn validate(&self) -> Result<()> {
        let mut errors = ValidationErrors::new();
        if self.book_title.trim().is_empty() {
            errors.add("book_title", "Book title is required");
        }
        if self.chapter_name.trim().is_empty() {
            errors.add("chapter_name", "Chapter name is required");
        }
        if self.language1 == self.language2 {
            errors.add("languages", "Please select two different languages");
        }
        for (field, language) in [("language1", &self.language1), ("language2", &self.language2)] {
            if !LANGUAGE_OPTIONS.contains(&language.as_str()) {
                errors.add(field, format!("Unsupported language: {language}"));
            }
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    pub term: String,
    pub definition: String,
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedSummary {
    pub book_title: String,
    pub chapter_name: String,
    pub language1: String,
    pub language2: String,
    pub summary_text1: String,
    pub summary_text2: String,
    pub key_points: Vec<String>,
    pub advanced_vocabulary: Vec<VocabularyEntry>,
    pub questions: Vec<String>,
    pub date_generated: DateTime<Utc>,
}

/// Progress of a background chapter draft in the admin editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DraftStatus {
    #[default]
    Idle,
    Generating,
    Applied,
    Failed,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn request(l1: &str, l2: &str) -> SummaryRequest {
        SummaryRequest {
            book_title: "Atomic Habits".into(),
            chapter_name: "The Surprising Power".into(),
            language1: l1.into(),
            language2: l2.into(),
        }
    }

    #[test]
    fn same_language_twice_is_rejected() {
        let err = request("English", "English").validate().unwrap_err();
        let AppError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(
            errors.get("languages"),
            Some("Please select two different languages")
        );
    }

    #[test]
    fn blank_titles_are_required() {
        let mut req = request("English", "Chinese");
        req.book_title = "  ".into();
        req.chapter_name.clear();
        let AppError::Validation(errors) = req.validate().unwrap_err() else {
            panic!("expected validation error");
        };
        assert_eq!(errors.get("book_title"), Some("Book title is required"));
        assert_eq!(errors.get("chapter_name"), Some("Chapter name is required"));
    }

    #[test]
    fn distinct_languages_pass() {
        assert!(request("English", "Chinese").validate().is_ok());
    }
}
