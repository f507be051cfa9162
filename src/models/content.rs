use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl ContentStatus {
    pub const ALL: [ContentStatus; 3] = [
        ContentStatus::Draft,
        ContentStatus::Published,
        ContentStatus::Archived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentStatus::Draft => "draft",
            ContentStatus::Published => "published",
            ContentStatus::Archived => "archived",
        }
    }

    pub fn cycle(&self) -> Self {
        match self {
            ContentStatus::Draft => ContentStatus::Published,
            ContentStatus::Published => ContentStatus::Archived,
            ContentStatus::Archived => ContentStatus::Draft,
        }
    }
}

impl fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContentStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Invalid status: {s}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }

    /// Steps through none → beginner → intermediate → advanced → none.
    pub fn cycle(current: Option<Difficulty>) -> Option<Difficulty> {
        match current {
            None => Some(Difficulty::Beginner),
            Some(Difficulty::Beginner) => Some(Difficulty::Intermediate),
            Some(Difficulty::Intermediate) => Some(Difficulty::Advanced),
            Some(Difficulty::Advanced) => None,
        }
    }
}

/// Parallel English / Traditional Chinese text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bilingual {
    #[serde(default)]
    pub en: String,
    #[serde(default)]
    pub ch: String,
}

impl Bilingual {
    pub fn new(en: impl Into<String>, ch: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            ch: ch.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.en.trim().is_empty() && self.ch.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyItem {
    pub word: String,
    pub translation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronunciation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub context: Bilingual,
    #[serde(default)]
    pub examples: Vec<Bilingual>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPoint {
    pub en: String,
    pub ch: String,
    #[serde(default = "KeyPoint::default_importance")]
    pub importance: u8,
    #[serde(default)]
    pub related_concepts: Vec<String>,
}

impl KeyPoint {
    pub const MIN_IMPORTANCE: u8 = 1;
    pub const MAX_IMPORTANCE: u8 = 5;

    fn default_importance() -> u8 {
        3
    }
}

impl Default for KeyPoint {
    fn default() -> Self {
        Self {
            en: String::new(),
            ch: String::new(),
            importance: Self::default_importance(),
            related_concepts: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    pub explanation: Bilingual,
}

impl Default for QuizQuestion {
    fn default() -> Self {
        Self {
            question: String::new(),
            options: vec![String::new(); 4],
            correct_answer: 0,
            explanation: Bilingual::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizOption {
    pub text: String,
    pub is_correct: bool,
}

impl QuizQuestion {
    pub fn quiz_options(&self) -> Vec<QuizOption> {
        self.options
            .iter()
            .enumerate()
            .map(|(i, text)| QuizOption {
                text: text.clone(),
                is_correct: i == self.correct_answer,
            })
            .collect()
    }

    pub fn correct_option(&self) -> Option<&str> {
        self.options.get(self.correct_answer).map(String::as_str)
    }
}

/// Editable body of a chapter's content record; everything except identity
/// and timestamps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentDraft {
    pub summary_en: String,
    pub summary_ch: String,
    #[serde(default)]
    pub vocabulary: Vec<VocabularyItem>,
    #[serde(default)]
    pub key_points: Vec<KeyPoint>,
    #[serde(default)]
    pub status: ContentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url_en: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url_ch: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterContent {
    pub id: String,
    pub chapter_id: String,
    pub summary_en: String,
    pub summary_ch: String,
    pub vocabulary: Vec<VocabularyItem>,
    pub key_points: Vec<KeyPoint>,
    pub status: ContentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url_en: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url_ch: Option<String>,
    pub tags: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<ChapterContent> for ContentDraft {
    fn from(content: ChapterContent) -> Self {
        Self {
            summary_en: content.summary_en,
            summary_ch: content.summary_ch,
            vocabulary: content.vocabulary,
            key_points: content.key_points,
            status: content.status,
            audio_url_en: content.audio_url_en,
            audio_url_ch: content.audio_url_ch,
            tags: content.tags,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_known_values_only() {
        assert_eq!("published".parse::<ContentStatus>(), Ok(ContentStatus::Published));
        assert_eq!(
            "live".parse::<ContentStatus>(),
            Err("Invalid status: live".to_string())
        );
    }

    #[test]
    fn quiz_options_mark_single_correct_answer() {
        let question = QuizQuestion {
            question: "Pick one".into(),
            options: vec!["a".into(), "b".into(), "c".into()],
            correct_answer: 1,
            explanation: Bilingual::default(),
        };
        let flags: Vec<bool> = question.quiz_options().iter().map(|o| o.is_correct).collect();
        assert_eq!(flags, vec![false, true, false]);
        assert_eq!(question.correct_option(), Some("b"));
    }

    #[test]
    fn vocabulary_json_tolerates_missing_optional_fields() {
        let item: VocabularyItem =
            serde_json::from_str(r#"{"word":"habit","translation":"習慣"}"#).unwrap();
        assert_eq!(item.word, "habit");
        assert!(item.examples.is_empty());
        assert_eq!(item.difficulty, None);
    }

    #[test]
    fn key_point_defaults_importance() {
        let point: KeyPoint = serde_json::from_str(r#"{"en":"a","ch":"甲"}"#).unwrap();
        assert_eq!(point.importance, 3);
    }

    #[test]
    fn difficulty_cycle_wraps_to_none() {
        let mut current = None;
        for _ in 0..4 {
            current = Difficulty::cycle(current);
        }
        assert_eq!(current, None);
    }
}
