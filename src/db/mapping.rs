//! Storage rows and their conversion to application records.
//!
//! Each entity has a `*Row` struct shaped like its table (nullable columns as
//! `Option`, JSON columns as raw text). `read` pulls one out of a SQLite row by
//! column name; the `TryFrom`/`From` impls and `*_columns` functions are the
//! pure conversions in both directions. Defaults for missing values are
//! applied here and nowhere else.

use chrono::{DateTime, Utc};
use rusqlite::Row;
use serde::de::DeserializeOwned;

use crate::error::{AppError, Result};
use crate::models::{
    AdPlacement, Bilingual, Book, Chapter, ChapterContent, ContentDraft, NewAdPlacement, NewBook,
    QuizQuestion,
};

pub fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    // Try RFC3339 first (e.g., "2026-01-11T12:34:56+00:00")
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // Try SQLite datetime format (e.g., "2026-01-11 12:34:56")
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    None
}

fn parse_json_list<T: DeserializeOwned>(raw: Option<&str>, column: &str) -> Result<Vec<T>> {
    match raw.map(str::trim) {
        None | Some("") | Some("null") => Ok(Vec::new()),
        Some(text) => serde_json::from_str(text)
            .map_err(|e| AppError::Mapping(format!("{column}: {e}"))),
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

// Books

#[derive(Debug, Clone, PartialEq)]
pub struct BookRow {
    pub id: String,
    pub title: String,
    pub title_ch: String,
    pub author: String,
    pub cover_image: Option<String>,
    pub category_id: String,
    pub description: String,
    pub slug: String,
    pub affiliate_url: Option<String>,
    pub created_at: String,
}

impl BookRow {
    pub const COLUMNS: &'static str = "id, title, title_ch, author, cover_image, category_id, description, slug, affiliate_url, created_at";

    pub fn read(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            title: row.get("title")?,
            title_ch: row.get("title_ch")?,
            author: row.get("author")?,
            cover_image: row.get("cover_image")?,
            category_id: row.get("category_id")?,
            description: row.get("description")?,
            slug: row.get("slug")?,
            affiliate_url: row.get("affiliate_url")?,
            created_at: row.get("created_at")?,
        })
    }
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Book {
            id: row.id,
            title: row.title,
            title_ch: row.title_ch,
            author: row.author,
            cover_image: row.cover_image.unwrap_or_default(),
            category_id: row.category_id,
            description: row.description,
            slug: row.slug,
            affiliate_url: row.affiliate_url.unwrap_or_default(),
            created_at: parse_datetime(&row.created_at).unwrap_or_else(Utc::now),
        }
    }
}

/// Writable columns of `books`; empty optional URLs are stored as NULL.
#[derive(Debug, Clone, PartialEq)]
pub struct BookColumns {
    pub title: String,
    pub title_ch: String,
    pub author: String,
    pub cover_image: Option<String>,
    pub category_id: String,
    pub description: String,
    pub slug: String,
    pub affiliate_url: Option<String>,
}

pub fn book_columns(book: &NewBook) -> BookColumns {
    BookColumns {
        title: book.title.trim().to_string(),
        title_ch: book.title_ch.trim().to_string(),
        author: book.author.trim().to_string(),
        cover_image: non_empty(&book.cover_image),
        category_id: book.category_id.clone(),
        description: book.description.trim().to_string(),
        slug: book.slug.trim().to_string(),
        affiliate_url: non_empty(&book.affiliate_url),
    }
}

// Chapters

#[derive(Debug, Clone, PartialEq)]
pub struct ChapterRow {
    pub id: String,
    pub book_id: String,
    pub title: String,
    pub title_ch: String,
    pub slug: String,
    pub order: i64,
}

impl ChapterRow {
    pub const COLUMNS: &'static str = r#"id, book_id, title, title_ch, slug, "order""#;

    pub fn read(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            book_id: row.get("book_id")?,
            title: row.get("title")?,
            title_ch: row.get("title_ch")?,
            slug: row.get("slug")?,
            order: row.get("order")?,
        })
    }
}

impl From<ChapterRow> for Chapter {
    fn from(row: ChapterRow) -> Self {
        Chapter {
            id: row.id,
            book_id: row.book_id,
            title: row.title,
            title_ch: row.title_ch,
            slug: row.slug,
            order: row.order,
        }
    }
}

// Chapter content

#[derive(Debug, Clone, PartialEq)]
pub struct ContentRow {
    pub id: String,
    pub chapter_id: String,
    pub summary_en: String,
    pub summary_ch: String,
    pub vocabulary: Option<String>,
    pub key_points: Option<String>,
    pub status: String,
    pub audio_url_en: Option<String>,
    pub audio_url_ch: Option<String>,
    pub tags: Option<String>,
    pub updated_at: String,
}

impl ContentRow {
    pub const COLUMNS: &'static str = "id, chapter_id, summary_en, summary_ch, vocabulary, key_points, status, audio_url_en, audio_url_ch, tags, updated_at";

    pub fn read(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            chapter_id: row.get("chapter_id")?,
            summary_en: row.get("summary_en")?,
            summary_ch: row.get("summary_ch")?,
            vocabulary: row.get("vocabulary")?,
            key_points: row.get("key_points")?,
            status: row.get("status")?,
            audio_url_en: row.get("audio_url_en")?,
            audio_url_ch: row.get("audio_url_ch")?,
            tags: row.get("tags")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

impl TryFrom<ContentRow> for ChapterContent {
    type Error = AppError;

    fn try_from(row: ContentRow) -> Result<Self> {
        Ok(ChapterContent {
            vocabulary: parse_json_list(row.vocabulary.as_deref(), "vocabulary")?,
            key_points: parse_json_list(row.key_points.as_deref(), "key_points")?,
            tags: parse_json_list(row.tags.as_deref(), "tags")?,
            status: row.status.parse().map_err(AppError::Mapping)?,
            audio_url_en: row.audio_url_en.filter(|u| !u.is_empty()),
            audio_url_ch: row.audio_url_ch.filter(|u| !u.is_empty()),
            updated_at: parse_datetime(&row.updated_at).unwrap_or_else(Utc::now),
            id: row.id,
            chapter_id: row.chapter_id,
            summary_en: row.summary_en,
            summary_ch: row.summary_ch,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContentColumns {
    pub summary_en: String,
    pub summary_ch: String,
    pub vocabulary: String,
    pub key_points: String,
    pub status: &'static str,
    pub audio_url_en: Option<String>,
    pub audio_url_ch: Option<String>,
    pub tags: String,
}

pub fn content_columns(draft: &ContentDraft) -> Result<ContentColumns> {
    let tags: Vec<&str> = draft
        .tags
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect();
    Ok(ContentColumns {
        summary_en: draft.summary_en.clone(),
        summary_ch: draft.summary_ch.clone(),
        vocabulary: serde_json::to_string(&draft.vocabulary)?,
        key_points: serde_json::to_string(&draft.key_points)?,
        status: draft.status.as_str(),
        audio_url_en: draft.audio_url_en.as_deref().and_then(non_empty),
        audio_url_ch: draft.audio_url_ch.as_deref().and_then(non_empty),
        tags: serde_json::to_string(&tags)?,
    })
}

// Quiz questions

#[derive(Debug, Clone, PartialEq)]
pub struct QuestionRow {
    pub question: String,
    pub options: String,
    pub correct_answer: i64,
    pub explanation_en: String,
    pub explanation_ch: String,
}

impl QuestionRow {
    pub const COLUMNS: &'static str =
        "question, options, correct_answer, explanation_en, explanation_ch";

    pub fn read(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            question: row.get("question")?,
            options: row.get("options")?,
            correct_answer: row.get("correct_answer")?,
            explanation_en: row.get("explanation_en")?,
            explanation_ch: row.get("explanation_ch")?,
        })
    }
}

impl TryFrom<QuestionRow> for QuizQuestion {
    type Error = AppError;

    fn try_from(row: QuestionRow) -> Result<Self> {
        let correct_answer = usize::try_from(row.correct_answer)
            .map_err(|_| AppError::Mapping(format!("correct_answer: {}", row.correct_answer)))?;
        Ok(QuizQuestion {
            question: row.question,
            options: parse_json_list(Some(&row.options), "options")?,
            correct_answer,
            explanation: Bilingual::new(row.explanation_en, row.explanation_ch),
        })
    }
}

/// Question rows are written as a whole; the row struct doubles as the
/// insert payload.
pub fn question_columns(question: &QuizQuestion) -> Result<QuestionRow> {
    Ok(QuestionRow {
        question: question.question.clone(),
        options: serde_json::to_string(&question.options)?,
        correct_answer: question.correct_answer as i64,
        explanation_en: question.explanation.en.clone(),
        explanation_ch: question.explanation.ch.clone(),
    })
}

// Ad placements

#[derive(Debug, Clone, PartialEq)]
pub struct AdPlacementRow {
    pub id: String,
    pub name: String,
    pub location: String,
    pub ad_client: String,
    pub ad_slot: String,
    pub format: String,
    pub status: String,
}

impl AdPlacementRow {
    pub const COLUMNS: &'static str = "id, name, location, ad_client, ad_slot, format, status";

    pub fn read(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            location: row.get("location")?,
            ad_client: row.get("ad_client")?,
            ad_slot: row.get("ad_slot")?,
            format: row.get("format")?,
            status: row.get("status")?,
        })
    }
}

impl TryFrom<AdPlacementRow> for AdPlacement {
    type Error = AppError;

    fn try_from(row: AdPlacementRow) -> Result<Self> {
        Ok(AdPlacement {
            format: row.format.parse().map_err(AppError::Mapping)?,
            status: row.status.parse().map_err(AppError::Mapping)?,
            id: row.id,
            name: row.name,
            location: row.location,
            ad_client: row.ad_client,
            ad_slot: row.ad_slot,
        })
    }
}

pub fn ad_placement_columns(id: &str, placement: &NewAdPlacement) -> AdPlacementRow {
    AdPlacementRow {
        id: id.to_string(),
        name: placement.name.trim().to_string(),
        location: placement.location.trim().to_string(),
        ad_client: placement.ad_client.trim().to_string(),
        ad_slot: placement.ad_slot.trim().to_string(),
        format: placement.format.as_str().to_string(),
        status: placement.status.as_str().to_string(),
    }
}

// Site settings

/// Reads `{"enabled": bool}`; anything else counts as disabled.
pub fn setting_enabled(raw: Option<&str>) -> bool {
    raw.and_then(|text| serde_json::from_str::<serde_json::Value>(text).ok())
        .and_then(|value| value.get("enabled").and_then(serde_json::Value::as_bool))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContentStatus, KeyPoint, VocabularyItem};

    fn book_row() -> BookRow {
        BookRow {
            id: "b1".into(),
            title: "Deep Work".into(),
            title_ch: "深度工作力".into(),
            author: "Cal Newport".into(),
            cover_image: None,
            category_id: "business".into(),
            description: String::new(),
            slug: "deep-work".into(),
            affiliate_url: None,
            created_at: "2026-01-11 12:34:56".into(),
        }
    }

    #[test]
    fn null_urls_become_empty_strings() {
        let book = Book::from(book_row());
        assert_eq!(book.affiliate_url, "");
        assert_eq!(book.cover_image, "");
        assert_eq!(book.created_at.to_rfc3339(), "2026-01-11T12:34:56+00:00");
    }

    #[test]
    fn empty_urls_are_written_as_null() {
        let columns = book_columns(&NewBook {
            title: " Deep Work ".into(),
            affiliate_url: "   ".into(),
            cover_image: "https://example.com/c.jpg".into(),
            ..NewBook::default()
        });
        assert_eq!(columns.title, "Deep Work");
        assert_eq!(columns.affiliate_url, None);
        assert_eq!(columns.cover_image.as_deref(), Some("https://example.com/c.jpg"));
    }

    #[test]
    fn content_row_defaults_missing_json_to_empty_lists() {
        let row = ContentRow {
            id: "c1".into(),
            chapter_id: "ch1".into(),
            summary_en: "A".into(),
            summary_ch: "甲".into(),
            vocabulary: None,
            key_points: Some("null".into()),
            status: "published".into(),
            audio_url_en: Some(String::new()),
            audio_url_ch: None,
            tags: Some("[]".into()),
            updated_at: "garbage".into(),
        };
        let content = ChapterContent::try_from(row).unwrap();
        assert!(content.vocabulary.is_empty());
        assert!(content.key_points.is_empty());
        assert_eq!(content.status, ContentStatus::Published);
        assert_eq!(content.audio_url_en, None);
    }

    #[test]
    fn content_row_rejects_unknown_status() {
        let row = ContentRow {
            id: "c1".into(),
            chapter_id: "ch1".into(),
            summary_en: String::new(),
            summary_ch: String::new(),
            vocabulary: None,
            key_points: None,
            status: "live".into(),
            audio_url_en: None,
            audio_url_ch: None,
            tags: None,
            updated_at: String::new(),
        };
        assert!(matches!(
            ChapterContent::try_from(row),
            Err(AppError::Mapping(_))
        ));
    }

    #[test]
    fn content_columns_serialize_nested_lists() {
        let draft = ContentDraft {
            summary_en: "A".into(),
            summary_ch: "甲".into(),
            vocabulary: vec![VocabularyItem {
                word: "habit".into(),
                translation: "習慣".into(),
                examples: vec![Bilingual::new("A habit.", "一個習慣。")],
                ..VocabularyItem::default()
            }],
            key_points: vec![KeyPoint::default()],
            tags: vec![" grammar ".into(), String::new()],
            ..ContentDraft::default()
        };
        let columns = content_columns(&draft).unwrap();
        assert_eq!(columns.tags, r#"["grammar"]"#);
        assert_eq!(columns.status, "draft");
        let back: Vec<VocabularyItem> = serde_json::from_str(&columns.vocabulary).unwrap();
        assert_eq!(back, draft.vocabulary);
        assert!(columns.key_points.contains(r#""related_concepts":[]"#));
    }

    #[test]
    fn question_row_rejects_negative_answer() {
        let row = QuestionRow {
            question: "Q".into(),
            options: r#"["a","b"]"#.into(),
            correct_answer: -1,
            explanation_en: String::new(),
            explanation_ch: String::new(),
        };
        assert!(QuizQuestion::try_from(row).is_err());
    }

    #[test]
    fn setting_enabled_reads_flag() {
        assert!(setting_enabled(Some(r#"{"enabled":true}"#)));
        assert!(!setting_enabled(Some(r#"{"enabled":false}"#)));
        assert!(!setting_enabled(Some("not json")));
        assert!(!setting_enabled(None));
    }
}
