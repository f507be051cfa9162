//! Bulk upload of chapter content from a spreadsheet. The first sheet's first
//! row names the columns; every following non-blank row is one chapter.
//! A single bad row rejects the whole file.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Reader};
use thiserror::Error;
use tracing::{error, info};

use crate::db::Repository;
use crate::error::Result;
use crate::models::{ContentDraft, ContentStatus, KeyPoint, VocabularyItem};

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Invalid file format. Only Excel files (.xlsx, .xls) are supported")]
    UnsupportedFormat,

    #[error("Could not read spreadsheet: {0}")]
    Workbook(String),

    #[error("No data found in the uploaded file")]
    Empty,

    #[error("Error in row {row}: {reason}")]
    Row { row: usize, reason: String },

    #[error("Database error: {0}")]
    Database(String),
}

/// One data row keyed by header name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow(HashMap<String, String>);

impl RawRow {
    #[cfg(test)]
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    /// Trimmed cell text; empty cells read as missing.
    fn cell(&self, column: &str) -> Option<&str> {
        self.0
            .get(column)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

pub fn is_spreadsheet_name(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("xlsx") || e.eq_ignore_ascii_case("xls"))
        .unwrap_or(false)
}

/// Rows of the first worksheet, skipping rows with no text at all.
pub fn read_workbook(bytes: Vec<u8>) -> std::result::Result<Vec<RawRow>, ImportError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| ImportError::Workbook(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(ImportError::Empty)?
        .map_err(|e| ImportError::Workbook(e.to_string()))?;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(Vec::new());
    };
    let header: Vec<String> = header.iter().map(|c| c.to_string().trim().to_string()).collect();

    Ok(rows
        .map(|cells| {
            RawRow(
                header
                    .iter()
                    .zip(cells)
                    .filter(|(name, _)| !name.is_empty())
                    .map(|(name, cell)| (name.clone(), cell.to_string()))
                    .collect(),
            )
        })
        .filter(|row| row.0.values().any(|v| !v.trim().is_empty()))
        .collect())
}

fn parse_json_column<T: serde::de::DeserializeOwned>(
    row: &RawRow,
    column: &str,
) -> std::result::Result<Vec<T>, String> {
    match row.cell(column) {
        None => Ok(Vec::new()),
        Some(text) => serde_json::from_str(text)
            .map_err(|e| format!("Error parsing JSON fields: {column}: {e}")),
    }
}

/// Checks one row and turns it into the content it upserts.
pub fn validate_row(row: &RawRow) -> std::result::Result<(String, ContentDraft), String> {
    let chapter_id = row.cell("chapter_id").ok_or("chapter_id is required")?;
    uuid::Uuid::parse_str(chapter_id).map_err(|_| format!("Invalid chapter_id: {chapter_id}"))?;
    let summary_en = row.cell("summary_en").ok_or("summary_en is required")?;
    let summary_ch = row.cell("summary_ch").ok_or("summary_ch is required")?;

    let vocabulary: Vec<VocabularyItem> = parse_json_column(row, "vocabulary")?;
    let key_points: Vec<KeyPoint> = parse_json_column(row, "key_points")?;
    let importance_range = KeyPoint::MIN_IMPORTANCE..=KeyPoint::MAX_IMPORTANCE;
    if let Some(i) = key_points
        .iter()
        .position(|p| !importance_range.contains(&p.importance))
    {
        return Err(format!("key_points[{i}].importance must be 1-5"));
    }
    let tags = row
        .cell("tags")
        .map(|t| {
            t.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();
    let status = match row.cell("status") {
        None => ContentStatus::Published,
        Some(s) => s.parse::<ContentStatus>()?,
    };

    Ok((
        chapter_id.to_string(),
        ContentDraft {
            summary_en: summary_en.to_string(),
            summary_ch: summary_ch.to_string(),
            vocabulary,
            key_points,
            status,
            audio_url_en: row.cell("audio_url_en").map(String::from),
            audio_url_ch: row.cell("audio_url_ch").map(String::from),
            tags,
        },
    ))
}

/// Validates every row; the first failure names its 1-based data row.
pub fn validate_batch(
    rows: &[RawRow],
) -> std::result::Result<Vec<(String, ContentDraft)>, ImportError> {
    if rows.is_empty() {
        return Err(ImportError::Empty);
    }
    rows.iter()
        .enumerate()
        .map(|(i, row)| validate_row(row).map_err(|reason| ImportError::Row { row: i + 1, reason }))
        .collect()
}

/// Validates and upserts rows in one transaction. Returns the number written.
pub async fn import_rows(repo: &Repository, rows: Vec<RawRow>) -> Result<usize> {
    let batch = validate_batch(&rows)?;
    let written = repo.upsert_chapter_contents(batch).await.map_err(|e| {
        error!(error = %e, "bulk import failed");
        ImportError::Database(e.to_string())
    })?;
    info!(rows = written, "bulk import complete");
    Ok(written)
}

pub async fn import_workbook(repo: &Repository, filename: &str, bytes: Vec<u8>) -> Result<usize> {
    if !is_spreadsheet_name(filename) {
        return Err(ImportError::UnsupportedFormat.into());
    }
    let rows = read_workbook(bytes)?;
    import_rows(repo, rows).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::seeded;
    use crate::error::AppError;

    fn valid_row(chapter_id: &str) -> RawRow {
        RawRow::from_pairs([
            ("chapter_id", chapter_id),
            ("summary_en", "A"),
            ("summary_ch", "甲"),
            ("tags", "habits, identity"),
        ])
    }

    #[test]
    fn only_excel_names_are_accepted() {
        assert!(is_spreadsheet_name("content.xlsx"));
        assert!(is_spreadsheet_name("LEGACY.XLS"));
        assert!(!is_spreadsheet_name("content.csv"));
        assert!(!is_spreadsheet_name("xlsx"));
    }

    #[test]
    fn status_defaults_to_published() {
        let (_, draft) = validate_row(&valid_row("6f1f8f52-0a36-4f0e-9d49-0c5e7f3b2a10")).unwrap();
        assert_eq!(draft.status, ContentStatus::Published);
        assert_eq!(draft.tags, vec!["habits", "identity"]);
        assert!(draft.vocabulary.is_empty());
    }

    #[test]
    fn unknown_status_is_rejected() {
        let mut row = valid_row("6f1f8f52-0a36-4f0e-9d49-0c5e7f3b2a10");
        row.0.insert("status".into(), "live".into());
        assert_eq!(validate_row(&row).unwrap_err(), "Invalid status: live");
    }

    #[test]
    fn vocabulary_column_parses_model_json() {
        let mut row = valid_row("6f1f8f52-0a36-4f0e-9d49-0c5e7f3b2a10");
        row.0.insert(
            "vocabulary".into(),
            r#"[{"word":"habit","translation":"習慣","difficulty":"beginner"}]"#.into(),
        );
        let (_, draft) = validate_row(&row).unwrap();
        assert_eq!(draft.vocabulary[0].translation, "習慣");

        row.0.insert("key_points".into(), "[oops".into());
        assert!(validate_row(&row).unwrap_err().starts_with("Error parsing JSON fields"));
    }

    #[test]
    fn key_point_importance_must_be_in_range() {
        let mut row = valid_row("6f1f8f52-0a36-4f0e-9d49-0c5e7f3b2a10");
        row.0.insert(
            "key_points".into(),
            r#"[{"en":"Start small.","ch":"從小處開始。","importance":5},{"en":"Loud.","ch":"響亮。","importance":9}]"#.into(),
        );
        assert_eq!(validate_row(&row).unwrap_err(), "key_points[1].importance must be 1-5");

        row.0.insert(
            "key_points".into(),
            r#"[{"en":"Zero.","ch":"零。","importance":0}]"#.into(),
        );
        let err = validate_batch(&[row]).unwrap_err();
        assert_eq!(err.to_string(), "Error in row 1: key_points[0].importance must be 1-5");
    }

    #[test]
    fn absent_summary_column_is_missing() {
        let mut row = valid_row("6f1f8f52-0a36-4f0e-9d49-0c5e7f3b2a10");
        row.0.remove("summary_en");
        assert_eq!(validate_row(&row).unwrap_err(), "summary_en is required");
    }

    #[tokio::test]
    async fn third_row_without_summary_column_rejects_the_file() {
        let repo = Repository::open_in_memory().await.unwrap();
        let (_, chapters) = seeded(&repo, "bulk-absent", 3).await;

        let mut third = valid_row(&chapters[2]);
        third.0.remove("summary_en");
        let rows = vec![valid_row(&chapters[0]), valid_row(&chapters[1]), third];

        let err = import_rows(&repo, rows).await.unwrap_err();
        assert_eq!(err.to_string(), "Error in row 3: summary_en is required");
        for chapter in &chapters {
            assert!(repo.get_chapter_content(chapter).await.unwrap().is_none());
        }
    }

    #[test]
    fn empty_batch_has_no_data() {
        let err = validate_batch(&[]).unwrap_err();
        assert_eq!(err.to_string(), "No data found in the uploaded file");
    }

    #[tokio::test]
    async fn bad_third_row_rejects_the_whole_file() {
        let repo = Repository::open_in_memory().await.unwrap();
        let (_, chapters) = seeded(&repo, "bulk", 3).await;

        let mut third = valid_row(&chapters[2]);
        third.0.insert("summary_en".into(), "   ".into());
        let rows = vec![valid_row(&chapters[0]), valid_row(&chapters[1]), third];

        let err = import_rows(&repo, rows).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Error in row 3: summary_en is required");
        for chapter in &chapters {
            assert!(repo.get_chapter_content(chapter).await.unwrap().is_none());
        }
    }

    #[tokio::test]
    async fn valid_rows_upsert_by_chapter() {
        let repo = Repository::open_in_memory().await.unwrap();
        let (_, chapters) = seeded(&repo, "bulk-ok", 2).await;
        let rows = chapters.iter().map(|c| valid_row(c)).collect();

        assert_eq!(import_rows(&repo, rows).await.unwrap(), 2);
        let content = repo.get_chapter_content(&chapters[1]).await.unwrap().unwrap();
        assert_eq!(content.summary_ch, "甲");
        assert_eq!(content.status, ContentStatus::Published);
    }

    #[tokio::test]
    async fn unknown_chapter_fails_as_database_error() {
        let repo = Repository::open_in_memory().await.unwrap();
        let rows = vec![valid_row("6f1f8f52-0a36-4f0e-9d49-0c5e7f3b2a10")];
        let err = import_rows(&repo, rows).await.unwrap_err();
        assert!(matches!(err, AppError::Import(ImportError::Database(_))));
    }

    #[tokio::test]
    async fn wrong_extension_is_refused_before_reading() {
        let repo = Repository::open_in_memory().await.unwrap();
        let err = import_workbook(&repo, "content.csv", b"a,b".to_vec())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Import(ImportError::UnsupportedFormat)));

        let err = import_workbook(&repo, "content.xlsx", b"not a zip".to_vec())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Import(ImportError::Workbook(_))));
    }
}
