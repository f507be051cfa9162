//! Mocked bilingual summary generator behind the public `/summaries` page.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::info;

use crate::error::Result;
use crate::models::{GeneratedSummary, SummaryRequest, VocabularyEntry};

fn mock_summary(book: &str, chapter: &str, language: &str) -> String {
    match language {
        "English" => format!(
            "This chapter of \"{book}\", titled \"{chapter}\", follows a narrator who must weigh loyalty against conscience. \
             A string of small choices forces a reckoning with long held beliefs, and the resolution rests on empathy rather than victory. \
             Vivid imagery carries the emotional arc and lingers after the final page."
        ),
        "Spanish" => format!(
            "Este capítulo de \"{book}\", titulado \"{chapter}\", sigue a un narrador que debe sopesar la lealtad frente a la conciencia. \
             Una serie de pequeñas decisiones lo obliga a replantear sus creencias, y el desenlace se apoya en la empatía más que en la victoria. \
             Las imágenes vívidas sostienen el arco emocional mucho después de la última página."
        ),
        other => format!("Summary in {other} for \"{book}\" - \"{chapter}\""),
    }
}

fn mock_key_points() -> Vec<String> {
    [
        "The narrator's worldview shifts through a series of small decisions",
        "Recurring water imagery stands for renewal",
        "Minor characters act as foils that sharpen the central conflict",
        "Flashbacks supply the context the present scenes depend on",
        "The chapter closes on an open question that carries into the next",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn mock_vocabulary(language1: &str, language2: &str) -> Vec<VocabularyEntry> {
    let entry = |term: &str, definition: &str, language: &str| VocabularyEntry {
        term: term.to_string(),
        definition: definition.to_string(),
        language: language.to_string(),
    };
    vec![
        entry("Ephemeral", "Lasting for a very short time", language1),
        entry("Taciturn", "Reserved; saying little", language1),
        entry("Perspicacious", "Quick to notice and understand things", language1),
        entry("Efímero", "Que dura muy poco tiempo", language2),
        entry("Taciturno", "Reservado; que habla poco", language2),
        entry("Perspicaz", "Que percibe y comprende con rapidez", language2),
    ]
}

fn mock_questions() -> Vec<String> {
    [
        "How does the narrator's final choice reflect the chapter's moral tension?",
        "What does the setting contribute to the mood of the chapter?",
        "Which secondary character most changes the narrator's course, and how?",
        "Where does the author foreshadow the closing scene?",
        "How might readers from different cultures read the ending differently?",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Validates the form, waits `delay` to mimic a model call and returns a
/// deterministic summary.
pub async fn generate_summary(request: &SummaryRequest, delay: Duration) -> Result<GeneratedSummary> {
    request.validate()?;
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let book = request.book_title.trim();
    let chapter = request.chapter_name.trim();
    info!(book, chapter, "generating demo summary");

    Ok(GeneratedSummary {
        book_title: book.to_string(),
        chapter_name: chapter.to_string(),
        language1: request.language1.clone(),
        language2: request.language2.clone(),
        summary_text1: mock_summary(book, chapter, &request.language1),
        summary_text2: mock_summary(book, chapter, &request.language2),
        key_points: mock_key_points(),
        advanced_vocabulary: mock_vocabulary(&request.language1, &request.language2),
        questions: mock_questions(),
        date_generated: Utc::now(),
    })
}

/// Entries kept by [`SummaryHistory`]; older ones are dropped.
pub const HISTORY_LIMIT: usize = 50;

/// Generated summaries shared by every request of one server process,
/// newest first, at most [`HISTORY_LIMIT`] of them.
#[derive(Clone, Default)]
pub struct SummaryHistory {
    entries: Arc<Mutex<VecDeque<GeneratedSummary>>>,
}

impl SummaryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push(&self, summary: GeneratedSummary) {
        let mut entries = self.entries.lock().await;
        entries.push_front(summary);
        entries.truncate(HISTORY_LIMIT);
    }

    pub async fn list(&self) -> Vec<GeneratedSummary> {
        self.entries.lock().await.iter().cloned().collect()
    }

    pub async fn get(&self, index: usize) -> Option<GeneratedSummary> {
        self.entries.lock().await.get(index).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn request(l1: &str, l2: &str) -> SummaryRequest {
        SummaryRequest {
            book_title: "Dune".into(),
            chapter_name: "Book One".into(),
            language1: l1.into(),
            language2: l2.into(),
        }
    }

    #[tokio::test]
    async fn duplicate_languages_rejected_before_generation() {
        let result = generate_summary(&request("French", "French"), Duration::from_secs(60)).await;
        let err = tokio_test::assert_err!(result);
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn english_and_spanish_get_full_text() {
        let summary =
            tokio_test::assert_ok!(generate_summary(&request("English", "Spanish"), Duration::ZERO).await);
        assert!(summary.summary_text1.starts_with("This chapter of \"Dune\""));
        assert!(summary.summary_text2.starts_with("Este capítulo"));
        assert_eq!(summary.advanced_vocabulary[3].language, "Spanish");
    }

    #[tokio::test]
    async fn other_languages_get_placeholder() {
        let summary = generate_summary(&request("Japanese", "Korean"), Duration::ZERO)
            .await
            .unwrap();
        assert_eq!(summary.summary_text1, "Summary in Japanese for \"Dune\" - \"Book One\"");
    }

    #[tokio::test]
    async fn history_is_newest_first() {
        let history = SummaryHistory::new();
        for chapter in ["one", "two"] {
            let mut req = request("English", "Chinese");
            req.chapter_name = chapter.into();
            history.push(generate_summary(&req, Duration::ZERO).await.unwrap()).await;
        }
        let names: Vec<String> = history.list().await.into_iter().map(|s| s.chapter_name).collect();
        assert_eq!(names, vec!["two", "one"]);
        assert!(history.get(5).await.is_none());
    }

    #[tokio::test]
    async fn history_keeps_only_the_newest_entries() {
        let history = SummaryHistory::new();
        for i in 0..HISTORY_LIMIT + 25 {
            let mut req = request("English", "Spanish");
            req.chapter_name = format!("chapter {i}");
            history.push(generate_summary(&req, Duration::ZERO).await.unwrap()).await;
        }
        let entries = history.list().await;
        assert_eq!(entries.len(), HISTORY_LIMIT);
        assert_eq!(entries[0].chapter_name, format!("chapter {}", HISTORY_LIMIT + 24));
        assert_eq!(entries[HISTORY_LIMIT - 1].chapter_name, "chapter 25");
        assert!(history.get(HISTORY_LIMIT).await.is_none());
    }
}
