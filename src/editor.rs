use tracing::info;

use crate::ai::GeneratedContent;
use crate::db::Repository;
use crate::error::{AppError, Result, ValidationErrors};
use crate::models::{
    Bilingual, ContentDraft, ContentStatus, Difficulty, KeyPoint, QuizQuestion, VocabularyItem,
};

/// One editable leaf of the chapter form. Indices are positions in the
/// vocabulary, example, key point, question and option lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldPath {
    SummaryEn,
    SummaryCh,
    Status,
    Tags,
    AudioEn,
    AudioCh,
    VocabWord(usize),
    VocabTranslation(usize),
    VocabPronunciation(usize),
    VocabDifficulty(usize),
    VocabContextEn(usize),
    VocabContextCh(usize),
    ExampleEn(usize, usize),
    ExampleCh(usize, usize),
    KeyPointEn(usize),
    KeyPointCh(usize),
    KeyPointImportance(usize),
    KeyPointConcepts(usize),
    Question(usize),
    QuestionOption(usize, usize),
    ExplanationEn(usize),
    ExplanationCh(usize),
}

impl FieldPath {
    pub fn label(&self) -> String {
        match *self {
            FieldPath::SummaryEn => "English Summary".to_string(),
            FieldPath::SummaryCh => "Chinese Summary".to_string(),
            FieldPath::Status => "Status".to_string(),
            FieldPath::Tags => "Tags".to_string(),
            FieldPath::AudioEn => "Audio URL (EN)".to_string(),
            FieldPath::AudioCh => "Audio URL (CH)".to_string(),
            FieldPath::VocabWord(v) => format!("Vocabulary {} · Word", v + 1),
            FieldPath::VocabTranslation(v) => format!("Vocabulary {} · Translation", v + 1),
            FieldPath::VocabPronunciation(v) => format!("Vocabulary {} · Pronunciation", v + 1),
            FieldPath::VocabDifficulty(v) => format!("Vocabulary {} · Difficulty", v + 1),
            FieldPath::VocabContextEn(v) => format!("Vocabulary {} · Context (EN)", v + 1),
            FieldPath::VocabContextCh(v) => format!("Vocabulary {} · Context (CH)", v + 1),
            FieldPath::ExampleEn(v, e) => format!("Vocabulary {} · Example {} (EN)", v + 1, e + 1),
            FieldPath::ExampleCh(v, e) => format!("Vocabulary {} · Example {} (CH)", v + 1, e + 1),
            FieldPath::KeyPointEn(k) => format!("Key Point {} (EN)", k + 1),
            FieldPath::KeyPointCh(k) => format!("Key Point {} (CH)", k + 1),
            FieldPath::KeyPointImportance(k) => format!("Key Point {} · Importance", k + 1),
            FieldPath::KeyPointConcepts(k) => format!("Key Point {} · Related Concepts", k + 1),
            FieldPath::Question(q) => format!("Question {}", q + 1),
            FieldPath::QuestionOption(q, o) => {
                format!("Question {} · Option {}", q + 1, option_letter(o))
            }
            FieldPath::ExplanationEn(q) => format!("Question {} · Explanation (EN)", q + 1),
            FieldPath::ExplanationCh(q) => format!("Question {} · Explanation (CH)", q + 1),
        }
    }

    pub fn vocab_index(&self) -> Option<usize> {
        match *self {
            FieldPath::VocabWord(v)
            | FieldPath::VocabTranslation(v)
            | FieldPath::VocabPronunciation(v)
            | FieldPath::VocabDifficulty(v)
            | FieldPath::VocabContextEn(v)
            | FieldPath::VocabContextCh(v)
            | FieldPath::ExampleEn(v, _)
            | FieldPath::ExampleCh(v, _) => Some(v),
            _ => None,
        }
    }

    pub fn key_point_index(&self) -> Option<usize> {
        match *self {
            FieldPath::KeyPointEn(k)
            | FieldPath::KeyPointCh(k)
            | FieldPath::KeyPointImportance(k)
            | FieldPath::KeyPointConcepts(k) => Some(k),
            _ => None,
        }
    }

    pub fn question_index(&self) -> Option<usize> {
        match *self {
            FieldPath::Question(q)
            | FieldPath::QuestionOption(q, _)
            | FieldPath::ExplanationEn(q)
            | FieldPath::ExplanationCh(q) => Some(q),
            _ => None,
        }
    }

    /// Fields changed by cycling through a fixed set of values instead of
    /// free text.
    pub fn is_choice(&self) -> bool {
        matches!(
            self,
            FieldPath::Status | FieldPath::VocabDifficulty(_) | FieldPath::KeyPointImportance(_)
        )
    }
}

pub fn option_letter(index: usize) -> char {
    (b'A' + (index % 26) as u8) as char
}

fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn optional(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Form state of one chapter's content plus its quiz questions.
#[derive(Debug, Clone, PartialEq)]
pub struct ChapterContentEditor {
    pub chapter_id: String,
    pub draft: ContentDraft,
    pub questions: Vec<QuizQuestion>,
    pub dirty: bool,
}

impl ChapterContentEditor {
    pub fn new_empty(chapter_id: &str) -> Self {
        Self {
            chapter_id: chapter_id.to_string(),
            draft: ContentDraft::default(),
            questions: Vec::new(),
            dirty: false,
        }
    }

    /// Content and questions are read independently; a chapter without a
    /// content row opens as an empty draft.
    pub async fn load(repo: &Repository, chapter_id: &str) -> Result<Self> {
        let mut editor = Self::new_empty(chapter_id);
        if let Some(content) = repo.get_chapter_content(chapter_id).await? {
            editor.draft = ContentDraft::from(content);
        }
        editor.questions = repo.list_chapter_questions(chapter_id).await?;
        Ok(editor)
    }

    pub fn add_vocabulary_item(&mut self) -> usize {
        self.draft.vocabulary.push(VocabularyItem {
            examples: vec![Bilingual::default()],
            ..VocabularyItem::default()
        });
        self.dirty = true;
        self.draft.vocabulary.len() - 1
    }

    pub fn add_example(&mut self, vocab: usize) -> Option<usize> {
        let item = self.draft.vocabulary.get_mut(vocab)?;
        item.examples.push(Bilingual::default());
        self.dirty = true;
        Some(item.examples.len() - 1)
    }

    pub fn add_key_point(&mut self) -> usize {
        self.draft.key_points.push(KeyPoint::default());
        self.dirty = true;
        self.draft.key_points.len() - 1
    }

    pub fn add_question(&mut self) -> usize {
        self.questions.push(QuizQuestion::default());
        self.dirty = true;
        self.questions.len() - 1
    }

    pub fn remove_question(&mut self, index: usize) -> bool {
        if index >= self.questions.len() {
            return false;
        }
        self.questions.remove(index);
        self.dirty = true;
        true
    }

    /// A question has exactly one correct answer, so marking an option
    /// unmarks the previous one.
    pub fn set_correct_answer(&mut self, question: usize, option: usize) -> bool {
        match self.questions.get_mut(question) {
            Some(q) if option < q.options.len() => {
                q.correct_answer = option;
                self.dirty = true;
                true
            }
            _ => false,
        }
    }

    pub fn set_importance(&mut self, point: usize, importance: i64) {
        if let Some(p) = self.draft.key_points.get_mut(point) {
            p.importance = importance.clamp(
                KeyPoint::MIN_IMPORTANCE as i64,
                KeyPoint::MAX_IMPORTANCE as i64,
            ) as u8;
            self.dirty = true;
        }
    }

    pub fn set_tags_from_input(&mut self, input: &str) {
        self.draft.tags = split_list(input);
        self.dirty = true;
    }

    /// Every editable field in display order.
    pub fn fields(&self) -> Vec<FieldPath> {
        let mut fields = vec![
            FieldPath::SummaryEn,
            FieldPath::SummaryCh,
            FieldPath::Status,
            FieldPath::Tags,
            FieldPath::AudioEn,
            FieldPath::AudioCh,
        ];
        for (v, item) in self.draft.vocabulary.iter().enumerate() {
            fields.extend([
                FieldPath::VocabWord(v),
                FieldPath::VocabTranslation(v),
                FieldPath::VocabPronunciation(v),
                FieldPath::VocabDifficulty(v),
                FieldPath::VocabContextEn(v),
                FieldPath::VocabContextCh(v),
            ]);
            for e in 0..item.examples.len() {
                fields.extend([FieldPath::ExampleEn(v, e), FieldPath::ExampleCh(v, e)]);
            }
        }
        for k in 0..self.draft.key_points.len() {
            fields.extend([
                FieldPath::KeyPointEn(k),
                FieldPath::KeyPointCh(k),
                FieldPath::KeyPointImportance(k),
                FieldPath::KeyPointConcepts(k),
            ]);
        }
        for (q, question) in self.questions.iter().enumerate() {
            fields.push(FieldPath::Question(q));
            fields.extend((0..question.options.len()).map(|o| FieldPath::QuestionOption(q, o)));
            fields.extend([FieldPath::ExplanationEn(q), FieldPath::ExplanationCh(q)]);
        }
        fields
    }

    pub fn value(&self, path: FieldPath) -> String {
        let draft = &self.draft;
        let vocab = |v: usize| draft.vocabulary.get(v);
        let point = |k: usize| draft.key_points.get(k);
        let question = |q: usize| self.questions.get(q);

        let value = match path {
            FieldPath::SummaryEn => Some(draft.summary_en.clone()),
            FieldPath::SummaryCh => Some(draft.summary_ch.clone()),
            FieldPath::Status => Some(draft.status.to_string()),
            FieldPath::Tags => Some(draft.tags.join(", ")),
            FieldPath::AudioEn => draft.audio_url_en.clone(),
            FieldPath::AudioCh => draft.audio_url_ch.clone(),
            FieldPath::VocabWord(v) => vocab(v).map(|i| i.word.clone()),
            FieldPath::VocabTranslation(v) => vocab(v).map(|i| i.translation.clone()),
            FieldPath::VocabPronunciation(v) => vocab(v).and_then(|i| i.pronunciation.clone()),
            FieldPath::VocabDifficulty(v) => {
                vocab(v).and_then(|i| i.difficulty).map(|d| d.as_str().to_string())
            }
            FieldPath::VocabContextEn(v) => vocab(v).map(|i| i.context.en.clone()),
            FieldPath::VocabContextCh(v) => vocab(v).map(|i| i.context.ch.clone()),
            FieldPath::ExampleEn(v, e) => {
                vocab(v).and_then(|i| i.examples.get(e)).map(|x| x.en.clone())
            }
            FieldPath::ExampleCh(v, e) => {
                vocab(v).and_then(|i| i.examples.get(e)).map(|x| x.ch.clone())
            }
            FieldPath::KeyPointEn(k) => point(k).map(|p| p.en.clone()),
            FieldPath::KeyPointCh(k) => point(k).map(|p| p.ch.clone()),
            FieldPath::KeyPointImportance(k) => point(k).map(|p| p.importance.to_string()),
            FieldPath::KeyPointConcepts(k) => point(k).map(|p| p.related_concepts.join(", ")),
            FieldPath::Question(q) => question(q).map(|x| x.question.clone()),
            FieldPath::QuestionOption(q, o) => question(q).and_then(|x| x.options.get(o).cloned()),
            FieldPath::ExplanationEn(q) => question(q).map(|x| x.explanation.en.clone()),
            FieldPath::ExplanationCh(q) => question(q).map(|x| x.explanation.ch.clone()),
        };
        value.unwrap_or_default()
    }

    /// Writes free text into a field. Paths that no longer exist are ignored.
    pub fn set_value(&mut self, path: FieldPath, text: &str) -> Result<()> {
        match path {
            FieldPath::Status => {
                self.draft.status = text
                    .trim()
                    .parse::<ContentStatus>()
                    .map_err(|msg| field_error("status", msg))?;
            }
            FieldPath::Tags => self.set_tags_from_input(text),
            FieldPath::VocabDifficulty(v) => {
                let difficulty = match text.trim() {
                    "" => None,
                    "beginner" => Some(Difficulty::Beginner),
                    "intermediate" => Some(Difficulty::Intermediate),
                    "advanced" => Some(Difficulty::Advanced),
                    other => {
                        return Err(field_error("difficulty", format!("Invalid difficulty: {other}")))
                    }
                };
                if let Some(item) = self.draft.vocabulary.get_mut(v) {
                    item.difficulty = difficulty;
                }
            }
            FieldPath::KeyPointImportance(k) => {
                let importance: i64 = text
                    .trim()
                    .parse()
                    .map_err(|_| field_error("importance", "Importance must be a number"))?;
                self.set_importance(k, importance);
            }
            _ => {
                if let Some(slot) = self.text_slot(path) {
                    *slot = text.to_string();
                } else if let Some(slot) = self.optional_slot(path) {
                    *slot = optional(text);
                } else if let FieldPath::KeyPointConcepts(k) = path {
                    if let Some(p) = self.draft.key_points.get_mut(k) {
                        p.related_concepts = split_list(text);
                    }
                }
            }
        }
        self.dirty = true;
        Ok(())
    }

    /// Steps a choice field to its next value: status, difficulty, or
    /// importance (wrapping 5 → 1). On an option it marks it correct.
    pub fn cycle(&mut self, path: FieldPath) {
        match path {
            FieldPath::Status => self.draft.status = self.draft.status.cycle(),
            FieldPath::VocabDifficulty(v) => {
                if let Some(item) = self.draft.vocabulary.get_mut(v) {
                    item.difficulty = Difficulty::cycle(item.difficulty);
                }
            }
            FieldPath::KeyPointImportance(k) => {
                if let Some(p) = self.draft.key_points.get_mut(k) {
                    p.importance = if p.importance >= KeyPoint::MAX_IMPORTANCE {
                        KeyPoint::MIN_IMPORTANCE
                    } else {
                        p.importance + 1
                    };
                }
            }
            FieldPath::QuestionOption(q, o) => {
                self.set_correct_answer(q, o);
                return;
            }
            _ => return,
        }
        self.dirty = true;
    }

    fn text_slot(&mut self, path: FieldPath) -> Option<&mut String> {
        let draft = &mut self.draft;
        match path {
            FieldPath::SummaryEn => Some(&mut draft.summary_en),
            FieldPath::SummaryCh => Some(&mut draft.summary_ch),
            FieldPath::VocabWord(v) => draft.vocabulary.get_mut(v).map(|i| &mut i.word),
            FieldPath::VocabTranslation(v) => {
                draft.vocabulary.get_mut(v).map(|i| &mut i.translation)
            }
            FieldPath::VocabContextEn(v) => draft.vocabulary.get_mut(v).map(|i| &mut i.context.en),
            FieldPath::VocabContextCh(v) => draft.vocabulary.get_mut(v).map(|i| &mut i.context.ch),
            FieldPath::ExampleEn(v, e) => draft
                .vocabulary
                .get_mut(v)
                .and_then(|i| i.examples.get_mut(e))
                .map(|x| &mut x.en),
            FieldPath::ExampleCh(v, e) => draft
                .vocabulary
                .get_mut(v)
                .and_then(|i| i.examples.get_mut(e))
                .map(|x| &mut x.ch),
            FieldPath::KeyPointEn(k) => draft.key_points.get_mut(k).map(|p| &mut p.en),
            FieldPath::KeyPointCh(k) => draft.key_points.get_mut(k).map(|p| &mut p.ch),
            FieldPath::Question(q) => self.questions.get_mut(q).map(|x| &mut x.question),
            FieldPath::QuestionOption(q, o) => {
                self.questions.get_mut(q).and_then(|x| x.options.get_mut(o))
            }
            FieldPath::ExplanationEn(q) => self.questions.get_mut(q).map(|x| &mut x.explanation.en),
            FieldPath::ExplanationCh(q) => self.questions.get_mut(q).map(|x| &mut x.explanation.ch),
            _ => None,
        }
    }

    fn optional_slot(&mut self, path: FieldPath) -> Option<&mut Option<String>> {
        match path {
            FieldPath::AudioEn => Some(&mut self.draft.audio_url_en),
            FieldPath::AudioCh => Some(&mut self.draft.audio_url_ch),
            FieldPath::VocabPronunciation(v) => {
                self.draft.vocabulary.get_mut(v).map(|i| &mut i.pronunciation)
            }
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let mut errors = ValidationErrors::new();
        if self.draft.summary_en.trim().is_empty() {
            errors.add("summary_en", "English summary is required");
        }
        if self.draft.summary_ch.trim().is_empty() {
            errors.add("summary_ch", "Chinese summary is required");
        }
        for (i, question) in self.questions.iter().enumerate() {
            if question.correct_answer >= question.options.len() {
                errors.add(
                    "questions",
                    format!("Question {}: correct answer must be one of its options", i + 1),
                );
            }
        }
        errors.into_result()
    }

    /// Validates, then writes content and questions atomically. `on_saved`
    /// runs only once the write has committed.
    pub async fn save<F: FnOnce()>(&mut self, repo: &Repository, on_saved: F) -> Result<()> {
        self.validate()?;
        repo.save_chapter_content(&self.chapter_id, &self.draft, &self.questions)
            .await?;
        info!(
            chapter_id = %self.chapter_id,
            questions = self.questions.len(),
            "chapter content saved"
        );
        self.dirty = false;
        on_saved();
        Ok(())
    }

    /// Replaces generated parts with a drafter result. Sections the drafter
    /// could not produce keep their current values.
    pub fn apply_draft(&mut self, generated: GeneratedContent) {
        if !generated.summary_en.trim().is_empty() {
            self.draft.summary_en = generated.summary_en;
        }
        if !generated.summary_ch.trim().is_empty() {
            self.draft.summary_ch = generated.summary_ch;
        }
        if !generated.vocabulary.is_empty() {
            self.draft.vocabulary = generated.vocabulary;
        }
        if !generated.key_points.is_empty() {
            self.draft.key_points = generated.key_points;
        }
        if !generated.questions.is_empty() {
            self.questions = generated.questions;
        }
        self.dirty = true;
    }
}

fn field_error(field: &'static str, message: impl Into<String>) -> AppError {
    let mut errors = ValidationErrors::new();
    errors.add(field, message);
    AppError::Validation(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::seeded;

    #[tokio::test]
    async fn chapter_without_content_opens_empty() {
        let repo = Repository::open_in_memory().await.unwrap();
        let (_, chapters) = seeded(&repo, "empty", 1).await;

        let editor = ChapterContentEditor::load(&repo, &chapters[0]).await.unwrap();
        assert_eq!(editor.draft, ContentDraft::default());
        assert_eq!(editor.draft.status, ContentStatus::Draft);
        assert!(editor.questions.is_empty());
    }

    #[tokio::test]
    async fn minimal_content_round_trips() {
        let repo = Repository::open_in_memory().await.unwrap();
        let (_, chapters) = seeded(&repo, "round-trip", 1).await;

        let mut editor = ChapterContentEditor::new_empty(&chapters[0]);
        editor.set_value(FieldPath::SummaryEn, "A").unwrap();
        editor.set_value(FieldPath::SummaryCh, "甲").unwrap();
        editor.save(&repo, || {}).await.unwrap();

        let reloaded = ChapterContentEditor::load(&repo, &chapters[0]).await.unwrap();
        assert_eq!(reloaded.draft.summary_en, "A");
        assert_eq!(reloaded.draft.summary_ch, "甲");
        assert!(reloaded.draft.vocabulary.is_empty());
        assert!(reloaded.draft.key_points.is_empty());
        assert!(reloaded.questions.is_empty());
    }

    #[tokio::test]
    async fn removing_every_question_clears_stored_rows() {
        let repo = Repository::open_in_memory().await.unwrap();
        let (_, chapters) = seeded(&repo, "quiz", 1).await;

        let mut editor = ChapterContentEditor::new_empty(&chapters[0]);
        editor.draft.summary_en = "A".into();
        editor.draft.summary_ch = "甲".into();
        editor.add_question();
        editor.add_question();
        editor.save(&repo, || {}).await.unwrap();
        assert_eq!(repo.list_chapter_questions(&chapters[0]).await.unwrap().len(), 2);

        let mut editor = ChapterContentEditor::load(&repo, &chapters[0]).await.unwrap();
        while editor.remove_question(0) {}
        editor.save(&repo, || {}).await.unwrap();
        assert!(repo.list_chapter_questions(&chapters[0]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_form_never_reaches_the_store() {
        let repo = Repository::open_in_memory().await.unwrap();
        let (_, chapters) = seeded(&repo, "invalid", 1).await;

        let mut editor = ChapterContentEditor::new_empty(&chapters[0]);
        editor.draft.summary_en = "only english".into();
        let mut called = false;
        let err = editor.save(&repo, || called = true).await.unwrap_err();

        let AppError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors.get("summary_ch"), Some("Chinese summary is required"));
        assert!(!called);
        assert!(repo.get_chapter_content(&chapters[0]).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn callback_runs_after_commit() {
        let repo = Repository::open_in_memory().await.unwrap();
        let (_, chapters) = seeded(&repo, "callback", 1).await;

        let mut editor = ChapterContentEditor::new_empty(&chapters[0]);
        editor.draft.summary_en = "A".into();
        editor.draft.summary_ch = "甲".into();
        let mut saved = false;
        editor.save(&repo, || saved = true).await.unwrap();
        assert!(saved);
        assert!(!editor.dirty);
    }

    #[test]
    fn new_vocabulary_item_comes_with_one_example() {
        let mut editor = ChapterContentEditor::new_empty("c");
        let v = editor.add_vocabulary_item();
        assert!(editor.fields().contains(&FieldPath::ExampleEn(v, 0)));
        assert_eq!(editor.add_example(v), Some(1));
        assert_eq!(editor.add_example(9), None);
    }

    #[test]
    fn correct_answer_is_exclusive() {
        let mut editor = ChapterContentEditor::new_empty("c");
        let q = editor.add_question();
        assert!(editor.set_correct_answer(q, 2));
        editor.cycle(FieldPath::QuestionOption(q, 3));
        assert_eq!(editor.questions[q].correct_answer, 3);
        assert_eq!(
            editor.questions[q].quiz_options().iter().filter(|o| o.is_correct).count(),
            1
        );
        assert!(!editor.set_correct_answer(q, 4));
    }

    #[test]
    fn importance_is_clamped() {
        let mut editor = ChapterContentEditor::new_empty("c");
        let k = editor.add_key_point();
        assert_eq!(editor.draft.key_points[k].importance, 3);
        editor.set_importance(k, 9);
        assert_eq!(editor.draft.key_points[k].importance, 5);
        editor.set_value(FieldPath::KeyPointImportance(k), "0").unwrap();
        assert_eq!(editor.draft.key_points[k].importance, 1);
        assert!(editor.set_value(FieldPath::KeyPointImportance(k), "high").is_err());
    }

    #[test]
    fn tags_split_on_commas() {
        let mut editor = ChapterContentEditor::new_empty("c");
        editor.set_tags_from_input(" habits, identity ,, systems");
        assert_eq!(editor.draft.tags, vec!["habits", "identity", "systems"]);
        assert_eq!(editor.value(FieldPath::Tags), "habits, identity, systems");
    }

    #[test]
    fn answer_outside_options_fails_validation() {
        let mut editor = ChapterContentEditor::new_empty("c");
        editor.draft.summary_en = "A".into();
        editor.draft.summary_ch = "甲".into();
        let q = editor.add_question();
        editor.questions[q].correct_answer = 7;
        let AppError::Validation(errors) = editor.validate().unwrap_err() else {
            panic!("expected validation error");
        };
        assert!(errors.get("questions").unwrap().starts_with("Question 1"));
    }

    #[test]
    fn empty_audio_url_is_cleared() {
        let mut editor = ChapterContentEditor::new_empty("c");
        editor.set_value(FieldPath::AudioEn, "https://cdn.example.com/a.mp3").unwrap();
        assert!(editor.draft.audio_url_en.is_some());
        editor.set_value(FieldPath::AudioEn, "  ").unwrap();
        assert_eq!(editor.draft.audio_url_en, None);
    }

    #[test]
    fn draft_keeps_sections_it_did_not_produce() {
        let mut editor = ChapterContentEditor::new_empty("c");
        editor.draft.summary_ch = "舊的".into();
        editor.add_key_point();
        editor.apply_draft(GeneratedContent {
            summary_en: "New".into(),
            ..GeneratedContent::default()
        });
        assert_eq!(editor.draft.summary_en, "New");
        assert_eq!(editor.draft.summary_ch, "舊的");
        assert_eq!(editor.draft.key_points.len(), 1);
    }
}
