mod ad;
mod book;
mod content;
mod summary;

pub use ad::{AdFormat, AdPlacement, AdStatus, NewAdPlacement, ADSENSE_SETTING_KEY};
pub use book::{Book, Category, Chapter, ChapterListing, NewBook, NewChapter, SortDirection, CATEGORIES};
pub use content::{
    Bilingual, ChapterContent, ContentDraft, ContentStatus, Difficulty, KeyPoint, QuizOption,
    QuizQuestion, VocabularyItem,
};
pub use summary::{
    DraftStatus, GeneratedSummary, SummaryRequest, VocabularyEntry, LANGUAGE_OPTIONS,
};
