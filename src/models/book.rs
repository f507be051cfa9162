use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ContentStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub title: String,
    pub title_ch: String,
    pub author: String,
    pub cover_image: String,
    pub category_id: String,
    pub description: String,
    pub slug: String,
    pub affiliate_url: String,
    pub created_at: DateTime<Utc>,
}

/// Field set written by the admin book form.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewBook {
    pub title: String,
    pub title_ch: String,
    pub author: String,
    pub cover_image: String,
    pub category_id: String,
    pub description: String,
    pub slug: String,
    pub affiliate_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: String,
    pub book_id: String,
    pub title: String,
    pub title_ch: String,
    pub slug: String,
    pub order: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewChapter {
    pub book_id: String,
    pub title: String,
    pub title_ch: String,
    pub slug: String,
    pub order: i64,
}

impl NewChapter {
    /// Placeholder chapter appended after `existing` chapters.
    pub fn next_for(book_id: &str, existing: usize) -> Self {
        let order = existing as i64 + 1;
        Self {
            book_id: book_id.to_string(),
            title: format!("Chapter {order}"),
            title_ch: format!("第 {order} 章"),
            slug: format!("chapter-{order}"),
            order,
        }
    }
}

/// Chapter row in the admin list, with the status of its content if any.
#[derive(Debug, Clone, PartialEq)]
pub struct ChapterListing {
    pub chapter: Chapter,
    pub content_status: Option<ContentStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    NewestFirst,
    OldestFirst,
}

impl SortDirection {
    pub fn sql(&self) -> &'static str {
        match self {
            SortDirection::NewestFirst => "DESC",
            SortDirection::OldestFirst => "ASC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub id: &'static str,
    pub name_en: &'static str,
    pub name_ch: &'static str,
    pub slug: &'static str,
}

pub const CATEGORIES: &[Category] = &[
    Category {
        id: "self-improvement",
        name_en: "Self Improvement",
        name_ch: "自我成長",
        slug: "self-improvement",
    },
    Category {
        id: "business",
        name_en: "Business & Finance",
        name_ch: "商業金融",
        slug: "business",
    },
    Category {
        id: "relationships",
        name_en: "Relationships",
        name_ch: "人際關係",
        slug: "relationships",
    },
];

impl Category {
    pub fn find(id: &str) -> Option<&'static Category> {
        CATEGORIES.iter().find(|c| c.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_chapter_is_numbered_after_existing() {
        let chapter = NewChapter::next_for("b1", 2);
        assert_eq!(chapter.order, 3);
        assert_eq!(chapter.title, "Chapter 3");
        assert_eq!(chapter.title_ch, "第 3 章");
        assert_eq!(chapter.slug, "chapter-3");
    }

    #[test]
    fn book_serializes_camel_case() {
        let book = Book {
            id: "1".into(),
            title: "Atomic Habits".into(),
            title_ch: "原子習慣".into(),
            author: "James Clear".into(),
            cover_image: String::new(),
            category_id: "self-improvement".into(),
            description: String::new(),
            slug: "atomic-habits".into(),
            affiliate_url: String::new(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&book).unwrap();
        assert_eq!(json["titleCh"], "原子習慣");
        assert_eq!(json["categoryId"], "self-improvement");
        assert!(json.get("title_ch").is_none());
    }
}
