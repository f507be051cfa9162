//! Admin forms for books and ad placements. Both render through
//! [`AdminForm`] so the terminal UI can draw and edit them generically.

use std::sync::OnceLock;

use regex::Regex;
use url::Url;

use crate::error::{Result, ValidationErrors};
use crate::models::{AdPlacement, Book, Category, NewAdPlacement, NewBook, CATEGORIES};

static SLUG_PATTERN: OnceLock<Regex> = OnceLock::new();

fn slug_pattern() -> &'static Regex {
    SLUG_PATTERN.get_or_init(|| {
        Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("slug pattern is a valid regex")
    })
}

pub fn is_valid_slug(slug: &str) -> bool {
    slug_pattern().is_match(slug)
}

/// Empty is accepted; anything else must be an absolute http(s) URL.
pub fn is_valid_optional_url(value: &str) -> bool {
    let value = value.trim();
    value.is_empty()
        || Url::parse(value)
            .map(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some())
            .unwrap_or(false)
}

/// Lowercase, hyphen-joined slug built from a title.
pub fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

fn require(errors: &mut ValidationErrors, field: &'static str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.add(field, message);
    }
}

pub trait AdminForm {
    fn title(&self) -> String;
    fn labels(&self) -> &'static [&'static str];
    fn value(&self, index: usize) -> String;
    fn set_value(&mut self, index: usize, text: &str);
    /// Whether the field changes by cycling rather than by typing.
    fn is_choice(&self, index: usize) -> bool;
    fn cycle(&mut self, index: usize);
    fn validate(&self) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BookForm {
    /// Set when the form edits an existing book; saving updates it in place.
    pub editing_id: Option<String>,
    pub book: NewBook,
}

impl BookForm {
    const LABELS: &'static [&'static str] = &[
        "Title",
        "Chinese Title",
        "Author",
        "Category",
        "Slug",
        "Cover Image URL",
        "Affiliate URL",
        "Description",
    ];

    pub fn new() -> Self {
        Self {
            editing_id: None,
            book: NewBook {
                category_id: CATEGORIES[0].id.to_string(),
                ..NewBook::default()
            },
        }
    }

    pub fn edit(book: &Book) -> Self {
        Self {
            editing_id: Some(book.id.clone()),
            book: NewBook {
                title: book.title.clone(),
                title_ch: book.title_ch.clone(),
                author: book.author.clone(),
                cover_image: book.cover_image.clone(),
                category_id: book.category_id.clone(),
                description: book.description.clone(),
                slug: book.slug.clone(),
                affiliate_url: book.affiliate_url.clone(),
            },
        }
    }

    fn category_label(&self) -> String {
        match Category::find(&self.book.category_id) {
            Some(c) => format!("{} / {}", c.name_en, c.name_ch),
            None => self.book.category_id.clone(),
        }
    }
}

impl AdminForm for BookForm {
    fn title(&self) -> String {
        if self.editing_id.is_some() {
            "Edit Book".to_string()
        } else {
            "Add New Book".to_string()
        }
    }

    fn labels(&self) -> &'static [&'static str] {
        Self::LABELS
    }

    fn value(&self, index: usize) -> String {
        let b = &self.book;
        match index {
            0 => b.title.clone(),
            1 => b.title_ch.clone(),
            2 => b.author.clone(),
            3 => self.category_label(),
            4 => b.slug.clone(),
            5 => b.cover_image.clone(),
            6 => b.affiliate_url.clone(),
            7 => b.description.clone(),
            _ => String::new(),
        }
    }

    fn set_value(&mut self, index: usize, text: &str) {
        let b = &mut self.book;
        match index {
            0 => {
                // New books follow their title until a slug is typed.
                if self.editing_id.is_none() && (b.slug.is_empty() || b.slug == slugify(&b.title)) {
                    b.slug = slugify(text);
                }
                b.title = text.to_string();
            }
            1 => b.title_ch = text.to_string(),
            2 => b.author = text.to_string(),
            4 => b.slug = text.trim().to_string(),
            5 => b.cover_image = text.trim().to_string(),
            6 => b.affiliate_url = text.trim().to_string(),
            7 => b.description = text.to_string(),
            _ => {}
        }
    }

    fn is_choice(&self, index: usize) -> bool {
        index == 3
    }

    fn cycle(&mut self, index: usize) {
        if index != 3 {
            return;
        }
        let current = CATEGORIES
            .iter()
            .position(|c| c.id == self.book.category_id);
        let next = current.map(|i| (i + 1) % CATEGORIES.len()).unwrap_or(0);
        self.book.category_id = CATEGORIES[next].id.to_string();
    }

    fn validate(&self) -> Result<()> {
        let b = &self.book;
        let mut errors = ValidationErrors::new();
        require(&mut errors, "title", &b.title, "Title is required");
        require(&mut errors, "title_ch", &b.title_ch, "Chinese title is required");
        require(&mut errors, "author", &b.author, "Author is required");
        require(&mut errors, "description", &b.description, "Description is required");
        if b.slug.trim().is_empty() {
            errors.add("slug", "Slug is required");
        } else if !is_valid_slug(b.slug.trim()) {
            errors.add(
                "slug",
                "Slug may only contain lowercase letters, digits and single hyphens",
            );
        }
        if Category::find(&b.category_id).is_none() {
            errors.add("category_id", "Unknown category");
        }
        if !is_valid_optional_url(&b.cover_image) {
            errors.add("cover_image", "Cover image must be an http(s) URL");
        }
        if !is_valid_optional_url(&b.affiliate_url) {
            errors.add("affiliate_url", "Affiliate URL must be an http(s) URL");
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AdPlacementForm {
    pub editing_id: Option<String>,
    pub placement: NewAdPlacement,
}

impl AdPlacementForm {
    const LABELS: &'static [&'static str] =
        &["Name", "Location", "Ad Client", "Ad Slot", "Format", "Status"];

    pub fn new() -> Self {
        Self::default()
    }

    pub fn edit(placement: &AdPlacement) -> Self {
        Self {
            editing_id: Some(placement.id.clone()),
            placement: NewAdPlacement::from(placement),
        }
    }
}

impl AdminForm for AdPlacementForm {
    fn title(&self) -> String {
        if self.editing_id.is_some() {
            "Edit Ad Placement".to_string()
        } else {
            "New Ad Placement".to_string()
        }
    }

    fn labels(&self) -> &'static [&'static str] {
        Self::LABELS
    }

    fn value(&self, index: usize) -> String {
        let p = &self.placement;
        match index {
            0 => p.name.clone(),
            1 => p.location.clone(),
            2 => p.ad_client.clone(),
            3 => p.ad_slot.clone(),
            4 => p.format.as_str().to_string(),
            5 => p.status.as_str().to_string(),
            _ => String::new(),
        }
    }

    fn set_value(&mut self, index: usize, text: &str) {
        let p = &mut self.placement;
        match index {
            0 => p.name = text.to_string(),
            1 => p.location = text.trim().to_string(),
            2 => p.ad_client = text.trim().to_string(),
            3 => p.ad_slot = text.trim().to_string(),
            _ => {}
        }
    }

    fn is_choice(&self, index: usize) -> bool {
        matches!(index, 4 | 5)
    }

    fn cycle(&mut self, index: usize) {
        match index {
            4 => self.placement.format = self.placement.format.cycle(),
            5 => self.placement.status = self.placement.status.cycle(),
            _ => {}
        }
    }

    fn validate(&self) -> Result<()> {
        let p = &self.placement;
        let mut errors = ValidationErrors::new();
        require(&mut errors, "name", &p.name, "Name is required");
        require(&mut errors, "location", &p.location, "Location is required");
        require(&mut errors, "ad_client", &p.ad_client, "Ad client is required");
        require(&mut errors, "ad_slot", &p.ad_slot, "Ad slot is required");
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::{AdFormat, AdStatus};

    fn filled_book_form() -> BookForm {
        let mut form = BookForm::new();
        form.set_value(0, "Deep Work");
        form.set_value(1, "深度工作力");
        form.set_value(2, "Cal Newport");
        form.set_value(7, "Rules for focused success");
        form
    }

    #[test]
    fn slug_rules() {
        assert!(is_valid_slug("atomic-habits"));
        assert!(is_valid_slug("chapter-12"));
        assert!(!is_valid_slug("Atomic-Habits"));
        assert!(!is_valid_slug("double--hyphen"));
        assert!(!is_valid_slug("-leading"));
        assert!(!is_valid_slug("with space"));
    }

    #[test]
    fn urls_must_be_http() {
        assert!(is_valid_optional_url(""));
        assert!(is_valid_optional_url("https://example.com/cover.jpg"));
        assert!(!is_valid_optional_url("ftp://example.com/file"));
        assert!(!is_valid_optional_url("not a url"));
    }

    #[test]
    fn title_fills_slug_for_new_books() {
        let form = filled_book_form();
        assert_eq!(form.book.slug, "deep-work");
        assert!(form.validate().is_ok());
    }

    #[test]
    fn typed_slug_is_kept_when_title_changes() {
        let mut form = filled_book_form();
        form.set_value(4, "deep-work-2016");
        form.set_value(0, "Deep Work (Revised)");
        assert_eq!(form.book.slug, "deep-work-2016");
    }

    #[test]
    fn book_form_reports_each_field() {
        let mut form = BookForm::new();
        form.set_value(4, "Bad Slug");
        form.set_value(6, "amazon");
        let AppError::Validation(errors) = form.validate().unwrap_err() else {
            panic!("expected validation error");
        };
        assert_eq!(errors.get("title"), Some("Title is required"));
        assert_eq!(errors.get("description"), Some("Description is required"));
        assert!(errors.get("slug").is_some());
        assert_eq!(
            errors.get("affiliate_url"),
            Some("Affiliate URL must be an http(s) URL")
        );
    }

    #[test]
    fn blank_description_is_rejected() {
        let mut form = filled_book_form();
        form.set_value(7, "   ");
        let AppError::Validation(errors) = form.validate().unwrap_err() else {
            panic!("expected validation error");
        };
        assert_eq!(errors.get("description"), Some("Description is required"));
        assert_eq!(errors.get("title"), None);
    }

    #[test]
    fn category_cycles_through_the_list() {
        let mut form = BookForm::new();
        assert_eq!(form.book.category_id, "self-improvement");
        form.cycle(3);
        assert_eq!(form.book.category_id, "business");
        form.cycle(3);
        form.cycle(3);
        assert_eq!(form.book.category_id, "self-improvement");
    }

    #[test]
    fn placement_form_requires_identifiers() {
        let mut form = AdPlacementForm::new();
        form.set_value(0, "Sidebar");
        let AppError::Validation(errors) = form.validate().unwrap_err() else {
            panic!("expected validation error");
        };
        assert_eq!(errors.get("ad_slot"), Some("Ad slot is required"));
        assert_eq!(errors.get("name"), None);

        form.set_value(1, "chapter-sidebar");
        form.set_value(2, "ca-pub-123");
        form.set_value(3, "456");
        form.cycle(4);
        form.cycle(5);
        assert!(form.validate().is_ok());
        assert_eq!(form.placement.format, AdFormat::Horizontal);
        assert_eq!(form.placement.status, AdStatus::Paused);
    }
}
