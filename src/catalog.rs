//! Read side of the site: every public page and JSON endpoint goes through
//! [`Catalog`]. Store failures are logged here once and handed back to the
//! caller, which picks the fallback (error page, inline message).

use tracing::{debug, error};

use crate::db::Repository;
use crate::error::Result;
use crate::models::{AdPlacement, AdStatus, Book, Chapter, ChapterContent, QuizQuestion, SortDirection};

#[derive(Debug, Clone, PartialEq)]
pub struct BookView {
    pub book: Book,
    pub chapters: Vec<Chapter>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChapterView {
    pub book: Book,
    pub chapter: Chapter,
    pub chapters: Vec<Chapter>,
    pub content: Option<ChapterContent>,
    pub questions: Vec<QuizQuestion>,
    pub previous: Option<Chapter>,
    pub next: Option<Chapter>,
}

/// Previous and next chapter of `current_id` within an already ordered list.
/// Both are `None` when the chapter is not in the list.
pub fn locate_neighbors<'a>(
    chapters: &'a [Chapter],
    current_id: &str,
) -> (Option<&'a Chapter>, Option<&'a Chapter>) {
    let Some(index) = chapters.iter().position(|c| c.id == current_id) else {
        return (None, None);
    };
    let previous = index.checked_sub(1).and_then(|i| chapters.get(i));
    let next = chapters.get(index + 1);
    (previous, next)
}

fn logged<T>(operation: &str, result: Result<T>) -> Result<T> {
    if let Err(e) = &result {
        error!(operation, error = %e, "catalog query failed");
    }
    result
}

#[derive(Clone)]
pub struct Catalog {
    repo: Repository,
    book_order: SortDirection,
}

impl Catalog {
    pub fn new(repo: Repository, book_order: SortDirection) -> Self {
        Self { repo, book_order }
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    pub async fn list_books(&self) -> Result<Vec<Book>> {
        logged("list_books", self.repo.list_books(self.book_order).await)
    }

    pub async fn get_book_by_slug(&self, slug: &str) -> Result<Option<Book>> {
        logged("get_book_by_slug", self.repo.get_book_by_slug(slug).await)
    }

    pub async fn list_chapters_by_book_id(&self, book_id: &str) -> Result<Vec<Chapter>> {
        logged(
            "list_chapters_by_book_id",
            self.repo.list_chapters_by_book_id(book_id).await,
        )
    }

    pub async fn get_chapter_content(&self, chapter_id: &str) -> Result<Option<ChapterContent>> {
        logged(
            "get_chapter_content",
            self.repo.get_chapter_content(chapter_id).await,
        )
    }

    pub async fn list_chapter_questions(&self, chapter_id: &str) -> Result<Vec<QuizQuestion>> {
        logged(
            "list_chapter_questions",
            self.repo.list_chapter_questions(chapter_id).await,
        )
    }

    pub async fn load_book_page(&self, book_slug: &str) -> Result<Option<BookView>> {
        let Some(book) = self.get_book_by_slug(book_slug).await? else {
            debug!(book_slug, "book not found");
            return Ok(None);
        };
        let chapters = self.list_chapters_by_book_id(&book.id).await?;
        Ok(Some(BookView { book, chapters }))
    }

    /// Book, then its ordered chapters, then content and questions of the
    /// chapter matching `chapter_slug`.
    pub async fn load_chapter_page(
        &self,
        book_slug: &str,
        chapter_slug: &str,
    ) -> Result<Option<ChapterView>> {
        let Some(BookView { book, chapters }) = self.load_book_page(book_slug).await? else {
            return Ok(None);
        };
        let Some(chapter) = chapters.iter().find(|c| c.slug == chapter_slug).cloned() else {
            debug!(book_slug, chapter_slug, "chapter not found");
            return Ok(None);
        };

        let content = self.get_chapter_content(&chapter.id).await?;
        let questions = self.list_chapter_questions(&chapter.id).await?;
        let (previous, next) = locate_neighbors(&chapters, &chapter.id);
        let (previous, next) = (previous.cloned(), next.cloned());

        Ok(Some(ChapterView {
            book,
            chapter,
            chapters,
            content,
            questions,
            previous,
            next,
        }))
    }

    pub async fn adsense_enabled(&self) -> Result<bool> {
        logged("adsense_enabled", self.repo.adsense_enabled().await)
    }

    /// Active placements for a page location, or nothing when ads are off.
    pub async fn ad_placements_for(&self, location: &str) -> Result<Vec<AdPlacement>> {
        if !self.adsense_enabled().await? {
            return Ok(Vec::new());
        }
        let placements = logged("list_ad_placements", self.repo.list_ad_placements().await)?;
        Ok(placements
            .into_iter()
            .filter(|p| p.status == AdStatus::Active && p.location == location)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::seeded;
    use crate::models::{AdFormat, ContentDraft, NewAdPlacement};

    fn chapter(id: &str, order: i64) -> Chapter {
        Chapter {
            id: id.into(),
            book_id: "b".into(),
            title: format!("Chapter {order}"),
            title_ch: format!("第 {order} 章"),
            slug: format!("chapter-{order}"),
            order,
        }
    }

    #[test]
    fn neighbors_of_middle_and_edges() {
        let chapters = vec![chapter("c1", 1), chapter("c2", 2), chapter("c3", 3)];

        let (prev, next) = locate_neighbors(&chapters, "c2");
        assert_eq!(prev.map(|c| c.order), Some(1));
        assert_eq!(next.map(|c| c.order), Some(3));

        let (prev, next) = locate_neighbors(&chapters, "c1");
        assert!(prev.is_none());
        assert_eq!(next.map(|c| c.order), Some(2));

        let (prev, next) = locate_neighbors(&chapters, "c3");
        assert_eq!(prev.map(|c| c.order), Some(2));
        assert!(next.is_none());
    }

    #[test]
    fn unknown_chapter_has_no_neighbors() {
        let chapters = vec![chapter("c1", 1)];
        assert_eq!(locate_neighbors(&chapters, "zz"), (None, None));
    }

    #[tokio::test]
    async fn chapter_page_resolves_slugs_and_neighbors() {
        let repo = Repository::open_in_memory().await.unwrap();
        let (_, chapters) = seeded(&repo, "atomic-habits", 3).await;
        let draft = ContentDraft {
            summary_en: "A".into(),
            summary_ch: "甲".into(),
            ..ContentDraft::default()
        };
        repo.save_chapter_content(&chapters[1], &draft, &[]).await.unwrap();

        let catalog = Catalog::new(repo, SortDirection::NewestFirst);
        let view = catalog
            .load_chapter_page("atomic-habits", "chapter-2")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(view.chapter.order, 2);
        assert_eq!(view.previous.map(|c| c.order), Some(1));
        assert_eq!(view.next.map(|c| c.order), Some(3));
        assert_eq!(view.content.map(|c| c.summary_ch), Some("甲".to_string()));
    }

    #[tokio::test]
    async fn missing_book_or_chapter_is_none() {
        let repo = Repository::open_in_memory().await.unwrap();
        seeded(&repo, "real", 1).await;
        let catalog = Catalog::new(repo, SortDirection::NewestFirst);

        assert!(catalog.load_book_page("fake").await.unwrap().is_none());
        assert!(catalog
            .load_chapter_page("real", "chapter-9")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn ads_are_empty_while_switch_is_off() {
        let repo = Repository::open_in_memory().await.unwrap();
        repo.insert_ad_placement(&NewAdPlacement {
            name: "Sidebar".into(),
            location: "chapter-sidebar".into(),
            ad_client: "ca-pub-1".into(),
            ad_slot: "1".into(),
            format: AdFormat::Auto,
            status: AdStatus::Active,
        })
        .await
        .unwrap();
        let catalog = Catalog::new(repo.clone(), SortDirection::NewestFirst);

        assert!(catalog.ad_placements_for("chapter-sidebar").await.unwrap().is_empty());
        repo.set_adsense_enabled(true).await.unwrap();
        assert_eq!(catalog.ad_placements_for("chapter-sidebar").await.unwrap().len(), 1);
        assert!(catalog.ad_placements_for("footer").await.unwrap().is_empty());
    }
}
