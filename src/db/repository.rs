use rusqlite::{params, OptionalExtension, Transaction};
use tokio_rusqlite::Connection;

use crate::error::{AppError, Result, SaveStage};
use crate::models::{
    AdPlacement, Book, Chapter, ChapterContent, ChapterListing, ContentDraft, ContentStatus, NewAdPlacement,
    NewBook, NewChapter, QuizQuestion, SortDirection, ADSENSE_SETTING_KEY,
};

use super::mapping::{
    ad_placement_columns, book_columns, content_columns, question_columns, setting_enabled,
    AdPlacementRow, BookRow, ChapterRow, ContentColumns, ContentRow, QuestionRow,
};
use super::schema::SCHEMA;

type StagedError = (SaveStage, rusqlite::Error);

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[derive(Clone)]
pub struct Repository {
    conn: Connection,
}

impl Repository {
    pub async fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path).await?;
        Self::init(conn).await
    }

    #[cfg(test)]
    pub async fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().await?;
        Self::init(conn).await
    }

    async fn init(conn: Connection) -> Result<Self> {
        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await?;

        Ok(Self { conn })
    }

    // Book operations

    pub async fn list_books(&self, direction: SortDirection) -> Result<Vec<Book>> {
        let sql = format!(
            "SELECT {} FROM books ORDER BY created_at {dir}, rowid {dir}",
            BookRow::COLUMNS,
            dir = direction.sql()
        );
        let rows = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt
                    .query_map([], BookRow::read)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await?;
        Ok(rows.into_iter().map(Book::from).collect())
    }

    pub async fn get_book_by_slug(&self, slug: &str) -> Result<Option<Book>> {
        let slug = slug.to_string();
        let row = self
            .conn
            .call(move |conn| {
                let sql = format!("SELECT {} FROM books WHERE slug = ?1", BookRow::COLUMNS);
                let row = conn
                    .query_row(&sql, params![slug], BookRow::read)
                    .optional()?;
                Ok(row)
            })
            .await?;
        Ok(row.map(Book::from))
    }

    pub async fn get_book(&self, id: &str) -> Result<Option<Book>> {
        let id = id.to_string();
        let row = self
            .conn
            .call(move |conn| {
                let sql = format!("SELECT {} FROM books WHERE id = ?1", BookRow::COLUMNS);
                let row = conn.query_row(&sql, params![id], BookRow::read).optional()?;
                Ok(row)
            })
            .await?;
        Ok(row.map(Book::from))
    }

    pub async fn insert_book(&self, book: &NewBook) -> Result<String> {
        let columns = book_columns(book);
        let id = new_id();
        let book_id = id.clone();
        self.conn
            .call(move |conn| {
                conn.execute(
                    r#"INSERT INTO books (id, title, title_ch, author, cover_image, category_id, description, slug, affiliate_url)
                       VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"#,
                    params![
                        book_id,
                        columns.title,
                        columns.title_ch,
                        columns.author,
                        columns.cover_image,
                        columns.category_id,
                        columns.description,
                        columns.slug,
                        columns.affiliate_url,
                    ],
                )?;
                Ok(())
            })
            .await?;
        Ok(id)
    }

    /// Returns false when no book has this id.
    pub async fn update_book(&self, id: &str, book: &NewBook) -> Result<bool> {
        let columns = book_columns(book);
        let id = id.to_string();
        let changed = self
            .conn
            .call(move |conn| {
                let changed = conn.execute(
                    r#"UPDATE books SET title = ?1, title_ch = ?2, author = ?3, cover_image = ?4,
                           category_id = ?5, description = ?6, slug = ?7, affiliate_url = ?8,
                           updated_at = datetime('now')
                       WHERE id = ?9"#,
                    params![
                        columns.title,
                        columns.title_ch,
                        columns.author,
                        columns.cover_image,
                        columns.category_id,
                        columns.description,
                        columns.slug,
                        columns.affiliate_url,
                        id,
                    ],
                )?;
                Ok(changed)
            })
            .await?;
        Ok(changed > 0)
    }

    /// Chapters, content and questions of the book go with it (FK cascade).
    pub async fn delete_book(&self, id: &str) -> Result<bool> {
        let id = id.to_string();
        let changed = self
            .conn
            .call(move |conn| Ok(conn.execute("DELETE FROM books WHERE id = ?1", params![id])?))
            .await?;
        Ok(changed > 0)
    }

    // Chapter operations

    pub async fn list_chapters_by_book_id(&self, book_id: &str) -> Result<Vec<Chapter>> {
        let book_id = book_id.to_string();
        let rows = self
            .conn
            .call(move |conn| {
                let sql = format!(
                    r#"SELECT {} FROM chapters WHERE book_id = ?1 ORDER BY "order" ASC, title ASC"#,
                    ChapterRow::COLUMNS
                );
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt
                    .query_map(params![book_id], ChapterRow::read)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await?;
        Ok(rows.into_iter().map(Chapter::from).collect())
    }

    /// Chapters of a book joined with the status of their content row.
    pub async fn list_chapter_listings(&self, book_id: &str) -> Result<Vec<ChapterListing>> {
        let book_id = book_id.to_string();
        let rows = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    r#"SELECT c.id, c.book_id, c.title, c.title_ch, c.slug, c."order",
                              cc.status AS content_status
                       FROM chapters c
                       LEFT JOIN chapter_content cc ON cc.chapter_id = c.id
                       WHERE c.book_id = ?1
                       ORDER BY c."order" ASC, c.title ASC"#,
                )?;
                let rows = stmt
                    .query_map(params![book_id], |row| {
                        Ok((ChapterRow::read(row)?, row.get::<_, Option<String>>("content_status")?))
                    })?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await?;

        rows.into_iter()
            .map(|(chapter, status)| {
                let content_status = status
                    .map(|s| s.parse::<ContentStatus>().map_err(AppError::Mapping))
                    .transpose()?;
                Ok(ChapterListing {
                    chapter: Chapter::from(chapter),
                    content_status,
                })
            })
            .collect()
    }

    pub async fn get_chapter(&self, id: &str) -> Result<Option<Chapter>> {
        let id = id.to_string();
        let row = self
            .conn
            .call(move |conn| {
                let sql = format!("SELECT {} FROM chapters WHERE id = ?1", ChapterRow::COLUMNS);
                let row = conn
                    .query_row(&sql, params![id], ChapterRow::read)
                    .optional()?;
                Ok(row)
            })
            .await?;
        Ok(row.map(Chapter::from))
    }

    pub async fn insert_chapter(&self, chapter: NewChapter) -> Result<String> {
        let id = new_id();
        let chapter_id = id.clone();
        self.conn
            .call(move |conn| {
                conn.execute(
                    r#"INSERT INTO chapters (id, book_id, title, title_ch, slug, "order")
                       VALUES (?1, ?2, ?3, ?4, ?5, ?6)"#,
                    params![
                        chapter_id,
                        chapter.book_id,
                        chapter.title,
                        chapter.title_ch,
                        chapter.slug,
                        chapter.order,
                    ],
                )?;
                Ok(())
            })
            .await?;
        Ok(id)
    }

    pub async fn delete_chapter(&self, id: &str) -> Result<bool> {
        let id = id.to_string();
        let changed = self
            .conn
            .call(move |conn| {
                Ok(conn.execute("DELETE FROM chapters WHERE id = ?1", params![id])?)
            })
            .await?;
        Ok(changed > 0)
    }

    // Chapter content operations

    pub async fn get_chapter_content(&self, chapter_id: &str) -> Result<Option<ChapterContent>> {
        let chapter_id = chapter_id.to_string();
        let row = self
            .conn
            .call(move |conn| {
                let sql = format!(
                    "SELECT {} FROM chapter_content WHERE chapter_id = ?1",
                    ContentRow::COLUMNS
                );
                let row = conn
                    .query_row(&sql, params![chapter_id], ContentRow::read)
                    .optional()?;
                Ok(row)
            })
            .await?;
        row.map(ChapterContent::try_from).transpose()
    }

    pub async fn list_chapter_questions(&self, chapter_id: &str) -> Result<Vec<QuizQuestion>> {
        let chapter_id = chapter_id.to_string();
        let rows = self
            .conn
            .call(move |conn| {
                let sql = format!(
                    "SELECT {} FROM chapter_questions WHERE chapter_id = ?1 ORDER BY position ASC, rowid ASC",
                    QuestionRow::COLUMNS
                );
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt
                    .query_map(params![chapter_id], QuestionRow::read)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await?;
        rows.into_iter().map(QuizQuestion::try_from).collect()
    }

    /// Upserts the content row and replaces every question of the chapter in
    /// one transaction. On failure nothing is changed and the error names the
    /// step that failed.
    pub async fn save_chapter_content(
        &self,
        chapter_id: &str,
        draft: &ContentDraft,
        questions: &[QuizQuestion],
    ) -> Result<()> {
        let chapter_id = chapter_id.to_string();
        let columns = content_columns(draft)?;
        let questions = questions
            .iter()
            .map(question_columns)
            .collect::<Result<Vec<_>>>()?;

        let outcome = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                match replace_content(&tx, &chapter_id, &columns, &questions) {
                    Ok(()) => {
                        tx.commit()?;
                        Ok(Ok(()))
                    }
                    // Dropping the transaction rolls it back.
                    Err(staged) => Ok(Err(staged)),
                }
            })
            .await?;

        outcome.map_err(|(stage, source)| AppError::ContentSave { stage, source })
    }

    /// Upserts many content rows keyed by chapter id; all or nothing.
    pub async fn upsert_chapter_contents(&self, rows: Vec<(String, ContentDraft)>) -> Result<usize> {
        let rows = rows
            .into_iter()
            .map(|(chapter_id, draft)| Ok((chapter_id, content_columns(&draft)?)))
            .collect::<Result<Vec<_>>>()?;

        let written = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                for (chapter_id, columns) in &rows {
                    upsert_content(&tx, chapter_id, columns)?;
                }
                tx.commit()?;
                Ok(rows.len())
            })
            .await?;
        Ok(written)
    }

    // Ad placement operations

    pub async fn list_ad_placements(&self) -> Result<Vec<AdPlacement>> {
        let rows = self
            .conn
            .call(|conn| {
                let sql = format!(
                    "SELECT {} FROM ad_placements ORDER BY created_at DESC, rowid DESC",
                    AdPlacementRow::COLUMNS
                );
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt
                    .query_map([], AdPlacementRow::read)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await?;
        rows.into_iter().map(AdPlacement::try_from).collect()
    }

    pub async fn insert_ad_placement(&self, placement: &NewAdPlacement) -> Result<String> {
        let id = new_id();
        let row = ad_placement_columns(&id, placement);
        self.conn
            .call(move |conn| {
                conn.execute(
                    r#"INSERT INTO ad_placements (id, name, location, ad_client, ad_slot, format, status)
                       VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"#,
                    params![
                        row.id,
                        row.name,
                        row.location,
                        row.ad_client,
                        row.ad_slot,
                        row.format,
                        row.status,
                    ],
                )?;
                Ok(())
            })
            .await?;
        Ok(id)
    }

    pub async fn update_ad_placement(&self, id: &str, placement: &NewAdPlacement) -> Result<bool> {
        let row = ad_placement_columns(id, placement);
        let changed = self
            .conn
            .call(move |conn| {
                let changed = conn.execute(
                    r#"UPDATE ad_placements SET name = ?1, location = ?2, ad_client = ?3, ad_slot = ?4,
                           format = ?5, status = ?6, updated_at = datetime('now')
                       WHERE id = ?7"#,
                    params![
                        row.name,
                        row.location,
                        row.ad_client,
                        row.ad_slot,
                        row.format,
                        row.status,
                        row.id,
                    ],
                )?;
                Ok(changed)
            })
            .await?;
        Ok(changed > 0)
    }

    pub async fn delete_ad_placement(&self, id: &str) -> Result<bool> {
        let id = id.to_string();
        let changed = self
            .conn
            .call(move |conn| {
                Ok(conn.execute("DELETE FROM ad_placements WHERE id = ?1", params![id])?)
            })
            .await?;
        Ok(changed > 0)
    }

    // Site settings

    pub async fn adsense_enabled(&self) -> Result<bool> {
        let raw = self
            .conn
            .call(|conn| {
                let raw = conn
                    .query_row(
                        "SELECT value FROM site_settings WHERE key = ?1",
                        params![ADSENSE_SETTING_KEY],
                        |row| row.get::<_, String>(0),
                    )
                    .optional()?;
                Ok(raw)
            })
            .await?;
        Ok(setting_enabled(raw.as_deref()))
    }

    pub async fn set_adsense_enabled(&self, enabled: bool) -> Result<()> {
        let value = serde_json::json!({ "enabled": enabled }).to_string();
        self.conn
            .call(move |conn| {
                conn.execute(
                    r#"INSERT INTO site_settings (key, value) VALUES (?1, ?2)
                       ON CONFLICT(key) DO UPDATE SET
                           value = excluded.value,
                           updated_at = datetime('now')"#,
                    params![ADSENSE_SETTING_KEY, value],
                )?;
                Ok(())
            })
            .await?;
        Ok(())
    }
}

fn upsert_content(
    tx: &Transaction,
    chapter_id: &str,
    columns: &ContentColumns,
) -> rusqlite::Result<usize> {
    tx.execute(
        r#"INSERT INTO chapter_content (id, chapter_id, summary_en, summary_ch, vocabulary, key_points,
                                        status, audio_url_en, audio_url_ch, tags)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
           ON CONFLICT(chapter_id) DO UPDATE SET
               summary_en = excluded.summary_en,
               summary_ch = excluded.summary_ch,
               vocabulary = excluded.vocabulary,
               key_points = excluded.key_points,
               status = excluded.status,
               audio_url_en = excluded.audio_url_en,
               audio_url_ch = excluded.audio_url_ch,
               tags = excluded.tags,
               updated_at = datetime('now')"#,
        params![
            new_id(),
            chapter_id,
            columns.summary_en,
            columns.summary_ch,
            columns.vocabulary,
            columns.key_points,
            columns.status,
            columns.audio_url_en,
            columns.audio_url_ch,
            columns.tags,
        ],
    )
}

fn replace_content(
    tx: &Transaction,
    chapter_id: &str,
    columns: &ContentColumns,
    questions: &[QuestionRow],
) -> std::result::Result<(), StagedError> {
    upsert_content(tx, chapter_id, columns).map_err(|e| (SaveStage::UpsertContent, e))?;

    tx.execute(
        "DELETE FROM chapter_questions WHERE chapter_id = ?1",
        params![chapter_id],
    )
    .map_err(|e| (SaveStage::DeleteQuestions, e))?;

    for (position, question) in questions.iter().enumerate() {
        tx.execute(
            r#"INSERT INTO chapter_questions (id, chapter_id, position, question, options, correct_answer,
                                              explanation_en, explanation_ch)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"#,
            params![
                new_id(),
                chapter_id,
                position as i64,
                question.question,
                question.options,
                question.correct_answer,
                question.explanation_en,
                question.explanation_ch,
            ],
        )
        .map_err(|e| (SaveStage::InsertQuestions, e))?;
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{AdFormat, AdStatus, Bilingual};

    pub(crate) fn sample_book(slug: &str) -> NewBook {
        NewBook {
            title: "Atomic Habits".into(),
            title_ch: "原子習慣".into(),
            author: "James Clear".into(),
            cover_image: String::new(),
            category_id: "self-improvement".into(),
            description: "Tiny changes, remarkable results".into(),
            slug: slug.into(),
            affiliate_url: String::new(),
        }
    }

    /// Book with chapters `chapter-1..=n` in order.
    pub(crate) async fn seeded(repo: &Repository, slug: &str, chapters: usize) -> (String, Vec<String>) {
        let book_id = repo.insert_book(&sample_book(slug)).await.unwrap();
        let mut ids = Vec::new();
        for i in 0..chapters {
            let id = repo
                .insert_chapter(NewChapter::next_for(&book_id, i))
                .await
                .unwrap();
            ids.push(id);
        }
        (book_id, ids)
    }

    fn question(text: &str, options: usize, correct: usize) -> QuizQuestion {
        QuizQuestion {
            question: text.into(),
            options: (0..options).map(|i| format!("option {i}")).collect(),
            correct_answer: correct,
            explanation: Bilingual::new("because", "因為"),
        }
    }

    #[tokio::test]
    async fn books_list_in_configured_creation_order() {
        let repo = Repository::open_in_memory().await.unwrap();
        repo.insert_book(&sample_book("first")).await.unwrap();
        repo.insert_book(&sample_book("second")).await.unwrap();

        let newest: Vec<String> = repo
            .list_books(SortDirection::NewestFirst)
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.slug)
            .collect();
        assert_eq!(newest, vec!["second", "first"]);

        let oldest = repo.list_books(SortDirection::OldestFirst).await.unwrap();
        assert_eq!(oldest[0].slug, "first");
    }

    #[tokio::test]
    async fn unknown_slug_is_absent_not_error() {
        let repo = Repository::open_in_memory().await.unwrap();
        assert_eq!(repo.get_book_by_slug("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn duplicate_slug_is_a_store_failure() {
        let repo = Repository::open_in_memory().await.unwrap();
        repo.insert_book(&sample_book("dup")).await.unwrap();
        assert!(repo.insert_book(&sample_book("dup")).await.is_err());
    }

    #[tokio::test]
    async fn update_book_rewrites_fields() {
        let repo = Repository::open_in_memory().await.unwrap();
        let id = repo.insert_book(&sample_book("habits")).await.unwrap();
        let mut changed = sample_book("atomic-habits");
        changed.affiliate_url = "https://example.com/buy".into();
        assert!(repo.update_book(&id, &changed).await.unwrap());

        let book = repo.get_book(&id).await.unwrap().unwrap();
        assert_eq!(book.slug, "atomic-habits");
        assert_eq!(book.affiliate_url, "https://example.com/buy");
        assert!(!repo.update_book("nope", &changed).await.unwrap());
    }

    #[tokio::test]
    async fn chapters_sort_by_order_not_insertion() {
        let repo = Repository::open_in_memory().await.unwrap();
        let book_id = repo.insert_book(&sample_book("b")).await.unwrap();
        for order in [3, 1, 2] {
            let mut chapter = NewChapter::next_for(&book_id, order - 1);
            chapter.order = order as i64;
            repo.insert_chapter(chapter).await.unwrap();
        }
        let orders: Vec<i64> = repo
            .list_chapters_by_book_id(&book_id)
            .await
            .unwrap()
            .iter()
            .map(|c| c.order)
            .collect();
        assert_eq!(orders, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn deleting_a_book_cascades_to_its_chapters_and_content() {
        let repo = Repository::open_in_memory().await.unwrap();
        let (book_id, chapters) = seeded(&repo, "gone", 1).await;
        let draft = ContentDraft {
            summary_en: "A".into(),
            summary_ch: "甲".into(),
            ..ContentDraft::default()
        };
        repo.save_chapter_content(&chapters[0], &draft, &[question("Q", 4, 0)])
            .await
            .unwrap();

        assert!(repo.delete_book(&book_id).await.unwrap());
        assert_eq!(repo.get_chapter(&chapters[0]).await.unwrap(), None);
        assert_eq!(repo.get_chapter_content(&chapters[0]).await.unwrap(), None);
        assert!(repo.list_chapter_questions(&chapters[0]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn chapter_listing_reports_content_status() {
        let repo = Repository::open_in_memory().await.unwrap();
        let (book_id, chapters) = seeded(&repo, "listing", 2).await;
        let draft = ContentDraft {
            summary_en: "A".into(),
            summary_ch: "甲".into(),
            status: ContentStatus::Published,
            ..ContentDraft::default()
        };
        repo.save_chapter_content(&chapters[1], &draft, &[]).await.unwrap();

        let listing = repo.list_chapter_listings(&book_id).await.unwrap();
        assert_eq!(listing[0].content_status, None);
        assert_eq!(listing[1].content_status, Some(ContentStatus::Published));
    }

    #[tokio::test]
    async fn save_upserts_one_row_per_chapter() {
        let repo = Repository::open_in_memory().await.unwrap();
        let (_, chapters) = seeded(&repo, "upsert", 1).await;
        let mut draft = ContentDraft {
            summary_en: "first".into(),
            summary_ch: "一".into(),
            ..ContentDraft::default()
        };
        repo.save_chapter_content(&chapters[0], &draft, &[]).await.unwrap();
        let first = repo.get_chapter_content(&chapters[0]).await.unwrap().unwrap();

        draft.summary_en = "second".into();
        repo.save_chapter_content(&chapters[0], &draft, &[]).await.unwrap();
        let second = repo.get_chapter_content(&chapters[0]).await.unwrap().unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.summary_en, "second");
    }

    #[tokio::test]
    async fn questions_keep_editor_order() {
        let repo = Repository::open_in_memory().await.unwrap();
        let (_, chapters) = seeded(&repo, "order", 1).await;
        let draft = ContentDraft {
            summary_en: "A".into(),
            summary_ch: "甲".into(),
            ..ContentDraft::default()
        };
        let questions = vec![question("one", 4, 2), question("two", 2, 1), question("three", 3, 0)];
        repo.save_chapter_content(&chapters[0], &draft, &questions)
            .await
            .unwrap();
        assert_eq!(repo.list_chapter_questions(&chapters[0]).await.unwrap(), questions);
    }

    #[tokio::test]
    async fn failed_question_insert_rolls_back_the_whole_save() {
        let repo = Repository::open_in_memory().await.unwrap();
        let (_, chapters) = seeded(&repo, "atomic", 1).await;
        let original = ContentDraft {
            summary_en: "kept".into(),
            summary_ch: "保留".into(),
            ..ContentDraft::default()
        };
        let kept_questions = vec![question("kept?", 4, 1)];
        repo.save_chapter_content(&chapters[0], &original, &kept_questions)
            .await
            .unwrap();

        // The second question points past its options; the store rejects it
        // after the content upsert and the question delete already ran.
        let replacement = ContentDraft {
            summary_en: "lost".into(),
            summary_ch: "遺失".into(),
            ..ContentDraft::default()
        };
        let err = repo
            .save_chapter_content(
                &chapters[0],
                &replacement,
                &[question("fine", 4, 0), question("broken", 2, 7)],
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::ContentSave {
                stage: SaveStage::InsertQuestions,
                ..
            }
        ));

        let content = repo.get_chapter_content(&chapters[0]).await.unwrap().unwrap();
        assert_eq!(content.summary_en, "kept");
        assert_eq!(
            repo.list_chapter_questions(&chapters[0]).await.unwrap(),
            kept_questions
        );
    }

    #[tokio::test]
    async fn save_for_unknown_chapter_fails_at_upsert() {
        let repo = Repository::open_in_memory().await.unwrap();
        let draft = ContentDraft {
            summary_en: "A".into(),
            summary_ch: "甲".into(),
            ..ContentDraft::default()
        };
        let err = repo
            .save_chapter_content("no-such-chapter", &draft, &[])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::ContentSave {
                stage: SaveStage::UpsertContent,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn batch_upsert_is_all_or_nothing() {
        let repo = Repository::open_in_memory().await.unwrap();
        let (_, chapters) = seeded(&repo, "batch", 1).await;
        let draft = ContentDraft {
            summary_en: "A".into(),
            summary_ch: "甲".into(),
            ..ContentDraft::default()
        };
        let result = repo
            .upsert_chapter_contents(vec![
                (chapters[0].clone(), draft.clone()),
                ("missing-chapter".into(), draft),
            ])
            .await;
        assert!(result.is_err());
        assert_eq!(repo.get_chapter_content(&chapters[0]).await.unwrap(), None);
    }

    #[tokio::test]
    async fn ad_placements_crud() {
        let repo = Repository::open_in_memory().await.unwrap();
        let mut placement = NewAdPlacement {
            name: "Sidebar".into(),
            location: "chapter-sidebar".into(),
            ad_client: "ca-pub-1".into(),
            ad_slot: "111".into(),
            format: AdFormat::Vertical,
            status: AdStatus::Active,
        };
        let id = repo.insert_ad_placement(&placement).await.unwrap();

        placement.status = AdStatus::Paused;
        assert!(repo.update_ad_placement(&id, &placement).await.unwrap());
        let listed = repo.list_ad_placements().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].status, AdStatus::Paused);
        assert_eq!(listed[0].format, AdFormat::Vertical);

        assert!(repo.delete_ad_placement(&id).await.unwrap());
        assert!(repo.list_ad_placements().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn adsense_switch_defaults_off_and_toggles() {
        let repo = Repository::open_in_memory().await.unwrap();
        assert!(!repo.adsense_enabled().await.unwrap());
        repo.set_adsense_enabled(true).await.unwrap();
        assert!(repo.adsense_enabled().await.unwrap());
        repo.set_adsense_enabled(false).await.unwrap();
        assert!(!repo.adsense_enabled().await.unwrap());
    }
}
