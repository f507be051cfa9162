use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::ai::{DraftRequest, Drafter, GeneratedContent};
use crate::db::Repository;
use crate::editor::{ChapterContentEditor, FieldPath};
use crate::error::Result;
use crate::forms::{AdPlacementForm, AdminForm, BookForm};
use crate::models::{AdPlacement, Book, Chapter, ChapterListing, DraftStatus, NewChapter, SortDirection};
use crate::tui::AppAction;

const SPINNER_FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

// Message for a finished background draft
pub struct DraftResult {
    pub chapter_id: String,
    pub result: std::result::Result<GeneratedContent, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminTab {
    Content,
    Ads,
}

impl AdminTab {
    pub const ALL: [AdminTab; 2] = [AdminTab::Content, AdminTab::Ads];

    /// `/admin/adsense` opens the ads tab; every other admin route is content.
    pub fn from_route(route: &str) -> Self {
        if route.trim_end_matches('/').ends_with("/adsense") {
            AdminTab::Ads
        } else {
            AdminTab::Content
        }
    }

    pub fn route(&self) -> &'static str {
        match self {
            AdminTab::Content => "/admin",
            AdminTab::Ads => "/admin/adsense",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            AdminTab::Content => "Content",
            AdminTab::Ads => "AdSense",
        }
    }

    fn next(&self) -> Self {
        match self {
            AdminTab::Content => AdminTab::Ads,
            AdminTab::Ads => AdminTab::Content,
        }
    }
}

/// A visible line of the content tree: a book, or one of its chapters when
/// the book is expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseRow {
    Book(usize),
    Chapter(usize, usize),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Confirm {
    DeleteBook { id: String, title: String },
    DeleteChapter { id: String, book_id: String, title: String },
    DeleteAd { id: String, name: String },
    DiscardEdits,
}

impl Confirm {
    pub fn prompt(&self) -> String {
        match self {
            Confirm::DeleteBook { title, .. } => {
                format!("Delete book \"{title}\" and all its chapters?")
            }
            Confirm::DeleteChapter { title, .. } => format!("Delete chapter \"{title}\"?"),
            Confirm::DeleteAd { name, .. } => format!("Delete ad placement \"{name}\"?"),
            Confirm::DiscardEdits => "Discard unsaved changes?".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputTarget {
    FormField(usize),
    EditorField(FieldPath),
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputLine {
    pub target: InputTarget,
    pub label: String,
    pub buffer: String,
}

pub struct EditorScreen {
    pub book: Book,
    pub chapter: Chapter,
    pub editor: ChapterContentEditor,
    pub selected: usize,
    pub draft_status: DraftStatus,
}

impl EditorScreen {
    pub fn selected_field(&self) -> Option<FieldPath> {
        self.editor.fields().get(self.selected).copied()
    }

    fn clamp_selection(&mut self) {
        let len = self.editor.fields().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    fn select(&mut self, path: FieldPath) {
        if let Some(i) = self.editor.fields().iter().position(|f| *f == path) {
            self.selected = i;
        }
    }
}

pub enum Screen {
    Browse,
    BookForm(BookForm),
    AdForm(AdPlacementForm),
    Editor(Box<EditorScreen>),
}

/// Which key map applies right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMode {
    Help,
    Confirm,
    Input,
    Browse,
    Form,
    Editor,
}

pub struct AdminApp {
    // Data
    pub books: Vec<Book>,
    pub chapters: HashMap<String, Vec<ChapterListing>>,
    pub placements: Vec<AdPlacement>,
    pub adsense_enabled: bool,

    // UI State
    pub route: String,
    pub tab: AdminTab,
    pub screen: Screen,
    pub expanded: HashSet<String>,
    pub selected_index: usize,
    pub form_index: usize,
    pub input: Option<InputLine>,
    pub confirm: Option<Confirm>,
    pub show_help: bool,
    pub notice: Option<String>,
    pub error: Option<String>,
    spinner_frame: usize,

    // Async state
    pending_draft_chapter_id: Option<String>,
    draft_rx: mpsc::Receiver<DraftResult>,
    draft_tx: mpsc::Sender<DraftResult>,

    // Services
    pub repository: Repository,
    drafter: Arc<Drafter>,
    site_url: String,
}

impl AdminApp {
    pub async fn new(
        repository: Repository,
        drafter: Drafter,
        site_url: &str,
        route: &str,
    ) -> Result<Self> {
        let (draft_tx, draft_rx) = mpsc::channel(1);
        let mut app = Self {
            books: Vec::new(),
            chapters: HashMap::new(),
            placements: Vec::new(),
            adsense_enabled: false,
            route: route.to_string(),
            tab: AdminTab::from_route(route),
            screen: Screen::Browse,
            expanded: HashSet::new(),
            selected_index: 0,
            form_index: 0,
            input: None,
            confirm: None,
            show_help: false,
            notice: None,
            error: None,
            spinner_frame: 0,
            pending_draft_chapter_id: None,
            draft_rx,
            draft_tx,
            repository,
            drafter: Arc::new(drafter),
            site_url: site_url.trim_end_matches('/').to_string(),
        };
        app.reload().await?;
        info!(route, backend = app.drafter.backend_name(), "admin console ready");
        Ok(app)
    }

    pub fn key_mode(&self) -> KeyMode {
        if self.show_help {
            KeyMode::Help
        } else if self.confirm.is_some() {
            KeyMode::Confirm
        } else if self.input.is_some() {
            KeyMode::Input
        } else {
            match self.screen {
                Screen::Browse => KeyMode::Browse,
                Screen::BookForm(_) | Screen::AdForm(_) => KeyMode::Form,
                Screen::Editor(_) => KeyMode::Editor,
            }
        }
    }

    pub fn content_rows(&self) -> Vec<BrowseRow> {
        let mut rows = Vec::new();
        for (i, book) in self.books.iter().enumerate() {
            rows.push(BrowseRow::Book(i));
            if self.expanded.contains(&book.id) {
                let count = self.chapters.get(&book.id).map_or(0, Vec::len);
                rows.extend((0..count).map(|j| BrowseRow::Chapter(i, j)));
            }
        }
        rows
    }

    pub fn selected_row(&self) -> Option<BrowseRow> {
        self.content_rows().get(self.selected_index).copied()
    }

    pub fn chapter_at(&self, book: usize, chapter: usize) -> Option<&ChapterListing> {
        let book = self.books.get(book)?;
        self.chapters.get(&book.id)?.get(chapter)
    }

    pub fn selected_placement(&self) -> Option<&AdPlacement> {
        self.placements.get(self.selected_index)
    }

    fn browse_len(&self) -> usize {
        match self.tab {
            AdminTab::Content => self.content_rows().len(),
            AdminTab::Ads => self.placements.len(),
        }
    }

    pub fn spinner(&self) -> char {
        SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()]
    }

    pub fn tick_spinner(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
    }

    fn page_url(&self, path: &str) -> String {
        format!("{}{}", self.site_url, path)
    }

    /// Runs one action. Failures become the inline error line instead of
    /// ending the session; the returned flag asks the caller to quit.
    pub async fn handle_action(&mut self, action: AppAction) -> Result<bool> {
        self.error = None;
        if !matches!(action, AppAction::ShowHelp | AppAction::HideHelp) {
            self.notice = None;
        }
        match self.dispatch(action).await {
            Ok(quit) => Ok(quit),
            Err(e) => {
                if e.is_validation() {
                    warn!(error = %e, "admin input rejected");
                } else {
                    error!(error = %e, "admin action failed");
                }
                self.error = Some(e.to_string());
                Ok(false)
            }
        }
    }

    async fn dispatch(&mut self, action: AppAction) -> Result<bool> {
        match action {
            AppAction::Quit => return Ok(true),

            AppAction::ShowHelp => self.show_help = true,
            AppAction::HideHelp => self.show_help = false,

            AppAction::MoveUp => self.move_cursor(false),
            AppAction::MoveDown => self.move_cursor(true),

            AppAction::NextTab => {
                if matches!(self.screen, Screen::Browse) {
                    self.tab = self.tab.next();
                    self.route = self.tab.route().to_string();
                    self.selected_index = 0;
                }
            }

            AppAction::Reload => {
                self.reload().await?;
                self.notice = Some("Reloaded".to_string());
            }

            AppAction::Select => self.select().await?,
            AppAction::Back => self.back(),
            AppAction::New => self.open_new_form(),
            AppAction::Edit => self.open_edit_form(),
            AppAction::AddChapter => self.add_chapter().await?,
            AppAction::Delete => self.request_delete(),

            AppAction::ToggleAdsense => {
                if self.tab == AdminTab::Ads && matches!(self.screen, Screen::Browse) {
                    let enabled = !self.adsense_enabled;
                    self.repository.set_adsense_enabled(enabled).await?;
                    info!(enabled, "adsense toggled");
                    self.reload_ads().await?;
                }
            }

            AppAction::OpenInBrowser => {
                if let Some(path) = self.selected_page_path() {
                    let url = self.page_url(&path);
                    if let Err(e) = open::that(&url) {
                        warn!(url = %url, error = %e, "failed to open browser");
                    }
                }
            }

            AppAction::Cycle => self.cycle_selected(),
            AppAction::Save => self.save().await?,

            AppAction::AddVocabulary => self.with_editor(|screen| {
                let v = screen.editor.add_vocabulary_item();
                screen.select(FieldPath::VocabWord(v));
            }),
            AppAction::AddExample => self.with_editor(|screen| {
                let vocab = screen
                    .selected_field()
                    .and_then(|f| f.vocab_index())
                    .or_else(|| screen.editor.draft.vocabulary.len().checked_sub(1));
                if let Some(v) = vocab {
                    if let Some(e) = screen.editor.add_example(v) {
                        screen.select(FieldPath::ExampleEn(v, e));
                    }
                }
            }),
            AppAction::AddKeyPoint => self.with_editor(|screen| {
                let k = screen.editor.add_key_point();
                screen.select(FieldPath::KeyPointEn(k));
            }),
            AppAction::AddQuestion => self.with_editor(|screen| {
                let q = screen.editor.add_question();
                screen.select(FieldPath::Question(q));
            }),
            AppAction::RemoveQuestion => self.with_editor(|screen| {
                if let Some(q) = screen.selected_field().and_then(|f| f.question_index()) {
                    screen.editor.remove_question(q);
                    screen.clamp_selection();
                }
            }),
            AppAction::ImportanceUp | AppAction::ImportanceDown => {
                let step = if matches!(action, AppAction::ImportanceUp) { 1 } else { -1 };
                self.with_editor(|screen| {
                    if let Some(k) = screen.selected_field().and_then(|f| f.key_point_index()) {
                        let current = i64::from(screen.editor.draft.key_points[k].importance);
                        screen.editor.set_importance(k, current + step);
                    }
                });
            }

            AppAction::GenerateDraft => self.generate_draft(),

            AppAction::ConfirmYes => {
                if let Some(confirm) = self.confirm.take() {
                    self.run_confirmed(confirm).await?;
                }
            }
            AppAction::ConfirmNo => self.confirm = None,

            AppAction::InputChar(c) => {
                if let Some(input) = &mut self.input {
                    input.buffer.push(c);
                }
            }
            AppAction::InputBackspace => {
                if let Some(input) = &mut self.input {
                    input.buffer.pop();
                }
            }
            AppAction::InputCancel => self.input = None,
            AppAction::InputConfirm => {
                if let Some(input) = self.input.take() {
                    self.apply_input(input)?;
                }
            }
        }
        Ok(false)
    }

    fn move_cursor(&mut self, down: bool) {
        let len = match &self.screen {
            Screen::Browse => self.browse_len(),
            Screen::BookForm(form) => form.labels().len(),
            Screen::AdForm(form) => form.labels().len(),
            Screen::Editor(screen) => screen.editor.fields().len(),
        };
        let index = match &mut self.screen {
            Screen::Browse => &mut self.selected_index,
            Screen::BookForm(_) | Screen::AdForm(_) => &mut self.form_index,
            Screen::Editor(screen) => &mut screen.selected,
        };
        if down {
            if *index + 1 < len {
                *index += 1;
            }
        } else if *index > 0 {
            *index -= 1;
        }
    }

    async fn select(&mut self) -> Result<()> {
        if matches!(self.screen, Screen::Browse) {
            match (self.tab, self.selected_row()) {
                (AdminTab::Content, Some(BrowseRow::Book(i))) => {
                    let id = self.books[i].id.clone();
                    if !self.expanded.remove(&id) {
                        self.reload_chapters(&id).await?;
                        self.expanded.insert(id);
                    }
                    self.clamp_browse_selection();
                }
                (AdminTab::Content, Some(BrowseRow::Chapter(i, j))) => self.open_editor(i, j).await?,
                (AdminTab::Content, None) => {}
                (AdminTab::Ads, _) => self.open_edit_form(),
            }
            return Ok(());
        }

        match &mut self.screen {
            Screen::BookForm(form) => open_form_field(form, self.form_index, &mut self.input),
            Screen::AdForm(form) => open_form_field(form, self.form_index, &mut self.input),
            Screen::Editor(screen) => {
                if let Some(path) = screen.selected_field() {
                    if path.is_choice() {
                        screen.editor.cycle(path);
                    } else {
                        self.input = Some(InputLine {
                            target: InputTarget::EditorField(path),
                            label: path.label(),
                            buffer: screen.editor.value(path),
                        });
                    }
                }
            }
            Screen::Browse => {}
        }
        Ok(())
    }

    fn back(&mut self) {
        match &self.screen {
            Screen::Browse => {}
            Screen::BookForm(_) | Screen::AdForm(_) => self.screen = Screen::Browse,
            Screen::Editor(screen) => {
                if screen.editor.dirty {
                    self.confirm = Some(Confirm::DiscardEdits);
                } else {
                    self.screen = Screen::Browse;
                }
            }
        }
    }

    fn open_new_form(&mut self) {
        if !matches!(self.screen, Screen::Browse) {
            return;
        }
        self.form_index = 0;
        self.screen = match self.tab {
            AdminTab::Content => Screen::BookForm(BookForm::new()),
            AdminTab::Ads => Screen::AdForm(AdPlacementForm::new()),
        };
    }

    fn open_edit_form(&mut self) {
        if !matches!(self.screen, Screen::Browse) {
            return;
        }
        let screen = match self.tab {
            AdminTab::Content => match self.selected_row() {
                Some(BrowseRow::Book(i)) => Some(Screen::BookForm(BookForm::edit(&self.books[i]))),
                _ => None,
            },
            AdminTab::Ads => self
                .selected_placement()
                .map(|p| Screen::AdForm(AdPlacementForm::edit(p))),
        };
        if let Some(screen) = screen {
            self.form_index = 0;
            self.screen = screen;
        }
    }

    async fn open_editor(&mut self, book: usize, chapter: usize) -> Result<()> {
        let Some(listing) = self.chapter_at(book, chapter) else {
            return Ok(());
        };
        let (chapter_id, book_id) = (listing.chapter.id.clone(), listing.chapter.book_id.clone());

        // Another session may have removed it since the list was fetched.
        let (Some(book), Some(chapter)) = (
            self.repository.get_book(&book_id).await?,
            self.repository.get_chapter(&chapter_id).await?,
        ) else {
            self.reload_books().await?;
            self.error = Some("Chapter not found".to_string());
            return Ok(());
        };
        let editor = ChapterContentEditor::load(&self.repository, &chapter.id).await?;
        self.screen = Screen::Editor(Box::new(EditorScreen {
            book,
            chapter,
            editor,
            selected: 0,
            draft_status: DraftStatus::Idle,
        }));
        Ok(())
    }

    fn selected_book_id(&self) -> Option<String> {
        match self.selected_row()? {
            BrowseRow::Book(i) | BrowseRow::Chapter(i, _) => Some(self.books[i].id.clone()),
        }
    }

    async fn add_chapter(&mut self) -> Result<()> {
        if self.tab != AdminTab::Content || !matches!(self.screen, Screen::Browse) {
            return Ok(());
        }
        let Some(book_id) = self.selected_book_id() else {
            return Ok(());
        };
        let existing = self.repository.list_chapters_by_book_id(&book_id).await?.len();
        let chapter = NewChapter::next_for(&book_id, existing);
        let title = chapter.title.clone();
        self.repository.insert_chapter(chapter).await?;
        info!(book_id = %book_id, title = %title, "chapter added");
        self.expanded.insert(book_id.clone());
        self.reload_chapters(&book_id).await?;
        self.notice = Some(format!("Added {title}"));
        Ok(())
    }

    fn request_delete(&mut self) {
        if !matches!(self.screen, Screen::Browse) {
            return;
        }
        self.confirm = match self.tab {
            AdminTab::Content => match self.selected_row() {
                Some(BrowseRow::Book(i)) => Some(Confirm::DeleteBook {
                    id: self.books[i].id.clone(),
                    title: self.books[i].title.clone(),
                }),
                Some(BrowseRow::Chapter(i, j)) => self.chapter_at(i, j).map(|l| Confirm::DeleteChapter {
                    id: l.chapter.id.clone(),
                    book_id: l.chapter.book_id.clone(),
                    title: l.chapter.title.clone(),
                }),
                None => None,
            },
            AdminTab::Ads => self.selected_placement().map(|p| Confirm::DeleteAd {
                id: p.id.clone(),
                name: p.name.clone(),
            }),
        };
    }

    async fn run_confirmed(&mut self, confirm: Confirm) -> Result<()> {
        match confirm {
            Confirm::DeleteBook { id, title } => {
                self.repository.delete_book(&id).await?;
                info!(id = %id, "book deleted");
                self.expanded.remove(&id);
                self.chapters.remove(&id);
                self.reload_books().await?;
                self.notice = Some(format!("Deleted {title}"));
            }
            Confirm::DeleteChapter { id, book_id, title } => {
                self.repository.delete_chapter(&id).await?;
                info!(id = %id, "chapter deleted");
                self.reload_chapters(&book_id).await?;
                self.notice = Some(format!("Deleted {title}"));
            }
            Confirm::DeleteAd { id, name } => {
                self.repository.delete_ad_placement(&id).await?;
                info!(id = %id, "ad placement deleted");
                self.reload_ads().await?;
                self.notice = Some(format!("Deleted {name}"));
            }
            Confirm::DiscardEdits => self.screen = Screen::Browse,
        }
        self.clamp_browse_selection();
        Ok(())
    }

    fn cycle_selected(&mut self) {
        match &mut self.screen {
            Screen::BookForm(form) => form.cycle(self.form_index),
            Screen::AdForm(form) => form.cycle(self.form_index),
            Screen::Editor(screen) => {
                if let Some(path) = screen.selected_field() {
                    screen.editor.cycle(path);
                }
            }
            Screen::Browse => {}
        }
    }

    fn with_editor(&mut self, f: impl FnOnce(&mut EditorScreen)) {
        if let Screen::Editor(screen) = &mut self.screen {
            f(screen);
        }
    }

    fn apply_input(&mut self, input: InputLine) -> Result<()> {
        match (&mut self.screen, input.target) {
            (Screen::BookForm(form), InputTarget::FormField(i)) => form.set_value(i, &input.buffer),
            (Screen::AdForm(form), InputTarget::FormField(i)) => form.set_value(i, &input.buffer),
            (Screen::Editor(screen), InputTarget::EditorField(path)) => {
                screen.editor.set_value(path, &input.buffer)?;
            }
            _ => {}
        }
        Ok(())
    }

    async fn save(&mut self) -> Result<()> {
        let repo = self.repository.clone();
        match &mut self.screen {
            Screen::Browse => {}
            Screen::BookForm(form) => {
                form.validate()?;
                match &form.editing_id {
                    Some(id) => {
                        repo.update_book(id, &form.book).await?;
                        info!(id = %id, "book updated");
                    }
                    None => {
                        let id = repo.insert_book(&form.book).await?;
                        info!(id = %id, "book created");
                    }
                }
                let title = form.book.title.clone();
                self.screen = Screen::Browse;
                self.reload_books().await?;
                self.notice = Some(format!("Saved {title}"));
            }
            Screen::AdForm(form) => {
                form.validate()?;
                match &form.editing_id {
                    Some(id) => {
                        repo.update_ad_placement(id, &form.placement).await?;
                        info!(id = %id, "ad placement updated");
                    }
                    None => {
                        let id = repo.insert_ad_placement(&form.placement).await?;
                        info!(id = %id, "ad placement created");
                    }
                }
                let name = form.placement.name.clone();
                self.screen = Screen::Browse;
                self.reload_ads().await?;
                self.notice = Some(format!("Saved {name}"));
            }
            Screen::Editor(screen) => {
                let mut saved = false;
                screen.editor.save(&repo, || saved = true).await?;
                if saved {
                    let book_id = screen.book.id.clone();
                    self.reload_chapters(&book_id).await?;
                    self.notice = Some("Content saved".to_string());
                }
            }
        }
        Ok(())
    }

    fn selected_page_path(&self) -> Option<String> {
        let chapter_path = |book: &Book, chapter: &Chapter| {
            format!(
                "/book/{}/chapter/{}",
                urlencoding::encode(&book.slug),
                urlencoding::encode(&chapter.slug)
            )
        };
        match &self.screen {
            Screen::Editor(screen) => Some(chapter_path(&screen.book, &screen.chapter)),
            Screen::Browse if self.tab == AdminTab::Content => match self.selected_row()? {
                BrowseRow::Book(i) => {
                    Some(format!("/book/{}", urlencoding::encode(&self.books[i].slug)))
                }
                BrowseRow::Chapter(i, j) => {
                    let listing = self.chapter_at(i, j)?;
                    Some(chapter_path(&self.books[i], &listing.chapter))
                }
            },
            _ => None,
        }
    }

    fn generate_draft(&mut self) {
        let Screen::Editor(screen) = &mut self.screen else {
            return;
        };
        if screen.draft_status == DraftStatus::Generating {
            return;
        }

        let chapter_id = screen.chapter.id.clone();
        let request = DraftRequest {
            book_title: screen.book.title.clone(),
            author: screen.book.author.clone(),
            chapter_title: screen.chapter.title.clone(),
        };
        screen.draft_status = DraftStatus::Generating;
        self.pending_draft_chapter_id = Some(chapter_id.clone());

        let drafter = Arc::clone(&self.drafter);
        let tx = self.draft_tx.clone();
        tokio::spawn(async move {
            let result = drafter.draft(&request).await.map_err(|e| e.to_string());
            let _ = tx.send(DraftResult { chapter_id, result }).await;
        });
    }

    /// Poll for a finished draft (non-blocking).
    pub fn poll_draft_result(&mut self) {
        let Ok(result) = self.draft_rx.try_recv() else {
            return;
        };
        if self.pending_draft_chapter_id.as_deref() != Some(result.chapter_id.as_str()) {
            return;
        }
        self.pending_draft_chapter_id = None;

        let Screen::Editor(screen) = &mut self.screen else {
            return;
        };
        if screen.chapter.id != result.chapter_id {
            return;
        }
        match result.result {
            Ok(generated) => {
                screen.editor.apply_draft(generated);
                screen.clamp_selection();
                screen.draft_status = DraftStatus::Applied;
                self.notice = Some("Draft applied. Review and save.".to_string());
            }
            Err(e) => {
                error!(chapter_id = %result.chapter_id, error = %e, "draft generation failed");
                screen.draft_status = DraftStatus::Failed;
                self.error = Some(format!("Draft failed: {e}"));
            }
        }
    }

    pub async fn reload(&mut self) -> Result<()> {
        self.reload_books().await?;
        self.reload_ads().await?;
        Ok(())
    }

    async fn reload_books(&mut self) -> Result<()> {
        self.books = self.repository.list_books(SortDirection::NewestFirst).await?;
        let expanded: Vec<String> = self.expanded.iter().cloned().collect();
        for book_id in expanded {
            self.reload_chapters(&book_id).await?;
        }
        self.clamp_browse_selection();
        Ok(())
    }

    async fn reload_chapters(&mut self, book_id: &str) -> Result<()> {
        let listings = self.repository.list_chapter_listings(book_id).await?;
        self.chapters.insert(book_id.to_string(), listings);
        self.clamp_browse_selection();
        Ok(())
    }

    async fn reload_ads(&mut self) -> Result<()> {
        self.placements = self.repository.list_ad_placements().await?;
        self.adsense_enabled = self.repository.adsense_enabled().await?;
        self.clamp_browse_selection();
        Ok(())
    }

    fn clamp_browse_selection(&mut self) {
        let len = self.browse_len();
        if self.selected_index >= len {
            self.selected_index = len.saturating_sub(1);
        }
    }
}

fn open_form_field<F: AdminForm>(form: &mut F, index: usize, input: &mut Option<InputLine>) {
    if form.is_choice(index) {
        form.cycle(index);
    } else if let Some(label) = form.labels().get(index) {
        *input = Some(InputLine {
            target: InputTarget::FormField(index),
            label: label.to_string(),
            buffer: form.value(index),
        });
    }
}
