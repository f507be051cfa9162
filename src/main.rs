use std::io;
use std::time::Duration;

use anyhow::anyhow;
use clap::Parser;
use crossterm::event::KeyEventKind;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tracing::info;

mod ai;
mod app;
mod catalog;
mod cli;
mod config;
mod db;
mod editor;
mod error;
mod export;
mod forms;
mod import;
mod models;
mod tui;
mod web;

use ai::{Drafter, SummaryHistory};
use app::AdminApp;
use catalog::Catalog;
use cli::{Cli, Command};
use config::Config;
use db::Repository;
use error::Result;
use tui::{draw, handle_key_event};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout belongs to the TUI or to exported markdown
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(cli.command.default_log_level().into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let mut config = Config::load_from(&config_path)?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Some(addr) = cli.addr {
        config.listen_addr = addr;
    }

    let repository = Repository::new(&config.db_path).await?;

    match cli.command {
        Command::Serve => {
            let state = web::AppState {
                catalog: Catalog::new(repository, config.book_order),
                history: SummaryHistory::new(),
                demo_delay: Duration::from_millis(config.demo_delay_ms),
            };
            web::serve(state, &config.listen_addr).await?;
        }
        Command::Import { file } => {
            let bytes = std::fs::read(&file)?;
            let filename = file
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            let rows = import::import_workbook(&repository, &filename, bytes).await?;
            println!("Content uploaded successfully ({rows} rows)");
        }
        Command::Export { book, chapter } => {
            let catalog = Catalog::new(repository, config.book_order);
            let view = catalog
                .load_chapter_page(&book, &chapter)
                .await?
                .ok_or_else(|| anyhow!("chapter {book}/{chapter} not found"))?;
            let content = view
                .content
                .as_ref()
                .ok_or_else(|| anyhow!("chapter {book}/{chapter} has no content yet"))?;
            print!(
                "{}",
                export::chapter_markdown(&view.book, &view.chapter, content, &view.questions)
            );
            info!(book = %book, chapter = %chapter, "chapter exported");
        }
        Command::Admin { route } => {
            let drafter = Drafter::from_api_key(config.claude_api_key.as_deref())?;
            let route = route.unwrap_or_else(|| "/admin".to_string());
            let mut app = AdminApp::new(repository, drafter, &config.site_url, &route).await?;
            run_terminal(&mut app).await?;
        }
    }

    Ok(())
}

async fn run_terminal(app: &mut AdminApp) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut AdminApp) -> Result<()> {
    loop {
        terminal.draw(|frame| draw(frame, app))?;

        app.tick_spinner();

        // Pick up a finished background draft, if any
        app.poll_draft_result();

        // Poll for events with timeout to allow async operations
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(action) = handle_key_event(key, app.key_mode()) {
                        if app.handle_action(action).await? {
                            return Ok(());
                        }
                    }
                }
            }
        }
    }
}
