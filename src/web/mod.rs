mod api;
mod pages;
mod render;

use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::ai::SummaryHistory;
use crate::catalog::Catalog;
use crate::error::Result;

const IMPORT_BODY_LIMIT: usize = 20 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Catalog,
    pub history: SummaryHistory,
    pub demo_delay: Duration,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(|| async { "ok\n" }))
        .route("/", get(pages::home))
        .route("/book/:book_slug", get(pages::book))
        .route("/book/:book_slug/chapter/:chapter_slug", get(pages::chapter))
        .route(
            "/summaries",
            get(pages::summaries).post(pages::generate_summary),
        )
        .route("/api/books", get(api::list_books))
        .route("/api/books/:book_slug", get(api::get_book))
        .route("/api/books/:book_slug/chapters", get(api::list_chapters))
        .route("/api/chapters/:chapter_id/content", get(api::chapter_content))
        .route("/api/chapters/:chapter_id/questions", get(api::chapter_questions))
        .route(
            "/api/import",
            post(api::import_content).layer(DefaultBodyLimit::max(IMPORT_BODY_LIMIT)),
        )
        .fallback(pages::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(state: AppState, addr: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr, "listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}
