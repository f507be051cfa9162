use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use serde::Deserialize;

use crate::ai;
use crate::error::AppError;
use crate::models::SummaryRequest;

use super::render::{self, CHAPTER_AD_LOCATION};
use super::AppState;

/// Store or validation failure rendered in place as an HTML page.
pub struct PageError(AppError);

impl From<AppError> for PageError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let status = if self.0.is_validation() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        let html = render::message_page("Something went wrong", &self.0.to_string());
        (status, Html(html)).into_response()
    }
}

fn not_found_page(title: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(render::message_page(title, "The page you asked for does not exist.")),
    )
        .into_response()
}

pub async fn not_found() -> Response {
    not_found_page("Page not found")
}

pub async fn home(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    let books = state.catalog.list_books().await?;
    Ok(Html(render::home(&books)))
}

pub async fn book(
    State(state): State<AppState>,
    Path(book_slug): Path<String>,
) -> Result<Response, PageError> {
    match state.catalog.load_book_page(&book_slug).await? {
        Some(view) => Ok(Html(render::book_page(&view)).into_response()),
        None => Ok(not_found_page("Book not found")),
    }
}

pub async fn chapter(
    State(state): State<AppState>,
    Path((book_slug, chapter_slug)): Path<(String, String)>,
) -> Result<Response, PageError> {
    let Some(view) = state
        .catalog
        .load_chapter_page(&book_slug, &chapter_slug)
        .await?
    else {
        let title = if state.catalog.get_book_by_slug(&book_slug).await?.is_some() {
            "Chapter not found"
        } else {
            "Book not found"
        };
        return Ok(not_found_page(title));
    };

    // An unreadable ad setting counts as "ads off"; the catalog already logged it.
    let ads = state
        .catalog
        .ad_placements_for(CHAPTER_AD_LOCATION)
        .await
        .unwrap_or_default();
    Ok(Html(render::chapter_page(&view, &ads)).into_response())
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    view: Option<usize>,
}

pub async fn summaries(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> Html<String> {
    let current = match query.view {
        Some(index) => state.history.get(index).await,
        None => None,
    };
    let history = state.history.list().await;
    Html(render::summaries_page(
        &SummaryRequest::default(),
        None,
        current.as_ref(),
        &history,
    ))
}

pub async fn generate_summary(
    State(state): State<AppState>,
    Form(request): Form<SummaryRequest>,
) -> Result<Response, PageError> {
    match ai::generate_summary(&request, state.demo_delay).await {
        Ok(summary) => {
            state.history.push(summary).await;
            let history = state.history.list().await;
            let html = render::summaries_page(&request, None, history.first(), &history);
            Ok(Html(html).into_response())
        }
        Err(AppError::Validation(errors)) => {
            let history = state.history.list().await;
            let html = render::summaries_page(&request, Some(&errors), None, &history);
            Ok((StatusCode::BAD_REQUEST, Html(html)).into_response())
        }
        Err(e) => Err(e.into()),
    }
}
