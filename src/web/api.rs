use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::error::AppError;
use crate::import;
use crate::models::{Book, Chapter, ChapterContent, QuizQuestion};

use super::AppState;

pub struct ApiError(AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_validation() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, Json(json!({ "success": false, "error": self.0.to_string() }))).into_response()
    }
}

fn not_found(message: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "success": false, "error": message })),
    )
        .into_response()
}

pub async fn list_books(State(state): State<AppState>) -> Result<Json<Vec<Book>>, ApiError> {
    Ok(Json(state.catalog.list_books().await?))
}

pub async fn get_book(
    State(state): State<AppState>,
    Path(book_slug): Path<String>,
) -> Result<Response, ApiError> {
    Ok(match state.catalog.get_book_by_slug(&book_slug).await? {
        Some(book) => Json(book).into_response(),
        None => not_found("Book not found"),
    })
}

pub async fn list_chapters(
    State(state): State<AppState>,
    Path(book_slug): Path<String>,
) -> Result<Response, ApiError> {
    let Some(book) = state.catalog.get_book_by_slug(&book_slug).await? else {
        return Ok(not_found("Book not found"));
    };
    let chapters: Vec<Chapter> = state.catalog.list_chapters_by_book_id(&book.id).await?;
    Ok(Json(chapters).into_response())
}

/// `null` when the chapter has no content yet.
pub async fn chapter_content(
    State(state): State<AppState>,
    Path(chapter_id): Path<String>,
) -> Result<Json<Option<ChapterContent>>, ApiError> {
    Ok(Json(state.catalog.get_chapter_content(&chapter_id).await?))
}

pub async fn chapter_questions(
    State(state): State<AppState>,
    Path(chapter_id): Path<String>,
) -> Result<Json<Vec<QuizQuestion>>, ApiError> {
    Ok(Json(state.catalog.list_chapter_questions(&chapter_id).await?))
}

#[derive(Debug, Deserialize)]
pub struct ImportParams {
    #[serde(default)]
    filename: String,
}

/// Raw spreadsheet upload. Every failure, store errors included, answers
/// 400 with the message.
pub async fn import_content(
    State(state): State<AppState>,
    Query(params): Query<ImportParams>,
    body: Bytes,
) -> Response {
    let repo = state.catalog.repository();
    match import::import_workbook(repo, &params.filename, body.to_vec()).await {
        Ok(rows) => Json(json!({
            "success": true,
            "message": "Content uploaded successfully",
            "rowsProcessed": rows,
        }))
        .into_response(),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "error": e.to_string() })),
        )
            .into_response(),
    }
}
