//! JSON CRUD endpoints, mounted under `/api/books`.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::json;

use booktracker_http::error::AppError;

use super::models::{Book, CreateBook, UpdateBook};
use super::store::BookStore;

pub fn router(store: BookStore) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route(
            "/{id}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .with_state(store)
}

/// Malformed or mistyped JSON is a validation failure, same as a bad field.
fn body_rejected(rejection: JsonRejection) -> AppError {
    AppError::validation(
        vec![json!({ "field": "body", "error": rejection.body_text() })],
        "request body could not be parsed",
    )
}

fn id_rejected(rejection: PathRejection) -> AppError {
    AppError::bad_request(rejection.body_text())
}

async fn list_books(State(store): State<BookStore>) -> Result<Json<Vec<Book>>, AppError> {
    Ok(Json(store.list().await?))
}

async fn create_book(
    State(store): State<BookStore>,
    payload: Result<Json<CreateBook>, JsonRejection>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let Json(payload) = payload.map_err(body_rejected)?;
    let book = store.create(payload).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

async fn get_book(
    State(store): State<BookStore>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Book>, AppError> {
    let Path(id) = id.map_err(id_rejected)?;
    Ok(Json(store.get(id).await?))
}

async fn update_book(
    State(store): State<BookStore>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateBook>, JsonRejection>,
) -> Result<Json<Book>, AppError> {
    let Path(id) = id.map_err(id_rejected)?;
    let Json(payload) = payload.map_err(body_rejected)?;
    Ok(Json(store.update(id, payload).await?))
}

async fn delete_book(
    State(store): State<BookStore>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = id.map_err(id_rejected)?;
    store.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
