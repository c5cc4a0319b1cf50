//! HTML pages: list, add, edit and delete.
//!
//! Every successful mutation answers with a 303 redirect to the list so a
//! browser refresh does not resubmit the form.

use axum::{
    extract::{
        rejection::{FormRejection, PathRejection},
        Path, State,
    },
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};

use booktracker_http::error::AppError;
use maud::Markup;

use super::models::{BookForm, EditBookForm};
use super::store::{BookError, BookStore};
use super::validation::FieldError;
use super::views;

pub fn router(store: BookStore) -> Router {
    Router::new()
        .route("/", get(list))
        .route("/add", get(show_create_form).post(submit_create))
        .route("/edit/{id}", get(show_edit_form).post(submit_edit))
        // Destructive GET: the list page deletes through a plain link
        .route("/delete/{id}", get(delete))
        .with_state(store)
}

/// Failure rendered as an HTML page instead of the JSON error body.
#[derive(Debug)]
pub struct PageError {
    error: AppError,
    fields: Vec<FieldError>,
}

impl From<AppError> for PageError {
    fn from(error: AppError) -> Self {
        Self {
            error,
            fields: Vec::new(),
        }
    }
}

impl From<BookError> for PageError {
    fn from(err: BookError) -> Self {
        let fields = match &err {
            BookError::Invalid(invalid) => invalid.errors.clone(),
            _ => Vec::new(),
        };
        Self {
            error: err.into(),
            fields,
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let (status, body) = self.error.into_parts();
        let heading = status.canonical_reason().unwrap_or("Error");
        (status, views::error_page(heading, &body.message, &self.fields)).into_response()
    }
}

fn form_rejected(rejection: FormRejection) -> PageError {
    AppError::bad_request(rejection.body_text()).into()
}

fn id_rejected(rejection: PathRejection) -> PageError {
    AppError::bad_request(rejection.body_text()).into()
}

async fn list(State(store): State<BookStore>) -> Result<Markup, PageError> {
    let books = store.list().await?;
    Ok(views::index(&books))
}

async fn show_create_form() -> Markup {
    views::add_form()
}

async fn submit_create(
    State(store): State<BookStore>,
    form: Result<Form<BookForm>, FormRejection>,
) -> Result<Redirect, PageError> {
    let Form(form) = form.map_err(form_rejected)?;
    store.create(form.into()).await?;
    Ok(Redirect::to("/"))
}

async fn show_edit_form(
    State(store): State<BookStore>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Markup, PageError> {
    let Path(id) = id.map_err(id_rejected)?;
    let book = store.get(id).await?;
    Ok(views::edit_form(&book))
}

async fn submit_edit(
    State(store): State<BookStore>,
    id: Result<Path<i64>, PathRejection>,
    form: Result<Form<EditBookForm>, FormRejection>,
) -> Result<Redirect, PageError> {
    let Path(id) = id.map_err(id_rejected)?;
    let Form(form) = form.map_err(form_rejected)?;
    store.update(id, form).await?;
    Ok(Redirect::to("/"))
}

async fn delete(
    State(store): State<BookStore>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Redirect, PageError> {
    let Path(id) = id.map_err(id_rejected)?;
    store.delete(id).await?;
    Ok(Redirect::to("/"))
}
