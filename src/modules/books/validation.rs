//! Field rules for book input.
//!
//! Every write goes through one of the validated shapes here: [`NewBook`] for
//! inserts and [`BookPatch`] for updates. Both can only be produced by
//! checking the raw request shapes from [`super::models`].

use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use booktracker_http::error::AppError;

use super::models::{Book, CreateBook, EditBookForm, UpdateBook};

pub const TITLE_MAX_LEN: usize = 150;
pub const AUTHOR_MAX_LEN: usize = 100;
pub const STATUS_MAX_LEN: usize = 20;
pub const RATING_MIN: f64 = 0.0;
pub const RATING_MAX: f64 = 5.0;
pub const DEFAULT_STATUS: &str = "Not Read";

/// One violated constraint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub error: String,
}

/// Input rejected before reaching the store. Lists every failing field.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid book input: {}", describe(.errors))]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    /// Names of the failing fields, in check order.
    pub fn fields(&self) -> Vec<&'static str> {
        self.errors.iter().map(|e| e.field).collect()
    }
}

fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{} {}", e.field, e.error))
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        let message = err.to_string();
        let details = err
            .errors
            .into_iter()
            .map(|e| json!({ "field": e.field, "error": e.error }))
            .collect();
        AppError::validation(details, message)
    }
}

/// Validated values for a new row.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub(super) title: String,
    pub(super) author: String,
    pub(super) rating: f64,
    pub(super) status: String,
}

/// Validated partial update, one optional slot per column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookPatch {
    pub(super) title: Option<String>,
    pub(super) author: Option<String>,
    pub(super) rating: Option<f64>,
    pub(super) status: Option<String>,
}

impl BookPatch {
    /// Copy every supplied field onto `book`, leaving the rest untouched.
    pub fn apply(self, book: &mut Book) {
        if let Some(title) = self.title {
            book.title = title;
        }
        if let Some(author) = self.author {
            book.author = author;
        }
        if let Some(rating) = self.rating {
            book.rating = rating;
        }
        if let Some(status) = self.status {
            book.status = status;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none() && self.rating.is_none() && self.status.is_none()
    }
}

/// Raw input that can be checked into a [`BookPatch`].
///
/// Checking is deferred so the store can report a missing record before it
/// reports bad input.
pub trait Changes: Send + 'static {
    fn into_patch(self) -> Result<BookPatch, ValidationError>;
}

impl Changes for UpdateBook {
    fn into_patch(self) -> Result<BookPatch, ValidationError> {
        let mut checker = Checker::default();
        if let Some(title) = &self.title {
            checker.text("title", title, TITLE_MAX_LEN, false);
        }
        if let Some(author) = &self.author {
            checker.text("author", author, AUTHOR_MAX_LEN, false);
        }
        if let Some(rating) = self.rating {
            checker.rating(rating);
        }
        if let Some(status) = &self.status {
            checker.text("status", status, STATUS_MAX_LEN, true);
        }

        checker.finish(BookPatch {
            title: self.title,
            author: self.author,
            rating: self.rating,
            status: self.status,
        })
    }
}

impl Changes for EditBookForm {
    fn into_patch(self) -> Result<BookPatch, ValidationError> {
        UpdateBook::from(self).into_patch()
    }
}

impl CreateBook {
    /// Check every field and fill in the default status.
    pub fn validate(self) -> Result<NewBook, ValidationError> {
        let mut checker = Checker::default();
        checker.text("title", &self.title, TITLE_MAX_LEN, false);
        checker.text("author", &self.author, AUTHOR_MAX_LEN, false);
        checker.rating(self.rating);
        if let Some(status) = &self.status {
            checker.text("status", status, STATUS_MAX_LEN, true);
        }

        checker.finish(NewBook {
            title: self.title,
            author: self.author,
            rating: self.rating,
            status: self.status.unwrap_or_else(|| DEFAULT_STATUS.to_string()),
        })
    }
}

#[derive(Default)]
struct Checker {
    errors: Vec<FieldError>,
}

impl Checker {
    fn fail(&mut self, field: &'static str, error: String) {
        self.errors.push(FieldError { field, error });
    }

    fn text(&mut self, field: &'static str, value: &str, max_len: usize, allow_empty: bool) {
        if !allow_empty && value.trim().is_empty() {
            self.fail(field, "must not be empty".to_string());
            return;
        }
        // Lengths count characters, not bytes
        let len = value.chars().count();
        if len > max_len {
            self.fail(
                field,
                format!("must be at most {max_len} characters (got {len})"),
            );
        }
    }

    fn rating(&mut self, value: f64) {
        // Also rejects NaN and infinities
        if !(RATING_MIN..=RATING_MAX).contains(&value) {
            self.fail(
                "rating",
                format!("must be between {RATING_MIN} and {RATING_MAX}"),
            );
        }
    }

    fn finish<T>(self, value: T) -> Result<T, ValidationError> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(ValidationError {
                errors: self.errors,
            })
        }
    }
}
