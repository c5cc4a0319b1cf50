use serde::{Deserialize, Serialize};

/// A tracked book, exactly as stored and as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Store-assigned identifier
    pub id: i64,
    /// Title of the book
    pub title: String,
    /// Author of the book
    pub author: String,
    /// Rating between 0 and 5 inclusive
    pub rating: f64,
    /// Reading status, e.g. "Not Read"
    pub status: String,
}

/// Request body for creating a book. `status` falls back to "Not Read".
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBook {
    pub title: String,
    pub author: String,
    pub rating: f64,
    #[serde(default)]
    pub status: Option<String>,
}

/// Request body for a partial update. Absent (or null) fields stay as they are.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBook {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Urlencoded body of the "add book" form.
#[derive(Debug, Clone, Deserialize)]
pub struct BookForm {
    pub title: String,
    pub author: String,
    pub rating: f64,
    #[serde(default)]
    pub status: Option<String>,
}

/// Urlencoded body of the "edit book" form; every field is required.
#[derive(Debug, Clone, Deserialize)]
pub struct EditBookForm {
    pub title: String,
    pub author: String,
    pub rating: f64,
    pub status: String,
}

impl From<BookForm> for CreateBook {
    fn from(form: BookForm) -> Self {
        Self {
            title: form.title,
            author: form.author,
            rating: form.rating,
            // An untouched status input submits an empty string
            status: form.status.filter(|status| !status.trim().is_empty()),
        }
    }
}

impl From<EditBookForm> for UpdateBook {
    fn from(form: EditBookForm) -> Self {
        Self {
            title: Some(form.title),
            author: Some(form.author),
            rating: Some(form.rating),
            status: Some(form.status),
        }
    }
}
