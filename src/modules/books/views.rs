//! Server-rendered pages for the book list and forms.

use maud::{html, Markup, DOCTYPE};

use super::models::Book;
use super::validation::{
    FieldError, AUTHOR_MAX_LEN, DEFAULT_STATUS, RATING_MAX, RATING_MIN, STATUS_MAX_LEN,
    TITLE_MAX_LEN,
};

fn layout(title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { (title) }
            }
            body {
                h1 { (title) }
                (body)
            }
        }
    }
}

fn back_link() -> Markup {
    html! {
        p { a href="/" { "Back to list" } }
    }
}

/// Collection view with edit and delete links per row.
pub fn index(books: &[Book]) -> Markup {
    layout(
        "My Books",
        html! {
            p { a href="/add" { "Add a book" } }
            @if books.is_empty() {
                p { "No books yet." }
            } @else {
                table {
                    thead {
                        tr {
                            th { "Title" }
                            th { "Author" }
                            th { "Rating" }
                            th { "Status" }
                            th {}
                        }
                    }
                    tbody {
                        @for book in books {
                            tr {
                                td { (book.title) }
                                td { (book.author) }
                                td { (book.rating) }
                                td { (book.status) }
                                td {
                                    a href={ "/edit/" (book.id) } { "Edit" }
                                    " "
                                    a href={ "/delete/" (book.id) } { "Delete" }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

struct FormValues<'a> {
    title: &'a str,
    author: &'a str,
    rating: String,
    status: &'a str,
}

fn book_form(action: &str, submit: &str, values: &FormValues<'_>) -> Markup {
    html! {
        form method="post" action=(action) {
            label {
                "Title "
                input name="title" required maxlength=(TITLE_MAX_LEN) value=(values.title);
            }
            label {
                "Author "
                input name="author" required maxlength=(AUTHOR_MAX_LEN) value=(values.author);
            }
            label {
                "Rating "
                input name="rating" type="number" required min=(RATING_MIN) max=(RATING_MAX)
                    step="0.1" value=(values.rating);
            }
            label {
                "Status "
                input name="status" maxlength=(STATUS_MAX_LEN) value=(values.status);
            }
            button type="submit" { (submit) }
        }
        (back_link())
    }
}

/// Empty "add book" form.
pub fn add_form() -> Markup {
    let values = FormValues {
        title: "",
        author: "",
        rating: String::new(),
        status: DEFAULT_STATUS,
    };
    layout("Add Book", book_form("/add", "Add", &values))
}

/// "Edit book" form pre-populated with the current values.
pub fn edit_form(book: &Book) -> Markup {
    let values = FormValues {
        title: &book.title,
        author: &book.author,
        rating: book.rating.to_string(),
        status: &book.status,
    };
    let action = format!("/edit/{}", book.id);
    layout("Edit Book", book_form(&action, "Save", &values))
}

/// Error page; lists field failures when there are any.
pub fn error_page(heading: &str, message: &str, fields: &[FieldError]) -> Markup {
    layout(
        heading,
        html! {
            p { (message) }
            @if !fields.is_empty() {
                ul {
                    @for field in fields {
                        li { strong { (field.field) } ": " (field.error) }
                    }
                }
            }
            (back_link())
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book() -> Book {
        Book {
            id: 7,
            title: "<Dune>".to_string(),
            author: "Herbert".to_string(),
            rating: 4.5,
            status: "Read".to_string(),
        }
    }

    #[test]
    fn index_links_each_book_and_escapes_text() {
        let page = index(&[book()]).into_string();
        assert!(page.contains(r#"href="/edit/7""#));
        assert!(page.contains(r#"href="/delete/7""#));
        assert!(page.contains("&lt;Dune&gt;"));
        assert!(!page.contains("<Dune>"));
    }

    #[test]
    fn empty_index_says_so() {
        let page = index(&[]).into_string();
        assert!(page.contains("No books yet."));
        assert!(page.contains(r#"href="/add""#));
    }

    #[test]
    fn add_form_defaults_status() {
        let page = add_form().into_string();
        assert!(page.contains(r#"action="/add""#));
        assert!(page.contains(r#"name="status" maxlength="20" value="Not Read""#));
    }

    #[test]
    fn edit_form_is_prefilled() {
        let page = edit_form(&book()).into_string();
        assert!(page.contains(r#"action="/edit/7""#));
        assert!(page.contains(r#"value="&lt;Dune&gt;""#));
        assert!(page.contains(r#"value="4.5""#));
        assert!(page.contains(r#"value="Read""#));
    }

    #[test]
    fn attribute_values_are_escaped() {
        let mut quoted = book();
        quoted.author = r#"A "quoted" name"#.to_string();

        let page = edit_form(&quoted).into_string();
        assert!(page.contains(r#"value="A &quot;quoted&quot; name""#));
    }

    #[test]
    fn error_page_lists_fields() {
        let fields = vec![FieldError {
            field: "rating",
            error: "must be between 0 and 5".to_string(),
        }];
        let page = error_page("Invalid book", "invalid input", &fields).into_string();
        assert!(page.contains("<strong>rating</strong>: must be between 0 and 5"));
        assert!(page.contains("<title>Invalid book</title>"));
    }
}
