pub mod api;
pub mod models;
pub mod store;
pub mod validation;
pub mod views;
pub mod web;

use async_trait::async_trait;
use axum::Router;
use booktracker_db::Database;
use booktracker_kernel::{InitCtx, Migration, Module};

use store::BookStore;

/// Books module: HTML pages at the site root and JSON API under `/api/books`
pub struct BooksModule {
    store: BookStore,
}

impl BooksModule {
    pub fn new(db: Database) -> Self {
        Self {
            store: BookStore::new(db),
        }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let count = self.store.list().await?.len();
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            books = count,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        api::router(self.store.clone())
    }

    fn pages(&self) -> Router {
        web::router(self.store.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error_response = |description: &str| {
            serde_json::json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                    }
                }
            })
        };
        let book_response = |description: &str| {
            serde_json::json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/Book" }
                    }
                }
            })
        };
        let id_param = serde_json::json!([{
            "name": "id",
            "in": "path",
            "required": true,
            "schema": { "type": "integer", "format": "int64" }
        }]);

        Some(serde_json::json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "Every book in insertion order",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/Book" }
                                        }
                                    }
                                }
                            }
                        }
                    },
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/CreateBook" }
                                }
                            }
                        },
                        "responses": {
                            "201": book_response("Created book with its assigned id"),
                            "422": error_response("Validation error")
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get a book",
                        "tags": ["Books"],
                        "parameters": id_param.clone(),
                        "responses": {
                            "200": book_response("The book"),
                            "404": error_response("Book not found")
                        }
                    },
                    "put": {
                        "summary": "Update the supplied fields of a book",
                        "tags": ["Books"],
                        "parameters": id_param.clone(),
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/UpdateBook" }
                                }
                            }
                        },
                        "responses": {
                            "200": book_response("The updated book"),
                            "404": error_response("Book not found"),
                            "422": error_response("Validation error")
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "parameters": id_param.clone(),
                        "responses": {
                            "204": { "description": "Deleted" },
                            "404": error_response("Book not found")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "format": "int64" },
                            "title": { "type": "string", "maxLength": validation::TITLE_MAX_LEN },
                            "author": { "type": "string", "maxLength": validation::AUTHOR_MAX_LEN },
                            "rating": { "type": "number", "minimum": validation::RATING_MIN, "maximum": validation::RATING_MAX },
                            "status": { "type": "string", "maxLength": validation::STATUS_MAX_LEN }
                        },
                        "required": ["id", "title", "author", "rating", "status"]
                    },
                    "CreateBook": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string", "minLength": 1, "maxLength": validation::TITLE_MAX_LEN },
                            "author": { "type": "string", "minLength": 1, "maxLength": validation::AUTHOR_MAX_LEN },
                            "rating": { "type": "number", "minimum": validation::RATING_MIN, "maximum": validation::RATING_MAX },
                            "status": {
                                "type": "string",
                                "maxLength": validation::STATUS_MAX_LEN,
                                "default": validation::DEFAULT_STATUS
                            }
                        },
                        "required": ["title", "author", "rating"]
                    },
                    "UpdateBook": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string", "minLength": 1, "maxLength": validation::TITLE_MAX_LEN },
                            "author": { "type": "string", "minLength": 1, "maxLength": validation::AUTHOR_MAX_LEN },
                            "rating": { "type": "number", "minimum": validation::RATING_MIN, "maximum": validation::RATING_MAX },
                            "status": { "type": "string", "maxLength": validation::STATUS_MAX_LEN }
                        }
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        store::migrations()
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a books module backed by `db`
pub fn create_module(db: Database) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::new(db))
}
