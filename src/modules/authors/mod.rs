pub mod handlers;
pub mod models;
pub mod repository;

use async_trait::async_trait;
use axum::{routing::get, Router};
use serde_json::json;
use shelf_kernel::{InitCtx, Migration, Module};

use crate::state::AppState;

/// Tag carried by every cached author list page
pub const AUTHORS_CACHE_TAG: &str = "authorsCache";

pub const INIT_MIGRATION: Migration = Migration {
    id: "001_init",
    up: r#"
        CREATE TABLE author (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            first_name TEXT NOT NULL,
            last_name  TEXT NOT NULL
        );
        "#,
};

/// Authors module: CRUD endpoints under `/api/authors`
pub struct AuthorsModule {
    state: AppState,
}

impl AuthorsModule {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl Module for AuthorsModule {
    fn name(&self) -> &'static str {
        "authors"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "authors module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route(
                "/",
                get(handlers::list_authors).post(handlers::create_author),
            )
            .route(
                "/{id}",
                get(handlers::get_author)
                    .put(handlers::update_author)
                    .delete(handlers::delete_author),
            )
            .with_state(self.state.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                    }
                }
            })
        };
        let id_param = json!({
            "name": "id", "in": "path", "required": true,
            "schema": { "type": "integer", "format": "int64" }
        });

        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List authors",
                        "tags": ["Authors"],
                        "parameters": [
                            { "name": "page", "in": "query", "schema": { "type": "integer", "default": 1 } },
                            { "name": "limit", "in": "query", "schema": { "type": "integer", "default": 3 } }
                        ],
                        "responses": {
                            "200": {
                                "description": "One page of authors",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/Author" }
                                        }
                                    }
                                }
                            }
                        }
                    },
                    "post": {
                        "summary": "Create an author",
                        "tags": ["Authors"],
                        "security": [{ "bearerAuth": [] }],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/AuthorInput" }
                                }
                            }
                        },
                        "responses": {
                            "201": {
                                "description": "Author created; Location points at the new resource",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Author" }
                                    }
                                }
                            },
                            "400": error("Validation failed"),
                            "401": error("Invalid API key"),
                            "403": error("Administrator role required")
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get an author",
                        "tags": ["Authors"],
                        "parameters": [id_param.clone()],
                        "responses": {
                            "200": {
                                "description": "The author",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Author" }
                                    }
                                }
                            },
                            "404": error("Author not found")
                        }
                    },
                    "put": {
                        "summary": "Update an author",
                        "tags": ["Authors"],
                        "security": [{ "bearerAuth": [] }],
                        "parameters": [id_param.clone()],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/AuthorInput" }
                                }
                            }
                        },
                        "responses": {
                            "204": { "description": "Author updated" },
                            "400": error("Validation failed"),
                            "403": error("Administrator role required"),
                            "404": error("Author not found")
                        }
                    },
                    "delete": {
                        "summary": "Delete an author",
                        "tags": ["Authors"],
                        "security": [{ "bearerAuth": [] }],
                        "parameters": [id_param],
                        "responses": {
                            "204": { "description": "Author deleted" },
                            "403": error("Administrator role required"),
                            "404": error("Author not found")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Author": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "format": "int64" },
                            "firstName": { "type": "string" },
                            "lastName": { "type": "string" }
                        },
                        "required": ["id", "firstName", "lastName"]
                    },
                    "AuthorInput": {
                        "type": "object",
                        "properties": {
                            "firstName": { "type": "string", "maxLength": 255 },
                            "lastName": { "type": "string", "maxLength": 255 }
                        }
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![INIT_MIGRATION]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "authors module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "authors module stopped");
        Ok(())
    }
}

/// Create a new instance of the authors module
pub fn create_module(state: AppState) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(AuthorsModule::new(state))
}
