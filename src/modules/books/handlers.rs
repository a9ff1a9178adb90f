//! Book endpoints.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::Value;
use shelf_authz::{Caller, ROLE_ADMIN};
use shelf_http::{AppError, AppResult};
use shelf_kernel::validation::Validate;

use super::models::{requested_author_id, Book, BookId, BookInput, UNRESOLVED_AUTHOR_ID};
use super::BOOKS_CACHE_TAG;
use crate::modules::authors::models::{Author, AuthorId};
use crate::modules::authors::AUTHORS_CACHE_TAG;
use crate::modules::{reject_violations, store_error};
use crate::pagination::{list_cache_key, PageQuery};
use crate::serializer::{self, Group, Hydrate};
use crate::state::AppState;

const GROUPS: &[Group] = &[Group::GetBooks];

/// Book pages embed author data, so they are evicted by author writes too.
const LIST_TAGS: &[&str] = &[BOOKS_CACHE_TAG, AUTHORS_CACHE_TAG];

/// GET /api/books?page&limit
pub async fn list_books(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Value>> {
    let page = query.resolve(&state.settings.pagination);
    let key = list_cache_key("Books", page);
    let repository = state.books.clone();

    let body = state
        .cache
        .get(&key, LIST_TAGS, move || {
            tracing::debug!(
                page = page.number,
                limit = page.limit,
                group = Group::GetBooks.name(),
                "loading books page"
            );
            let books = repository.find_page(page).map_err(store_error)?;
            Ok::<_, AppError>(serializer::serialize_list(&books, GROUPS))
        })
        .await?;

    Ok(Json(body))
}

/// GET /api/books/{id}
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<BookId>,
) -> AppResult<Json<Value>> {
    let book = load_book(&state, id)?;
    Ok(Json(serializer::serialize(&book, GROUPS)))
}

/// POST /api/books
pub async fn create_book(
    State(state): State<AppState>,
    caller: Caller,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    caller.require_role(
        ROLE_ADMIN,
        "Vous n'avez pas les droits suffisants pour créer un livre",
    )?;

    let (raw, input) = parse_body(&body)?;
    let mut book = Book::from(input);
    reject_violations(book.validate())?;

    let author_id = requested_author_id(&raw).unwrap_or(UNRESOLVED_AUTHOR_ID);
    book.author = resolve_author(&state, author_id)?;

    let id = state.books.persist(&mut book).map_err(store_error)?;
    state.cache.invalidate_tags(&[BOOKS_CACHE_TAG]).await;

    tracing::info!(
        book_id = id,
        author_id = ?book.author_id(),
        caller = ?caller.subject(),
        "book created"
    );

    let location = state.settings.server.location(&format!("/api/books/{id}"));
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(serializer::serialize(&book, GROUPS)),
    ))
}

/// PUT /api/books/{id}
pub async fn update_book(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<BookId>,
    body: Bytes,
) -> AppResult<StatusCode> {
    caller.require_role(
        ROLE_ADMIN,
        "Vous n'avez pas les droits suffisants pour modifier un livre",
    )?;

    let mut book = load_book(&state, id)?;
    let (raw, input) = parse_body(&body)?;
    book.hydrate(input);
    reject_violations(book.validate())?;

    if let Some(author_id) = requested_author_id(&raw) {
        book.author = resolve_author(&state, author_id)?;
    }

    state.books.persist(&mut book).map_err(store_error)?;
    state.cache.invalidate_tags(&[BOOKS_CACHE_TAG]).await;

    tracing::info!(book_id = id, caller = ?caller.subject(), "book updated");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/books/{id}
pub async fn delete_book(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<BookId>,
) -> AppResult<StatusCode> {
    caller.require_role(
        ROLE_ADMIN,
        "Vous n'avez pas les droits suffisants pour supprimer un livre",
    )?;

    load_book(&state, id)?;
    state.cache.invalidate_tags(&[BOOKS_CACHE_TAG]).await;
    state.books.remove(id).map_err(store_error)?;

    tracing::info!(book_id = id, caller = ?caller.subject(), "book deleted");
    Ok(StatusCode::NO_CONTENT)
}

fn load_book(state: &AppState, id: BookId) -> AppResult<Book> {
    state
        .books
        .find(id)
        .map_err(store_error)?
        .ok_or_else(|| AppError::not_found(format!("Book {id} not found")))
}

/// Parses the body once as raw JSON, for `idAuthor`, and once as typed input.
fn parse_body(body: &[u8]) -> AppResult<(Value, BookInput)> {
    let raw: Value = serializer::deserialize(body)?;
    let input = serde_json::from_value(raw.clone())
        .map_err(|err| AppError::bad_request(format!("Malformed JSON body: {err}")))?;
    Ok((raw, input))
}

/// An id that matches no author leaves the book without one.
fn resolve_author(state: &AppState, id: AuthorId) -> AppResult<Option<Author>> {
    let author = state.authors.find(id).map_err(store_error)?;
    if author.is_none() {
        tracing::debug!(author_id = id, "author reference did not resolve");
    }
    Ok(author)
}
