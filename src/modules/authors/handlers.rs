//! Author endpoints.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use shelf_authz::{Caller, ROLE_ADMIN};
use shelf_http::{AppError, AppResult};
use shelf_kernel::validation::Validate;

use super::models::{Author, AuthorId, AuthorInput};
use super::AUTHORS_CACHE_TAG;
use crate::modules::{reject_violations, store_error};
use crate::pagination::{list_cache_key, PageQuery};
use crate::serializer::{self, Group, Hydrate};
use crate::state::AppState;

const GROUPS: &[Group] = &[Group::GetAuthors];

/// GET /api/authors?page&limit
pub async fn list_authors(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let page = query.resolve(&state.settings.pagination);
    let key = list_cache_key("Authors", page);
    let repository = state.authors.clone();

    let body = state
        .cache
        .get(&key, &[AUTHORS_CACHE_TAG], move || {
            tracing::debug!(
                page = page.number,
                limit = page.limit,
                group = Group::GetAuthors.name(),
                "loading authors page"
            );
            let authors = repository.find_page(page).map_err(store_error)?;
            Ok::<_, AppError>(serializer::serialize_list(&authors, GROUPS))
        })
        .await?;

    Ok(Json(body))
}

/// GET /api/authors/{id}
pub async fn get_author(
    State(state): State<AppState>,
    Path(id): Path<AuthorId>,
) -> AppResult<Json<serde_json::Value>> {
    let author = load_author(&state, id)?;
    Ok(Json(serializer::serialize(&author, GROUPS)))
}

/// POST /api/authors
pub async fn create_author(
    State(state): State<AppState>,
    caller: Caller,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    caller.require_role(
        ROLE_ADMIN,
        "Vous n'avez pas les droits suffisants pour créer un auteur",
    )?;

    let input: AuthorInput = serializer::deserialize(&body)?;
    let mut author = Author::from(input);
    reject_violations(author.validate())?;

    let id = state.authors.persist(&mut author).map_err(store_error)?;
    state.cache.invalidate_tags(&[AUTHORS_CACHE_TAG]).await;

    tracing::info!(author_id = id, caller = ?caller.subject(), "author created");

    let location = state.settings.server.location(&format!("/api/authors/{id}"));
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(serializer::serialize(&author, GROUPS)),
    ))
}

/// PUT /api/authors/{id}
pub async fn update_author(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<AuthorId>,
    body: Bytes,
) -> AppResult<StatusCode> {
    caller.require_role(
        ROLE_ADMIN,
        "Vous n'avez pas les droits suffisants pour modifier un auteur",
    )?;

    let mut author = load_author(&state, id)?;
    let input: AuthorInput = serializer::deserialize(&body)?;
    author.hydrate(input);
    reject_violations(author.validate())?;

    state.authors.persist(&mut author).map_err(store_error)?;
    state.cache.invalidate_tags(&[AUTHORS_CACHE_TAG]).await;

    tracing::info!(author_id = id, caller = ?caller.subject(), "author updated");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/authors/{id}
pub async fn delete_author(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<AuthorId>,
) -> AppResult<StatusCode> {
    caller.require_role(
        ROLE_ADMIN,
        "Vous n'avez pas les droits suffisants pour supprimer un auteur",
    )?;

    load_author(&state, id)?;
    state.cache.invalidate_tags(&[AUTHORS_CACHE_TAG]).await;
    state.authors.remove(id).map_err(store_error)?;

    tracing::info!(author_id = id, caller = ?caller.subject(), "author deleted");
    Ok(StatusCode::NO_CONTENT)
}

fn load_author(state: &AppState, id: AuthorId) -> AppResult<Author> {
    state
        .authors
        .find(id)
        .map_err(store_error)?
        .ok_or_else(|| AppError::not_found(format!("Author {id} not found")))
}
