use std::sync::Arc;

use axum::extract::FromRef;
use shelf_authz::Authenticator;
use shelf_cache::TagAwareCache;
use shelf_db::Database;
use shelf_kernel::Settings;

use crate::modules::authors::repository::{AuthorRepository, SqliteAuthorRepository};
use crate::modules::books::repository::{BookRepository, SqliteBookRepository};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub db: Database,
    pub authors: Arc<dyn AuthorRepository>,
    pub books: Arc<dyn BookRepository>,
    /// Serialized list pages keyed by `getAll{Resource}-{page}-{limit}`
    pub cache: Arc<TagAwareCache<serde_json::Value>>,
    pub auth: Arc<Authenticator>,
}

impl AppState {
    pub fn new(settings: Settings, db: Database) -> Self {
        let auth = Authenticator::from_settings(&settings.auth);
        Self {
            authors: Arc::new(SqliteAuthorRepository::new(db.clone())),
            books: Arc::new(SqliteBookRepository::new(db.clone())),
            cache: Arc::new(TagAwareCache::new()),
            auth: Arc::new(auth),
            settings: Arc::new(settings),
            db,
        }
    }
}

impl FromRef<AppState> for Arc<Authenticator> {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}
