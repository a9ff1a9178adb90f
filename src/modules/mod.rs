pub mod authors;
pub mod books;

use shelf_db::DbError;
use shelf_http::AppError;
use shelf_kernel::{validation::Violation, ModuleRegistry};

use crate::state::AppState;

/// Register all feature modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, state: &AppState) {
    registry.register(authors::create_module(state.clone()));
    registry.register(books::create_module(state.clone()));
}

/// Maps persistence failures onto HTTP errors. Only a row that vanished
/// between lookup and write is a client-visible 404; everything else is opaque.
pub(crate) fn store_error(err: DbError) -> AppError {
    match err {
        DbError::NotFound { .. } => AppError::not_found(err.to_string()),
        other => AppError::Internal(other.into()),
    }
}

/// Short-circuits a handler when validation produced any violation.
pub(crate) fn reject_violations(violations: Vec<Violation>) -> Result<(), AppError> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(AppError::violations(violations))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use shelf_db::Database;

    /// In-memory database with both module schemas applied.
    pub fn migrated_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.apply_migrations(&[
            ("authors".to_string(), super::authors::INIT_MIGRATION),
            ("books".to_string(), super::books::INIT_MIGRATION),
        ])
        .unwrap();
        db
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vanished_rows_are_not_found() {
        let err = store_error(DbError::NotFound {
            entity: "book",
            id: 3,
        });
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[test]
    fn other_store_failures_are_internal() {
        assert!(matches!(store_error(DbError::Poisoned), AppError::Internal(_)));
    }

    #[test]
    fn empty_violation_list_passes() {
        assert!(reject_violations(Vec::new()).is_ok());
        assert!(matches!(
            reject_violations(vec![Violation::new("title", "blank")]),
            Err(AppError::Validation { .. })
        ));
    }
}
