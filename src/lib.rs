//! SHELF application library
//!
//! Wires the authors and books modules onto the kernel, database, cache and
//! HTTP crates. [`App`] is the single entry point used by the binaries and
//! the integration tests.

use anyhow::Context;
use axum::Router;
use shelf_db::Database;
use shelf_kernel::{InitCtx, ModuleRegistry, Settings};

pub mod fixtures;
pub mod modules;
pub mod pagination;
pub mod serializer;
pub mod state;

pub use state::AppState;

/// A fully wired application: registry plus shared state.
pub struct App {
    registry: ModuleRegistry,
    state: AppState,
}

impl App {
    /// Opens the database, registers and initializes every module.
    pub async fn build(settings: Settings) -> anyhow::Result<Self> {
        let db = Database::open(&settings.database).with_context(|| {
            format!("failed to open database at '{}'", settings.database.path)
        })?;
        let state = AppState::new(settings, db);

        let mut registry = ModuleRegistry::new();
        modules::register_all(&mut registry, &state);

        let ctx = InitCtx {
            settings: &state.settings,
        };
        registry.init_modules(&ctx).await?;

        Ok(Self { registry, state })
    }

    /// Applies every pending module migration.
    pub fn migrate(&self) -> anyhow::Result<usize> {
        let migrations = self.registry.collect_migrations();
        let applied = self
            .state
            .db
            .apply_migrations(&migrations)
            .context("failed to apply migrations")?;
        tracing::info!(
            applied,
            total = migrations.len(),
            "database schema up to date"
        );
        Ok(applied)
    }

    /// Build, migrate and start: the application is ready to serve.
    pub async fn bootstrap(settings: Settings) -> anyhow::Result<Self> {
        let app = Self::build(settings).await?;
        app.migrate()?;

        let ctx = InitCtx {
            settings: &app.state.settings,
        };
        app.registry.start_modules(&ctx).await?;

        tracing::info!(
            modules = app.registry.module_count(),
            env = ?app.state.settings.environment,
            "shelf bootstrap complete"
        );
        Ok(app)
    }

    pub fn router(&self) -> Router {
        shelf_http::build_router(&self.registry, &self.state.settings)
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Serves HTTP until ctrl-c, then stops the modules.
    pub async fn serve(self) -> anyhow::Result<()> {
        shelf_http::start_server(&self.registry, &self.state.settings).await?;

        let stats = self.state.cache.stats().await;
        tracing::info!(
            hits = stats.hits,
            misses = stats.misses,
            invalidated = stats.invalidated,
            entries = stats.total_entries,
            hit_rate = stats.hit_rate(),
            "list cache statistics"
        );

        self.registry.stop_modules().await
    }
}
