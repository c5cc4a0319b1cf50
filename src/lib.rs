//! Book tracker application library
//!
//! Wires the application modules onto the kernel, database and HTTP facade.

pub mod modules;

use anyhow::Context;
use axum::Router;

use booktracker_db::Database;
use booktracker_kernel::{settings::Settings, InitCtx, ModuleRegistry};

/// Fully initialised application: modules are migrated and initialised and
/// the router is ready to serve.
pub struct App {
    pub registry: ModuleRegistry,
    pub router: Router,
}

/// Register modules, apply their migrations and build the router.
pub async fn bootstrap(settings: &Settings, db: &Database) -> anyhow::Result<App> {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, db);

    let applied = db
        .migrate(registry.collect_migrations())
        .await
        .context("failed to apply migrations")?;
    tracing::info!(applied, "schema up to date");

    let ctx = InitCtx { settings, db };
    registry.init_modules(&ctx).await?;

    let router = booktracker_http::build_router(&registry, settings);
    Ok(App { registry, router })
}
