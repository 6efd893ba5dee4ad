//! Migration driver: brings the database to the canonical post-migration
//! state regardless of what it contained before.
//!
//! Two strategies share the same postcondition. The primary one drives
//! the embedded refinery engine over the versioned scripts after a
//! destructive clean; the fallback executes each script as one batch.
//! The clean is deliberate — this is a demonstration harness and no
//! production data is presumed.

use crate::config::DbConfig;
use crate::db::Session;
use crate::error::{HarnessError, Result};
use async_trait::async_trait;
use tracing::{info, warn};

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("db/migration");
}

/// Schema DDL, also used by the manual fallback path.
pub const SCHEMA_SCRIPT: &str = include_str!("../../db/migration/V1__Create_schema.sql");

/// Seed data, applied after the schema.
pub const SEED_SCRIPT: &str = include_str!("../../db/migration/V2__Insert_test_data.sql");

/// A way of bringing the database to the canonical migrated state.
#[async_trait]
pub trait MigrationStrategy {
    /// Human-readable strategy name for logs.
    fn name(&self) -> &'static str;

    /// Apply all migrations on a fresh session.
    async fn apply(&self, config: &DbConfig) -> Result<()>;
}

/// Primary path: clean the schema, then run the embedded migration engine.
pub struct EngineMigration;

#[async_trait]
impl MigrationStrategy for EngineMigration {
    fn name(&self) -> &'static str {
        "engine"
    }

    async fn apply(&self, config: &DbConfig) -> Result<()> {
        let mut session = Session::connect(config).await?;

        // Destroy everything, including the engine's own history table,
        // so the resulting state is a pure function of the scripts.
        session
            .batch_execute("DROP SCHEMA public CASCADE; CREATE SCHEMA public")
            .await?;

        let report = embedded::migrations::runner()
            .run_async(&mut *session)
            .await
            .map_err(|e| HarnessError::Migration(e.to_string()))?;

        for migration in report.applied_migrations() {
            info!("applied migration: {}", migration);
        }
        Ok(())
    }
}

/// Fallback path: execute each migration script as a single batch, in
/// filename order. The schema script drops existing tables first, so
/// no separate clean is needed.
pub struct ManualBatchMigration;

#[async_trait]
impl MigrationStrategy for ManualBatchMigration {
    fn name(&self) -> &'static str {
        "manual batch"
    }

    async fn apply(&self, config: &DbConfig) -> Result<()> {
        let session = Session::connect(config).await?;

        for (name, script) in [
            ("V1__Create_schema.sql", SCHEMA_SCRIPT),
            ("V2__Insert_test_data.sql", SEED_SCRIPT),
        ] {
            info!("executing migration script: {}", name);
            session
                .batch_execute(script)
                .await
                .map_err(|e| HarnessError::Migration(format!("{}: {}", name, e)))?;
        }
        Ok(())
    }
}

/// Bring the database to the canonical state: try the engine first,
/// fall back to manual batches on any engine failure.
pub async fn migrate(config: &DbConfig) -> Result<()> {
    println!("🔄 Запуск миграций базы данных...");

    match EngineMigration.apply(config).await {
        Ok(()) => {
            println!("✅ Миграции выполнены успешно");
            return Ok(());
        }
        Err(e) => {
            warn!("engine migration failed: {}", e);
            println!("❌ Ошибка движка миграций: {}", e);
            println!("🔄 Попытка ручной миграции...");
        }
    }

    ManualBatchMigration.apply(config).await?;
    println!("✅ Ручные миграции выполнены успешно");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_script_defines_all_tables() {
        for table in ["products", "customer", "order_status", "orders"] {
            let needle = format!("CREATE TABLE {}", table);
            assert!(
                SCHEMA_SCRIPT.contains(&needle),
                "schema script must create {}",
                table
            );
        }
    }

    #[test]
    fn schema_script_is_self_resetting() {
        // The manual path runs without an engine-level clean.
        assert!(SCHEMA_SCRIPT.contains("DROP TABLE IF EXISTS orders CASCADE"));
        assert!(SCHEMA_SCRIPT.contains("DROP TABLE IF EXISTS products CASCADE"));
    }

    #[test]
    fn seed_contains_required_status_labels() {
        for label in ["Новый", "Завершен", "Отменен"] {
            assert!(SEED_SCRIPT.contains(label), "seed must contain {}", label);
        }
    }

    #[test]
    fn seed_satisfies_catalog_preconditions() {
        // Orders 16 and 17 must exist for catalog entry 9.
        assert!(SEED_SCRIPT.contains("(16,"));
        assert!(SEED_SCRIPT.contains("(17,"));
        // Electronics above id 10 for the scenario price update.
        assert!(SEED_SCRIPT.contains("(11, 'Наушники"));
        assert!(SEED_SCRIPT.contains("(12, 'Планшет"));
    }
}
