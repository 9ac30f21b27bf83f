/// CRUD round trips against a migrated database
pub mod crud_tests;

use migration::MigratorTrait;
use sea_orm::DatabaseConnection;

use crate::db::connect;

/// Connect and migrate, or `None` when database tests are disabled or unreachable.
pub(crate) async fn setup_test_db() -> Option<DatabaseConnection> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return None;
    }
    let db = match connect().await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("skip: cannot connect to db: {}", e);
            return None;
        }
    };
    if let Err(e) = migration::Migrator::up(&db, None).await {
        eprintln!("skip: migrate up failed: {}", e);
        return None;
    }
    Some(db)
}
