#![cfg(test)]
use tokio::sync::OnceCell;
use sea_orm::DatabaseConnection;
use migration::MigratorTrait;
use models::db::{connect_with_config, DatabaseConfig};

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<bool> = OnceCell::const_new();

fn config() -> DatabaseConfig {
    DatabaseConfig::from_file().unwrap_or_else(|_| DatabaseConfig::from_env())
}

/// Migrated connection, or `None` when database tests are disabled or no database answers.
pub async fn get_db() -> Option<DatabaseConnection> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return None;
    }
    let migrated = *MIGRATED
        .get_or_init(|| async {
            let db = match connect_with_config(&config()).await {
                Ok(db) => db,
                Err(e) => {
                    eprintln!("skip: cannot connect to db: {}", e);
                    return false;
                }
            };
            match migration::Migrator::up(&db, None).await {
                Ok(()) => true,
                Err(e) => {
                    eprintln!("skip: migrate up failed: {}", e);
                    false
                }
            }
        })
        .await;
    if !migrated {
        return None;
    }

    // Fresh connection for the current test's runtime
    let mut cfg = config();
    cfg.max_connections = cfg.max_connections.max(5);
    cfg.min_connections = cfg.min_connections.min(1);
    cfg.acquire_timeout = std::time::Duration::from_secs(10);
    connect_with_config(&cfg).await.ok()
}

/// Per-test scratch directory under `target/test-data`.
pub fn scratch_dir(label: &str) -> std::path::PathBuf {
    std::path::PathBuf::from(format!("target/test-data/{}-{}", label, uuid::Uuid::new_v4()))
}
