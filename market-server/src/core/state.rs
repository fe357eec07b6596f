//! Server state

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::core::Config;
use crate::db::DbService;

/// Server state — shared handle to configuration and the embedded database
///
/// Cloning is shallow; handlers construct repositories and services from the
/// database handle per request.
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// Embedded database (SurrealDB)
    pub db: Surreal<Db>,
}

impl ServerState {
    pub fn new(config: Config, db: Surreal<Db>) -> Self {
        Self { config, db }
    }

    /// Initialize server state: working directory, then database
    ///
    /// # Panics
    ///
    /// Panics when the database cannot be initialized.
    pub async fn initialize(config: &Config) -> Self {
        std::fs::create_dir_all(config.database_path())
            .expect("Failed to create work directory structure");

        let db_path = config.database_path().join("market.db");
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");

        Self::new(config.clone(), db_service.db)
    }

    /// In-memory state for tests
    pub async fn initialize_memory(config: &Config) -> Self {
        let db_service = DbService::new_memory()
            .await
            .expect("Failed to initialize in-memory database");
        Self::new(config.clone(), db_service.db)
    }

    /// Clone the raw database handle
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }
}
