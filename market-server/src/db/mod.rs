//! Database Module
//!
//! Owns the embedded SurrealDB instance and startup schema definition.

pub mod models;
pub mod repository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

const NAMESPACE: &str = "market";
const DATABASE: &str = "market";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open the on-disk database (RocksDB engine) and apply schema definitions
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db: Surreal<Db> = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        let service = Self { db };
        service.select_and_define().await?;

        tracing::info!(path = %db_path, "Database connection established (SurrealDB RocksDB)");
        Ok(service)
    }

    /// Open an in-memory database (tests)
    pub async fn new_memory() -> Result<Self, AppError> {
        let db: Surreal<Db> = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;

        let service = Self { db };
        service.select_and_define().await?;
        Ok(service)
    }

    async fn select_and_define(&self) -> Result<(), AppError> {
        self.db
            .use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        // Lookup indexes for the hot query paths. Tables stay schemaless;
        // repositories own the shape of each row.
        self.db
            .query(
                r#"
                DEFINE INDEX IF NOT EXISTS cart_user_product ON cart_item FIELDS user_id, product_id UNIQUE;
                DEFINE INDEX IF NOT EXISTS order_buyer ON order FIELDS buyer_id;
                DEFINE INDEX IF NOT EXISTS order_item_order ON order_item FIELDS order_id;
                DEFINE INDEX IF NOT EXISTS order_item_owner ON order_item FIELDS owner_id;
                DEFINE INDEX IF NOT EXISTS purchase_owner ON purchase FIELDS owner_id;
                DEFINE INDEX IF NOT EXISTS product_owner ON product FIELDS owner_id;
                DEFINE INDEX IF NOT EXISTS ingredient_owner ON ingredient FIELDS owner_id;
                DEFINE INDEX IF NOT EXISTS batch_owner ON ingredient_batch FIELDS owner_id;
                DEFINE INDEX IF NOT EXISTS batch_item_batch ON ingredient_batch_item FIELDS batch_id;
                "#,
            )
            .await
            .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?;

        Ok(())
    }

    /// Clone the raw database handle
    pub fn handle(&self) -> Surreal<Db> {
        self.db.clone()
    }
}
