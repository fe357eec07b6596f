//! Purchase Repository (seller revenue ledger)
//!
//! Read-only: purchases are written inside the checkout transaction and
//! removed inside the rejection cleanup, both in `OrderRepository`.

use super::{BaseRepository, RepoResult};
use crate::db::models::Purchase;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct PurchaseRepository {
    base: BaseRepository,
}

impl PurchaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// A seller's sales, newest first
    ///
    /// Keyed directly by owner — no join through the order table.
    pub async fn find_by_owner(&self, owner_id: &str) -> RepoResult<Vec<Purchase>> {
        let purchases: Vec<Purchase> = self
            .base
            .db()
            .query("SELECT * FROM purchase WHERE owner_id = $owner ORDER BY sold_at DESC")
            .bind(("owner", owner_id.to_string()))
            .await?
            .take(0)?;
        Ok(purchases)
    }
}
