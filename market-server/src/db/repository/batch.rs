//! Ingredient Batch Repository
//!
//! Batches are immutable once created (delete only), so the write surface is
//! one transactional create and one cascading delete.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{IngredientBatch, IngredientBatchItem};
use serde::Serialize;
use shared::util::now_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

/// One resolved line going into a batch-create transaction
/// (snapshot price and line cost already computed by the caller)
#[derive(Debug, Clone, Serialize)]
pub struct BatchLine {
    pub ingredient: RecordId,
    pub quantity_used: f64,
    pub unit_price_snapshot: f64,
    pub line_cost: f64,
}

#[derive(Clone)]
pub struct BatchRepository {
    base: BaseRepository,
}

impl BatchRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All batches of one owner, newest period first
    pub async fn find_by_owner(&self, owner_id: &str) -> RepoResult<Vec<IngredientBatch>> {
        let batches: Vec<IngredientBatch> = self
            .base
            .db()
            .query("SELECT * FROM ingredient_batch WHERE owner_id = $owner ORDER BY created_at DESC")
            .bind(("owner", owner_id.to_string()))
            .await?
            .take(0)?;
        Ok(batches)
    }

    /// Find batch by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<IngredientBatch>> {
        let record_id = parse_batch_id(id)?;
        let batch: Option<IngredientBatch> = self.base.db().select(record_id).await?;
        Ok(batch)
    }

    /// Line items of a batch
    pub async fn find_items(&self, batch_id: &str) -> RepoResult<Vec<IngredientBatchItem>> {
        let record_id = parse_batch_id(batch_id)?;
        let items: Vec<IngredientBatchItem> = self
            .base
            .db()
            .query("SELECT * FROM ingredient_batch_item WHERE batch_id = $batch ORDER BY created_at")
            .bind(("batch", record_id))
            .await?
            .take(0)?;
        Ok(items)
    }

    /// Create a batch and its lines in one transaction
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        owner_id: &str,
        category: &str,
        period_start: Option<i64>,
        period_end: Option<i64>,
        notes: Option<String>,
        total_cost: f64,
        lines: Vec<BatchLine>,
    ) -> RepoResult<IngredientBatch> {
        if let (Some(start), Some(end)) = (period_start, period_end) {
            if start > end {
                return Err(RepoError::Validation(
                    "period_start must not be after period_end".into(),
                ));
            }
        }

        let mut result = self
            .base
            .db()
            .query(
                r#"
                BEGIN TRANSACTION;
                LET $batch = (CREATE ONLY ingredient_batch CONTENT {
                    owner_id: $owner,
                    category: $category,
                    period_start: $period_start,
                    period_end: $period_end,
                    notes: $notes,
                    total_cost: $total_cost,
                    created_at: $now,
                    updated_at: $now
                });
                FOR $line IN $lines {
                    CREATE ingredient_batch_item CONTENT {
                        batch_id: $batch.id,
                        ingredient_id: $line.ingredient,
                        quantity_used: $line.quantity_used,
                        unit_price_snapshot: $line.unit_price_snapshot,
                        line_cost: $line.line_cost,
                        created_at: $now
                    };
                };
                RETURN $batch;
                COMMIT TRANSACTION;
                "#,
            )
            .bind(("owner", owner_id.to_string()))
            .bind(("category", category.to_string()))
            .bind(("period_start", period_start))
            .bind(("period_end", period_end))
            .bind(("notes", notes))
            .bind(("total_cost", total_cost))
            .bind(("lines", lines))
            .bind(("now", now_millis()))
            .await?;

        let last = result.num_statements().saturating_sub(1);
        let batch: Option<IngredientBatch> = result.take(last)?;
        batch.ok_or_else(|| RepoError::Database("Batch transaction returned no batch".into()))
    }

    /// Delete a batch and its lines
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let record_id = parse_batch_id(id)?;

        let found = self.find_by_id(id).await?;
        if found.is_none() {
            return Err(RepoError::NotFound(format!("Batch {} not found", id)));
        }

        self.base
            .db()
            .query(
                r#"
                BEGIN TRANSACTION;
                DELETE ingredient_batch_item WHERE batch_id = $id;
                DELETE $id;
                COMMIT TRANSACTION;
                "#,
            )
            .bind(("id", record_id))
            .await?;
        Ok(())
    }
}

fn parse_batch_id(id: &str) -> RepoResult<RecordId> {
    id.parse()
        .map_err(|_| RepoError::Validation(format!("Invalid batch ID: {}", id)))
}
