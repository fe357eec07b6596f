//! Ingredient Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Ingredient, IngredientCreate, IngredientUpdate};
use shared::util::now_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const INGREDIENT_TABLE: &str = "ingredient";

#[derive(Clone)]
pub struct IngredientRepository {
    base: BaseRepository,
}

impl IngredientRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All ingredients of one owner
    pub async fn find_by_owner(&self, owner_id: &str) -> RepoResult<Vec<Ingredient>> {
        let ingredients: Vec<Ingredient> = self
            .base
            .db()
            .query("SELECT * FROM ingredient WHERE owner_id = $owner ORDER BY name")
            .bind(("owner", owner_id.to_string()))
            .await?
            .take(0)?;
        Ok(ingredients)
    }

    /// Find ingredient by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Ingredient>> {
        let record_id: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ingredient ID: {}", id)))?;
        let ingredient: Option<Ingredient> = self.base.db().select(record_id).await?;
        Ok(ingredient)
    }

    /// Create a new ingredient for the given owner
    pub async fn create(&self, owner_id: &str, data: IngredientCreate) -> RepoResult<Ingredient> {
        if !data.current_unit_price.is_finite() || data.current_unit_price < 0.0 {
            return Err(RepoError::Validation(format!(
                "current_unit_price must be a non-negative number, got {}",
                data.current_unit_price
            )));
        }

        let now = now_millis();
        let ingredient = Ingredient {
            id: None,
            owner_id: owner_id.to_string(),
            name: data.name,
            unit: data.unit,
            current_unit_price: data.current_unit_price,
            created_at: now,
            updated_at: now,
        };

        let created: Option<Ingredient> = self
            .base
            .db()
            .create(INGREDIENT_TABLE)
            .content(ingredient)
            .await?;

        created.ok_or_else(|| RepoError::Database("Failed to create ingredient".to_string()))
    }

    /// Update an ingredient (partial)
    ///
    /// Changing `current_unit_price` affects only future batch items; the
    /// snapshots in existing batch lines stay frozen.
    pub async fn update(&self, id: &str, data: IngredientUpdate) -> RepoResult<Ingredient> {
        let record_id: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ingredient ID: {}", id)))?;

        if let Some(price) = data.current_unit_price {
            if !price.is_finite() || price < 0.0 {
                return Err(RepoError::Validation(format!(
                    "current_unit_price must be a non-negative number, got {}",
                    price
                )));
            }
        }

        let mut set_parts: Vec<&str> = Vec::new();
        if data.name.is_some() {
            set_parts.push("name = $name");
        }
        if data.unit.is_some() {
            set_parts.push("unit = $unit");
        }
        if data.current_unit_price.is_some() {
            set_parts.push("current_unit_price = $price");
        }

        if set_parts.is_empty() {
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("Ingredient {} not found", id)));
        }
        set_parts.push("updated_at = $now");

        let query_str = format!("UPDATE $id SET {} RETURN AFTER", set_parts.join(", "));

        let mut query = self
            .base
            .db()
            .query(&query_str)
            .bind(("id", record_id))
            .bind(("now", now_millis()));

        if let Some(v) = data.name {
            query = query.bind(("name", v));
        }
        if let Some(v) = data.unit {
            query = query.bind(("unit", v));
        }
        if let Some(v) = data.current_unit_price {
            query = query.bind(("price", v));
        }

        let mut result = query.await?;
        let ingredients: Vec<Ingredient> = result.take(0)?;
        ingredients
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Ingredient {} not found", id)))
    }

    /// Hard delete an ingredient; batch lines keep their snapshots
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let record_id: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ingredient ID: {}", id)))?;

        let deleted: Option<Ingredient> = self.base.db().delete(record_id).await?;
        if deleted.is_none() {
            return Err(RepoError::NotFound(format!("Ingredient {} not found", id)));
        }
        Ok(())
    }
}
