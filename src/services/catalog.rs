use serde_json::Value;
use std::sync::Arc;

use super::{decode, decode_all, ServiceError, CATEGORIES, RECIPES};
use crate::models::{Category, CategoryData, Identified, Recipe, RecipeData};
use crate::store::{DocumentStore, FieldValue, Fields, StoreError};

const CREATED_AT: &str = "createdAt";
const UPDATED_AT: &str = "updatedAt";

/// Recipe keys left out of the serialized form when unset.
const OPTIONAL_RECIPE_KEYS: [&str; 4] =
    ["description", "categoryId", "highlightInfo", "references"];
const LIST_RECIPE_KEYS: [&str; 3] = ["images", "ingredients", "steps"];

/// Categories and recipes of the recipe catalog.
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn DocumentStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn get_all_categories(&self) -> Result<Vec<Category>, ServiceError> {
        decode_all(CATEGORIES, self.store.list(CATEGORIES).await?)
    }

    pub async fn get_category_by_id(&self, id: &str) -> Result<Option<Category>, ServiceError> {
        self.store
            .get(CATEGORIES, id)
            .await?
            .map(|snapshot| decode(CATEGORIES, snapshot))
            .transpose()
    }

    /// Store a category stamped with equal `createdAt`/`updatedAt` store times.
    ///
    /// The returned value carries the new id but not the timestamps.
    pub async fn create_category(
        &self,
        category: CategoryData,
    ) -> Result<Identified<CategoryData>, ServiceError> {
        let fields = Fields::from_serialize(&category)?
            .with_server_timestamp(CREATED_AT)
            .with_server_timestamp(UPDATED_AT);
        let id = self.store.create(CATEGORIES, fields).await?;
        tracing::info!(%id, slug = %category.slug, "created category");
        Ok(Identified::new(id, category))
    }

    /// Recipes that reference the category are left as they are.
    pub async fn delete_category(&self, id: &str) -> Result<(), ServiceError> {
        self.store.delete(CATEGORIES, id).await?;
        tracing::info!(id, "deleted category");
        Ok(())
    }

    pub async fn get_all_recipes(&self) -> Result<Vec<Recipe>, ServiceError> {
        decode_all(RECIPES, self.store.list(RECIPES).await?)
    }

    pub async fn get_recipe_by_id(&self, id: &str) -> Result<Option<Recipe>, ServiceError> {
        self.store
            .get(RECIPES, id)
            .await?
            .map(|snapshot| decode(RECIPES, snapshot))
            .transpose()
    }

    /// Recipes whose `categoryId` equals `category_id`, in listing order.
    ///
    /// Scans the whole recipes collection and filters in process, so each call
    /// costs O(total recipes).
    pub async fn get_recipes_by_category(
        &self,
        category_id: &str,
    ) -> Result<Vec<Recipe>, ServiceError> {
        let recipes = self.get_all_recipes().await?;
        let total = recipes.len();
        let matching: Vec<Recipe> = recipes
            .into_iter()
            .filter(|recipe| recipe.data.category_id.as_deref() == Some(category_id))
            .collect();
        tracing::debug!(category_id, total, matched = matching.len(), "filtered recipes");
        Ok(matching)
    }

    pub async fn create_recipe(
        &self,
        recipe: RecipeData,
    ) -> Result<Identified<RecipeData>, ServiceError> {
        let fields = Fields::from_serialize(&recipe)?
            .with_server_timestamp(CREATED_AT)
            .with_server_timestamp(UPDATED_AT);
        let id = self.store.create(RECIPES, fields).await?;
        tracing::info!(%id, title = %recipe.title, "created recipe");
        Ok(Identified::new(id, recipe))
    }

    /// Write every recipe field and refresh `updatedAt`.
    ///
    /// Optional fields that are unset in `recipe` are cleared in the store.
    pub async fn update_recipe(
        &self,
        id: &str,
        recipe: RecipeData,
    ) -> Result<Identified<RecipeData>, ServiceError> {
        let fields = replacement_fields(&recipe)?.with_server_timestamp(UPDATED_AT);
        self.store.update(RECIPES, id, fields).await?;
        tracing::info!(id, "updated recipe");
        Ok(Identified::new(id, recipe))
    }

    pub async fn delete_recipe(&self, id: &str) -> Result<(), ServiceError> {
        self.store.delete(RECIPES, id).await?;
        tracing::info!(id, "deleted recipe");
        Ok(())
    }
}

/// All recipe fields, with unset optionals as `null` and empty lists as `[]`.
fn replacement_fields(recipe: &RecipeData) -> Result<Fields, StoreError> {
    let mut fields = Fields::from_serialize(recipe)?;
    for key in OPTIONAL_RECIPE_KEYS {
        if !fields.contains(key) {
            fields.insert(key, FieldValue::Value(Value::Null));
        }
    }
    for key in LIST_RECIPE_KEYS {
        if !fields.contains(key) {
            fields.insert(key, FieldValue::Value(Value::Array(Vec::new())));
        }
    }
    Ok(fields)
}
