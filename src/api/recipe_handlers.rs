use axum::{extract::State, http::StatusCode, response::Json};

use crate::api::extract::{RecordId, ValidJson};
use crate::api::handlers::{create_failed, not_found, store_failure, ApiError, AppState};
use crate::model::{IdResponse, NewRecipe, Recipe, RecipePatch};
use crate::store::traits::Store;

/// GET /recipes
pub async fn list_recipes<S: Store>(
    State(store): State<AppState<S>>,
) -> Result<Json<Vec<Recipe>>, ApiError> {
    match store.list_recipes().await {
        Ok(recipes) => Ok(Json(recipes)),
        Err(e) => Err(store_failure("list recipes", e)),
    }
}

/// POST /recipes
pub async fn create_recipe<S: Store>(
    State(store): State<AppState<S>>,
    ValidJson(new_recipe): ValidJson<NewRecipe>,
) -> Result<(StatusCode, Json<IdResponse>), ApiError> {
    match store.create_recipe(new_recipe).await {
        Ok(Some(recipe)) => {
            log::info!("Created recipe {} '{}'", recipe.id, recipe.name);
            Ok((StatusCode::CREATED, Json(IdResponse::new(recipe.id))))
        }
        Ok(None) => Err(create_failed("recipe", None)),
        Err(e) => Err(create_failed("recipe", Some(e))),
    }
}

/// PATCH /recipes/{id}
pub async fn update_recipe<S: Store>(
    State(store): State<AppState<S>>,
    record_id: RecordId,
    ValidJson(patch): ValidJson<RecipePatch>,
) -> Result<Json<IdResponse>, ApiError> {
    let id = record_id.or_not_found("Recipe")?;

    match store.update_recipe(id, patch).await {
        Ok(Some(recipe)) => {
            log::info!("Updated recipe {}", recipe.id);
            Ok(Json(IdResponse::new(recipe.id)))
        }
        Ok(None) => {
            log::warn!("Recipe {} not found for update", id);
            Err(not_found("Recipe"))
        }
        Err(e) => Err(store_failure("update recipe", e)),
    }
}

/// DELETE /recipes/{id}
/// Fails while any note still references the recipe
pub async fn delete_recipe<S: Store>(
    State(store): State<AppState<S>>,
    record_id: RecordId,
) -> Result<Json<IdResponse>, ApiError> {
    let id = record_id.or_not_found("Recipe")?;

    match store.delete_recipe(id).await {
        Ok(Some(recipe)) => {
            log::info!("Deleted recipe {}", recipe.id);
            Ok(Json(IdResponse::new(recipe.id)))
        }
        Ok(None) => {
            log::warn!("Recipe {} not found for delete", id);
            Err(not_found("Recipe"))
        }
        Err(e) => Err(store_failure("delete recipe", e)),
    }
}
