use axum::{extract::State, http::StatusCode, response::Json};

use crate::api::extract::{RecordId, ValidJson};
use crate::api::handlers::{create_failed, not_found, store_failure, ApiError, AppState};
use crate::model::{Bean, BeanPatch, IdResponse, NewBean};
use crate::store::traits::Store;

/// GET /beans
pub async fn list_beans<S: Store>(
    State(store): State<AppState<S>>,
) -> Result<Json<Vec<Bean>>, ApiError> {
    match store.list_beans().await {
        Ok(beans) => Ok(Json(beans)),
        Err(e) => Err(store_failure("list beans", e)),
    }
}

/// POST /beans
pub async fn create_bean<S: Store>(
    State(store): State<AppState<S>>,
    ValidJson(new_bean): ValidJson<NewBean>,
) -> Result<(StatusCode, Json<IdResponse>), ApiError> {
    match store.create_bean(new_bean).await {
        Ok(Some(bean)) => {
            log::info!("Created bean {} '{}'", bean.id, bean.name);
            Ok((StatusCode::CREATED, Json(IdResponse::new(bean.id))))
        }
        Ok(None) => Err(create_failed("bean", None)),
        Err(e) => Err(create_failed("bean", Some(e))),
    }
}

/// PATCH /beans/{id}
/// Overwrites only the fields present in the body
pub async fn update_bean<S: Store>(
    State(store): State<AppState<S>>,
    record_id: RecordId,
    ValidJson(patch): ValidJson<BeanPatch>,
) -> Result<Json<IdResponse>, ApiError> {
    let id = record_id.or_not_found("Bean")?;

    match store.update_bean(id, patch).await {
        Ok(Some(bean)) => {
            log::info!("Updated bean {}", bean.id);
            Ok(Json(IdResponse::new(bean.id)))
        }
        Ok(None) => {
            log::warn!("Bean {} not found for update", id);
            Err(not_found("Bean"))
        }
        Err(e) => Err(store_failure("update bean", e)),
    }
}

/// DELETE /beans/{id}
pub async fn delete_bean<S: Store>(
    State(store): State<AppState<S>>,
    record_id: RecordId,
) -> Result<Json<IdResponse>, ApiError> {
    let id = record_id.or_not_found("Bean")?;

    match store.delete_bean(id).await {
        Ok(Some(bean)) => {
            log::info!("Deleted bean {}", bean.id);
            Ok(Json(IdResponse::new(bean.id)))
        }
        Ok(None) => {
            log::warn!("Bean {} not found for delete", id);
            Err(not_found("Bean"))
        }
        Err(e) => Err(store_failure("delete bean", e)),
    }
}
