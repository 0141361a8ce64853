use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

use crate::api::handlers::{bad_request, not_found, ApiError};
use crate::model::{parse_id, Id, Validate};

/// The `{id}` path segment, checked against `^\d+$` and parsed before any
/// handler body runs. Rejections are 400 so they never look like a 404.
/// Holds `None` for a well-formed id beyond the `Id` range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordId(pub Option<Id>);

impl RecordId {
    /// The parsed id, or 404 for an id no stored row can carry
    pub fn or_not_found(self, entity: &str) -> Result<Id, ApiError> {
        self.0.ok_or_else(|| {
            log::warn!("{} id out of range", entity);
            not_found(entity)
        })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| bad_request(&rejection.body_text()))?;

        parse_id(&raw)
            .map(RecordId)
            .map_err(|e| bad_request(&e.to_string()))
    }
}

/// JSON body that has been deserialized into a request view and passed its
/// `Validate` checks. Every rejection is reported as 400 `{ message }`.
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| bad_request(&rejection.body_text()))?;

        value
            .validate()
            .map_err(|e| bad_request(&e.to_string()))?;

        Ok(Self(value))
    }
}
