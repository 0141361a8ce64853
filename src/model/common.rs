use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Server-assigned row identifier (`SERIAL` in PostgreSQL)
pub type Id = i32;

/// Body returned by create, update and delete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdResponse {
    pub id: Id,
}

impl IdResponse {
    pub fn new(id: Id) -> Self {
        Self { id }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("invalid {field} '{value}', expected one of: {expected}")]
    UnknownVariant {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("id must match ^\\d+$, got '{0}'")]
    InvalidId(String),
}

/// Checks a request view beyond what its types already guarantee.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Parse an `{id}` path segment. Only ASCII digits are accepted, so signs,
/// whitespace and decimal points are rejected before the value reaches a store.
///
/// A well-formed id too large for `Id` yields `Ok(None)`: no stored row can
/// carry it, so callers treat it as not found.
pub fn parse_id(raw: &str) -> Result<Option<Id>, ValidationError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidId(raw.to_string()));
    }
    Ok(raw.parse::<Id>().ok())
}

/// `deserialize_with` target for patch fields: an absent field stays `None`
/// (with `#[serde(default)]`), an explicit `null` is a type error.
pub(crate) fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

pub(crate) fn require_non_empty(
    field: &'static str,
    value: &str,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::EmptyField { field })
    } else {
        Ok(())
    }
}
