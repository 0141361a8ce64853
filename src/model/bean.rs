use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::model::{present, require_non_empty, Id, Validate, ValidationError};

/// Column order used for `SELECT` and `RETURNING` on `beans`
pub const BEAN_COLUMNS: &[&str] = &["id", "name", "origin", "variety", "roast_level"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoastLevel {
    Light,
    Medium,
    #[serde(alias = "medium_dark")]
    MediumDark,
    Dark,
}

impl RoastLevel {
    pub const ALL: [RoastLevel; 4] = [
        RoastLevel::Light,
        RoastLevel::Medium,
        RoastLevel::MediumDark,
        RoastLevel::Dark,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoastLevel::Light => "light",
            RoastLevel::Medium => "medium",
            RoastLevel::MediumDark => "medium-dark",
            RoastLevel::Dark => "dark",
        }
    }
}

impl fmt::Display for RoastLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoastLevel {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "light" => Ok(RoastLevel::Light),
            "medium" => Ok(RoastLevel::Medium),
            "medium-dark" | "medium_dark" => Ok(RoastLevel::MediumDark),
            "dark" => Ok(RoastLevel::Dark),
            other => Err(ValidationError::UnknownVariant {
                field: "roastLevel",
                value: other.to_string(),
                expected: "light, medium, medium-dark, dark",
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bean {
    pub id: Id,
    pub name: String,
    pub origin: String,
    pub variety: String,
    pub roast_level: RoastLevel,
}

/// Input model for creating a bean; every field is required
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBean {
    pub name: String,
    pub origin: String,
    pub variety: String,
    pub roast_level: RoastLevel,
}

impl NewBean {
    /// Convert to a full Bean with the store-assigned id
    pub fn into_bean(self, id: Id) -> Bean {
        let NewBean {
            name,
            origin,
            variety,
            roast_level,
        } = self;

        Bean {
            id,
            name,
            origin,
            variety,
            roast_level,
        }
    }
}

impl Validate for NewBean {
    fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("name", &self.name)
    }
}

/// Partial update for a bean; absent fields are left untouched and an
/// explicit `null` is rejected
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeanPatch {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub origin: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub variety: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub roast_level: Option<RoastLevel>,
}

impl BeanPatch {
    pub fn is_empty(&self) -> bool {
        *self == BeanPatch::default()
    }

    pub fn apply_to(self, bean: &mut Bean) {
        let BeanPatch {
            name,
            origin,
            variety,
            roast_level,
        } = self;
        let Bean {
            id: _,
            name: current_name,
            origin: current_origin,
            variety: current_variety,
            roast_level: current_roast_level,
        } = bean;

        if let Some(value) = name {
            *current_name = value;
        }
        if let Some(value) = origin {
            *current_origin = value;
        }
        if let Some(value) = variety {
            *current_variety = value;
        }
        if let Some(value) = roast_level {
            *current_roast_level = value;
        }
    }
}

impl Validate for BeanPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        match &self.name {
            Some(name) => require_non_empty("name", name),
            None => Ok(()),
        }
    }
}
