use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::model::{present, Id, Validate, ValidationError};

/// Column order used for `SELECT` and `RETURNING` on `recipes`
pub const RECIPE_COLUMNS: &[&str] = &[
    "id",
    "name",
    "description",
    "instructions",
    "water_amount",
    "bean_amount",
    "brew_time",
    "temperature",
    "grinder_type",
    "grinder_name",
    "grinder_clicks",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrinderType {
    Manual,
    Electric,
}

impl GrinderType {
    pub const ALL: [GrinderType; 2] = [GrinderType::Manual, GrinderType::Electric];

    pub fn as_str(&self) -> &'static str {
        match self {
            GrinderType::Manual => "manual",
            GrinderType::Electric => "electric",
        }
    }
}

impl fmt::Display for GrinderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GrinderType {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "manual" => Ok(GrinderType::Manual),
            "electric" => Ok(GrinderType::Electric),
            other => Err(ValidationError::UnknownVariant {
                field: "grinderType",
                value: other.to_string(),
                expected: "manual, electric",
            }),
        }
    }
}

/// A brewing recipe. Amounts are millilitres (water), grams (beans),
/// seconds (brew time) and degrees Celsius (temperature).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: Id,
    pub name: String,
    pub description: String,
    pub instructions: String,
    pub water_amount: i32,
    pub bean_amount: i32,
    pub brew_time: i32,
    pub temperature: i32,
    pub grinder_type: GrinderType,
    pub grinder_name: Option<String>,
    pub grinder_clicks: Option<i32>,
}

/// Input model for creating a recipe. `grinderName` and `grinderClicks` may be
/// omitted and are stored as null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecipe {
    pub name: String,
    pub description: String,
    pub instructions: String,
    pub water_amount: i32,
    pub bean_amount: i32,
    pub brew_time: i32,
    pub temperature: i32,
    pub grinder_type: GrinderType,
    #[serde(default)]
    pub grinder_name: Option<String>,
    #[serde(default)]
    pub grinder_clicks: Option<i32>,
}

impl NewRecipe {
    pub fn into_recipe(self, id: Id) -> Recipe {
        let NewRecipe {
            name,
            description,
            instructions,
            water_amount,
            bean_amount,
            brew_time,
            temperature,
            grinder_type,
            grinder_name,
            grinder_clicks,
        } = self;

        Recipe {
            id,
            name,
            description,
            instructions,
            water_amount,
            bean_amount,
            brew_time,
            temperature,
            grinder_type,
            grinder_name,
            grinder_clicks,
        }
    }
}

impl Validate for NewRecipe {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// Partial update for a recipe. Absent fields are left untouched. A JSON
/// `null` is rejected for every field, including the optional grinder
/// columns, so those cannot be cleared through a patch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipePatch {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub instructions: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub water_amount: Option<i32>,
    #[serde(default, deserialize_with = "present")]
    pub bean_amount: Option<i32>,
    #[serde(default, deserialize_with = "present")]
    pub brew_time: Option<i32>,
    #[serde(default, deserialize_with = "present")]
    pub temperature: Option<i32>,
    #[serde(default, deserialize_with = "present")]
    pub grinder_type: Option<GrinderType>,
    #[serde(default, deserialize_with = "present")]
    pub grinder_name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub grinder_clicks: Option<i32>,
}

impl RecipePatch {
    pub fn is_empty(&self) -> bool {
        *self == RecipePatch::default()
    }

    pub fn apply_to(self, recipe: &mut Recipe) {
        let RecipePatch {
            name,
            description,
            instructions,
            water_amount,
            bean_amount,
            brew_time,
            temperature,
            grinder_type,
            grinder_name,
            grinder_clicks,
        } = self;
        let Recipe {
            id: _,
            name: current_name,
            description: current_description,
            instructions: current_instructions,
            water_amount: current_water_amount,
            bean_amount: current_bean_amount,
            brew_time: current_brew_time,
            temperature: current_temperature,
            grinder_type: current_grinder_type,
            grinder_name: current_grinder_name,
            grinder_clicks: current_grinder_clicks,
        } = recipe;

        if let Some(value) = name {
            *current_name = value;
        }
        if let Some(value) = description {
            *current_description = value;
        }
        if let Some(value) = instructions {
            *current_instructions = value;
        }
        if let Some(value) = water_amount {
            *current_water_amount = value;
        }
        if let Some(value) = bean_amount {
            *current_bean_amount = value;
        }
        if let Some(value) = brew_time {
            *current_brew_time = value;
        }
        if let Some(value) = temperature {
            *current_temperature = value;
        }
        if let Some(value) = grinder_type {
            *current_grinder_type = value;
        }
        if let Some(value) = grinder_name {
            *current_grinder_name = Some(value);
        }
        if let Some(value) = grinder_clicks {
            *current_grinder_clicks = Some(value);
        }
    }
}

impl Validate for RecipePatch {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v60_json() -> serde_json::Value {
        serde_json::json!({
            "name": "V60",
            "description": "Clean and bright",
            "instructions": "Bloom 30s, pour in three stages",
            "waterAmount": 300,
            "beanAmount": 18,
            "brewTime": 180,
            "temperature": 93,
            "grinderType": "manual"
        })
    }

    #[test]
    fn test_new_recipe_optional_grinder_fields_default_to_none() {
        let new_recipe: NewRecipe = serde_json::from_value(v60_json()).unwrap();
        assert_eq!(new_recipe.grinder_name, None);
        assert_eq!(new_recipe.grinder_clicks, None);

        let recipe = new_recipe.into_recipe(1);
        let json = serde_json::to_value(&recipe).unwrap();
        assert_eq!(json["grinderName"], serde_json::Value::Null);
        assert_eq!(json["grinderClicks"], serde_json::Value::Null);
        assert_eq!(json["waterAmount"], 300);
    }

    #[test]
    fn test_new_recipe_rejects_unknown_grinder_type() {
        let mut json = v60_json();
        json["grinderType"] = serde_json::json!("hand-crank");
        assert!(serde_json::from_value::<NewRecipe>(json).is_err());
    }

    #[test]
    fn test_new_recipe_rejects_fractional_amounts() {
        let mut json = v60_json();
        json["beanAmount"] = serde_json::json!(18.5);
        assert!(serde_json::from_value::<NewRecipe>(json).is_err());
    }

    #[test]
    fn test_new_recipe_requires_instructions() {
        let mut json = v60_json();
        json.as_object_mut().unwrap().remove("instructions");
        assert!(serde_json::from_value::<NewRecipe>(json).is_err());
    }

    #[test]
    fn test_grinder_fields_are_independent() {
        let mut recipe: Recipe = serde_json::from_value::<NewRecipe>(v60_json())
            .unwrap()
            .into_recipe(4);

        RecipePatch {
            grinder_clicks: Some(22),
            ..RecipePatch::default()
        }
        .apply_to(&mut recipe);

        assert_eq!(recipe.grinder_clicks, Some(22));
        assert_eq!(recipe.grinder_name, None);
    }

    #[test]
    fn test_patch_rejects_null_fields() {
        for field in ["name", "waterAmount", "grinderType", "grinderName", "grinderClicks"] {
            let mut body = serde_json::Map::new();
            body.insert(field.to_string(), serde_json::Value::Null);
            assert!(
                serde_json::from_value::<RecipePatch>(serde_json::Value::Object(body)).is_err(),
                "null {field} should be rejected"
            );
        }

        let patch: RecipePatch =
            serde_json::from_value(serde_json::json!({ "grinderName": "Comandante C40" })).unwrap();
        assert_eq!(patch.grinder_name.as_deref(), Some("Comandante C40"));
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_grinder_type_parse() {
        for kind in GrinderType::ALL {
            assert_eq!(kind.as_str().parse::<GrinderType>(), Ok(kind));
        }
        assert!("burr".parse::<GrinderType>().is_err());
    }
}
