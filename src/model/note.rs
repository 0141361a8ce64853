use serde::{Deserialize, Serialize};

use crate::model::{present, Id, Validate, ValidationError};

/// Column order used for `SELECT` and `RETURNING` on `notes`
pub const NOTE_COLUMNS: &[&str] = &["id", "name", "recipe", "bean", "content"];

/// A tasting note. `recipe` and `bean` are foreign keys; the store rejects
/// rows that point at a missing recipe or bean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: Id,
    pub name: String,
    pub recipe: Id,
    pub bean: Id,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewNote {
    pub name: String,
    pub recipe: Id,
    pub bean: Id,
    pub content: String,
}

impl NewNote {
    pub fn into_note(self, id: Id) -> Note {
        let NewNote {
            name,
            recipe,
            bean,
            content,
        } = self;

        Note {
            id,
            name,
            recipe,
            bean,
            content,
        }
    }
}

impl Validate for NewNote {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotePatch {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub recipe: Option<Id>,
    #[serde(default, deserialize_with = "present")]
    pub bean: Option<Id>,
    #[serde(default, deserialize_with = "present")]
    pub content: Option<String>,
}

impl NotePatch {
    pub fn is_empty(&self) -> bool {
        *self == NotePatch::default()
    }

    pub fn apply_to(self, note: &mut Note) {
        let NotePatch {
            name,
            recipe,
            bean,
            content,
        } = self;
        let Note {
            id: _,
            name: current_name,
            recipe: current_recipe,
            bean: current_bean,
            content: current_content,
        } = note;

        if let Some(value) = name {
            *current_name = value;
        }
        if let Some(value) = recipe {
            *current_recipe = value;
        }
        if let Some(value) = bean {
            *current_bean = value;
        }
        if let Some(value) = content {
            *current_content = value;
        }
    }
}

impl Validate for NotePatch {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_note_requires_references() {
        let json = serde_json::json!({
            "name": "Afternoon",
            "bean": 1,
            "content": "Notes of cherry"
        });
        assert!(serde_json::from_value::<NewNote>(json).is_err());
    }

    #[test]
    fn test_new_note_rejects_string_references() {
        let json = serde_json::json!({
            "name": "Afternoon",
            "recipe": "1",
            "bean": 1,
            "content": "Notes of cherry"
        });
        assert!(serde_json::from_value::<NewNote>(json).is_err());
    }

    #[test]
    fn test_patch_rejects_null_references() {
        assert!(serde_json::from_value::<NotePatch>(serde_json::json!({ "bean": null })).is_err());
        assert!(
            serde_json::from_value::<NotePatch>(serde_json::json!({ "content": null })).is_err()
        );
        let patch: NotePatch = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    fn test_patch_can_move_note_to_another_bean() {
        let mut note = NewNote {
            name: "Afternoon".to_string(),
            recipe: 1,
            bean: 1,
            content: "Notes of cherry".to_string(),
        }
        .into_note(9);

        NotePatch {
            bean: Some(2),
            ..NotePatch::default()
        }
        .apply_to(&mut note);

        assert_eq!(note.bean, 2);
        assert_eq!(note.recipe, 1);
        assert_eq!(note.id, 9);
    }
}
