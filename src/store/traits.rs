use crate::model::{Bean, BeanPatch, Id, NewBean, NewNote, NewRecipe, Note, NotePatch, Recipe, RecipePatch};
use anyhow::Result;

// Every method maps to exactly one statement. `Ok(None)` means no row was
// affected; `Err` carries store-level failures such as constraint violations.

#[async_trait::async_trait]
pub trait BeanStore: Send + Sync {
    async fn list_beans(&self) -> Result<Vec<Bean>>;
    async fn create_bean(&self, bean: NewBean) -> Result<Option<Bean>>;
    /// Apply only the fields present in `patch`; an empty patch still matches the row
    async fn update_bean(&self, id: Id, patch: BeanPatch) -> Result<Option<Bean>>;
    /// Returns the row as it was before deletion
    async fn delete_bean(&self, id: Id) -> Result<Option<Bean>>;
}

#[async_trait::async_trait]
pub trait RecipeStore: Send + Sync {
    async fn list_recipes(&self) -> Result<Vec<Recipe>>;
    async fn create_recipe(&self, recipe: NewRecipe) -> Result<Option<Recipe>>;
    async fn update_recipe(&self, id: Id, patch: RecipePatch) -> Result<Option<Recipe>>;
    async fn delete_recipe(&self, id: Id) -> Result<Option<Recipe>>;
}

#[async_trait::async_trait]
pub trait NoteStore: Send + Sync {
    async fn list_notes(&self) -> Result<Vec<Note>>;
    async fn create_note(&self, note: NewNote) -> Result<Option<Note>>;
    async fn update_note(&self, id: Id, patch: NotePatch) -> Result<Option<Note>>;
    async fn delete_note(&self, id: Id) -> Result<Option<Note>>;
}

pub trait Store: BeanStore + RecipeStore + NoteStore + Send + Sync {}
