use anyhow::{bail, Result};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::model::{
    Bean, BeanPatch, Id, NewBean, NewNote, NewRecipe, Note, NotePatch, Recipe, RecipePatch,
};
use crate::store::traits::{BeanStore, NoteStore, RecipeStore, Store};

/// A table with a `SERIAL`-style id sequence. Ids are never reused.
#[derive(Debug)]
struct Table<T> {
    rows: BTreeMap<Id, T>,
    next_id: Id,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T: Clone> Table<T> {
    fn insert_with(&mut self, build: impl FnOnce(Id) -> T) -> T {
        let id = self.next_id;
        self.next_id += 1;
        let row = build(id);
        self.rows.insert(id, row.clone());
        row
    }

    fn list(&self) -> Vec<T> {
        self.rows.values().cloned().collect()
    }
}

#[derive(Debug, Default)]
struct Tables {
    beans: Table<Bean>,
    recipes: Table<Recipe>,
    notes: Table<Note>,
}

impl Tables {
    fn check_note_references(&self, recipe: Id, bean: Id) -> Result<()> {
        if !self.recipes.rows.contains_key(&recipe) {
            bail!(
                "insert or update on table \"notes\" violates foreign key constraint: recipe {} does not exist",
                recipe
            );
        }
        if !self.beans.rows.contains_key(&bean) {
            bail!(
                "insert or update on table \"notes\" violates foreign key constraint: bean {} does not exist",
                bean
            );
        }
        Ok(())
    }
}

/// In-process store with the same constraint semantics as the PostgreSQL
/// schema: notes must reference existing rows, and referenced beans or recipes
/// cannot be deleted. Every operation holds the lock for its whole duration,
/// so each call is atomic like a single SQL statement.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl BeanStore for MemoryStore {
    async fn list_beans(&self) -> Result<Vec<Bean>> {
        Ok(self.tables.read().await.beans.list())
    }

    async fn create_bean(&self, bean: NewBean) -> Result<Option<Bean>> {
        if bean.name.is_empty() {
            bail!("new row for relation \"beans\" violates check constraint on name");
        }
        let mut tables = self.tables.write().await;
        Ok(Some(tables.beans.insert_with(|id| bean.into_bean(id))))
    }

    async fn update_bean(&self, id: Id, patch: BeanPatch) -> Result<Option<Bean>> {
        if patch.name.as_deref() == Some("") {
            bail!("new row for relation \"beans\" violates check constraint on name");
        }
        let mut tables = self.tables.write().await;
        let Some(bean) = tables.beans.rows.get_mut(&id) else {
            return Ok(None);
        };
        patch.apply_to(bean);
        Ok(Some(bean.clone()))
    }

    async fn delete_bean(&self, id: Id) -> Result<Option<Bean>> {
        let mut tables = self.tables.write().await;
        if tables.notes.rows.values().any(|note| note.bean == id) {
            bail!(
                "update or delete on table \"beans\" violates foreign key constraint: bean {} is still referenced from table \"notes\"",
                id
            );
        }
        Ok(tables.beans.rows.remove(&id))
    }
}

#[async_trait::async_trait]
impl RecipeStore for MemoryStore {
    async fn list_recipes(&self) -> Result<Vec<Recipe>> {
        Ok(self.tables.read().await.recipes.list())
    }

    async fn create_recipe(&self, recipe: NewRecipe) -> Result<Option<Recipe>> {
        let mut tables = self.tables.write().await;
        Ok(Some(tables.recipes.insert_with(|id| recipe.into_recipe(id))))
    }

    async fn update_recipe(&self, id: Id, patch: RecipePatch) -> Result<Option<Recipe>> {
        let mut tables = self.tables.write().await;
        let Some(recipe) = tables.recipes.rows.get_mut(&id) else {
            return Ok(None);
        };
        patch.apply_to(recipe);
        Ok(Some(recipe.clone()))
    }

    async fn delete_recipe(&self, id: Id) -> Result<Option<Recipe>> {
        let mut tables = self.tables.write().await;
        if tables.notes.rows.values().any(|note| note.recipe == id) {
            bail!(
                "update or delete on table \"recipes\" violates foreign key constraint: recipe {} is still referenced from table \"notes\"",
                id
            );
        }
        Ok(tables.recipes.rows.remove(&id))
    }
}

#[async_trait::async_trait]
impl NoteStore for MemoryStore {
    async fn list_notes(&self) -> Result<Vec<Note>> {
        Ok(self.tables.read().await.notes.list())
    }

    async fn create_note(&self, note: NewNote) -> Result<Option<Note>> {
        let mut tables = self.tables.write().await;
        tables.check_note_references(note.recipe, note.bean)?;
        Ok(Some(tables.notes.insert_with(|id| note.into_note(id))))
    }

    async fn update_note(&self, id: Id, patch: NotePatch) -> Result<Option<Note>> {
        let mut tables = self.tables.write().await;
        let Some(current) = tables.notes.rows.get(&id) else {
            return Ok(None);
        };

        let mut updated = current.clone();
        patch.apply_to(&mut updated);
        tables.check_note_references(updated.recipe, updated.bean)?;

        tables.notes.rows.insert(id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete_note(&self, id: Id) -> Result<Option<Note>> {
        Ok(self.tables.write().await.notes.rows.remove(&id))
    }
}

impl Store for MemoryStore {}
