use anyhow::{Context, Result};
use sqlx::{
    postgres::{PgPoolOptions, PgRow},
    PgPool, Postgres, QueryBuilder, Row,
};

use crate::model::{
    Bean, BeanPatch, Id, NewBean, NewNote, NewRecipe, Note, NotePatch, Recipe, RecipePatch,
    BEAN_COLUMNS, NOTE_COLUMNS, RECIPE_COLUMNS,
};
use crate::store::traits::{BeanStore, NoteStore, RecipeStore, Store};

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store with the given database URL
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("Failed to create PostgreSQL connection pool")?;

        Ok(Self { pool })
    }

    /// Run the embedded migrations in `migrations/`
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }
}

/// Close an `UPDATE ... SET` statement with the id filter and returned columns
fn finish_update(builder: &mut QueryBuilder<'_, Postgres>, id: Id, returning: &[&str]) {
    builder.push(" WHERE id = ");
    builder.push_bind(id);
    builder.push(" RETURNING ");
    builder.push(returning.join(", "));
}

fn bean_from_row(row: &PgRow) -> Result<Bean> {
    let roast_level: String = row.try_get("roast_level")?;
    Ok(Bean {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        origin: row.try_get("origin")?,
        variety: row.try_get("variety")?,
        roast_level: roast_level.parse()?,
    })
}

fn recipe_from_row(row: &PgRow) -> Result<Recipe> {
    let grinder_type: String = row.try_get("grinder_type")?;
    Ok(Recipe {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        instructions: row.try_get("instructions")?,
        water_amount: row.try_get("water_amount")?,
        bean_amount: row.try_get("bean_amount")?,
        brew_time: row.try_get("brew_time")?,
        temperature: row.try_get("temperature")?,
        grinder_type: grinder_type.parse()?,
        grinder_name: row.try_get("grinder_name")?,
        grinder_clicks: row.try_get("grinder_clicks")?,
    })
}

fn note_from_row(row: &PgRow) -> Result<Note> {
    Ok(Note {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        recipe: row.try_get("recipe")?,
        bean: row.try_get("bean")?,
        content: row.try_get("content")?,
    })
}

/// `UPDATE beans` touching only the columns present in `patch`
fn update_bean_query(id: Id, patch: BeanPatch) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::<Postgres>::new("UPDATE beans SET ");
    if patch.is_empty() {
        builder.push("id = id");
    } else {
        let BeanPatch {
            name,
            origin,
            variety,
            roast_level,
        } = patch;
        let mut assignments = builder.separated(", ");
        if let Some(name) = name {
            assignments.push("name = ");
            assignments.push_bind_unseparated(name);
        }
        if let Some(origin) = origin {
            assignments.push("origin = ");
            assignments.push_bind_unseparated(origin);
        }
        if let Some(variety) = variety {
            assignments.push("variety = ");
            assignments.push_bind_unseparated(variety);
        }
        if let Some(roast_level) = roast_level {
            assignments.push("roast_level = ");
            assignments.push_bind_unseparated(roast_level.as_str());
        }
    }
    finish_update(&mut builder, id, BEAN_COLUMNS);
    builder
}

/// `UPDATE recipes` touching only the columns present in `patch`
fn update_recipe_query(id: Id, patch: RecipePatch) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::<Postgres>::new("UPDATE recipes SET ");
    if patch.is_empty() {
        builder.push("id = id");
    } else {
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
        } = patch;
        let mut assignments = builder.separated(", ");
        if let Some(name) = name {
            assignments.push("name = ");
            assignments.push_bind_unseparated(name);
        }
        if let Some(description) = description {
            assignments.push("description = ");
            assignments.push_bind_unseparated(description);
        }
        if let Some(instructions) = instructions {
            assignments.push("instructions = ");
            assignments.push_bind_unseparated(instructions);
        }
        if let Some(water_amount) = water_amount {
            assignments.push("water_amount = ");
            assignments.push_bind_unseparated(water_amount);
        }
        if let Some(bean_amount) = bean_amount {
            assignments.push("bean_amount = ");
            assignments.push_bind_unseparated(bean_amount);
        }
        if let Some(brew_time) = brew_time {
            assignments.push("brew_time = ");
            assignments.push_bind_unseparated(brew_time);
        }
        if let Some(temperature) = temperature {
            assignments.push("temperature = ");
            assignments.push_bind_unseparated(temperature);
        }
        if let Some(grinder_type) = grinder_type {
            assignments.push("grinder_type = ");
            assignments.push_bind_unseparated(grinder_type.as_str());
        }
        if let Some(grinder_name) = grinder_name {
            assignments.push("grinder_name = ");
            assignments.push_bind_unseparated(grinder_name);
        }
        if let Some(grinder_clicks) = grinder_clicks {
            assignments.push("grinder_clicks = ");
            assignments.push_bind_unseparated(grinder_clicks);
        }
    }
    finish_update(&mut builder, id, RECIPE_COLUMNS);
    builder
}

/// `UPDATE notes` touching only the columns present in `patch`
fn update_note_query(id: Id, patch: NotePatch) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::<Postgres>::new("UPDATE notes SET ");
    if patch.is_empty() {
        builder.push("id = id");
    } else {
        let NotePatch {
            name,
            recipe,
            bean,
            content,
        } = patch;
        let mut assignments = builder.separated(", ");
        if let Some(name) = name {
            assignments.push("name = ");
            assignments.push_bind_unseparated(name);
        }
        if let Some(recipe) = recipe {
            assignments.push("recipe = ");
            assignments.push_bind_unseparated(recipe);
        }
        if let Some(bean) = bean {
            assignments.push("bean = ");
            assignments.push_bind_unseparated(bean);
        }
        if let Some(content) = content {
            assignments.push("content = ");
            assignments.push_bind_unseparated(content);
        }
    }
    finish_update(&mut builder, id, NOTE_COLUMNS);
    builder
}

#[async_trait::async_trait]
impl BeanStore for PostgresStore {
    async fn list_beans(&self) -> Result<Vec<Bean>> {
        let sql = format!("SELECT {} FROM beans ORDER BY id", BEAN_COLUMNS.join(", "));
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list beans")?;

        rows.iter().map(bean_from_row).collect()
    }

    async fn create_bean(&self, bean: NewBean) -> Result<Option<Bean>> {
        let sql = format!(
            "INSERT INTO beans (name, origin, variety, roast_level) VALUES ($1, $2, $3, $4) RETURNING {}",
            BEAN_COLUMNS.join(", ")
        );
        let row = sqlx::query(&sql)
            .bind(bean.name)
            .bind(bean.origin)
            .bind(bean.variety)
            .bind(bean.roast_level.as_str())
            .fetch_optional(&self.pool)
            .await
            .context("Failed to insert bean")?;

        row.as_ref().map(bean_from_row).transpose()
    }

    async fn update_bean(&self, id: Id, patch: BeanPatch) -> Result<Option<Bean>> {
        let mut builder = update_bean_query(id, patch);

        let row = builder
            .build()
            .fetch_optional(&self.pool)
            .await
            .context("Failed to update bean")?;

        row.as_ref().map(bean_from_row).transpose()
    }

    async fn delete_bean(&self, id: Id) -> Result<Option<Bean>> {
        let sql = format!(
            "DELETE FROM beans WHERE id = $1 RETURNING {}",
            BEAN_COLUMNS.join(", ")
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to delete bean")?;

        row.as_ref().map(bean_from_row).transpose()
    }
}

#[async_trait::async_trait]
impl RecipeStore for PostgresStore {
    async fn list_recipes(&self) -> Result<Vec<Recipe>> {
        let sql = format!("SELECT {} FROM recipes ORDER BY id", RECIPE_COLUMNS.join(", "));
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list recipes")?;

        rows.iter().map(recipe_from_row).collect()
    }

    async fn create_recipe(&self, recipe: NewRecipe) -> Result<Option<Recipe>> {
        let sql = format!(
            r#"
            INSERT INTO recipes (name, description, instructions, water_amount, bean_amount,
                                 brew_time, temperature, grinder_type, grinder_name, grinder_clicks)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            RECIPE_COLUMNS.join(", ")
        );
        let row = sqlx::query(&sql)
            .bind(recipe.name)
            .bind(recipe.description)
            .bind(recipe.instructions)
            .bind(recipe.water_amount)
            .bind(recipe.bean_amount)
            .bind(recipe.brew_time)
            .bind(recipe.temperature)
            .bind(recipe.grinder_type.as_str())
            .bind(recipe.grinder_name)
            .bind(recipe.grinder_clicks)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to insert recipe")?;

        row.as_ref().map(recipe_from_row).transpose()
    }

    async fn update_recipe(&self, id: Id, patch: RecipePatch) -> Result<Option<Recipe>> {
        let mut builder = update_recipe_query(id, patch);

        let row = builder
            .build()
            .fetch_optional(&self.pool)
            .await
            .context("Failed to update recipe")?;

        row.as_ref().map(recipe_from_row).transpose()
    }

    async fn delete_recipe(&self, id: Id) -> Result<Option<Recipe>> {
        let sql = format!(
            "DELETE FROM recipes WHERE id = $1 RETURNING {}",
            RECIPE_COLUMNS.join(", ")
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to delete recipe")?;

        row.as_ref().map(recipe_from_row).transpose()
    }
}

#[async_trait::async_trait]
impl NoteStore for PostgresStore {
    async fn list_notes(&self) -> Result<Vec<Note>> {
        let sql = format!("SELECT {} FROM notes ORDER BY id", NOTE_COLUMNS.join(", "));
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list notes")?;

        rows.iter().map(note_from_row).collect()
    }

    async fn create_note(&self, note: NewNote) -> Result<Option<Note>> {
        let sql = format!(
            "INSERT INTO notes (name, recipe, bean, content) VALUES ($1, $2, $3, $4) RETURNING {}",
            NOTE_COLUMNS.join(", ")
        );
        let row = sqlx::query(&sql)
            .bind(note.name)
            .bind(note.recipe)
            .bind(note.bean)
            .bind(note.content)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to insert note")?;

        row.as_ref().map(note_from_row).transpose()
    }

    async fn update_note(&self, id: Id, patch: NotePatch) -> Result<Option<Note>> {
        let mut builder = update_note_query(id, patch);

        let row = builder
            .build()
            .fetch_optional(&self.pool)
            .await
            .context("Failed to update note")?;

        row.as_ref().map(note_from_row).transpose()
    }

    async fn delete_note(&self, id: Id) -> Result<Option<Note>> {
        let sql = format!(
            "DELETE FROM notes WHERE id = $1 RETURNING {}",
            NOTE_COLUMNS.join(", ")
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to delete note")?;

        row.as_ref().map(note_from_row).transpose()
    }
}

impl Store for PostgresStore {}
