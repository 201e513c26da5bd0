//! Recipe repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over the `recipes` table.
//! - Keep SQL details inside the persistence boundary.
//! - Bridge legacy rows (no `ingredients_json`/`base_servings`) into the
//!   structured shape on read.
//!
//! # Invariants
//! - Write paths call `Recipe::validate()` before SQL mutations.
//! - Structured columns are stored as compact JSON text.
//! - Read paths reject invalid persisted state instead of masking it;
//!   partial ingredient rows are the one exception, repaired by
//!   `rows::normalize`.

use crate::db::DbError;
use crate::model::ingredient::RawIngredientRow;
use crate::model::recipe::{Recipe, RecipeId, RecipeValidationError};
use crate::rows;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const RECIPE_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    description,
    ingredients,
    instructions,
    tags,
    prep_time_minutes,
    cook_time_minutes,
    servings,
    ingredients_json,
    base_servings,
    created_at
FROM recipes";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for recipe persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(RecipeValidationError),
    Db(DbError),
    NotFound(RecipeId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "recipe not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted recipe data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<RecipeValidationError> for RepoError {
    fn from(value: RecipeValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Query options for listing recipes.
///
/// `search` matches title and description case-insensitively; `tag` is an
/// exact member match against the recipe's tag set.
#[derive(Debug, Clone, Default)]
pub struct RecipeListQuery {
    pub search: Option<String>,
    pub tag: Option<String>,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for recipe CRUD operations.
pub trait RecipeRepository {
    fn create_recipe(&self, recipe: &Recipe) -> RepoResult<RecipeId>;
    fn update_recipe(&self, recipe: &Recipe) -> RepoResult<()>;
    fn get_recipe(&self, id: RecipeId) -> RepoResult<Option<Recipe>>;
    fn list_recipes(&self, query: &RecipeListQuery) -> RepoResult<Vec<Recipe>>;
    fn delete_recipe(&self, id: RecipeId) -> RepoResult<()>;
    /// Returns the union of all tags across recipes, sorted by name.
    fn list_tags(&self) -> RepoResult<Vec<String>>;
}

/// SQLite-backed recipe repository.
pub struct SqliteRecipeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRecipeRepository<'conn> {
    /// Constructs a repository from a migrated connection (see `db::open_db`).
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl RecipeRepository for SqliteRecipeRepository<'_> {
    fn create_recipe(&self, recipe: &Recipe) -> RepoResult<RecipeId> {
        recipe.validate()?;

        self.conn.execute(
            "INSERT INTO recipes (
                uuid,
                title,
                description,
                ingredients,
                instructions,
                tags,
                prep_time_minutes,
                cook_time_minutes,
                servings,
                ingredients_json,
                base_servings,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12);",
            params![
                recipe.uuid.to_string(),
                recipe.title.as_str(),
                recipe.description.as_deref(),
                recipe.ingredients_text.as_str(),
                recipe.instructions.as_str(),
                encode_json(&recipe.tags, "recipes.tags")?,
                recipe.prep_time_minutes,
                recipe.cook_time_minutes,
                recipe.legacy_servings,
                encode_json(&recipe.ingredients, "recipes.ingredients_json")?,
                recipe.base_servings,
                recipe.created_at,
            ],
        )?;

        Ok(recipe.uuid)
    }

    fn update_recipe(&self, recipe: &Recipe) -> RepoResult<()> {
        recipe.validate()?;

        let changed = self.conn.execute(
            "UPDATE recipes
             SET
                title = ?1,
                description = ?2,
                ingredients = ?3,
                instructions = ?4,
                tags = ?5,
                prep_time_minutes = ?6,
                cook_time_minutes = ?7,
                servings = ?8,
                ingredients_json = ?9,
                base_servings = ?10,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?11;",
            params![
                recipe.title.as_str(),
                recipe.description.as_deref(),
                recipe.ingredients_text.as_str(),
                recipe.instructions.as_str(),
                encode_json(&recipe.tags, "recipes.tags")?,
                recipe.prep_time_minutes,
                recipe.cook_time_minutes,
                recipe.legacy_servings,
                encode_json(&recipe.ingredients, "recipes.ingredients_json")?,
                recipe.base_servings,
                recipe.uuid.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(recipe.uuid));
        }

        Ok(())
    }

    fn get_recipe(&self, id: RecipeId) -> RepoResult<Option<Recipe>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{RECIPE_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut result_rows = stmt.query(params![id.to_string()])?;
        if let Some(row) = result_rows.next()? {
            return Ok(Some(parse_recipe_row(row)?));
        }

        Ok(None)
    }

    fn list_recipes(&self, query: &RecipeListQuery) -> RepoResult<Vec<Recipe>> {
        let mut sql = format!("{RECIPE_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(search) = query.search.as_deref() {
            let needle = search.trim().to_lowercase();
            if !needle.is_empty() {
                sql.push_str(
                    " AND (instr(lower(title), ?) > 0
                       OR instr(lower(coalesce(description, '')), ?) > 0)",
                );
                bind_values.push(Value::Text(needle.clone()));
                bind_values.push(Value::Text(needle));
            }
        }

        if let Some(tag) = query.tag.as_deref() {
            // Tags are stored as a compact JSON array, so an exact member
            // match is a substring match on the quoted token.
            sql.push_str(" AND instr(tags, ?) > 0");
            bind_values.push(Value::Text(format!("\"{tag}\"")));
        }

        sql.push_str(" ORDER BY created_at DESC, uuid ASC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut result_rows = stmt.query(params_from_iter(bind_values))?;
        let mut recipes = Vec::new();

        while let Some(row) = result_rows.next()? {
            recipes.push(parse_recipe_row(row)?);
        }

        Ok(recipes)
    }

    fn delete_recipe(&self, id: RecipeId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM recipes WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn list_tags(&self) -> RepoResult<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT tags FROM recipes;")?;
        let mut result_rows = stmt.query([])?;
        let mut tags = BTreeSet::new();

        while let Some(row) = result_rows.next()? {
            let encoded: String = row.get(0)?;
            for tag in decode_tags(&encoded)? {
                tags.insert(tag);
            }
        }

        Ok(tags.into_iter().collect())
    }
}

fn parse_recipe_row(row: &Row<'_>) -> RepoResult<Recipe> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in recipes.uuid"))
    })?;

    let tags = decode_tags(&row.get::<_, String>("tags")?)?;

    let legacy_servings = parse_count(row.get("servings")?, "recipes.servings")?;
    let base_servings = match row.get::<_, Option<i64>>("base_servings")? {
        // Structured column wins; legacy `servings` is the fallback for rows
        // written before the structured-ingredient migration.
        Some(value) => parse_count(value, "recipes.base_servings")?.max(1),
        None => legacy_servings.max(1),
    };

    let ingredients = match row.get::<_, Option<String>>("ingredients_json")? {
        Some(encoded) => {
            let raw: Vec<RawIngredientRow> = serde_json::from_str(&encoded).map_err(|err| {
                RepoError::InvalidData(format!("unreadable recipes.ingredients_json: {err}"))
            })?;
            rows::normalize(&raw)
        }
        None => Vec::new(),
    };

    Ok(Recipe {
        uuid,
        title: row.get("title")?,
        description: row.get("description")?,
        ingredients,
        base_servings,
        instructions: row.get("instructions")?,
        tags,
        prep_time_minutes: parse_count(
            row.get("prep_time_minutes")?,
            "recipes.prep_time_minutes",
        )?,
        cook_time_minutes: parse_count(
            row.get("cook_time_minutes")?,
            "recipes.cook_time_minutes",
        )?,
        legacy_servings,
        ingredients_text: row.get("ingredients")?,
        created_at: row.get("created_at")?,
    })
}

fn parse_count(value: i64, column: &str) -> RepoResult<u32> {
    u32::try_from(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid count `{value}` in {column}")))
}

fn decode_tags(encoded: &str) -> RepoResult<Vec<String>> {
    serde_json::from_str(encoded)
        .map_err(|err| RepoError::InvalidData(format!("unreadable recipes.tags: {err}")))
}

fn encode_json<T: serde::Serialize>(value: &T, column: &str) -> RepoResult<String> {
    serde_json::to_string(value)
        .map_err(|err| RepoError::InvalidData(format!("cannot encode {column}: {err}")))
}
