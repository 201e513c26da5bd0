//! Recipe use-case service.
//!
//! # Responsibility
//! - Provide create/update/get/list/delete/scale entry points for recipes.
//! - Run the save pipeline: sanitize rows, validate the record, render the
//!   legacy mirror fields, then persist.
//!
//! # Invariants
//! - Saves are whole-record replacements; there is no partial update API.
//! - `ingredients_text` and `legacy_servings` are recomputed from the
//!   structured fields on every save, never edited directly.
//! - Scaling returns a derived view; the stored base quantities and
//!   `base_servings` are never overwritten by a scale request.

use crate::model::ingredient::IngredientRow;
use crate::model::recipe::{Recipe, RecipeId, RecipeValidationError};
use crate::repo::recipe_repo::{RecipeListQuery, RecipeRepository, RepoError, RepoResult};
use crate::rows::{self, RowValidationError};
use crate::scale::scale_ingredients;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Caller-supplied content for a recipe create or update.
///
/// Ingredient rows arrive as edited: names may carry whitespace and
/// incomplete rows may be present. The service sanitizes them before save.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeDraft {
    pub title: String,
    pub description: Option<String>,
    pub ingredients: Vec<IngredientRow>,
    pub base_servings: u32,
    pub instructions: String,
    pub tags: Vec<String>,
    pub prep_time_minutes: u32,
    pub cook_time_minutes: u32,
}

/// Service error for recipe use-cases.
#[derive(Debug)]
pub enum RecipeServiceError {
    /// Title/instructions/base-servings constraint failed.
    Validation(RecipeValidationError),
    /// No ingredient row survived sanitation; the save was rejected.
    NoIngredients,
    /// Target recipe does not exist.
    RecipeNotFound(RecipeId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for RecipeServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NoIngredients => write!(f, "{}", RowValidationError::NoIngredients),
            Self::RecipeNotFound(id) => write!(f, "recipe not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RecipeServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for RecipeServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::NotFound(id) => Self::RecipeNotFound(id),
            other => Self::Repo(other),
        }
    }
}

impl From<RowValidationError> for RecipeServiceError {
    fn from(_: RowValidationError) -> Self {
        Self::NoIngredients
    }
}

/// Recipe service facade over repository implementations.
pub struct RecipeService<R: RecipeRepository> {
    repo: R,
}

impl<R: RecipeRepository> RecipeService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a recipe from a draft and returns the persisted record.
    ///
    /// # Errors
    /// - `NoIngredients` when sanitation drops every row.
    /// - `Validation` for title/instructions/base-servings failures.
    pub fn create_recipe(&self, draft: &RecipeDraft) -> Result<Recipe, RecipeServiceError> {
        let mut recipe = Recipe::new("", "");
        apply_draft(&mut recipe, draft)?;

        let id = self.repo.create_recipe(&recipe)?;
        info!("event=recipe_create module=service status=ok id={id}");
        Ok(recipe)
    }

    /// Replaces the content of an existing recipe with a draft.
    ///
    /// The stable id and creation timestamp are preserved.
    pub fn update_recipe(
        &self,
        id: RecipeId,
        draft: &RecipeDraft,
    ) -> Result<Recipe, RecipeServiceError> {
        let mut recipe = self
            .repo
            .get_recipe(id)?
            .ok_or(RecipeServiceError::RecipeNotFound(id))?;
        apply_draft(&mut recipe, draft)?;

        self.repo.update_recipe(&recipe)?;
        info!("event=recipe_update module=service status=ok id={id}");
        Ok(recipe)
    }

    /// Gets one recipe by id with structured ingredients already normalized.
    pub fn get_recipe(&self, id: RecipeId) -> RepoResult<Option<Recipe>> {
        self.repo.get_recipe(id)
    }

    /// Lists recipes with optional search text and tag filter.
    pub fn list_recipes(&self, query: &RecipeListQuery) -> RepoResult<Vec<Recipe>> {
        self.repo.list_recipes(query)
    }

    /// Deletes a recipe permanently.
    pub fn delete_recipe(&self, id: RecipeId) -> Result<(), RecipeServiceError> {
        self.repo.delete_recipe(id)?;
        info!("event=recipe_delete module=service status=ok id={id}");
        Ok(())
    }

    /// Returns the stored ingredients scaled to `target_servings`.
    ///
    /// The result is a derived view for display; nothing is written back.
    pub fn scale_recipe(
        &self,
        id: RecipeId,
        target_servings: u32,
    ) -> Result<Vec<IngredientRow>, RecipeServiceError> {
        let recipe = self
            .repo
            .get_recipe(id)?
            .ok_or(RecipeServiceError::RecipeNotFound(id))?;
        Ok(scale_ingredients(
            &recipe.ingredients,
            recipe.base_servings,
            target_servings,
        ))
    }

    /// Returns all known tags sorted by name.
    pub fn list_tags(&self) -> RepoResult<Vec<String>> {
        self.repo.list_tags()
    }
}

fn apply_draft(recipe: &mut Recipe, draft: &RecipeDraft) -> Result<(), RecipeServiceError> {
    let sanitized = rows::sanitize_for_save(&draft.ingredients)?;

    recipe.title = draft.title.trim().to_string();
    recipe.description = draft
        .description
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string);
    recipe.instructions = draft.instructions.trim().to_string();
    recipe.tags = normalize_tags(&draft.tags);
    recipe.prep_time_minutes = draft.prep_time_minutes;
    recipe.cook_time_minutes = draft.cook_time_minutes;
    recipe.base_servings = draft.base_servings;

    // Legacy mirrors for readers of the pre-structured schema.
    recipe.ingredients_text = rows::flatten(&sanitized);
    recipe.legacy_servings = draft.base_servings;
    recipe.ingredients = sanitized;

    recipe.validate().map_err(RecipeServiceError::Validation)
}

fn normalize_tags(tags: &[String]) -> Vec<String> {
    tags.iter()
        .map(|tag| tag.trim())
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}
