//! Core domain logic for the recipary recipe manager.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod rows;
pub mod scale;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::ingredient::{IngredientId, IngredientRow, RawIngredientRow, Unit};
pub use model::recipe::{Recipe, RecipeId, RecipeValidationError};
pub use repo::recipe_repo::{
    RecipeListQuery, RecipeRepository, RepoError, RepoResult, SqliteRecipeRepository,
};
pub use rows::{normalize, remove_row, sanitize_for_save, update_row, RowPatch, RowValidationError};
pub use scale::scale_ingredients;
pub use service::recipe_service::{RecipeDraft, RecipeService, RecipeServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
