//! Recipe domain model.
//!
//! # Responsibility
//! - Define the canonical recipe record persisted by the store.
//! - Validate save-time constraints on title and instructions.
//!
//! # Invariants
//! - `uuid` is stable and never reused for another recipe.
//! - `base_servings` is always >= 1; stored quantities are written for it.
//! - `ingredients_text` and `legacy_servings` mirror the structured fields
//!   for readers of the pre-structured schema.

use crate::model::ingredient::IngredientRow;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable identifier for a recipe.
pub type RecipeId = Uuid;

/// Minimum number of characters a trimmed title must have.
pub const MIN_TITLE_CHARS: usize = 3;

/// Validation failure raised before any recipe write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeValidationError {
    /// Trimmed title is shorter than [`MIN_TITLE_CHARS`].
    TitleTooShort { actual_chars: usize },
    /// Trimmed instructions are empty.
    EmptyInstructions,
    /// `base_servings` below the minimum of 1.
    InvalidBaseServings,
}

impl Display for RecipeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TitleTooShort { actual_chars } => write!(
                f,
                "title must be at least {MIN_TITLE_CHARS} characters, got {actual_chars}"
            ),
            Self::EmptyInstructions => write!(f, "instructions must not be empty"),
            Self::InvalidBaseServings => write!(f, "base servings must be at least 1"),
        }
    }
}

impl Error for RecipeValidationError {}

/// Canonical recipe record.
///
/// Serialized field names match the external store schema, which still
/// carries the legacy flat-text `ingredients` and `servings` columns next
/// to the structured `ingredients_json` and `base_servings` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// Stable global id.
    pub uuid: RecipeId,
    pub title: String,
    pub description: Option<String>,
    /// Structured ingredient rows; the authoritative ingredient data.
    #[serde(rename = "ingredients_json")]
    pub ingredients: Vec<IngredientRow>,
    /// Serving count the stored quantities are written for. Always >= 1.
    pub base_servings: u32,
    pub instructions: String,
    pub tags: Vec<String>,
    pub prep_time_minutes: u32,
    pub cook_time_minutes: u32,
    /// Legacy mirror of `base_servings`, kept in sync on every save.
    #[serde(rename = "servings")]
    pub legacy_servings: u32,
    /// Legacy mirror: one `{quantity} {unit} {name}` line per ingredient.
    #[serde(rename = "ingredients")]
    pub ingredients_text: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

impl Recipe {
    /// Creates an empty recipe shell with a generated stable id.
    ///
    /// The caller is expected to fill the content fields before save;
    /// `validate` enforces the save-time constraints.
    pub fn new(title: impl Into<String>, instructions: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            title: title.into(),
            description: None,
            ingredients: Vec::new(),
            base_servings: 1,
            instructions: instructions.into(),
            tags: Vec::new(),
            prep_time_minutes: 0,
            cook_time_minutes: 0,
            legacy_servings: 1,
            ingredients_text: String::new(),
            created_at: now_epoch_ms(),
        }
    }

    /// Checks save-time constraints on this record.
    ///
    /// # Errors
    /// - `TitleTooShort` when the trimmed title has fewer than 3 characters.
    /// - `EmptyInstructions` when the trimmed instructions are empty.
    /// - `InvalidBaseServings` when `base_servings` is 0.
    pub fn validate(&self) -> Result<(), RecipeValidationError> {
        let title_chars = self.title.trim().chars().count();
        if title_chars < MIN_TITLE_CHARS {
            return Err(RecipeValidationError::TitleTooShort {
                actual_chars: title_chars,
            });
        }
        if self.instructions.trim().is_empty() {
            return Err(RecipeValidationError::EmptyInstructions);
        }
        if self.base_servings < 1 {
            return Err(RecipeValidationError::InvalidBaseServings);
        }
        Ok(())
    }
}

/// Current wall-clock time in Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}
