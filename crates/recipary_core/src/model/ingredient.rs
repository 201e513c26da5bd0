//! Ingredient row domain model.
//!
//! # Responsibility
//! - Define the canonical structured ingredient line item.
//! - Define the closed set of accepted measurement units.
//! - Accept loosely-typed persisted rows (`RawIngredientRow`) for repair.
//!
//! # Invariants
//! - `id` is stable for the lifetime of a row and never derived from content.
//! - `unit` is always one of the eight accepted tokens; free-text units do
//!   not exist in this model.
//! - A row with an empty trimmed `name` is incomplete and must be dropped
//!   before persistence, never while editing.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for one ingredient row.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type IngredientId = Uuid;

/// Closed set of accepted measurement units.
///
/// The variant order is the fixed order any selection surface must present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Oz,
    Cup,
    Tbsp,
    Tsp,
    G,
    Ml,
    Lb,
    /// Discrete pieces; the default for new rows.
    Pcs,
}

impl Unit {
    /// All accepted units in their fixed presentation order.
    pub const ALL: [Unit; 8] = [
        Unit::Oz,
        Unit::Cup,
        Unit::Tbsp,
        Unit::Tsp,
        Unit::G,
        Unit::Ml,
        Unit::Lb,
        Unit::Pcs,
    ];

    /// Returns the lowercase token used in persistence and display.
    pub fn as_str(self) -> &'static str {
        match self {
            Unit::Oz => "oz",
            Unit::Cup => "cup",
            Unit::Tbsp => "tbsp",
            Unit::Tsp => "tsp",
            Unit::G => "g",
            Unit::Ml => "ml",
            Unit::Lb => "lb",
            Unit::Pcs => "pcs",
        }
    }

    /// Parses an exact unit token. Anything outside the closed set is `None`.
    pub fn parse(value: &str) -> Option<Unit> {
        match value {
            "oz" => Some(Unit::Oz),
            "cup" => Some(Unit::Cup),
            "tbsp" => Some(Unit::Tbsp),
            "tsp" => Some(Unit::Tsp),
            "g" => Some(Unit::G),
            "ml" => Some(Unit::Ml),
            "lb" => Some(Unit::Lb),
            "pcs" => Some(Unit::Pcs),
            _ => None,
        }
    }
}

impl Default for Unit {
    fn default() -> Self {
        Unit::Pcs
    }
}

impl Display for Unit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One structured ingredient line item.
///
/// Rows are value objects: every edit produces a new row, and list-level
/// operations produce new lists. The `id` is the only handle used to target
/// a row for update or removal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientRow {
    /// Stable synthetic identity, assigned at creation.
    pub id: IngredientId,
    /// Free-text label, e.g. "flour". May be transiently empty while editing.
    pub name: String,
    /// Non-negative amount of `unit`.
    pub quantity: f64,
    /// One of the eight accepted units.
    pub unit: Unit,
}

impl IngredientRow {
    /// Creates a blank row with a freshly generated unique id.
    ///
    /// # Invariants
    /// - Two calls never produce the same id within a process lifetime.
    /// - Defaults: empty name, quantity 1, unit `pcs`.
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4())
    }

    /// Creates a blank row with a caller-provided stable id.
    ///
    /// Used by repair paths where identity already exists in persisted data.
    pub fn with_id(id: IngredientId) -> Self {
        Self {
            id,
            name: String::new(),
            quantity: 1.0,
            unit: Unit::Pcs,
        }
    }

    /// Renders this row as one legacy plain-text line: `{quantity} {unit} {name}`.
    pub fn flattened(&self) -> String {
        format!("{} {} {}", self.quantity, self.unit, self.name)
    }
}

impl Default for IngredientRow {
    fn default() -> Self {
        Self::new()
    }
}

/// Loosely-typed ingredient row as it may appear in persisted data.
///
/// Rows written before the structured-ingredient format, or by older
/// clients, can miss fields or carry quantities as strings. This shape
/// accepts all of that; `rows::normalize` repairs it into [`IngredientRow`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawIngredientRow {
    /// Stable id, when the writer assigned one.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Quantity as whatever JSON value the writer produced.
    #[serde(default)]
    pub quantity: Option<serde_json::Value>,
    /// Unit token, not yet checked against the closed set.
    #[serde(default)]
    pub unit: Option<String>,
}
