//! Ingredient list editing model.
//!
//! # Responsibility
//! - Provide pure, copy-on-write operations over an ordered row sequence.
//! - Repair loosely-typed persisted rows after load (`normalize`).
//! - Trim and validate rows immediately before persistence
//!   (`sanitize_for_save`).
//!
//! # Invariants
//! - No operation mutates its input sequence; every result is a fresh list.
//! - Sequence order is meaningful and preserved by every operation.
//! - Targeting an id that is not present is a no-op, never an error; row
//!   removal can race with a pending update in an editing surface.

use crate::model::ingredient::{IngredientId, IngredientRow, RawIngredientRow, Unit};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Partial row edit applied by [`update_row`].
///
/// `None` fields keep the current value; `Some` fields override it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowPatch {
    pub name: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<Unit>,
}

/// Validation failure raised by [`sanitize_for_save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowValidationError {
    /// Every row was dropped as incomplete; a save must be rejected.
    NoIngredients,
}

impl Display for RowValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoIngredients => write!(f, "recipe needs at least one named ingredient"),
        }
    }
}

impl Error for RowValidationError {}

/// Returns a new sequence with `patch` merged into the row matching `id`.
///
/// Order is preserved. When no row matches, the result equals the input.
pub fn update_row(rows: &[IngredientRow], id: IngredientId, patch: &RowPatch) -> Vec<IngredientRow> {
    rows.iter()
        .map(|row| {
            if row.id != id {
                return row.clone();
            }
            IngredientRow {
                id: row.id,
                name: patch.name.clone().unwrap_or_else(|| row.name.clone()),
                quantity: patch.quantity.unwrap_or(row.quantity),
                unit: patch.unit.unwrap_or(row.unit),
            }
        })
        .collect()
}

/// Returns a new sequence without the row matching `id`.
///
/// Order of the remaining rows is preserved. When no row matches, the
/// result equals the input.
pub fn remove_row(rows: &[IngredientRow], id: IngredientId) -> Vec<IngredientRow> {
    rows.iter().filter(|row| row.id != id).cloned().collect()
}

/// Repairs loosely-typed persisted rows into the canonical shape.
///
/// # Contract
/// - Absent or unparseable `id` -> fresh generated id; present ids are kept.
/// - Absent `name` -> empty string.
/// - Absent or non-numeric `quantity` -> 1.
/// - Absent or unknown `unit` -> `pcs`.
///
/// Applying `normalize` to its own output changes nothing except that ids
/// are only generated where they were still absent.
pub fn normalize(raw_rows: &[RawIngredientRow]) -> Vec<IngredientRow> {
    raw_rows
        .iter()
        .map(|raw| {
            let id = raw
                .id
                .as_deref()
                .and_then(|text| Uuid::parse_str(text).ok())
                .unwrap_or_else(Uuid::new_v4);
            IngredientRow {
                id,
                name: raw.name.clone().unwrap_or_default(),
                quantity: coerce_quantity(raw.quantity.as_ref()),
                unit: raw
                    .unit
                    .as_deref()
                    .and_then(Unit::parse)
                    .unwrap_or_default(),
            }
        })
        .collect()
}

/// Trims names, drops incomplete rows, and rejects an all-empty result.
///
/// Quantities are left as typed; only explicit scaling snaps values to the
/// quarter-unit grid.
///
/// # Errors
/// - `NoIngredients` when no row survives; the caller must not save.
pub fn sanitize_for_save(rows: &[IngredientRow]) -> Result<Vec<IngredientRow>, RowValidationError> {
    let cleaned: Vec<IngredientRow> = rows
        .iter()
        .map(|row| IngredientRow {
            id: row.id,
            name: row.name.trim().to_string(),
            quantity: row.quantity,
            unit: row.unit,
        })
        .filter(|row| !row.name.is_empty())
        .collect();

    if cleaned.is_empty() {
        return Err(RowValidationError::NoIngredients);
    }
    Ok(cleaned)
}

/// Renders rows as the legacy plain-text ingredients block.
///
/// One `{quantity} {unit} {name}` line per row, newline-joined, in order.
pub fn flatten(rows: &[IngredientRow]) -> String {
    rows.iter()
        .map(IngredientRow::flattened)
        .collect::<Vec<_>>()
        .join("\n")
}

fn coerce_quantity(value: Option<&serde_json::Value>) -> f64 {
    match value {
        Some(serde_json::Value::Number(number)) => number.as_f64().unwrap_or(1.0),
        Some(serde_json::Value::String(text)) => text.trim().parse::<f64>().unwrap_or(1.0),
        _ => 1.0,
    }
}
