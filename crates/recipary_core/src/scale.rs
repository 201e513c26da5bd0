//! Serving scaler.
//!
//! # Responsibility
//! - Compute a derived ingredient list for a different serving count.
//!
//! # Invariants
//! - Pure and stateless; inputs are never mutated.
//! - Output preserves length, order, id, name and unit of every row; only
//!   `quantity` changes.
//! - Quantities are rounded to the nearest quarter unit, including when the
//!   factor is 1. Repairing malformed quantities (NaN) is the normalize
//!   boundary's job, not this function's.

use crate::model::ingredient::IngredientRow;

/// Scales row quantities from `base_servings` to `target_servings`.
///
/// Both serving counts are clamped to a minimum of 1, so a zero count
/// behaves as 1 rather than producing a division by zero.
///
/// # Contract
/// - `quantity' = round(quantity * target/base * 4) / 4`.
/// - A positive quantity may round down to 0; there is no minimum floor.
/// - The result is a derived view and is never meant to be persisted as the
///   new base quantities.
pub fn scale_ingredients(
    rows: &[IngredientRow],
    base_servings: u32,
    target_servings: u32,
) -> Vec<IngredientRow> {
    let base = base_servings.max(1);
    let target = target_servings.max(1);
    let factor = f64::from(target) / f64::from(base);

    rows.iter()
        .map(|row| IngredientRow {
            id: row.id,
            name: row.name.clone(),
            quantity: round_to_quarter(row.quantity * factor),
            unit: row.unit,
        })
        .collect()
}

// 0.25 is the smallest step that still reads as a usable kitchen measure.
fn round_to_quarter(value: f64) -> f64 {
    (value * 4.0).round() / 4.0
}
