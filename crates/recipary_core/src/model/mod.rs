//! Canonical domain model for recipes and their ingredient rows.
//!
//! # Responsibility
//! - Define the data structures shared by row editing, scaling and storage.
//! - Keep serialized field names aligned with the external store schema.
//!
//! # Invariants
//! - Every domain object is identified by a stable UUID.
//! - Ingredient units come from a closed eight-token set.

pub mod ingredient;
pub mod recipe;
