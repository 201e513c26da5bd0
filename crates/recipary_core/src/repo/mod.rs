//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the opaque recipe store contract (list/get/insert/update/delete).
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes must enforce `Recipe::validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod recipe_repo;
