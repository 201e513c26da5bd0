//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate row sanitation, validation and repository calls into
//!   use-case level APIs.
//! - Keep callers decoupled from storage details.

pub mod recipe_service;
