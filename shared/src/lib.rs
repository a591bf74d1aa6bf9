//! Meal Planner Shared Library
//!
//! This crate contains shared types, models, and utilities used across
//! the backend and WASM modules.

pub mod errors;
pub mod models;
pub mod nutrition;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use models::*;
pub use nutrition::*;
pub use types::*;
