//! Workout files
//!
//! Loads and validates YAML workout definitions and turns them into a
//! runnable [`WorkoutPlan`].

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{
    ConfigLimits, ConfigLoader, LoadResult, LoadWarning, LoaderOptions, WorkoutPlan,
    load_or_classic,
};
pub use schema::*;
pub use validation::{ValidationResult, Validator};
