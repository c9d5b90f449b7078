// src/utils/mod.rs
pub mod error;
pub mod logging;
pub mod ordered_set;
pub mod text;

pub use error::AppError; // Re-export main error type for convenience
pub use ordered_set::OrderedSet;
