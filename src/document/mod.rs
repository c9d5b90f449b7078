// src/document/mod.rs
pub mod models;
pub mod reader;

pub use models::Document;
pub use reader::{AnyPageSource, PageSource};
