//! JSON file backend for the Margin comment store.
//!
//! The whole collection lives in one human-readable document: a top-level
//! array of comment objects, two-space indented. Every save replaces the
//! document atomically.

mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::JsonFileStore;
