//! Core types and trait definitions for the Margin comment store.
//!
//! This crate is deliberately free of HTTP and filesystem dependencies.
//! All other crates depend on it.

pub mod anchor;
pub mod collection;
pub mod comment;
pub mod error;
pub mod store;

pub use error::{Error, Result};
