//! Personal diary library
//!
//! This library provides a categorized note collection with create, edit and
//! delete operations, case-insensitive search with a category filter,
//! key-value persistence and PDF table export.

mod cli;
mod config;
mod errors;
mod export;
mod helper;
mod kv;
mod note;
mod persistence;
mod query;
mod state;
mod storage;
mod types;

// Re-export key components
pub use cli::*;
pub use config::*;
pub use errors::*;
pub use export::*;
pub use helper::*;
pub use kv::*;
pub use note::*;
pub use persistence::*;
pub use query::*;
pub use state::*;
pub use storage::*;
pub use types::*;
