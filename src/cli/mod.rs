//! Command-line host for the diary.
mod app;
mod args;

pub use app::*;
pub use args::*;
