//! # toolcrib-core
//!
//! Core crate for ToolCrib. Contains configuration schemas, typed
//! identifiers, pagination types, the clock and blob-store traits, and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other ToolCrib crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
