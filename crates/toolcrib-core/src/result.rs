//! Convenience result type alias for ToolCrib.

use crate::error::AppError;

/// A specialized `Result` type for ToolCrib operations.
pub type AppResult<T> = Result<T, AppError>;
