//! Custom Axum extractors.

pub mod actor;
pub mod json;
pub mod pagination;

pub use actor::Actor;
pub use json::ValidatedJson;
pub use pagination::PaginationParams;
