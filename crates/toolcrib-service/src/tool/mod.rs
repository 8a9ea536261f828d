//! Tool administration.

pub mod service;

pub use service::ToolService;
