//! Worker administration.

pub mod service;

pub use service::{WorkerDetails, WorkerService};
