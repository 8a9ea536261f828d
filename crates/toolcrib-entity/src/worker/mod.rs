//! Worker domain entities.

pub mod model;
pub mod status;

pub use model::{CreateWorker, UpdateWorker, Worker, WorkerFilter, WorkerSummary};
pub use status::WorkerStatus;
