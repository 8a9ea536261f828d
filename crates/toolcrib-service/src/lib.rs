//! # toolcrib-service
//!
//! Business logic service layer for ToolCrib. Services receive their
//! dependencies at construction time as `Arc` trait objects (inventory
//! store, blob store, QR renderer, clock) and take a [`RequestContext`]
//! carrying the actor and the request time.

pub mod checkout;
pub mod context;
pub mod qr;
pub mod scanner;
pub mod tool;
pub mod worker;

#[cfg(test)]
pub(crate) mod testing;

pub use checkout::{CheckoutData, CheckoutService, ReturnData};
pub use context::RequestContext;
pub use qr::{QrLabel, QrService, QrSettings};
pub use scanner::{ScanResult, ScannerService};
pub use tool::ToolService;
pub use worker::{WorkerDetails, WorkerService};
