//! Read paths used by the handheld scanner.

pub mod result;
pub mod service;

pub use result::{ScanResult, ScannedCheckout, ScannedTool, ScannedWorker};
pub use service::ScannerService;
