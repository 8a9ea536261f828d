//! QR label management.

pub mod service;

pub use service::{QrLabel, QrService, QrSettings};
