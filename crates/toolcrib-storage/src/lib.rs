//! # toolcrib-storage
//!
//! Implementations of the [`BlobStore`](toolcrib_core::traits::BlobStore)
//! and [`QrRenderer`](toolcrib_core::traits::QrRenderer) traits: a local
//! filesystem store and an SVG QR renderer.

pub mod local;
pub mod qr;

pub use local::LocalBlobStore;
pub use qr::SvgQrRenderer;
