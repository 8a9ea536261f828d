//! Core traits defined in `toolcrib-core` and implemented by other crates.

pub mod clock;
pub mod qr;
pub mod storage;

pub use clock::{Clock, ManualClock, SystemClock};
pub use qr::QrRenderer;
pub use storage::BlobStore;
