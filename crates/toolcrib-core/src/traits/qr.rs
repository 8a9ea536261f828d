//! QR image rendering trait.

use crate::result::AppResult;

/// Turns a text payload into an encoded image.
pub trait QrRenderer: Send + Sync + std::fmt::Debug + 'static {
    /// File extension of the produced images, without the dot.
    fn extension(&self) -> &str;

    /// MIME type of the produced images.
    fn content_type(&self) -> &str;

    /// Render `payload` as an image roughly `size` pixels on each side.
    fn render(&self, payload: &str, size: u32) -> AppResult<Vec<u8>>;
}
