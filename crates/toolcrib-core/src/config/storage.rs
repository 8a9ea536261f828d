//! QR image storage configuration.

use serde::{Deserialize, Serialize};

/// Where generated QR images are written and how they are addressed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory of the local blob store.
    #[serde(default = "default_root")]
    pub root: String,
    /// Sub-directory (relative to `root`) holding QR images.
    #[serde(default = "default_qr_directory")]
    pub qr_directory: String,
    /// Public URL prefix under which `root` is served.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    /// Rendered QR image edge length in pixels.
    #[serde(default = "default_qr_size")]
    pub qr_size: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            qr_directory: default_qr_directory(),
            public_base_url: default_public_base_url(),
            qr_size: default_qr_size(),
        }
    }
}

fn default_root() -> String {
    "data/storage".to_string()
}

fn default_qr_directory() -> String {
    "qrcodes".to_string()
}

fn default_public_base_url() -> String {
    "/storage".to_string()
}

fn default_qr_size() -> u32 {
    300
}
