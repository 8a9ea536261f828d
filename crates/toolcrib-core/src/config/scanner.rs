//! Scanner API configuration.

use serde::{Deserialize, Serialize};

/// Settings for the mobile scanner endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Maximum number of workers returned by the active-worker search.
    #[serde(default = "default_worker_search_limit")]
    pub worker_search_limit: u32,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            worker_search_limit: default_worker_search_limit(),
        }
    }
}

fn default_worker_search_limit() -> u32 {
    50
}
