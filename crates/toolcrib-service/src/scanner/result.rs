//! Read model returned by a scan lookup.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use toolcrib_core::types::{CheckoutId, ToolId, WorkerId};
use toolcrib_entity::checkout::CheckoutDetails;
use toolcrib_entity::tool::{Tool, ToolStatus};

/// What the scanner shows after reading a tool label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    /// The scanned tool.
    pub tool: ScannedTool,
    /// Its open checkout, if any.
    pub current_checkout: Option<ScannedCheckout>,
}

/// Tool summary shown on scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScannedTool {
    pub id: ToolId,
    pub name: String,
    pub code: String,
    pub category: Option<String>,
    pub status: ToolStatus,
    pub is_available: bool,
    pub is_checked_out: bool,
}

/// Open checkout shown on scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScannedCheckout {
    pub id: CheckoutId,
    pub worker: ScannedWorker,
    pub checked_out_at: DateTime<Utc>,
    pub expected_return_at: Option<DateTime<Utc>>,
    pub is_overdue: bool,
}

/// Holder of a scanned tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannedWorker {
    pub id: WorkerId,
    pub name: String,
    pub badge_number: String,
}

impl ScanResult {
    /// Build the result for `tool`, computing overdue at `now`.
    pub fn new(tool: &Tool, open: Option<&CheckoutDetails>, now: DateTime<Utc>) -> Self {
        Self {
            tool: ScannedTool {
                id: tool.id,
                name: tool.name.clone(),
                code: tool.code.clone(),
                category: tool.category.clone(),
                status: tool.status,
                is_available: tool.is_available(),
                is_checked_out: tool.is_checked_out(),
            },
            current_checkout: open.map(|details| ScannedCheckout {
                id: details.checkout.id,
                worker: ScannedWorker {
                    id: details.worker.id,
                    name: details.worker.name.clone(),
                    badge_number: details.worker.badge_number.clone(),
                },
                checked_out_at: details.checkout.checked_out_at,
                expected_return_at: details.checkout.expected_return_at,
                is_overdue: details.checkout.is_overdue_at(now),
            }),
        }
    }
}
