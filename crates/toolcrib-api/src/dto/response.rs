//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use toolcrib_core::config::StorageConfig;
use toolcrib_core::types::CheckoutId;
use toolcrib_entity::checkout::CheckoutDetails;
use toolcrib_entity::tool::{Tool, ToolStatus};

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Optional human-readable message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data,
        }
    }

    /// Creates a successful response with a message.
    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Whether the inventory store answered.
    pub database: bool,
    /// Whether the blob store answered.
    pub storage: bool,
}

/// A tool with derived flags and its label URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResponse {
    /// The tool row.
    #[serde(flatten)]
    pub tool: Tool,
    /// Status is `available`.
    pub is_available: bool,
    /// Status is `checked_out`.
    pub is_checked_out: bool,
    /// Public URL of the QR image, when one exists.
    pub qr_code_url: Option<String>,
}

impl ToolResponse {
    /// Build the response, resolving the label URL against the storage config.
    pub fn new(tool: Tool, storage: &StorageConfig) -> Self {
        Self {
            is_available: tool.is_available(),
            is_checked_out: tool.is_checked_out(),
            qr_code_url: tool.qr_code_url(&storage.public_base_url, &storage.qr_directory),
            tool,
        }
    }
}

/// Tool name and code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolBrief {
    /// Display name.
    pub name: String,
    /// Tool code.
    pub code: String,
}

/// Worker name and badge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerBrief {
    /// Full name.
    pub name: String,
    /// Badge number.
    pub badge_number: String,
}

/// Body of a successful scanner checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerCheckoutResponse {
    /// The new checkout.
    pub checkout_id: CheckoutId,
    /// Issued tool.
    pub tool: ToolBrief,
    /// Receiving worker.
    pub worker: WorkerBrief,
    /// Issue time.
    pub checked_out_at: DateTime<Utc>,
}

impl From<&CheckoutDetails> for ScannerCheckoutResponse {
    fn from(details: &CheckoutDetails) -> Self {
        Self {
            checkout_id: details.checkout.id,
            tool: ToolBrief {
                name: details.tool.name.clone(),
                code: details.tool.code.clone(),
            },
            worker: WorkerBrief {
                name: details.worker.name.clone(),
                badge_number: details.worker.badge_number.clone(),
            },
            checked_out_at: details.checkout.checked_out_at,
        }
    }
}

/// Returned tool with its new status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnedTool {
    /// Display name.
    pub name: String,
    /// Tool code.
    pub code: String,
    /// Status after the return.
    pub status: ToolStatus,
}

/// Body of a successful scanner return.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerReturnResponse {
    /// The closed checkout.
    pub checkout_id: CheckoutId,
    /// Returned tool.
    pub tool: ReturnedTool,
    /// Return time.
    pub returned_at: Option<DateTime<Utc>>,
}

impl From<&CheckoutDetails> for ScannerReturnResponse {
    fn from(details: &CheckoutDetails) -> Self {
        Self {
            checkout_id: details.checkout.id,
            tool: ReturnedTool {
                name: details.tool.name.clone(),
                code: details.tool.code.clone(),
                status: details.tool.status,
            },
            returned_at: details.checkout.returned_at,
        }
    }
}

/// Number of checkouts whose overdue flag changed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    /// Rows updated.
    pub updated: u64,
}

/// Outcome of a label deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletedResponse {
    /// Whether anything was removed.
    pub deleted: bool,
}
