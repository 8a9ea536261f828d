//! Request DTOs with validation.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use toolcrib_core::types::{CheckoutId, ToolId, WorkerId};
use toolcrib_entity::checkout::{Condition, UpdateCheckout};
use toolcrib_entity::tool::{CreateTool, ToolStatus, UpdateTool};
use toolcrib_entity::worker::{CreateWorker, UpdateWorker, WorkerStatus};
use toolcrib_service::{CheckoutData, ReturnData};

/// Scanned label body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ScanRequest {
    /// Raw payload read from the QR code.
    #[validate(length(min = 1, message = "qr_data is required"))]
    pub qr_data: String,
}

/// Worker picker query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkerSearchQuery {
    /// Name or badge substring.
    pub search: Option<String>,
}

/// Checkout body, shared by the scanner and the admin endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CheckoutRequest {
    /// Tool to issue.
    pub tool_id: ToolId,
    /// Receiving worker.
    pub worker_id: WorkerId,
    /// Issue time; defaults to now.
    pub checked_out_at: Option<DateTime<Utc>>,
    /// Due time.
    pub expected_return_at: Option<DateTime<Utc>>,
    /// Condition when issued.
    pub condition_out: Option<Condition>,
    /// Notes.
    #[validate(length(max = 1000, message = "checkout_notes may not exceed 1000 characters"))]
    pub checkout_notes: Option<String>,
}

impl From<CheckoutRequest> for CheckoutData {
    fn from(req: CheckoutRequest) -> Self {
        Self {
            tool_id: req.tool_id,
            worker_id: req.worker_id,
            checked_out_at: req.checked_out_at,
            expected_return_at: req.expected_return_at,
            condition_out: req.condition_out,
            checkout_notes: req.checkout_notes,
        }
    }
}

/// Scanner return body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ScannerReturnRequest {
    /// Checkout to close.
    pub checkout_id: CheckoutId,
    /// Condition when returned.
    pub condition_in: Option<Condition>,
    /// Notes.
    #[validate(length(max = 1000, message = "return_notes may not exceed 1000 characters"))]
    pub return_notes: Option<String>,
}

impl From<ScannerReturnRequest> for ReturnData {
    fn from(req: ScannerReturnRequest) -> Self {
        Self {
            checkout_id: req.checkout_id,
            returned_at: None,
            condition_in: req.condition_in,
            return_notes: req.return_notes,
        }
    }
}

/// Admin return body; the checkout id comes from the path.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ReturnRequest {
    /// Return time; defaults to now.
    pub returned_at: Option<DateTime<Utc>>,
    /// Condition when returned.
    pub condition_in: Option<Condition>,
    /// Notes.
    #[validate(length(max = 1000, message = "return_notes may not exceed 1000 characters"))]
    pub return_notes: Option<String>,
}

impl ReturnRequest {
    /// Attach the checkout id.
    pub fn into_data(self, checkout_id: CheckoutId) -> ReturnData {
        ReturnData {
            checkout_id,
            returned_at: self.returned_at,
            condition_in: self.condition_in,
            return_notes: self.return_notes,
        }
    }
}

/// Checkout edit body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateCheckoutRequest {
    /// New due time.
    pub expected_return_at: Option<DateTime<Utc>>,
    /// New checkout notes.
    #[validate(length(max = 1000, message = "checkout_notes may not exceed 1000 characters"))]
    pub checkout_notes: Option<String>,
    /// New return notes.
    #[validate(length(max = 1000, message = "return_notes may not exceed 1000 characters"))]
    pub return_notes: Option<String>,
}

impl From<UpdateCheckoutRequest> for UpdateCheckout {
    fn from(req: UpdateCheckoutRequest) -> Self {
        Self {
            expected_return_at: req.expected_return_at,
            checkout_notes: req.checkout_notes,
            return_notes: req.return_notes,
        }
    }
}

/// Create tool request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateToolRequest {
    /// Display name.
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Unique tool code.
    #[validate(length(min = 1, max = 50))]
    pub code: String,
    /// Category.
    #[validate(length(max = 100))]
    pub category: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Initial status.
    pub status: Option<ToolStatus>,
    /// Storage location.
    #[validate(length(max = 255))]
    pub location: Option<String>,
    /// Purchase price in cents.
    #[validate(range(min = 0, message = "purchase_price_cents must not be negative"))]
    pub purchase_price_cents: Option<i64>,
    /// Purchase date.
    pub purchase_date: Option<NaiveDate>,
    /// Manufacturer.
    #[validate(length(max = 255))]
    pub manufacturer: Option<String>,
    /// Model.
    #[validate(length(max = 255))]
    pub model: Option<String>,
    /// Notes.
    pub notes: Option<String>,
}

impl From<CreateToolRequest> for CreateTool {
    fn from(req: CreateToolRequest) -> Self {
        Self {
            name: req.name,
            code: req.code,
            category: req.category,
            description: req.description,
            status: req.status,
            location: req.location,
            purchase_price_cents: req.purchase_price_cents,
            purchase_date: req.purchase_date,
            manufacturer: req.manufacturer,
            model: req.model,
            notes: req.notes,
        }
    }
}

/// Update tool request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateToolRequest {
    /// Display name.
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    /// Unique tool code.
    #[validate(length(min = 1, max = 50))]
    pub code: Option<String>,
    /// Category.
    #[validate(length(max = 100))]
    pub category: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Status (available, maintenance or retired).
    pub status: Option<ToolStatus>,
    /// Storage location.
    #[validate(length(max = 255))]
    pub location: Option<String>,
    /// Purchase price in cents.
    #[validate(range(min = 0, message = "purchase_price_cents must not be negative"))]
    pub purchase_price_cents: Option<i64>,
    /// Purchase date.
    pub purchase_date: Option<NaiveDate>,
    /// Manufacturer.
    #[validate(length(max = 255))]
    pub manufacturer: Option<String>,
    /// Model.
    #[validate(length(max = 255))]
    pub model: Option<String>,
    /// Notes.
    pub notes: Option<String>,
}

impl From<UpdateToolRequest> for UpdateTool {
    fn from(req: UpdateToolRequest) -> Self {
        Self {
            name: req.name,
            code: req.code,
            category: req.category,
            description: req.description,
            status: req.status,
            location: req.location,
            purchase_price_cents: req.purchase_price_cents,
            purchase_date: req.purchase_date,
            manufacturer: req.manufacturer,
            model: req.model,
            notes: req.notes,
        }
    }
}

/// Create worker request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateWorkerRequest {
    /// Full name.
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Unique badge number.
    #[validate(length(min = 1, max = 50))]
    pub badge_number: String,
    /// Email.
    #[validate(email)]
    pub email: Option<String>,
    /// Phone.
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    /// Department.
    #[validate(length(max = 100))]
    pub department: Option<String>,
    /// Position.
    #[validate(length(max = 100))]
    pub position: Option<String>,
    /// Initial status.
    pub status: Option<WorkerStatus>,
    /// Notes.
    pub notes: Option<String>,
}

impl From<CreateWorkerRequest> for CreateWorker {
    fn from(req: CreateWorkerRequest) -> Self {
        Self {
            name: req.name,
            badge_number: req.badge_number,
            email: req.email,
            phone: req.phone,
            department: req.department,
            position: req.position,
            status: req.status,
            notes: req.notes,
        }
    }
}

/// Update worker request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateWorkerRequest {
    /// Full name.
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    /// Unique badge number.
    #[validate(length(min = 1, max = 50))]
    pub badge_number: Option<String>,
    /// Email.
    #[validate(email)]
    pub email: Option<String>,
    /// Phone.
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    /// Department.
    #[validate(length(max = 100))]
    pub department: Option<String>,
    /// Position.
    #[validate(length(max = 100))]
    pub position: Option<String>,
    /// Status.
    pub status: Option<WorkerStatus>,
    /// Notes.
    pub notes: Option<String>,
}

impl From<UpdateWorkerRequest> for UpdateWorker {
    fn from(req: UpdateWorkerRequest) -> Self {
        Self {
            name: req.name,
            badge_number: req.badge_number,
            email: req.email,
            phone: req.phone,
            department: req.department,
            position: req.position,
            status: req.status,
            notes: req.notes,
        }
    }
}

/// Batch QR generation body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct QrBatchRequest {
    /// Tools to label.
    #[validate(length(min = 1, max = 500, message = "tool_ids must list between 1 and 500 tools"))]
    pub tool_ids: Vec<ToolId>,
}
