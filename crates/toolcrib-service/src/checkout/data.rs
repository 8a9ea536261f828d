//! Inputs of the checkout and return operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use toolcrib_core::types::{CheckoutId, ToolId, WorkerId};
use toolcrib_entity::checkout::Condition;

/// Request to hand a tool to a worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutData {
    /// Tool to issue.
    pub tool_id: ToolId,
    /// Receiving worker.
    pub worker_id: WorkerId,
    /// Issue time; defaults to the request time.
    pub checked_out_at: Option<DateTime<Utc>>,
    /// Due time.
    pub expected_return_at: Option<DateTime<Utc>>,
    /// Condition when issued; defaults to good.
    pub condition_out: Option<Condition>,
    /// Notes.
    pub checkout_notes: Option<String>,
}

impl CheckoutData {
    /// Minimal request: issue `tool_id` to `worker_id` now.
    pub fn new(tool_id: ToolId, worker_id: WorkerId) -> Self {
        Self {
            tool_id,
            worker_id,
            checked_out_at: None,
            expected_return_at: None,
            condition_out: None,
            checkout_notes: None,
        }
    }
}

/// Request to close a checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnData {
    /// Checkout to close.
    pub checkout_id: CheckoutId,
    /// Return time; defaults to the request time.
    pub returned_at: Option<DateTime<Utc>>,
    /// Condition when returned; defaults to good.
    pub condition_in: Option<Condition>,
    /// Notes.
    pub return_notes: Option<String>,
}

impl ReturnData {
    /// Minimal request: close `checkout_id` now in good condition.
    pub fn new(checkout_id: CheckoutId) -> Self {
        Self {
            checkout_id,
            returned_at: None,
            condition_in: None,
            return_notes: None,
        }
    }
}
