//! Checkout entity model.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use toolcrib_core::types::{CheckoutId, ToolId, UserId, WorkerId};

use super::condition::Condition;
use crate::tool::Tool;
use crate::worker::Worker;

/// A single loan of a tool to a worker.
///
/// A checkout is open while `returned_at` is `None`. At most one open
/// checkout exists per tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Checkout {
    /// Unique checkout identifier.
    pub id: CheckoutId,
    /// The tool on loan.
    pub tool_id: ToolId,
    /// The worker holding it.
    pub worker_id: WorkerId,
    /// When the tool left the crib.
    pub checked_out_at: DateTime<Utc>,
    /// When the tool is due back.
    pub expected_return_at: Option<DateTime<Utc>>,
    /// When the tool came back. `None` while open.
    pub returned_at: Option<DateTime<Utc>>,
    /// Admin user who issued the tool.
    pub checked_out_by: Option<UserId>,
    /// Admin user who received it back.
    pub returned_by: Option<UserId>,
    /// Condition when issued.
    pub condition_out: Condition,
    /// Condition when returned.
    pub condition_in: Option<Condition>,
    /// Notes taken at checkout.
    pub checkout_notes: Option<String>,
    /// Notes taken at return.
    pub return_notes: Option<String>,
    /// Cached overdue flag. Recomputed by the overdue refresh; never
    /// authoritative, see [`Checkout::is_overdue_at`].
    pub is_overdue: bool,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
    /// When the row was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Checkout {
    /// Whether the checkout is still open.
    pub fn is_open(&self) -> bool {
        self.returned_at.is_none()
    }

    /// Whether the tool has been returned.
    pub fn is_returned(&self) -> bool {
        self.returned_at.is_some()
    }

    /// Whether the checkout is open and past its expected return time.
    pub fn is_overdue_at(&self, now: DateTime<Utc>) -> bool {
        match self.expected_return_at {
            Some(expected) if self.is_open() => now > expected,
            _ => false,
        }
    }

    /// How long the tool was out. `None` while the checkout is open.
    pub fn duration(&self) -> Option<Duration> {
        self.returned_at.map(|returned| returned - self.checked_out_at)
    }

    /// Whether the stored overdue flag disagrees with the computed one.
    pub fn overdue_cache_is_stale(&self, now: DateTime<Utc>) -> bool {
        self.is_overdue != self.is_overdue_at(now)
    }
}

/// Values written when a checkout is opened.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCheckout {
    /// Tool being issued.
    pub tool_id: ToolId,
    /// Receiving worker.
    pub worker_id: WorkerId,
    /// Issue time.
    pub checked_out_at: DateTime<Utc>,
    /// Due time.
    pub expected_return_at: Option<DateTime<Utc>>,
    /// Issuing admin.
    pub checked_out_by: Option<UserId>,
    /// Condition when issued.
    pub condition_out: Condition,
    /// Notes.
    pub checkout_notes: Option<String>,
}

/// Values written when a checkout is closed.
#[derive(Debug, Clone, PartialEq)]
pub struct CloseCheckout {
    /// Return time.
    pub returned_at: DateTime<Utc>,
    /// Receiving admin.
    pub returned_by: Option<UserId>,
    /// Condition when returned.
    pub condition_in: Condition,
    /// Notes.
    pub return_notes: Option<String>,
}

impl CloseCheckout {
    /// Apply the close onto `checkout`, clearing the overdue cache.
    pub fn apply_to(&self, checkout: &mut Checkout) {
        checkout.returned_at = Some(self.returned_at);
        checkout.returned_by = self.returned_by;
        checkout.condition_in = Some(self.condition_in);
        checkout.return_notes = self.return_notes.clone();
        checkout.is_overdue = false;
    }
}

/// Manual edit of a checkout's non-lifecycle fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCheckout {
    /// New due time.
    pub expected_return_at: Option<DateTime<Utc>>,
    /// New checkout notes.
    pub checkout_notes: Option<String>,
    /// New return notes.
    pub return_notes: Option<String>,
}

impl UpdateCheckout {
    /// Apply the set fields onto `checkout`.
    pub fn apply_to(&self, checkout: &mut Checkout) {
        if let Some(v) = self.expected_return_at {
            checkout.expected_return_at = Some(v);
        }
        if let Some(v) = &self.checkout_notes {
            checkout.checkout_notes = Some(v.clone());
        }
        if let Some(v) = &self.return_notes {
            checkout.return_notes = Some(v.clone());
        }
    }
}

/// A checkout with its tool and worker loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutDetails {
    /// The checkout row.
    #[serde(flatten)]
    pub checkout: Checkout,
    /// The tool on loan.
    pub tool: Tool,
    /// The worker holding it.
    pub worker: Worker,
}

/// Lifecycle bucket used when listing checkouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutState {
    /// Open.
    Active,
    /// Closed.
    Returned,
    /// Open and past due.
    Overdue,
}

impl CheckoutState {
    /// Return the bucket name as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Returned => "returned",
            Self::Overdue => "overdue",
        }
    }
}

/// Listing filter for checkouts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckoutFilter {
    /// Lifecycle bucket.
    pub state: Option<CheckoutState>,
    /// Only checkouts of this tool.
    pub tool_id: Option<ToolId>,
    /// Only checkouts held by this worker.
    pub worker_id: Option<WorkerId>,
}

impl CheckoutFilter {
    /// Whether `checkout` passes this filter at time `now`.
    pub fn matches(&self, checkout: &Checkout, now: DateTime<Utc>) -> bool {
        if self.tool_id.is_some_and(|id| id != checkout.tool_id) {
            return false;
        }
        if self.worker_id.is_some_and(|id| id != checkout.worker_id) {
            return false;
        }
        match self.state {
            None => true,
            Some(CheckoutState::Active) => checkout.is_open(),
            Some(CheckoutState::Returned) => checkout.is_returned(),
            Some(CheckoutState::Overdue) => checkout.is_overdue_at(now),
        }
    }
}
