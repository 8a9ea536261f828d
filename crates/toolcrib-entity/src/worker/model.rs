//! Worker entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use toolcrib_core::types::WorkerId;

use super::status::WorkerStatus;

/// A person who can hold tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Worker {
    /// Unique worker identifier.
    pub id: WorkerId,
    /// Full name.
    pub name: String,
    /// Unique badge number.
    pub badge_number: String,
    /// Email address (optional, unique).
    pub email: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Department.
    pub department: Option<String>,
    /// Position / job title.
    pub position: Option<String>,
    /// Employment status.
    pub status: WorkerStatus,
    /// Administrative notes.
    pub notes: Option<String>,
    /// When the worker was created.
    pub created_at: DateTime<Utc>,
    /// When the worker was last updated.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Worker {
    /// Check if the worker may be assigned a new checkout.
    pub fn is_active(&self) -> bool {
        self.status.can_receive_checkout()
    }

    /// Check if the worker has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// The compact form returned by the scanner worker picker.
    pub fn summary(&self) -> WorkerSummary {
        WorkerSummary {
            id: self.id,
            name: self.name.clone(),
            badge_number: self.badge_number.clone(),
            department: self.department.clone(),
        }
    }
}

/// Identity fields shown when picking a worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct WorkerSummary {
    /// Worker ID.
    pub id: WorkerId,
    /// Name.
    pub name: String,
    /// Badge number.
    pub badge_number: String,
    /// Department.
    pub department: Option<String>,
}

/// Data required to create a new worker.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateWorker {
    /// Name.
    pub name: String,
    /// Unique badge number.
    pub badge_number: String,
    /// Email.
    pub email: Option<String>,
    /// Phone.
    pub phone: Option<String>,
    /// Department.
    pub department: Option<String>,
    /// Position.
    pub position: Option<String>,
    /// Initial status (defaults to active).
    pub status: Option<WorkerStatus>,
    /// Notes.
    pub notes: Option<String>,
}

/// Partial update of a worker. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateWorker {
    /// New name.
    pub name: Option<String>,
    /// New badge number.
    pub badge_number: Option<String>,
    /// New email.
    pub email: Option<String>,
    /// New phone.
    pub phone: Option<String>,
    /// New department.
    pub department: Option<String>,
    /// New position.
    pub position: Option<String>,
    /// New status.
    pub status: Option<WorkerStatus>,
    /// New notes.
    pub notes: Option<String>,
}

impl UpdateWorker {
    /// Apply the set fields onto `worker`.
    pub fn apply_to(&self, worker: &mut Worker) {
        if let Some(v) = &self.name {
            worker.name = v.clone();
        }
        if let Some(v) = &self.badge_number {
            worker.badge_number = v.clone();
        }
        if let Some(v) = &self.email {
            worker.email = Some(v.clone());
        }
        if let Some(v) = &self.phone {
            worker.phone = Some(v.clone());
        }
        if let Some(v) = &self.department {
            worker.department = Some(v.clone());
        }
        if let Some(v) = &self.position {
            worker.position = Some(v.clone());
        }
        if let Some(v) = self.status {
            worker.status = v;
        }
        if let Some(v) = &self.notes {
            worker.notes = Some(v.clone());
        }
    }
}

/// Listing filter for workers. Soft-deleted workers are never listed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkerFilter {
    /// Only workers in this status.
    pub status: Option<WorkerStatus>,
    /// Only workers in this department.
    pub department: Option<String>,
    /// Case-insensitive substring of name or badge number.
    pub search: Option<String>,
}

impl WorkerFilter {
    /// Filter used by the scanner picker: active workers matching `search`.
    pub fn active_matching(search: Option<&str>) -> Self {
        Self {
            status: Some(WorkerStatus::Active),
            department: None,
            search: search.map(str::to_string),
        }
    }

    /// The normalized search term, if any.
    pub fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
    }

    /// Whether `worker` passes this filter.
    pub fn matches(&self, worker: &Worker) -> bool {
        if worker.is_deleted() {
            return false;
        }
        if self.status.is_some_and(|s| s != worker.status) {
            return false;
        }
        if let Some(department) = &self.department {
            if worker.department.as_deref() != Some(department.as_str()) {
                return false;
            }
        }
        if let Some(term) = self.search_term() {
            return worker.name.to_lowercase().contains(&term)
                || worker.badge_number.to_lowercase().contains(&term);
        }
        true
    }
}
