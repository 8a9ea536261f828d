//! Tool entity model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use toolcrib_core::types::ToolId;

use super::status::ToolStatus;

/// A physical, trackable tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Tool {
    /// Unique tool identifier.
    pub id: ToolId,
    /// Human-readable name.
    pub name: String,
    /// Unique code printed on the tool and encoded in its QR image.
    pub code: String,
    /// File name of the generated QR image, if any.
    pub qr_code: Option<String>,
    /// Free-form category (e.g. "Power Tools").
    pub category: Option<String>,
    /// Longer description.
    pub description: Option<String>,
    /// Availability status.
    pub status: ToolStatus,
    /// Storage location.
    pub location: Option<String>,
    /// Purchase price in minor currency units.
    pub purchase_price_cents: Option<i64>,
    /// Purchase date.
    pub purchase_date: Option<NaiveDate>,
    /// Manufacturer.
    pub manufacturer: Option<String>,
    /// Manufacturer model designation.
    pub model: Option<String>,
    /// Administrative notes.
    pub notes: Option<String>,
    /// When the tool was created.
    pub created_at: DateTime<Utc>,
    /// When the tool was last updated.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Tool {
    /// Check if the tool may be checked out right now.
    pub fn is_available(&self) -> bool {
        self.status.can_check_out()
    }

    /// Check if the tool is held under an open checkout.
    pub fn is_checked_out(&self) -> bool {
        self.status == ToolStatus::CheckedOut
    }

    /// Check if the tool has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Public URL of the QR image, given the storage base URL and the QR
    /// sub-directory.
    pub fn qr_code_url(&self, public_base_url: &str, qr_directory: &str) -> Option<String> {
        self.qr_code.as_ref().map(|file| {
            format!(
                "{}/{}/{}",
                public_base_url.trim_end_matches('/'),
                qr_directory.trim_matches('/'),
                file
            )
        })
    }
}

/// Data required to create a new tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTool {
    /// Name.
    pub name: String,
    /// Unique code.
    pub code: String,
    /// Category.
    pub category: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Initial status (defaults to available).
    pub status: Option<ToolStatus>,
    /// Location.
    pub location: Option<String>,
    /// Purchase price in minor units.
    pub purchase_price_cents: Option<i64>,
    /// Purchase date.
    pub purchase_date: Option<NaiveDate>,
    /// Manufacturer.
    pub manufacturer: Option<String>,
    /// Model.
    pub model: Option<String>,
    /// Notes.
    pub notes: Option<String>,
}

/// Partial update of a tool. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTool {
    /// New name.
    pub name: Option<String>,
    /// New code.
    pub code: Option<String>,
    /// New category.
    pub category: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New status.
    pub status: Option<ToolStatus>,
    /// New location.
    pub location: Option<String>,
    /// New purchase price.
    pub purchase_price_cents: Option<i64>,
    /// New purchase date.
    pub purchase_date: Option<NaiveDate>,
    /// New manufacturer.
    pub manufacturer: Option<String>,
    /// New model.
    pub model: Option<String>,
    /// New notes.
    pub notes: Option<String>,
}

impl UpdateTool {
    /// Apply the set fields onto `tool`.
    pub fn apply_to(&self, tool: &mut Tool) {
        if let Some(v) = &self.name {
            tool.name = v.clone();
        }
        if let Some(v) = &self.code {
            tool.code = v.clone();
        }
        if let Some(v) = &self.category {
            tool.category = Some(v.clone());
        }
        if let Some(v) = &self.description {
            tool.description = Some(v.clone());
        }
        if let Some(v) = self.status {
            tool.status = v;
        }
        if let Some(v) = &self.location {
            tool.location = Some(v.clone());
        }
        if let Some(v) = self.purchase_price_cents {
            tool.purchase_price_cents = Some(v);
        }
        if let Some(v) = self.purchase_date {
            tool.purchase_date = Some(v);
        }
        if let Some(v) = &self.manufacturer {
            tool.manufacturer = Some(v.clone());
        }
        if let Some(v) = &self.model {
            tool.model = Some(v.clone());
        }
        if let Some(v) = &self.notes {
            tool.notes = Some(v.clone());
        }
    }
}

/// Listing filter for tools. Soft-deleted tools are never listed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolFilter {
    /// Only tools in this status.
    pub status: Option<ToolStatus>,
    /// Only tools in this category.
    pub category: Option<String>,
    /// Case-insensitive substring of name or code.
    pub search: Option<String>,
}

impl ToolFilter {
    /// Whether `tool` passes this filter.
    pub fn matches(&self, tool: &Tool) -> bool {
        if tool.is_deleted() {
            return false;
        }
        if self.status.is_some_and(|s| s != tool.status) {
            return false;
        }
        if let Some(category) = &self.category {
            if tool.category.as_deref() != Some(category.as_str()) {
                return false;
            }
        }
        if let Some(term) = self.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            let term = term.to_lowercase();
            return tool.name.to_lowercase().contains(&term)
                || tool.code.to_lowercase().contains(&term);
        }
        true
    }
}
