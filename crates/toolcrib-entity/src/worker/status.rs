//! Worker status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Employment status of a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "worker_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum WorkerStatus {
    /// Eligible to hold tools.
    #[default]
    Active,
    /// No longer working.
    Inactive,
    /// Temporarily barred from checkouts.
    Suspended,
}

impl WorkerStatus {
    /// Check if a worker with this status may receive a new checkout.
    pub fn can_receive_checkout(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Suspended => "suspended",
        }
    }
}

impl fmt::Display for WorkerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for WorkerStatus {
    type Err = toolcrib_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "suspended" => Ok(Self::Suspended),
            _ => Err(toolcrib_core::AppError::invalid_field(
                "status",
                format!("Invalid worker status: '{s}'. Expected one of: active, inactive, suspended"),
            )),
        }
    }
}
