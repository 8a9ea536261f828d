//! Tool availability status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::checkout::Condition;

/// Availability status of a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "tool_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ToolStatus {
    /// On the shelf and free to be checked out.
    #[default]
    Available,
    /// Held by a worker under an open checkout.
    CheckedOut,
    /// Pulled for repair or inspection.
    Maintenance,
    /// Permanently out of service.
    Retired,
}

impl ToolStatus {
    /// Whether a new checkout may be opened against a tool in this status.
    pub fn can_check_out(&self) -> bool {
        matches!(self, Self::Available)
    }

    /// Status a tool moves to when it comes back in the given condition.
    ///
    /// Tools returned in fair or poor condition go to maintenance; every
    /// other condition puts them back on the shelf.
    pub fn after_return(condition: Condition) -> Self {
        if condition.requires_maintenance() {
            Self::Maintenance
        } else {
            Self::Available
        }
    }

    /// Whether an administrator may set this status directly.
    ///
    /// `checked_out` is only ever entered through a checkout.
    pub fn is_admin_assignable(&self) -> bool {
        !matches!(self, Self::CheckedOut)
    }

    /// Return the status as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::CheckedOut => "checked_out",
            Self::Maintenance => "maintenance",
            Self::Retired => "retired",
        }
    }
}

impl fmt::Display for ToolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ToolStatus {
    type Err = toolcrib_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "available" => Ok(Self::Available),
            "checked_out" => Ok(Self::CheckedOut),
            "maintenance" => Ok(Self::Maintenance),
            "retired" => Ok(Self::Retired),
            _ => Err(toolcrib_core::AppError::invalid_field(
                "status",
                format!(
                    "Invalid tool status: '{s}'. Expected one of: available, checked_out, maintenance, retired"
                ),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_available_can_check_out() {
        assert!(ToolStatus::Available.can_check_out());
        assert!(!ToolStatus::CheckedOut.can_check_out());
        assert!(!ToolStatus::Maintenance.can_check_out());
        assert!(!ToolStatus::Retired.can_check_out());
    }

    #[test]
    fn test_after_return_depends_only_on_condition() {
        assert_eq!(ToolStatus::after_return(Condition::Poor), ToolStatus::Maintenance);
        assert_eq!(ToolStatus::after_return(Condition::Fair), ToolStatus::Maintenance);
        assert_eq!(ToolStatus::after_return(Condition::Good), ToolStatus::Available);
        assert_eq!(ToolStatus::after_return(Condition::Excellent), ToolStatus::Available);
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&ToolStatus::CheckedOut).unwrap();
        assert_eq!(json, "\"checked_out\"");
        assert_eq!("CHECKED_OUT".parse::<ToolStatus>().unwrap(), ToolStatus::CheckedOut);
        assert!("lost".parse::<ToolStatus>().is_err());
    }
}
