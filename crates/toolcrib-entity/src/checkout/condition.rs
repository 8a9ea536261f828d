//! Tool condition rating recorded at checkout and return.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Qualitative rating of a tool's condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "tool_condition", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    /// Like new.
    Excellent,
    /// Normal wear.
    #[default]
    Good,
    /// Worn, needs a look.
    Fair,
    /// Damaged.
    Poor,
}

impl Condition {
    /// Whether a tool returned in this condition must go to maintenance.
    pub fn requires_maintenance(&self) -> bool {
        matches!(self, Self::Fair | Self::Poor)
    }

    /// Return the condition as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Condition {
    type Err = toolcrib_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "excellent" => Ok(Self::Excellent),
            "good" => Ok(Self::Good),
            "fair" => Ok(Self::Fair),
            "poor" => Ok(Self::Poor),
            _ => Err(toolcrib_core::AppError::invalid_field(
                "condition",
                format!("Invalid condition: '{s}'. Expected one of: excellent, good, fair, poor"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_good() {
        assert_eq!(Condition::default(), Condition::Good);
    }

    #[test]
    fn test_requires_maintenance() {
        assert!(Condition::Poor.requires_maintenance());
        assert!(Condition::Fair.requires_maintenance());
        assert!(!Condition::Good.requires_maintenance());
        assert!(!Condition::Excellent.requires_maintenance());
    }

    #[test]
    fn test_rejects_unknown_value() {
        let err = "broken".parse::<Condition>().unwrap_err();
        assert!(err.fields.contains_key("condition"));
    }
}
