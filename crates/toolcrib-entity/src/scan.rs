//! QR payload encoded on tool labels.
//!
//! The label carries a small JSON object: `{"type":"tool","id":1,"code":"DRILL-001"}`.
//! Scanners send the decoded string back verbatim; only `type` and `code`
//! are required to resolve a tool.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use toolcrib_core::types::ToolId;
use toolcrib_core::{AppError, AppResult};

use crate::tool::Tool;

/// The only payload type currently printed.
pub const TOOL_PAYLOAD_TYPE: &str = "tool";

/// Structured content of a tool QR label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrPayload {
    /// Payload discriminator, always `"tool"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Tool id at the time the label was printed.
    pub id: ToolId,
    /// Tool code.
    pub code: String,
}

impl QrPayload {
    /// Payload for the given tool.
    pub fn for_tool(tool: &Tool) -> Self {
        Self {
            kind: TOOL_PAYLOAD_TYPE.to_string(),
            id: tool.id,
            code: tool.code.clone(),
        }
    }

    /// Serialize to the compact JSON string encoded in the QR image.
    pub fn to_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Extract the tool code from a raw scanned string.
    ///
    /// Never panics; every malformed input maps to an `InvalidInput` error.
    pub fn parse(raw: &str) -> AppResult<String> {
        let value: Value = serde_json::from_str(raw.trim())
            .map_err(|_| AppError::invalid_input("malformed QR payload"))?;
        let object = value
            .as_object()
            .ok_or_else(|| AppError::invalid_input("malformed QR payload"))?;

        if object.get("type").and_then(Value::as_str) != Some(TOOL_PAYLOAD_TYPE) {
            return Err(AppError::invalid_input("invalid QR code type"));
        }

        object
            .get("code")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(str::to_string)
            .ok_or_else(|| AppError::invalid_input("QR payload is missing a tool code"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolcrib_core::ErrorKind;

    #[test]
    fn test_parse_tool_payload() {
        let code = QrPayload::parse(r#"{"type":"tool","code":"DRILL-001"}"#).unwrap();
        assert_eq!(code, "DRILL-001");
    }

    #[test]
    fn test_parse_accepts_generated_payload() {
        let payload = QrPayload {
            kind: TOOL_PAYLOAD_TYPE.into(),
            id: ToolId::new(4),
            code: "SAW-12".into(),
        };
        let json = payload.to_json().unwrap();
        assert_eq!(json, r#"{"type":"tool","id":4,"code":"SAW-12"}"#);
        assert_eq!(QrPayload::parse(&json).unwrap(), "SAW-12");
    }

    #[test]
    fn test_parse_rejects_other_types() {
        let err = QrPayload::parse(r#"{"type":"widget","code":"X"}"#).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidInput);
        assert_eq!(err.message, "invalid QR code type");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for raw in ["", "DRILL-001", "[1,2]", "\"tool\"", "{"] {
            let err = QrPayload::parse(raw).unwrap_err();
            assert_eq!(err.kind, ErrorKind::InvalidInput, "input {raw:?}");
            assert_eq!(err.message, "malformed QR payload");
        }
    }

    #[test]
    fn test_parse_requires_code() {
        for raw in [r#"{"type":"tool"}"#, r#"{"type":"tool","code":5}"#, r#"{"type":"tool","code":"  "}"#] {
            let err = QrPayload::parse(raw).unwrap_err();
            assert_eq!(err.message, "QR payload is missing a tool code");
        }
    }
}
