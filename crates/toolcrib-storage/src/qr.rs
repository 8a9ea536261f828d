//! SVG QR code renderer.

use qrcode::render::svg;
use qrcode::{EcLevel, QrCode};

use toolcrib_core::error::AppError;
use toolcrib_core::result::AppResult;
use toolcrib_core::traits::QrRenderer;

/// Renders payloads as SVG QR codes at error-correction level H.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgQrRenderer;

impl QrRenderer for SvgQrRenderer {
    fn extension(&self) -> &str {
        "svg"
    }

    fn content_type(&self) -> &str {
        "image/svg+xml"
    }

    fn render(&self, payload: &str, size: u32) -> AppResult<Vec<u8>> {
        let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::H)
            .map_err(|e| AppError::invalid_input(format!("Payload cannot be encoded as QR: {e}")))?;

        let image = code
            .render()
            .min_dimensions(size, size)
            .quiet_zone(true)
            .dark_color(svg::Color("#000000"))
            .light_color(svg::Color("#ffffff"))
            .build();

        Ok(image.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_svg_document() {
        let bytes = SvgQrRenderer
            .render(r#"{"type":"tool","id":1,"code":"DRILL-001"}"#, 300)
            .unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("<svg"));
        assert!(text.contains("#000000"));
    }

    #[test]
    fn test_oversized_payload_is_rejected() {
        let payload = "x".repeat(10_000);
        assert!(SvgQrRenderer.render(&payload, 300).is_err());
    }
}
