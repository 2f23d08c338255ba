//! Terminal rendering of pairing QR codes.

use qrcode::render::unicode::Dense1x2;
use qrcode::{EcLevel, QrCode};
use warelay_core::error::RelayError;

/// Render `qr_data` as a half-block Unicode QR code.
///
/// Two module rows share one text line, and colors are inverted so the code
/// scans on a dark terminal background.
pub fn render_qr_terminal(qr_data: &str) -> Result<String, RelayError> {
    let code = QrCode::with_error_correction_level(qr_data.as_bytes(), EcLevel::L)
        .map_err(|e| RelayError::Channel(format!("QR generation failed: {e}")))?;

    Ok(code
        .render::<Dense1x2>()
        .dark_color(Dense1x2::Light)
        .light_color(Dense1x2::Dark)
        .quiet_zone(true)
        .build())
}
