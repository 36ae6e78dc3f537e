//! Pairing-code rendezvous.
//!
//! The wire client pushes the raw pairing-code text on a one-shot channel
//! while its login call is still in flight. This bridge waits for that
//! signal, renders the code as a scannable QR image and hands it back
//! base64-encoded. The login call itself fails independently on its own
//! channel, so a silent code signal only ever means "no code within the
//! deadline".

use std::time::Duration;

use {base64::Engine, qrcode::QrCode, tokio::sync::oneshot};

use wagate_common::GatewayError;

/// Minimum rendered QR side length in pixels.
const QR_MIN_SIZE: u32 = 256;

/// Wait up to `timeout` for a pairing code and render it as a base64 PNG.
///
/// Returns [`GatewayError::Timeout`] when the deadline elapses or when the
/// sending side is dropped without a code (a superseded pairing attempt).
pub async fn await_code(
    timeout: Duration,
    code_rx: oneshot::Receiver<String>,
) -> Result<String, GatewayError> {
    match tokio::time::timeout(timeout, code_rx).await {
        Ok(Ok(code)) => encode_qr(&code),
        Ok(Err(_)) | Err(_) => Err(GatewayError::Timeout("pairing code")),
    }
}

fn encode_qr(code: &str) -> Result<String, GatewayError> {
    let qr = QrCode::with_error_correction_level(code.as_bytes(), qrcode::EcLevel::M)
        .map_err(|e| GatewayError::Protocol(format!("pairing code not encodable: {e}")))?;
    let img = qr
        .render::<image::Luma<u8>>()
        .min_dimensions(QR_MIN_SIZE, QR_MIN_SIZE)
        .build();
    let mut png = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(|e| GatewayError::Protocol(format!("qr render failed: {e}")))?;
    Ok(base64::engine::general_purpose::STANDARD.encode(png))
}
