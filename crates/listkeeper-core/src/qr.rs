//! QR code rendering

use std::io::Cursor;

use image::Luma;
use qrcode::{EcLevel, QrCode};

use crate::Result;

/// Minimum rendered image dimension in pixels
pub const QR_SIZE: u32 = 512;

/// Encode arbitrary text as a PNG QR code image.
///
/// Error-correction level High, at least [`QR_SIZE`] pixels square.
/// Fails when the text exceeds the symbol capacity; the caller is
/// expected to report that to the requesting user only.
pub fn encode_png(text: &str) -> Result<Vec<u8>> {
    let code = QrCode::with_error_correction_level(text.as_bytes(), EcLevel::H)?;
    let image = code
        .render::<Luma<u8>>()
        .min_dimensions(QR_SIZE, QR_SIZE)
        .build();

    let mut png = Vec::new();
    image.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)?;
    Ok(png)
}
