//! QR encoding of a single fragment into PNG bytes.

use std::io::Cursor;

use image::{ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};
use thiserror::Error;

/// Default edge length of the rendered PNG in pixels.
pub const DEFAULT_QR_SIZE: u32 = 512;

#[derive(Debug, Error)]
pub enum BarcodeError {
    #[error("qr encoding failed: {0}")]
    Encode(String),
    #[error("png encoding failed: {0}")]
    Image(String),
}

/// Turns fragment text into image bytes.
pub trait BarcodeEncoder {
    fn encode(&self, text: &str) -> Result<Vec<u8>, BarcodeError>;
}

/// QR codes at the highest error-correction level, rendered as grayscale PNG.
#[derive(Debug, Clone, Copy)]
pub struct QrEncoder {
    size: u32,
}

impl QrEncoder {
    pub fn new(size: u32) -> Self {
        Self { size }
    }
}

impl Default for QrEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_QR_SIZE)
    }
}

impl BarcodeEncoder for QrEncoder {
    fn encode(&self, text: &str) -> Result<Vec<u8>, BarcodeError> {
        let code = QrCode::with_error_correction_level(text.as_bytes(), EcLevel::H)
            .map_err(|e| BarcodeError::Encode(format!("{e}")))?;
        let image = code
            .render::<Luma<u8>>()
            .min_dimensions(self.size, self.size)
            .build();

        let mut png = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| BarcodeError::Image(format!("{e}")))?;
        Ok(png)
    }
}
