use std::io::Cursor;

use base64::{Engine as _, engine::general_purpose};
use image::{DynamicImage, ImageFormat};

use crate::domain::common::entities::app_errors::CoreError;

/// A decoded photograph of an ingredient label.
///
/// Only decodability is checked; dimensions are left untouched.
#[derive(Debug, Clone)]
pub struct LabelImage {
    image: DynamicImage,
}

impl LabelImage {
    /// Decodes PNG or JPEG bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, CoreError> {
        let format = image::guess_format(bytes)
            .map_err(|e| CoreError::InvalidImage(format!("unrecognized image data: {}", e)))?;

        if !matches!(format, ImageFormat::Png | ImageFormat::Jpeg) {
            return Err(CoreError::InvalidImage(format!(
                "unsupported image format {:?}, expected PNG or JPEG",
                format
            )));
        }

        let image = image::load_from_memory_with_format(bytes, format)
            .map_err(|e| CoreError::InvalidImage(format!("failed to decode image: {}", e)))?;

        Ok(Self { image })
    }

    #[cfg(test)]
    pub(crate) fn from_image(image: DynamicImage) -> Self {
        Self { image }
    }

    /// Re-encodes the decoded pixels as PNG for transport.
    pub fn encode_png(&self) -> Result<Vec<u8>, CoreError> {
        let mut buffer = Cursor::new(Vec::new());
        self.image
            .write_to(&mut buffer, ImageFormat::Png)
            .map_err(|e| CoreError::ExtractionError(format!("failed to encode image: {}", e)))?;

        Ok(buffer.into_inner())
    }

    pub fn to_base64_png(&self) -> Result<String, CoreError> {
        Ok(general_purpose::STANDARD.encode(self.encode_png()?))
    }

    pub fn to_data_url(&self) -> Result<String, CoreError> {
        Ok(format!("data:image/png;base64,{}", self.to_base64_png()?))
    }
}
