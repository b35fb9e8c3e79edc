//! Decoded images handed to the model's image channel.
use std::fs;
use std::io::{Cursor, ErrorKind};
use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::ImageFormat;

use crate::core::error::InputError;

/// An image that was successfully decoded and is ready to be sent
/// inline. Formats the model doesn't accept inline are re-encoded as
/// PNG.
#[derive(Debug, Clone)]
pub struct ImageHandle {
    mime_type: String,
    bytes: Vec<u8>,
    width: u32,
    height: u32,
}

impl ImageHandle {
    pub fn open(path: &Path) -> Result<Self, InputError> {
        let bytes = fs::read(path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => InputError::FileNotFound(path.to_path_buf()),
            _ => InputError::ReadFile {
                path: path.to_path_buf(),
                reason: err.to_string(),
            },
        })?;
        Self::decode(path, bytes)
    }

    fn decode(path: &Path, bytes: Vec<u8>) -> Result<Self, InputError> {
        let decode_error = |reason: String| InputError::ImageDecode {
            path: path.to_path_buf(),
            reason,
        };

        let format = image::guess_format(&bytes).map_err(|err| decode_error(err.to_string()))?;
        let decoded = image::load_from_memory_with_format(&bytes, format)
            .map_err(|err| decode_error(err.to_string()))?;
        let (width, height) = (decoded.width(), decoded.height());

        match format {
            ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::WebP => Ok(Self {
                mime_type: format.to_mime_type().to_string(),
                bytes,
                width,
                height,
            }),
            other => {
                tracing::debug!("Re-encoding {:?} image {} as PNG", other, path.display());
                let mut png = Vec::new();
                decoded
                    .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
                    .map_err(|err| decode_error(err.to_string()))?;
                Ok(Self {
                    mime_type: ImageFormat::Png.to_mime_type().to_string(),
                    bytes: png,
                    width,
                    height,
                })
            }
        }
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.bytes)
    }
}
