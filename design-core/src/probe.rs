//! Image acquisition and dimension probing.
//!
//! Both are asynchronous capabilities of the host: the controller only asks
//! for them through [`Effect`](crate::Effect)s and the
//! [`EditorRuntime`](crate::EditorRuntime) drives them.

use std::io::Cursor;
use std::path::PathBuf;

use async_trait::async_trait;
use base64::Engine;

use crate::{DesignError, DesignResult, ImageDimensions, ProbeError};

/// Supplies a raw image reference chosen by the user.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Wait for the user's choice. `None` means they aborted.
    async fn acquire(&self) -> Option<String>;
}

/// Reports the pixel size of an image reference.
#[async_trait]
pub trait ImageProbe: Send + Sync {
    /// Probe `src`.
    async fn dimensions(&self, src: &str) -> Result<ImageDimensions, ProbeError>;
}

/// An image source where the user always aborts.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImageSource;

#[async_trait]
impl ImageSource for NoImageSource {
    async fn acquire(&self) -> Option<String> {
        None
    }
}

/// Reads a fixed image file and hands it over as a base64 data URI.
#[derive(Debug, Clone)]
pub struct FileImageSource {
    path: PathBuf,
}

impl FileImageSource {
    /// Source answering every request with the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ImageSource for FileImageSource {
    async fn acquire(&self) -> Option<String> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Some(encode_data_uri(&bytes)),
            Err(e) => {
                tracing::warn!("Failed to read image {}: {e}", self.path.display());
                None
            }
        }
    }
}

/// Probes `data:` URIs by decoding only the image header.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataUriProbe;

#[async_trait]
impl ImageProbe for DataUriProbe {
    async fn dimensions(&self, src: &str) -> Result<ImageDimensions, ProbeError> {
        let bytes = decode_data_uri(src)?;
        let dimensions = image_dimensions(&bytes)?;
        if dimensions.width == 0 || dimensions.height == 0 {
            return Err(ProbeError::Empty);
        }
        Ok(dimensions)
    }
}

/// Encode image bytes as a base64 data URI, guessing the MIME type.
#[must_use]
pub fn encode_data_uri(bytes: &[u8]) -> String {
    let mime = image::guess_format(bytes)
        .map(|format| format.to_mime_type())
        .unwrap_or("application/octet-stream");
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{mime};base64,{encoded}")
}

/// Decode the payload of a data URI.
///
/// Supports `data:image/png;base64,...` as well as percent-encoded payloads.
///
/// # Errors
///
/// Returns [`DesignError::InvalidDataUri`] if the URI is malformed.
pub fn decode_data_uri(uri: &str) -> DesignResult<Vec<u8>> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| DesignError::InvalidDataUri("not a data URI".to_string()))?;
    let (metadata, payload) = rest
        .split_once(',')
        .ok_or_else(|| DesignError::InvalidDataUri("missing comma".to_string()))?;

    if metadata.contains(";base64") {
        base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| DesignError::InvalidDataUri(format!("bad base64: {e}")))
    } else {
        percent_decode(payload)
    }
}

fn percent_decode(input: &str) -> DesignResult<Vec<u8>> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let byte = input
                .get(i + 1..i + 3)
                .and_then(|hex| u8::from_str_radix(hex, 16).ok())
                .ok_or_else(|| DesignError::InvalidDataUri("bad percent-encoding".to_string()))?;
            out.push(byte);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    Ok(out)
}

/// Read the pixel size from an encoded image's header.
///
/// # Errors
///
/// Returns [`DesignError::ImageDecode`] if the format is unknown or the
/// header is corrupt.
pub fn image_dimensions(bytes: &[u8]) -> DesignResult<ImageDimensions> {
    let reader = image::ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| DesignError::ImageDecode(e.to_string()))?;
    Ok(ImageDimensions { width, height })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::new(width, height);
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png)
            .expect("should encode png");
        out.into_inner()
    }

    #[test]
    fn test_encode_decode_data_uri() {
        let bytes = png_bytes(3, 2);
        let uri = encode_data_uri(&bytes);
        assert!(uri.starts_with("data:image/png;base64,"));
        assert_eq!(decode_data_uri(&uri).expect("should decode"), bytes);
    }

    #[test]
    fn test_percent_encoded_payload() {
        let decoded = decode_data_uri("data:text/plain,a%20b").expect("should decode");
        assert_eq!(decoded, b"a b");
        assert!(decode_data_uri("data:text/plain,%zz").is_err());
    }

    #[test]
    fn test_rejects_non_data_uri() {
        assert!(matches!(
            decode_data_uri("https://example.com/a.png"),
            Err(DesignError::InvalidDataUri(_))
        ));
        assert!(decode_data_uri("data:image/png;base64").is_err());
    }

    #[test]
    fn test_image_dimensions_from_header() {
        let dims = image_dimensions(&png_bytes(200, 100)).expect("should probe");
        assert_eq!(
            dims,
            ImageDimensions {
                width: 200,
                height: 100
            }
        );
    }

    #[tokio::test]
    async fn test_data_uri_probe() {
        let uri = encode_data_uri(&png_bytes(40, 80));
        let dims = DataUriProbe.dimensions(&uri).await.expect("should probe");
        assert_eq!((dims.width, dims.height), (40, 80));
    }

    #[tokio::test]
    async fn test_data_uri_probe_garbage() {
        let result = DataUriProbe.dimensions("data:image/png;base64,AAAA").await;
        assert!(matches!(result, Err(ProbeError::Decode(_))));
    }

    #[tokio::test]
    async fn test_file_image_source() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("photo.png");
        std::fs::write(&path, png_bytes(5, 5)).expect("write");

        let src = FileImageSource::new(&path).acquire().await.expect("should read");
        assert!(src.starts_with("data:image/png;base64,"));

        let missing = FileImageSource::new(dir.path().join("missing.png"));
        assert!(missing.acquire().await.is_none());
        assert!(NoImageSource.acquire().await.is_none());
    }
}
