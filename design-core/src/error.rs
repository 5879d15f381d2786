//! Error types for design surface operations.
//!
//! The controller itself never fails: invalid inputs degrade to no-ops.
//! These errors surface only at the edges (configuration, image probing,
//! file acquisition).

use thiserror::Error;

/// Result type for design surface operations.
pub type DesignResult<T> = Result<T, DesignError>;

/// Errors that can occur at the edges of the design surface.
#[derive(Debug, Error)]
pub enum DesignError {
    /// Canvas dimensions must be positive and finite.
    #[error("Invalid canvas size: {width}x{height}")]
    InvalidCanvasSize {
        /// Requested width.
        width: f32,
        /// Requested height.
        height: f32,
    },

    /// The image reference is not a usable data URI.
    #[error("Invalid data URI: {0}")]
    InvalidDataUri(String),

    /// Image bytes could not be decoded.
    #[error("Failed to decode image: {0}")]
    ImageDecode(String),

    /// I/O failure while reading an image or configuration file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration or snapshot serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration values are inconsistent.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Failure of an asynchronous image dimension probe.
///
/// Carried inside completion messages, so it is `Clone` and holds only text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// The reference could not be turned into image bytes.
    #[error("Unreadable image reference: {0}")]
    Unreadable(String),

    /// The bytes were read but no image header could be parsed.
    #[error("Image failed to load: {0}")]
    Decode(String),

    /// The probe reported a zero-sized image.
    #[error("Image has no pixels")]
    Empty,
}

impl From<DesignError> for ProbeError {
    fn from(err: DesignError) -> Self {
        match err {
            DesignError::ImageDecode(msg) => Self::Decode(msg),
            other => Self::Unreadable(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_error_from_decode() {
        let err: ProbeError = DesignError::ImageDecode("bad header".into()).into();
        assert_eq!(err, ProbeError::Decode("bad header".into()));
    }

    #[test]
    fn test_probe_error_from_data_uri() {
        let err: ProbeError = DesignError::InvalidDataUri("missing comma".into()).into();
        assert!(matches!(err, ProbeError::Unreadable(msg) if msg.contains("missing comma")));
    }
}
