//! Editor configuration: canvas geometry and creation defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{DesignError, DesignResult, Point};

/// Default artboard width in canvas pixels.
pub const DEFAULT_CANVAS_WIDTH: f32 = 1080.0;

/// Default artboard height in canvas pixels.
pub const DEFAULT_CANVAS_HEIGHT: f32 = 1080.0;

/// Font size of newly created text.
pub const DEFAULT_TEXT_FONT_SIZE: f32 = 24.0;

/// Side of the square new images are fitted into.
pub const DEFAULT_IMAGE_SIZE: f32 = 150.0;

/// Side of the square created by the add-shape tool.
pub const DEFAULT_SHAPE_SIZE: f32 = 80.0;

/// Artboard dimensions. Always positive and finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCanvasSize")]
pub struct CanvasSize {
    width: f32,
    height: f32,
}

#[derive(Deserialize)]
struct RawCanvasSize {
    width: f32,
    height: f32,
}

impl TryFrom<RawCanvasSize> for CanvasSize {
    type Error = DesignError;

    fn try_from(raw: RawCanvasSize) -> DesignResult<Self> {
        Self::new(raw.width, raw.height)
    }
}

impl CanvasSize {
    /// Validate and build a canvas size.
    ///
    /// # Errors
    ///
    /// Returns [`DesignError::InvalidCanvasSize`] unless both dimensions are
    /// positive and finite.
    pub fn new(width: f32, height: f32) -> DesignResult<Self> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if valid(width) && valid(height) {
            Ok(Self { width, height })
        } else {
            Err(DesignError::InvalidCanvasSize { width, height })
        }
    }

    /// Width in canvas pixels.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Height in canvas pixels.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Geometric center, the fallback viewport center.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: DEFAULT_CANVAS_WIDTH,
            height: DEFAULT_CANVAS_HEIGHT,
        }
    }
}

/// Editor-wide defaults. Missing JSON fields take their default value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Canvas size offered by the project setup dialog.
    pub canvas: CanvasSize,
    /// Name offered by the project setup dialog.
    pub project_name: String,
    /// Font size of new text.
    pub text_font_size: f32,
    /// Font family of new text.
    pub text_font_family: String,
    /// Colour of new text.
    pub text_color: String,
    /// Prefill of the text overlay when adding text.
    pub text_placeholder: String,
    /// Side of the square new images are fitted into.
    pub image_size: f32,
    /// Alt text given to newly placed cropped images.
    pub image_alt: String,
    /// Side of the square created by the add-shape tool.
    pub shape_size: f32,
    /// Fill of shapes created by the add-shape tool.
    pub shape_fill: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasSize::default(),
            project_name: "Untitled design".to_string(),
            text_font_size: DEFAULT_TEXT_FONT_SIZE,
            text_font_family: "Arial".to_string(),
            text_color: "#333333".to_string(),
            text_placeholder: "Text".to_string(),
            image_size: DEFAULT_IMAGE_SIZE,
            image_alt: "Cropped image".to_string(),
            shape_size: DEFAULT_SHAPE_SIZE,
            shape_fill: "#3B82F6".to_string(),
        }
    }
}

impl EditorConfig {
    /// Parse a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a size is not positive.
    pub fn from_json(json: &str) -> DesignResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> DesignResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Check that the creation sizes are usable.
    ///
    /// # Errors
    ///
    /// Returns [`DesignError::Config`] naming the first non-positive size.
    pub fn validate(&self) -> DesignResult<()> {
        for (name, value) in [
            ("textFontSize", self.text_font_size),
            ("imageSize", self.image_size),
            ("shapeSize", self.shape_size),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(DesignError::Config(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_size_validation() {
        assert!(CanvasSize::new(1080.0, 1920.0).is_ok());
        assert!(CanvasSize::new(0.0, 100.0).is_err());
        assert!(CanvasSize::new(100.0, f32::NAN).is_err());
        assert!(CanvasSize::new(-5.0, 100.0).is_err());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = EditorConfig::from_json(r#"{"imageSize": 200, "canvas": {"width": 1080, "height": 1920}}"#)
            .expect("should parse");
        assert!((config.image_size - 200.0).abs() < f32::EPSILON);
        assert!((config.canvas.height() - 1920.0).abs() < f32::EPSILON);
        assert!((config.text_font_size - DEFAULT_TEXT_FONT_SIZE).abs() < f32::EPSILON);
        assert_eq!(config.shape_fill, "#3B82F6");
    }

    #[test]
    fn test_invalid_canvas_in_json() {
        let result = EditorConfig::from_json(r#"{"canvas": {"width": 0, "height": 10}}"#);
        assert!(matches!(result, Err(DesignError::Serialization(_))));
    }

    #[test]
    fn test_invalid_shape_size() {
        let result = EditorConfig::from_json(r#"{"shapeSize": -1}"#);
        assert!(matches!(result, Err(DesignError::Config(msg)) if msg.contains("shapeSize")));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("editor.json");
        std::fs::write(&path, r#"{"projectName": "Poster"}"#).expect("write");
        let config = EditorConfig::load(&path).expect("should load");
        assert_eq!(config.project_name, "Poster");
    }
}
