//! Modal editing overlays and their placement heuristics.
//!
//! Each overlay only records whether it is open, what it was prefilled with
//! and which element (if any) its confirmation will update. The controller
//! owns the transitions.

use serde::{Deserialize, Serialize};

use crate::{clamp_opacity, CanvasSize, ElementId};

/// Smallest width a text box is given.
pub const MIN_TEXT_WIDTH: f32 = 50.0;

/// Share of the canvas width an edited text box may span.
pub const EDIT_TEXT_MAX_WIDTH_RATIO: f32 = 0.9;

/// Share of the canvas width a new text box may span.
pub const NEW_TEXT_MAX_WIDTH_RATIO: f32 = 0.8;

/// Share of each canvas dimension a placed image may span.
pub const IMAGE_MAX_CANVAS_RATIO: f32 = 0.8;

/// What an overlay's confirmation applies to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "target", content = "id", rename_all = "lowercase")]
pub enum EditTarget {
    /// Confirmation creates a new element.
    #[default]
    New,
    /// Confirmation updates this element.
    Existing(ElementId),
}

impl EditTarget {
    /// The targeted element, if any.
    #[must_use]
    pub const fn id(self) -> Option<ElementId> {
        match self {
            Self::New => None,
            Self::Existing(id) => Some(id),
        }
    }
}

impl From<Option<ElementId>> for EditTarget {
    fn from(id: Option<ElementId>) -> Self {
        id.map_or(Self::New, Self::Existing)
    }
}

/// Text entry overlay.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextOverlay {
    /// Whether the overlay is shown.
    pub active: bool,
    /// Text the input starts with.
    pub initial_text: String,
    /// Element updated on confirm.
    pub target: EditTarget,
}

impl TextOverlay {
    /// Show the overlay.
    pub fn open(&mut self, initial_text: impl Into<String>, target: EditTarget) {
        self.active = true;
        self.initial_text = initial_text.into();
        self.target = target;
    }

    /// Hide the overlay and hand back the target it was opened for.
    pub fn close(&mut self) -> EditTarget {
        self.active = false;
        std::mem::take(&mut self.target)
    }
}

/// Image cropping overlay.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageCropper {
    /// Whether the cropper is shown.
    pub active: bool,
    /// Raw image waiting to be cropped.
    pub pending_src: Option<String>,
    /// Element updated once the cropped image is placed.
    pub target: EditTarget,
    /// Bumped on every `open`; tags the effects of each crop session.
    pub session: u64,
}

impl ImageCropper {
    /// Show the cropper for `src`, starting a new session.
    pub fn open(&mut self, src: impl Into<String>, target: EditTarget) {
        self.active = true;
        self.pending_src = Some(src.into());
        self.target = target;
        self.session = self.session.wrapping_add(1);
    }

    /// Hide the cropper and drop the pending image. The target is kept.
    pub fn dismiss(&mut self) {
        self.active = false;
        self.pending_src = None;
    }

    /// Clear the target if no session was opened since `session`.
    ///
    /// Returns `true` if it was cleared. A later crop session, even one on
    /// the same element, is left alone.
    pub fn release(&mut self, session: u64) -> bool {
        if self.session == session {
            self.target = EditTarget::New;
            true
        } else {
            false
        }
    }

    /// Hide the cropper and forget everything but the session counter.
    pub fn reset(&mut self) {
        *self = Self {
            session: self.session,
            ..Self::default()
        };
    }
}

/// Opacity slider panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpacityPanel {
    /// Whether the panel is shown.
    pub open: bool,
}

/// Width and height of an element box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxSize {
    /// Width in canvas pixels.
    pub width: f32,
    /// Height in canvas pixels.
    pub height: f32,
}

/// Pixel dimensions reported by an image probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Approximate the box needed to show `text` at `font_size`.
///
/// Characters are taken as `0.6 * font_size` wide, lines as `1.4 * font_size`
/// tall. Line length is counted in UTF-16 units, so astral characters such as
/// emoji count twice. The width is clamped to `[MIN_TEXT_WIDTH, max_width]`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn text_box(text: &str, font_size: f32, max_width: f32) -> BoxSize {
    let char_width = font_size * 0.6;
    let lines: Vec<&str> = text.split('\n').collect();
    let longest = lines
        .iter()
        .map(|line| line.encode_utf16().count())
        .max()
        .unwrap_or(0);

    let width = (longest as f32 * char_width + font_size * 2.0)
        .min(max_width)
        .max(MIN_TEXT_WIDTH);
    let height =
        (font_size * 1.5).max(lines.len() as f32 * (font_size * 1.4) + font_size * 0.5);
    BoxSize { width, height }
}

/// Fit an image into a `size` square preserving its aspect ratio, then keep
/// it within 80% of each canvas dimension.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn image_box(dimensions: ImageDimensions, size: f32, canvas: CanvasSize) -> BoxSize {
    let aspect = dimensions.width as f32 / dimensions.height as f32;
    let (width, height) = if dimensions.width > dimensions.height {
        (size * aspect, size)
    } else {
        (size, size / aspect)
    };
    BoxSize {
        width: width.min(canvas.width() * IMAGE_MAX_CANVAS_RATIO),
        height: height.min(canvas.height() * IMAGE_MAX_CANVAS_RATIO),
    }
}

/// Clamp to `[0, 1]` and round to two decimal places.
#[must_use]
pub fn round_opacity(value: f32) -> f32 {
    (clamp_opacity(value) * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_text_box_single_line() {
        let size = text_box("Hi", 24.0, 1080.0 * NEW_TEXT_MAX_WIDTH_RATIO);
        assert!(approx(size.width, 76.8), "width was {}", size.width);
        assert!(approx(size.height, 45.6), "height was {}", size.height);
    }

    #[test]
    fn test_text_box_multiline_uses_longest_line() {
        let size = text_box("a\nabcdefghij\nabc", 10.0, 1000.0);
        // 10 chars * 6 + 20
        assert!(approx(size.width, 80.0));
        // 3 lines * 14 + 5
        assert!(approx(size.height, 47.0));
    }

    #[test]
    fn test_text_box_bounds() {
        assert!(approx(text_box("", 24.0, 864.0).width, MIN_TEXT_WIDTH));
        let long = "x".repeat(500);
        assert!(approx(text_box(&long, 24.0, 864.0).width, 864.0));
        assert!(approx(text_box("", 24.0, 864.0).height, 45.6));
    }

    #[test]
    fn test_image_box_landscape() {
        let size = image_box(
            ImageDimensions {
                width: 200,
                height: 100,
            },
            150.0,
            CanvasSize::default(),
        );
        assert!(approx(size.width, 300.0));
        assert!(approx(size.height, 150.0));
    }

    #[test]
    fn test_image_box_portrait() {
        let size = image_box(
            ImageDimensions {
                width: 100,
                height: 200,
            },
            150.0,
            CanvasSize::default(),
        );
        assert!(approx(size.width, 150.0));
        assert!(approx(size.height, 300.0));
    }

    #[test]
    fn test_image_box_clamped_to_canvas() {
        let canvas = CanvasSize::new(200.0, 100.0).expect("valid size");
        let size = image_box(
            ImageDimensions {
                width: 1000,
                height: 100,
            },
            150.0,
            canvas,
        );
        assert!(approx(size.width, 160.0));
        assert!(approx(size.height, 80.0));
    }

    #[test]
    fn test_round_opacity() {
        assert!(approx(round_opacity(0.456), 0.46));
        assert!(approx(round_opacity(1.4), 1.0));
        assert!(approx(round_opacity(-0.2), 0.0));
    }

    #[test]
    fn test_cropper_release_only_current_session() {
        let id = ElementId::new();
        let mut cropper = ImageCropper::default();
        cropper.open("data:,", EditTarget::Existing(id));
        let first = cropper.session;
        cropper.dismiss();

        // Same element, newer session.
        cropper.open("data:,", EditTarget::Existing(id));
        assert!(!cropper.release(first));
        assert_eq!(cropper.target, EditTarget::Existing(id));

        let second = cropper.session;
        cropper.dismiss();
        assert!(cropper.release(second));
        assert_eq!(cropper.target, EditTarget::New);
    }

    #[test]
    fn test_cropper_reset_keeps_session_counter() {
        let mut cropper = ImageCropper::default();
        cropper.open("data:,", EditTarget::New);
        let session = cropper.session;
        cropper.reset();
        assert!(!cropper.active);
        assert_eq!(cropper.session, session);
        cropper.open("data:,", EditTarget::New);
        assert_ne!(cropper.session, session);
    }

    #[test]
    fn test_text_box_counts_utf16_units() {
        // One astral character is two UTF-16 units.
        let size = text_box("\u{1F600}\u{1F600}", 100.0, 1000.0);
        assert!(approx(size.width, 4.0 * 60.0 + 200.0), "width was {}", size.width);
    }
}
