//! Canvas elements - the building blocks of a design.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stroke colour given to shapes created without a visible stroke.
pub const TRANSPARENT: &str = "transparent";

/// Unique identifier for an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(Uuid);

impl ElementId {
    /// Create a new unique element ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A point in canvas coordinates (origin top-left, canvas pixels).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position.
    pub x: f32,
    /// Vertical position.
    pub y: f32,
}

impl Point {
    /// Create a point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Tag identifying an element kind without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ElementType {
    /// Text block.
    Text,
    /// Rectangle, optionally rounded.
    Rectangle,
    /// Circle (ellipse inscribed in the box).
    Circle,
    /// Raster image.
    Image,
}

/// Text weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    /// Regular weight.
    #[default]
    Normal,
    /// Bold weight.
    Bold,
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Flush left.
    #[default]
    Left,
    /// Centered.
    Center,
    /// Flush right.
    Right,
}

/// Kind-specific content of an element.
///
/// Optional fields are filled with their baseline by the store on creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE", rename_all_fields = "camelCase")]
pub enum ElementKind {
    /// A text block; `text` may contain newlines.
    Text {
        /// Text content.
        text: String,
        /// Font size in canvas pixels.
        font_size: f32,
        /// Font family name.
        font_family: String,
        /// Text colour as hex.
        color: String,
        /// Optional weight.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        font_weight: Option<FontWeight>,
        /// Optional alignment.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text_align: Option<TextAlign>,
    },

    /// A filled rectangle.
    Rectangle {
        /// Fill colour.
        background_color: String,
        /// Stroke colour.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stroke_color: Option<String>,
        /// Stroke width in canvas pixels.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stroke_width: Option<f32>,
        /// Corner radius in canvas pixels.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        corner_radius: Option<f32>,
    },

    /// A filled circle.
    Circle {
        /// Fill colour.
        background_color: String,
        /// Stroke colour.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stroke_color: Option<String>,
        /// Stroke width in canvas pixels.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stroke_width: Option<f32>,
    },

    /// An image.
    Image {
        /// Opaque image reference, usually a data URI.
        src: String,
        /// Alternative text.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alt: Option<String>,
    },
}

impl ElementKind {
    /// The tag of this kind.
    #[must_use]
    pub const fn element_type(&self) -> ElementType {
        match self {
            Self::Text { .. } => ElementType::Text,
            Self::Rectangle { .. } => ElementType::Rectangle,
            Self::Circle { .. } => ElementType::Circle,
            Self::Image { .. } => ElementType::Image,
        }
    }

    /// Fill in the shape defaults applied at creation.
    ///
    /// A rectangle without a positive corner radius gets 0. A rectangle or circle
    /// whose stroke width is unset or not positive gets a zero-width transparent stroke.
    pub(crate) fn apply_creation_defaults(&mut self) {
        match self {
            Self::Rectangle {
                stroke_color,
                stroke_width,
                corner_radius,
                ..
            } => {
                if corner_radius.is_none_or(|r| r <= 0.0) {
                    *corner_radius = Some(0.0);
                }
                default_stroke(stroke_color, stroke_width);
            }
            Self::Circle {
                stroke_color,
                stroke_width,
                ..
            } => default_stroke(stroke_color, stroke_width),
            Self::Text { .. } | Self::Image { .. } => {}
        }
    }
}

fn default_stroke(color: &mut Option<String>, width: &mut Option<f32>) {
    if width.is_none_or(|w| w <= 0.0) {
        *width = Some(0.0);
        *color = Some(TRANSPARENT.to_string());
    }
}

/// Clamp an opacity value into `[0, 1]`. `NaN` becomes fully opaque.
#[must_use]
pub fn clamp_opacity(value: f32) -> f32 {
    if value.is_nan() {
        1.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// A design element: shared base fields plus kind-specific content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    /// Unique identifier, immutable after creation.
    pub id: ElementId,
    /// Left edge in canvas coordinates.
    pub x: f32,
    /// Top edge in canvas coordinates.
    pub y: f32,
    /// Width in canvas pixels.
    pub width: f32,
    /// Height in canvas pixels.
    pub height: f32,
    /// Rotation in degrees.
    pub rotation: f32,
    /// Whether the element is drawn.
    pub is_visible: bool,
    /// Locked elements cannot be selected.
    pub is_locked: bool,
    /// Opacity in `[0, 1]`.
    pub opacity: f32,
    /// Kind-specific content.
    #[serde(flatten)]
    pub kind: ElementKind,
}

impl Element {
    /// The kind tag of this element.
    #[must_use]
    pub const fn element_type(&self) -> ElementType {
        self.kind.element_type()
    }

    /// Center of the element's box.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Check if a point (in canvas coordinates) is within this element.
    #[must_use]
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }

    /// Text content, if this is a text element.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            ElementKind::Text { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Image reference, if this is an image element.
    #[must_use]
    pub fn image_src(&self) -> Option<&str> {
        match &self.kind {
            ElementKind::Image { src, .. } => Some(src),
            _ => None,
        }
    }

    /// Merge a partial update. Fields that do not belong to this kind are ignored.
    pub fn apply(&mut self, patch: &ElementPatch) {
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(width) = patch.width {
            self.width = width.max(0.0);
        }
        if let Some(height) = patch.height {
            self.height = height.max(0.0);
        }
        if let Some(rotation) = patch.rotation {
            self.rotation = rotation;
        }
        if let Some(visible) = patch.is_visible {
            self.is_visible = visible;
        }
        if let Some(locked) = patch.is_locked {
            self.is_locked = locked;
        }
        if let Some(opacity) = patch.opacity {
            self.opacity = clamp_opacity(opacity);
        }

        match &mut self.kind {
            ElementKind::Text {
                text,
                font_size,
                font_family,
                color,
                font_weight,
                text_align,
            } => {
                set(text, &patch.text);
                if let Some(size) = patch.font_size.filter(|s| *s > 0.0) {
                    *font_size = size;
                }
                set(font_family, &patch.font_family);
                set(color, &patch.color);
                if patch.font_weight.is_some() {
                    *font_weight = patch.font_weight;
                }
                if patch.text_align.is_some() {
                    *text_align = patch.text_align;
                }
            }
            ElementKind::Rectangle {
                background_color,
                stroke_color,
                stroke_width,
                corner_radius,
            } => {
                set(background_color, &patch.background_color);
                set_opt(stroke_color, &patch.stroke_color);
                if patch.stroke_width.is_some() {
                    *stroke_width = patch.stroke_width;
                }
                if patch.corner_radius.is_some() {
                    *corner_radius = patch.corner_radius;
                }
            }
            ElementKind::Circle {
                background_color,
                stroke_color,
                stroke_width,
            } => {
                set(background_color, &patch.background_color);
                set_opt(stroke_color, &patch.stroke_color);
                if patch.stroke_width.is_some() {
                    *stroke_width = patch.stroke_width;
                }
            }
            ElementKind::Image { src, alt } => {
                set(src, &patch.src);
                set_opt(alt, &patch.alt);
            }
        }
    }
}

fn set(field: &mut String, value: &Option<String>) {
    if let Some(v) = value {
        field.clone_from(v);
    }
}

fn set_opt(field: &mut Option<String>, value: &Option<String>) {
    if value.is_some() {
        field.clone_from(value);
    }
}

/// Element data without an identity, as handed to the store for creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementDraft {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
    /// Rotation in degrees (default 0).
    #[serde(default)]
    pub rotation: Option<f32>,
    /// Visibility (default visible).
    #[serde(default)]
    pub is_visible: Option<bool>,
    /// Lock state (default unlocked).
    #[serde(default)]
    pub is_locked: Option<bool>,
    /// Opacity (default 1).
    #[serde(default)]
    pub opacity: Option<f32>,
    /// Kind-specific content.
    #[serde(flatten)]
    pub kind: ElementKind,
}

impl ElementDraft {
    /// A draft with the given box and content, all base flags at baseline.
    #[must_use]
    pub fn new(kind: ElementKind, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            rotation: None,
            is_visible: None,
            is_locked: None,
            opacity: None,
            kind,
        }
    }

    /// A draft whose box of the given size is centered on `center`.
    #[must_use]
    pub fn centered(kind: ElementKind, center: Point, width: f32, height: f32) -> Self {
        Self::new(
            kind,
            center.x - width / 2.0,
            center.y - height / 2.0,
            width,
            height,
        )
    }

    /// Set the opacity.
    #[must_use]
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = Some(opacity);
        self
    }

    /// Set the rotation.
    #[must_use]
    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation = Some(degrees);
        self
    }

    /// Set the lock state.
    #[must_use]
    pub fn with_locked(mut self, locked: bool) -> Self {
        self.is_locked = Some(locked);
        self
    }

    /// Resolve into a full element with baseline defaults and the given id.
    pub(crate) fn into_element(self, id: ElementId) -> Element {
        let mut kind = self.kind;
        kind.apply_creation_defaults();
        Element {
            id,
            x: self.x,
            y: self.y,
            width: self.width.max(0.0),
            height: self.height.max(0.0),
            rotation: self.rotation.unwrap_or(0.0),
            is_visible: self.is_visible.unwrap_or(true),
            is_locked: self.is_locked.unwrap_or(false),
            opacity: clamp_opacity(self.opacity.unwrap_or(1.0)),
            kind,
        }
    }
}

/// A partial update addressed to one element.
///
/// Never carries an id or a kind: neither can change after creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct ElementPatch {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub rotation: Option<f32>,
    pub is_visible: Option<bool>,
    pub is_locked: Option<bool>,
    pub opacity: Option<f32>,
    pub text: Option<String>,
    pub font_size: Option<f32>,
    pub font_family: Option<String>,
    pub color: Option<String>,
    pub font_weight: Option<FontWeight>,
    pub text_align: Option<TextAlign>,
    pub background_color: Option<String>,
    pub stroke_color: Option<String>,
    pub stroke_width: Option<f32>,
    pub corner_radius: Option<f32>,
    pub src: Option<String>,
    pub alt: Option<String>,
}

impl ElementPatch {
    /// Move to a new top-left position (drag gesture).
    #[must_use]
    pub fn position(x: f32, y: f32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    /// Resize the box.
    #[must_use]
    pub fn size(width: f32, height: f32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    /// Change opacity.
    #[must_use]
    pub fn opacity(opacity: f32) -> Self {
        Self {
            opacity: Some(opacity),
            ..Self::default()
        }
    }

    /// Replace text content together with its box.
    #[must_use]
    pub fn text_content(text: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::size(width, height)
        }
    }

    /// Replace an image reference together with its box.
    #[must_use]
    pub fn image_source(src: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            src: Some(src.into()),
            ..Self::size(width, height)
        }
    }
}
