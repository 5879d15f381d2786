//! Tool vocabulary and its dispatch classification.

use serde::{Deserialize, Serialize};

use crate::ElementType;

/// Every tool the editor knows about.
///
/// Some are declared without behavior (delete, several text/image/shape
/// effects); requesting them simply makes them the active tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[allow(missing_docs)]
pub enum Tool {
    /// Generic select/move tool.
    #[default]
    Select,

    // Creation and global actions
    AddText,
    AddImage,
    AddShape,
    Effects,
    Stickers,

    // Text
    EditTextContent,
    EditFontFamily,
    EditFontSize,
    EditTextColor,
    EditTextAlignment,
    EditTextStroke,
    EditTextBackground,
    EditTextShadow,
    EditTextCurvature,
    EditTextSpacing,

    // Image
    EditImageCrop,
    EditImageFilters,
    EditImageAdjustments,
    EditImageEraseRestore,
    EditImageEffects,
    EditImageDistortion,
    EditImageStroke,
    EditImageShadow,

    // Shape
    EditShapeType,
    EditShapeFillColor,
    EditShapeStrokeColor,
    EditShapeStrokeWidth,
    EditShapeCornerRadius,
    EditShapeEraseRestore,
    EditShapeDistortion,
    EditShapeShadow,

    // Common
    EditOpacity,
    DeleteElement,
}

/// What a creation tool makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Creation {
    /// Opens the text overlay for a new text element.
    Text,
    /// Requests an image file, then opens the cropper.
    Image,
    /// Places a default rectangle at the viewport center.
    Shape,
    /// Global action without an editor of its own yet.
    Global,
}

/// Overlay opened on the selected element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementOverlay {
    /// Text overlay prefilled with the element's text.
    TextContent,
    /// Cropper prefilled with the element's image.
    ImageCrop,
}

impl ElementOverlay {
    /// Kind the selected element must have.
    #[must_use]
    pub const fn target_type(self) -> ElementType {
        match self {
            Self::TextContent => ElementType::Text,
            Self::ImageCrop => ElementType::Image,
        }
    }
}

/// How the state machine treats a requested tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolGroup {
    /// Clears selection and creates something (or runs a global stub).
    Creation(Creation),
    /// Opens/closes the opacity panel.
    OpacityToggle,
    /// Opens an overlay targeting the selected element of a matching kind.
    ElementOverlay(ElementOverlay),
    /// Placeholder editing tool, active only with a selection.
    Cosmetic,
    /// Becomes the active tool verbatim.
    PassThrough,
}

impl Tool {
    /// Classify this tool for dispatch.
    #[must_use]
    pub const fn group(self) -> ToolGroup {
        match self {
            Self::AddText => ToolGroup::Creation(Creation::Text),
            Self::AddImage => ToolGroup::Creation(Creation::Image),
            Self::AddShape => ToolGroup::Creation(Creation::Shape),
            Self::Effects | Self::Stickers => ToolGroup::Creation(Creation::Global),
            Self::EditOpacity => ToolGroup::OpacityToggle,
            Self::EditTextContent => ToolGroup::ElementOverlay(ElementOverlay::TextContent),
            Self::EditImageCrop => ToolGroup::ElementOverlay(ElementOverlay::ImageCrop),
            Self::EditFontFamily
            | Self::EditTextColor
            | Self::EditTextAlignment
            | Self::EditImageFilters
            | Self::EditImageAdjustments
            | Self::EditShapeFillColor
            | Self::EditShapeStrokeColor
            | Self::EditShapeStrokeWidth
            | Self::EditShapeCornerRadius => ToolGroup::Cosmetic,
            Self::Select
            | Self::EditFontSize
            | Self::EditTextStroke
            | Self::EditTextBackground
            | Self::EditTextShadow
            | Self::EditTextCurvature
            | Self::EditTextSpacing
            | Self::EditImageEraseRestore
            | Self::EditImageEffects
            | Self::EditImageDistortion
            | Self::EditImageStroke
            | Self::EditImageShadow
            | Self::EditShapeType
            | Self::EditShapeEraseRestore
            | Self::EditShapeDistortion
            | Self::EditShapeShadow
            | Self::DeleteElement => ToolGroup::PassThrough,
        }
    }

    /// Stable identifier, as used in serialized state.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::AddText => "ADD_TEXT",
            Self::AddImage => "ADD_IMAGE",
            Self::AddShape => "ADD_SHAPE",
            Self::Effects => "EFFECTS",
            Self::Stickers => "STICKERS",
            Self::EditTextContent => "EDIT_TEXT_CONTENT",
            Self::EditFontFamily => "EDIT_FONT_FAMILY",
            Self::EditFontSize => "EDIT_FONT_SIZE",
            Self::EditTextColor => "EDIT_TEXT_COLOR",
            Self::EditTextAlignment => "EDIT_TEXT_ALIGNMENT",
            Self::EditTextStroke => "EDIT_TEXT_STROKE",
            Self::EditTextBackground => "EDIT_TEXT_BACKGROUND",
            Self::EditTextShadow => "EDIT_TEXT_SHADOW",
            Self::EditTextCurvature => "EDIT_TEXT_CURVATURE",
            Self::EditTextSpacing => "EDIT_TEXT_SPACING",
            Self::EditImageCrop => "EDIT_IMAGE_CROP",
            Self::EditImageFilters => "EDIT_IMAGE_FILTERS",
            Self::EditImageAdjustments => "EDIT_IMAGE_ADJUSTMENTS",
            Self::EditImageEraseRestore => "EDIT_IMAGE_ERASE_RESTORE",
            Self::EditImageEffects => "EDIT_IMAGE_EFFECTS",
            Self::EditImageDistortion => "EDIT_IMAGE_DISTORTION",
            Self::EditImageStroke => "EDIT_IMAGE_STROKE",
            Self::EditImageShadow => "EDIT_IMAGE_SHADOW",
            Self::EditShapeType => "EDIT_SHAPE_TYPE",
            Self::EditShapeFillColor => "EDIT_SHAPE_FILL_COLOR",
            Self::EditShapeStrokeColor => "EDIT_SHAPE_STROKE_COLOR",
            Self::EditShapeStrokeWidth => "EDIT_SHAPE_STROKE_WIDTH",
            Self::EditShapeCornerRadius => "EDIT_SHAPE_CORNER_RADIUS",
            Self::EditShapeEraseRestore => "EDIT_SHAPE_ERASE_RESTORE",
            Self::EditShapeDistortion => "EDIT_SHAPE_DISTORTION",
            Self::EditShapeShadow => "EDIT_SHAPE_SHADOW",
            Self::EditOpacity => "EDIT_OPACITY",
            Self::DeleteElement => "DELETE_ELEMENT",
        }
    }
}

impl std::fmt::Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
