//! Contextual toolbar button sets.
//!
//! The presentation layer draws whichever set matches the current
//! selection; icons are its concern, not ours.

use serde::Serialize;

use crate::{Element, ElementType, Tool};

/// One toolbar button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToolbarButton {
    /// Tool requested when pressed.
    pub tool: Tool,
    /// Short label.
    pub label: &'static str,
}

const fn button(tool: Tool, label: &'static str) -> ToolbarButton {
    ToolbarButton { tool, label }
}

/// Buttons shown with nothing selected.
pub const DEFAULT_BUTTONS: &[ToolbarButton] = &[
    button(Tool::AddText, "Text"),
    button(Tool::AddImage, "Image"),
    button(Tool::AddShape, "Shapes"),
    button(Tool::Effects, "Effects"),
    button(Tool::Stickers, "Stickers"),
];

/// Buttons shown for a selected text element.
pub const TEXT_BUTTONS: &[ToolbarButton] = &[
    button(Tool::EditOpacity, "Opacity"),
    button(Tool::EditTextContent, "Edit"),
    button(Tool::EditFontFamily, "Font"),
    button(Tool::EditTextColor, "Color"),
    button(Tool::EditTextAlignment, "Align"),
];

/// Buttons shown for a selected image element.
pub const IMAGE_BUTTONS: &[ToolbarButton] = &[
    button(Tool::EditOpacity, "Opacity"),
    button(Tool::EditImageCrop, "Crop"),
    button(Tool::EditImageFilters, "Filters"),
    button(Tool::EditImageAdjustments, "Adjust"),
];

/// Buttons shown for a selected circle.
pub const SHAPE_BUTTONS: &[ToolbarButton] = &[
    button(Tool::EditOpacity, "Opacity"),
    button(Tool::EditShapeFillColor, "Fill"),
    button(Tool::EditShapeStrokeColor, "Stroke"),
    button(Tool::EditShapeStrokeWidth, "Stroke width"),
];

/// Buttons shown for a selected rectangle: the shape set plus corners.
pub const RECTANGLE_BUTTONS: &[ToolbarButton] = &[
    button(Tool::EditOpacity, "Opacity"),
    button(Tool::EditShapeFillColor, "Fill"),
    button(Tool::EditShapeStrokeColor, "Stroke"),
    button(Tool::EditShapeStrokeWidth, "Stroke width"),
    button(Tool::EditShapeCornerRadius, "Corners"),
];

/// The button set for the given selection.
#[must_use]
pub fn buttons_for(selected: Option<&Element>) -> &'static [ToolbarButton] {
    match selected.map(Element::element_type) {
        None => DEFAULT_BUTTONS,
        Some(ElementType::Text) => TEXT_BUTTONS,
        Some(ElementType::Image) => IMAGE_BUTTONS,
        Some(ElementType::Rectangle) => RECTANGLE_BUTTONS,
        Some(ElementType::Circle) => SHAPE_BUTTONS,
    }
}
