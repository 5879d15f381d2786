//! The editor state record.
//!
//! One record holds every piece of process-wide editor state so that the
//! cross-field invariants can be checked in one place. Only the
//! [`Controller`](crate::Controller) mutates it; the presentation layer
//! reads it (or its JSON snapshot).

use serde::{Deserialize, Serialize};

use crate::{
    CanvasSize, DesignResult, EditorConfig, Element, ElementStore, ImageCropper, OpacityPanel,
    Selection, TextOverlay, Tool,
};

/// Which top-level screen is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    /// Start screen with the "create" entry point.
    #[default]
    Start,
    /// The design surface.
    Editor,
}

/// Name and artboard of a project, as confirmed in the setup dialog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSetup {
    /// Project name.
    pub name: String,
    /// Artboard size.
    pub canvas: CanvasSize,
}

impl ProjectSetup {
    /// Build a setup, validating the canvas dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`DesignError::InvalidCanvasSize`](crate::DesignError) if a
    /// dimension is not positive.
    pub fn new(name: impl Into<String>, width: f32, height: f32) -> DesignResult<Self> {
        Ok(Self {
            name: name.into(),
            canvas: CanvasSize::new(width, height)?,
        })
    }
}

/// The complete editor state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorState {
    pub(crate) version: u64,
    pub(crate) screen: Screen,
    pub(crate) project: ProjectSetup,
    pub(crate) project_setup: Option<ProjectSetup>,
    pub(crate) layers_panel_open: bool,
    pub(crate) tool: Tool,
    pub(crate) selection: Selection,
    pub(crate) text: TextOverlay,
    pub(crate) cropper: ImageCropper,
    pub(crate) opacity: OpacityPanel,
    pub(crate) elements: ElementStore,
}

impl EditorState {
    /// Fresh state on the start screen with the configured project defaults.
    #[must_use]
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            version: 0,
            screen: Screen::Start,
            project: ProjectSetup {
                name: config.project_name.clone(),
                canvas: config.canvas,
            },
            project_setup: None,
            layers_panel_open: false,
            tool: Tool::Select,
            selection: Selection::default(),
            text: TextOverlay::default(),
            cropper: ImageCropper::default(),
            opacity: OpacityPanel::default(),
            elements: ElementStore::new(),
        }
    }

    /// Number of transitions applied so far.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Current screen.
    #[must_use]
    pub const fn screen(&self) -> Screen {
        self.screen
    }

    /// Current project.
    #[must_use]
    pub const fn project(&self) -> &ProjectSetup {
        &self.project
    }

    /// Prefill of the project setup dialog while it is open.
    #[must_use]
    pub const fn project_setup(&self) -> Option<&ProjectSetup> {
        self.project_setup.as_ref()
    }

    /// Artboard size of the current project.
    #[must_use]
    pub const fn canvas(&self) -> CanvasSize {
        self.project.canvas
    }

    /// Whether the layers panel is shown.
    #[must_use]
    pub const fn layers_panel_open(&self) -> bool {
        self.layers_panel_open
    }

    /// Active tool.
    #[must_use]
    pub const fn tool(&self) -> Tool {
        self.tool
    }

    /// Selected element id.
    #[must_use]
    pub const fn selected(&self) -> Option<crate::ElementId> {
        self.selection.get()
    }

    /// Selected element.
    #[must_use]
    pub fn selected_element(&self) -> Option<&Element> {
        self.selection.get().and_then(|id| self.elements.get(id))
    }

    /// Text overlay state.
    #[must_use]
    pub const fn text_overlay(&self) -> &TextOverlay {
        &self.text
    }

    /// Image cropper state.
    #[must_use]
    pub const fn cropper(&self) -> &ImageCropper {
        &self.cropper
    }

    /// Whether the opacity panel is shown.
    #[must_use]
    pub const fn opacity_panel_open(&self) -> bool {
        self.opacity.open
    }

    /// Elements in z-order.
    #[must_use]
    pub const fn elements(&self) -> &ElementStore {
        &self.elements
    }

    /// List every broken cross-field invariant. Empty in any reachable state.
    #[must_use]
    pub fn violations(&self) -> Vec<&'static str> {
        let mut broken = Vec::new();
        if let Some(id) = self.selection.get() {
            match self.elements.get(id) {
                None => broken.push("selected element does not exist"),
                Some(element) if element.is_locked => broken.push("selected element is locked"),
                Some(_) => {}
            }
        } else if self.opacity.open {
            broken.push("opacity panel open without a selection");
        }
        if self.elements.iter().any(|e| !(0.0..=1.0).contains(&e.opacity)) {
            broken.push("opacity outside [0, 1]");
        }
        if self.opacity.open != (self.tool == Tool::EditOpacity) {
            broken.push("opacity tool and panel disagree");
        }
        broken
    }

    /// Serialize the state for a presentation layer.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> DesignResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}
