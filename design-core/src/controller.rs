//! The design surface controller.
//!
//! Every change to the editor state, whether a user event or the completion
//! of an asynchronous operation, arrives as an [`Action`] and is applied by
//! [`Controller::dispatch`]. Work that has to wait on the outside world is
//! returned as [`Effect`]s; whoever runs them reports back with another
//! `Action` carrying the target captured when the effect was issued.
//!
//! ```text
//!  user event ──┐                       ┌──> store / selection / overlays
//!               ├──> dispatch(Action) ──┤
//!  completion ──┘                       └──> Vec<Effect> ──> runtime ──┐
//!       ^                                                              │
//!       └──────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use crate::overlay::{
    image_box, round_opacity, text_box, EDIT_TEXT_MAX_WIDTH_RATIO, NEW_TEXT_MAX_WIDTH_RATIO,
};
use crate::tool::{Creation, ElementOverlay, ToolGroup};
use crate::toolbar::{buttons_for, ToolbarButton};
use crate::{
    EditTarget, EditorConfig, EditorState, Element, ElementDraft, ElementId, ElementKind,
    ElementPatch, ImageDimensions, Point, ProbeError, ProjectSetup, ReorderPosition, Screen,
    TextAlign, Tool, ViewportCenter, ViewportSlot,
};

/// Something that happened: a user event or an async completion.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A toolbar tool was requested.
    SelectTool(Tool),
    /// The canvas or layers list asked to select an element (or nothing).
    Select(Option<ElementId>),
    /// Partial update, e.g. a drag or resize from the canvas surface.
    UpdateElement {
        /// Element to update.
        id: ElementId,
        /// Fields to merge.
        patch: ElementPatch,
    },
    /// Flip an element's visibility from the layers list.
    ToggleVisibility(ElementId),
    /// Flip an element's lock from the layers list.
    ToggleLock(ElementId),
    /// A layers-list drag finished.
    Reorder {
        /// Element being moved.
        dragged: ElementId,
        /// Row it was dropped on, `None` for the list ends.
        target: Option<ElementId>,
        /// Drop position relative to the row.
        position: ReorderPosition,
    },
    /// Open the text overlay on a text element (canvas double-click).
    EditText(ElementId),
    /// The text overlay was confirmed.
    ConfirmText(String),
    /// The text overlay was dismissed.
    CancelText,
    /// File acquisition finished; `src` is `None` if the user aborted.
    ImageAcquired {
        /// Target captured when acquisition was requested.
        target: EditTarget,
        /// Raw image reference.
        src: Option<String>,
    },
    /// The cropper produced a cropped image reference.
    ConfirmCrop(String),
    /// The cropper was dismissed.
    CancelCrop,
    /// Dimension probing of a cropped image finished.
    ImageProbed {
        /// Target captured when the crop was confirmed.
        target: EditTarget,
        /// Cropper session the confirmation came from.
        session: u64,
        /// Cropped image reference.
        src: String,
        /// Pixel size, or why the image could not be loaded.
        outcome: Result<ImageDimensions, ProbeError>,
    },
    /// The opacity slider moved.
    SetOpacity(f32),
    /// The opacity panel was closed by its own close control.
    CloseOpacityPanel,
    /// "Create" pressed on the start screen.
    StartCreating,
    /// The project setup dialog was dismissed.
    CloseProjectSetup,
    /// The project setup dialog was confirmed: start a new project.
    ConfirmProjectSetup(ProjectSetup),
    /// Back to the start screen.
    GoHome,
    /// Show or hide the layers panel.
    ToggleLayersPanel,
}

/// Work the controller needs done outside the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Ask the user for an image file. Answer with [`Action::ImageAcquired`].
    AcquireImage {
        /// Target to echo back.
        target: EditTarget,
    },
    /// Find the pixel size of `src`. Answer with [`Action::ImageProbed`].
    ProbeImage {
        /// Target to echo back.
        target: EditTarget,
        /// Cropper session to echo back.
        session: u64,
        /// Image to probe.
        src: String,
    },
}

/// Owns the editor state and applies actions to it.
#[derive(Debug, Clone)]
pub struct Controller {
    config: EditorConfig,
    state: EditorState,
    viewport: ViewportSlot,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Controller {
    /// Create a controller on the start screen.
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        let state = EditorState::new(&config);
        Self {
            config,
            state,
            viewport: ViewportSlot::default(),
        }
    }

    /// Install the viewport-center capability of the canvas surface.
    pub fn register_viewport(&mut self, provider: Arc<dyn ViewportCenter>) {
        tracing::debug!("Viewport center provider registered");
        self.viewport.register(provider);
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &EditorState {
        &self.state
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Selected element, if any.
    #[must_use]
    pub fn selected_element(&self) -> Option<&Element> {
        self.state.selected_element()
    }

    /// Toolbar buttons for the current selection.
    #[must_use]
    pub fn toolbar(&self) -> &'static [ToolbarButton] {
        buttons_for(self.selected_element())
    }

    /// Point new elements are centered on.
    #[must_use]
    pub fn placement_center(&self) -> Point {
        self.viewport.center_or(self.state.canvas().center())
    }

    /// Apply one action. Returns the effects to run on its behalf.
    pub fn dispatch(&mut self, action: Action) -> Vec<Effect> {
        tracing::trace!(?action, "dispatch");
        let mut effects = Vec::new();

        match action {
            Action::SelectTool(tool) => self.select_tool(tool, &mut effects),
            Action::Select(id) => self.set_selection(id),
            Action::UpdateElement { id, patch } => {
                self.state.elements.update(id, &patch);
            }
            Action::ToggleVisibility(id) => {
                self.state.elements.toggle_visibility(id);
            }
            Action::ToggleLock(id) => self.toggle_lock(id),
            Action::Reorder {
                dragged,
                target,
                position,
            } => self.state.elements.reorder(dragged, target, position),
            Action::EditText(id) => self.edit_text(id),
            Action::ConfirmText(text) => self.confirm_text(text),
            Action::CancelText => {
                self.state.text.close();
            }
            Action::ImageAcquired { target, src } => match src {
                Some(src) => self.state.cropper.open(src, target),
                None => tracing::debug!("Image acquisition aborted"),
            },
            Action::ConfirmCrop(src) => self.confirm_crop(src, &mut effects),
            Action::CancelCrop => self.state.cropper.reset(),
            Action::ImageProbed {
                target,
                session,
                src,
                outcome,
            } => self.place_image(target, session, src, outcome),
            Action::SetOpacity(value) => {
                if let Some(id) = self.state.selection.get() {
                    self.state
                        .elements
                        .update(id, &ElementPatch::opacity(round_opacity(value)));
                }
            }
            Action::CloseOpacityPanel => self.close_opacity_panel(),
            Action::StartCreating => {
                self.state.project_setup = Some(ProjectSetup {
                    name: self.state.project.name.clone(),
                    canvas: self.config.canvas,
                });
            }
            Action::CloseProjectSetup => self.state.project_setup = None,
            Action::ConfirmProjectSetup(setup) => self.new_project(setup),
            Action::GoHome => self.go_home(),
            Action::ToggleLayersPanel => {
                self.state.layers_panel_open = !self.state.layers_panel_open;
            }
        }

        self.enforce_invariants();
        self.state.version += 1;
        effects
    }

    fn select_tool(&mut self, tool: Tool, effects: &mut Vec<Effect>) {
        if tool != Tool::EditOpacity && self.state.opacity.open {
            self.close_opacity_panel();
        }

        match tool.group() {
            ToolGroup::Creation(creation) => {
                self.set_selection(None);
                self.state.tool = Tool::Select;
                match creation {
                    Creation::Text => {
                        let placeholder = self.config.text_placeholder.clone();
                        self.state.text.open(placeholder, EditTarget::New);
                    }
                    Creation::Image => {
                        self.state.cropper.target = EditTarget::New;
                        effects.push(Effect::AcquireImage {
                            target: EditTarget::New,
                        });
                    }
                    Creation::Shape => self.add_shape(),
                    Creation::Global => tracing::info!("Global action {tool} triggered"),
                }
            }
            ToolGroup::OpacityToggle => self.toggle_opacity_panel(),
            ToolGroup::ElementOverlay(overlay) => {
                self.open_element_overlay(overlay);
                self.state.tool = Tool::Select;
            }
            ToolGroup::Cosmetic => match self.state.selection.get() {
                Some(id) => {
                    tracing::info!("Action {tool} triggered for element {id}");
                    self.state.tool = tool;
                }
                None => {
                    tracing::info!("Action {tool} triggered without a selected element");
                    self.state.tool = Tool::Select;
                }
            },
            ToolGroup::PassThrough => self.state.tool = tool,
        }
    }

    fn add_shape(&mut self) {
        let size = self.config.shape_size;
        let draft = ElementDraft::centered(
            ElementKind::Rectangle {
                background_color: self.config.shape_fill.clone(),
                stroke_color: None,
                stroke_width: Some(0.0),
                corner_radius: Some(0.0),
            },
            self.placement_center(),
            size,
            size,
        )
        .with_rotation(0.0);
        self.create_element(draft);
    }

    fn toggle_opacity_panel(&mut self) {
        if self.state.selection.is_empty() {
            self.state.opacity.open = false;
            self.state.tool = Tool::Select;
        } else if self.state.opacity.open {
            self.close_opacity_panel();
        } else {
            self.state.opacity.open = true;
            self.state.tool = Tool::EditOpacity;
        }
    }

    fn close_opacity_panel(&mut self) {
        self.state.opacity.open = false;
        if self.state.tool == Tool::EditOpacity {
            self.state.tool = Tool::Select;
        }
    }

    fn open_element_overlay(&mut self, overlay: ElementOverlay) {
        let Some(element) = self
            .selected_element()
            .filter(|e| e.element_type() == overlay.target_type())
        else {
            tracing::debug!("{overlay:?} needs a selected {:?}", overlay.target_type());
            return;
        };
        let id = element.id;
        let prefill = match (overlay, &element.kind) {
            (ElementOverlay::TextContent, ElementKind::Text { text, .. }) => text.clone(),
            (ElementOverlay::ImageCrop, ElementKind::Image { src, .. }) => src.clone(),
            _ => return,
        };

        match overlay {
            ElementOverlay::TextContent => {
                self.state.text.open(prefill, EditTarget::Existing(id));
            }
            ElementOverlay::ImageCrop => {
                self.state.cropper.open(prefill, EditTarget::Existing(id));
            }
        }
    }

    fn edit_text(&mut self, id: ElementId) {
        let Some(element) = self.state.elements.get(id).filter(|e| !e.is_locked) else {
            tracing::debug!("Text edit ignored, {id} is missing or locked");
            return;
        };
        if let Some(text) = element.text().map(str::to_string) {
            self.state.text.open(text, EditTarget::Existing(id));
            self.set_selection(Some(id));
        }
    }

    fn confirm_text(&mut self, text: String) {
        let canvas = self.state.canvas();
        match self.state.text.close() {
            EditTarget::Existing(id) => {
                let font_size = match self.state.elements.get(id).map(|e| &e.kind) {
                    Some(ElementKind::Text { font_size, .. }) => *font_size,
                    _ => {
                        tracing::debug!("Text target {id} no longer resolves");
                        return;
                    }
                };
                let size = text_box(
                    &text,
                    font_size,
                    canvas.width() * EDIT_TEXT_MAX_WIDTH_RATIO,
                );
                self.state.elements.update(
                    id,
                    &ElementPatch::text_content(text, size.width, size.height),
                );
            }
            EditTarget::New => {
                let font_size = self.config.text_font_size;
                let size = text_box(
                    &text,
                    font_size,
                    canvas.width() * NEW_TEXT_MAX_WIDTH_RATIO,
                );
                let draft = ElementDraft::centered(
                    ElementKind::Text {
                        text,
                        font_size,
                        font_family: self.config.text_font_family.clone(),
                        color: self.config.text_color.clone(),
                        font_weight: None,
                        text_align: Some(TextAlign::Center),
                    },
                    self.placement_center(),
                    size.width,
                    size.height,
                )
                .with_opacity(1.0);
                self.create_element(draft);
            }
        }
    }

    fn confirm_crop(&mut self, src: String, effects: &mut Vec<Effect>) {
        if !self.state.cropper.active {
            tracing::debug!("Crop confirmation ignored, cropper is closed");
            return;
        }
        let target = self.state.cropper.target;
        let session = self.state.cropper.session;
        self.state.cropper.dismiss();
        effects.push(Effect::ProbeImage {
            target,
            session,
            src,
        });
    }

    fn place_image(
        &mut self,
        target: EditTarget,
        session: u64,
        src: String,
        outcome: Result<ImageDimensions, ProbeError>,
    ) {
        let dimensions = match outcome {
            Ok(d) if d.width > 0 && d.height > 0 => d,
            Ok(_) => {
                tracing::warn!("Cropped image has no pixels, dropping it");
                self.state.cropper.release(session);
                return;
            }
            Err(e) => {
                tracing::warn!("Failed to load cropped image dimensions: {e}");
                self.state.cropper.release(session);
                return;
            }
        };

        let size = image_box(dimensions, self.config.image_size, self.state.canvas());
        match target {
            EditTarget::Existing(id) => {
                let is_image = self
                    .state
                    .elements
                    .get(id)
                    .is_some_and(|e| e.image_src().is_some());
                if is_image {
                    self.state.elements.update(
                        id,
                        &ElementPatch::image_source(src, size.width, size.height),
                    );
                } else {
                    tracing::debug!("Image target {id} no longer resolves");
                }
                self.state.cropper.release(session);
            }
            EditTarget::New => {
                let draft = ElementDraft::centered(
                    ElementKind::Image {
                        src,
                        alt: Some(self.config.image_alt.clone()),
                    },
                    self.placement_center(),
                    size.width,
                    size.height,
                )
                .with_rotation(0.0)
                .with_opacity(1.0);
                self.create_element(draft);
            }
        }
    }

    fn create_element(&mut self, draft: ElementDraft) -> ElementId {
        let id = self.state.elements.create(draft);
        self.close_opacity_panel();
        self.set_selection(Some(id));
        self.state.tool = Tool::Select;
        id
    }

    fn set_selection(&mut self, id: Option<ElementId>) {
        if self.state.selection.select(id, &self.state.elements).is_none() {
            self.close_opacity_panel();
        }
    }

    fn toggle_lock(&mut self, id: ElementId) {
        let locked = self.state.elements.toggle_lock(id);
        if locked == Some(true) && self.state.selection.is_selected(id) {
            self.set_selection(None);
        }
    }

    fn new_project(&mut self, setup: ProjectSetup) {
        tracing::info!(
            "New project \"{}\" ({}x{})",
            setup.name,
            setup.canvas.width(),
            setup.canvas.height()
        );
        let version = self.state.version;
        let session = self.state.cropper.session;
        self.state = EditorState::new(&self.config);
        self.state.version = version;
        self.state.cropper.session = session;
        self.state.project = setup;
        self.state.screen = Screen::Editor;
    }

    fn go_home(&mut self) {
        self.state.screen = Screen::Start;
        self.state.layers_panel_open = false;
        self.state.text.close();
        self.state.cropper.reset();
        self.close_opacity_panel();
    }

    /// Re-establish the cross-field invariants after any transition.
    fn enforce_invariants(&mut self) {
        if self.state.selection.revalidate(&self.state.elements) {
            tracing::debug!("Selection dropped: element missing or locked");
        }
        if self.state.selection.is_empty() && self.state.opacity.open {
            self.close_opacity_panel();
        }
    }
}
