//! # Design Core
//!
//! Interaction core of a layered 2D design editor: the element store, the
//! single selection, the tool state machine and the modal editing overlays
//! (text, image cropper, opacity panel), all driven through one
//! [`Controller`].
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 Controller                  │
//! │     dispatch(Action) -> Vec<Effect>         │
//! ├─────────────────────────────────────────────┤
//! │  EditorState     │  Overlays                │
//! │  - ElementStore  │  - Text overlay          │
//! │  - Selection     │  - Image cropper         │
//! │  - Active tool   │  - Opacity panel         │
//! ├─────────────────────────────────────────────┤
//! │  EditorRuntime   │  Capabilities            │
//! │  - Effect tasks  │  - ImageSource           │
//! │  - Completions   │  - ImageProbe, Viewport  │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod controller;
pub mod element;
pub mod error;
pub mod overlay;
pub mod probe;
pub mod runtime;
pub mod selection;
pub mod state;
pub mod store;
pub mod tool;
pub mod toolbar;
pub mod viewport;

pub use config::{CanvasSize, EditorConfig};
pub use controller::{Action, Controller, Effect};
pub use element::{
    clamp_opacity, Element, ElementDraft, ElementId, ElementKind, ElementPatch, ElementType,
    FontWeight, Point, TextAlign,
};
pub use error::{DesignError, DesignResult, ProbeError};
pub use overlay::{BoxSize, EditTarget, ImageCropper, ImageDimensions, OpacityPanel, TextOverlay};
pub use probe::{DataUriProbe, FileImageSource, ImageProbe, ImageSource, NoImageSource};
pub use runtime::EditorRuntime;
pub use selection::Selection;
pub use state::{EditorState, ProjectSetup, Screen};
pub use store::{ElementStore, ReorderPosition};
pub use tool::{Tool, ToolGroup};
pub use toolbar::ToolbarButton;
pub use viewport::{ViewportCenter, ViewportSlot};

/// Design core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
