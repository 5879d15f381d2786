//! # Design CLI
//!
//! Replays a JSON script of editor steps against the design surface
//! controller and prints the resulting state snapshot.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p design-cli -- --script steps.json --image photo.png --pretty
//! ```
//!
//! A script is a JSON array of steps. Elements are addressed by their layer
//! index in z-order (0 is the bottom-most):
//!
//! ```json
//! [
//!   { "step": "tool", "tool": "ADD_SHAPE" },
//!   { "step": "tool", "tool": "ADD_TEXT" },
//!   { "step": "confirm_text", "text": "Hello" },
//!   { "step": "reorder", "index": 1, "target": null, "position": "after" }
//! ]
//! ```
//!
//! All effects started by a step are settled before the next step runs.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use design_core::{
    Action, CanvasSize, Controller, DataUriProbe, EditorConfig, EditorRuntime, ElementId,
    ElementPatch, FileImageSource, ImageSource, NoImageSource, ProjectSetup, ReorderPosition,
    Tool,
};
use serde::Deserialize;

/// Command-line arguments for design-cli.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "design-cli")]
#[command(about = "Replay editor scripts against the design surface controller")]
#[command(version)]
pub struct CliArgs {
    /// JSON script of editor steps
    #[arg(long, env = "DESIGN_SCRIPT")]
    pub script: Option<PathBuf>,

    /// Editor configuration file (JSON)
    #[arg(long, env = "DESIGN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Artboard width in canvas pixels
    #[arg(long)]
    pub width: Option<f32>,

    /// Artboard height in canvas pixels
    #[arg(long)]
    pub height: Option<f32>,

    /// Project name
    #[arg(long)]
    pub name: Option<String>,

    /// Image file handed over whenever the editor asks for one
    #[arg(long, env = "DESIGN_IMAGE")]
    pub image: Option<PathBuf>,

    /// Pretty-print the state snapshot
    #[arg(long)]
    pub pretty: bool,
}

/// One scripted editor step.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum Step {
    /// Request a toolbar tool.
    Tool { tool: Tool },
    /// Select the element at `index`, or clear the selection.
    Select {
        #[serde(default)]
        index: Option<usize>,
    },
    /// Drag an element to a new top-left position.
    Move { index: usize, x: f32, y: f32 },
    /// Resize an element.
    Resize { index: usize, width: f32, height: f32 },
    /// Merge an arbitrary partial update.
    Update { index: usize, patch: ElementPatch },
    ToggleVisibility { index: usize },
    ToggleLock { index: usize },
    /// Layers list drag; `target` of `null` drops at a list end.
    Reorder {
        index: usize,
        #[serde(default)]
        target: Option<usize>,
        position: ReorderPosition,
    },
    /// Double-click a text element.
    EditText { index: usize },
    ConfirmText { text: String },
    CancelText,
    /// Confirm the cropper. Without `src` the pending image is kept as is.
    ConfirmCrop {
        #[serde(default)]
        src: Option<String>,
    },
    CancelCrop,
    SetOpacity { value: f32 },
    CloseOpacityPanel,
    ToggleLayers,
    /// Start a new project, replacing the current one.
    NewProject {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        width: Option<f32>,
        #[serde(default)]
        height: Option<f32>,
    },
    GoHome,
}

/// Parse a script.
///
/// # Errors
///
/// Returns an error if the JSON is not an array of known steps.
pub fn parse_script(json: &str) -> anyhow::Result<Vec<Step>> {
    serde_json::from_str(json).context("Invalid editor script")
}

/// Build the editor configuration from the config file and flag overrides.
///
/// # Errors
///
/// Returns an error if the config file cannot be loaded or the resulting
/// canvas size is invalid.
pub fn load_config(args: &CliArgs) -> anyhow::Result<EditorConfig> {
    let mut config = match &args.config {
        Some(path) => EditorConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EditorConfig::default(),
    };
    if args.width.is_some() || args.height.is_some() {
        config.canvas = CanvasSize::new(
            args.width.unwrap_or(config.canvas.width()),
            args.height.unwrap_or(config.canvas.height()),
        )?;
    }
    if let Some(name) = &args.name {
        config.project_name.clone_from(name);
    }
    Ok(config)
}

/// Run the CLI and return the final state snapshot as JSON.
///
/// # Errors
///
/// Returns an error if the configuration or script cannot be loaded, or a
/// step refers to a layer that does not exist.
pub async fn run(args: &CliArgs) -> anyhow::Result<String> {
    let config = load_config(args)?;
    let steps = match &args.script {
        Some(path) => {
            let json = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read script {}", path.display()))?;
            parse_script(&json)?
        }
        None => Vec::new(),
    };

    let source: Arc<dyn ImageSource> = match &args.image {
        Some(path) => Arc::new(FileImageSource::new(path)),
        None => Arc::new(NoImageSource),
    };
    let mut runtime = EditorRuntime::new(Controller::new(config), source, Arc::new(DataUriProbe));

    let setup = {
        let config = runtime.controller().config();
        ProjectSetup {
            name: config.project_name.clone(),
            canvas: config.canvas,
        }
    };
    runtime.dispatch(Action::StartCreating);
    runtime.dispatch(Action::ConfirmProjectSetup(setup));

    for (n, step) in steps.into_iter().enumerate() {
        tracing::debug!(?step, "Step {n}");
        let action = step_action(runtime.controller(), step)
            .with_context(|| format!("Script step {n} failed"))?;
        runtime.dispatch(action);
        runtime.settle().await;
    }

    let state = runtime.controller().state();
    tracing::info!(
        "Script finished: {} elements, version {}",
        state.elements().len(),
        state.version()
    );
    let snapshot = if args.pretty {
        serde_json::to_string_pretty(state)?
    } else {
        serde_json::to_string(state)?
    };
    Ok(snapshot)
}

fn element_at(controller: &Controller, index: usize) -> anyhow::Result<ElementId> {
    match controller.state().elements().as_slice().get(index) {
        Some(element) => Ok(element.id),
        None => bail!(
            "No element at layer {index} ({} layers)",
            controller.state().elements().len()
        ),
    }
}

/// Translate a step into a controller action against the current state.
///
/// # Errors
///
/// Returns an error if the step names a layer index that does not exist, or
/// a new project with an invalid canvas size.
pub fn step_action(controller: &Controller, step: Step) -> anyhow::Result<Action> {
    let at = |index| element_at(controller, index);
    let action = match step {
        Step::Tool { tool } => Action::SelectTool(tool),
        Step::Select { index } => Action::Select(index.map(at).transpose()?),
        Step::Move { index, x, y } => Action::UpdateElement {
            id: at(index)?,
            patch: ElementPatch::position(x, y),
        },
        Step::Resize {
            index,
            width,
            height,
        } => Action::UpdateElement {
            id: at(index)?,
            patch: ElementPatch::size(width, height),
        },
        Step::Update { index, patch } => Action::UpdateElement {
            id: at(index)?,
            patch,
        },
        Step::ToggleVisibility { index } => Action::ToggleVisibility(at(index)?),
        Step::ToggleLock { index } => Action::ToggleLock(at(index)?),
        Step::Reorder {
            index,
            target,
            position,
        } => Action::Reorder {
            dragged: at(index)?,
            target: target.map(at).transpose()?,
            position,
        },
        Step::EditText { index } => Action::EditText(at(index)?),
        Step::ConfirmText { text } => Action::ConfirmText(text),
        Step::CancelText => Action::CancelText,
        Step::ConfirmCrop { src } => {
            let pending = controller.state().cropper().pending_src.clone();
            match src.or(pending) {
                Some(src) => Action::ConfirmCrop(src),
                None => bail!("Cropper has no image to confirm"),
            }
        }
        Step::CancelCrop => Action::CancelCrop,
        Step::SetOpacity { value } => Action::SetOpacity(value),
        Step::CloseOpacityPanel => Action::CloseOpacityPanel,
        Step::ToggleLayers => Action::ToggleLayersPanel,
        Step::NewProject {
            name,
            width,
            height,
        } => {
            let config = controller.config();
            Action::ConfirmProjectSetup(ProjectSetup::new(
                name.unwrap_or_else(|| config.project_name.clone()),
                width.unwrap_or(config.canvas.width()),
                height.unwrap_or(config.canvas.height()),
            )?)
        }
        Step::GoHome => Action::GoHome,
    };
    Ok(action)
}
