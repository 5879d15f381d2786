//! Async completions applied through the runtime.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use design_core::{
    Action, Controller, EditTarget, EditorRuntime, ElementId, ElementPatch, ImageDimensions,
    ImageProbe, ImageSource, ProbeError, ProjectSetup, Tool,
};

/// Always hands over the same reference.
struct FixedSource(&'static str);

#[async_trait]
impl ImageSource for FixedSource {
    async fn acquire(&self) -> Option<String> {
        Some(self.0.to_string())
    }
}

/// Answers from a table after a per-source delay.
#[derive(Default)]
struct TableProbe {
    answers: HashMap<&'static str, (u64, Result<ImageDimensions, ProbeError>)>,
}

impl TableProbe {
    fn with(mut self, src: &'static str, delay_ms: u64, width: u32, height: u32) -> Self {
        self.answers
            .insert(src, (delay_ms, Ok(ImageDimensions { width, height })));
        self
    }

    fn failing(mut self, src: &'static str) -> Self {
        self.answers
            .insert(src, (0, Err(ProbeError::Unreadable("gone".into()))));
        self
    }
}

#[async_trait]
impl ImageProbe for TableProbe {
    async fn dimensions(&self, src: &str) -> Result<ImageDimensions, ProbeError> {
        let Some((delay, answer)) = self.answers.get(src).cloned() else {
            return Err(ProbeError::Empty);
        };
        tokio::time::sleep(Duration::from_millis(delay)).await;
        answer
    }
}

fn runtime(probe: TableProbe) -> EditorRuntime {
    EditorRuntime::new(
        Controller::default(),
        Arc::new(FixedSource("data:image/png;base64,raw")),
        Arc::new(probe),
    )
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

#[tokio::test]
async fn test_add_image_end_to_end() {
    let mut runtime = runtime(TableProbe::default().with("crop", 0, 200, 100));

    runtime.dispatch(Action::SelectTool(Tool::AddImage));
    runtime.settle().await;
    let cropper = runtime.controller().state().cropper();
    assert!(cropper.active);
    assert_eq!(cropper.pending_src.as_deref(), Some("data:image/png;base64,raw"));

    runtime.dispatch(Action::ConfirmCrop("crop".into()));
    assert!(!runtime.controller().state().cropper().active);
    runtime.settle().await;

    let element = runtime.controller().selected_element().expect("image placed");
    assert_eq!(element.image_src(), Some("crop"));
    assert!(approx(element.width, 300.0));
    assert!(approx(element.height, 150.0));
}

#[tokio::test]
async fn test_late_completion_targets_moved_element() {
    let mut runtime = runtime(
        TableProbe::default()
            .with("first", 0, 100, 100)
            .with("second", 20, 100, 100),
    );
    runtime.dispatch(Action::SelectTool(Tool::AddImage));
    runtime.settle().await;
    runtime.dispatch(Action::ConfirmCrop("first".into()));
    runtime.settle().await;
    let id = runtime.controller().state().selected().expect("placed");

    runtime.dispatch(Action::SelectTool(Tool::EditImageCrop));
    runtime.dispatch(Action::ConfirmCrop("second".into()));
    // The user drags the element while its dimensions are still loading.
    runtime.dispatch(Action::UpdateElement {
        id,
        patch: ElementPatch::position(10.0, 20.0),
    });
    runtime.settle().await;

    let element = runtime.controller().state().elements().get(id).expect("exists");
    assert_eq!(element.image_src(), Some("second"));
    assert!(approx(element.x, 10.0));
    assert!(approx(element.y, 20.0));
    assert_eq!(runtime.controller().state().elements().len(), 1);
}

#[tokio::test]
async fn test_completions_apply_in_finish_order() {
    let mut runtime = runtime(
        TableProbe::default()
            .with("slow", 50, 100, 100)
            .with("fast", 0, 200, 100),
    );
    runtime.dispatch(Action::ImageAcquired {
        target: EditTarget::New,
        src: Some("raw".into()),
    });
    runtime.dispatch(Action::ConfirmCrop("slow".into()));
    runtime.dispatch(Action::ImageAcquired {
        target: EditTarget::New,
        src: Some("raw".into()),
    });
    runtime.dispatch(Action::ConfirmCrop("fast".into()));
    assert_eq!(runtime.in_flight(), 2);
    runtime.settle().await;

    let srcs: Vec<_> = runtime
        .controller()
        .state()
        .elements()
        .iter()
        .filter_map(|e| e.image_src().map(str::to_string))
        .collect();
    assert_eq!(srcs, vec!["fast".to_string(), "slow".to_string()]);
    let selected = runtime.controller().selected_element().expect("selected");
    assert_eq!(selected.image_src(), Some("slow"));
}

#[tokio::test]
async fn test_unreadable_crop_releases_target() {
    let mut runtime = runtime(TableProbe::default().with("ok", 0, 10, 10).failing("bad"));
    runtime.dispatch(Action::SelectTool(Tool::AddImage));
    runtime.settle().await;
    runtime.dispatch(Action::ConfirmCrop("ok".into()));
    runtime.settle().await;
    let id = runtime.controller().state().selected().expect("placed");

    runtime.dispatch(Action::SelectTool(Tool::EditImageCrop));
    assert_eq!(
        runtime.controller().state().cropper().target,
        EditTarget::Existing(id)
    );
    runtime.dispatch(Action::ConfirmCrop("bad".into()));
    runtime.settle().await;

    let state = runtime.controller().state();
    assert_eq!(state.cropper().target, EditTarget::New);
    assert_eq!(
        state.elements().get(id).and_then(|e| e.image_src()),
        Some("ok")
    );
    assert!(state.violations().is_empty());
}

#[tokio::test]
async fn test_stale_failure_keeps_newer_crop_session() {
    let mut runtime = runtime(TableProbe::default().with("a", 0, 10, 10).with("b", 0, 10, 10));
    for src in ["a", "b"] {
        runtime.dispatch(Action::ImageAcquired {
            target: EditTarget::New,
            src: Some("raw".into()),
        });
        runtime.dispatch(Action::ConfirmCrop(src.into()));
        runtime.settle().await;
    }
    let ids = runtime.controller().state().elements().ids();
    let (first, second) = (ids[0], ids[1]);

    // A failure for an older session targeting `first` lands while a crop
    // of `second` is open.
    let stale = runtime.controller().state().cropper().session;
    runtime.dispatch(Action::Select(Some(second)));
    runtime.dispatch(Action::SelectTool(Tool::EditImageCrop));
    runtime.dispatch(Action::ImageProbed {
        target: EditTarget::Existing(first),
        session: stale,
        src: "late".into(),
        outcome: Err(ProbeError::Empty),
    });

    let cropper = runtime.controller().state().cropper();
    assert!(cropper.active);
    assert_eq!(cropper.target, EditTarget::Existing(second));
}

async fn placed_image(runtime: &mut EditorRuntime) -> ElementId {
    runtime.dispatch(Action::SelectTool(Tool::AddImage));
    runtime.settle().await;
    runtime.dispatch(Action::ConfirmCrop("ok".into()));
    runtime.settle().await;
    runtime.controller().state().selected().expect("placed")
}

#[tokio::test]
async fn test_late_result_keeps_newer_session_on_same_element() {
    let mut runtime = runtime(
        TableProbe::default()
            .with("ok", 0, 10, 10)
            .with("v1", 20, 100, 100)
            .with("v2", 0, 200, 100),
    );
    let id = placed_image(&mut runtime).await;

    runtime.dispatch(Action::SelectTool(Tool::EditImageCrop));
    runtime.dispatch(Action::ConfirmCrop("v1".into()));
    // Reopen the cropper on the same element before "v1" resolves.
    runtime.dispatch(Action::SelectTool(Tool::EditImageCrop));
    assert!(runtime.next_completion().await);

    let cropper = runtime.controller().state().cropper();
    assert!(cropper.active);
    assert_eq!(cropper.target, EditTarget::Existing(id));

    runtime.dispatch(Action::ConfirmCrop("v2".into()));
    runtime.settle().await;

    let state = runtime.controller().state();
    assert_eq!(state.elements().len(), 1);
    let element = state.elements().get(id).expect("exists");
    assert_eq!(element.image_src(), Some("v2"));
    assert!(approx(element.width, 300.0));
    assert_eq!(state.cropper().target, EditTarget::New);
}

#[tokio::test]
async fn test_late_failure_keeps_newer_session_on_same_element() {
    let mut runtime = runtime(TableProbe::default().with("ok", 0, 10, 10).failing("bad"));
    let id = placed_image(&mut runtime).await;

    runtime.dispatch(Action::SelectTool(Tool::EditImageCrop));
    let stale = runtime.controller().state().cropper().session;
    runtime.dispatch(Action::CancelCrop);
    runtime.dispatch(Action::SelectTool(Tool::EditImageCrop));
    runtime.dispatch(Action::ImageProbed {
        target: EditTarget::Existing(id),
        session: stale,
        src: "bad".into(),
        outcome: Err(ProbeError::Empty),
    });

    assert_eq!(
        runtime.controller().state().cropper().target,
        EditTarget::Existing(id)
    );
}

#[tokio::test]
async fn test_result_for_removed_element_is_inert() {
    let mut runtime = runtime(
        TableProbe::default()
            .with("ok", 0, 10, 10)
            .with("slow", 20, 100, 100),
    );
    placed_image(&mut runtime).await;

    runtime.dispatch(Action::SelectTool(Tool::EditImageCrop));
    runtime.dispatch(Action::ConfirmCrop("slow".into()));
    // A new project empties the store while the crop is still resolving.
    runtime.dispatch(Action::ConfirmProjectSetup(
        ProjectSetup::new("Next", 800.0, 600.0).expect("valid"),
    ));
    runtime.settle().await;

    let state = runtime.controller().state();
    assert!(state.elements().is_empty());
    assert!(state.selected().is_none());
    assert!(!state.cropper().active);
    assert_eq!(state.cropper().target, EditTarget::New);
    assert!(state.violations().is_empty());
}

#[tokio::test]
async fn test_result_for_locked_element_applies_without_selecting() {
    let mut runtime = runtime(
        TableProbe::default()
            .with("ok", 0, 10, 10)
            .with("slow", 20, 200, 100),
    );
    let id = placed_image(&mut runtime).await;

    runtime.dispatch(Action::SelectTool(Tool::EditImageCrop));
    runtime.dispatch(Action::ConfirmCrop("slow".into()));
    runtime.dispatch(Action::ToggleLock(id));
    assert!(runtime.controller().state().selected().is_none());
    runtime.settle().await;

    let state = runtime.controller().state();
    let element = state.elements().get(id).expect("exists");
    assert!(element.is_locked);
    assert_eq!(element.image_src(), Some("slow"));
    assert!(approx(element.width, 300.0));
    assert!(state.selected().is_none());
    assert_eq!(state.cropper().target, EditTarget::New);
    assert!(state.violations().is_empty());
}
