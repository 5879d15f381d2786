//! Async driver for the controller's effects.
//!
//! Effects run as tokio tasks. Each task ends with the completion
//! [`Action`] for the target captured when the effect was issued, and
//! completions are applied through [`Controller::dispatch`] one at a time in
//! the order they finish. There is no cancellation: a completion that lands
//! after the state has moved on is handled by the ordinary no-op rules.

use std::sync::Arc;

use tokio::task::JoinSet;

use crate::{Action, Controller, Effect, ImageProbe, ImageSource, ViewportCenter};

/// Controller plus the capabilities needed to run its effects.
pub struct EditorRuntime {
    controller: Controller,
    source: Arc<dyn ImageSource>,
    probe: Arc<dyn ImageProbe>,
    tasks: JoinSet<Action>,
}

impl EditorRuntime {
    /// Wrap a controller with an image source and an image probe.
    #[must_use]
    pub fn new(
        controller: Controller,
        source: Arc<dyn ImageSource>,
        probe: Arc<dyn ImageProbe>,
    ) -> Self {
        Self {
            controller,
            source,
            probe,
            tasks: JoinSet::new(),
        }
    }

    /// The wrapped controller.
    #[must_use]
    pub const fn controller(&self) -> &Controller {
        &self.controller
    }

    /// Install the viewport-center capability.
    pub fn register_viewport(&mut self, provider: Arc<dyn ViewportCenter>) {
        self.controller.register_viewport(provider);
    }

    /// Apply an action and start its effects.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&mut self, action: Action) {
        for effect in self.controller.dispatch(action) {
            self.spawn(effect);
        }
    }

    fn spawn(&mut self, effect: Effect) {
        tracing::debug!(?effect, "Starting effect");
        match effect {
            Effect::AcquireImage { target } => {
                let source = Arc::clone(&self.source);
                self.tasks.spawn(async move {
                    let src = source.acquire().await;
                    Action::ImageAcquired { target, src }
                });
            }
            Effect::ProbeImage {
                target,
                session,
                src,
            } => {
                let probe = Arc::clone(&self.probe);
                self.tasks.spawn(async move {
                    let outcome = probe.dimensions(&src).await;
                    Action::ImageProbed {
                        target,
                        session,
                        src,
                        outcome,
                    }
                });
            }
        }
    }

    /// Number of effects still running.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Wait for the next effect to finish and apply its completion.
    ///
    /// Returns `false` once nothing is in flight.
    pub async fn next_completion(&mut self) -> bool {
        match self.tasks.join_next().await {
            Some(Ok(action)) => {
                self.dispatch(action);
                true
            }
            Some(Err(e)) => {
                tracing::warn!("Effect task failed, dropping it: {e}");
                true
            }
            None => false,
        }
    }

    /// Apply completions until no effect is in flight.
    ///
    /// Completions may start further effects; those are awaited too.
    pub async fn settle(&mut self) {
        while self.next_completion().await {}
    }

    /// Unwrap the controller, dropping (and aborting) running effects.
    #[must_use]
    pub fn into_controller(self) -> Controller {
        self.controller
    }
}

impl std::fmt::Debug for EditorRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorRuntime")
            .field("controller", &self.controller)
            .field("in_flight", &self.tasks.len())
            .finish_non_exhaustive()
    }
}
