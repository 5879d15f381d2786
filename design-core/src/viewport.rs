//! Viewport-center capability supplied by the rendering surface.
//!
//! The surface registers a provider once it has mounted. Until then, and
//! whenever none is registered, placement falls back to the canvas center.

use std::fmt;
use std::sync::Arc;

use crate::Point;

/// Reports the canvas-coordinate point at the center of the visible viewport.
pub trait ViewportCenter: Send + Sync {
    /// Current viewport center in canvas coordinates.
    fn center(&self) -> Point;
}

impl<F> ViewportCenter for F
where
    F: Fn() -> Point + Send + Sync,
{
    fn center(&self) -> Point {
        self()
    }
}

/// Optional capability slot with a defined fallback.
#[derive(Clone, Default)]
pub struct ViewportSlot {
    provider: Option<Arc<dyn ViewportCenter>>,
}

impl ViewportSlot {
    /// Install (or replace) the provider.
    pub fn register(&mut self, provider: Arc<dyn ViewportCenter>) {
        self.provider = Some(provider);
    }

    /// Remove the provider, e.g. when the surface unmounts.
    pub fn unregister(&mut self) {
        self.provider = None;
    }

    /// Whether a provider is installed.
    #[must_use]
    pub fn is_registered(&self) -> bool {
        self.provider.is_some()
    }

    /// The provider's center, or `fallback` when none is registered.
    #[must_use]
    pub fn center_or(&self, fallback: Point) -> Point {
        self.provider.as_ref().map_or(fallback, |p| p.center())
    }
}

impl fmt::Debug for ViewportSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewportSlot")
            .field("registered", &self.is_registered())
            .finish()
    }
}
