//! Capabilities the controller drives but does not implement

use crate::gesture::CursorHint;
use crate::timer::TimerKind;
use crate::OverlayResult;
use capture::Rect;
use std::time::Duration;

/// The real top-level window
pub trait WindowHost {
    /// Move and resize to `rect` (screen space, whole window)
    fn apply_geometry(&mut self, rect: Rect);

    fn show(&mut self);

    fn hide(&mut self);

    /// Advisory; nothing depends on it having an effect
    fn set_cursor(&mut self, hint: CursorHint);

    /// Deliver `OverlayEvent::Timer(timer)` every `after` until cancelled.
    /// Scheduling an already scheduled timer replaces it.
    fn schedule(&mut self, timer: TimerKind, after: Duration);

    fn cancel(&mut self, timer: TimerKind);

    /// Repaint now so a freshly installed backdrop is visible
    fn repaint(&mut self);

    /// Re-assert the always-on-top z-order
    fn raise_topmost(&mut self);

    fn close(&mut self);
}

/// The embedded web content renderer
pub trait EmbeddedSurface {
    /// Position within the window, window-local pixels
    fn set_bounds(&mut self, bounds: Rect) -> OverlayResult<()>;

    fn load_url(&mut self, url: &str) -> OverlayResult<()>;

    fn reload(&mut self) -> OverlayResult<()>;
}
