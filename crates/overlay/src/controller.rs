//! Overlay window controller
//!
//! Owns the window state and is the only place that changes it. Every
//! accepted geometry change goes window → embedded surface → backdrop within
//! a single call, so a paint never sees a rectangle without its backdrop.

use crate::backdrop::{BackdropSlot, BackdropSynchronizer, SyncOutcome};
use crate::config::OverlayConfig;
use crate::event::{Command, EventQueue, EventSender, OverlayEvent};
use crate::geometry::{self, Point, Size, SizeBounds};
use crate::gesture::{self, CursorHint, GestureMode, GestureTracker};
use crate::host::{EmbeddedSurface, WindowHost};
use crate::timer::{OneShot, TimerKind, TimerPoll};
use crate::toolbar::{ToolbarButton, ToolbarLayout};
use crate::OverlayResult;
use capture::{Rect, ScreenCapture};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Window placement and visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowState {
    pub current_rect: Rect,
    pub is_hidden: bool,
    pub default_rect: Rect,
}

pub struct OverlayController<W, S, C> {
    config: OverlayConfig,
    bounds: SizeBounds,
    state: WindowState,
    gesture: GestureTracker,
    /// Toolbar button under the last pointer-down
    pressed: Option<ToolbarButton>,
    hide_timer: OneShot,
    backdrop: BackdropSynchronizer<C>,
    events: EventQueue,
    host: W,
    surface: S,
    closed: bool,
}

impl<W, S, C> OverlayController<W, S, C>
where
    W: WindowHost,
    S: EmbeddedSurface,
    C: ScreenCapture,
{
    pub fn new(
        config: OverlayConfig,
        host: W,
        surface: S,
        capture: C,
        slot: BackdropSlot,
    ) -> OverlayResult<Self> {
        config.validate()?;

        let default_rect = config.default_rect();
        let backdrop =
            BackdropSynchronizer::new(capture, slot).with_dump_path(config.backdrop_dump.clone());

        Ok(Self {
            bounds: config.size_bounds(),
            state: WindowState {
                current_rect: default_rect,
                is_hidden: false,
                default_rect,
            },
            gesture: GestureTracker::new(config.edge_margin),
            pressed: None,
            hide_timer: OneShot::new(),
            backdrop,
            events: EventQueue::new(),
            host,
            surface,
            closed: false,
            config,
        })
    }

    /// Place the window, load the configured URL and show it
    pub fn start(&mut self) {
        let rect = self.state.current_rect;
        info!(?rect, url = %self.config.url, "starting overlay");

        self.host.apply_geometry(rect);
        self.layout_surface();
        if let Err(e) = self.surface.load_url(&self.config.url) {
            warn!(error = %e, "initial page load failed");
        }

        // Capture before showing so the first frame already has a backdrop
        self.sync_backdrop();
        self.host.show();

        if let Some(interval) = self.config.keep_on_top_interval() {
            self.host.schedule(TimerKind::KeepOnTop, interval);
        }
    }

    pub fn state(&self) -> &WindowState {
        &self.state
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    pub fn gesture_mode(&self) -> GestureMode {
        self.gesture.mode()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn backdrop_slot(&self) -> &BackdropSlot {
        self.backdrop.slot()
    }

    /// Posting end for the window procedure
    pub fn sender(&self) -> EventSender {
        self.events.sender()
    }

    pub fn host(&self) -> &W {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut W {
        &mut self.host
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn capture_mut(&mut self) -> &mut C {
        self.backdrop.capture_mut()
    }

    /// Toolbar buttons for the current window width
    pub fn toolbar(&self) -> ToolbarLayout {
        ToolbarLayout::new(self.state.current_rect.width, self.config.strip_height)
    }

    /// Process everything queued so far, including events posted while
    /// draining. Returns how many were handled.
    pub fn drain(&mut self, now: Instant) -> usize {
        let mut handled = 0;
        while let Some(event) = self.events.try_next() {
            self.dispatch(event, now);
            handled += 1;
        }
        handled
    }

    pub fn dispatch(&mut self, event: OverlayEvent, now: Instant) {
        if self.closed {
            return;
        }

        match event {
            OverlayEvent::PointerDown { local, global } => self.pointer_down(local, global),
            OverlayEvent::PointerMove {
                local,
                global,
                primary_held,
            } => self.pointer_move(local, global, primary_held),
            OverlayEvent::PointerUp { local } => self.pointer_up(local, now),
            OverlayEvent::GeometryChanged(rect) => self.on_geometry_changed(rect),
            OverlayEvent::Timer(kind) => self.on_timer(kind, now),
            OverlayEvent::Command(command) => self.execute(command, now),
        }
    }

    pub fn execute(&mut self, command: Command, now: Instant) {
        match command {
            Command::Reset => self.reset(),
            Command::HideTemporarily => self.hide_temporarily(self.config.hide_duration(), now),
            Command::Refresh => self.refresh(),
            Command::Close => self.close(),
        }
    }

    /// Back to the configured geometry; cancels any gesture in progress.
    /// Always re-applies and recaptures, even when already at the default,
    /// since the desktop behind the window may have changed.
    pub fn reset(&mut self) {
        info!(rect = ?self.state.default_rect, "resetting geometry");
        self.gesture.pointer_up();
        self.pressed = None;
        self.backdrop.invalidate();
        self.commit(self.state.default_rect);
    }

    /// Hide for `duration`. Calling again while hidden restarts the countdown.
    pub fn hide_temporarily(&mut self, duration: Duration, now: Instant) {
        self.gesture.pointer_up();
        self.pressed = None;

        let restarted = self.hide_timer.arm(now, duration);
        info!(?duration, restarted, "hiding overlay");

        if !self.state.is_hidden {
            self.state.is_hidden = true;
            self.host.hide();
        }
        self.host.schedule(TimerKind::Hide, duration);
    }

    /// Reload the embedded content; geometry and backdrop are left alone
    pub fn refresh(&mut self) {
        info!("reloading embedded surface");
        if let Err(e) = self.surface.reload() {
            warn!(error = %e, "reload failed");
        }
    }

    pub fn close(&mut self) {
        info!("closing overlay");
        self.closed = true;
        self.gesture.pointer_up();
        self.hide_timer.cancel();
        self.host.cancel(TimerKind::Hide);
        self.host.cancel(TimerKind::KeepOnTop);
        self.host.close();
    }

    /// Window-system move/resize notification. Idempotent: a rectangle that
    /// is already current and backed by a fresh backdrop changes nothing.
    pub fn on_geometry_changed(&mut self, rect: Rect) {
        let clamped = self.bounds.clamp(rect);
        if clamped != rect {
            debug!(?rect, ?clamped, "external geometry outside size bounds");
            self.host.apply_geometry(clamped);
        }

        if clamped == self.state.current_rect && self.backdrop_is_fresh() {
            return;
        }

        self.state.current_rect = clamped;
        self.layout_surface();
        self.sync_backdrop();
    }

    pub fn on_timer(&mut self, kind: TimerKind, now: Instant) {
        match kind {
            TimerKind::Hide => match self.hide_timer.poll(now) {
                TimerPoll::Fired => {
                    self.host.cancel(TimerKind::Hide);
                    self.reveal();
                }
                TimerPoll::Pending(remaining) => {
                    debug!(?remaining, "hide timer woke early");
                    self.host.schedule(TimerKind::Hide, remaining);
                }
                TimerPoll::Idle => {
                    self.host.cancel(TimerKind::Hide);
                }
            },
            TimerKind::KeepOnTop => {
                if !self.state.is_hidden {
                    self.host.raise_topmost();
                }
            }
        }
    }

    pub fn pointer_down(&mut self, local: Point, global: Point) {
        if self.state.is_hidden {
            return;
        }

        if let Some(button) = self.button_at(local) {
            debug!(?button, "toolbar button pressed");
            self.pressed = Some(button);
            return;
        }

        let mode = self.gesture.pointer_down(
            local,
            global,
            self.strip_size(),
            self.state.current_rect,
        );
        self.host.set_cursor(gesture::cursor_hint(mode));
    }

    pub fn pointer_move(&mut self, local: Point, global: Point, primary_held: bool) {
        if self.state.is_hidden {
            return;
        }

        if self.gesture.is_armed() {
            if let Some(rect) = self.gesture.pointer_move(global, primary_held, &self.bounds) {
                self.commit(rect);
            }
            return;
        }

        let hint = if self.button_at(local).is_some() {
            CursorHint::Arrow
        } else {
            gesture::cursor_hint(self.zone_at(local))
        };
        self.host.set_cursor(hint);
    }

    pub fn pointer_up(&mut self, local: Point, now: Instant) {
        self.gesture.pointer_up();

        if let Some(button) = self.pressed.take() {
            if self.button_at(local) == Some(button) {
                debug!(?button, "toolbar button clicked");
                self.execute(button.command(), now);
            }
        }
    }

    fn strip_size(&self) -> Size {
        Size::new(self.state.current_rect.width, self.config.strip_height)
    }

    fn zone_at(&self, local: Point) -> GestureMode {
        gesture::classify(local, self.strip_size(), self.config.edge_margin)
    }

    /// Buttons only take the drag zone; edge margins stay resize handles
    fn button_at(&self, local: Point) -> Option<ToolbarButton> {
        if self.zone_at(local) != GestureMode::Drag {
            return None;
        }
        self.toolbar().hit_test(local)
    }

    fn content_area(&self) -> Rect {
        geometry::content_area(self.state.current_rect, self.config.strip_height)
    }

    fn backdrop_is_fresh(&self) -> bool {
        self.backdrop.is_current(self.content_area())
    }

    /// Make `rect` the current geometry and bring everything in line with it
    fn commit(&mut self, rect: Rect) {
        if rect == self.state.current_rect && self.backdrop_is_fresh() {
            return;
        }

        debug!(from = ?self.state.current_rect, to = ?rect, "geometry change");
        self.state.current_rect = rect;
        self.host.apply_geometry(rect);
        self.layout_surface();
        self.sync_backdrop();
    }

    fn layout_surface(&mut self) {
        let bounds =
            geometry::local_content_area(self.state.current_rect, self.config.strip_height);
        if let Err(e) = self.surface.set_bounds(bounds) {
            warn!(error = %e, ?bounds, "failed to position embedded surface");
        }
    }

    /// Recapture unless hidden; a hidden window is recaptured when shown
    fn sync_backdrop(&mut self) {
        if self.state.is_hidden {
            self.backdrop.invalidate();
            return;
        }

        if let SyncOutcome::Installed(_) = self.backdrop.sync(self.content_area()) {
            self.host.repaint();
        }
    }

    /// End of a temporary hide. The capture runs while the window is still
    /// hidden so it sees the desktop as it is now.
    fn reveal(&mut self) {
        info!("hide period over, showing overlay");
        self.state.is_hidden = false;
        self.backdrop.invalidate();
        self.sync_backdrop();
        self.host.show();
    }
}
