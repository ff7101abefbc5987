//! Events fed to the controller
//!
//! The window procedure posts events here instead of calling the controller
//! directly. Window-system calls made while the controller is applying
//! geometry re-enter the window procedure; those notifications land in the
//! queue and are handled after the current event, never in the middle of it.

use crate::geometry::Point;
use crate::timer::TimerKind;
use capture::Rect;
use crossbeam_channel::{unbounded, Receiver, Sender};

/// User-facing commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Reset,
    HideTemporarily,
    Refresh,
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayEvent {
    /// Primary button pressed; `local` is window-relative
    PointerDown { local: Point, global: Point },
    PointerMove {
        local: Point,
        global: Point,
        primary_held: bool,
    },
    PointerUp { local: Point },
    /// Window manager moved or resized the window
    GeometryChanged(Rect),
    Timer(TimerKind),
    Command(Command),
}

/// Cloneable posting end of the queue
#[derive(Debug, Clone)]
pub struct EventSender(Sender<OverlayEvent>);

impl EventSender {
    /// Queue an event. Silently dropped once the controller is gone.
    pub fn post(&self, event: OverlayEvent) {
        let _ = self.0.send(event);
    }
}

/// FIFO of pending events, drained on the UI thread
#[derive(Debug)]
pub struct EventQueue {
    tx: Sender<OverlayEvent>,
    rx: Receiver<OverlayEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn sender(&self) -> EventSender {
        EventSender(self.tx.clone())
    }

    pub fn try_next(&self) -> Option<OverlayEvent> {
        self.rx.try_recv().ok()
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}
