//! Drag/resize gesture handling for the undecorated window
//!
//! `classify` decides what a pointer-down inside the toolbar strip means;
//! `GestureTracker` follows the resulting gesture until pointer-up.

use crate::geometry::{self, Edges, Point, Size, SizeBounds};
use capture::Rect;
use tracing::debug;

/// What a gesture does to the window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureMode {
    None,
    Drag,
    Resize(Edges),
}

/// Cursor shape to advertise while hovering or dragging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorHint {
    #[default]
    Arrow,
    Move,
    Horizontal,
    Vertical,
    /// Top-left / bottom-right diagonal
    DiagonalNwSe,
    /// Top-right / bottom-left diagonal
    DiagonalNeSw,
}

/// Classify a strip-local pointer position.
///
/// Corners are checked before single edges, so a pointer inside the margin
/// of two adjacent sides always yields a diagonal resize.
pub fn classify(pos: Point, strip: Size, edge_margin: u32) -> GestureMode {
    let width = strip.width as i32;
    let height = strip.height as i32;
    if pos.x < 0 || pos.y < 0 || pos.x >= width || pos.y >= height {
        return GestureMode::None;
    }

    let margin = edge_margin as i32;
    let left = pos.x <= margin;
    let right = pos.x >= width - margin;
    let top = pos.y <= margin;
    let bottom = pos.y >= height - margin;

    let edges = match (left, right, top, bottom) {
        (true, _, true, _) => Edges::TOP_LEFT,
        (_, true, true, _) => Edges::TOP_RIGHT,
        (true, _, _, true) => Edges::BOTTOM_LEFT,
        (_, true, _, true) => Edges::BOTTOM_RIGHT,
        (true, _, _, _) => Edges::LEFT,
        (_, true, _, _) => Edges::RIGHT,
        (_, _, true, _) => Edges::TOP,
        (_, _, _, true) => Edges::BOTTOM,
        _ => return GestureMode::Drag,
    };

    GestureMode::Resize(edges)
}

/// Advisory cursor for a classified zone
pub fn cursor_hint(mode: GestureMode) -> CursorHint {
    match mode {
        GestureMode::None => CursorHint::Arrow,
        GestureMode::Drag => CursorHint::Move,
        GestureMode::Resize(edges) => match edges {
            Edges::TOP_LEFT | Edges::BOTTOM_RIGHT => CursorHint::DiagonalNwSe,
            Edges::TOP_RIGHT | Edges::BOTTOM_LEFT => CursorHint::DiagonalNeSw,
            Edges::LEFT | Edges::RIGHT => CursorHint::Horizontal,
            Edges::TOP | Edges::BOTTOM => CursorHint::Vertical,
            _ => CursorHint::Arrow,
        },
    }
}

/// Captured once at pointer-down, never modified afterwards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureSnapshot {
    /// Pointer offset from the window origin for drags, the absolute pointer
    /// position for resizes
    pub anchor: Point,
    pub start_rect: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GestureState {
    Idle,
    Armed {
        mode: GestureMode,
        snapshot: GestureSnapshot,
    },
}

/// Idle → Armed(mode, snapshot) → Idle
#[derive(Debug)]
pub struct GestureTracker {
    state: GestureState,
    edge_margin: u32,
}

impl GestureTracker {
    pub fn new(edge_margin: u32) -> Self {
        Self {
            state: GestureState::Idle,
            edge_margin,
        }
    }

    /// Current mode, `None` while idle
    pub fn mode(&self) -> GestureMode {
        match self.state {
            GestureState::Idle => GestureMode::None,
            GestureState::Armed { mode, .. } => mode,
        }
    }

    pub fn snapshot(&self) -> Option<GestureSnapshot> {
        match self.state {
            GestureState::Idle => None,
            GestureState::Armed { snapshot, .. } => Some(snapshot),
        }
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.state, GestureState::Armed { .. })
    }

    /// Classify zone at `local` and arm if it is a drag or resize zone.
    ///
    /// `local` is relative to the strip, `global` is the same pointer in
    /// screen coordinates.
    pub fn pointer_down(
        &mut self,
        local: Point,
        global: Point,
        strip: Size,
        current: Rect,
    ) -> GestureMode {
        let mode = classify(local, strip, self.edge_margin);
        let anchor = match mode {
            GestureMode::None => {
                self.state = GestureState::Idle;
                return mode;
            }
            GestureMode::Drag => global - Point::origin_of(&current),
            GestureMode::Resize(_) => global,
        };

        debug!(?mode, ?anchor, ?current, "gesture armed");
        self.state = GestureState::Armed {
            mode,
            snapshot: GestureSnapshot {
                anchor,
                start_rect: current,
            },
        };
        mode
    }

    /// Candidate geometry for the pointer at `global`.
    ///
    /// `None` means leave the window where it is: idle, rejected by `bounds`,
    /// or the button was released without a pointer-up reaching us (which
    /// also ends the gesture).
    pub fn pointer_move(
        &mut self,
        global: Point,
        primary_held: bool,
        bounds: &SizeBounds,
    ) -> Option<Rect> {
        let GestureState::Armed { mode, snapshot } = self.state else {
            return None;
        };

        if !primary_held {
            self.state = GestureState::Idle;
            return None;
        }

        match mode {
            GestureMode::Drag => Some(geometry::dragged(
                snapshot.start_rect,
                global - snapshot.anchor,
            )),
            GestureMode::Resize(edges) => {
                let delta = global - snapshot.anchor;
                let rect = geometry::resized(snapshot.start_rect, edges, delta, bounds);
                if rect.is_none() {
                    debug!(?edges, ?delta, "resize rejected by size bounds");
                }
                rect
            }
            GestureMode::None => None,
        }
    }

    /// End the gesture, whatever state it is in
    pub fn pointer_up(&mut self) {
        self.state = GestureState::Idle;
    }
}
