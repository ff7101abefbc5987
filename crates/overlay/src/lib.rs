//! Geometry and pseudo-transparency engine for the backdrop overlay
//!
//! Tracks drag/resize gestures on an undecorated window, turns them into
//! window geometry, and keeps a captured desktop backdrop in step with that
//! geometry. Platform code plugs in through `WindowHost`, `EmbeddedSurface`
//! and `capture::ScreenCapture`.

pub mod backdrop;
pub mod config;
pub mod controller;
pub mod event;
pub mod geometry;
pub mod gesture;
pub mod host;
pub mod navigation;
pub mod timer;
pub mod toolbar;

pub use backdrop::{Backdrop, BackdropSlot, BackdropSynchronizer, SyncOutcome};
pub use config::OverlayConfig;
pub use controller::{OverlayController, WindowState};
pub use event::{Command, EventQueue, EventSender, OverlayEvent};
pub use geometry::{Edges, Point, Size, SizeBounds};
pub use gesture::{classify, cursor_hint, CursorHint, GestureMode, GestureTracker};
pub use host::{EmbeddedSurface, WindowHost};
pub use navigation::{NavigationDecision, NavigationPolicy};
pub use timer::TimerKind;
pub use toolbar::{ToolbarButton, ToolbarLayout};

pub use capture::Rect;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OverlayError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Embedded surface error: {0}")]
    Surface(String),
}

pub type OverlayResult<T> = Result<T, OverlayError>;
