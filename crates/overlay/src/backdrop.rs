//! Backdrop synchronization
//!
//! Captures the desktop under the content area and hands the pixels to the
//! paint path. This is what makes the window look transparent.

use capture::{Frame, Rect, ScreenCapture};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

/// Desktop pixels for one content-area rectangle
#[derive(Debug, Clone)]
pub struct Backdrop {
    /// Screen-space rectangle the pixels were taken from
    pub region: Rect,
    pub frame: Frame,
}

/// Shared slot the painter reads the latest backdrop from.
///
/// The synchronizer swaps a whole `Backdrop` in; the painter only ever holds
/// the lock for the duration of one blit.
#[derive(Debug, Clone, Default)]
pub struct BackdropSlot(Arc<Mutex<Option<Backdrop>>>);

impl BackdropSlot {
    pub fn new() -> Self {
        Self::default()
    }

    fn install(&self, backdrop: Backdrop) {
        *self.0.lock() = Some(backdrop);
    }

    /// Run `f` against the installed backdrop, if any
    pub fn with<R>(&self, f: impl FnOnce(Option<&Backdrop>) -> R) -> R {
        let guard = self.0.lock();
        f(guard.as_ref())
    }

    /// Region of the installed backdrop
    pub fn region(&self) -> Option<Rect> {
        self.0.lock().as_ref().map(|b| b.region)
    }
}

/// What a sync attempt did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Fresh pixels installed for this region
    Installed(Rect),
    /// Content area had no area; nothing captured
    Skipped,
    /// Capture failed; the previous backdrop stays up
    Failed,
}

pub struct BackdropSynchronizer<C> {
    capture: C,
    slot: BackdropSlot,
    /// Region of the last successful install, cleared by `invalidate`
    synced: Option<Rect>,
    dump_path: Option<PathBuf>,
}

impl<C: ScreenCapture> BackdropSynchronizer<C> {
    pub fn new(capture: C, slot: BackdropSlot) -> Self {
        Self {
            capture,
            slot,
            synced: None,
            dump_path: None,
        }
    }

    /// Also write every installed backdrop to `path`
    pub fn with_dump_path(mut self, path: Option<PathBuf>) -> Self {
        self.dump_path = path;
        self
    }

    pub fn slot(&self) -> &BackdropSlot {
        &self.slot
    }

    pub fn capture_mut(&mut self) -> &mut C {
        &mut self.capture
    }

    /// Whether the installed backdrop was taken for exactly `content` and is
    /// still considered fresh
    pub fn is_current(&self, content: Rect) -> bool {
        self.synced == Some(content)
    }

    /// Mark the installed backdrop stale (the desktop may have changed)
    pub fn invalidate(&mut self) {
        self.synced = None;
    }

    /// Capture `content` (screen space) and install it
    pub fn sync(&mut self, content: Rect) -> SyncOutcome {
        if content.is_empty() {
            debug!(?content, "degenerate content area, backdrop not captured");
            self.synced = None;
            return SyncOutcome::Skipped;
        }

        let frame = match self.capture.capture(content) {
            Ok(frame) => frame.into_opaque(),
            Err(e) => {
                warn!(error = %e, ?content, "backdrop capture failed, keeping previous backdrop");
                self.synced = None;
                return SyncOutcome::Failed;
            }
        };

        if let Some(path) = &self.dump_path {
            if let Err(e) = frame.save(path) {
                warn!(error = %e, path = %path.display(), "failed to write backdrop image");
            }
        }

        self.slot.install(Backdrop {
            region: content,
            frame,
        });
        self.synced = Some(content);
        debug!(?content, "backdrop installed");
        SyncOutcome::Installed(content)
    }
}
