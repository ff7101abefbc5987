//! Desktop region capture for the backdrop overlay
//!
//! Provides the shared `Rect` type, the `ScreenCapture` capability and a
//! GDI-backed implementation on Windows.

pub mod frame;
#[cfg(windows)]
pub mod gdi;

pub use frame::Frame;
#[cfg(windows)]
pub use gdi::GdiCapture;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[cfg(windows)]
    #[error("Windows API error: {0}")]
    Windows(#[from] windows::core::Error),

    #[error("GDI error: {0}")]
    Gdi(String),

    #[error("Capture region is empty ({width}x{height})")]
    EmptyRegion { width: u32, height: u32 },

    #[error("Pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("Capture not supported on this platform")]
    NotSupported,

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type CaptureResult<T> = Result<T, CaptureError>;

/// Rectangle in physical screen pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Something that can grab the desktop pixels inside a screen rectangle.
///
/// Implementations are called inline on the UI thread, potentially at the
/// window's resize-event frequency, so they must return promptly.
pub trait ScreenCapture {
    fn capture(&mut self, region: Rect) -> CaptureResult<Frame>;
}

impl<T: ScreenCapture + ?Sized> ScreenCapture for Box<T> {
    fn capture(&mut self, region: Rect) -> CaptureResult<Frame> {
        (**self).capture(region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_edges() {
        let rect = Rect::new(1950, 400, 600, 535);
        assert_eq!(rect.right(), 2550);
        assert_eq!(rect.bottom(), 935);
    }

    #[test]
    fn contains_is_half_open() {
        let rect = Rect::new(0, 0, 10, 10);
        assert!(rect.contains(0, 0));
        assert!(rect.contains(9, 9));
        assert!(!rect.contains(10, 5));
        assert!(!rect.contains(5, -1));
    }

    #[test]
    fn empty_when_any_dimension_is_zero() {
        assert!(Rect::new(5, 5, 0, 10).is_empty());
        assert!(Rect::new(5, 5, 10, 0).is_empty());
        assert!(!Rect::new(5, 5, 1, 1).is_empty());
    }
}
