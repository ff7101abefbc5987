//! Window geometry model
//!
//! Pure functions that turn gesture input into window rectangles. Nothing in
//! here touches the window system.

use capture::Rect;
use serde::Deserialize;
use std::ops::{BitOr, Sub};

/// Point in screen or window-local pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Top-left corner of a rectangle
    pub fn origin_of(rect: &Rect) -> Self {
        Self::new(rect.x, rect.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Width and height in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn of(rect: &Rect) -> Self {
        Self::new(rect.width, rect.height)
    }
}

/// Set of rectangle edges moved by a resize
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Edges {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

impl Edges {
    pub const NONE: Edges = Edges {
        top: false,
        bottom: false,
        left: false,
        right: false,
    };
    pub const TOP: Edges = Edges { top: true, ..Edges::NONE };
    pub const BOTTOM: Edges = Edges { bottom: true, ..Edges::NONE };
    pub const LEFT: Edges = Edges { left: true, ..Edges::NONE };
    pub const RIGHT: Edges = Edges { right: true, ..Edges::NONE };
    pub const TOP_LEFT: Edges = Edges { top: true, left: true, ..Edges::NONE };
    pub const TOP_RIGHT: Edges = Edges { top: true, right: true, ..Edges::NONE };
    pub const BOTTOM_LEFT: Edges = Edges { bottom: true, left: true, ..Edges::NONE };
    pub const BOTTOM_RIGHT: Edges = Edges { bottom: true, right: true, ..Edges::NONE };

    /// Number of edges in the set
    pub fn len(&self) -> usize {
        [self.top, self.bottom, self.left, self.right]
            .iter()
            .filter(|&&e| e)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Two adjacent edges, i.e. a corner handle
    pub fn is_corner(&self) -> bool {
        self.len() == 2 && (self.top ^ self.bottom) && (self.left ^ self.right)
    }
}

impl BitOr for Edges {
    type Output = Edges;

    fn bitor(self, rhs: Edges) -> Edges {
        Edges {
            top: self.top || rhs.top,
            bottom: self.bottom || rhs.bottom,
            left: self.left || rhs.left,
            right: self.right || rhs.right,
        }
    }
}

/// Minimum and optional maximum window size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeBounds {
    pub min: Size,
    pub max: Option<Size>,
}

impl SizeBounds {
    pub fn new(min: Size, max: Option<Size>) -> Self {
        Self { min, max }
    }

    /// Whether a (possibly negative) width/height pair is acceptable
    pub fn admits(&self, width: i64, height: i64) -> bool {
        if width < self.min.width as i64 || height < self.min.height as i64 {
            return false;
        }

        match self.max {
            Some(max) => width <= max.width as i64 && height <= max.height as i64,
            None => true,
        }
    }

    /// Pull a rectangle's size into bounds, keeping its top-left corner
    pub fn clamp(&self, rect: Rect) -> Rect {
        let mut width = rect.width.max(self.min.width);
        let mut height = rect.height.max(self.min.height);
        if let Some(max) = self.max {
            width = width.min(max.width);
            height = height.min(max.height);
        }
        Rect::new(rect.x, rect.y, width, height)
    }
}

/// Apply a pointer delta to the chosen edges of `start`.
///
/// Returns `None` when the result falls outside `bounds`; rejection covers
/// both axes, a candidate is never partially applied.
pub fn resized(start: Rect, edges: Edges, delta: Point, bounds: &SizeBounds) -> Option<Rect> {
    let mut left = start.x as i64;
    let mut top = start.y as i64;
    let mut right = start.right() as i64;
    let mut bottom = start.bottom() as i64;

    if edges.left {
        left += delta.x as i64;
    }
    if edges.right {
        right += delta.x as i64;
    }
    if edges.top {
        top += delta.y as i64;
    }
    if edges.bottom {
        bottom += delta.y as i64;
    }

    let width = right - left;
    let height = bottom - top;
    if !bounds.admits(width, height) {
        return None;
    }

    Some(Rect::new(left as i32, top as i32, width as u32, height as u32))
}

/// Same size as `start`, moved so its top-left sits at `top_left`
pub fn dragged(start: Rect, top_left: Point) -> Rect {
    Rect::new(top_left.x, top_left.y, start.width, start.height)
}

/// Screen-space area below the toolbar strip.
///
/// Height saturates at zero when the strip is at least as tall as the window.
pub fn content_area(window: Rect, strip_height: u32) -> Rect {
    let strip = strip_height.min(window.height);
    Rect::new(
        window.x,
        window.y + strip as i32,
        window.width,
        window.height - strip,
    )
}

/// The content area in window-local coordinates, where the embedded surface sits
pub fn local_content_area(window: Rect, strip_height: u32) -> Rect {
    let content = content_area(window, strip_height);
    Rect::new(0, content.y - window.y, content.width, content.height)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> SizeBounds {
        SizeBounds::new(Size::new(300, 200), None)
    }

    #[test]
    fn corner_resize_moves_top_left_only() {
        let start = Rect::new(1950, 400, 600, 535);
        let rect = resized(start, Edges::TOP_LEFT, Point::new(20, 20), &bounds()).unwrap();
        assert_eq!(rect, Rect::new(1970, 420, 580, 515));
    }

    #[test]
    fn right_edge_grows_width() {
        let start = Rect::new(0, 0, 400, 300);
        let rect = resized(start, Edges::RIGHT, Point::new(50, 99), &bounds()).unwrap();
        assert_eq!(rect, Rect::new(0, 0, 450, 300));
    }

    #[test]
    fn bottom_right_moves_both_far_edges() {
        let start = Rect::new(10, 10, 400, 300);
        let rect = resized(start, Edges::BOTTOM_RIGHT, Point::new(-30, 40), &bounds()).unwrap();
        assert_eq!(rect, Rect::new(10, 10, 370, 340));
    }

    #[test]
    fn shrinking_below_minimum_is_rejected() {
        let start = Rect::new(0, 0, 320, 600);
        assert_eq!(resized(start, Edges::RIGHT, Point::new(-21, 0), &bounds()), None);
        // exactly at the minimum is fine
        assert!(resized(start, Edges::RIGHT, Point::new(-20, 0), &bounds()).is_some());
    }

    #[test]
    fn inverted_rect_is_rejected() {
        let start = Rect::new(0, 0, 400, 400);
        assert_eq!(resized(start, Edges::LEFT, Point::new(900, 0), &bounds()), None);
    }

    #[test]
    fn maximum_is_enforced() {
        let bounds = SizeBounds::new(Size::new(300, 200), Some(Size::new(1200, 1200)));
        let start = Rect::new(0, 0, 1190, 500);
        assert_eq!(resized(start, Edges::RIGHT, Point::new(11, 0), &bounds), None);
        assert!(resized(start, Edges::RIGHT, Point::new(10, 0), &bounds).is_some());
    }

    #[test]
    fn clamp_keeps_origin() {
        let bounds = SizeBounds::new(Size::new(300, 200), Some(Size::new(800, 800)));
        assert_eq!(
            bounds.clamp(Rect::new(5, 6, 100, 900)),
            Rect::new(5, 6, 300, 800)
        );
    }

    #[test]
    fn drag_keeps_size() {
        let start = Rect::new(1950, 400, 600, 535);
        assert_eq!(
            dragged(start, Point::new(2050, 400)),
            Rect::new(2050, 400, 600, 535)
        );
    }

    #[test]
    fn content_area_excludes_strip() {
        let window = Rect::new(100, 50, 600, 535);
        assert_eq!(content_area(window, 32), Rect::new(100, 82, 600, 503));
        assert_eq!(local_content_area(window, 32), Rect::new(0, 32, 600, 503));
    }

    #[test]
    fn content_area_saturates() {
        let window = Rect::new(0, 0, 300, 20);
        assert!(content_area(window, 32).is_empty());
    }

    #[test]
    fn edge_sets() {
        assert!(Edges::TOP_LEFT.is_corner());
        assert!(!Edges::TOP.is_corner());
        assert!(!(Edges::TOP | Edges::BOTTOM).is_corner());
        assert_eq!(Edges::TOP | Edges::LEFT, Edges::TOP_LEFT);
        assert!(Edges::NONE.is_empty());
    }
}
