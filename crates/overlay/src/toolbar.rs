//! Toolbar strip button layout

use crate::event::Command;
use crate::geometry::Point;
use capture::Rect;

const BUTTON_SIZE: u32 = 24;
const BUTTON_SPACING: i32 = 4;
const RIGHT_PADDING: i32 = 8;

/// Buttons shown in the strip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolbarButton {
    Refresh,
    Reset,
    Hide,
    Close,
}

impl ToolbarButton {
    /// Left-to-right order
    pub const ALL: [ToolbarButton; 4] = [
        ToolbarButton::Refresh,
        ToolbarButton::Reset,
        ToolbarButton::Hide,
        ToolbarButton::Close,
    ];

    pub fn command(&self) -> Command {
        match self {
            ToolbarButton::Refresh => Command::Refresh,
            ToolbarButton::Reset => Command::Reset,
            ToolbarButton::Hide => Command::HideTemporarily,
            ToolbarButton::Close => Command::Close,
        }
    }

    /// Label drawn on the button face
    pub fn glyph(&self) -> &'static str {
        match self {
            ToolbarButton::Refresh => "↻",
            ToolbarButton::Reset => "⌂",
            ToolbarButton::Hide => "–",
            ToolbarButton::Close => "×",
        }
    }
}

/// Button rectangles for a strip of a given width, in window-local pixels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolbarLayout {
    buttons: Vec<(ToolbarButton, Rect)>,
}

impl ToolbarLayout {
    /// Right-aligned, vertically centered. Buttons that would not fit are
    /// left out, starting from the leftmost.
    pub fn new(strip_width: u32, strip_height: u32) -> Self {
        let size = BUTTON_SIZE.min(strip_height);
        let y = (strip_height - size) as i32 / 2;

        let mut buttons = Vec::with_capacity(ToolbarButton::ALL.len());
        let mut right = strip_width as i32 - RIGHT_PADDING;
        for button in ToolbarButton::ALL.iter().rev() {
            let x = right - size as i32;
            if x < 0 {
                break;
            }
            buttons.push((*button, Rect::new(x, y, size, size)));
            right = x - BUTTON_SPACING;
        }
        buttons.reverse();

        Self { buttons }
    }

    pub fn buttons(&self) -> &[(ToolbarButton, Rect)] {
        &self.buttons
    }

    pub fn hit_test(&self, local: Point) -> Option<ToolbarButton> {
        self.buttons
            .iter()
            .find(|(_, rect)| rect.contains(local.x, local.y))
            .map(|(button, _)| *button)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lays_out_from_the_right() {
        let layout = ToolbarLayout::new(600, 32);
        let rects: Vec<_> = layout.buttons().iter().map(|(b, r)| (*b, *r)).collect();
        assert_eq!(
            rects,
            vec![
                (ToolbarButton::Refresh, Rect::new(484, 4, 24, 24)),
                (ToolbarButton::Reset, Rect::new(512, 4, 24, 24)),
                (ToolbarButton::Hide, Rect::new(540, 4, 24, 24)),
                (ToolbarButton::Close, Rect::new(568, 4, 24, 24)),
            ]
        );
    }

    #[test]
    fn hit_test_finds_button() {
        let layout = ToolbarLayout::new(600, 32);
        assert_eq!(layout.hit_test(Point::new(570, 10)), Some(ToolbarButton::Close));
        assert_eq!(layout.hit_test(Point::new(490, 20)), Some(ToolbarButton::Refresh));
        assert_eq!(layout.hit_test(Point::new(538, 20)), None);
        assert_eq!(layout.hit_test(Point::new(300, 16)), None);
    }

    #[test]
    fn narrow_strip_drops_leftmost_buttons() {
        let layout = ToolbarLayout::new(60, 32);
        let kinds: Vec<_> = layout.buttons().iter().map(|(b, _)| *b).collect();
        assert_eq!(kinds, vec![ToolbarButton::Hide, ToolbarButton::Close]);
    }

    #[test]
    fn short_strip_shrinks_buttons() {
        let layout = ToolbarLayout::new(600, 16);
        assert!(layout.buttons().iter().all(|(_, r)| r.height == 16 && r.y == 0));
    }

    #[test]
    fn commands() {
        assert_eq!(ToolbarButton::Hide.command(), Command::HideTemporarily);
        assert_eq!(ToolbarButton::Refresh.command(), Command::Refresh);
    }
}
