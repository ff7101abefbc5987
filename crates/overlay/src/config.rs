//! Overlay configuration
//!
//! Read once at startup; every field has a default so a partial TOML file
//! (or none at all) works.

use crate::geometry::{Point, Size, SizeBounds};
use crate::{OverlayError, OverlayResult};
use capture::Rect;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OverlayConfig {
    /// Top-left of the window at startup and after a reset
    pub initial_position: Point,
    pub initial_size: Size,
    pub min_size: Size,
    pub max_size: Option<Size>,
    /// Height of the draggable toolbar strip at the top of the window
    pub strip_height: u32,
    /// Distance from a strip border that counts as a resize handle
    pub edge_margin: u32,
    pub hide_duration_ms: u64,
    /// Loaded into the embedded surface once at startup
    pub url: String,
    /// Constant window alpha, in (0, 1]
    pub opacity: f32,
    /// Period of the topmost re-assertion; 0 disables it
    pub keep_on_top_interval_ms: u64,
    /// Write each captured backdrop to this image file
    pub backdrop_dump: Option<PathBuf>,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            initial_position: Point::new(1950, 400),
            initial_size: Size::new(600, 535),
            min_size: Size::new(300, 200),
            max_size: None,
            strip_height: 32,
            edge_margin: 10,
            hide_duration_ms: 2000,
            url: "http://localhost:5173".to_string(),
            opacity: 0.9,
            keep_on_top_interval_ms: 5000,
            backdrop_dump: None,
        }
    }
}

impl OverlayConfig {
    /// Parse a TOML file and validate it
    pub fn load(path: &Path) -> OverlayResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> OverlayResult<Self> {
        let config: OverlayConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> OverlayResult<()> {
        let min = self.min_size;
        if min.width == 0 || min.height == 0 {
            return Err(OverlayError::Config("min_size must be non-zero".into()));
        }

        if let Some(max) = self.max_size {
            if max.width < min.width || max.height < min.height {
                return Err(OverlayError::Config(format!(
                    "max_size {}x{} is smaller than min_size {}x{}",
                    max.width, max.height, min.width, min.height
                )));
            }
        }

        let bounds = self.size_bounds();
        let initial = self.initial_size;
        if !bounds.admits(initial.width as i64, initial.height as i64) {
            return Err(OverlayError::Config(format!(
                "initial_size {}x{} is outside the size bounds",
                initial.width, initial.height
            )));
        }

        if self.strip_height >= min.height {
            return Err(OverlayError::Config(format!(
                "strip_height {} leaves no content area at min_size height {}",
                self.strip_height, min.height
            )));
        }

        if !(self.opacity > 0.0 && self.opacity <= 1.0) {
            return Err(OverlayError::Config(format!(
                "opacity {} must be in (0, 1]",
                self.opacity
            )));
        }

        if self.url.trim().is_empty() {
            return Err(OverlayError::Config("url must not be empty".into()));
        }

        Ok(())
    }

    /// The reset geometry
    pub fn default_rect(&self) -> Rect {
        Rect::new(
            self.initial_position.x,
            self.initial_position.y,
            self.initial_size.width,
            self.initial_size.height,
        )
    }

    pub fn size_bounds(&self) -> SizeBounds {
        SizeBounds::new(self.min_size, self.max_size)
    }

    pub fn hide_duration(&self) -> Duration {
        Duration::from_millis(self.hide_duration_ms)
    }

    pub fn keep_on_top_interval(&self) -> Option<Duration> {
        (self.keep_on_top_interval_ms > 0)
            .then(|| Duration::from_millis(self.keep_on_top_interval_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = OverlayConfig::default();
        config.validate().unwrap();
        assert_eq!(config.default_rect(), Rect::new(1950, 400, 600, 535));
        assert_eq!(config.hide_duration(), Duration::from_millis(2000));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = OverlayConfig::from_toml(
            r#"
            url = "http://127.0.0.1:8080"
            hide_duration_ms = 500
            initial_position = { x = 10, y = 20 }
            max_size = { width = 1200, height = 1200 }
            "#,
        )
        .unwrap();

        assert_eq!(config.url, "http://127.0.0.1:8080");
        assert_eq!(config.hide_duration(), Duration::from_millis(500));
        assert_eq!(config.default_rect(), Rect::new(10, 20, 600, 535));
        assert_eq!(config.max_size, Some(Size::new(1200, 1200)));
        assert_eq!(config.strip_height, 32);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = OverlayConfig::from_toml("colour = \"red\"").unwrap_err();
        assert!(matches!(err, OverlayError::ConfigParse(_)));
    }

    #[test]
    fn initial_size_below_minimum_is_rejected() {
        let config = OverlayConfig {
            initial_size: Size::new(100, 535),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(OverlayError::Config(_))));
    }

    #[test]
    fn strip_must_leave_content() {
        let config = OverlayConfig {
            strip_height: 200,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn max_below_min_is_rejected() {
        let config = OverlayConfig {
            max_size: Some(Size::new(250, 1000)),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn opacity_range() {
        for opacity in [0.0, -0.5, 1.5, f32::NAN] {
            let config = OverlayConfig {
                opacity,
                ..Default::default()
            };
            assert!(config.validate().is_err(), "opacity {opacity} accepted");
        }
    }

    #[test]
    fn keep_on_top_can_be_disabled() {
        let config = OverlayConfig {
            keep_on_top_interval_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.keep_on_top_interval(), None);
    }
}
