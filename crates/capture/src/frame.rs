//! Captured pixel buffers

use crate::{CaptureError, CaptureResult};
use image::{ImageBuffer, RgbImage};
use std::path::Path;
use tracing::debug;

/// Top-down 32-bit BGRA pixels, the layout GDI hands back and blits from
#[derive(Debug, Clone)]
pub struct Frame {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl Frame {
    /// Wrap a raw BGRA buffer, checking that its length matches the dimensions
    pub fn from_bgra(width: u32, height: u32, data: Vec<u8>) -> CaptureResult<Self> {
        if width == 0 || height == 0 {
            return Err(CaptureError::EmptyRegion { width, height });
        }

        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(CaptureError::BufferSize {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Solid-colour frame, handy as a placeholder and in tests
    pub fn filled(width: u32, height: u32, bgra: [u8; 4]) -> CaptureResult<Self> {
        let data = bgra.repeat(width as usize * height as usize);
        Self::from_bgra(width, height, data)
    }

    /// Force every alpha byte to 255.
    ///
    /// Screen DCs leave the alpha channel undefined (usually zero), which a
    /// layered window would treat as fully transparent.
    pub fn into_opaque(mut self) -> Self {
        for px in self.data.chunks_exact_mut(4) {
            px[3] = 0xFF;
        }
        self
    }

    /// Whether every pixel already has full alpha
    pub fn is_opaque(&self) -> bool {
        self.data.chunks_exact(4).all(|px| px[3] == 0xFF)
    }

    /// Drop the alpha channel and reorder to RGB
    pub fn to_rgb_image(&self) -> RgbImage {
        let mut rgb = Vec::with_capacity(self.width as usize * self.height as usize * 3);
        for px in self.data.chunks_exact(4) {
            rgb.extend_from_slice(&[px[2], px[1], px[0]]);
        }

        // Length is guaranteed by from_bgra
        ImageBuffer::from_raw(self.width, self.height, rgb).unwrap_or_default()
    }

    /// Save as an image file; the format follows the path extension
    pub fn save(&self, path: &Path) -> CaptureResult<()> {
        self.to_rgb_image().save(path)?;
        debug!(path = %path.display(), width = self.width, height = self.height, "frame saved");
        Ok(())
    }
}
