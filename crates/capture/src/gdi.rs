//! Desktop region grab using GDI

use crate::{CaptureError, CaptureResult, Frame, Rect, ScreenCapture};
use windows::Win32::Graphics::Gdi::{
    BitBlt, CreateCompatibleBitmap, CreateCompatibleDC, DeleteDC, DeleteObject, GetDC,
    GetDIBits, ReleaseDC, SelectObject, BITMAPINFO, BITMAPINFOHEADER, BI_RGB, CAPTUREBLT,
    DIB_RGB_COLORS, ROP_CODE, SRCCOPY,
};
use tracing::trace;

/// Copies screen pixels through a memory DC.
///
/// Windows that opted out of capture (`WDA_EXCLUDEFROMCAPTURE`) are skipped
/// by the blit, which is what lets the overlay grab what lies beneath itself.
#[derive(Debug, Default)]
pub struct GdiCapture;

impl GdiCapture {
    pub fn new() -> Self {
        Self
    }
}

impl ScreenCapture for GdiCapture {
    fn capture(&mut self, region: Rect) -> CaptureResult<Frame> {
        if region.is_empty() {
            return Err(CaptureError::EmptyRegion {
                width: region.width,
                height: region.height,
            });
        }

        let width = region.width as i32;
        let height = region.height as i32;

        unsafe {
            let screen_dc = GetDC(None);
            if screen_dc.is_invalid() {
                return Err(CaptureError::Gdi("Failed to get screen DC".into()));
            }

            let mem_dc = CreateCompatibleDC(screen_dc);
            let bitmap = CreateCompatibleBitmap(screen_dc, width, height);
            if mem_dc.is_invalid() || bitmap.is_invalid() {
                if !bitmap.is_invalid() {
                    let _ = DeleteObject(bitmap);
                }
                if !mem_dc.is_invalid() {
                    let _ = DeleteDC(mem_dc);
                }
                ReleaseDC(None, screen_dc);
                return Err(CaptureError::Gdi("Failed to create memory bitmap".into()));
            }
            let old_bitmap = SelectObject(mem_dc, bitmap);

            let blit = BitBlt(
                mem_dc,
                0,
                0,
                width,
                height,
                screen_dc,
                region.x,
                region.y,
                ROP_CODE(SRCCOPY.0 | CAPTUREBLT.0),
            );

            // Top-down 32bpp, same layout SetDIBitsToDevice expects later
            let mut bmi = BITMAPINFO {
                bmiHeader: BITMAPINFOHEADER {
                    biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
                    biWidth: width,
                    biHeight: -height,
                    biPlanes: 1,
                    biBitCount: 32,
                    biCompression: BI_RGB.0,
                    ..Default::default()
                },
                bmiColors: [Default::default()],
            };

            let mut data = vec![0u8; region.width as usize * region.height as usize * 4];
            let lines = if blit.is_ok() {
                GetDIBits(
                    mem_dc,
                    bitmap,
                    0,
                    region.height,
                    Some(data.as_mut_ptr() as *mut _),
                    &mut bmi,
                    DIB_RGB_COLORS,
                )
            } else {
                0
            };

            // Cleanup before reporting anything
            SelectObject(mem_dc, old_bitmap);
            let _ = DeleteObject(bitmap);
            let _ = DeleteDC(mem_dc);
            ReleaseDC(None, screen_dc);

            blit?;
            if lines != height {
                return Err(CaptureError::Gdi(format!(
                    "GetDIBits copied {lines} of {height} scan lines"
                )));
            }

            trace!(?region, "desktop region captured");
            Frame::from_bgra(region.width, region.height, data)
        }
    }
}
