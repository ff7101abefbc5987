//! GDI painting for the overlay window: toolbar strip plus backdrop

use overlay::{BackdropSlot, ToolbarLayout};
use std::mem::size_of;
use windows::Win32::Foundation::{COLORREF, HWND, RECT};
use windows::Win32::Graphics::Gdi::{
    BeginPaint, CreateSolidBrush, DeleteObject, DrawTextW, EndPaint, FillRect, GetClientRect,
    SetBkMode, SetDIBitsToDevice, SetTextColor, BITMAPINFO, BITMAPINFOHEADER, BI_RGB,
    DIB_RGB_COLORS, DT_CENTER, DT_SINGLELINE, DT_VCENTER, HDC, PAINTSTRUCT, TRANSPARENT,
};

const STRIP_COLOR: COLORREF = COLORREF(0x00302B2B);
const BUTTON_COLOR: COLORREF = COLORREF(0x00483F3F);
const GLYPH_COLOR: COLORREF = COLORREF(0x00F0F0F0);
/// Shown under the web view until the first backdrop lands
const EMPTY_COLOR: COLORREF = COLORREF(0x00202020);

pub struct OverlayRenderer {
    backdrop: BackdropSlot,
    strip_height: u32,
}

impl OverlayRenderer {
    pub fn new(backdrop: BackdropSlot, strip_height: u32) -> Self {
        Self {
            backdrop,
            strip_height,
        }
    }

    pub fn render(&self, hwnd: HWND) {
        unsafe {
            let mut ps = PAINTSTRUCT::default();
            let hdc = BeginPaint(hwnd, &mut ps);

            let mut client = RECT::default();
            if GetClientRect(hwnd, &mut client).is_ok() {
                self.draw_strip(hdc, &client);
                self.draw_backdrop(hdc, &client);
            }

            let _ = EndPaint(hwnd, &ps);
        }
    }

    unsafe fn draw_strip(&self, hdc: HDC, client: &RECT) {
        let strip = RECT {
            bottom: self.strip_height as i32,
            ..*client
        };
        fill(hdc, &strip, STRIP_COLOR);

        SetBkMode(hdc, TRANSPARENT);
        SetTextColor(hdc, GLYPH_COLOR);

        let width = (client.right - client.left).max(0) as u32;
        let layout = ToolbarLayout::new(width, self.strip_height);
        for (button, rect) in layout.buttons() {
            let mut cell = RECT {
                left: rect.x,
                top: rect.y,
                right: rect.right(),
                bottom: rect.bottom(),
            };
            fill(hdc, &cell, BUTTON_COLOR);

            let mut glyph: Vec<u16> = button.glyph().encode_utf16().collect();
            DrawTextW(
                hdc,
                &mut glyph,
                &mut cell,
                DT_CENTER | DT_VCENTER | DT_SINGLELINE,
            );
        }
    }

    /// Blit the backdrop into the content area; the slot lock is held only
    /// for the duration of the copy
    unsafe fn draw_backdrop(&self, hdc: HDC, client: &RECT) {
        let top = self.strip_height as i32;
        let drawn = self.backdrop.with(|backdrop| {
            let Some(backdrop) = backdrop else {
                return false;
            };
            let frame = &backdrop.frame;

            let bmi = BITMAPINFO {
                bmiHeader: BITMAPINFOHEADER {
                    biSize: size_of::<BITMAPINFOHEADER>() as u32,
                    biWidth: frame.width as i32,
                    biHeight: -(frame.height as i32),
                    biPlanes: 1,
                    biBitCount: 32,
                    biCompression: BI_RGB.0,
                    ..Default::default()
                },
                bmiColors: [Default::default()],
            };

            SetDIBitsToDevice(
                hdc,
                0,
                top,
                frame.width,
                frame.height,
                0,
                0,
                0,
                frame.height,
                frame.data.as_ptr() as *const _,
                &bmi,
                DIB_RGB_COLORS,
            );
            true
        });

        if !drawn {
            let content = RECT { top, ..*client };
            fill(hdc, &content, EMPTY_COLOR);
        }
    }
}

unsafe fn fill(hdc: HDC, rect: &RECT, color: COLORREF) {
    let brush = CreateSolidBrush(color);
    FillRect(hdc, rect, brush);
    let _ = DeleteObject(brush);
}
