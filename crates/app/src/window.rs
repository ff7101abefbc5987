//! Frameless layered overlay window
//!
//! The window procedure never calls into the controller directly. It posts an
//! `OverlayEvent` and then drains the queue if the controller is free. Calls
//! the controller makes back into Win32 (`SetWindowPos`, `ShowWindow`) send
//! messages synchronously; those find the controller borrowed, leave their
//! event queued, and the outer drain handles it next.

use crate::render::OverlayRenderer;
use crate::webview::WebSurface;
use capture::GdiCapture;
use once_cell::sync::OnceCell;
use overlay::geometry::{self, Point};
use overlay::{
    BackdropSlot, Command, CursorHint, EventSender, NavigationPolicy, OverlayConfig,
    OverlayController, OverlayEvent, Rect, SizeBounds, TimerKind, WindowHost,
};
use std::cell::{Cell, RefCell};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use windows::core::{w, PCWSTR};
use windows::Win32::Foundation::{
    COLORREF, HINSTANCE, HWND, LPARAM, LRESULT, POINT, RECT, WPARAM,
};
use windows::Win32::Graphics::Gdi::{ClientToScreen, InvalidateRect, UpdateWindow};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::Input::KeyboardAndMouse::{ReleaseCapture, SetCapture};
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, DispatchMessageW, GetMessageW,
    GetWindowRect, KillTimer, LoadCursorW, PostQuitMessage, RegisterClassExW, SetCursor,
    SetLayeredWindowAttributes, SetTimer, SetWindowDisplayAffinity, SetWindowPos, ShowWindow,
    TranslateMessage, CS_HREDRAW, CS_VREDRAW, HTCLIENT, HWND_TOPMOST, IDC_ARROW, IDC_SIZEALL,
    IDC_SIZENESW, IDC_SIZENS, IDC_SIZENWSE, IDC_SIZEWE, LWA_ALPHA, MINMAXINFO, MSG, SW_HIDE,
    SW_SHOWNOACTIVATE, SWP_NOACTIVATE, SWP_NOMOVE, SWP_NOSIZE, SWP_NOZORDER,
    WDA_EXCLUDEFROMCAPTURE, WINDOWPOS, WM_CLOSE, WM_DESTROY, WM_ERASEBKGND, WM_GETMINMAXINFO,
    WM_LBUTTONDOWN, WM_LBUTTONUP, WM_MOUSEMOVE, WM_PAINT, WM_SETCURSOR, WM_TIMER,
    WM_WINDOWPOSCHANGED, WNDCLASSEXW, WS_CLIPCHILDREN, WS_EX_LAYERED, WS_EX_TOOLWINDOW,
    WS_EX_TOPMOST, WS_POPUP,
};

type Controller = OverlayController<Win32Host, WebSurface, GdiCapture>;

/// Posting end of the controller's queue, set once the controller exists
static EVENTS: OnceCell<EventSender> = OnceCell::new();

thread_local! {
    static CONTROLLER: RefCell<Option<Controller>> = RefCell::new(None);
    static RENDERER: RefCell<Option<OverlayRenderer>> = RefCell::new(None);
    static CURSOR: Cell<CursorHint> = Cell::new(CursorHint::Arrow);
    static SIZE_BOUNDS: Cell<Option<SizeBounds>> = Cell::new(None);
}

/// `WindowHost` over a real HWND
pub struct Win32Host {
    hwnd: HWND,
}

impl WindowHost for Win32Host {
    fn apply_geometry(&mut self, rect: Rect) {
        unsafe {
            if let Err(e) = SetWindowPos(
                self.hwnd,
                None,
                rect.x,
                rect.y,
                rect.width as i32,
                rect.height as i32,
                SWP_NOZORDER | SWP_NOACTIVATE,
            ) {
                warn!(error = %e, ?rect, "SetWindowPos failed");
            }
        }
    }

    fn show(&mut self) {
        unsafe {
            let _ = ShowWindow(self.hwnd, SW_SHOWNOACTIVATE);
            let _ = UpdateWindow(self.hwnd);
        }
    }

    fn hide(&mut self) {
        unsafe {
            let _ = ShowWindow(self.hwnd, SW_HIDE);
        }
    }

    fn set_cursor(&mut self, hint: CursorHint) {
        CURSOR.with(|c| c.set(hint));
        apply_cursor(hint);
    }

    fn schedule(&mut self, timer: TimerKind, after: Duration) {
        let millis = after.as_millis().min(u32::MAX as u128) as u32;
        unsafe {
            if SetTimer(self.hwnd, timer.id(), millis, None) == 0 {
                warn!(?timer, "SetTimer failed");
            }
        }
    }

    fn cancel(&mut self, timer: TimerKind) {
        unsafe {
            let _ = KillTimer(self.hwnd, timer.id());
        }
    }

    fn repaint(&mut self) {
        unsafe {
            let _ = InvalidateRect(self.hwnd, None, false);
            let _ = UpdateWindow(self.hwnd);
        }
    }

    fn raise_topmost(&mut self) {
        unsafe {
            let _ = SetWindowPos(
                self.hwnd,
                HWND_TOPMOST,
                0,
                0,
                0,
                0,
                SWP_NOMOVE | SWP_NOSIZE | SWP_NOACTIVATE,
            );
        }
    }

    fn close(&mut self) {
        unsafe {
            if let Err(e) = DestroyWindow(self.hwnd) {
                warn!(error = %e, "DestroyWindow failed");
            }
        }
    }
}

fn apply_cursor(hint: CursorHint) {
    let id = match hint {
        CursorHint::Arrow => IDC_ARROW,
        CursorHint::Move => IDC_SIZEALL,
        CursorHint::Horizontal => IDC_SIZEWE,
        CursorHint::Vertical => IDC_SIZENS,
        CursorHint::DiagonalNwSe => IDC_SIZENWSE,
        CursorHint::DiagonalNeSw => IDC_SIZENESW,
    };
    unsafe {
        if let Ok(cursor) = LoadCursorW(None, id) {
            SetCursor(cursor);
        }
    }
}

fn post(event: OverlayEvent) {
    if let Some(events) = EVENTS.get() {
        events.post(event);
    }
    drain();
}

fn drain() {
    CONTROLLER.with(|cell| {
        // Busy means we are inside the controller; the outer drain gets it
        let Ok(mut guard) = cell.try_borrow_mut() else {
            return;
        };
        if let Some(controller) = guard.as_mut() {
            controller.drain(Instant::now());
        }
    });
}

fn point_from_lparam(lparam: LPARAM) -> Point {
    let x = (lparam.0 & 0xFFFF) as i16 as i32;
    let y = ((lparam.0 >> 16) & 0xFFFF) as i16 as i32;
    Point::new(x, y)
}

unsafe fn to_screen(hwnd: HWND, local: Point) -> Point {
    let mut pt = POINT {
        x: local.x,
        y: local.y,
    };
    let _ = ClientToScreen(hwnd, &mut pt);
    Point::new(pt.x, pt.y)
}

/// Overlay window lifecycle
pub struct OverlayWindow;

impl OverlayWindow {
    const CLASS_NAME: PCWSTR = w!("BackdropOverlay");

    /// Create the window, start the controller and pump messages until closed
    pub fn run(config: OverlayConfig) -> anyhow::Result<()> {
        let rect = config.default_rect();
        let strip_height = config.strip_height;
        let slot = BackdropSlot::new();

        unsafe {
            let hmodule = GetModuleHandleW(None)?;
            let hinstance = HINSTANCE(hmodule.0);

            let wc = WNDCLASSEXW {
                cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
                style: CS_HREDRAW | CS_VREDRAW,
                lpfnWndProc: Some(Self::wnd_proc),
                hInstance: hinstance,
                hCursor: LoadCursorW(None, IDC_ARROW)?,
                lpszClassName: Self::CLASS_NAME,
                ..Default::default()
            };

            RegisterClassExW(&wc);

            SIZE_BOUNDS.with(|b| b.set(Some(config.size_bounds())));

            // Created hidden; the controller shows it once the first backdrop is in
            let hwnd = CreateWindowExW(
                WS_EX_TOPMOST | WS_EX_LAYERED | WS_EX_TOOLWINDOW,
                Self::CLASS_NAME,
                w!("Backdrop Overlay"),
                WS_POPUP | WS_CLIPCHILDREN,
                rect.x,
                rect.y,
                rect.width as i32,
                rect.height as i32,
                None,
                None,
                hinstance,
                None,
            )?;

            let alpha = (config.opacity * 255.0).round() as u8;
            SetLayeredWindowAttributes(hwnd, COLORREF(0), alpha, LWA_ALPHA)?;

            // Keeps our own pixels out of the backdrop grab
            if let Err(e) = SetWindowDisplayAffinity(hwnd, WDA_EXCLUDEFROMCAPTURE) {
                warn!(error = %e, "cannot exclude overlay from screen capture");
            }

            let surface = WebSurface::new(
                hwnd,
                geometry::local_content_area(rect, strip_height),
                NavigationPolicy::new(&config.url),
            )?;

            RENDERER.with(|r| {
                *r.borrow_mut() = Some(OverlayRenderer::new(slot.clone(), strip_height));
            });

            let controller = OverlayController::new(
                config,
                Win32Host { hwnd },
                surface,
                GdiCapture::new(),
                slot,
            )?;
            let _ = EVENTS.set(controller.sender());

            CONTROLLER.with(|c| {
                let mut guard = c.borrow_mut();
                let controller = guard.insert(controller);
                controller.start();
            });
            // Notifications raised during start
            drain();

            let mut msg = MSG::default();
            while GetMessageW(&mut msg, None, 0, 0).as_bool() {
                let _ = TranslateMessage(&msg);
                DispatchMessageW(&msg);
            }
        }

        CONTROLLER.with(|c| c.borrow_mut().take());
        RENDERER.with(|r| r.borrow_mut().take());
        info!("overlay closed");
        Ok(())
    }

    unsafe extern "system" fn wnd_proc(
        hwnd: HWND,
        msg: u32,
        wparam: WPARAM,
        lparam: LPARAM,
    ) -> LRESULT {
        const MK_LBUTTON: usize = 0x0001;

        match msg {
            WM_PAINT => {
                RENDERER.with(|r| {
                    if let Some(ref renderer) = *r.borrow() {
                        renderer.render(hwnd);
                    }
                });
                LRESULT(0)
            }

            // Everything is painted in WM_PAINT
            WM_ERASEBKGND => LRESULT(1),

            WM_LBUTTONDOWN => {
                let local = point_from_lparam(lparam);
                let _ = SetCapture(hwnd);
                post(OverlayEvent::PointerDown {
                    local,
                    global: to_screen(hwnd, local),
                });
                LRESULT(0)
            }

            WM_MOUSEMOVE => {
                let local = point_from_lparam(lparam);
                post(OverlayEvent::PointerMove {
                    local,
                    global: to_screen(hwnd, local),
                    primary_held: wparam.0 & MK_LBUTTON != 0,
                });
                LRESULT(0)
            }

            WM_LBUTTONUP => {
                let local = point_from_lparam(lparam);
                let _ = ReleaseCapture();
                post(OverlayEvent::PointerUp { local });
                LRESULT(0)
            }

            WM_SETCURSOR => {
                // Only for our own client area; the web view picks its own
                let over_self = wparam.0 == hwnd.0 as usize;
                if over_self && (lparam.0 & 0xFFFF) as u32 == HTCLIENT {
                    apply_cursor(CURSOR.with(Cell::get));
                    return LRESULT(1);
                }
                DefWindowProcW(hwnd, msg, wparam, lparam)
            }

            WM_WINDOWPOSCHANGED => {
                let pos = &*(lparam.0 as *const WINDOWPOS);
                let moved_or_sized =
                    !(pos.flags.contains(SWP_NOMOVE) && pos.flags.contains(SWP_NOSIZE));

                let mut bounds = RECT::default();
                if moved_or_sized && GetWindowRect(hwnd, &mut bounds).is_ok() {
                    let rect = Rect::new(
                        bounds.left,
                        bounds.top,
                        (bounds.right - bounds.left).max(0) as u32,
                        (bounds.bottom - bounds.top).max(0) as u32,
                    );
                    post(OverlayEvent::GeometryChanged(rect));
                }
                LRESULT(0)
            }

            WM_GETMINMAXINFO => {
                if let Some(bounds) = SIZE_BOUNDS.with(Cell::get) {
                    let info = &mut *(lparam.0 as *mut MINMAXINFO);
                    info.ptMinTrackSize = POINT {
                        x: bounds.min.width as i32,
                        y: bounds.min.height as i32,
                    };
                    if let Some(max) = bounds.max {
                        info.ptMaxTrackSize = POINT {
                            x: max.width as i32,
                            y: max.height as i32,
                        };
                    }
                }
                LRESULT(0)
            }

            WM_TIMER => {
                match TimerKind::from_id(wparam.0) {
                    Some(kind) => post(OverlayEvent::Timer(kind)),
                    None => debug!(id = wparam.0, "unknown timer"),
                }
                LRESULT(0)
            }

            WM_CLOSE => {
                post(OverlayEvent::Command(Command::Close));
                LRESULT(0)
            }

            WM_DESTROY => {
                PostQuitMessage(0);
                LRESULT(0)
            }

            _ => DefWindowProcW(hwnd, msg, wparam, lparam),
        }
    }
}
