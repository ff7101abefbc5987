//! WebView2 child surface hosted below the toolbar strip

use overlay::{
    EmbeddedSurface, NavigationDecision, NavigationPolicy, OverlayError, OverlayResult, Rect,
};
use std::num::NonZeroIsize;
use tracing::{info, warn};
use windows::core::{w, PCWSTR};
use windows::Win32::Foundation::HWND;
use windows::Win32::UI::Shell::ShellExecuteW;
use windows::Win32::UI::WindowsAndMessaging::SW_SHOWNORMAL;
use wry::dpi::{PhysicalPosition, PhysicalSize, Position, Size};
use wry::{WebView, WebViewBuilder};

/// Parent window handle in the form wry accepts
struct ParentWindow(HWND);

impl raw_window_handle::HasWindowHandle for ParentWindow {
    fn window_handle(
        &self,
    ) -> Result<raw_window_handle::WindowHandle<'_>, raw_window_handle::HandleError> {
        let hwnd = NonZeroIsize::new(self.0 .0 as isize)
            .ok_or(raw_window_handle::HandleError::Unavailable)?;
        let raw = raw_window_handle::RawWindowHandle::Win32(
            raw_window_handle::Win32WindowHandle::new(hwnd),
        );
        unsafe { Ok(raw_window_handle::WindowHandle::borrow_raw(raw)) }
    }
}

fn wry_bounds(bounds: Rect) -> wry::Rect {
    wry::Rect {
        position: Position::Physical(PhysicalPosition::new(bounds.x, bounds.y)),
        size: Size::Physical(PhysicalSize::new(bounds.width, bounds.height)),
    }
}

fn surface_error(e: wry::Error) -> OverlayError {
    OverlayError::Surface(e.to_string())
}

/// Hand a link to the default browser
fn open_external(url: &str) {
    info!(url, "opening in default browser");
    let wide: Vec<u16> = url.encode_utf16().chain(std::iter::once(0)).collect();
    let result = unsafe {
        ShellExecuteW(
            HWND::default(),
            w!("open"),
            PCWSTR(wide.as_ptr()),
            PCWSTR::null(),
            PCWSTR::null(),
            SW_SHOWNORMAL,
        )
    };
    // Values up to 32 are error codes
    if result.0 as isize <= 32 {
        warn!(url, code = result.0 as isize, "ShellExecuteW failed");
    }
}

/// Top-level navigations: local ones proceed, web links leave the overlay
fn on_navigation(policy: &NavigationPolicy, url: &str) -> bool {
    match policy.decide(url) {
        NavigationDecision::Allow => true,
        NavigationDecision::OpenExternal => {
            open_external(url);
            false
        }
        NavigationDecision::Block => false,
    }
}

/// The overlay never opens a second window, so `window.open` and
/// `target="_blank"` only ever go to the browser
fn on_new_window(policy: &NavigationPolicy, url: &str) -> bool {
    match policy.decide(url) {
        NavigationDecision::Allow | NavigationDecision::OpenExternal => open_external(url),
        NavigationDecision::Block => {}
    }
    false
}

pub struct WebSurface {
    webview: WebView,
}

impl WebSurface {
    /// Child web view with a transparent background so the painted backdrop
    /// shows through wherever the page leaves it uncovered
    pub fn new(parent: HWND, bounds: Rect, policy: NavigationPolicy) -> OverlayResult<Self> {
        let popups = policy.clone();
        let webview = WebViewBuilder::new()
            .with_bounds(wry_bounds(bounds))
            .with_transparent(true)
            .with_background_color((0, 0, 0, 0))
            .with_focused(false)
            .with_navigation_handler(move |url: String| on_navigation(&policy, &url))
            .with_new_window_req_handler(move |url: String| on_new_window(&popups, &url))
            .build_as_child(&ParentWindow(parent))
            .map_err(surface_error)?;

        Ok(Self { webview })
    }
}

impl EmbeddedSurface for WebSurface {
    fn set_bounds(&mut self, bounds: Rect) -> OverlayResult<()> {
        self.webview.set_bounds(wry_bounds(bounds)).map_err(surface_error)
    }

    fn load_url(&mut self, url: &str) -> OverlayResult<()> {
        self.webview.load_url(url).map_err(surface_error)
    }

    fn reload(&mut self) -> OverlayResult<()> {
        self.webview
            .evaluate_script("window.location.reload()")
            .map_err(surface_error)
    }
}
