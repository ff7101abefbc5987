//! Recording fakes for driving the controller without a window system

#![allow(dead_code)]

use capture::{CaptureError, CaptureResult, Frame, Rect, ScreenCapture};
use overlay::{
    BackdropSlot, CursorHint, EmbeddedSurface, EventSender, OverlayConfig, OverlayController,
    OverlayError, OverlayEvent, OverlayResult, TimerKind, WindowHost,
};
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    Geometry(Rect),
    Show,
    Hide,
    Repaint,
    RaiseTopmost,
    Close,
}

#[derive(Default)]
pub struct FakeHost {
    pub calls: Vec<HostCall>,
    pub cursor: CursorHint,
    pub visible: bool,
    pub timers: HashMap<TimerKind, Duration>,
    pub schedules: Vec<(TimerKind, Duration)>,
    /// When set, every geometry change is echoed back the way a window
    /// manager reports it
    pub echo: Option<EventSender>,
}

impl FakeHost {
    pub fn geometry_calls(&self) -> Vec<Rect> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HostCall::Geometry(r) => Some(*r),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, call: &HostCall) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }
}

impl WindowHost for FakeHost {
    fn apply_geometry(&mut self, rect: Rect) {
        self.calls.push(HostCall::Geometry(rect));
        if let Some(echo) = &self.echo {
            echo.post(OverlayEvent::GeometryChanged(rect));
        }
    }

    fn show(&mut self) {
        self.visible = true;
        self.calls.push(HostCall::Show);
    }

    fn hide(&mut self) {
        self.visible = false;
        self.calls.push(HostCall::Hide);
    }

    fn set_cursor(&mut self, hint: CursorHint) {
        self.cursor = hint;
    }

    fn schedule(&mut self, timer: TimerKind, after: Duration) {
        self.timers.insert(timer, after);
        self.schedules.push((timer, after));
    }

    fn cancel(&mut self, timer: TimerKind) {
        self.timers.remove(&timer);
    }

    fn repaint(&mut self) {
        self.calls.push(HostCall::Repaint);
    }

    fn raise_topmost(&mut self) {
        self.calls.push(HostCall::RaiseTopmost);
    }

    fn close(&mut self) {
        self.visible = false;
        self.calls.push(HostCall::Close);
    }
}

#[derive(Default)]
pub struct FakeSurface {
    pub bounds: Vec<Rect>,
    pub loaded: Vec<String>,
    pub reloads: usize,
    pub fail_reload: bool,
}

impl EmbeddedSurface for FakeSurface {
    fn set_bounds(&mut self, bounds: Rect) -> OverlayResult<()> {
        self.bounds.push(bounds);
        Ok(())
    }

    fn load_url(&mut self, url: &str) -> OverlayResult<()> {
        self.loaded.push(url.to_string());
        Ok(())
    }

    fn reload(&mut self) -> OverlayResult<()> {
        self.reloads += 1;
        if self.fail_reload {
            return Err(OverlayError::Surface("renderer gone".into()));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeCapture {
    pub regions: Vec<Rect>,
    pub fail: bool,
}

impl ScreenCapture for FakeCapture {
    fn capture(&mut self, region: Rect) -> CaptureResult<Frame> {
        self.regions.push(region);
        if self.fail {
            return Err(CaptureError::NotSupported);
        }
        Frame::filled(region.width, region.height, [40, 40, 40, 0])
    }
}

pub type TestController = OverlayController<FakeHost, FakeSurface, FakeCapture>;

pub fn controller() -> TestController {
    controller_with(OverlayConfig::default())
}

pub fn controller_with(config: OverlayConfig) -> TestController {
    OverlayController::new(
        config,
        FakeHost::default(),
        FakeSurface::default(),
        FakeCapture::default(),
        BackdropSlot::new(),
    )
    .expect("valid test config")
}

/// Started controller with the startup calls cleared out
pub fn started() -> TestController {
    let mut controller = controller();
    controller.start();
    controller.host_mut().calls.clear();
    controller.host_mut().schedules.clear();
    controller.capture_mut().regions.clear();
    controller
}
