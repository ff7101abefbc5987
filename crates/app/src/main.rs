//! Backdrop Overlay - frameless always-on-top web view over a captured desktop backdrop

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

#[cfg(windows)]
mod render;
#[cfg(windows)]
mod webview;
#[cfg(windows)]
mod window;

use anyhow::Context;
use overlay::OverlayConfig;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_FILE: &str = "overlay.toml";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = load_config(std::env::args_os().nth(1).map(PathBuf::from))?;
    run(config)
}

/// Explicit path first, then `overlay.toml` in the working directory, then defaults
fn load_config(explicit: Option<PathBuf>) -> anyhow::Result<OverlayConfig> {
    if let Some(path) = explicit {
        return read_config(&path);
    }

    let fallback = Path::new(DEFAULT_CONFIG_FILE);
    if fallback.exists() {
        return read_config(fallback);
    }

    info!("no config file, using defaults");
    Ok(OverlayConfig::default())
}

fn read_config(path: &Path) -> anyhow::Result<OverlayConfig> {
    info!(path = %path.display(), "loading config");
    OverlayConfig::load(path).with_context(|| format!("loading {}", path.display()))
}

#[cfg(windows)]
fn run(config: OverlayConfig) -> anyhow::Result<()> {
    use windows::Win32::System::Com::{CoInitializeEx, CoUninitialize, COINIT_APARTMENTTHREADED};
    use windows::Win32::UI::HiDpi::{
        SetProcessDpiAwarenessContext, DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2,
    };

    unsafe {
        // Geometry and capture both work in physical pixels
        let _ = SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2);
        // WebView2 needs a single-threaded apartment
        CoInitializeEx(None, COINIT_APARTMENTTHREADED).ok()?;
    }

    let result = window::OverlayWindow::run(config);

    unsafe {
        CoUninitialize();
    }
    result
}

#[cfg(not(windows))]
fn run(_config: OverlayConfig) -> anyhow::Result<()> {
    anyhow::bail!("backdrop-overlay needs a Windows desktop")
}
