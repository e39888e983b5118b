// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use serde::Serialize;
use std::time::Duration;

/// WiFi security used when a payload or template leaves it out
pub const DEFAULT_WIFI_SECURITY: &str = "WPA";

/// `PRODID` written into generated calendar events
pub const ICAL_PRODID: &str = "-//QRaft//QR Code Generator//EN";

/// Domain part of generated calendar event UIDs
pub const ICAL_UID_DOMAIN: &str = "qraft.app";

/// Foreground/background color pair offered to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorPreset {
    pub name: &'static str,
    pub dark: &'static str,
    pub light: &'static str,
}

/// Built-in color presets
pub const COLOR_PRESETS: [ColorPreset; 6] = [
    ColorPreset {
        name: "Classic",
        dark: "#000000",
        light: "#FFFFFF",
    },
    ColorPreset {
        name: "Blue",
        dark: "#1E40AF",
        light: "#EFF6FF",
    },
    ColorPreset {
        name: "Green",
        dark: "#166534",
        light: "#F0FDF4",
    },
    ColorPreset {
        name: "Red",
        dark: "#DC2626",
        light: "#FEF2F2",
    },
    ColorPreset {
        name: "Purple",
        dark: "#7C2D92",
        light: "#FAF5FF",
    },
    ColorPreset {
        name: "Orange",
        dark: "#EA580C",
        light: "#FFF7ED",
    },
];

/// Find a preset by name (case-insensitive)
pub fn color_preset(name: &str) -> Option<&'static ColorPreset> {
    COLOR_PRESETS
        .iter()
        .find(|preset| preset.name.eq_ignore_ascii_case(name))
}

/// Rendering defaults and limits
pub mod render {
    /// Default rendered size in pixels
    pub const DEFAULT_SIZE: u32 = 256;
    pub const MIN_SIZE: u32 = 128;
    pub const MAX_SIZE: u32 = 512;

    /// Default quiet zone in modules
    pub const DEFAULT_MARGIN: u32 = 2;
    pub const MAX_MARGIN: u32 = 10;

    pub const DEFAULT_DARK_COLOR: &str = "#000000";
    pub const DEFAULT_LIGHT_COLOR: &str = "#FFFFFF";

    /// Longest free-text payload accepted for rendering
    pub const MAX_TEXT_LENGTH: usize = 500;
}

/// Scanner defaults
pub mod scanner {
    use super::Duration;

    /// Frames are downscaled to this dimension before decoding
    pub const DEFAULT_MAX_DIMENSION: u32 = 640;

    /// Pause between frame attempts (about one display refresh)
    pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

    /// Capture device opened when none is configured
    pub const DEFAULT_DEVICE_PATH: &str = "/dev/video0";

    /// Requested capture resolution
    pub const CAPTURE_WIDTH: u32 = 1280;
    pub const CAPTURE_HEIGHT: u32 = 720;

    /// Number of mmap buffers for V4L2 streaming
    pub const CAPTURE_BUFFERS: u32 = 4;

    /// Longest single wait for a frame on the capture thread
    pub const CAPTURE_POLL_TIMEOUT: Duration = Duration::from_millis(500);
}

/// Supported file formats for one-shot scanning
pub mod file_formats {
    pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp", "tiff"];

    /// Check if a file extension is a supported image format
    pub fn is_image_extension(ext: &str) -> bool {
        IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str())
    }
}
