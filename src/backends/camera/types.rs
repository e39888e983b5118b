// SPDX-License-Identifier: GPL-3.0-only

//! Shared types for capture backends

use std::sync::Arc;
use std::time::Instant;

/// Pixel layout of a [`Frame`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 8-bit RGBA, 4 bytes per pixel
    Rgba,
    /// 8-bit luminance, 1 byte per pixel
    Gray,
}

impl PixelFormat {
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::Rgba => 4,
            PixelFormat::Gray => 1,
        }
    }
}

/// A single image from a camera or a file
///
/// Rows may be padded; `stride` is the number of bytes between row starts.
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub stride: u32,
    pub format: PixelFormat,
    pub data: Arc<[u8]>,
    pub captured_at: Instant,
}

impl Frame {
    /// Build a tightly packed frame
    pub fn new(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            stride: width * format.bytes_per_pixel() as u32,
            format,
            data: Arc::from(data.into_boxed_slice()),
            captured_at: Instant::now(),
        }
    }

    /// Luminance of the pixel at (x, y); out-of-range reads are black
    pub fn luma(&self, x: u32, y: u32) -> u8 {
        let offset = y as usize * self.stride as usize
            + x as usize * self.format.bytes_per_pixel();
        match self.format {
            PixelFormat::Gray => self.data.get(offset).copied().unwrap_or(0),
            PixelFormat::Rgba => match self.data.get(offset..offset + 3) {
                // ITU-R BT.601 weights in fixed point
                Some(&[r, g, b]) => {
                    ((r as u32 * 299 + g as u32 * 587 + b as u32 * 114) / 1000) as u8
                }
                _ => 0,
            },
        }
    }
}
