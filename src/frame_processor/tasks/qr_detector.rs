// SPDX-License-Identifier: GPL-3.0-only

//! QR code decoding task
//!
//! Frames are converted to grayscale, downscaled for speed and handed to
//! `rqrr`, which locates and decodes QR symbols. The first symbol that
//! decodes cleanly wins.

use crate::backends::camera::types::Frame;
use crate::constants::scanner::DEFAULT_MAX_DIMENSION;
use tracing::{debug, trace};

/// Turns pixels into a raw QR payload
///
/// One call per frame or image, no retries. `None` means no readable
/// symbol was found.
pub trait PayloadDecoder: Send + Sync {
    fn decode(&self, frame: &Frame) -> Option<String>;
}

/// QR decoder backed by `rqrr`
#[derive(Debug, Clone)]
pub struct QrDetector {
    /// Frames larger than this are downscaled before decoding
    max_dimension: u32,
}

impl Default for QrDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl QrDetector {
    pub fn new() -> Self {
        Self {
            max_dimension: DEFAULT_MAX_DIMENSION,
        }
    }

    pub fn with_max_dimension(max_dimension: u32) -> Self {
        Self {
            max_dimension: max_dimension.max(1),
        }
    }
}

impl PayloadDecoder for QrDetector {
    fn decode(&self, frame: &Frame) -> Option<String> {
        decode_sync(frame, self.max_dimension)
    }
}

fn decode_sync(frame: &Frame, max_dimension: u32) -> Option<String> {
    if frame.width == 0 || frame.height == 0 {
        return None;
    }

    let start = std::time::Instant::now();

    let (gray, width, height) = if frame.width > max_dimension || frame.height > max_dimension {
        let scale = (frame.width as f32 / max_dimension as f32)
            .max(frame.height as f32 / max_dimension as f32);
        let new_width = ((frame.width as f32 / scale) as u32).max(1);
        let new_height = ((frame.height as f32 / scale) as u32).max(1);
        (
            downscale_luma(frame, new_width, new_height),
            new_width,
            new_height,
        )
    } else {
        (luma_without_stride(frame), frame.width, frame.height)
    };

    trace!(
        width,
        height,
        conversion_ms = start.elapsed().as_millis(),
        "Prepared grayscale image"
    );

    let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
        width as usize,
        height as usize,
        |x, y| gray[y * width as usize + x],
    );
    let grids = prepared.detect_grids();
    trace!(count = grids.len(), "QR grids located");

    for grid in grids {
        match grid.decode() {
            Ok((meta, content)) => {
                debug!(
                    version = meta.version.0,
                    total_ms = start.elapsed().as_millis(),
                    "Decoded QR code"
                );
                return Some(content);
            }
            Err(e) => debug!(error = ?e, "Failed to decode QR grid"),
        }
    }

    None
}

/// Copy luminance row by row, dropping stride padding
fn luma_without_stride(frame: &Frame) -> Vec<u8> {
    let mut result = Vec::with_capacity((frame.width * frame.height) as usize);
    for y in 0..frame.height {
        for x in 0..frame.width {
            result.push(frame.luma(x, y));
        }
    }
    result
}

/// Downscale luminance using bilinear interpolation
fn downscale_luma(frame: &Frame, dst_width: u32, dst_height: u32) -> Vec<u8> {
    let src_width = frame.width;
    let src_height = frame.height;

    let mut result = Vec::with_capacity((dst_width * dst_height) as usize);

    let x_ratio = src_width as f32 / dst_width as f32;
    let y_ratio = src_height as f32 / dst_height as f32;

    for y in 0..dst_height {
        for x in 0..dst_width {
            let src_x = x as f32 * x_ratio;
            let src_y = y as f32 * y_ratio;

            let x0 = src_x as u32;
            let y0 = src_y as u32;
            let x1 = (x0 + 1).min(src_width - 1);
            let y1 = (y0 + 1).min(src_height - 1);

            let x_frac = src_x - x0 as f32;
            let y_frac = src_y - y0 as f32;

            let p00 = frame.luma(x0, y0) as f32;
            let p01 = frame.luma(x1, y0) as f32;
            let p10 = frame.luma(x0, y1) as f32;
            let p11 = frame.luma(x1, y1) as f32;

            let value = p00 * (1.0 - x_frac) * (1.0 - y_frac)
                + p01 * x_frac * (1.0 - y_frac)
                + p10 * (1.0 - x_frac) * y_frac
                + p11 * x_frac * y_frac;

            result.push(value as u8);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::camera::types::PixelFormat;
    use std::sync::Arc;

    #[test]
    fn test_luma_without_stride() {
        let data: Vec<u8> = vec![
            255, 0, 0, 255, // Red pixel
            255, 255, 255, 255, // White pixel
            0, 0, // stride padding
            0, 0, 0, 255, // Black pixel
            255, 255, 255, 255, // White pixel
            0, 0, // stride padding
        ];

        let frame = Frame {
            width: 2,
            height: 2,
            data: Arc::from(data.as_slice()),
            format: PixelFormat::Rgba,
            stride: 10,
            captured_at: std::time::Instant::now(),
        };

        assert_eq!(luma_without_stride(&frame), vec![76, 255, 0, 255]);
    }

    #[test]
    fn test_downscale_luma() {
        // 4x2 gray gradient
        let frame = Frame::new(
            4,
            2,
            PixelFormat::Gray,
            vec![0, 85, 170, 255, 0, 85, 170, 255],
        );

        let result = downscale_luma(&frame, 2, 1);
        assert_eq!(result.len(), 2);
        assert!(result[0] < 100);
        assert!(result[1] > 150);
    }

    #[test]
    fn test_blank_frame_has_no_payload() {
        let frame = Frame::new(64, 64, PixelFormat::Gray, vec![255; 64 * 64]);
        assert_eq!(QrDetector::new().decode(&frame), None);
    }

    #[test]
    fn test_large_blank_frame_is_downscaled() {
        let frame = Frame::new(1280, 720, PixelFormat::Gray, vec![0; 1280 * 720]);
        assert_eq!(QrDetector::with_max_dimension(320).decode(&frame), None);
    }

    #[test]
    fn test_empty_frame() {
        let frame = Frame::new(0, 0, PixelFormat::Gray, Vec::new());
        assert_eq!(QrDetector::new().decode(&frame), None);
    }
}
