// SPDX-License-Identifier: GPL-3.0-only

//! One-shot scanning of still images

use crate::backends::camera::{Frame, PixelFormat};
use crate::errors::ScanError;
use crate::frame_processor::{PayloadDecoder, ScanResult, classify};
use image::DynamicImage;
use std::path::Path;
use tracing::{debug, info};

/// Decode a single frame and classify its payload
pub fn scan_image(decoder: &dyn PayloadDecoder, frame: &Frame) -> Result<ScanResult, ScanError> {
    match decoder.decode(frame) {
        Some(raw) => {
            let result = classify(&raw);
            info!(kind = %result.kind(), "QR code found in image");
            Ok(result)
        }
        None => {
            debug!(width = frame.width, height = frame.height, "No QR code in image");
            Err(ScanError::NotFound)
        }
    }
}

/// Scan an image file
///
/// The caller is expected to pass an image file; anything the `image`
/// crate cannot read is reported as [`ScanError::InvalidImage`].
pub fn scan_file(decoder: &dyn PayloadDecoder, path: &Path) -> Result<ScanResult, ScanError> {
    let frame = load_image_as_frame(path)?;
    scan_image(decoder, &frame)
}

/// Scan an encoded image held in memory
pub fn scan_bytes(decoder: &dyn PayloadDecoder, bytes: &[u8]) -> Result<ScanResult, ScanError> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| ScanError::InvalidImage(e.to_string()))?;
    scan_image(decoder, &frame_from_image(img))
}

/// Load an image file into an RGBA frame
pub fn load_image_as_frame(path: &Path) -> Result<Frame, ScanError> {
    info!(path = %path.display(), "Loading image file");

    let img = image::open(path)
        .map_err(|e| ScanError::InvalidImage(format!("{}: {}", path.display(), e)))?;
    Ok(frame_from_image(img))
}

fn frame_from_image(img: DynamicImage) -> Frame {
    let rgba = img.to_rgba8();
    let (width, height) = (rgba.width(), rgba.height());
    debug!(width, height, "Image decoded");
    Frame::new(width, height, PixelFormat::Rgba, rgba.into_raw())
}
