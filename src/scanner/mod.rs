// SPDX-License-Identifier: GPL-3.0-only

//! QR scanning from cameras and image files

pub mod file_scan;
pub mod session;

pub use file_scan::{load_image_as_frame, scan_bytes, scan_file, scan_image};
pub use session::{ScanPhase, ScanSession, StopHandle, Tick};
