// SPDX-License-Identifier: GPL-3.0-only

//! Frame analysis tasks

pub mod qr_detector;

pub use qr_detector::{PayloadDecoder, QrDetector};
