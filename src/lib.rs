// SPDX-License-Identifier: GPL-3.0-only

//! qraft - QR payload templates, classification and scanning
//!
//! # Architecture
//!
//! - [`frame_processor`]: payload classification, payload templates and the
//!   QR decoder
//! - [`scanner`]: camera scan sessions and one-shot image scanning
//! - [`backends`]: capture device abstraction and the V4L2 backend
//! - [`render`]: validated input for an external QR renderer
//! - [`config`]: user configuration handling
//!
//! # Example
//!
//! ```
//! use qraft::frame_processor::{ScanKind, WifiConfig, classify, encode_wifi};
//!
//! let payload = encode_wifi(&WifiConfig {
//!     ssid: "Home".into(),
//!     password: "secret".into(),
//!     ..Default::default()
//! })
//! .unwrap();
//! assert_eq!(classify(&payload).kind(), ScanKind::Wifi);
//! ```

pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod frame_processor;
pub mod render;
pub mod scanner;

// Re-export commonly used types
pub use config::Config;
pub use errors::{AppError, AppResult, EncodeError, ScanError, SessionError};
pub use frame_processor::{Payload, QrDetector, ScanKind, ScanResult, classify};
pub use scanner::{ScanPhase, ScanSession};
