// SPDX-License-Identifier: GPL-3.0-only

//! Error types for payload encoding, scanning and configuration

use crate::scanner::ScanPhase;
use std::fmt;
use std::io;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Scanning errors (camera or file)
    Scan(ScanError),
    /// Template encoding errors
    Encode(EncodeError),
    /// Scan session misuse
    Session(SessionError),
    /// Render request validation errors
    Render(RenderError),
    /// Configuration errors
    Config(String),
    /// Storage/filesystem errors
    Storage(String),
}

/// Closed set of scanning failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// Access to the capture device was refused
    PermissionDenied,
    /// No capture device exists at the requested location
    DeviceNotFound,
    /// The device or runtime cannot provide video capture
    DeviceUnsupported,
    /// Any other capture failure, with the underlying message
    CaptureFailed(String),
    /// No QR payload in the image or frame
    NotFound,
    /// The image could not be read or decoded
    InvalidImage(String),
}

impl ScanError {
    /// Map an environment error raised while acquiring a capture device
    pub fn from_acquire(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => ScanError::PermissionDenied,
            io::ErrorKind::NotFound => ScanError::DeviceNotFound,
            io::ErrorKind::Unsupported => ScanError::DeviceUnsupported,
            _ => ScanError::CaptureFailed(err.to_string()),
        }
    }
}

/// Template encoding errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// A mandatory template field is empty
    MissingField(&'static str),
    /// A date field could not be parsed
    InvalidDate(String),
}

/// Scan session misuse
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// `start` was called on a session that already left `Idle`
    AlreadyStarted(ScanPhase),
}

/// Render request validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// Payload is empty
    EmptyPayload,
    /// Payload exceeds the configured character limit
    PayloadTooLong { len: usize, max: usize },
    /// Color is not a `#RRGGBB` hex string
    InvalidColor(String),
    /// Size outside the accepted range
    InvalidSize(u32),
    /// Margin outside the accepted range
    InvalidMargin(u32),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Scan(e) => write!(f, "Scan error: {}", e),
            AppError::Encode(e) => write!(f, "Encode error: {}", e),
            AppError::Session(e) => write!(f, "Session error: {}", e),
            AppError::Render(e) => write!(f, "Render error: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::PermissionDenied => {
                write!(f, "Camera permission denied. Please allow camera access.")
            }
            ScanError::DeviceNotFound => write!(f, "No camera found on this device."),
            ScanError::DeviceUnsupported => write!(f, "Camera capture is not supported."),
            ScanError::CaptureFailed(msg) => write!(f, "Camera access failed: {}", msg),
            ScanError::NotFound => write!(f, "No QR code found in the image"),
            ScanError::InvalidImage(msg) => write!(f, "Could not load the image: {}", msg),
        }
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::MissingField(field) => write!(f, "Missing required field: {}", field),
            EncodeError::InvalidDate(value) => write!(f, "Invalid date: {}", value),
        }
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::AlreadyStarted(phase) => {
                write!(f, "Session cannot start from phase {:?}", phase)
            }
        }
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::EmptyPayload => write!(f, "Payload is empty"),
            RenderError::PayloadTooLong { len, max } => {
                write!(f, "Payload has {} characters, limit is {}", len, max)
            }
            RenderError::InvalidColor(c) => write!(f, "Invalid color: {}", c),
            RenderError::InvalidSize(s) => write!(f, "Invalid size: {}", s),
            RenderError::InvalidMargin(m) => write!(f, "Invalid margin: {}", m),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for ScanError {}
impl std::error::Error for EncodeError {}
impl std::error::Error for SessionError {}
impl std::error::Error for RenderError {}

impl From<ScanError> for AppError {
    fn from(err: ScanError) -> Self {
        AppError::Scan(err)
    }
}

impl From<EncodeError> for AppError {
    fn from(err: EncodeError) -> Self {
        AppError::Encode(err)
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        AppError::Session(err)
    }
}

impl From<RenderError> for AppError {
    fn from(err: RenderError) -> Self {
        AppError::Render(err)
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_error_mapping() {
        let denied = io::Error::new(io::ErrorKind::PermissionDenied, "EACCES");
        assert_eq!(ScanError::from_acquire(&denied), ScanError::PermissionDenied);

        let missing = io::Error::new(io::ErrorKind::NotFound, "ENOENT");
        assert_eq!(ScanError::from_acquire(&missing), ScanError::DeviceNotFound);

        let unsupported = io::Error::new(io::ErrorKind::Unsupported, "no capture");
        assert_eq!(
            ScanError::from_acquire(&unsupported),
            ScanError::DeviceUnsupported
        );

        let busy = io::Error::other("device busy");
        assert_eq!(
            ScanError::from_acquire(&busy),
            ScanError::CaptureFailed("device busy".to_string())
        );
    }
}
