// SPDX-License-Identifier: GPL-3.0-only

//! Capture backend abstraction
//!
//! ```text
//! ┌─────────────────────┐
//! │    ScanSession      │
//! └──────────┬──────────┘
//!            │ acquire / next_frame / release
//!            ▼
//! ┌─────────────────────┐
//! │ CaptureBackend Trait│  ← opens a device
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │ CaptureDevice Trait │  ← owns the stream until released
//! └──────────┬──────────┘
//!            │
//!            ▼
//!        ┌──────┐
//!        │ V4L2 │  ← concrete implementation
//!        └──────┘
//! ```

pub mod frame_loop;
pub mod types;
pub mod v4l2_capture;

pub use frame_loop::{CaptureLoopController, LoopAction};
pub use types::*;
pub use v4l2_capture::V4l2Backend;

use std::io;
use tracing::debug;

/// Something that can hand out exclusive access to a capture device
///
/// Acquisition errors are reported as [`io::Error`]; the scanner maps
/// their kind onto its closed error set.
pub trait CaptureBackend {
    /// Human-readable name for logging
    fn name(&self) -> &str;

    /// Open the device and start streaming
    fn acquire(&self) -> io::Result<Box<dyn CaptureDevice>>;
}

/// An open capture device
///
/// Devices keep at most the latest frame; older frames are replaced,
/// never queued.
pub trait CaptureDevice: Send {
    /// Take the most recent frame, `Ok(None)` if none arrived yet
    fn next_frame(&mut self) -> io::Result<Option<Frame>>;

    /// Stop streaming and close the device
    fn release(&mut self);
}

/// Exclusive owner of an acquired device
///
/// The device is released exactly once: either through [`DeviceGuard::release`]
/// or, failing that, when the guard is dropped.
pub struct DeviceGuard {
    device: Option<Box<dyn CaptureDevice>>,
}

impl DeviceGuard {
    pub fn new(device: Box<dyn CaptureDevice>) -> Self {
        Self {
            device: Some(device),
        }
    }

    pub fn next_frame(&mut self) -> io::Result<Option<Frame>> {
        match self.device.as_mut() {
            Some(device) => device.next_frame(),
            None => Ok(None),
        }
    }

    /// Release the device now
    pub fn release(mut self) {
        self.release_inner();
    }

    fn release_inner(&mut self) {
        if let Some(mut device) = self.device.take() {
            debug!("Releasing capture device");
            device.release();
        }
    }
}

impl Drop for DeviceGuard {
    fn drop(&mut self) {
        self.release_inner();
    }
}

impl std::fmt::Debug for DeviceGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceGuard")
            .field("held", &self.device.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct CountingDevice {
        releases: Arc<AtomicU32>,
    }

    impl CaptureDevice for CountingDevice {
        fn next_frame(&mut self) -> io::Result<Option<Frame>> {
            Ok(None)
        }

        fn release(&mut self) {
            self.releases.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_guard_releases_once_explicitly() {
        let releases = Arc::new(AtomicU32::new(0));
        let guard = DeviceGuard::new(Box::new(CountingDevice {
            releases: Arc::clone(&releases),
        }));
        guard.release();
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_guard_releases_on_drop() {
        let releases = Arc::new(AtomicU32::new(0));
        {
            let mut guard = DeviceGuard::new(Box::new(CountingDevice {
                releases: Arc::clone(&releases),
            }));
            assert!(guard.next_frame().unwrap().is_none());
        }
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }
}
