// SPDX-License-Identifier: GPL-3.0-only

//! Continuous camera scanning
//!
//! A [`ScanSession`] drives one attempt to read a QR code from a live
//! capture device:
//!
//! ```text
//! Idle ──start──▶ Requesting ──first frame──▶ Streaming ──payload──▶ Detected
//!                     │                           │ ▲
//!                     │ acquisition error         │ │ not found
//!                     ▼                           │ └─┘
//!                   Failed ◀──capture error───────┤
//!                                                 │ stop
//!                                                 ▼
//!                                              Stopped
//! ```
//!
//! The device is released before any terminal phase is entered. Sessions
//! are single use: a retry needs a new session.

use crate::backends::camera::{CaptureBackend, DeviceGuard};
use crate::constants::scanner::DEFAULT_FRAME_INTERVAL;
use crate::errors::{ScanError, SessionError};
use crate::frame_processor::{PayloadDecoder, ScanResult, classify};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Lifecycle phase of a scan session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScanPhase {
    Idle,
    Requesting,
    Streaming,
    Detected,
    Stopped,
    Failed,
}

impl ScanPhase {
    /// The session holds a device and is waiting for or decoding frames
    pub fn is_active(&self) -> bool {
        matches!(self, ScanPhase::Requesting | ScanPhase::Streaming)
    }
}

/// Outcome of a single frame attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// No new frame was available
    Waiting,
    /// A frame was decoded and held no payload
    NotFound,
    Detected,
    Stopped,
    Failed,
    /// The session is not active; nothing was attempted
    Inactive,
}

/// Requests a stop from outside the task driving the session
///
/// The request is observed at the next frame boundary; a decode already
/// in progress runs to completion.
#[derive(Debug, Clone)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn request_stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct ScanSession {
    phase: ScanPhase,
    device: Option<DeviceGuard>,
    last_error: Option<ScanError>,
    result: Option<ScanResult>,
    decoder: Arc<dyn PayloadDecoder>,
    stop_signal: Arc<AtomicBool>,
    frame_interval: Duration,
    attempts: u64,
}

impl ScanSession {
    pub fn new(decoder: Arc<dyn PayloadDecoder>) -> Self {
        Self {
            phase: ScanPhase::Idle,
            device: None,
            last_error: None,
            result: None,
            decoder,
            stop_signal: Arc::new(AtomicBool::new(false)),
            frame_interval: DEFAULT_FRAME_INTERVAL,
            attempts: 0,
        }
    }

    /// Pause between frame attempts in [`ScanSession::run`]
    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval;
        self
    }

    pub fn phase(&self) -> ScanPhase {
        self.phase
    }

    pub fn last_error(&self) -> Option<&ScanError> {
        self.last_error.as_ref()
    }

    pub fn result(&self) -> Option<&ScanResult> {
        self.result.as_ref()
    }

    pub fn take_result(&mut self) -> Option<ScanResult> {
        self.result.take()
    }

    /// Number of frames handed to the decoder so far
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    pub fn has_device(&self) -> bool {
        self.device.is_some()
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle(Arc::clone(&self.stop_signal))
    }

    /// Acquire a capture device and begin scanning
    ///
    /// Only a fresh (`Idle`) session can start; anything else is rejected
    /// rather than queued. Acquisition failures are not returned as errors:
    /// the session moves to `Failed` and records the cause in
    /// [`ScanSession::last_error`].
    pub fn start(&mut self, backend: &dyn CaptureBackend) -> Result<ScanPhase, SessionError> {
        if self.phase != ScanPhase::Idle {
            warn!(phase = ?self.phase, "Rejecting start on a used session");
            return Err(SessionError::AlreadyStarted(self.phase));
        }

        self.stop_signal.store(false, Ordering::SeqCst);
        self.phase = ScanPhase::Requesting;
        info!(backend = backend.name(), "Requesting capture device");

        match backend.acquire() {
            Ok(device) => {
                self.device = Some(DeviceGuard::new(device));
            }
            Err(e) => {
                let error = ScanError::from_acquire(&e);
                warn!(backend = backend.name(), error = %e, kind = ?error, "Capture device unavailable");
                self.last_error = Some(error);
                self.phase = ScanPhase::Failed;
            }
        }

        Ok(self.phase)
    }

    /// Make one frame attempt
    ///
    /// At most one decode runs at a time and a frame is only fetched after
    /// the previous attempt finished. The first frame moves `Requesting`
    /// to `Streaming`.
    pub async fn tick(&mut self) -> Tick {
        if !self.phase.is_active() {
            return Tick::Inactive;
        }

        if self.stop_signal.load(Ordering::SeqCst) {
            self.stop();
            return Tick::Stopped;
        }

        let next = match self.device.as_mut() {
            Some(device) => device.next_frame(),
            None => Err(std::io::Error::other("capture device missing")),
        };

        let frame = match next {
            Ok(Some(frame)) => frame,
            Ok(None) => return Tick::Waiting,
            Err(e) => {
                self.fail(ScanError::CaptureFailed(e.to_string()));
                return Tick::Failed;
            }
        };

        if self.phase == ScanPhase::Requesting {
            info!(
                width = frame.width,
                height = frame.height,
                "First frame received, streaming"
            );
            self.phase = ScanPhase::Streaming;
        }

        self.attempts += 1;
        let captured_at = frame.captured_at;
        let decoder = Arc::clone(&self.decoder);
        let decoded = tokio::task::spawn_blocking(move || decoder.decode(&frame))
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "QR decode task panicked");
                None
            });

        match decoded {
            Some(raw) => {
                let result = classify(&raw);
                info!(
                    kind = %result.kind(),
                    attempts = self.attempts,
                    latency_ms = captured_at.elapsed().as_millis(),
                    "QR code detected"
                );
                self.release_device();
                self.result = Some(result);
                self.phase = ScanPhase::Detected;
                Tick::Detected
            }
            None => {
                debug!(attempt = self.attempts, "No QR code in frame");
                Tick::NotFound
            }
        }
    }

    /// Attempt frames until the session reaches a terminal phase
    ///
    /// Sleeps for the frame interval between attempts so the runtime stays
    /// responsive. There is no timeout; use a [`StopHandle`] to end it.
    pub async fn run(&mut self) -> ScanPhase {
        loop {
            match self.tick().await {
                Tick::Waiting | Tick::NotFound => tokio::time::sleep(self.frame_interval).await,
                _ => return self.phase,
            }
        }
    }

    /// Stop an active session
    ///
    /// Returns `false` without side effects when the session is idle or
    /// already finished.
    pub fn stop(&mut self) -> bool {
        if !self.phase.is_active() {
            return false;
        }
        info!(phase = ?self.phase, attempts = self.attempts, "Stopping scan session");
        self.release_device();
        self.phase = ScanPhase::Stopped;
        true
    }

    /// Forget the result and error without touching the phase
    pub fn clear(&mut self) {
        self.result = None;
        self.last_error = None;
    }

    fn fail(&mut self, error: ScanError) {
        warn!(error = %error, "Scan session failed");
        self.release_device();
        self.last_error = Some(error);
        self.phase = ScanPhase::Failed;
    }

    fn release_device(&mut self) {
        if let Some(device) = self.device.take() {
            device.release();
        }
    }
}

impl std::fmt::Debug for ScanSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanSession")
            .field("phase", &self.phase)
            .field("device", &self.device)
            .field("last_error", &self.last_error)
            .field("result", &self.result)
            .field("attempts", &self.attempts)
            .finish()
    }
}
