// SPDX-License-Identifier: GPL-3.0-only

//! Scan session behaviour through the public API

use qraft::backends::camera::{CaptureBackend, CaptureDevice, Frame, PixelFormat};
use qraft::frame_processor::{Payload, PayloadDecoder};
use qraft::{ScanError, ScanKind, ScanPhase, ScanSession, SessionError};
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

/// Endless camera producing blank frames, optionally a code after `code_after`
struct FakeCamera {
    code_after: Option<u32>,
    releases: Arc<AtomicU32>,
}

struct FakeStream {
    frames: u32,
    code_after: Option<u32>,
    releases: Arc<AtomicU32>,
}

impl CaptureBackend for FakeCamera {
    fn name(&self) -> &str {
        "fake"
    }

    fn acquire(&self) -> io::Result<Box<dyn CaptureDevice>> {
        Ok(Box::new(FakeStream {
            frames: 0,
            code_after: self.code_after,
            releases: Arc::clone(&self.releases),
        }))
    }
}

impl CaptureDevice for FakeStream {
    fn next_frame(&mut self) -> io::Result<Option<Frame>> {
        self.frames += 1;
        let marked = self.code_after.is_some_and(|n| self.frames > n);
        Ok(Some(Frame::new(
            1,
            1,
            PixelFormat::Gray,
            vec![if marked { 0 } else { 255 }],
        )))
    }

    fn release(&mut self) {
        self.releases.fetch_add(1, Ordering::SeqCst);
    }
}

struct DeniedCamera;

impl CaptureBackend for DeniedCamera {
    fn name(&self) -> &str {
        "denied"
    }

    fn acquire(&self) -> io::Result<Box<dyn CaptureDevice>> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "EACCES"))
    }
}

/// A dark pixel stands in for a QR code
struct DarkPixelDecoder;

impl PayloadDecoder for DarkPixelDecoder {
    fn decode(&self, frame: &Frame) -> Option<String> {
        (frame.data[0] == 0).then(|| "mailto:a@b.com?subject=Hi%20there".to_string())
    }
}

fn new_session() -> ScanSession {
    ScanSession::new(Arc::new(DarkPixelDecoder)).with_frame_interval(Duration::from_millis(1))
}

#[tokio::test]
async fn test_camera_scan_detects_email() {
    let camera = FakeCamera {
        code_after: Some(5),
        releases: Arc::new(AtomicU32::new(0)),
    };
    let mut session = new_session();

    session.start(&camera).unwrap();
    assert_eq!(session.run().await, ScanPhase::Detected);
    assert_eq!(session.attempts(), 6);
    assert_eq!(camera.releases.load(Ordering::SeqCst), 1);

    let result = session.take_result().unwrap();
    assert_eq!(result.kind(), ScanKind::Email);
    match result.payload() {
        Payload::Email(email) => assert_eq!(email.subject.as_deref(), Some("Hi there")),
        other => panic!("Expected email, got {:?}", other),
    }
}

#[tokio::test]
async fn test_stop_from_another_task() {
    let camera = FakeCamera {
        code_after: None,
        releases: Arc::new(AtomicU32::new(0)),
    };
    let mut session = new_session();
    session.start(&camera).unwrap();

    let stop = session.stop_handle();
    let stopper = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        stop.request_stop();
    });

    assert_eq!(session.run().await, ScanPhase::Stopped);
    stopper.await.unwrap();

    assert!(session.result().is_none());
    assert!(session.attempts() > 0);
    assert_eq!(camera.releases.load(Ordering::SeqCst), 1);

    // A second stop does nothing and never releases again
    assert!(!session.stop());
    drop(session);
    assert_eq!(camera.releases.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_permission_denied() {
    let mut session = new_session();
    assert_eq!(session.start(&DeniedCamera), Ok(ScanPhase::Failed));
    assert_eq!(session.last_error(), Some(&ScanError::PermissionDenied));
    assert_eq!(session.run().await, ScanPhase::Failed);
    assert_eq!(
        session.start(&DeniedCamera),
        Err(SessionError::AlreadyStarted(ScanPhase::Failed))
    );
}
