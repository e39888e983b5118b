// SPDX-License-Identifier: GPL-3.0-only

//! V4L2 capture backend
//!
//! The device is opened and streamed on a dedicated thread. Only the most
//! recent frame is kept, converted to grayscale, in a shared slot that the
//! scanner polls.

use super::frame_loop::{CaptureLoopController, LoopAction};
use super::types::{Frame, PixelFormat};
use super::{CaptureBackend, CaptureDevice};
use crate::constants::scanner::{
    CAPTURE_BUFFERS, CAPTURE_HEIGHT, CAPTURE_POLL_TIMEOUT, CAPTURE_WIDTH,
};
use std::io;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{debug, info, warn};
use v4l::buffer::Type;
use v4l::capability::Flags;
use v4l::io::mmap::Stream;
use v4l::io::traits::CaptureStream;
use v4l::prelude::*;
use v4l::video::Capture;
use v4l::{Format, FourCC};

/// Opens a V4L2 video capture node such as `/dev/video0`
#[derive(Debug, Clone)]
pub struct V4l2Backend {
    path: String,
    width: u32,
    height: u32,
}

impl V4l2Backend {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            width: CAPTURE_WIDTH,
            height: CAPTURE_HEIGHT,
        }
    }
}

impl CaptureBackend for V4l2Backend {
    fn name(&self) -> &str {
        &self.path
    }

    fn acquire(&self) -> io::Result<Box<dyn CaptureDevice>> {
        let (ready_tx, ready_rx) = mpsc::channel::<io::Result<()>>();
        let latest: Arc<Mutex<Option<Frame>>> = Arc::new(Mutex::new(None));
        let failure: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));

        let path = self.path.clone();
        let (width, height) = (self.width, self.height);
        let loop_latest = Arc::clone(&latest);
        let loop_failure = Arc::clone(&failure);

        let controller = CaptureLoopController::start_with_init(
            "v4l2-capture",
            move || match open_stream(&path, width, height) {
                Ok(state) => {
                    let _ = ready_tx.send(Ok(()));
                    Ok(state)
                }
                Err(e) => {
                    let message = e.to_string();
                    let _ = ready_tx.send(Err(e));
                    Err(message)
                }
            },
            move |state: &mut StreamState| capture_once(state, &loop_latest, &loop_failure),
        );

        match ready_rx.recv() {
            Ok(Ok(())) => {
                info!(path = %self.path, "V4L2 device acquired");
                Ok(Box::new(V4l2Device {
                    controller,
                    latest,
                    failure,
                }))
            }
            Ok(Err(e)) => Err(e),
            Err(_) => Err(io::Error::other("capture thread exited during setup")),
        }
    }
}

/// Pixel encodings this backend can turn into grayscale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceEncoding {
    Yuyv,
    Grey,
    Mjpeg,
}

impl SourceEncoding {
    fn from_fourcc(fourcc: FourCC) -> Option<Self> {
        match &fourcc.repr {
            b"YUYV" => Some(Self::Yuyv),
            b"GREY" => Some(Self::Grey),
            b"MJPG" => Some(Self::Mjpeg),
            _ => None,
        }
    }
}

struct StreamState {
    // Keeps the device node open for the stream's lifetime
    _device: Device,
    stream: Stream<'static>,
    encoding: SourceEncoding,
    width: u32,
    height: u32,
    stride: u32,
}

fn open_stream(path: &str, width: u32, height: u32) -> io::Result<StreamState> {
    let device = Device::with_path(path)?;

    let caps = device.query_caps()?;
    if !caps.capabilities.contains(Flags::VIDEO_CAPTURE) {
        return Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("{} ({}) has no video capture capability", path, caps.card),
        ));
    }

    // Ask for YUYV; drivers answer with the closest format they support
    let requested = Format::new(width, height, FourCC::new(b"YUYV"));
    let format = device.set_format(&requested)?;
    let encoding = SourceEncoding::from_fourcc(format.fourcc).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::Unsupported,
            format!("unsupported pixel format {}", format.fourcc),
        )
    })?;

    info!(
        path,
        width = format.width,
        height = format.height,
        fourcc = %format.fourcc,
        "V4L2 format configured"
    );

    let mut stream = Stream::with_buffers(&device, Type::VideoCapture, CAPTURE_BUFFERS)?;
    // Bounded waits let a stop request through when the camera stalls
    stream.set_timeout(CAPTURE_POLL_TIMEOUT);

    Ok(StreamState {
        _device: device,
        stream,
        encoding,
        width: format.width,
        height: format.height,
        stride: format.stride,
    })
}

fn capture_once(
    state: &mut StreamState,
    latest: &Mutex<Option<Frame>>,
    failure: &Mutex<Option<String>>,
) -> LoopAction {
    let (buf, meta) = match state.stream.next() {
        Ok(frame) => frame,
        Err(e) if e.kind() == io::ErrorKind::TimedOut => return LoopAction::Continue,
        Err(e) => {
            warn!(error = %e, "Failed to capture frame");
            if let Ok(mut slot) = failure.lock() {
                *slot = Some(e.to_string());
            }
            return LoopAction::Stop;
        }
    };

    let gray = match state.encoding {
        SourceEncoding::Yuyv => yuyv_to_gray(buf, state.width, state.height, state.stride),
        SourceEncoding::Grey => strip_stride(buf, state.width, state.height, state.stride),
        SourceEncoding::Mjpeg => match image::load_from_memory(buf) {
            Ok(img) => img.to_luma8().into_raw(),
            Err(e) => {
                // Corrupt MJPEG frames happen during warm-up; skip them
                debug!(error = %e, sequence = meta.sequence, "Dropping undecodable frame");
                return LoopAction::Continue;
            }
        },
    };

    if gray.len() != (state.width * state.height) as usize {
        debug!(sequence = meta.sequence, "Dropping short frame");
        return LoopAction::Continue;
    }

    let frame = Frame {
        width: state.width,
        height: state.height,
        stride: state.width,
        format: PixelFormat::Gray,
        data: Arc::from(gray.into_boxed_slice()),
        captured_at: Instant::now(),
    };

    if let Ok(mut slot) = latest.lock() {
        *slot = Some(frame);
    }
    LoopAction::Continue
}

/// Take the luma byte of every YUYV pixel pair
fn yuyv_to_gray(buf: &[u8], width: u32, height: u32, stride: u32) -> Vec<u8> {
    let (width, height) = (width as usize, height as usize);
    let stride = (stride as usize).max(width * 2);
    let mut gray = Vec::with_capacity(width * height);

    for row in buf.chunks(stride).take(height) {
        gray.extend(row.iter().take(width * 2).step_by(2));
    }
    gray
}

fn strip_stride(buf: &[u8], width: u32, height: u32, stride: u32) -> Vec<u8> {
    let (width, height) = (width as usize, height as usize);
    let stride = (stride as usize).max(width);
    let mut gray = Vec::with_capacity(width * height);

    for row in buf.chunks(stride).take(height) {
        gray.extend_from_slice(&row[..width.min(row.len())]);
    }
    gray
}

/// An open V4L2 device streaming on its own thread
struct V4l2Device {
    controller: CaptureLoopController,
    latest: Arc<Mutex<Option<Frame>>>,
    failure: Arc<Mutex<Option<String>>>,
}

impl CaptureDevice for V4l2Device {
    fn next_frame(&mut self) -> io::Result<Option<Frame>> {
        if let Some(message) = self.failure.lock().ok().and_then(|mut f| f.take()) {
            return Err(io::Error::other(message));
        }
        Ok(self.latest.lock().ok().and_then(|mut slot| slot.take()))
    }

    fn release(&mut self) {
        self.controller.stop();
    }
}
