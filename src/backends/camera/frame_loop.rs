// SPDX-License-Identifier: GPL-3.0-only
//! Capture thread ownership
//!
//! Blocking capture APIs run on a dedicated thread. The stream state is
//! built on that thread, so handles that are not `Send` never move. The
//! controller stops the thread with a flag checked between captures and
//! joins it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};

/// What the capture thread does after one iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopAction {
    Continue,
    Stop,
}

/// Owns a capture thread until stopped or dropped
pub struct CaptureLoopController {
    thread_handle: Option<JoinHandle<()>>,
    stop_signal: Arc<AtomicBool>,
    name: String,
}

impl CaptureLoopController {
    /// Spawn `name`, build its state with `init_fn`, then run `capture_fn`
    /// until it returns [`LoopAction::Stop`] or [`stop`](Self::stop) is called
    ///
    /// When `init_fn` fails the thread exits without capturing. Callers that
    /// need the failure report it through their own channel.
    pub fn start_with_init<S, I, F>(name: &str, init_fn: I, mut capture_fn: F) -> Self
    where
        S: 'static,
        I: FnOnce() -> Result<S, String> + Send + 'static,
        F: FnMut(&mut S) -> LoopAction + Send + 'static,
    {
        let stop_signal = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop_signal);
        let thread_name = name.to_string();

        info!(name, "Starting capture thread");

        let thread_handle = thread::spawn(move || {
            let mut state = match init_fn() {
                Ok(state) => state,
                Err(e) => {
                    warn!(name = %thread_name, error = %e, "Capture setup failed");
                    return;
                }
            };

            while !thread_stop.load(Ordering::SeqCst) {
                if capture_fn(&mut state) == LoopAction::Stop {
                    debug!(name = %thread_name, "Capture ended itself");
                    break;
                }
            }

            // State (and with it the device) is dropped on this thread
            debug!(name = %thread_name, "Capture thread exiting");
        });

        Self {
            thread_handle: Some(thread_handle),
            stop_signal,
            name: name.to_string(),
        }
    }

    /// Signal the thread and wait for it; later calls do nothing
    pub fn stop(&mut self) {
        let Some(handle) = self.thread_handle.take() else {
            return;
        };

        self.stop_signal.store(true, Ordering::SeqCst);
        match handle.join() {
            Ok(()) => debug!(name = %self.name, "Capture thread joined"),
            Err(e) => warn!(name = %self.name, "Capture thread panicked: {:?}", e),
        }
    }
}

impl Drop for CaptureLoopController {
    fn drop(&mut self) {
        self.stop();
    }
}
