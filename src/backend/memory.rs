//! In-memory recording backend
//!
//! This module provides a display backend that records every call
//! instead of talking to a server. It is the test double for the whole
//! crate and doubles as an offline sink when no server is available.
//!
//! # Features
//!
//! - **Call recording**: every create/append/text call is stored in
//!   arrival order for later inspection
//! - **Failure injection**: the next N create or append calls can be
//!   made to fail, to exercise the retry/coalescing paths
//! - **Configurable latency**: an artificial per-append delay makes
//!   queue backpressure observable in tests
//!
//! # Example
//!
//! ```ignore
//! use vizstream::{BackendCall, MemoryBackend};
//!
//! let backend = MemoryBackend::new();
//! backend.fail_next_appends(2);
//!
//! // ... drive a Plotter against it ...
//!
//! for call in backend.calls() {
//!     if let BackendCall::AppendLine { xs, .. } = call {
//!         println!("appended {} points", xs.len());
//!     }
//! }
//! ```

use crate::error::{Result, VizStreamError};
use crate::types::{UpdateMode, WindowHandle, WindowOptions};
use std::sync::Mutex;
use std::time::Duration;

use super::DisplayBackend;

/// One recorded backend invocation
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    /// A window-creation call
    CreateLine {
        xs: Vec<f64>,
        ys: Vec<f64>,
        options: WindowOptions,
    },
    /// An append call against an existing window
    AppendLine {
        handle: WindowHandle,
        tag: Option<String>,
        xs: Vec<f64>,
        ys: Vec<f64>,
        mode: UpdateMode,
    },
    /// A text-display call
    DisplayText(String),
}

#[derive(Debug, Default)]
struct Inner {
    calls: Vec<BackendCall>,
    next_window_id: u32,
    fail_creates: usize,
    fail_appends: usize,
    append_delay: Option<Duration>,
}

/// Recording in-memory implementation of [`DisplayBackend`]
///
/// All state sits behind a mutex so the backend can be shared between
/// the caller and the dispatch worker.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    inner: Mutex<Inner>,
}

impl MemoryBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `n` create calls fail
    pub fn fail_next_creates(&self, n: usize) {
        self.inner.lock().unwrap().fail_creates = n;
    }

    /// Make the next `n` append calls fail
    pub fn fail_next_appends(&self, n: usize) {
        self.inner.lock().unwrap().fail_appends = n;
    }

    /// Delay every append call by `delay` (simulates a slow server)
    pub fn set_append_delay(&self, delay: Duration) {
        self.inner.lock().unwrap().append_delay = Some(delay);
    }

    /// All recorded calls, in arrival order (failed calls included)
    pub fn calls(&self) -> Vec<BackendCall> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// Number of recorded create calls
    pub fn create_calls(&self) -> usize {
        self.inner
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|c| matches!(c, BackendCall::CreateLine { .. }))
            .count()
    }

    /// Number of recorded append calls
    pub fn append_calls(&self) -> usize {
        self.inner
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|c| matches!(c, BackendCall::AppendLine { .. }))
            .count()
    }

    /// The most recent append call, if any
    pub fn last_append(&self) -> Option<BackendCall> {
        self.inner
            .lock()
            .unwrap()
            .calls
            .iter()
            .rev()
            .find(|c| matches!(c, BackendCall::AppendLine { .. }))
            .cloned()
    }
}

impl DisplayBackend for MemoryBackend {
    fn create_line(&self, xs: &[f64], ys: &[f64], options: &WindowOptions) -> Result<WindowHandle> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(BackendCall::CreateLine {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            options: options.clone(),
        });

        if inner.fail_creates > 0 {
            inner.fail_creates -= 1;
            return Err(VizStreamError::Backend("injected create failure".to_string()));
        }

        let id = inner.next_window_id;
        inner.next_window_id += 1;
        Ok(WindowHandle::new(format!("win_{id}")))
    }

    fn append_line(
        &self,
        handle: &WindowHandle,
        tag: Option<&str>,
        xs: &[f64],
        ys: &[f64],
        mode: UpdateMode,
    ) -> Result<()> {
        let delay = {
            let mut inner = self.inner.lock().unwrap();
            inner.calls.push(BackendCall::AppendLine {
                handle: handle.clone(),
                tag: tag.map(str::to_string),
                xs: xs.to_vec(),
                ys: ys.to_vec(),
                mode,
            });

            if inner.fail_appends > 0 {
                inner.fail_appends -= 1;
                return Err(VizStreamError::Backend("injected append failure".to_string()));
            }

            inner.append_delay
        };

        // Sleep outside the lock so a slow append does not block inspection
        if let Some(delay) = delay {
            std::thread::sleep(delay);
        }

        Ok(())
    }

    fn display_text(&self, text: &str) -> Result<()> {
        self.inner
            .lock()
            .unwrap()
            .calls
            .push(BackendCall::DisplayText(text.to_string()));
        Ok(())
    }
}
