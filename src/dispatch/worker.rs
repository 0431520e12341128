//! Dispatch worker loop
//!
//! The worker owns all queued backend traffic: it blocks on the request
//! queue, processes one request at a time, and loops until it sees a
//! shutdown request or the producer side disconnects. Backend failures
//! on the append path are logged and swallowed; the worker never retries
//! and never crashes on a backend error, so a failing server shows up as
//! warn-level log noise rather than a stuck queue.

use crate::backend::DisplayBackend;
use crate::error::VizStreamError;
use crossbeam_channel::{Receiver, Sender};
use std::sync::Arc;

use super::{DispatchRequest, WorkerReply};

/// Background loop draining the dispatch queue
pub struct DispatchWorker {
    /// Backend all queued calls go to
    backend: Arc<dyn DisplayBackend>,
    /// Request receiver from the caller
    request_rx: Receiver<DispatchRequest>,
    /// Reply sender for markers and window-creation results
    reply_tx: Sender<WorkerReply>,
}

impl DispatchWorker {
    /// Create a worker over the given channel pair
    pub fn new(
        backend: Arc<dyn DisplayBackend>,
        request_rx: Receiver<DispatchRequest>,
        reply_tx: Sender<WorkerReply>,
    ) -> Self {
        Self {
            backend,
            request_rx,
            reply_tx,
        }
    }

    /// Run the worker loop until shutdown or producer disconnect
    pub fn run(self) {
        tracing::info!("dispatch worker started");

        while let Ok(request) = self.request_rx.recv() {
            if !self.handle_request(request) {
                break;
            }
        }

        tracing::info!("dispatch worker stopped");
    }

    /// Process one request; returns false when the loop should exit
    fn handle_request(&self, request: DispatchRequest) -> bool {
        match request {
            DispatchRequest::SyncMarker => {
                // Echo without touching the backend: the marker becomes
                // visible only after everything queued before it.
                let _ = self.reply_tx.send(WorkerReply::Marker);
            }
            DispatchRequest::CreateWindow {
                name,
                xs,
                ys,
                options,
            } => {
                let reply = match self.backend.create_line(&xs, &ys, &options) {
                    Ok(handle) => {
                        tracing::debug!(window = %name, handle = %handle, "window created");
                        WorkerReply::WindowCreated { name, handle }
                    }
                    Err(e) => {
                        tracing::warn!(window = %name, error = %e, "window creation failed");
                        WorkerReply::WindowFailed {
                            name,
                            message: e.to_string(),
                        }
                    }
                };
                let _ = self.reply_tx.send(reply);
            }
            DispatchRequest::Append {
                handle,
                tag,
                xs,
                ys,
                mode,
            } => {
                tracing::debug!(window = %handle, points = xs.len(), "processing append");
                if let Err(e) = self
                    .backend
                    .append_line(&handle, tag.as_deref(), &xs, &ys, mode)
                {
                    // No retry and no report back to the producer; the
                    // send was already acknowledged optimistically.
                    self.log_append_failure(&e);
                }
            }
            DispatchRequest::Shutdown => return false,
        }

        true
    }

    fn log_append_failure(&self, error: &VizStreamError) {
        tracing::warn!(error = %error, "backend rejected append, batch lost");
    }
}
