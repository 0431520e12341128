//! Asynchronous dispatch subsystem
//!
//! This module moves backend traffic off the calling thread. A single
//! [`DispatchWorker`] thread drains a bounded FIFO request queue and
//! issues the backend calls; the caller talks to it through a
//! [`DispatchHandle`] holding the sending side of the queue and the
//! receiving side of a reply channel.
//!
//! # Architecture
//!
//! Two single-direction channels connect exactly one producer to one
//! worker:
//!
//! - [`DispatchRequest`] - work queue, caller to worker (bounded)
//! - [`WorkerReply`] - reply channel, worker to caller, used only for
//!   the drain-marker rendezvous and window-creation results
//!
//! Ordering is strictly FIFO relative to enqueue order. Window creation
//! travels through the same queue as appends and blocks the caller until
//! the handle comes back, so a new window can never overtake sample
//! batches enqueued before it.
//!
//! # Example
//!
//! ```ignore
//! use vizstream::dispatch::DispatchHandle;
//! use vizstream::{MemoryBackend, QueuePolicy};
//! use std::sync::Arc;
//!
//! let backend = Arc::new(MemoryBackend::new());
//! let dispatch = DispatchHandle::spawn(backend, 1024, QueuePolicy::Block);
//!
//! // ... enqueue appends ...
//!
//! dispatch.wait_for_drain()?;
//! dispatch.close()?;
//! ```

pub mod worker;

pub use worker::DispatchWorker;

use crate::backend::DisplayBackend;
use crate::config::QueuePolicy;
use crate::error::{Result, VizStreamError};
use crate::types::{UpdateMode, WindowHandle, WindowOptions};
use crossbeam_channel::{bounded, unbounded, Receiver, Sender, TrySendError};
use std::sync::Arc;
use std::thread::JoinHandle;

/// One unit of work for the dispatch worker
#[derive(Debug, Clone)]
pub enum DispatchRequest {
    /// Create a window from its first sample batch; the worker replies
    /// with [`WorkerReply::WindowCreated`] or [`WorkerReply::WindowFailed`]
    CreateWindow {
        name: String,
        xs: Vec<f64>,
        ys: Vec<f64>,
        options: WindowOptions,
    },
    /// Send a sample batch to an existing window
    Append {
        handle: WindowHandle,
        tag: Option<String>,
        xs: Vec<f64>,
        ys: Vec<f64>,
        mode: UpdateMode,
    },
    /// Drain marker; echoed on the reply channel without touching the
    /// backend
    SyncMarker,
    /// Stop the worker loop
    Shutdown,
}

/// Replies from the dispatch worker
#[derive(Debug, Clone)]
pub enum WorkerReply {
    /// Echo of a [`DispatchRequest::SyncMarker`]
    Marker,
    /// A queued window creation succeeded
    WindowCreated { name: String, handle: WindowHandle },
    /// A queued window creation failed
    WindowFailed { name: String, message: String },
}

/// Caller-side handle to a running dispatch worker
///
/// Owns the worker's join handle; [`close`](Self::close) stops the
/// worker deterministically, and dropping the handle requests shutdown
/// as a best effort.
pub struct DispatchHandle {
    request_tx: Option<Sender<DispatchRequest>>,
    reply_rx: Receiver<WorkerReply>,
    queue_policy: QueuePolicy,
    join: Option<JoinHandle<()>>,
}

impl DispatchHandle {
    /// Spawn a dispatch worker over the given backend
    ///
    /// `queue_capacity` bounds the work queue; `queue_policy` decides
    /// what happens to append requests when it is full.
    pub fn spawn(
        backend: Arc<dyn DisplayBackend>,
        queue_capacity: usize,
        queue_policy: QueuePolicy,
    ) -> Self {
        let (request_tx, request_rx) = bounded(queue_capacity.max(1));
        // Replies are request/response under the single-writer contract;
        // unbounded keeps the worker from ever blocking on a reply.
        let (reply_tx, reply_rx) = unbounded();

        let join = std::thread::Builder::new()
            .name("vizstream-dispatch".to_string())
            .spawn(move || DispatchWorker::new(backend, request_rx, reply_tx).run())
            .expect("failed to spawn dispatch worker thread");

        Self {
            request_tx: Some(request_tx),
            reply_rx,
            queue_policy,
            join: Some(join),
        }
    }

    fn sender(&self) -> Result<&Sender<DispatchRequest>> {
        self.request_tx
            .as_ref()
            .ok_or(VizStreamError::WorkerUnavailable)
    }

    /// Enqueue an append request, applying the queue policy
    ///
    /// Returns as soon as the request is queued; the eventual backend
    /// outcome is not reported back (optimistic-success design).
    pub fn enqueue_append(
        &self,
        handle: WindowHandle,
        tag: Option<String>,
        xs: Vec<f64>,
        ys: Vec<f64>,
    ) -> Result<()> {
        let request = DispatchRequest::Append {
            handle,
            tag,
            xs,
            ys,
            mode: UpdateMode::Append,
        };

        match self.queue_policy {
            QueuePolicy::Block => self
                .sender()?
                .send(request)
                .map_err(|_| VizStreamError::WorkerUnavailable),
            QueuePolicy::DropNewest => match self.sender()?.try_send(request) {
                Ok(()) => Ok(()),
                Err(TrySendError::Full(_)) => {
                    tracing::warn!("dispatch queue full, dropping append request");
                    Ok(())
                }
                Err(TrySendError::Disconnected(_)) => Err(VizStreamError::WorkerUnavailable),
            },
            QueuePolicy::Reject => match self.sender()?.try_send(request) {
                Ok(()) => Ok(()),
                Err(TrySendError::Full(_)) => Err(VizStreamError::QueueFull),
                Err(TrySendError::Disconnected(_)) => Err(VizStreamError::WorkerUnavailable),
            },
        }
    }

    /// Create a window through the worker queue
    ///
    /// Blocks until the worker processes the request and returns the
    /// backend-assigned handle, so creation stays synchronous from the
    /// caller's perspective while preserving FIFO order with any appends
    /// already queued. Creation requests ignore the drop/reject queue
    /// policies; losing one would lose the window handle.
    pub fn create_window(
        &self,
        name: String,
        xs: Vec<f64>,
        ys: Vec<f64>,
        options: WindowOptions,
    ) -> Result<WindowHandle> {
        self.sender()?
            .send(DispatchRequest::CreateWindow {
                name,
                xs,
                ys,
                options,
            })
            .map_err(|_| VizStreamError::WorkerUnavailable)?;

        loop {
            match self.reply_rx.recv() {
                Ok(WorkerReply::WindowCreated { handle, .. }) => return Ok(handle),
                Ok(WorkerReply::WindowFailed { name, message }) => {
                    return Err(VizStreamError::WindowCreation { name, message })
                }
                // Stale marker from an abandoned drain; skip it
                Ok(WorkerReply::Marker) => continue,
                Err(_) => return Err(VizStreamError::WorkerUnavailable),
            }
        }
    }

    /// Block until every request enqueued before this call has been
    /// processed by the worker
    pub fn wait_for_drain(&self) -> Result<()> {
        self.sender()?
            .send(DispatchRequest::SyncMarker)
            .map_err(|_| VizStreamError::WorkerUnavailable)?;

        loop {
            match self.reply_rx.recv() {
                Ok(WorkerReply::Marker) => return Ok(()),
                // Window replies belong to an earlier creation; skip
                Ok(_) => continue,
                Err(_) => return Err(VizStreamError::WorkerUnavailable),
            }
        }
    }

    /// Stop the worker deterministically
    ///
    /// Sends a shutdown request behind any pending work and joins the
    /// worker thread, so every request enqueued before `close` is
    /// processed first.
    pub fn close(mut self) -> Result<()> {
        if let Some(tx) = self.request_tx.take() {
            let _ = tx.send(DispatchRequest::Shutdown);
        }
        if let Some(join) = self.join.take() {
            join.join()
                .map_err(|_| VizStreamError::Backend("dispatch worker panicked".to_string()))?;
        }
        Ok(())
    }
}

impl Drop for DispatchHandle {
    fn drop(&mut self) {
        // Best-effort shutdown; dropping the sender alone also stops the
        // worker once the queue drains.
        if let Some(tx) = self.request_tx.take() {
            let _ = tx.try_send(DispatchRequest::Shutdown);
        }
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}
