//! # vizstream: Non-blocking Metric Streaming
//!
//! Streams time-indexed metric samples from a running process to a
//! remote visualization backend without letting backend latency stall
//! the producer. The crate is the client-side dispatch layer: rendering
//! and transport belong to the backend behind the [`DisplayBackend`]
//! trait, and the shape of the caller's metric objects stays behind the
//! [`MetricSample`] trait.
//!
//! ## Architecture
//!
//! - **Facade**: [`Plotter`] decides new-window vs. append and
//!   synchronous vs. queued dispatch
//! - **Caching**: per-series sample caches hold unconfirmed points so a
//!   transient failure never loses data in synchronous mode
//! - **Dispatch**: an optional background worker serializes all backend
//!   calls behind a bounded FIFO queue
//! - **Communication**: crossbeam channels connect the single producer
//!   to the single worker
//!
//! ## Example
//!
//! ```ignore
//! use vizstream::{MemoryBackend, Plotter, PlotterConfig, ScalarMetric};
//! use std::sync::Arc;
//!
//! let backend = Arc::new(MemoryBackend::new());
//! let config = PlotterConfig::for_experiment("mnist")
//!     .with_async_dispatch(true);
//! let mut plotter = Plotter::new(backend, config);
//!
//! let mut loss = ScalarMetric::new("loss", Some("train"));
//! for epoch in 0..100 {
//!     loss.record(epoch as f64, train_one_epoch());
//!     plotter.plot_metric(&loss)?;
//! }
//!
//! // Make sure everything reached the backend, then stop the worker.
//! plotter.close()?;
//! ```

pub mod backend;
pub mod cache;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod plotter;
pub mod registry;
pub mod types;

// Re-export commonly used types
pub use backend::{BackendCall, DisplayBackend, MemoryBackend};
pub use cache::SeriesCache;
pub use config::{CachePolicy, PlotterConfig, QueuePolicy, DEFAULT_QUEUE_CAPACITY};
pub use dispatch::{DispatchHandle, DispatchRequest, WorkerReply};
pub use error::{Result, VizStreamError};
pub use plotter::Plotter;
pub use registry::WindowRegistry;
pub use types::{
    ExperimentSnapshot, MetricSample, Sample, ScalarMetric, SeriesKey, UpdateMode, WindowHandle,
    WindowOptions, DEFAULT_TAG,
};
