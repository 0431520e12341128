//! Display backend interface
//!
//! The backend is the remote visualization service the plotter talks to.
//! It is reached through the [`DisplayBackend`] trait so the core stays
//! independent of the actual transport; this crate only ships
//! [`MemoryBackend`], an in-memory recording implementation used by
//! tests and offline runs.
//!
//! Implementations must be `Send + Sync`: in async mode the dispatch
//! worker and the calling thread both hold the backend behind an `Arc`,
//! although queued traffic is serialized through the worker.
//!
//! # Example
//!
//! ```ignore
//! use vizstream::{DisplayBackend, MemoryBackend, Plotter, PlotterConfig};
//! use std::sync::Arc;
//!
//! let backend = Arc::new(MemoryBackend::new());
//! let mut plotter = Plotter::new(backend.clone(), PlotterConfig::default());
//! ```

pub mod memory;

pub use memory::{BackendCall, MemoryBackend};

use crate::error::Result;
use crate::types::{UpdateMode, WindowHandle, WindowOptions};

#[cfg(test)]
use mockall::automock;

/// Interface to the remote visualization service
///
/// The three primitives mirror a visdom-style line API: create a window
/// from a first batch of samples, append further samples to an existing
/// window, and display free-form text.
#[cfg_attr(test, automock)]
pub trait DisplayBackend: Send + Sync {
    /// Create a plot window from its first sample batch
    ///
    /// Returns the backend-assigned handle identifying the window for
    /// all later append calls.
    fn create_line(&self, xs: &[f64], ys: &[f64], options: &WindowOptions) -> Result<WindowHandle>;

    /// Send a sample batch to an existing window
    ///
    /// `tag` selects the line within the window; `mode` chooses between
    /// appending to and replacing the series. An `Err` is the failure
    /// indicator the facade maps to `sent = false` in synchronous mode.
    fn append_line<'a>(
        &self,
        handle: &WindowHandle,
        tag: Option<&'a str>,
        xs: &[f64],
        ys: &[f64],
        mode: UpdateMode,
    ) -> Result<()>;

    /// Display an arbitrary formatted string
    fn display_text(&self, text: &str) -> Result<()>;
}
