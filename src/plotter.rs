//! Plotter facade
//!
//! [`Plotter`] is the caller-facing entry point. It decides between the
//! new-window and append paths, between synchronous and queued dispatch,
//! and reports success back so the per-series caches are cleared only
//! when data actually went out (or was optimistically queued).
//!
//! # Dispatch modes
//!
//! - **Synchronous** (default): every backend call happens on the
//!   calling thread; an append failure yields `sent = false` and the
//!   pending samples stay cached for the next attempt.
//! - **Asynchronous** (`async_dispatch = true`): appends are queued to a
//!   background worker and acknowledged immediately. The eventual
//!   backend outcome is not reported back, so a real failure loses the
//!   batch; this optimistic trade favors producer throughput.
//!
//! Window creation is synchronous from the caller's perspective in both
//! modes; in async mode it travels through the worker queue and blocks
//! on the reply, keeping all queued traffic serialized and FIFO.
//!
//! # Example
//!
//! ```ignore
//! use vizstream::{MemoryBackend, Plotter, PlotterConfig, ScalarMetric};
//! use std::sync::Arc;
//!
//! let backend = Arc::new(MemoryBackend::new());
//! let config = PlotterConfig::for_experiment("mnist").with_async_dispatch(true);
//! let mut plotter = Plotter::new(backend, config);
//!
//! let mut loss = ScalarMetric::new("loss", Some("train"));
//! for epoch in 0..10 {
//!     loss.record(epoch as f64, train_one_epoch());
//!     plotter.plot_metric(&loss)?;
//! }
//!
//! plotter.close()?;
//! ```

use crate::backend::DisplayBackend;
use crate::cache::SeriesCache;
use crate::config::PlotterConfig;
use crate::dispatch::DispatchHandle;
use crate::error::{Result, VizStreamError};
use crate::registry::WindowRegistry;
use crate::types::{
    ExperimentSnapshot, MetricSample, Sample, SeriesKey, UpdateMode, WindowOptions,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Streams metric samples to a remote visualization backend
///
/// One `Plotter` assumes a single writer: all mutating operations take
/// `&mut self`, so sharing an instance across threads requires an
/// external lock. Independent experiments should use independent
/// `Plotter` instances; no state is process-wide.
pub struct Plotter {
    /// Shared backend client
    backend: Arc<dyn DisplayBackend>,
    /// Per-instance configuration
    config: PlotterConfig,
    /// Window handles and pre-registered options
    registry: WindowRegistry,
    /// Pending samples per series id
    caches: HashMap<String, SeriesCache>,
    /// Background dispatch, present only in async mode
    dispatch: Option<DispatchHandle>,
}

impl Plotter {
    /// Create a plotter over the given backend
    ///
    /// Spawns the dispatch worker when `config.async_dispatch` is set.
    /// Per-window option presets from the config are registered before
    /// any window is created.
    pub fn new(backend: Arc<dyn DisplayBackend>, config: PlotterConfig) -> Self {
        let mut registry = WindowRegistry::new();
        for (name, options) in &config.window_options {
            registry.set_options(name, options.clone());
        }

        let dispatch = config.async_dispatch.then(|| {
            DispatchHandle::spawn(backend.clone(), config.queue_capacity, config.queue_policy)
        });

        tracing::info!(
            namespace = config.env_namespace.as_deref().unwrap_or("main"),
            async_dispatch = config.async_dispatch,
            "plotter initialized"
        );

        Self {
            backend,
            config,
            registry,
            caches: HashMap::new(),
            dispatch,
        }
    }

    /// The configuration this plotter was built with
    pub fn config(&self) -> &PlotterConfig {
        &self.config
    }

    /// Store or overwrite display options for a window name
    ///
    /// Honored at that window's first creation; later calls have no
    /// guaranteed effect.
    pub fn set_window_options(&mut self, name: &str, options: WindowOptions) {
        self.registry.set_options(name, options);
    }

    /// Number of samples pending (unconfirmed) for a series
    pub fn pending_samples(&self, key: &SeriesKey) -> usize {
        self.caches.get(&key.id()).map_or(0, SeriesCache::len)
    }

    /// Send a batch of samples for one series
    ///
    /// Creates the window on first use for `key`'s name, with
    /// `time_axis` selecting the default axis label. Returns whether the
    /// batch was sent: always `true` after a successful creation or an
    /// async enqueue (optimistic), the backend's verdict in synchronous
    /// mode. Callers that buffer samples should clear their buffer only
    /// on `true`.
    pub fn plot_xy(
        &mut self,
        key: &SeriesKey,
        xs: &[f64],
        ys: &[f64],
        time_axis: bool,
    ) -> Result<bool> {
        debug_assert_eq!(xs.len(), ys.len(), "x and y sequences must be parallel");
        if xs.is_empty() {
            return Ok(true);
        }

        let Self {
            backend,
            config,
            registry,
            dispatch,
            ..
        } = self;

        let (handle, created) = registry.ensure_window(
            key.name(),
            key.tag(),
            config.x_axis_label.as_deref(),
            time_axis,
            |options| match dispatch {
                Some(dispatch) => dispatch.create_window(
                    key.name().to_string(),
                    xs.to_vec(),
                    ys.to_vec(),
                    options.clone(),
                ),
                None => {
                    backend
                        .create_line(xs, ys, options)
                        .map_err(|e| VizStreamError::WindowCreation {
                            name: key.name().to_string(),
                            message: e.to_string(),
                        })
                }
            },
        )?;

        if created {
            // The first batch went out with the creation call
            return Ok(true);
        }

        match dispatch {
            Some(dispatch) => {
                dispatch.enqueue_append(
                    handle,
                    key.tag().map(str::to_string),
                    xs.to_vec(),
                    ys.to_vec(),
                )?;
                // Assume the send will go right; see module docs
                Ok(true)
            }
            None => match backend.append_line(&handle, key.tag(), xs, ys, UpdateMode::Append) {
                Ok(()) => Ok(true),
                Err(e) => {
                    tracing::warn!(window = key.name(), error = %e, "append failed, keeping cache");
                    Ok(false)
                }
            },
        }
    }

    /// Record one metric observation and send the accumulated backlog
    ///
    /// The sample joins the metric's cache; the full cached batch is
    /// sent, and the cache is cleared only when the send succeeds, so
    /// transient failures coalesce into one larger batch on the next
    /// attempt.
    pub fn plot_metric(&mut self, metric: &dyn MetricSample) -> Result<bool> {
        let key = SeriesKey::new(metric.name(), metric.tag());
        let id = key.id();

        let policy = self.config.cache_policy;
        let cache = self
            .caches
            .entry(id.clone())
            .or_insert_with(|| SeriesCache::new(id.clone(), policy));
        cache.update(Sample::new(metric.index(), metric.value()))?;
        let (xs, ys) = cache.snapshot();

        let sent = self.plot_xy(&key, &xs, &ys, metric.time_indexed())?;
        if sent {
            if let Some(cache) = self.caches.get_mut(&id) {
                cache.clear();
            }
        }
        Ok(sent)
    }

    /// Replay a fully logged series
    ///
    /// The x-axis is treated as time-based when any x-value carries a
    /// fractional part.
    pub fn plot_logged(
        &mut self,
        name: &str,
        tag: Option<&str>,
        points: &[(f64, f64)],
    ) -> Result<bool> {
        let key = SeriesKey::new(name, tag);
        let (xs, ys): (Vec<f64>, Vec<f64>) = points.iter().copied().unzip();
        let time_axis = xs.iter().any(|x| x.fract() != 0.0);
        self.plot_xy(&key, &xs, &ys, time_axis)
    }

    /// Display an experiment's config and replay its logged history
    ///
    /// Series are replayed in sorted (tag, name) order for deterministic
    /// window layout.
    pub fn plot_experiment(&mut self, xp: &ExperimentSnapshot) -> Result<()> {
        self.plot_config(&xp.config)?;

        for ((tag, name), points) in &xp.logged {
            self.plot_logged(name, Some(tag), points)?;
        }
        Ok(())
    }

    /// Pretty-print a config map on the backend's text display
    ///
    /// Entries are rendered one per line (`<br />` separated, as the
    /// backend displays HTML-ish text) in sorted key order; a `git_diff`
    /// entry is omitted as too noisy for display.
    pub fn plot_config(
        &self,
        config: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<()> {
        let mut entries: Vec<_> = config.iter().filter(|(k, _)| *k != "git_diff").collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));

        let text = entries
            .iter()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect::<Vec<_>>()
            .join("<br />");

        self.backend.display_text(&text)
    }

    /// Block until every queued request has been processed
    ///
    /// No-op in synchronous mode.
    pub fn wait_for_drain(&self) -> Result<()> {
        match &self.dispatch {
            Some(dispatch) => dispatch.wait_for_drain(),
            None => Ok(()),
        }
    }

    /// Drain pending work and stop the dispatch worker
    ///
    /// After `close` returns, every request enqueued before it has been
    /// processed and the worker thread has exited. No-op in synchronous
    /// mode.
    pub fn close(mut self) -> Result<()> {
        if let Some(dispatch) = self.dispatch.take() {
            dispatch.wait_for_drain()?;
            dispatch.close()?;
        }
        Ok(())
    }
}
