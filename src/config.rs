//! Plotter configuration
//!
//! This module defines the per-plotter configuration surface: the async
//! dispatch flag, the backend namespace, axis-label defaults, per-window
//! option presets, and the capacity policies for the series caches and
//! the dispatch queue.
//!
//! Configurations are plain serde values and can be loaded from or saved
//! to TOML files:
//!
//! ```ignore
//! use vizstream::PlotterConfig;
//!
//! let config = PlotterConfig::load("plotter.toml")?;
//! let plotter = Plotter::new(backend, config);
//! ```

use crate::error::{Result, VizStreamError};
use crate::types::WindowOptions;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Default capacity of the dispatch work queue
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Capacity policy for a per-series sample cache
///
/// Growth is unbounded by default: while dispatch keeps failing, samples
/// accumulate so that no data point is lost across transient failures.
/// The bounded policies trade that guarantee for a memory ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CachePolicy {
    /// Never drop a pending sample (original behavior)
    #[default]
    Unbounded,
    /// Reject new samples with an error once the limit is reached
    FailFast(usize),
    /// Discard the oldest pending sample once the limit is reached
    DropOldest(usize),
}

/// Backpressure policy applied when the dispatch queue is full
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QueuePolicy {
    /// Block the producer until the worker frees a slot
    #[default]
    Block,
    /// Drop the new request and log a warning
    DropNewest,
    /// Return [`VizStreamError::QueueFull`] to the caller
    Reject,
}

/// Configuration for one [`crate::Plotter`] instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotterConfig {
    /// Enable the queued dispatch path (background worker thread)
    #[serde(default)]
    pub async_dispatch: bool,

    /// Backend namespace; defaults to the experiment's name when built
    /// via [`PlotterConfig::for_experiment`]
    #[serde(default)]
    pub env_namespace: Option<String>,

    /// Plotter-wide default x-axis label, applied when a window does not
    /// specify one
    #[serde(default)]
    pub x_axis_label: Option<String>,

    /// Per-window option presets, applied before each window's first use
    #[serde(default)]
    pub window_options: HashMap<String, WindowOptions>,

    /// Capacity policy for the per-series sample caches
    #[serde(default)]
    pub cache_policy: CachePolicy,

    /// Capacity of the dispatch work queue
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Backpressure policy when the dispatch queue is full
    #[serde(default)]
    pub queue_policy: QueuePolicy,
}

fn default_queue_capacity() -> usize {
    DEFAULT_QUEUE_CAPACITY
}

impl Default for PlotterConfig {
    fn default() -> Self {
        Self {
            async_dispatch: false,
            env_namespace: None,
            x_axis_label: None,
            window_options: HashMap::new(),
            cache_policy: CachePolicy::default(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            queue_policy: QueuePolicy::default(),
        }
    }
}

impl PlotterConfig {
    /// Create a default configuration (synchronous dispatch)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration namespaced after an experiment
    pub fn for_experiment(name: impl Into<String>) -> Self {
        Self {
            env_namespace: Some(name.into()),
            ..Default::default()
        }
    }

    /// Enable or disable the queued dispatch path
    pub fn with_async_dispatch(mut self, enabled: bool) -> Self {
        self.async_dispatch = enabled;
        self
    }

    /// Set the plotter-wide default x-axis label
    pub fn with_x_axis_label(mut self, label: impl Into<String>) -> Self {
        self.x_axis_label = Some(label.into());
        self
    }

    /// Set the cache capacity policy
    pub fn with_cache_policy(mut self, policy: CachePolicy) -> Self {
        self.cache_policy = policy;
        self
    }

    /// Set the dispatch queue capacity and backpressure policy
    pub fn with_queue(mut self, capacity: usize, policy: QueuePolicy) -> Self {
        self.queue_capacity = capacity.max(1);
        self.queue_policy = policy;
        self
    }

    /// Pre-register options for a window by display name
    pub fn with_window_options(mut self, name: impl Into<String>, options: WindowOptions) -> Self {
        self.window_options.insert(name.into(), options);
        self
    }

    /// Load a configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            VizStreamError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        toml::from_str(&content).map_err(|e| {
            VizStreamError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })
    }

    /// Save the configuration to a TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| VizStreamError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content).map_err(|e| {
            VizStreamError::Config(format!("Failed to write config file {:?}: {}", path, e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = PlotterConfig::default();
        assert!(!config.async_dispatch);
        assert!(config.env_namespace.is_none());
        assert!(config.x_axis_label.is_none());
        assert_eq!(config.queue_capacity, DEFAULT_QUEUE_CAPACITY);
        assert_eq!(config.queue_policy, QueuePolicy::Block);
        assert_eq!(config.cache_policy, CachePolicy::Unbounded);
    }

    #[test]
    fn test_for_experiment_sets_namespace() {
        let config = PlotterConfig::for_experiment("mnist-baseline");
        assert_eq!(config.env_namespace.as_deref(), Some("mnist-baseline"));
    }

    #[test]
    fn test_builder_methods() {
        let config = PlotterConfig::new()
            .with_async_dispatch(true)
            .with_x_axis_label("Epoch")
            .with_cache_policy(CachePolicy::DropOldest(256))
            .with_queue(32, QueuePolicy::Reject)
            .with_window_options("loss", WindowOptions::new().with_title("Training loss"));

        assert!(config.async_dispatch);
        assert_eq!(config.x_axis_label.as_deref(), Some("Epoch"));
        assert_eq!(config.cache_policy, CachePolicy::DropOldest(256));
        assert_eq!(config.queue_capacity, 32);
        assert_eq!(config.queue_policy, QueuePolicy::Reject);
        assert!(config.window_options.contains_key("loss"));
    }

    #[test]
    fn test_queue_capacity_never_zero() {
        let config = PlotterConfig::new().with_queue(0, QueuePolicy::Block);
        assert_eq!(config.queue_capacity, 1);
    }

    #[test]
    fn test_config_toml_round_trip() {
        let config = PlotterConfig::for_experiment("xp")
            .with_async_dispatch(true)
            .with_x_axis_label("Time (s)");

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: PlotterConfig = toml::from_str(&toml_str).unwrap();

        assert!(parsed.async_dispatch);
        assert_eq!(parsed.env_namespace.as_deref(), Some("xp"));
        assert_eq!(parsed.x_axis_label.as_deref(), Some("Time (s)"));
    }

    #[test]
    fn test_config_parses_partial_toml() {
        let parsed: PlotterConfig = toml::from_str("async_dispatch = true").unwrap();
        assert!(parsed.async_dispatch);
        assert_eq!(parsed.queue_capacity, DEFAULT_QUEUE_CAPACITY);
    }
}
