//! Core data types shared across the crate
//!
//! This module defines the sample/series vocabulary, window identity and
//! options, and the producer-side [`MetricSample`] trait. The plotting
//! backend itself lives in [`crate::backend`]; the types here are what
//! flow between the caller, the facade, and the dispatch worker.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tag value treated as "no tag" for a series
pub const DEFAULT_TAG: &str = "default";

/// A single (x, y) measurement, immutable once created
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Index value (step count or elapsed seconds)
    pub x: f64,
    /// Measured value
    pub y: f64,
}

impl Sample {
    /// Create a new sample
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Identity of one logical line within one window
///
/// The `name` selects the window, the optional `tag` selects the line
/// within it. A literal tag of `"default"` (or an empty string) is
/// normalized to `None`, meaning "the unlabeled series in this window".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeriesKey {
    name: String,
    tag: Option<String>,
}

impl SeriesKey {
    /// Create a series key, normalizing the default tag to `None`
    pub fn new(name: impl Into<String>, tag: Option<&str>) -> Self {
        let tag = tag
            .filter(|t| !t.is_empty() && *t != DEFAULT_TAG)
            .map(str::to_string);
        Self {
            name: name.into(),
            tag,
        }
    }

    /// Window display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Series tag, if any
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Stable identifier used as the cache key for this series
    pub fn id(&self) -> String {
        format!("{}_{}", self.name, self.tag.as_deref().unwrap_or(DEFAULT_TAG))
    }
}

/// Backend-assigned opaque identifier for a remote plot window
///
/// A handle is created exactly once per window name and never changes
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WindowHandle(String);

impl WindowHandle {
    /// Wrap a backend-assigned identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw backend identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display options for a remote plot window
///
/// Options set before a window's first creation are honored at creation
/// time; mutations after first use are backend-dependent and not
/// guaranteed to take effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WindowOptions {
    /// Window title (defaults to the window name at creation)
    #[serde(default)]
    pub title: Option<String>,

    /// X-axis label (defaults per the axis-label resolution rules)
    #[serde(default)]
    pub xlabel: Option<String>,

    /// Legend entries (seeded with the first tag when unset)
    #[serde(default)]
    pub legend: Option<Vec<String>>,
}

impl WindowOptions {
    /// Create empty options (all defaults resolved at window creation)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the window title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the x-axis label
    pub fn with_xlabel(mut self, xlabel: impl Into<String>) -> Self {
        self.xlabel = Some(xlabel.into());
        self
    }

    /// Set the legend entries
    pub fn with_legend(mut self, legend: Vec<String>) -> Self {
        self.legend = Some(legend);
        self
    }
}

/// Append/update semantics for the backend's line primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum UpdateMode {
    /// Append new points to the existing series
    #[default]
    Append,
    /// Replace the series data entirely
    Replace,
}

/// Producer-side view of one metric
///
/// Implemented by the caller's metric objects; the plotter only needs a
/// stable (name, tag) identity, the current index and value, and whether
/// the x-axis is wall-clock based.
pub trait MetricSample {
    /// Metric name (selects the window)
    fn name(&self) -> &str;

    /// Metric tag (selects the line within the window), if any
    fn tag(&self) -> Option<&str>;

    /// Current index value (step count or elapsed seconds)
    fn index(&self) -> f64;

    /// Current measured value
    fn value(&self) -> f64;

    /// Whether the x-axis should be interpreted as time-based
    fn time_indexed(&self) -> bool;
}

/// A plain owned metric, convenient for callers without their own
/// metric objects
#[derive(Debug, Clone)]
pub struct ScalarMetric {
    name: String,
    tag: Option<String>,
    index: f64,
    value: f64,
    time_indexed: bool,
}

impl ScalarMetric {
    /// Create a metric with no recorded value yet
    pub fn new(name: impl Into<String>, tag: Option<&str>) -> Self {
        Self {
            name: name.into(),
            tag: tag.map(str::to_string),
            index: 0.0,
            value: 0.0,
            time_indexed: false,
        }
    }

    /// Interpret the index as elapsed seconds rather than a step count
    pub fn time_based(mut self) -> Self {
        self.time_indexed = true;
        self
    }

    /// Record the current value at the given index
    pub fn record(&mut self, index: f64, value: f64) {
        self.index = index;
        self.value = value;
    }
}

impl MetricSample for ScalarMetric {
    fn name(&self) -> &str {
        &self.name
    }

    fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    fn index(&self) -> f64 {
        self.index
    }

    fn value(&self) -> f64 {
        self.value
    }

    fn time_indexed(&self) -> bool {
        self.time_indexed
    }
}

/// A point-in-time view of an experiment: its config map and the full
/// logged history of every series, replayable via
/// [`crate::Plotter::plot_experiment`]
#[derive(Debug, Clone, Default)]
pub struct ExperimentSnapshot {
    /// Experiment name (also the default backend namespace)
    pub name: String,

    /// Configuration entries to display as text
    pub config: serde_json::Map<String, serde_json::Value>,

    /// Logged history keyed by (tag, name); the BTreeMap keeps replay
    /// order deterministic
    pub logged: BTreeMap<(String, String), Vec<(f64, f64)>>,
}

impl ExperimentSnapshot {
    /// Create an empty snapshot
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a configuration entry
    pub fn set_config(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.config.insert(key.into(), value);
    }

    /// Append a logged point for a (tag, name) series
    pub fn log_point(&mut self, tag: &str, name: &str, x: f64, y: f64) {
        self.logged
            .entry((tag.to_string(), name.to_string()))
            .or_default()
            .push((x, y));
    }
}
