//! Window registry
//!
//! Maps window display names to their backend-assigned handles and holds
//! pre-registered display options until a window's first creation. A
//! window is created exactly once per name; every later lookup returns
//! the stored handle without touching the backend.

use crate::error::Result;
use crate::types::{WindowHandle, WindowOptions};
use std::collections::HashMap;

/// X-axis label used when x-values carry fractional parts
const TIME_AXIS_LABEL: &str = "Time (s)";
/// X-axis label used when x-values are all integral
const INDEX_AXIS_LABEL: &str = "Index";

/// Registry of remote plot windows for one plotter instance
#[derive(Debug, Default)]
pub struct WindowRegistry {
    /// Backend-assigned handles by window name
    windows: HashMap<String, WindowHandle>,
    /// Options registered before a window's first creation
    pending_options: HashMap<String, WindowOptions>,
}

impl WindowRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Store or overwrite the options record for a window name
    ///
    /// Meaningful only before that window's first creation; afterwards
    /// the stored record is no longer consulted.
    pub fn set_options(&mut self, name: &str, options: WindowOptions) {
        self.pending_options.insert(name.to_string(), options);
    }

    /// Handle of an already-created window, if any
    pub fn handle(&self, name: &str) -> Option<&WindowHandle> {
        self.windows.get(name)
    }

    /// Whether a window has been created for this name
    pub fn contains(&self, name: &str) -> bool {
        self.windows.contains_key(name)
    }

    /// Number of created windows
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    /// Whether no windows have been created yet
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Look up the window for `name`, creating it on first use
    ///
    /// On a miss, synthesizes the creation options (see
    /// [`creation_options`](Self::creation_options)) and invokes `create`
    /// with them; the returned handle is stored and reused forever after.
    /// Returns the handle and whether this call created the window.
    pub fn ensure_window<F>(
        &mut self,
        name: &str,
        tag: Option<&str>,
        default_label: Option<&str>,
        time_axis: bool,
        create: F,
    ) -> Result<(WindowHandle, bool)>
    where
        F: FnOnce(&WindowOptions) -> Result<WindowHandle>,
    {
        if let Some(handle) = self.windows.get(name) {
            return Ok((handle.clone(), false));
        }

        let options = self.creation_options(name, tag, default_label, time_axis);
        let handle = create(&options)?;
        tracing::debug!(window = name, handle = %handle, "created window");
        self.windows.insert(name.to_string(), handle.clone());
        Ok((handle, true))
    }

    /// Resolve the options used for a window's creation call
    ///
    /// The x-axis label comes from (a) an explicit per-window option,
    /// else (b) the plotter-wide default, else (c) `"Time (s)"` or
    /// `"Index"` depending on whether the x-values are time-based. The
    /// legend is seeded with `tag` when none was set, and the title
    /// defaults to the window name.
    fn creation_options(
        &self,
        name: &str,
        tag: Option<&str>,
        default_label: Option<&str>,
        time_axis: bool,
    ) -> WindowOptions {
        let mut options = self.pending_options.get(name).cloned().unwrap_or_default();

        if options.xlabel.is_none() {
            let label = default_label.unwrap_or(if time_axis {
                TIME_AXIS_LABEL
            } else {
                INDEX_AXIS_LABEL
            });
            options.xlabel = Some(label.to_string());
        }

        if options.legend.is_none() {
            if let Some(tag) = tag {
                options.legend = Some(vec![tag.to_string()]);
            }
        }

        if options.title.is_none() {
            options.title = Some(name.to_string());
        }

        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(id: &str) -> WindowHandle {
        WindowHandle::new(id)
    }

    #[test]
    fn test_creation_happens_exactly_once() {
        let mut registry = WindowRegistry::new();
        let mut creations = 0;

        for _ in 0..5 {
            let (h, _) = registry
                .ensure_window("loss", Some("train"), None, false, |_| {
                    creations += 1;
                    Ok(handle("win_0"))
                })
                .unwrap();
            assert_eq!(h, handle("win_0"));
        }

        assert_eq!(creations, 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_failed_creation_is_not_recorded() {
        let mut registry = WindowRegistry::new();

        let err = registry.ensure_window("loss", None, None, false, |_| {
            Err(crate::error::VizStreamError::Backend("down".to_string()))
        });
        assert!(err.is_err());
        assert!(!registry.contains("loss"));

        // A later attempt may still create the window
        let (_, created) = registry
            .ensure_window("loss", None, None, false, |_| Ok(handle("win_0")))
            .unwrap();
        assert!(created);
    }

    #[test]
    fn test_axis_label_defaults() {
        let registry = WindowRegistry::new();

        let opts = registry.creation_options("loss", None, None, false);
        assert_eq!(opts.xlabel.as_deref(), Some("Index"));

        let opts = registry.creation_options("loss", None, None, true);
        assert_eq!(opts.xlabel.as_deref(), Some("Time (s)"));

        // Plotter-wide default beats the computed label
        let opts = registry.creation_options("loss", None, Some("Epoch"), true);
        assert_eq!(opts.xlabel.as_deref(), Some("Epoch"));
    }

    #[test]
    fn test_explicit_xlabel_wins() {
        let mut registry = WindowRegistry::new();
        registry.set_options("loss", WindowOptions::new().with_xlabel("Steps"));

        let opts = registry.creation_options("loss", None, Some("Epoch"), true);
        assert_eq!(opts.xlabel.as_deref(), Some("Steps"));
    }

    #[test]
    fn test_legend_seeded_from_tag() {
        let registry = WindowRegistry::new();

        let opts = registry.creation_options("loss", Some("train"), None, false);
        assert_eq!(opts.legend, Some(vec!["train".to_string()]));

        // Untagged series gets no legend
        let opts = registry.creation_options("loss", None, None, false);
        assert_eq!(opts.legend, None);
    }

    #[test]
    fn test_preset_legend_not_overwritten() {
        let mut registry = WindowRegistry::new();
        registry.set_options(
            "loss",
            WindowOptions::new().with_legend(vec!["a".to_string(), "b".to_string()]),
        );

        let opts = registry.creation_options("loss", Some("train"), None, false);
        assert_eq!(opts.legend, Some(vec!["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn test_title_defaults_to_name() {
        let registry = WindowRegistry::new();
        let opts = registry.creation_options("accuracy", None, None, false);
        assert_eq!(opts.title.as_deref(), Some("accuracy"));
    }
}
