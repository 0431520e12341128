//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

use std::sync::Arc;
use std::sync::Once;
use vizstream::{MemoryBackend, Plotter, PlotterConfig};

static TRACING: Once = Once::new();

/// Initialize test logging once, honoring `RUST_LOG`
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Create a plotter in synchronous mode over a recording backend
pub fn sync_plotter() -> (Plotter, Arc<MemoryBackend>) {
    plotter_with(PlotterConfig::default())
}

/// Create a plotter in asynchronous mode over a recording backend
pub fn async_plotter() -> (Plotter, Arc<MemoryBackend>) {
    plotter_with(PlotterConfig::default().with_async_dispatch(true))
}

/// Create a plotter with a custom configuration over a recording backend
pub fn plotter_with(config: PlotterConfig) -> (Plotter, Arc<MemoryBackend>) {
    init_tracing();
    let backend = Arc::new(MemoryBackend::new());
    let plotter = Plotter::new(backend.clone(), config);
    (plotter, backend)
}
