//! Trace listener interface
//!
//! Collaborators (layer sliders, tree views) implement this trait to
//! learn when a freshly loaded trace replaced the previous one.

use std::sync::Arc;

/// Trait for listening to trace reloads
pub trait TraceListener: Send + Sync {
    /// Called after every load with the number of layers in the new trace
    fn on_layer_count_changed(&self, _layer_count: usize) {}
}

/// Default no-op listener implementation
#[derive(Debug, Default)]
pub struct NoOpTraceListener;

impl TraceListener for NoOpTraceListener {}

/// Arc-wrapped listener for sharing between the model and its owner
pub type TraceListenerHandle = Arc<dyn TraceListener>;
