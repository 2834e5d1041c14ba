//! # gcviewer Core
//!
//! Core types, traits, and utilities shared by the gcviewer crates.
//! Provides error types, filament and view settings, and the listener
//! interface used to announce trace reloads.

pub mod constants;
pub mod error;
pub mod listener;
pub mod settings;

pub use error::{Error, Result, SettingsError};

pub use listener::{NoOpTraceListener, TraceListener, TraceListenerHandle};

pub use settings::{Config, FilamentSettings, Palette, ViewSettings};
