// src/analyze/mod.rs
//! Analysis pipeline: transport to the remote service, payload decoding,
//! normalization onto the UI model, and the offline fallback.

pub mod adapter;
pub mod fallback;
pub mod mapper;
pub mod payload;
pub mod scoring;

// Re-export convenient types.
pub use crate::analyze::adapter::{
    build_transport, AnalysisTransport, BackendHealth, DisabledTransport, DynTransport,
    FixtureTransport, HttpTransport, SimulateRequest,
};
pub use crate::analyze::fallback::{FallbackGenerator, FixedFallback, RandomFallback};
pub use crate::analyze::mapper::map;
pub use crate::analyze::scoring::{clamp_percent, METRIC_LABELS};
