//! Configuration loading.

pub mod analysis;

pub use analysis::AnalysisConfig;
