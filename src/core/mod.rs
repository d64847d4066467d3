//! Core library modules for detour-rank
//!
//! The batch engine and ranking pipeline, plus the service and table
//! boundaries they run against.

pub mod batch;
pub mod engine;
pub mod error;
pub mod matrix;
pub mod pipeline;
pub mod ranking;
pub mod service;
pub mod table;

// Re-export main types for internal use
pub use engine::{DistanceEngine, EndpointPair};
pub use pipeline::{RankConfig, RankOptions, RankSummary};
