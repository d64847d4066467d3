//! Terminal-only helpers for the detour-rank binary
//!
//! Nothing here is part of the library API.

pub mod progress;

pub use progress::ProgressManager;
