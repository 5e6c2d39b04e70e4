//! # Pose Tracker Library
//!
//! Shared types and utilities for the pose tracker nodes.
//! This library is used by all nodes in the dora-rs dataflow.

pub mod types;
pub mod utils;

// Re-export everything for convenience
pub use types::*;
pub use utils::*;
