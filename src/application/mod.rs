//! Application layer: orchestration of collection and classification.

pub mod analyzer;
pub mod classifier;
pub mod collector;

pub use analyzer::ConflictAnalyzer;
pub use classifier::{ConflictClassifier, DEFAULT_ADJACENCY_THRESHOLD};
pub use collector::{BranchChangeCollector, BranchChanges};
