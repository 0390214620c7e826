//! Domain types for pre-merge conflict prediction.
//! Defines the core data structures and business objects used throughout the engine.

pub mod analysis;
pub mod change;
pub mod conflict;
pub mod error;

pub use analysis::*;
pub use change::*;
pub use conflict::*;
pub use error::*;
