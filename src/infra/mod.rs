//! Infrastructure layer (adapters/implementations).
//!
//! This module contains IO-heavy integrations (git subprocesses) and the
//! diff-format plumbing they feed into.

pub mod git;
pub mod hunks;
