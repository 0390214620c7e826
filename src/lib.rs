pub mod application;
pub mod domain;
pub mod infra;

pub use application::ConflictAnalyzer;
pub use domain::{AnalysisError, ConflictAnalysis, ConflictReport, PotentialConflict, Severity};
pub use infra::git::{GitCli, VcsFacade};
