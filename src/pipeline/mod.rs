pub mod runner;

pub use runner::{PlanError, RemediationPipeline, TriageError};
