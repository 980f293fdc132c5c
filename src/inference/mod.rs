pub mod client;
pub mod types;

pub use client::{InferenceClient, InferenceError};
pub use types::{PlanStep, ResolutionPlan, TriageResult};
