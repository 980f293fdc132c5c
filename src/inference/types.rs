use serde::{Deserialize, Serialize};

/// AI-derived summarization of a log batch. The title becomes the incident
/// title; the summary later becomes the root-cause analysis text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageResult {
    pub triage_title: String,
    pub triage_summary: String,
}

/// One remediation step within a resolution plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanStep {
    pub step_number: u32,
    pub procedure: String,
    pub command: String,
}

/// Ordered remediation steps plus a confidence score, persisted to the
/// backend as a single document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionPlan {
    pub confidence_score: u8,
    pub steps: Vec<PlanStep>,
}

impl ResolutionPlan {
    /// Confidence is a percentage; u8 deserialization alone would admit
    /// values up to 255.
    pub fn check_bounds(&self) -> Result<(), String> {
        if self.confidence_score > 100 {
            return Err(format!(
                "confidence_score {} out of range 0-100",
                self.confidence_score
            ));
        }
        Ok(())
    }
}
