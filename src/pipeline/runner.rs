use crate::backend::{Assignee, BackendClient, BackendError, Incident};
use crate::config::types::PipelineSettings;
use crate::event::{render_log_snippet, LogEvent};
use crate::inference::{InferenceClient, InferenceError, ResolutionPlan, TriageResult};
use crate::timeline::{TimelineChannel, TimelineRecorder, TimelineStatus};
use std::sync::Arc;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{error, info};
use uuid::Uuid;

/// Failures that abort the inbound triage request. Anything past incident
/// creation is best-effort or background and never surfaces here.
#[derive(Debug, Error)]
pub enum TriageError {
    #[error("no log events provided")]
    EmptyBatch,

    #[error("failed to analyze logs: {0}")]
    Inference(#[from] InferenceError),

    #[error("failed to create incident: {0}")]
    IncidentCreation(#[from] BackendError),
}

/// Failures during resolution-plan generation, surfaced only to the direct
/// plan endpoint; inside the background workflow they are logged and dropped.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("failed to generate resolution plan: {0}")]
    Inference(#[from] InferenceError),

    #[error("backend call failed during plan generation: {0}")]
    Backend(#[from] BackendError),
}

/// Orchestrates the remediation workflow for one log batch:
/// triage -> incident creation -> timeline seeding synchronously, then a
/// detached continuation for deferred RCA completion and plan generation.
///
/// The backend offers no transactional or ordering guarantees; every ordering
/// invariant on the timeline comes from this type issuing its calls
/// sequentially within one workflow. Concurrent batches share only the
/// read-only clients and may interleave arbitrarily.
#[derive(Debug, Clone)]
pub struct RemediationPipeline {
    backend: Arc<BackendClient>,
    inference: Arc<InferenceClient>,
    recorder: TimelineRecorder,
    settings: PipelineSettings,
}

impl RemediationPipeline {
    pub fn new(
        backend: Arc<BackendClient>,
        inference: Arc<InferenceClient>,
        settings: PipelineSettings,
    ) -> Self {
        let recorder = TimelineRecorder::new(backend.clone(), settings.author.clone());
        Self {
            backend,
            inference,
            recorder,
            settings,
        }
    }

    /// Run the synchronous prefix of the workflow and schedule the rest.
    /// Returns as soon as the incident exists and the timeline is seeded;
    /// the background continuation is never awaited and never reports back.
    pub async fn triage(&self, events: Vec<LogEvent>) -> Result<TriageResult, TriageError> {
        if events.is_empty() {
            return Err(TriageError::EmptyBatch);
        }

        let workflow_id = Uuid::new_v4();
        info!(
            workflow_id = %workflow_id,
            events = events.len(),
            "starting triage workflow"
        );

        let triage = self.inference.triage(&events).await?;

        let assignee = Assignee {
            assignee_type: "aprs".to_string(),
            name: self.settings.default_assignee.clone(),
        };
        let incident = Incident::from_batch(
            &events,
            &triage.triage_title,
            assignee,
            &self.settings.author,
        );

        let created = self.backend.create_incident(&incident).await?;
        let incident_id = created.incident_id;

        info!(
            workflow_id = %workflow_id,
            incident_id = %incident_id,
            title = %triage.triage_title,
            "incident created"
        );

        self.seed_timeline(&incident_id, &events, &triage.triage_title)
            .await;

        // Detached continuation: no join handle kept, no result channel.
        // Its failure domain is fully isolated from the caller's response.
        let pipeline = self.clone();
        let background_triage = triage.clone();
        tokio::spawn(async move {
            pipeline
                .run_background(incident_id, background_triage, events)
                .await;
        });

        Ok(triage)
    }

    /// Seed the incident timeline. Both entries are best-effort; a lost
    /// audit entry must not block the response to the caller.
    async fn seed_timeline(&self, incident_id: &str, events: &[LogEvent], title: &str) {
        self.recorder
            .record(
                incident_id,
                TimelineChannel::IncidentDetected,
                TimelineStatus::Completed,
                render_log_snippet(events),
            )
            .await;

        self.recorder
            .record(
                incident_id,
                TimelineChannel::RootCauseAnalysis,
                TimelineStatus::InProgress,
                format!("RCA requested for {}", title),
            )
            .await;
    }

    async fn run_background(&self, incident_id: String, triage: TriageResult, events: Vec<LogEvent>) {
        if let Err(e) = self.complete_rca(&incident_id, &triage).await {
            error!(
                incident_id = %incident_id,
                error = %e,
                "RCA completion failed, abandoning background workflow"
            );
            return;
        }

        if let Err(e) = self
            .generate_resolution_plan(
                &incident_id,
                &triage.triage_title,
                &triage.triage_summary,
                &events,
            )
            .await
        {
            error!(
                incident_id = %incident_id,
                error = %e,
                "resolution plan generation failed"
            );
        }
    }

    /// Deferred RCA completion: wait out the grace interval, then close the
    /// root-cause-analysis channel and persist the analysis text. The only
    /// hard failure here is the root-cause write itself.
    async fn complete_rca(&self, incident_id: &str, triage: &TriageResult) -> Result<(), BackendError> {
        sleep(self.settings.rca_delay).await;

        self.recorder
            .record(
                incident_id,
                TimelineChannel::RootCauseAnalysis,
                TimelineStatus::Completed,
                format!("RCA performed for {}", triage.triage_title),
            )
            .await;

        self.backend
            .set_root_cause(incident_id, &triage.triage_summary)
            .await?;

        self.recorder
            .record(
                incident_id,
                TimelineChannel::ResolutionPlan,
                TimelineStatus::Pending,
                format!("RCA performed for {}", triage.triage_title),
            )
            .await;

        info!(incident_id = %incident_id, "root cause analysis recorded");
        Ok(())
    }

    /// Generate and persist a resolution plan for an existing incident.
    /// Shared between the background continuation and the direct endpoint.
    pub async fn generate_resolution_plan(
        &self,
        incident_id: &str,
        title: &str,
        summary: &str,
        events: &[LogEvent],
    ) -> Result<ResolutionPlan, PlanError> {
        self.recorder
            .record(
                incident_id,
                TimelineChannel::ResolutionPlan,
                TimelineStatus::InProgress,
                format!("Generating remedy for {}", title),
            )
            .await;

        let references = self.backend.search_knowledge_base(title).await?;

        let plan = self
            .inference
            .resolution_plan(summary, events, &references)
            .await?;

        self.recorder
            .record(
                incident_id,
                TimelineChannel::ResolutionPlan,
                TimelineStatus::InProgress,
                "Assessing confidence of resolution plan".to_string(),
            )
            .await;

        self.backend
            .create_resolution_plan(incident_id, &plan)
            .await?;

        info!(
            incident_id = %incident_id,
            confidence = plan.confidence_score,
            steps = plan.steps.len(),
            "resolution plan persisted"
        );
        Ok(plan)
    }
}
