use crate::backend::BackendClient;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::error;

/// Logical channel within an incident's timeline. Entries in a channel form
/// a status progression, ordered only by the sequence in which we issue the
/// writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimelineChannel {
    IncidentDetected,
    RootCauseAnalysis,
    ResolutionPlan,
}

impl TimelineChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimelineChannel::IncidentDetected => "incident-detected",
            TimelineChannel::RootCauseAnalysis => "root-cause-analysis",
            TimelineChannel::ResolutionPlan => "resolution-plan",
        }
    }
}

impl fmt::Display for TimelineChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineStatus {
    InProgress,
    Completed,
    Pending,
}

/// Audit entry payload as the backend expects it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub status: TimelineStatus,
    pub log_snippet: String,
    pub timestamp: String,
    pub author: String,
}

/// Best-effort recorder for incident timeline entries. Timeline entries are
/// observability, not control state: each write independently swallows its
/// own failure so a lost audit entry never aborts the owning workflow step.
#[derive(Debug, Clone)]
pub struct TimelineRecorder {
    backend: Arc<BackendClient>,
    author: String,
}

impl TimelineRecorder {
    pub fn new(backend: Arc<BackendClient>, author: String) -> Self {
        Self { backend, author }
    }

    /// Attempt exactly one timeline write. Failures are logged and dropped.
    pub async fn record(
        &self,
        incident_id: &str,
        channel: TimelineChannel,
        status: TimelineStatus,
        log_snippet: String,
    ) {
        let entry = TimelineEntry {
            status,
            log_snippet,
            timestamp: chrono::Utc::now().to_rfc3339(),
            author: self.author.clone(),
        };

        if let Err(e) = self
            .backend
            .append_timeline_entry(incident_id, channel.as_str(), &entry)
            .await
        {
            error!(
                incident_id = %incident_id,
                channel = %channel,
                error = %e,
                "failed to record timeline entry"
            );
        }
    }
}
