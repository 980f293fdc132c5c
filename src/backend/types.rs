use crate::event::LogEvent;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Incident assignee as the backend models it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignee {
    #[serde(rename = "type")]
    pub assignee_type: String,
    pub name: String,
}

/// Incident aggregate sent to the backend on creation. The backend uses
/// camelCase keys on the wire; identity (`incidentId`) is assigned by the
/// backend, not by us.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    pub title: String,
    pub affected_services: Vec<String>,
    pub affected_requests: Vec<String>,
    pub assignee: Assignee,
    pub created_by: String,
    pub status: String,
    pub created_at: String,
}

impl Incident {
    /// Build the incident aggregate from a triaged batch. Affected services
    /// and requests are the deduplicated union over the batch, sorted so the
    /// result is independent of input order.
    pub fn from_batch(events: &[LogEvent], title: &str, assignee: Assignee, author: &str) -> Self {
        let services: BTreeSet<&str> = events.iter().map(|e| e.service.as_str()).collect();
        let requests: BTreeSet<&str> = events.iter().map(|e| e.trace_id.as_str()).collect();

        Self {
            title: title.to_string(),
            affected_services: services.into_iter().map(String::from).collect(),
            affected_requests: requests.into_iter().map(String::from).collect(),
            assignee,
            created_by: author.to_string(),
            status: "In Progress".to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Backend response to incident creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentCreated {
    pub incident_id: String,
}

/// One knowledge-base reference returned by the backend's search endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KbReference {
    pub title: String,
    pub excerpt: String,
}
