use serde::{Deserialize, Serialize};

/// A single externally-supplied log event. Immutable once received;
/// batches preserve input order for snippet rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEvent {
    pub timestamp: String,
    pub message: String,
    pub level: String,
    pub service: String,
    pub trace_id: String,
}

/// Render a batch of log events as a timeline snippet, one line per event.
pub fn render_log_snippet(events: &[LogEvent]) -> String {
    events
        .iter()
        .map(|event| {
            format!(
                "{}: {} - {} - {} - {}",
                event.service, event.trace_id, event.timestamp, event.level, event.message
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
