use crate::backend::types::KbReference;
use crate::config::types::InferenceConfig;
use crate::event::{render_log_snippet, LogEvent};
use crate::inference::types::{ResolutionPlan, TriageResult};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

const TRIAGE_SYSTEM_PROMPT: &str = "You are a triage agent and an expert at root cause analysis. \
     You will be given a list of logs, and you need to provide a short summary \
     of the root cause of the issue.";

const RESOLUTION_SYSTEM_PROMPT: &str = "You are a remediation engineer. Given a root-cause summary, the original \
     log events, and knowledge-base references, produce an ordered resolution \
     plan with concrete commands and a confidence score between 0 and 100.";

/// All inference failures look the same to the caller: the downstream step
/// is unusable either way, so transport and schema problems share one type.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("inference request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("inference service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("inference response missing message content")]
    MissingContent,

    #[error("inference output failed schema validation: {0}")]
    Schema(#[from] serde_json::Error),

    #[error("inference output violates schema constraints: {0}")]
    Constraint(String),
}

pub type Result<T> = std::result::Result<T, InferenceError>;

/// Client for structured-output completions against an OpenAI-compatible
/// endpoint. One call per task, no retries, no streaming.
#[derive(Debug, Clone)]
pub struct InferenceClient {
    base_url: String,
    model: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl InferenceClient {
    pub fn new(config: &InferenceConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            client,
        })
    }

    /// Summarize a log batch into an incident title and root-cause summary.
    pub async fn triage(&self, events: &[LogEvent]) -> Result<TriageResult> {
        let user_prompt = format!(
            "The log events are as follows:\n\n{}",
            render_log_snippet(events)
        );

        self.complete("triage", TRIAGE_SYSTEM_PROMPT, user_prompt, triage_schema())
            .await
    }

    /// Generate a resolution plan from the root-cause summary, the original
    /// batch, and knowledge-base references.
    pub async fn resolution_plan(
        &self,
        summary: &str,
        events: &[LogEvent],
        references: &[KbReference],
    ) -> Result<ResolutionPlan> {
        let rendered_refs = references
            .iter()
            .map(|r| format!("- {}: {}", r.title, r.excerpt))
            .collect::<Vec<_>>()
            .join("\n");

        let user_prompt = format!(
            "Root cause summary:\n{}\n\nLog events:\n{}\n\nKnowledge base references:\n{}",
            summary,
            render_log_snippet(events),
            rendered_refs
        );

        let plan: ResolutionPlan = self
            .complete(
                "resolution_plan",
                RESOLUTION_SYSTEM_PROMPT,
                user_prompt,
                resolution_plan_schema(),
            )
            .await?;

        plan.check_bounds().map_err(InferenceError::Constraint)?;
        Ok(plan)
    }

    async fn complete<T: DeserializeOwned>(
        &self,
        task: &str,
        system_prompt: &str,
        user_prompt: String,
        schema: Value,
    ) -> Result<T> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": user_prompt },
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": task,
                    "strict": true,
                    "schema": schema,
                },
            },
        });

        debug!(task = %task, url = %url, "sending inference request");

        let mut request = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(InferenceError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let envelope: Value = serde_json::from_str(&text)?;
        let content = envelope
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .ok_or(InferenceError::MissingContent)?;

        Ok(serde_json::from_str(content)?)
    }
}

fn triage_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "triage_title": { "type": "string" },
            "triage_summary": { "type": "string" },
        },
        "required": ["triage_title", "triage_summary"],
        "additionalProperties": false,
    })
}

fn resolution_plan_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "confidence_score": { "type": "integer", "minimum": 0, "maximum": 100 },
            "steps": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "step_number": { "type": "integer" },
                        "procedure": { "type": "string" },
                        "command": { "type": "string" },
                    },
                    "required": ["step_number", "procedure", "command"],
                    "additionalProperties": false,
                },
            },
        },
        "required": ["confidence_score", "steps"],
        "additionalProperties": false,
    })
}
