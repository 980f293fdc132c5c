use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub backend: BackendConfig,
    pub inference: InferenceConfig,
    #[serde(default)]
    pub pipeline: PipelineSettings,
    pub web: WebConfig,
}

/// Incident-tracking backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
    #[serde(with = "humantime_serde", default = "default_backend_timeout")]
    pub timeout: Duration,
}

fn default_backend_timeout() -> Duration {
    Duration::from_secs(30)
}

/// OpenAI-compatible inference endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    pub base_url: String,
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(with = "humantime_serde", default = "default_inference_timeout")]
    pub timeout: Duration,
}

fn default_inference_timeout() -> Duration {
    Duration::from_secs(60)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSettings {
    /// Grace interval before the deferred RCA completion runs.
    #[serde(with = "humantime_serde", default = "default_rca_delay")]
    pub rca_delay: Duration,
    #[serde(default = "default_assignee")]
    pub default_assignee: String,
    /// Author tag stamped on synthetic timeline entries and created incidents.
    #[serde(default = "default_author")]
    pub author: String,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            rca_delay: default_rca_delay(),
            default_assignee: default_assignee(),
            author: default_author(),
        }
    }
}

fn default_rca_delay() -> Duration {
    Duration::from_secs(10)
}

fn default_assignee() -> String {
    "John Doe".to_string()
}

fn default_author() -> String {
    "triage_agent".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    pub listen: String,
}
