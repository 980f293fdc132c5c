use crate::backend::BackendClient;
use crate::config::load_config;
use crate::inference::InferenceClient;
use crate::pipeline::RemediationPipeline;
use crate::web::{run_server, AppState};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("backend client error: {0}")]
    Backend(#[from] crate::backend::BackendError),

    #[error("inference client error: {0}")]
    Inference(#[from] crate::inference::InferenceError),

    #[error("invalid listen address '{0}'")]
    ListenAddr(String),

    #[error("web server error: {0}")]
    WebServer(#[from] std::io::Error),
}

pub async fn run(config_path: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = match config_path {
        Some(path) => path,
        None => {
            eprintln!("Error: config not found");
            eprintln!("Searched locations:");
            eprintln!("  ~/.config/triagent/config.yml");
            eprintln!("  /etc/triagent/config.yml");
            eprintln!("\nUse --config <path> to specify a config file, or run 'triagent config init' to generate one.");
            std::process::exit(1);
        }
    };

    run_service(&config_path).await.map_err(|e| e.into())
}

async fn run_service(config_path: &Path) -> Result<(), RunError> {
    info!(config_path = %config_path.display(), "Loading configuration");

    let config = load_config(config_path)?;

    let backend = Arc::new(BackendClient::new(&config.backend)?);
    let inference = Arc::new(InferenceClient::new(&config.inference)?);
    let pipeline = RemediationPipeline::new(backend, inference, config.pipeline.clone());

    let listen: SocketAddr = config
        .web
        .listen
        .parse()
        .map_err(|_| RunError::ListenAddr(config.web.listen.clone()))?;

    let state = Arc::new(AppState { pipeline });
    run_server(listen, state).await?;

    Ok(())
}
