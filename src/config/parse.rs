use super::types::Config;
use crate::config::expand_env_vars;
use regex::Regex;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation failed:\n{}", .0.join("\n"))]
    ValidationList(Vec<String>),
}

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let yaml_string = fs::read_to_string(path).map_err(|e| {
        ConfigError::Io(std::io::Error::new(
            e.kind(),
            format!("failed to read config file '{}': {}", path.display(), e),
        ))
    })?;

    // Expand environment variables before parsing (api keys, urls)
    let yaml_string = expand_env_vars(&yaml_string);
    check_unexpanded_vars(&yaml_string)?;

    let config: Config = serde_yaml::from_str(&yaml_string)?;
    validate_config(&config)?;

    Ok(config)
}

/// Checks for unexpanded environment variables and returns a helpful error
fn check_unexpanded_vars(yaml_string: &str) -> Result<(), ConfigError> {
    let re = Regex::new(r"\$env\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap();
    let unexpanded: Vec<String> = re
        .captures_iter(yaml_string)
        .map(|cap| format!("environment variable '{}' is not set", &cap[1]))
        .collect();

    if unexpanded.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationList(unexpanded))
    }
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    if !is_http_url(&config.backend.base_url) {
        errors.push(format!(
            "backend.base_url must be an http(s) URL, got '{}'",
            config.backend.base_url
        ));
    }

    if !is_http_url(&config.inference.base_url) {
        errors.push(format!(
            "inference.base_url must be an http(s) URL, got '{}'",
            config.inference.base_url
        ));
    }

    if config.inference.model.trim().is_empty() {
        errors.push("inference.model must not be empty".to_string());
    }

    if config.web.listen.parse::<std::net::SocketAddr>().is_err() {
        errors.push(format!(
            "web.listen must be a socket address like '0.0.0.0:8000', got '{}'",
            config.web.listen
        ));
    }

    if config.pipeline.author.trim().is_empty() {
        errors.push("pipeline.author must not be empty".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationList(errors))
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
