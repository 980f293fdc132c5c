pub mod parse;
pub mod types;

use regex::Regex;
use std::path::{Path, PathBuf};

pub use parse::{load_config, ConfigError};
pub use types::{BackendConfig, Config, InferenceConfig, PipelineSettings, WebConfig};

/// Expands environment variables in a string.
/// Supports $env{VAR_NAME} syntax.
/// If an environment variable is not set, it's left unchanged.
pub fn expand_env_vars(text: &str) -> String {
    let re = Regex::new(r"\$env\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap();

    re.replace_all(text, |caps: &regex::Captures| {
        let var_name = caps.get(1).map(|m| m.as_str()).unwrap_or_default();

        std::env::var(var_name).unwrap_or_else(|_| {
            // If not set, return original match unchanged
            caps.get(0).map(|m| m.as_str().to_string()).unwrap_or_default()
        })
    })
    .to_string()
}

/// Resolves the config file path based on explicit argument or default locations.
/// Returns the first existing path from:
/// 1. Explicit path (if provided)
/// 2. ~/.config/triagent/config.yml
/// 3. /etc/triagent/config.yml
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Some(home_dir) = dirs::home_dir() {
        let user_config = home_dir.join(".config/triagent/config.yml");
        if user_config.exists() {
            return Some(user_config);
        }
    }

    let system_config = PathBuf::from("/etc/triagent/config.yml");
    if system_config.exists() {
        return Some(system_config);
    }

    None
}
