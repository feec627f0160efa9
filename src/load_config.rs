use crate::config::{DocumenterConfig, GenerationConfig};
use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{error, info};

/// Environment variable carrying the bearer token for the generation
/// endpoint. Optional: local model runners accept unauthenticated requests.
pub const API_KEY_VAR: &str = "MODEL_RUNNER_API_KEY";

#[derive(Deserialize)]
struct StaticConfig {
    workflows_dir: std::path::PathBuf,
    docs_dir: std::path::PathBuf,
    #[serde(default = "default_suffixes")]
    suffixes: Vec<String>,
    generation: GenerationSection,
}

#[derive(Deserialize)]
struct GenerationSection {
    endpoint: String,
    model: String,
    system_instructions: String,
    user_prompt: String,
}

fn default_suffixes() -> Vec<String> {
    vec!["yml".to_string(), "yaml".to_string()]
}

/// Loads a static YAML config file (no secrets) and injects the optional
/// API key from the environment. Returns a fully merged DocumenterConfig
/// or an error.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<DocumenterConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    let static_conf: StaticConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            conf
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    let api_key = match std::env::var(API_KEY_VAR) {
        Ok(key) => {
            info!("{API_KEY_VAR} found in env");
            Some(key)
        }
        Err(_) => {
            info!("{API_KEY_VAR} not set; requests will be unauthenticated");
            None
        }
    };

    let config = DocumenterConfig {
        workflows_dir: static_conf.workflows_dir,
        docs_dir: static_conf.docs_dir,
        suffixes: static_conf.suffixes,
        generation: GenerationConfig {
            endpoint: static_conf.generation.endpoint,
            model: static_conf.generation.model,
            api_key,
            system_instructions: static_conf.generation.system_instructions,
            user_prompt: static_conf.generation.user_prompt,
        },
    };

    info!(
        workflows_dir = %config.workflows_dir.display(),
        docs_dir = %config.docs_dir.display(),
        model = %config.generation.model,
        "Config loaded and merged successfully"
    );

    Ok(config)
}
