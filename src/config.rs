use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

/// Fully merged configuration for one documentation run.
///
/// Built once by [`crate::load_config::load_config`] and held constant for
/// the whole run; nothing reads the environment after this point.
#[derive(Debug, Serialize, Deserialize)]
pub struct DocumenterConfig {
    /// Directory scanned (non-recursively) for workflow files.
    pub workflows_dir: PathBuf,
    /// Directory receiving one markdown file per input plus the index.
    pub docs_dir: PathBuf,
    /// Filename suffixes recognised as workflow files, in match order.
    pub suffixes: Vec<String>,
    pub generation: GenerationConfig,
}

/// Connection and prompt settings for the generation service.
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Base URL of an OpenAI-compatible API, e.g. `http://localhost:12434/engines/v1`.
    pub endpoint: String,
    /// Model identifier passed through on every request.
    pub model: String,
    /// Bearer token; local model runners usually need none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub system_instructions: String,
    pub user_prompt: String,
}

impl DocumenterConfig {
    pub fn trace_loaded(&self) {
        info!(
            workflows_dir = %self.workflows_dir.display(),
            docs_dir = %self.docs_dir.display(),
            suffixes = ?self.suffixes,
            model = %self.generation.model,
            "Loaded DocumenterConfig"
        );
        debug!(?self, "Config loaded (full debug)");
    }
}
