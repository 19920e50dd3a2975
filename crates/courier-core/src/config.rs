use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::catalog;
use crate::error::{CourierError, Result};

/// LLM providers understood by `[llm] provider`.
pub const LLM_PROVIDERS: &[&str] = &["ollama", "disabled"];

/// Handler modes understood by `[handlers] mode`.
pub const HANDLER_MODES: &[&str] = &["preview", "webhook"];

/// Top-level configuration for Courier.
///
/// Loaded from `~/.courier/config.toml` by default. Every section is optional
/// and falls back to its defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CourierConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub handlers: HandlersConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl CourierConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: CourierConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Reject settings the composition root cannot act on.
    pub fn validate(&self) -> Result<()> {
        if self.agent.catalogs.is_empty() {
            return Err(CourierError::Config(
                "agent.catalogs must name at least one catalog".to_string(),
            ));
        }
        if let Some(name) = self.agent.catalogs.iter().find(|c| !catalog::is_known(c)) {
            return Err(CourierError::Config(format!(
                "unknown catalog '{}' (expected one of: {})",
                name,
                catalog::CATALOG_NAMES.join(", ")
            )));
        }
        if self.agent.max_query_length == 0 {
            return Err(CourierError::Config(
                "agent.max_query_length must be greater than zero".to_string(),
            ));
        }
        if !LLM_PROVIDERS.contains(&self.llm.provider.as_str()) {
            return Err(CourierError::Config(format!(
                "unknown llm provider '{}' (expected one of: {})",
                self.llm.provider,
                LLM_PROVIDERS.join(", ")
            )));
        }
        if !HANDLER_MODES.contains(&self.handlers.mode.as_str()) {
            return Err(CourierError::Config(format!(
                "unknown handler mode '{}' (expected one of: {})",
                self.handlers.mode,
                HANDLER_MODES.join(", ")
            )));
        }
        if self.handlers.mode == "webhook"
            && self
                .handlers
                .webhook_url
                .as_deref()
                .map_or(true, |u| u.trim().is_empty())
        {
            return Err(CourierError::Config(
                "handlers.webhook_url is required when handlers.mode = \"webhook\"".to_string(),
            ));
        }
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Request pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Operation catalogs to load, in order.
    pub catalogs: Vec<String>,
    /// Longest accepted query, in characters.
    pub max_query_length: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            catalogs: catalog::CATALOG_NAMES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_query_length: 2000,
        }
    }
}

/// Language model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// "ollama" or "disabled".
    pub provider: String,
    pub base_url: String,
    pub model: String,
    /// System message sent ahead of every prompt.
    pub system_prompt: String,
    pub temperature: f32,
    /// Per-call timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            base_url: "http://localhost:11434".to_string(),
            model: "llama3.1".to_string(),
            system_prompt: "You are a command parser. Output valid JSON.".to_string(),
            temperature: 0.0,
            timeout_secs: 30,
        }
    }
}

/// Action handler settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HandlersConfig {
    /// "preview" (dry run) or "webhook".
    pub mode: String,
    /// Target for webhook mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    /// Per-call webhook timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for HandlersConfig {
    fn default() -> Self {
        Self {
            mode: "preview".to_string(),
            webhook_url: None,
            timeout_secs: 15,
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3040,
        }
    }
}
