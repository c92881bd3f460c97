//! TOML configuration parsing.
//!
//! All outbound endpoints, timeouts and the language-model credential
//! lookup are read from a single file passed via `--config`. Credentials
//! themselves never live in the file: `[llm].api_key_env` names the
//! environment variable that holds the key.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub vedaweb: VedaWebConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:7340".to_string()
}

/// Settings for the VedaWeb document API.
#[derive(Debug, Deserialize, Clone)]
pub struct VedaWebConfig {
    /// API root; documents are fetched from `{base_url}/document/id/{id}`.
    #[serde(default = "default_vedaweb_url")]
    pub base_url: String,
    #[serde(default = "default_vedaweb_timeout")]
    pub timeout_secs: u64,
}

impl Default for VedaWebConfig {
    fn default() -> Self {
        Self {
            base_url: default_vedaweb_url(),
            timeout_secs: default_vedaweb_timeout(),
        }
    }
}

fn default_vedaweb_url() -> String {
    "https://vedaweb.uni-koeln.de/rigveda/api".to_string()
}
fn default_vedaweb_timeout() -> u64 {
    15
}

/// Settings for the OpenAI-compatible chat completions API.
#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    #[serde(default = "default_llm_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Environment variable holding the server-side key used by `/api/explain`.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_llm_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_llm_timeout(),
        }
    }
}

fn default_llm_url() -> String {
    "https://api.openai.com/v1".to_string()
}
fn default_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}
fn default_max_tokens() -> u32 {
    800
}
fn default_temperature() -> f32 {
    0.7
}
fn default_llm_timeout() -> u64 {
    60
}

impl LlmConfig {
    /// Reads the server-side key from the configured environment variable.
    ///
    /// Called once per request; the value is never cached. Empty values
    /// count as missing.
    pub fn server_api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
    }
}

impl Config {
    /// Built-in defaults, used when no config file is present.
    pub fn minimal() -> Self {
        Self {
            server: ServerConfig::default(),
            vedaweb: VedaWebConfig::default(),
            llm: LlmConfig::default(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.server.bind.trim().is_empty() {
            bail!("server.bind must not be empty");
        }
        if self.vedaweb.base_url.trim().is_empty() {
            bail!("vedaweb.base_url must not be empty");
        }
        if self.vedaweb.timeout_secs == 0 {
            bail!("vedaweb.timeout_secs must be > 0");
        }
        if self.llm.base_url.trim().is_empty() {
            bail!("llm.base_url must not be empty");
        }
        if self.llm.model.trim().is_empty() {
            bail!("llm.model must not be empty");
        }
        if self.llm.timeout_secs == 0 {
            bail!("llm.timeout_secs must be > 0");
        }
        if self.llm.max_tokens == 0 {
            bail!("llm.max_tokens must be > 0");
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            bail!("llm.temperature must be in [0.0, 2.0]");
        }
        Ok(())
    }
}

/// Parses a config from TOML text and validates it.
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;
    config.validate()?;
    Ok(config)
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let cfg = parse_config("").unwrap();
        assert_eq!(cfg.server.bind, "127.0.0.1:7340");
        assert_eq!(cfg.vedaweb.timeout_secs, 15);
        assert_eq!(cfg.llm.api_key_env, "OPENAI_API_KEY");
    }

    #[test]
    fn test_partial_sections() {
        let cfg = parse_config(
            r#"
[vedaweb]
base_url = "http://127.0.0.1:9000/api"

[llm]
model = "llama3"
"#,
        )
        .unwrap();
        assert_eq!(cfg.vedaweb.base_url, "http://127.0.0.1:9000/api");
        assert_eq!(cfg.vedaweb.timeout_secs, 15);
        assert_eq!(cfg.llm.model, "llama3");
        assert_eq!(cfg.llm.max_tokens, 800);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = parse_config("[vedaweb]\ntimeout_secs = 0\n").unwrap_err();
        assert!(err.to_string().contains("vedaweb.timeout_secs"));
    }

    #[test]
    fn test_empty_bind_rejected() {
        let err = parse_config("[server]\nbind = \"\"\n").unwrap_err();
        assert!(err.to_string().contains("server.bind"));
    }

    #[test]
    fn test_temperature_range() {
        assert!(parse_config("[llm]\ntemperature = 3.5\n").is_err());
        assert!(parse_config("[llm]\ntemperature = 0.0\n").is_ok());
    }

    #[test]
    fn test_missing_env_key_is_none() {
        let llm = LlmConfig {
            api_key_env: "RV_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..LlmConfig::default()
        };
        assert!(llm.server_api_key().is_none());
    }
}
