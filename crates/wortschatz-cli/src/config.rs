//! Configuration for the Wortschatz application.
//!
//! Loads from TOML files, environment variables, and defaults using the
//! `confyg` crate.
//!
//! # Loading Priority
//!
//! 1. Explicit `--config <path>` flag
//! 2. `WORTSCHATZ_CONFIG` environment variable
//! 3. XDG default: `~/.config/wortschatz/config.toml`
//! 4. Built-in defaults

use confyg::{env, Confygery};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use wortschatz_core::{Error, Result};
use wortschatz_retrieval::RetrievalConfig;

// ============================================================================
// Configuration structs
// ============================================================================

/// Main configuration for the Wortschatz application.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WortschatzConfig {
    /// Server configuration.
    pub server: ServerConfig,

    /// Retrieval subsystem configuration (index path, naming conventions,
    /// embedding model, extraction fields).
    pub retrieval: RetrievalConfig,

    /// LLM provider configuration.
    pub llm: LlmConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Port to listen on.
    pub port: u16,

    /// Host address to bind to.
    pub host: String,
}

/// LLM provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// OpenRouter API key. Falls back to the `OPENROUTER_API_KEY`
    /// environment variable when unset.
    pub api_key: Option<String>,

    /// Model ID.
    pub model: String,

    /// API base URL override, for OpenAI-compatible endpoints.
    pub base_url: Option<String>,
}

// ============================================================================
// Default implementations
// ============================================================================

impl Default for WortschatzConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            retrieval: RetrievalConfig::default(),
            llm: LlmConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "127.0.0.1".to_string(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "meta-llama/llama-3.3-8b-instruct:free".to_string(),
            base_url: None,
        }
    }
}

// ============================================================================
// Config loading
// ============================================================================

impl WortschatzConfig {
    /// Load configuration from file, environment, and defaults.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder =
            Confygery::new().map_err(|e| Error::config(format!("config init: {e}")))?;

        if let Some(path) = Self::resolve_config_path(config_path) {
            if path.exists() {
                builder
                    .add_file(&path.to_string_lossy())
                    .map_err(|e| Error::config(format!("config file: {e}")))?;
            }
        }

        let mut env_opts = env::Options::with_top_level("WORTSCHATZ");
        env_opts.add_section("server");
        env_opts.add_section("retrieval");
        env_opts.add_section("llm");
        builder
            .add_env(env_opts)
            .map_err(|e| Error::config(format!("config env: {e}")))?;

        let config: Self = builder
            .build()
            .map_err(|e| Error::config(format!("config build: {e}")))?;

        Ok(config)
    }

    /// Resolve the config file path from explicit flag, env var, or XDG default.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(PathBuf::from(path));
        }

        if let Ok(path) = std::env::var("WORTSCHATZ_CONFIG") {
            return Some(PathBuf::from(path));
        }

        Self::default_config_path()
    }

    /// Return the XDG default config path.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("wortschatz").join("config.toml"))
    }

    /// Serialize this config to a pretty-printed TOML string.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Resolve the OpenRouter API key from config or environment.
    pub fn llm_api_key(&self) -> Result<String> {
        if let Some(key) = &self.llm.api_key {
            return Ok(key.clone());
        }
        std::env::var("OPENROUTER_API_KEY").map_err(|_| {
            Error::config(
                "no LLM API key: set llm.api_key in the config file or the \
                 OPENROUTER_API_KEY environment variable",
            )
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
