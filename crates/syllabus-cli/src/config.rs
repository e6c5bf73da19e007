//! Configuration file management for syllabus.
//!
//! Provides a TOML-based config file at `~/.config/syllabus/config.toml` and
//! a resolution chain: CLI flag > env var > config file > default.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use syllabus_core::model::GeminiConfig;
use syllabus_core::model::gemini::DEFAULT_MODEL;

/// Env var holding the Gemini API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Env var overriding the model name.
pub const MODEL_ENV: &str = "SYLLABUS_MODEL";

pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub model: ModelSection,
    #[serde(default)]
    pub server: ServerSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ModelSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the syllabus config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/syllabus` or
/// `~/.config/syllabus`, on every platform.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("syllabus");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("syllabus")
}

/// Return the path to the syllabus config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file. Returns an error if it does not exist.
pub fn load_config() -> Result<ConfigFile> {
    let path = config_path();
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents).context("failed to parse config file")?;
    Ok(config)
}

/// Serialize and write the config file, creating parent dirs as needed.
/// Sets file permissions to 0600 on Unix (the file may hold an API key).
pub fn save_config(config: &ConfigFile) -> Result<()> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Where `serve` listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub bind: String,
    pub port: u16,
}

/// Fully resolved configuration, ready for use.
#[derive(Debug)]
pub struct SyllabusConfig {
    pub gemini: GeminiConfig,
    pub server: ServerSettings,
}

impl SyllabusConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - Model: `cli_model` > `SYLLABUS_MODEL` env > `model.name` > `gemini-2.5-flash`
    /// - API key: `GEMINI_API_KEY` env > `model.api_key` > error
    /// - Server: `server.bind` / `server.port` > 127.0.0.1:3000
    pub fn resolve(cli_model: Option<&str>) -> Result<Self> {
        let file_config = load_config().ok().unwrap_or_default();
        let Some(api_key) = resolve_api_key(&file_config) else {
            bail!(
                "Gemini API key not found; set {API_KEY_ENV} or run `syllabus init --api-key <KEY>`"
            );
        };
        Ok(Self::build(cli_model, api_key, file_config))
    }

    /// Like [`resolve`](Self::resolve), but a missing API key leaves the key
    /// empty instead of failing. The model then refuses every call, which
    /// callers with a fallback (the greeting banner) absorb.
    pub fn resolve_keyless(cli_model: Option<&str>) -> Self {
        let file_config = load_config().ok().unwrap_or_default();
        let api_key = resolve_api_key(&file_config).unwrap_or_else(|| {
            tracing::warn!("no {API_KEY_ENV} configured; model calls will fall back");
            String::new()
        });
        Self::build(cli_model, api_key, file_config)
    }

    fn build(cli_model: Option<&str>, api_key: String, file_config: ConfigFile) -> Self {
        let model = if let Some(name) = cli_model {
            name.to_string()
        } else if let Ok(name) = std::env::var(MODEL_ENV) {
            name
        } else if let Some(ref name) = file_config.model.name {
            name.clone()
        } else {
            DEFAULT_MODEL.to_string()
        };

        let mut gemini = GeminiConfig::new(api_key).with_model(model);
        if let Some(t) = file_config.model.temperature {
            gemini = gemini.with_temperature(t);
        }
        if let Some(n) = file_config.model.max_output_tokens {
            gemini = gemini.with_max_output_tokens(n);
        }
        if let Some(ref url) = file_config.model.base_url {
            gemini = gemini.with_base_url(url.clone());
        }

        let server = ServerSettings {
            bind: file_config
                .server
                .bind
                .unwrap_or_else(|| DEFAULT_BIND.to_string()),
            port: file_config.server.port.unwrap_or(DEFAULT_PORT),
        };

        Self { gemini, server }
    }
}

/// API key: `GEMINI_API_KEY` env > `model.api_key`, ignoring blank values.
fn resolve_api_key(file_config: &ConfigFile) -> Option<String> {
    match std::env::var(API_KEY_ENV) {
        Ok(key) if !key.trim().is_empty() => Some(key),
        _ => file_config
            .model
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty()),
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
