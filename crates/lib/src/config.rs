//! Configuration types and loading.
//!
//! Config is loaded from a JSON file (e.g. `~/.smartmail/config.json`). The only
//! environment override is `PORT`, which selects the bind port.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level application config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// HTTP server settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Which analyzer backend handles extracted text.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Stats store and polling dashboard.
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// Gateway bind and port.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    /// Port for HTTP (default 5000). Overridden by the PORT env var.
    #[serde(default = "default_gateway_port")]
    pub port: u16,

    /// Bind address (default "0.0.0.0" so chat platforms can reach the webhook).
    #[serde(default = "default_gateway_bind")]
    pub bind: String,
}

fn default_gateway_port() -> u16 {
    5000
}

fn default_gateway_bind() -> String {
    "0.0.0.0".to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_gateway_port(),
            bind: default_gateway_bind(),
        }
    }
}

/// Analyzer backend selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzerConfig {
    /// "keyword" (default, offline) or "ollama". Case-insensitive; unknown values fall back to keyword.
    #[serde(default)]
    pub backend: Option<String>,

    /// Ollama base URL (default http://127.0.0.1:11434).
    #[serde(default)]
    pub base_url: Option<String>,

    /// Ollama model name as shown by `ollama list` (default "llama3.2:latest").
    #[serde(default)]
    pub model: Option<String>,
}

/// Dashboard settings. When disabled, no stats are kept and the dashboard routes are not mounted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardConfig {
    #[serde(default = "default_dashboard_enabled")]
    pub enabled: bool,

    /// How often the dashboard page polls /api/stats.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_dashboard_enabled() -> bool {
    true
}

fn default_poll_interval_ms() -> u64 {
    3000
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            enabled: default_dashboard_enabled(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

/// Analyzer backend resolved from `analyzer.backend`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyzerBackend {
    Keyword,
    Ollama,
}

/// Resolve the analyzer backend. Defaults to keyword when absent or invalid.
pub fn resolve_analyzer_backend(analyzer: &AnalyzerConfig) -> AnalyzerBackend {
    let b = analyzer
        .backend
        .as_deref()
        .unwrap_or("keyword")
        .trim()
        .to_lowercase();
    match b.as_str() {
        "ollama" => AnalyzerBackend::Ollama,
        "keyword" | "" => AnalyzerBackend::Keyword,
        other => {
            log::warn!("unknown analyzer backend {:?}, using keyword", other);
            AnalyzerBackend::Keyword
        }
    }
}

/// Resolve the bind port: env PORT overrides config.
pub fn resolve_port(config: &Config) -> u16 {
    port_from_env(std::env::var("PORT").ok().as_deref()).unwrap_or(config.gateway.port)
}

fn port_from_env(value: Option<&str>) -> Option<u16> {
    let v = value?.trim();
    if v.is_empty() {
        return None;
    }
    match v.parse() {
        Ok(p) => Some(p),
        Err(_) => {
            log::warn!("ignoring invalid PORT value {:?}", v);
            None
        }
    }
}

/// Default config path: `~/.smartmail/config.json`, or `config.json` when there is no home directory.
pub fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".smartmail").join("config.json"))
        .unwrap_or_else(|| PathBuf::from("config.json"))
}

/// Load config from the given path (or the default). Missing file => default config.
/// Returns the config and the path that was used.
pub fn load_config(path: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    let path = path.unwrap_or_else(default_config_path);
    let config = if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        Config::default()
    } else {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        serde_json::from_str(&s)
            .with_context(|| format!("parsing config from {}", path.display()))?
    };
    Ok((config, path))
}
