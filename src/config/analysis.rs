// src/config/analysis.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::{env, fs};

pub const DEFAULT_ANALYSIS_CONFIG_PATH: &str = "config/analysis.toml";
pub const ENV_ANALYSIS_CONFIG_PATH: &str = "ANALYSIS_CONFIG_PATH";

pub const ENV_ANALYSIS_ENABLED: &str = "ANALYSIS_ENABLED";
pub const ENV_ANALYSIS_API_BASE: &str = "ANALYSIS_API_BASE";
pub const ENV_ANALYSIS_TIMEOUT_SECS: &str = "ANALYSIS_TIMEOUT_SECS";
/// `ANALYSIS_TEST_MODE=mock` swaps the HTTP transport for the canned payload.
pub const ENV_ANALYSIS_TEST_MODE: &str = "ANALYSIS_TEST_MODE";

fn default_enabled() -> bool {
    true
}
fn default_api_base() -> String {
    "http://localhost:8000".to_string()
}
fn default_connect_timeout_secs() -> u64 {
    4
}
fn default_timeout_secs() -> u64 {
    60
}

/// Where and how to reach the scenario analysis service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Base URL; `/simulate` and `/health` are appended.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Whole-request timeout. The service waits on an LLM, so this is generous.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Serve the canned offline payload instead of calling the service.
    #[serde(default)]
    pub fixture: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            api_base: default_api_base(),
            connect_timeout_secs: default_connect_timeout_secs(),
            timeout_secs: default_timeout_secs(),
            fixture: false,
        }
    }
}

impl AnalysisConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading analysis config from {}", path.display()))?;
        Self::from_toml_str(&data)
            .with_context(|| format!("parsing analysis config {}", path.display()))
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        #[derive(Deserialize)]
        struct Root {
            analysis: AnalysisConfig,
        }
        let root: Root = toml::from_str(s)?;
        Ok(root.analysis.sanitized())
    }

    /// Load using env var + fallbacks, then apply env overrides:
    /// 1) $ANALYSIS_CONFIG_PATH (must exist)
    /// 2) config/analysis.toml
    /// 3) built-in defaults
    pub fn load_default() -> Result<Self> {
        let base = match env::var(ENV_ANALYSIS_CONFIG_PATH) {
            Ok(p) => {
                let pb = PathBuf::from(p);
                if !pb.exists() {
                    anyhow::bail!("{ENV_ANALYSIS_CONFIG_PATH} points to non-existent path");
                }
                Self::load_from_file(&pb)?
            }
            Err(_) => {
                let p = PathBuf::from(DEFAULT_ANALYSIS_CONFIG_PATH);
                if p.exists() {
                    Self::load_from_file(&p)?
                } else {
                    Self::default()
                }
            }
        };
        base.with_env_overrides()
    }

    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(v) = env::var(ENV_ANALYSIS_ENABLED) {
            self.enabled = parse_flag(&v)
                .with_context(|| format!("{ENV_ANALYSIS_ENABLED} must be a boolean flag"))?;
        }
        if let Ok(v) = env::var(ENV_ANALYSIS_API_BASE) {
            if !v.trim().is_empty() {
                self.api_base = v.trim().to_string();
            }
        }
        if let Ok(v) = env::var(ENV_ANALYSIS_TIMEOUT_SECS) {
            self.timeout_secs = v
                .trim()
                .parse()
                .with_context(|| format!("{ENV_ANALYSIS_TIMEOUT_SECS} must be whole seconds"))?;
        }
        if env::var(ENV_ANALYSIS_TEST_MODE).is_ok_and(|v| v.eq_ignore_ascii_case("mock")) {
            self.fixture = true;
        }
        Ok(self.sanitized())
    }

    fn sanitized(mut self) -> Self {
        self.api_base = self.api_base.trim().trim_end_matches('/').to_string();
        if self.api_base.is_empty() {
            self.api_base = default_api_base();
        }
        if self.timeout_secs == 0 {
            self.timeout_secs = default_timeout_secs();
        }
        if self.connect_timeout_secs == 0 {
            self.connect_timeout_secs = default_connect_timeout_secs();
        }
        self
    }
}

fn parse_flag(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
