use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default API base URL
const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Default tolerance when checking refresh token expiry
const DEFAULT_EXPIRY_LEEWAY_SECS: u64 = 0;

/// Environment variable name for API URL override
pub const ENV_API_URL: &str = "CHORELY_API_URL";

/// Configuration file structure
#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    api: Option<ApiSection>,
}

#[derive(Debug, Deserialize, Default)]
struct ApiSection {
    /// API endpoint URL (e.g., "https://chores.example.com/api")
    base_url: Option<String>,
    /// Per-request timeout in seconds. No timeout when unset.
    timeout_secs: Option<u64>,
    /// Seconds subtracted from "now" when checking token expiry
    expiry_leeway_secs: Option<u64>,
}

/// Runtime API configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL every endpoint is appended to (e.g., "https://chores.example.com/api")
    pub base_url: String,
    /// Optional request timeout
    pub timeout: Option<Duration>,
    /// Leeway applied by the expiry check
    pub expiry_leeway_secs: u64,
    /// Source of the base URL (for logging)
    pub source: ConfigSource,
}

impl ApiConfig {
    /// Configuration pointing at an explicit base URL, everything else default.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_url(&base_url.into()),
            timeout: None,
            expiry_leeway_secs: DEFAULT_EXPIRY_LEEWAY_SECS,
            source: ConfigSource::Default,
        }
    }
}

/// Where the configuration came from
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Using default hardcoded values
    Default,
    /// Loaded from environment variable
    Environment,
    /// Loaded from config file
    ConfigFile,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::ConfigFile => write!(f, "config file"),
        }
    }
}

fn normalize_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Get the path to the configuration file
fn get_config_file_path() -> Option<PathBuf> {
    dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
        .map(|p| p.join("chorely").join("config.toml"))
}

/// Load configuration from a config file, if it exists and parses
fn load_config_file(path: &Path) -> Option<ConfigFile> {
    if !path.exists() {
        return None;
    }

    match fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::debug!("Loaded config from {:?}", path);
                Some(config)
            }
            Err(e) => {
                tracing::warn!("Failed to parse config file {:?}: {}", path, e);
                None
            }
        },
        Err(e) => {
            tracing::warn!("Failed to read config file {:?}: {}", path, e);
            None
        }
    }
}

/// Load API configuration with priority:
/// 1. Environment variable (CHORELY_API_URL)
/// 2. Config file (~/.config/chorely/config.toml)
/// 3. Default values
///
/// `timeout_secs` and `expiry_leeway_secs` are always taken from the config
/// file when present, whatever the source of the base URL.
pub fn load_api_config() -> ApiConfig {
    let file = get_config_file_path().and_then(|p| load_config_file(&p));
    resolve_config(std::env::var(ENV_API_URL).ok(), file)
}

fn resolve_config(env_url: Option<String>, file: Option<ConfigFile>) -> ApiConfig {
    let section = file.and_then(|f| f.api).unwrap_or_default();
    let timeout = section.timeout_secs.map(Duration::from_secs);
    let expiry_leeway_secs = section
        .expiry_leeway_secs
        .unwrap_or(DEFAULT_EXPIRY_LEEWAY_SECS);

    // Priority 1: Environment variable
    if let Some(url) = env_url.map(|u| normalize_url(&u)).filter(|u| !u.is_empty()) {
        tracing::info!("Using API URL from environment variable: {}", url);
        return ApiConfig {
            base_url: url,
            timeout,
            expiry_leeway_secs,
            source: ConfigSource::Environment,
        };
    }

    // Priority 2: Config file
    if let Some(url) = section
        .base_url
        .map(|u| normalize_url(&u))
        .filter(|u| !u.is_empty())
    {
        tracing::info!("Using API URL from config file: {}", url);
        return ApiConfig {
            base_url: url,
            timeout,
            expiry_leeway_secs,
            source: ConfigSource::ConfigFile,
        };
    }

    // Priority 3: Default values
    tracing::debug!("Using default API URL: {}", DEFAULT_API_URL);
    ApiConfig {
        base_url: DEFAULT_API_URL.to_string(),
        timeout,
        expiry_leeway_secs,
        source: ConfigSource::Default,
    }
}

/// Get the path to the config file for documentation purposes
pub fn get_config_file_path_string() -> String {
    get_config_file_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "~/.config/chorely/config.toml".to_string())
}

/// Generate example config file content
pub fn generate_example_config() -> String {
    r#"# Chorely Configuration
# Place this file at: ~/.config/chorely/config.toml

[api]
# Backend API base URL
# Default: http://localhost:5000/api
# base_url = "https://chores.example.com/api"

# Request timeout in seconds (no timeout when unset)
# timeout_secs = 30

# Treat refresh tokens as expired this many seconds early
# expiry_leeway_secs = 0
"#
    .to_string()
}
