use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::VigilError;

pub const DEFAULT_ENDPOINT: &str = "ws://localhost:8765";
pub const DEFAULT_EXPECTED_HOST: &str = "github.com";

const CONFIG_PATH: &str = ".vigil/config.json";

/// Client configuration. Resolution order: built-in defaults, then
/// `.vigil/config.json` if present, then `VIGIL_ENDPOINT` /
/// `VIGIL_EXPECTED_HOST` environment variables. CLI flags override all of
/// these at the call site. A missing or corrupt config file falls back to
/// defaults rather than aborting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// WebSocket endpoint of the scanning backend.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Host a submitted repository reference must point at.
    #[serde(default = "default_expected_host")]
    pub expected_host: String,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_expected_host() -> String {
    DEFAULT_EXPECTED_HOST.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            expected_host: default_expected_host(),
        }
    }
}

impl ClientConfig {
    pub fn load() -> Self {
        let mut config = Self::load_from(Path::new(CONFIG_PATH));
        if let Ok(endpoint) = std::env::var("VIGIL_ENDPOINT") {
            if !endpoint.is_empty() {
                config.endpoint = endpoint;
            }
        }
        if let Ok(host) = std::env::var("VIGIL_EXPECTED_HOST") {
            if !host.is_empty() {
                config.expected_host = host;
            }
        }
        config
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self) -> Result<(), VigilError> {
        self.save_to(Path::new(CONFIG_PATH))
    }

    pub fn save_to(&self, path: &Path) -> Result<(), VigilError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        PathBuf::from(CONFIG_PATH)
    }
}
