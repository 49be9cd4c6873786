/// Service configuration, read from an optional JSON file
use crate::layout::GridOptions;
use crate::upstream::UpstreamConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "PLANNER_CONFIG";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub grid: GridOptions,
}

/// Where the service listens
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

impl PlannerConfig {
    /// Loads a configuration file. Missing keys keep their defaults.
    ///
    /// # Arguments
    /// * `path` - Path to a JSON configuration file
    ///
    /// # Returns
    /// * `Ok(PlannerConfig)` - The parsed configuration
    /// * `Err` - If the file can't be read or parsed
    pub fn load_from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let content = fs::read_to_string(path)?;
        let config: PlannerConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Loads the file named by `PLANNER_CONFIG`, else the first CLI
    /// argument, else falls back to defaults.
    pub fn load() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        match config_path(std::env::var(CONFIG_ENV_VAR).ok(), std::env::args().nth(1)) {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }
}

fn config_path(env_value: Option<String>, first_arg: Option<String>) -> Option<PathBuf> {
    env_value
        .filter(|v| !v.trim().is_empty())
        .or(first_arg)
        .map(PathBuf::from)
}
