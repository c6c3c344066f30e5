use crate::model::job::NodeSort;
use crate::model::profile::ConnectionProfile;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub zowe_binary_path: String,
    /// Connection profiles available to add as sessions
    #[serde(default)]
    pub profiles: Vec<ConnectionProfile>,
    /// Sort applied to job listings
    #[serde(default)]
    pub job_sort: NodeSort,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            zowe_binary_path: "zowe".to_string(),
            profiles: Vec::new(),
            job_sort: NodeSort::default(),
        }
    }
}

impl Config {
    pub fn config_dir() -> Option<PathBuf> {
        let home = env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(".zos-tui"))
    }

    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.json"))
    }

    pub fn load() -> Option<Config> {
        let config_path = Self::config_path()?;
        if !config_path.exists() {
            return None;
        }

        let contents = fs::read_to_string(&config_path).ok()?;
        serde_json::from_str(&contents).ok()
    }

    /// Save the config to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let config_dir = Self::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        // Create config directory if it doesn't exist
        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }

        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, contents)?;

        Ok(())
    }

    /// Path of the app log file, next to the config
    pub fn log_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("zos-tui.log"))
    }

    pub fn profile(&self, name: &str) -> Option<&ConnectionProfile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    pub fn profile_mut(&mut self, name: &str) -> Option<&mut ConnectionProfile> {
        self.profiles.iter_mut().find(|p| p.name == name)
    }
}
