//! Application configuration management.
//!
//! Configuration is stored at `~/.config/campdesk/config.json` and can be
//! overridden per run with `CAMPDESK_API_URL`, `CAMPDESK_TOKEN` and
//! `CAMPDESK_CAMP_ID`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::DEFAULT_BASE_URL;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "campdesk";

/// Config file name
const CONFIG_FILE: &str = "config.json";

pub const ENV_API_URL: &str = "CAMPDESK_API_URL";
pub const ENV_TOKEN: &str = "CAMPDESK_TOKEN";
pub const ENV_CAMP_ID: &str = "CAMPDESK_CAMP_ID";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub api_base_url: Option<String>,
    pub api_token: Option<String>,
    /// Last camp opened; used when no camp is given on the command line.
    pub camp_id: Option<i64>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Load from disk, then apply environment overrides.
    pub fn load_with_env() -> Result<Self> {
        let mut config = Self::load()?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Override fields from `lookup`. Empty values are ignored, as is a camp
    /// id that is not a number.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = value(ENV_API_URL) {
            self.api_base_url = Some(url);
        }
        if let Some(token) = value(ENV_TOKEN) {
            self.api_token = Some(token);
        }
        if let Some(raw) = value(ENV_CAMP_ID) {
            match raw.trim().parse() {
                Ok(id) => self.camp_id = Some(id),
                Err(_) => warn!(value = %raw, "Ignoring non-numeric {}", ENV_CAMP_ID),
            }
        }
    }

    pub fn base_url(&self) -> &str {
        self.api_base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Root cache directory, `~/.cache/campdesk`.
    pub fn cache_root() -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Snapshot directory for one camp.
    pub fn cache_dir(&self, camp_id: i64) -> Result<PathBuf> {
        Ok(Self::cache_root()?.join(format!("camp_{}", camp_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = Config {
            api_base_url: Some("http://old".to_string()),
            api_token: None,
            camp_id: Some(1),
        };
        config.apply_env(env(&[
            (ENV_API_URL, "https://camps.example.org"),
            (ENV_TOKEN, "abc"),
            (ENV_CAMP_ID, " 12 "),
        ]));
        assert_eq!(config.base_url(), "https://camps.example.org");
        assert_eq!(config.api_token.as_deref(), Some("abc"));
        assert_eq!(config.camp_id, Some(12));
    }

    #[test]
    fn test_empty_and_invalid_env_values_are_ignored() {
        let mut config = Config {
            camp_id: Some(3),
            ..Default::default()
        };
        config.apply_env(env(&[(ENV_TOKEN, "  "), (ENV_CAMP_ID, "summer")]));
        assert_eq!(config.api_token, None);
        assert_eq!(config.camp_id, Some(3));
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_serializes_camel_case() {
        let config = Config {
            api_base_url: Some("http://x".to_string()),
            api_token: None,
            camp_id: Some(4),
        };
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["apiBaseUrl"], "http://x");
        assert_eq!(json["campId"], 4);
    }
}
