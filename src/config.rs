use std::{fs::read_to_string, path::Path, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub map_url: String,
    pub endpoint: String,
    pub user_agent: String,
    pub load_timeout_ms: u64,
    pub output: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            map_url: "https://www.starbucks.co.kr/store/store_map.do".to_string(),
            endpoint: "https://www.starbucks.co.kr/store/getStore.do".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            load_timeout_ms: 10_000,
            output: PathBuf::from("starbucks_data.json"),
        }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_yaml::from_str(&raw)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    pub fn load_timeout(&self) -> Duration {
        Duration::from_millis(self.load_timeout_ms)
    }
}
