use crate::equity::cache::{DEFAULT_CAPACITY, DEFAULT_TTL};
use crate::equity::EquityCache;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

//sheet used when none is configured
pub const DEFAULT_SHEET: &str = "R1";

//complete backtest configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestConfiguration {
    //returns workbook
    pub returns_dir: PathBuf,
    pub sheet_name: String,
    pub returns_field: String,

    //signal upload
    pub signals_path: Option<PathBuf>,

    //result cache
    pub cache_ttl_secs: u64,
    pub cache_capacity: usize,

    //optional output paths
    pub output_html: Option<PathBuf>,
    pub output_equity_csv: Option<PathBuf>,
    pub output_json: Option<PathBuf>,
}

impl Default for BacktestConfiguration {
    fn default() -> Self {
        BacktestConfiguration {
            returns_dir: PathBuf::from("data"),
            sheet_name: DEFAULT_SHEET.to_string(),
            returns_field: String::new(),
            signals_path: None,
            cache_ttl_secs: DEFAULT_TTL.as_secs(),
            cache_capacity: DEFAULT_CAPACITY,
            output_html: None,
            output_equity_csv: None,
            output_json: None,
        }
    }
}

impl BacktestConfiguration {
    //load configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: BacktestConfiguration = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        Ok(config)
    }

    //save configuration to a JSON file
    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config file {:?}", path))?;
        Ok(())
    }

    //builds the result cache described by this configuration
    pub fn build_cache(&self) -> EquityCache {
        EquityCache::new(Duration::from_secs(self.cache_ttl_secs), self.cache_capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = BacktestConfiguration::default();
        assert_eq!(config.sheet_name, "R1");
        assert_eq!(config.cache_ttl_secs, 600);
        assert!(config.signals_path.is_none());
    }

    #[test]
    fn test_json_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");

        let config = BacktestConfiguration {
            returns_field: "daily_returns".to_string(),
            signals_path: Some(PathBuf::from("tpi.csv")),
            cache_ttl_secs: 30,
            ..Default::default()
        };
        config.to_json_file(&path).unwrap();

        let loaded = BacktestConfiguration::from_json_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "returns_field": "btc" }"#).unwrap();

        let config = BacktestConfiguration::from_json_file(&path).unwrap();
        assert_eq!(config.returns_field, "btc");
        assert_eq!(config.sheet_name, DEFAULT_SHEET);
        assert_eq!(config.cache_capacity, DEFAULT_CAPACITY);
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = BacktestConfiguration::from_json_file("/nonexistent/config.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
