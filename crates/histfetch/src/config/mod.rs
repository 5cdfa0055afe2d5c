use crate::error::{Error, Result};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "http://192.168.2.9";
pub const DEFAULT_OUTPUT_DIR: &str = "data";
pub const DEFAULT_ARCHIVE_DIR: &str = "backups";
pub const DEFAULT_FILENAME: &str = "history.csv";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Sub-path the device serves its history log on
pub const HISTORY_PATH: &str = "/api/history";

#[derive(Debug, Clone)]
pub struct Config {
    pub endpoint: String,
    pub output_dir: PathBuf,
    pub output_filename: String,
    pub archive_dir: PathBuf,
    pub enable_archiving: bool,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            output_filename: DEFAULT_FILENAME.to_string(),
            archive_dir: PathBuf::from(DEFAULT_ARCHIVE_DIR),
            enable_archiving: true,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    pub fn new(
        endpoint: impl Into<String>,
        output_dir: PathBuf,
        output_filename: impl Into<String>,
        archive_dir: PathBuf,
        enable_archiving: bool,
        timeout: Duration,
    ) -> Result<Self> {
        let config = Self {
            endpoint: endpoint.into(),
            output_dir,
            output_filename: output_filename.into(),
            archive_dir,
            enable_archiving,
            timeout,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.endpoint.trim().is_empty() {
            return Err(Error::Config("endpoint must not be empty".to_string()));
        }

        if self.output_filename.is_empty() {
            return Err(Error::Config(
                "output filename must not be empty".to_string(),
            ));
        }

        if self.output_filename.contains(['/', '\\']) {
            return Err(Error::Config(format!(
                "output filename must be a bare file name: {}",
                self.output_filename
            )));
        }

        if self.timeout.is_zero() {
            return Err(Error::Config("timeout must be greater than zero".to_string()));
        }

        Ok(())
    }

    /// Path of the current snapshot
    pub fn history_file(&self) -> PathBuf {
        self.output_dir.join(&self.output_filename)
    }

    pub fn history_url(&self) -> String {
        format!("{}{}", self.endpoint.trim_end_matches('/'), HISTORY_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.history_file(), PathBuf::from("data/history.csv"));
        assert_eq!(config.history_url(), "http://192.168.2.9/api/history");
        assert!(config.enable_archiving);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_history_url_trims_trailing_slash() {
        let config = Config {
            endpoint: "http://esp.local/".to_string(),
            ..Config::default()
        };
        assert_eq!(config.history_url(), "http://esp.local/api/history");
    }

    #[test]
    fn test_rejects_bad_values() {
        let base = Config::default();

        let empty_endpoint = Config {
            endpoint: "  ".to_string(),
            ..base.clone()
        };
        assert!(matches!(empty_endpoint.validate(), Err(Error::Config(_))));

        let nested_name = Config {
            output_filename: "sub/history.csv".to_string(),
            ..base.clone()
        };
        assert!(matches!(nested_name.validate(), Err(Error::Config(_))));

        let zero_timeout = Config {
            timeout: Duration::ZERO,
            ..base
        };
        assert!(matches!(zero_timeout.validate(), Err(Error::Config(_))));
    }
}
