use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use certgen_engine::{EngineSettings, ServiceSettings, DEFAULT_OUTPUT_FILENAME, DEFAULT_SERVICE_URL};
use serde::Deserialize;
use thiserror::Error;

use crate::platform::logging::LogDestination;

/// Picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "certgen.ron";

const FALLBACK_DOWNLOAD_DIR: &str = "downloads";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot parse config: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub service_url: String,
    pub download_dir: Option<PathBuf>,
    pub output_filename: String,
    pub poll_interval_ms: u64,
    pub dialog_delay_ms: u64,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: Option<u64>,
    pub log_level: String,
    pub log_destination: Option<LogDestination>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.to_string(),
            download_dir: None,
            output_filename: DEFAULT_OUTPUT_FILENAME.to_string(),
            poll_interval_ms: 1000,
            dialog_delay_ms: 3000,
            connect_timeout_secs: 10,
            request_timeout_secs: None,
            log_level: "info".to_string(),
            log_destination: None,
        }
    }
}

impl AppConfig {
    /// Loads `explicit` if given (it must exist), else `./certgen.ron` if present,
    /// else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::read(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.is_file() {
                    Self::read(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        ron::from_str(text).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn with_overrides(
        mut self,
        service_url: Option<String>,
        download_dir: Option<PathBuf>,
        log_level: Option<String>,
    ) -> Self {
        if let Some(url) = service_url {
            self.service_url = url;
        }
        if download_dir.is_some() {
            self.download_dir = download_dir;
        }
        if let Some(level) = log_level {
            self.log_level = level;
        }
        self
    }

    pub fn resolved_download_dir(&self) -> PathBuf {
        if let Some(dir) = &self.download_dir {
            return dir.clone();
        }
        directories::UserDirs::new()
            .and_then(|dirs| dirs.download_dir().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from(FALLBACK_DOWNLOAD_DIR))
    }

    pub fn engine_settings(&self) -> EngineSettings {
        let poll_interval = Duration::from_millis(self.poll_interval_ms.max(1));
        EngineSettings {
            service: ServiceSettings {
                base_url: self.service_url.clone(),
                connect_timeout: Duration::from_secs(self.connect_timeout_secs),
                request_timeout: self.request_timeout_secs.map(Duration::from_secs),
                status_timeout: poll_interval,
            },
            download_dir: self.resolved_download_dir(),
            output_filename: self.output_filename.clone(),
            poll_interval,
            dialog_delay: Duration::from_millis(self.dialog_delay_ms),
        }
    }
}
