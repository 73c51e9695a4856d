//! Client configuration from `<home>/config.toml`.
//!
//! Home resolution: `FILELIST_HOME` env > `~/.filelist`.
//! A missing file means defaults; a malformed file is reported as an error
//! so the caller can warn and fall back.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ClientError;

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_scheme() -> String {
    "http".to_string()
}

/// Resolve the filelist home directory.
pub fn home_dir() -> Option<PathBuf> {
    if let Ok(h) = std::env::var("FILELIST_HOME") {
        return Some(PathBuf::from(h));
    }
    dirs_next::home_dir().map(|home| home.join(".filelist"))
}

/// Where the service lives and how the client behaves.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_scheme")]
    pub scheme: String,
    /// Unset means requests may wait forever.
    #[serde(default)]
    pub request_timeout_seconds: Option<u64>,
    /// Directory for downloads; defaults to the working directory.
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
    #[serde(default)]
    pub verbose: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            scheme: default_scheme(),
            request_timeout_seconds: None,
            download_dir: None,
            verbose: false,
        }
    }
}

impl ClientConfig {
    /// Load `<home>/config.toml`. Missing file yields defaults.
    pub fn load(home: &Path) -> Result<Self, ClientError> {
        let path = home.join("config.toml");
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                ClientError::Config(format!("{}: {}", path.display(), e.message()))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// `scheme://host:port`
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_seconds.map(Duration::from_secs)
    }

    /// Download directory, falling back to the working directory.
    pub fn download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
