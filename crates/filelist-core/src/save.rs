//! Saving downloaded content on the host.
//!
//! The client only obtains a locator from the service; turning that locator
//! into a saved file is the host's job, expressed as the `SaveResource`
//! capability. `LocalSaver` is the terminal host's version: it fetches the
//! locator and writes the bytes into a download directory.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use log::{debug, info};
use reqwest::Client;
use tempfile::NamedTempFile;

use crate::error::ClientError;
use crate::service::BoxFuture;

/// Where a saved resource ended up, in a host-specific form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedTo {
    pub location: String,
}

/// Host capability: fetch `locator` and keep it under `suggested_name`.
pub trait SaveResource: Send + Sync {
    fn save<'a>(
        &'a self,
        locator: &'a str,
        suggested_name: &'a str,
    ) -> BoxFuture<'a, Result<SavedTo, ClientError>>;
}

/// Saves resources into a local directory.
///
/// Existing files are never overwritten: `report.pdf` becomes
/// `report (1).pdf`, `report (2).pdf`, and so on.
pub struct LocalSaver {
    client: Client,
    dir: PathBuf,
}

impl LocalSaver {
    pub fn new(client: Client, dir: PathBuf) -> Self {
        Self { client, dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn fetch(&self, locator: &str) -> Result<Vec<u8>, ClientError> {
        let save_err = |message: String| ClientError::Save {
            locator: locator.to_string(),
            message,
        };

        let response = self
            .client
            .get(locator)
            .send()
            .await
            .map_err(|e| save_err(e.to_string()))?;

        if !response.status().is_success() {
            return Err(save_err(format!("HTTP {}", response.status())));
        }

        let mut data = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| save_err(format!("failed to read body: {}", e)))?;
            data.extend_from_slice(&chunk);
        }
        Ok(data)
    }
}

impl SaveResource for LocalSaver {
    fn save<'a>(
        &'a self,
        locator: &'a str,
        suggested_name: &'a str,
    ) -> BoxFuture<'a, Result<SavedTo, ClientError>> {
        Box::pin(async move {
            debug!("fetching {}", locator);
            let data = self.fetch(locator).await?;
            let dir = self.dir.clone();
            let name = sanitize_file_name(suggested_name);
            let path = tokio::task::spawn_blocking(move || write_unique(&dir, &name, &data))
                .await
                .map_err(|e| io::Error::other(format!("join error: {}", e)))??;
            info!("saved {} to {}", locator, path.display());
            Ok(SavedTo {
                location: path.display().to_string(),
            })
        })
    }
}

/// Reduce a display name to a bare file name safe to create in a directory.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_control())
        .collect::<String>();
    let base = base.trim();
    if base.is_empty() || base == "." || base == ".." {
        "download".to_string()
    } else {
        base.to_string()
    }
}

/// Name for the `n`th collision: `stem (n).ext`.
fn numbered_name(name: &str, n: usize) -> String {
    let path = Path::new(name);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string());
    match path.extension() {
        Some(ext) => format!("{} ({}).{}", stem, n, ext.to_string_lossy()),
        None => format!("{} ({})", stem, n),
    }
}

/// Write `data` atomically into `dir`, picking the first free name.
fn write_unique(dir: &Path, name: &str, data: &[u8]) -> io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(data)?;
    file.as_file().sync_all()?;

    let mut n = 0;
    loop {
        let candidate = if n == 0 {
            dir.join(name)
        } else {
            dir.join(numbered_name(name, n))
        };
        match file.persist_noclobber(&candidate) {
            Ok(_) => return Ok(candidate),
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
                file = e.file;
                n += 1;
            }
            Err(e) => return Err(e.error),
        }
    }
}
