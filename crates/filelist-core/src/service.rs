//! The file storage service seen from the client.
//!
//! `FileService` is the seam between `FileListClient` and the network.
//! `HttpFileService` is the production implementation; tests substitute an
//! in-memory one.
//!
//! # Dyn-compatibility
//!
//! Methods return `Pin<Box<dyn Future>>` so the client can hold a
//! `Box<dyn FileService>` and swap implementations at runtime.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::error::ClientError;
use crate::record::{FileId, FileRecord};

/// Boxed, Send future — the return type for all service methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Binary payload selected for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSource {
    /// Original filename, sent with the multipart `file` part.
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadSource {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a local file into memory.
    pub async fn from_path(path: &Path) -> Result<Self, ClientError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self { file_name, bytes })
    }
}

/// Response to a download request: where the content can be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadLink {
    pub url: String,
}

/// Response to a rename: the name the service actually stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenamedFile {
    pub name: String,
}

/// Response to a delete. Only the optional message is kept, for logging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteReceipt {
    #[serde(default)]
    pub message: Option<String>,
}

/// Remote file store.
///
/// Every method issues exactly one request and resolves once the service
/// replies. Implementations never retry.
pub trait FileService: Send + Sync {
    /// Fetch the full ordered listing.
    fn list(&self) -> BoxFuture<'_, Result<Vec<FileRecord>, ClientError>>;

    /// Create a file. `custom_name` may be empty, meaning "use the file's own name".
    fn upload<'a>(
        &'a self,
        source: &'a UploadSource,
        custom_name: &'a str,
    ) -> BoxFuture<'a, Result<FileRecord, ClientError>>;

    /// Ask for a short-lived locator for the file's content.
    fn download_link<'a>(&'a self, id: &'a FileId)
    -> BoxFuture<'a, Result<DownloadLink, ClientError>>;

    /// Rename a file; the reply carries the authoritative name.
    fn rename<'a>(
        &'a self,
        id: &'a FileId,
        name: &'a str,
    ) -> BoxFuture<'a, Result<RenamedFile, ClientError>>;

    /// Delete a file.
    fn delete<'a>(&'a self, id: &'a FileId) -> BoxFuture<'a, Result<DeleteReceipt, ClientError>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delete_receipt_tolerates_any_object() {
        let receipt: DeleteReceipt = serde_json::from_str(r#"{"message": "File deleted"}"#).unwrap();
        assert_eq!(receipt.message.as_deref(), Some("File deleted"));
        let receipt: DeleteReceipt = serde_json::from_str(r#"{"ok": true}"#).unwrap();
        assert!(receipt.message.is_none());
    }

    #[test]
    fn rename_reply_ignores_extra_keys() {
        let renamed: RenamedFile =
            serde_json::from_str(r#"{"id": 2, "name": "z.txt", "url": "https://x"}"#).unwrap();
        assert_eq!(renamed.name, "z.txt");
    }

    #[tokio::test]
    async fn upload_source_from_path_uses_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.md");
        std::fs::write(&path, b"# hi").unwrap();
        let source = UploadSource::from_path(&path).await.unwrap();
        assert_eq!(source.file_name, "notes.md");
        assert_eq!(source.bytes, b"# hi");
    }

    #[tokio::test]
    async fn upload_source_missing_path_is_io_error() {
        let err = UploadSource::from_path(Path::new("/nonexistent/file.bin"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Io(_)));
    }
}
