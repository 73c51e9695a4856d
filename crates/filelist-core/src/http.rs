//! HTTP implementation of `FileService`.
//!
//! Endpoints, relative to the base URL:
//!
//! | action   | method | path             | body                              |
//! |----------|--------|------------------|-----------------------------------|
//! | list     | GET    | `/get_files`     |                                   |
//! | upload   | POST   | `/upload`        | multipart `file`, `customName`    |
//! | download | GET    | `/download/{id}` |                                   |
//! | rename   | PUT    | `/rename/{id}`   | multipart `name`                  |
//! | delete   | DELETE | `/delete/{id}`   |                                   |
//!
//! Every reply is JSON. A non-success status or an undecodable body is a
//! failure; there is no retry.

use std::time::Duration;

use log::debug;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;

use crate::error::ClientError;
use crate::record::{FileId, FileRecord};
use crate::service::{BoxFuture, DeleteReceipt, DownloadLink, FileService, RenamedFile, UploadSource};

/// Build the reqwest client shared by the service and the local saver.
pub fn build_http_client(timeout: Option<Duration>) -> Result<Client, ClientError> {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {}", e)))
}

/// `FileService` speaking to the storage service over HTTP.
pub struct HttpFileService {
    client: Client,
    base: Url,
}

impl HttpFileService {
    /// Create a service rooted at `base_url` (e.g. `http://localhost:5000`).
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ClientError> {
        Self::with_client(base_url, build_http_client(timeout)?)
    }

    /// Create a service that reuses an existing reqwest client.
    pub fn with_client(base_url: &str, client: Client) -> Result<Self, ClientError> {
        let base = Url::parse(base_url)
            .map_err(|e| ClientError::Config(format!("invalid base URL '{}': {}", base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::Config(format!(
                "base URL '{}' cannot carry a path",
                base_url
            )));
        }
        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Join path segments onto the base URL. Each segment is percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // cannot_be_a_base was rejected in the constructor
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Send a request and decode its JSON reply.
    async fn send_json<T: DeserializeOwned>(
        &self,
        action: &'static str,
        request: RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = request.send().await.map_err(|e| ClientError::Transport {
            action,
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                action,
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| ClientError::Transport {
            action,
            message: format!("failed to read body: {}", e),
        })?;

        serde_json::from_slice(&body).map_err(|e| ClientError::Decode {
            action,
            message: e.to_string(),
        })
    }
}

impl FileService for HttpFileService {
    fn list(&self) -> BoxFuture<'_, Result<Vec<FileRecord>, ClientError>> {
        Box::pin(async move {
            let url = self.endpoint(&["get_files"]);
            debug!("GET {}", url);
            self.send_json("list", self.client.get(url)).await
        })
    }

    fn upload<'a>(
        &'a self,
        source: &'a UploadSource,
        custom_name: &'a str,
    ) -> BoxFuture<'a, Result<FileRecord, ClientError>> {
        Box::pin(async move {
            let url = self.endpoint(&["upload"]);
            debug!(
                "POST {} ({} bytes, file '{}', customName '{}')",
                url,
                source.bytes.len(),
                source.file_name,
                custom_name
            );
            let file = Part::bytes(source.bytes.clone()).file_name(source.file_name.clone());
            let form = Form::new()
                .part("file", file)
                .text("customName", custom_name.to_string());
            self.send_json("upload", self.client.post(url).multipart(form))
                .await
        })
    }

    fn download_link<'a>(
        &'a self,
        id: &'a FileId,
    ) -> BoxFuture<'a, Result<DownloadLink, ClientError>> {
        Box::pin(async move {
            let id = id.to_string();
            let url = self.endpoint(&["download", &id]);
            debug!("GET {}", url);
            self.send_json("download", self.client.get(url)).await
        })
    }

    fn rename<'a>(
        &'a self,
        id: &'a FileId,
        name: &'a str,
    ) -> BoxFuture<'a, Result<RenamedFile, ClientError>> {
        Box::pin(async move {
            let id = id.to_string();
            let url = self.endpoint(&["rename", &id]);
            debug!("PUT {} (name '{}')", url, name);
            let form = Form::new().text("name", name.to_string());
            self.send_json("rename", self.client.put(url).multipart(form))
                .await
        })
    }

    fn delete<'a>(&'a self, id: &'a FileId) -> BoxFuture<'a, Result<DeleteReceipt, ClientError>> {
        Box::pin(async move {
            let id = id.to_string();
            let url = self.endpoint(&["delete", &id]);
            debug!("DELETE {}", url);
            self.send_json("delete", self.client.delete(url)).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_segments() {
        let service = HttpFileService::new("http://localhost:5000", None).unwrap();
        assert_eq!(
            service.endpoint(&["get_files"]).as_str(),
            "http://localhost:5000/get_files"
        );
        assert_eq!(
            service.endpoint(&["rename", "12"]).as_str(),
            "http://localhost:5000/rename/12"
        );
    }

    #[test]
    fn endpoint_keeps_base_path_prefix() {
        let service = HttpFileService::new("http://files.local:8080/api/", None).unwrap();
        assert_eq!(
            service.endpoint(&["delete", "3"]).as_str(),
            "http://files.local:8080/api/delete/3"
        );
    }

    #[test]
    fn endpoint_encodes_string_ids() {
        let service = HttpFileService::new("http://localhost:5000", None).unwrap();
        assert_eq!(
            service.endpoint(&["download", "a b/c"]).as_str(),
            "http://localhost:5000/download/a%20b%2Fc"
        );
    }

    #[test]
    fn invalid_base_url_is_config_error() {
        let err = HttpFileService::new("not a url", None).err().unwrap();
        assert!(matches!(err, ClientError::Config(_)));
        let err = HttpFileService::new("mailto:someone@example.com", None)
            .err()
            .unwrap();
        assert!(matches!(err, ClientError::Config(_)));
    }
}
