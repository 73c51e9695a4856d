//! `FileListClient`: keeps the local file list in step with the service.
//!
//! Every operation is one request/response cycle:
//!
//! ```text
//! user action -> FileService call -> reply -> FileCollection change -> render
//! ```
//!
//! The collection only changes after the service confirms. A failed call
//! leaves it exactly as it was. Failures are logged here and also returned,
//! so callers may inspect or ignore them.
//!
//! Operations take `&self` and may overlap. Operations on the same id queue
//! behind each other (see `queue`), and each re-checks the id once its turn
//! comes. A rename that was waiting behind a delete therefore aborts with
//! `UnknownId` instead of touching a record that is gone.

use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{debug, error, info, warn};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::http::{HttpFileService, build_http_client};
use crate::queue::IdQueues;
use crate::record::{FileCollection, FileId, FileRecord};
use crate::render::RenderSink;
use crate::save::{LocalSaver, SaveResource, SavedTo};
use crate::service::{FileService, UploadSource};

/// Alert shown when upload is invoked without a payload.
pub const NO_FILE_SELECTED: &str = "Please select a file";

/// Client for the file storage service, owning the mirrored file list.
pub struct FileListClient {
    service: Box<dyn FileService>,
    saver: Box<dyn SaveResource>,
    sink: Box<dyn RenderSink>,
    files: Mutex<FileCollection>,
    queues: IdQueues,
}

impl FileListClient {
    /// Create a client with an empty list.
    pub fn new(
        service: impl FileService + 'static,
        saver: impl SaveResource + 'static,
        sink: impl RenderSink + 'static,
    ) -> Self {
        Self {
            service: Box::new(service),
            saver: Box::new(saver),
            sink: Box::new(sink),
            files: Mutex::new(FileCollection::new()),
            queues: IdQueues::default(),
        }
    }

    /// Create a client talking HTTP to the configured service and saving
    /// downloads into the configured directory.
    pub fn from_config(
        config: &ClientConfig,
        sink: impl RenderSink + 'static,
    ) -> Result<Self, ClientError> {
        let http = build_http_client(config.request_timeout())?;
        let service = HttpFileService::with_client(&config.base_url(), http.clone())?;
        let saver = LocalSaver::new(http, config.download_dir());
        Ok(Self::new(service, saver, sink))
    }

    fn files(&self) -> MutexGuard<'_, FileCollection> {
        self.files.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the current list.
    pub fn records(&self) -> Vec<FileRecord> {
        self.files().as_slice().to_vec()
    }

    /// Look up one record by id.
    pub fn get(&self, id: &FileId) -> Option<FileRecord> {
        self.files().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.files().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files().is_empty()
    }

    /// Hand the current list to the render sink.
    pub fn render(&self) {
        let snapshot = self.records();
        self.sink.render(&snapshot);
    }

    /// Log a failure at the level its kind deserves and hand it back.
    fn report(&self, action: &str, err: ClientError) -> ClientError {
        match &err {
            ClientError::Validation(_) | ClientError::UnknownId(_) => {
                warn!("{} aborted: {}", action, err)
            }
            _ => error!("{} failed: {}", action, err),
        }
        err
    }

    /// Name of the record with `id`, or `UnknownId`.
    fn name_of(&self, id: &FileId) -> Result<String, ClientError> {
        self.files()
            .get(id)
            .map(|r| r.name.clone())
            .ok_or_else(|| ClientError::UnknownId(id.clone()))
    }

    /// Replace the local list with the service's listing.
    ///
    /// On failure the previous list stays in place. Returns the new length.
    pub async fn load_all(&self) -> Result<usize, ClientError> {
        let records = self
            .service
            .list()
            .await
            .map_err(|e| self.report("load", e))?;
        let count = {
            let mut files = self.files();
            files.replace_all(records);
            files.len()
        };
        debug!("loaded {} file(s)", count);
        self.render();
        Ok(count)
    }

    /// Upload `source`, optionally under `display_name`, and append the
    /// record the service creates.
    ///
    /// A missing `source` alerts the user and sends nothing. The call is
    /// never retried: a retry could create a duplicate.
    pub async fn upload(
        &self,
        source: Option<UploadSource>,
        display_name: Option<&str>,
    ) -> Result<FileRecord, ClientError> {
        let Some(source) = source else {
            self.sink.alert(NO_FILE_SELECTED);
            return Err(self.report("upload", ClientError::validation(NO_FILE_SELECTED)));
        };

        let custom_name = display_name.unwrap_or("");
        let record = self
            .service
            .upload(&source, custom_name)
            .await
            .map_err(|e| self.report("upload", e))?;

        info!("uploaded '{}' as {} '{}'", source.file_name, record.id, record.name);
        self.files().append(record.clone());
        self.render();
        Ok(record)
    }

    /// Fetch a locator for `id` and save it under the record's local name.
    pub async fn download(&self, id: &FileId) -> Result<SavedTo, ClientError> {
        let _turn = self.queues.acquire(id).await;
        let name = self.name_of(id).map_err(|e| self.report("download", e))?;

        let link = self
            .service
            .download_link(id)
            .await
            .map_err(|e| self.report("download", e))?;

        self.saver
            .save(&link.url, &name)
            .await
            .map_err(|e| self.report("download", e))
    }

    /// Rename `id`. `None` or an empty name means the user cancelled;
    /// nothing is sent. Any other name, whitespace included, goes to the
    /// service as typed.
    ///
    /// The local record takes the name the service echoes back.
    pub async fn rename(
        &self,
        id: &FileId,
        new_name: Option<&str>,
    ) -> Result<FileRecord, ClientError> {
        let Some(new_name) = new_name.filter(|n| !n.is_empty()) else {
            return Err(self.report("rename", ClientError::validation("no new name given")));
        };

        let _turn = self.queues.acquire(id).await;
        self.name_of(id).map_err(|e| self.report("rename", e))?;

        let renamed = self
            .service
            .rename(id, new_name)
            .await
            .map_err(|e| self.report("rename", e))?;

        let updated = {
            let mut files = self.files();
            files.rename(id, renamed.name.clone());
            files.get(id).cloned()
        };
        let Some(updated) = updated else {
            // A full reload replaced the list while the request was out.
            warn!("renamed {} but it is no longer listed locally", id);
            return Ok(FileRecord {
                id: id.clone(),
                name: renamed.name,
            });
        };

        info!("renamed {} to '{}'", id, updated.name);
        self.render();
        Ok(updated)
    }

    /// Delete `id` on the service, then drop it locally.
    pub async fn remove(&self, id: &FileId) -> Result<FileRecord, ClientError> {
        let _turn = self.queues.acquire(id).await;
        let name = self.name_of(id).map_err(|e| self.report("delete", e))?;

        let receipt = self
            .service
            .delete(id)
            .await
            .map_err(|e| self.report("delete", e))?;
        if let Some(message) = receipt.message {
            debug!("delete {}: {}", id, message);
        }

        let removed = self.files().remove(id).unwrap_or(FileRecord {
            id: id.clone(),
            name,
        });
        info!("deleted {} '{}'", removed.id, removed.name);
        self.render();
        Ok(removed)
    }
}
