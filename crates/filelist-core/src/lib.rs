//! filelist-core: client library for a small HTTP file storage service.
//!
//! Keeps an ordered, locally mirrored list of stored files in step with the
//! service: list, upload, rename, download and delete, each applied locally
//! only once the service confirms it.
//!
//! # Quick Start
//!
//! ```no_run
//! use filelist_core::{ClientConfig, CollectingSink, FileListClient};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ClientConfig::default();
//!     let client = FileListClient::from_config(&config, CollectingSink::new()).unwrap();
//!     if client.load_all().await.is_ok() {
//!         for record in client.records() {
//!             println!("{}\t{}", record.id, record.name);
//!         }
//!     }
//! }
//! ```
//!
//! Tests and embedders can plug in their own `FileService`, `SaveResource`
//! and `RenderSink` through `FileListClient::new`.

mod client;
pub mod config;
pub mod error;
pub mod http;
mod queue;
pub mod record;
pub mod render;
pub mod save;
pub mod service;

pub use client::{FileListClient, NO_FILE_SELECTED};
pub use config::ClientConfig;
pub use error::ClientError;
pub use http::HttpFileService;
pub use record::{FileCollection, FileId, FileRecord};
pub use render::{CollectingSink, RenderSink};
pub use save::{LocalSaver, SaveResource, SavedTo};
pub use service::{
    BoxFuture, DeleteReceipt, DownloadLink, FileService, RenamedFile, UploadSource,
};
