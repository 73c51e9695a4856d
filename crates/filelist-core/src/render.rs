//! Render target abstraction.
//!
//! The client calls `render` after every confirmed mutation with a snapshot
//! of the whole list, and `alert` when user input is missing.
//!
//! filelist-cli implements this with a table or JSON printer.
//! `CollectingSink` keeps everything in memory for tests and embedding.

use std::sync::{Arc, Mutex, PoisonError};

use crate::record::FileRecord;

/// Display surface for the file list.
pub trait RenderSink: Send + Sync {
    /// Show all records, in order. Each record's `id` is what the
    /// download, rename and remove actions take.
    fn render(&self, records: &[FileRecord]);

    /// Show a blocking, user-facing message.
    fn alert(&self, message: &str);
}

impl<S: RenderSink + ?Sized> RenderSink for Arc<S> {
    fn render(&self, records: &[FileRecord]) {
        (**self).render(records)
    }

    fn alert(&self, message: &str) {
        (**self).alert(message)
    }
}

/// Sink that records every render and alert.
#[derive(Debug, Default)]
pub struct CollectingSink {
    renders: Mutex<Vec<Vec<FileRecord>>>,
    alerts: Mutex<Vec<String>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of renders so far.
    pub fn render_count(&self) -> usize {
        self.renders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// The most recent render, if any.
    pub fn last_render(&self) -> Option<Vec<FileRecord>> {
        self.renders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl RenderSink for CollectingSink {
    fn render(&self, records: &[FileRecord]) {
        self.renders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(records.to_vec());
    }

    fn alert(&self, message: &str) {
        self.alerts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}
