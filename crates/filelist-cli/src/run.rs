//! Command handlers shared by one-shot mode and the shell.
//!
//! Each returns whether the operation succeeded. The client has already
//! logged any failure; handlers only add what the user should see.

use std::path::Path;

use filelist_core::{ClientError, FileId, FileListClient, UploadSource};

use crate::output::{Outcome, Presenter};

/// Unknown ids get a direct message; everything else was logged by the client.
fn tell_user(err: &ClientError) {
    if let ClientError::UnknownId(id) = err {
        eprintln!("No file with id {} (try refreshing the list)", id);
    }
}

pub async fn upload(
    client: &FileListClient,
    presenter: &Presenter,
    path: Option<&Path>,
    name: Option<&str>,
) -> bool {
    let source = match path {
        Some(path) => match UploadSource::from_path(path).await {
            Ok(source) => Some(source),
            Err(e) => {
                eprintln!("Cannot read {}: {}", path.display(), e);
                return false;
            }
        },
        None => None,
    };

    match client.upload(source, name).await {
        Ok(record) => {
            presenter.emit_outcome(&Outcome::Uploaded { record: &record });
            true
        }
        Err(e) => {
            tell_user(&e);
            false
        }
    }
}

pub async fn download(client: &FileListClient, presenter: &Presenter, id: &FileId) -> bool {
    match client.download(id).await {
        Ok(saved) => {
            presenter.emit_outcome(&Outcome::Saved {
                id: id.to_string(),
                location: &saved.location,
            });
            true
        }
        Err(e) => {
            tell_user(&e);
            false
        }
    }
}

pub async fn rename(
    client: &FileListClient,
    presenter: &Presenter,
    id: &FileId,
    name: Option<&str>,
) -> bool {
    match client.rename(id, name).await {
        Ok(record) => {
            presenter.emit_outcome(&Outcome::Renamed { record: &record });
            true
        }
        Err(e) => {
            tell_user(&e);
            false
        }
    }
}

pub async fn delete(client: &FileListClient, presenter: &Presenter, id: &FileId) -> bool {
    match client.remove(id).await {
        Ok(record) => {
            presenter.emit_outcome(&Outcome::Deleted { record: &record });
            true
        }
        Err(e) => {
            tell_user(&e);
            false
        }
    }
}
