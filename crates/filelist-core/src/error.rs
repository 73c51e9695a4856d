//! Error taxonomy for client operations.
//!
//! Three families matter to callers:
//!
//! - **validation**: required user input is missing, nothing was sent
//! - **transport**: the request failed, returned a non-success status, or
//!   came back with a body we could not decode
//! - **reference**: the action named an id that is no longer in the local list
//!
//! Client operations log every failure before returning it, so callers are
//! free to drop the error value.

use crate::record::FileId;

/// Errors produced by `FileListClient` and its collaborators.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("{0}")]
    Validation(String),

    #[error("{action} request failed: {message}")]
    Transport {
        action: &'static str,
        message: String,
    },

    #[error("{action} request returned HTTP {status}")]
    Status { action: &'static str, status: u16 },

    #[error("{action} response could not be decoded: {message}")]
    Decode {
        action: &'static str,
        message: String,
    },

    #[error("no file with id {0} in the local list")]
    UnknownId(FileId),

    #[error("saving {locator} failed: {message}")]
    Save { locator: String, message: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    pub fn validation(message: impl Into<String>) -> Self {
        ClientError::Validation(message.into())
    }

    /// True for failures that happened on the way to or from the service.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ClientError::Transport { .. }
                | ClientError::Status { .. }
                | ClientError::Decode { .. }
                | ClientError::Save { .. }
        )
    }

    /// True when the action was aborted before any request was issued.
    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_family_covers_status_and_decode() {
        let status = ClientError::Status {
            action: "delete",
            status: 404,
        };
        let decode = ClientError::Decode {
            action: "list",
            message: "expected value".to_string(),
        };
        assert!(status.is_transport());
        assert!(decode.is_transport());
        assert!(!ClientError::UnknownId(FileId::Int(3)).is_transport());
        assert!(!ClientError::validation("Please select a file").is_transport());
    }

    #[test]
    fn display_messages() {
        let err = ClientError::Status {
            action: "rename",
            status: 500,
        };
        assert_eq!(err.to_string(), "rename request returned HTTP 500");
        assert_eq!(
            ClientError::UnknownId(FileId::Text("abc".into())).to_string(),
            "no file with id abc in the local list"
        );
        assert_eq!(
            ClientError::validation("Please select a file").to_string(),
            "Please select a file"
        );
    }
}
