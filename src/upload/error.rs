use std::time::Duration;
use thiserror::Error;

/// How long an error notification stays on screen.
pub const ERROR_TOAST_LIFETIME: Duration = Duration::from_millis(2000);
/// How long clipboard notifications (success or failure) stay on screen.
pub const COPY_TOAST_LIFETIME: Duration = Duration::from_millis(1500);

/// Every way a share operation can fail.
///
/// `Display` is the text shown to the user; the `detail` fields carry the
/// underlying cause for the logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShareError {
    #[error("Only single file allowed!")]
    MultiFile,

    #[error("An upload is already in progress!")]
    UploadInProgress,

    #[error("Could not read the selected file!")]
    FileRead { name: String, detail: String },

    #[error("Upload failed!")]
    UploadFailed { status: u16 },

    #[error("Invalid server response!")]
    InvalidResponse { detail: String },

    #[error("Server missing required fields!")]
    IncompleteResponse,

    #[error("Cannot connect to server! Please check your internet connection.")]
    Transport { detail: String },

    #[error("Upload timed out! Please try again.")]
    Timeout,

    #[error("Copy failed!")]
    Clipboard { detail: String },

    #[error("Upload file first!")]
    NoUpload,

    #[error("Enter both emails!")]
    MissingField,

    #[error("An email is already being sent!")]
    EmailInProgress,

    #[error("{0}")]
    EmailFailed(String),

    #[error("Server not responding! Please try again later.")]
    EmailTransport { detail: String },

    #[error("Could not open the link!")]
    OpenLink { detail: String },
}

impl ShareError {
    pub fn toast_lifetime(&self) -> Duration {
        match self {
            ShareError::Clipboard { .. } => COPY_TOAST_LIFETIME,
            _ => ERROR_TOAST_LIFETIME,
        }
    }

    pub(crate) fn from_upload_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ShareError::Timeout
        } else {
            ShareError::Transport {
                detail: err.to_string(),
            }
        }
    }

    pub(crate) fn from_email_transport(err: reqwest::Error) -> Self {
        ShareError::EmailTransport {
            detail: err.to_string(),
        }
    }
}
