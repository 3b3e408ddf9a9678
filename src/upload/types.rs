use crate::upload::error::ShareError;
use crate::upload::progress::UploadProgress;
use bytes::Bytes;
use serde::Serialize;
use std::path::PathBuf;

/// What the user picked, before its content has been read.
#[derive(Debug, Clone)]
pub enum SelectedFile {
    Path(PathBuf),
    InMemory { name: String, content: Bytes },
}

impl SelectedFile {
    pub fn display_name(&self) -> String {
        match self {
            SelectedFile::Path(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string()),
            SelectedFile::InMemory { name, .. } => name.clone(),
        }
    }

    /// Known size without touching the disk, if any.
    pub fn known_size(&self) -> Option<u64> {
        match self {
            SelectedFile::Path(_) => None,
            SelectedFile::InMemory { content, .. } => Some(content.len() as u64),
        }
    }

    pub async fn load(self) -> Result<PendingSelection, ShareError> {
        let name = self.display_name();
        match self {
            SelectedFile::InMemory { content, .. } => Ok(PendingSelection { name, content }),
            SelectedFile::Path(path) => match tokio::fs::read(&path).await {
                Ok(content) => Ok(PendingSelection {
                    name,
                    content: Bytes::from(content),
                }),
                Err(e) => Err(ShareError::FileRead {
                    name,
                    detail: e.to_string(),
                }),
            },
        }
    }
}

/// A file whose content is in memory and ready to be sent.
#[derive(Debug, Clone)]
pub struct PendingSelection {
    pub name: String,
    pub content: Bytes,
}

impl PendingSelection {
    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareResult {
    pub link: String,
    pub identifier: String,
}

/// Body of the email endpoint. Only constructible from a [`ShareResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailRequest {
    #[serde(rename = "uuid")]
    pub identifier: String,
    #[serde(rename = "emailFrom")]
    pub sender_address: String,
    #[serde(rename = "emailTo")]
    pub receiver_address: String,
}

impl EmailRequest {
    pub fn new(share: &ShareResult, sender_address: &str, receiver_address: &str) -> Self {
        Self {
            identifier: share.identifier.clone(),
            sender_address: sender_address.to_string(),
            receiver_address: receiver_address.to_string(),
        }
    }
}

/// Messages from an upload task back to the controller. All `Progress`
/// events of a session arrive before its single `Finished`.
#[derive(Debug)]
pub enum UploadEvent {
    Progress(UploadProgress),
    Finished(Result<ShareResult, ShareError>),
}
