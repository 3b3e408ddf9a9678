mod client;
mod error;
mod progress;
mod types;

pub use client::ShareClient;
pub use error::{ShareError, COPY_TOAST_LIFETIME};
pub use progress::UploadSession;
pub use types::{EmailRequest, SelectedFile, ShareResult, UploadEvent};
