use super::toast::ToastBoard;
use crate::upload::{ShareError, ShareResult, UploadSession};

pub const SEND_LABEL: &str = "📧 Send";
pub const SENDING_LABEL: &str = "Sending...";

/// Which panel the window shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ViewState {
    #[default]
    Idle,
    Uploading(UploadSession),
    Shared(ShareResult),
}

#[derive(Debug, Default)]
pub struct ShareState {
    pub view: ViewState,
    pub sender_email: String,
    pub receiver_email: String,
    pub email_in_flight: bool,
    pub drag_active: bool,
    pub toasts: ToastBoard,
    /// Blocking confirmation the user must dismiss.
    pub acknowledgment: Option<String>,
    pub last_error: Option<ShareError>,
}

impl ShareState {
    pub fn share_result(&self) -> Option<&ShareResult> {
        match &self.view {
            ViewState::Shared(share) => Some(share),
            _ => None,
        }
    }

    pub fn is_uploading(&self) -> bool {
        matches!(self.view, ViewState::Uploading(_))
    }

    pub fn is_busy(&self) -> bool {
        self.is_uploading() || self.email_in_flight
    }

    pub fn send_label(&self) -> &'static str {
        if self.email_in_flight {
            SENDING_LABEL
        } else {
            SEND_LABEL
        }
    }

    /// Back to the drop zone. Notifications keep their own lifecycle.
    pub fn clear(&mut self) {
        self.view = ViewState::Idle;
        self.sender_email.clear();
        self.receiver_email.clear();
    }
}
