use super::state::{ShareState, ViewState};
use crate::upload::{
    EmailRequest, SelectedFile, ShareClient, ShareError, ShareResult, UploadEvent,
    UploadSession, COPY_TOAST_LIFETIME,
};
use crate::utils::clipboard::Clipboard;
use derivative::Derivative;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::{Duration, Instant};
use tokio::runtime::Handle;

pub const COPY_CONFIRMATION: &str = "Link copied!";
pub const EMAIL_SENT: &str = "Email sent successfully!";
const BUSY_REPAINT_INTERVAL: Duration = Duration::from_millis(100);
/// How long a finished upload stays on screen at 100% before the share panel.
const COMPLETION_HOLD: Duration = Duration::from_millis(300);

/// Owns the upload-and-share workflow. Lives on the UI thread; network work
/// runs on `runtime` and reports back through channels drained by [`poll`].
///
/// [`poll`]: ShareController::poll
#[derive(Derivative)]
#[derivative(Debug)]
pub struct ShareController {
    client: ShareClient,
    #[derivative(Debug = "ignore")]
    runtime: Handle,
    state: ShareState,
    #[derivative(Debug = "ignore")]
    upload_events: Option<Receiver<UploadEvent>>,
    #[derivative(Debug = "ignore")]
    email_events: Option<Receiver<Result<(), ShareError>>>,
    /// Share waiting out [`COMPLETION_HOLD`], with the instant it is revealed.
    completed_upload: Option<(ShareResult, Instant)>,
}

impl ShareController {
    pub fn new(client: ShareClient, runtime: Handle) -> Self {
        Self {
            client,
            runtime,
            state: ShareState::default(),
            upload_events: None,
            email_events: None,
            completed_upload: None,
        }
    }

    pub fn state(&self) -> &ShareState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ShareState {
        &mut self.state
    }

    /// Entry point for the browse dialog and drag-and-drop.
    pub fn select_files(&mut self, mut files: Vec<SelectedFile>) -> Result<(), ShareError> {
        match files.len() {
            0 => Ok(()),
            1 => {
                let file = files.remove(0);
                self.start_upload(file)
            }
            count => {
                tracing::debug!(count, "Rejecting multi-file selection");
                Err(self.fail(ShareError::MultiFile))
            }
        }
    }

    /// Shows a selection that failed before it could become a `SelectedFile`.
    pub fn reject_selection(&mut self, err: ShareError) {
        self.fail(err);
    }

    pub fn start_upload(&mut self, file: SelectedFile) -> Result<(), ShareError> {
        if self.state.is_uploading() {
            return Err(self.fail(ShareError::UploadInProgress));
        }

        let session = UploadSession::new(file.display_name(), file.known_size());
        tracing::info!(file = %session.file_name, "Starting upload");
        self.state.view = ViewState::Uploading(session);
        self.state.last_error = None;

        let (sender, receiver) = mpsc::channel();
        self.upload_events = Some(receiver);
        let client = self.client.clone();

        self.runtime.spawn(async move {
            let outcome = match file.load().await {
                Ok(selection) => {
                    let progress = sender.clone();
                    client
                        .upload(selection, move |p| {
                            let _ = progress.send(UploadEvent::Progress(p));
                        })
                        .await
                }
                Err(e) => Err(e),
            };
            // The receiver is gone if the user reset meanwhile
            let _ = sender.send(UploadEvent::Finished(outcome));
        });

        Ok(())
    }

    pub fn copy_link(&mut self, clipboard: &mut dyn Clipboard) -> Result<(), ShareError> {
        let Some(share) = self.state.share_result() else {
            return Err(self.fail(ShareError::NoUpload));
        };
        let link = share.link.clone();

        match clipboard.copy_text(&link) {
            Ok(()) => {
                self.state.toasts.show_confirmation(
                    COPY_CONFIRMATION,
                    Instant::now(),
                    COPY_TOAST_LIFETIME,
                );
                Ok(())
            }
            Err(detail) => Err(self.fail(ShareError::Clipboard { detail })),
        }
    }

    pub fn open_link(&mut self) -> Result<(), ShareError> {
        let Some(share) = self.state.share_result() else {
            return Err(self.fail(ShareError::NoUpload));
        };
        let link = share.link.clone();

        open::that(&link).map_err(|e| {
            self.fail(ShareError::OpenLink {
                detail: e.to_string(),
            })
        })
    }

    /// Emails the current link using the addresses typed into the form.
    pub fn send_email(&mut self) -> Result<(), ShareError> {
        let Some(share) = self.state.share_result().cloned() else {
            return Err(self.fail(ShareError::NoUpload));
        };
        let sender_address = self.state.sender_email.trim().to_string();
        let receiver_address = self.state.receiver_email.trim().to_string();
        if sender_address.is_empty() || receiver_address.is_empty() {
            return Err(self.fail(ShareError::MissingField));
        }
        if self.state.email_in_flight {
            return Err(self.fail(ShareError::EmailInProgress));
        }

        let request = EmailRequest::new(&share, &sender_address, &receiver_address);
        self.state.email_in_flight = true;

        let (sender, receiver) = mpsc::channel();
        self.email_events = Some(receiver);
        let client = self.client.clone();

        self.runtime.spawn(async move {
            let _ = sender.send(client.send_email(&request).await);
        });

        Ok(())
    }

    /// "Upload another". Safe to call in any state, any number of times.
    pub fn reset(&mut self) {
        if self.upload_events.take().is_some() {
            tracing::info!("Abandoning in-flight upload");
        }
        self.completed_upload = None;
        if self.email_events.take().is_some() {
            tracing::info!("Abandoning in-flight email");
        }
        self.state.email_in_flight = false;
        if !matches!(self.state.view, ViewState::Idle) {
            tracing::debug!("Resetting to idle");
        }
        self.state.clear();
    }

    pub fn dismiss_acknowledgment(&mut self) {
        self.state.acknowledgment = None;
    }

    /// Drains worker events and expires notifications. Returns whether the
    /// window needs repainting.
    pub fn poll(&mut self, now: Instant) -> bool {
        let mut changed = self.drain_upload_events(now);
        changed |= self.reveal_share(now);
        changed |= self.drain_email_events(now);
        changed |= self.state.toasts.expire(now);
        changed
    }

    /// How soon the window should repaint even without user input.
    pub fn repaint_after(&self, now: Instant) -> Option<Duration> {
        if self.state.is_busy() {
            return Some(BUSY_REPAINT_INTERVAL);
        }
        self.state.toasts.next_expiry(now)
    }

    fn drain_upload_events(&mut self, now: Instant) -> bool {
        let Some(receiver) = self.upload_events.take() else {
            return false;
        };

        let mut changed = false;
        loop {
            match receiver.try_recv() {
                Ok(UploadEvent::Progress(progress)) => {
                    if let ViewState::Uploading(session) = &mut self.state.view {
                        changed |= session.apply(progress);
                    }
                }
                // Dropping the receiver here discards anything sent after
                // the terminal event.
                Ok(UploadEvent::Finished(outcome)) => {
                    self.finish_upload(outcome, now);
                    return true;
                }
                Err(TryRecvError::Empty) => {
                    self.upload_events = Some(receiver);
                    return changed;
                }
                Err(TryRecvError::Disconnected) => {
                    self.finish_upload(
                        Err(ShareError::Transport {
                            detail: "upload worker stopped without reporting".to_string(),
                        }),
                        now,
                    );
                    return true;
                }
            }
        }
    }

    fn finish_upload(&mut self, outcome: Result<ShareResult, ShareError>, now: Instant) {
        match outcome {
            Ok(share) => {
                tracing::info!(
                    link = %share.link,
                    identifier = %share.identifier,
                    "File ready to share"
                );
                if let ViewState::Uploading(session) = &mut self.state.view {
                    session.complete();
                }
                // Revealed by a later poll, so 100% gets at least one frame
                self.completed_upload = Some((share, now + COMPLETION_HOLD));
            }
            Err(err) => {
                self.state.view = ViewState::Idle;
                self.fail_at(err, now);
            }
        }
    }

    fn reveal_share(&mut self, now: Instant) -> bool {
        let Some((share, reveal_at)) = self.completed_upload.take() else {
            return false;
        };
        if now < reveal_at {
            self.completed_upload = Some((share, reveal_at));
            return false;
        }
        self.state.view = ViewState::Shared(share);
        true
    }

    fn drain_email_events(&mut self, now: Instant) -> bool {
        let Some(receiver) = self.email_events.take() else {
            return false;
        };

        let outcome = match receiver.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => {
                self.email_events = Some(receiver);
                return false;
            }
            Err(TryRecvError::Disconnected) => Err(ShareError::EmailTransport {
                detail: "email worker stopped without reporting".to_string(),
            }),
        };

        self.state.email_in_flight = false;
        match outcome {
            Ok(()) => {
                self.state.last_error = None;
                self.state.acknowledgment = Some(EMAIL_SENT.to_string());
            }
            Err(err) => {
                self.fail_at(err, now);
            }
        }
        true
    }

    fn fail(&mut self, err: ShareError) -> ShareError {
        self.fail_at(err, Instant::now())
    }

    /// Logs the failure, shows it, and hands it back for the caller.
    fn fail_at(&mut self, err: ShareError, now: Instant) -> ShareError {
        tracing::warn!(error = ?err, "{}", err);
        self.state
            .toasts
            .show_error(err.to_string(), now, err.toast_lifetime());
        self.state.last_error = Some(err.clone());
        err
    }
}
