use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub expires_at: Instant,
}

impl Toast {
    pub fn new(message: impl Into<String>, now: Instant, lifetime: Duration) -> Self {
        Self {
            message: message.into(),
            expires_at: now + lifetime,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// One slot per notification kind; a new toast replaces the one showing.
#[derive(Debug, Default)]
pub struct ToastBoard {
    pub error: Option<Toast>,
    pub confirmation: Option<Toast>,
}

impl ToastBoard {
    pub fn show_error(&mut self, message: impl Into<String>, now: Instant, lifetime: Duration) {
        self.error = Some(Toast::new(message, now, lifetime));
    }

    pub fn show_confirmation(
        &mut self,
        message: impl Into<String>,
        now: Instant,
        lifetime: Duration,
    ) {
        self.confirmation = Some(Toast::new(message, now, lifetime));
    }

    /// Drops expired toasts. Returns whether anything was removed.
    pub fn expire(&mut self, now: Instant) -> bool {
        let mut changed = false;
        for slot in [&mut self.error, &mut self.confirmation] {
            if slot.as_ref().is_some_and(|t| t.is_expired(now)) {
                *slot = None;
                changed = true;
            }
        }
        changed
    }

    pub fn is_empty(&self) -> bool {
        self.error.is_none() && self.confirmation.is_none()
    }

    /// Time until the next toast disappears, for scheduling a repaint.
    pub fn next_expiry(&self, now: Instant) -> Option<Duration> {
        [&self.error, &self.confirmation]
            .into_iter()
            .flatten()
            .map(|t| t.expires_at.saturating_duration_since(now))
            .min()
    }
}
