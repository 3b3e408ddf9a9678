/// One byte-level progress report from the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadProgress {
    pub bytes_sent: u64,
    pub bytes_total: u64,
}

impl UploadProgress {
    /// Rounded percentage, or `None` when the total is not computable.
    pub fn percent(&self) -> Option<u8> {
        if self.bytes_total == 0 {
            return None;
        }
        let sent = self.bytes_sent.min(self.bytes_total) as u128;
        let total = self.bytes_total as u128;
        // round half up, integer only
        Some(((sent * 100 + total / 2) / total) as u8)
    }
}

/// Tracking state of the one in-flight transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSession {
    pub file_name: String,
    pub bytes_sent: u64,
    pub bytes_total: Option<u64>,
    pub percent: u8,
}

impl UploadSession {
    pub fn new(file_name: String, bytes_total: Option<u64>) -> Self {
        Self {
            file_name,
            bytes_sent: 0,
            bytes_total,
            percent: 0,
        }
    }

    /// Applies a progress report. Returns whether the displayed percent
    /// changed. Reports without a total are ignored and the percent never
    /// goes down.
    pub fn apply(&mut self, progress: UploadProgress) -> bool {
        let Some(percent) = progress.percent() else {
            return false;
        };
        self.bytes_sent = progress.bytes_sent;
        self.bytes_total = Some(progress.bytes_total);
        if percent > self.percent {
            self.percent = percent;
            true
        } else {
            false
        }
    }

    /// The server accepted the file: show it fully sent, even when no
    /// report ever arrived (empty files).
    pub fn complete(&mut self) {
        if let Some(total) = self.bytes_total {
            self.bytes_sent = total;
        }
        self.percent = 100;
    }

    pub fn fraction(&self) -> f32 {
        f32::from(self.percent) / 100.0
    }
}
