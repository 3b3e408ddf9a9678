/// Anything that can take text for the user to paste elsewhere.
pub trait Clipboard {
    fn copy_text(&mut self, text: &str) -> Result<(), String>;
}

/// The OS clipboard. The handle is kept alive so the copied text survives
/// on platforms where the owner must stay around.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl Clipboard for SystemClipboard {
    fn copy_text(&mut self, text: &str) -> Result<(), String> {
        if self.inner.is_none() {
            self.inner = Some(arboard::Clipboard::new().map_err(|e| e.to_string())?);
        }
        match self.inner.as_mut() {
            Some(clipboard) => clipboard.set_text(text).map_err(|e| e.to_string()),
            None => Err("clipboard unavailable".to_string()),
        }
    }
}
