//! System clipboard access through arboard.
//!
//! The handle is opened on first use so a headless session only fails when
//! `copy` or `paste` is actually requested. It is then kept for the rest of
//! the session: on X11 the copied text lives as long as the handle does.

use recall_core::chat::io::Clipboard;
use recall_types::error::ClipboardError;

#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&mut self) -> Result<&mut arboard::Clipboard, ClipboardError> {
        if self.inner.is_none() {
            let clipboard = arboard::Clipboard::new().map_err(to_clipboard_error)?;
            self.inner = Some(clipboard);
        }
        self.inner
            .as_mut()
            .ok_or_else(|| ClipboardError("clipboard unavailable".to_string()))
    }
}

impl Clipboard for SystemClipboard {
    fn copy(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.handle()?
            .set_text(text.to_string())
            .map_err(to_clipboard_error)
    }

    fn paste(&mut self) -> Result<String, ClipboardError> {
        match self.handle()?.get_text() {
            Ok(text) => Ok(text),
            // An empty clipboard pastes nothing.
            Err(arboard::Error::ContentNotAvailable) => Ok(String::new()),
            Err(e) => Err(to_clipboard_error(e)),
        }
    }
}

fn to_clipboard_error(err: arboard::Error) -> ClipboardError {
    ClipboardError(err.to_string())
}
