//! Clipboard integration behind narrow traits.
//!
//! The monitor and the CLI talk to [`TextSource`] and [`FragmentSink`], not
//! to the platform clipboard directly, so tests can script both sides
//! without a display server. [`SystemClipboard`] is the production
//! implementation of both traits on top of `arboard`.

use crate::error::TexClipError;
use tracing::debug;

/// Where input text comes from.
pub trait TextSource {
    /// Current plain-text content, or `None` when there is none (empty
    /// clipboard, non-text content, or a transient read failure).
    fn read_text(&mut self) -> Option<String>;
}

/// Where the composed HTML fragment goes.
pub trait FragmentSink {
    /// Install the fragment as rich-text content.
    fn write_html(&mut self, fragment: &str) -> Result<(), TexClipError>;
}

/// The platform clipboard, for both reading text and writing HTML.
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

impl SystemClipboard {
    pub fn new() -> Result<Self, TexClipError> {
        let inner = arboard::Clipboard::new().map_err(|e| TexClipError::Clipboard {
            detail: e.to_string(),
        })?;
        Ok(Self { inner })
    }
}

impl TextSource for SystemClipboard {
    fn read_text(&mut self) -> Option<String> {
        // Read failures here are routine (image content, empty clipboard)
        // and must not surface as errors to the polling loop.
        match self.inner.get_text() {
            Ok(text) if !text.is_empty() => Some(text),
            _ => None,
        }
    }
}

impl FragmentSink for SystemClipboard {
    fn write_html(&mut self, fragment: &str) -> Result<(), TexClipError> {
        if fragment.trim().is_empty() {
            return Err(TexClipError::EmptyFragment);
        }
        self.inner
            .set_html(fragment, None::<&str>)
            .map_err(|e| TexClipError::Clipboard {
                detail: e.to_string(),
            })?;
        debug!(bytes = fragment.len(), "HTML fragment installed on clipboard");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RecordingSink(Vec<String>);

    impl FragmentSink for RecordingSink {
        fn write_html(&mut self, fragment: &str) -> Result<(), TexClipError> {
            if fragment.trim().is_empty() {
                return Err(TexClipError::EmptyFragment);
            }
            self.0.push(fragment.to_string());
            Ok(())
        }
    }

    #[test]
    fn empty_fragment_refused_by_contract() {
        let mut sink = RecordingSink(Vec::new());
        assert!(matches!(
            sink.write_html("  \n "),
            Err(TexClipError::EmptyFragment)
        ));
        assert!(sink.0.is_empty());
    }
}
