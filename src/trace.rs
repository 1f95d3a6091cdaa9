//! Debug trace
//!
//! Every encoding decision is appended to a per-encoder text buffer when the
//! debug level is above zero, and forwarded to `tracing` regardless. The
//! buffer can be read back, cleared, or rendered as an XML comment to embed
//! in a response.

use chrono::Local;

/// Append-only debug buffer
#[derive(Debug, Clone, Default)]
pub struct DebugLog {
    level: u8,
    title: String,
    buffer: String,
}

impl DebugLog {
    /// Create a log with a debug level (0 turns buffering off) and a title
    pub fn new(level: u8, title: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            buffer: String::new(),
        }
    }

    /// Empty log sharing this log's level and title
    pub fn child(&self) -> Self {
        Self::new(self.level, self.title.clone())
    }

    /// Get the debug level
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Set the debug level
    pub fn set_level(&mut self, level: u8) {
        self.level = level;
    }

    /// Check if buffering is on
    pub fn enabled(&self) -> bool {
        self.level > 0
    }

    /// Add a timestamped line
    pub fn debug(&mut self, message: impl AsRef<str>) {
        let message = message.as_ref();
        tracing::debug!(target: "soapenc", title = %self.title, "{}", message);
        if self.enabled() {
            let stamp = Local::now().format("%Y-%m-%d %H:%M:%S%.6f");
            self.buffer
                .push_str(&format!("{} {}: {}\n", stamp, self.title, message));
        }
    }

    /// Add raw text
    pub fn append(&mut self, text: impl AsRef<str>) {
        if self.enabled() {
            self.buffer.push_str(text.as_ref());
        }
    }

    /// Discard the buffered text
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Buffered text
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Take the buffered text, leaving the buffer empty
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.buffer)
    }

    /// Move a nested log's text into this one and clear the nested log
    pub fn absorb(&mut self, nested: &mut DebugLog) {
        self.append(nested.as_str());
        nested.clear();
    }

    /// Buffered text as an XML comment; `--` sequences are broken up so the
    /// comment stays well-formed
    pub fn as_xml_comment(&self) -> String {
        let mut text = self.buffer.clone();
        while text.contains("--") {
            text = text.replace("--", "- -");
        }
        format!("<!--\n{}\n-->", text)
    }
}
