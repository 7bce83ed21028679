//! The one status line every console action reports through.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
}

impl MessageKind {
    pub fn glyph(&self) -> Option<&'static str> {
        match self {
            MessageKind::Info => None,
            MessageKind::Success => Some("✓"),
            MessageKind::Warning => Some("⚠"),
            MessageKind::Error => Some("✗"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: MessageKind,
    pub text: String,
}

impl StatusMessage {
    pub fn new(kind: MessageKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(MessageKind::Info, text)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(MessageKind::Success, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(MessageKind::Warning, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(MessageKind::Error, text)
    }

    pub fn is_error(&self) -> bool {
        self.kind == MessageKind::Error
    }

    pub fn is_success(&self) -> bool {
        self.kind == MessageKind::Success
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind.glyph() {
            Some(glyph) => write!(f, "{} {}", glyph, self.text),
            None => f.write_str(&self.text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyphs() {
        assert_eq!(StatusMessage::success("Service is running").to_string(), "✓ Service is running");
        assert_eq!(StatusMessage::error("Invalid JSON format").to_string(), "✗ Invalid JSON format");
        assert_eq!(
            StatusMessage::warning("API not responding").to_string(),
            "⚠ API not responding"
        );
        assert_eq!(StatusMessage::info("Checking model...").to_string(), "Checking model...");
    }
}
