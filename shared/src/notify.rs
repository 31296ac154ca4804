use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl NotifyLevel {
    /// Unknown names fall back to `Info`.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "success" => Self::Success,
            "warning" | "warn" => Self::Warning,
            "error" | "danger" => Self::Error,
            _ => Self::Info,
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Self::Info => "toast-info",
            Self::Success => "toast-success",
            Self::Warning => "toast-warning",
            Self::Error => "toast-error",
        }
    }

    pub fn background(self) -> &'static str {
        match self {
            Self::Info => "#2563eb",
            Self::Success => "#16a34a",
            Self::Warning => "#d97706",
            Self::Error => "#dc2626",
        }
    }
}

/// A transient on-screen message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotifyLevel,
    pub message: String,
    pub timeout_ms: u32,
}

impl Notification {
    pub fn new(level: NotifyLevel, message: impl Into<String>, timeout_ms: u32) -> Self {
        Self {
            level,
            message: message.into(),
            timeout_ms,
        }
    }
}
