//! User-facing notifications (toast banners in the TUI).

/// How loudly a notice should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notice {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Info,
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Destructive,
        }
    }

    pub fn configuration_missing() -> Self {
        Self::destructive(
            "API Key Not Configured",
            "Please add your Google Gemini API key (GOOGLE_GEMINI_API_KEY in .env or ~/.mentorchat/config.toml)",
        )
    }

    pub fn generation_failed(reason: &str) -> Self {
        Self::destructive("Error", reason)
    }

    pub fn chat_cleared() -> Self {
        Self::info("Chat cleared", "Your conversation has been reset.")
    }

    pub fn sound_toggled(enabled: bool) -> Self {
        if enabled {
            Self::info("Sound enabled", "Notification sounds are now on.")
        } else {
            Self::info("Sound disabled", "Notification sounds are now off.")
        }
    }
}

/// Receives notices emitted by a chat session. Rendering is up to the implementor.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Sink that only logs. Used by the headless `--ask` mode.
pub struct LogSink;

impl NotificationSink for LogSink {
    fn notify(&self, notice: Notice) {
        match notice.severity {
            Severity::Info => log::info!("{}: {}", notice.title, notice.description),
            Severity::Destructive => log::warn!("{}: {}", notice.title, notice.description),
        }
    }
}
