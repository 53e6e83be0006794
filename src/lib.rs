//! mentorchat: chat with coding-mentor personas backed by Google Gemini.

use std::sync::Arc;

pub mod audio;
pub mod core;
pub mod inference;
pub mod tui;

#[cfg(test)]
pub mod test_support;

use crate::core::config::ResolvedConfig;
use crate::core::notice::NotificationSink;
use crate::core::session::SessionDeps;
use crate::inference::{GeminiProvider, GenerativeProvider};

/// Build the Gemini provider from resolved settings. A missing key still
/// yields a provider; it reports itself as unconfigured.
pub fn build_provider(config: &ResolvedConfig) -> Arc<dyn GenerativeProvider> {
    Arc::new(GeminiProvider::new(
        config.gemini_api_key.clone().unwrap_or_default(),
        Some(config.gemini_base_url.clone()),
        Some(config.timeout),
    ))
}

/// Everything a `ChatSession` needs, wired from config.
pub fn session_deps(config: &ResolvedConfig, notices: Arc<dyn NotificationSink>) -> SessionDeps {
    SessionDeps {
        provider: build_provider(config),
        model: config.gemini_model.clone(),
        sounds: Arc::new(audio::build_notifier(&config.sound)),
        notices,
        scroll_threshold: config.scroll_threshold,
    }
}
