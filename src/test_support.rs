//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::core::notice::{Notice, NotificationSink};
use crate::core::session::{ChatSession, SessionDeps};
use crate::core::sound::{AudioBackend, AudioHandle, CueSources, PlaybackError, SoundNotifier};
use crate::inference::{GenerationRequest, GenerativeProvider, ProviderError};

/// Provider that answers from a queue and counts calls.
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<String, ProviderError>>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
    configured: AtomicBool,
}

impl ScriptedProvider {
    pub fn scripted(replies: Vec<Result<String, ProviderError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            configured: AtomicBool::new(true),
        })
    }

    pub fn replying<'a>(replies: impl IntoIterator<Item = &'a str>) -> Arc<Self> {
        Self::scripted(replies.into_iter().map(|r| Ok(r.to_string())).collect())
    }

    pub fn unconfigured() -> Arc<Self> {
        let provider = Self::scripted(Vec::new());
        provider.set_configured(false);
        provider
    }

    pub fn set_configured(&self, value: bool) {
        self.configured.store(value, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerativeProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn is_configured(&self) -> bool {
        self.configured.load(Ordering::SeqCst)
    }

    async fn generate(&self, request: GenerationRequest<'_>) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(request.prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::EmptyResponse("script exhausted".into())))
    }
}

/// Sink that keeps every notice it receives.
#[derive(Default, Clone)]
pub struct RecordingSink {
    pub notices: Arc<Mutex<Vec<Notice>>>,
}

impl NotificationSink for RecordingSink {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

/// Audio backend that records loads and plays instead of making noise.
#[derive(Default)]
pub struct RecordingBackend {
    pub played: Arc<Mutex<Vec<(PathBuf, f32)>>>,
    pub loads: Arc<Mutex<usize>>,
    pub missing: Vec<PathBuf>,
    pub fail_play: bool,
}

impl AudioBackend for RecordingBackend {
    fn load(&self, path: &Path) -> Result<AudioHandle, PlaybackError> {
        *self.loads.lock().unwrap() += 1;
        if self.missing.iter().any(|m| m == path) {
            return Err(PlaybackError::Load {
                path: path.to_path_buf(),
                reason: "not found".into(),
            });
        }
        Ok(AudioHandle {
            path: path.to_path_buf(),
        })
    }

    fn play(&self, handle: &AudioHandle, volume: f32) -> Result<(), PlaybackError> {
        if self.fail_play {
            return Err(PlaybackError::Play("device busy".into()));
        }
        self.played.lock().unwrap().push((handle.path.clone(), volume));
        Ok(())
    }
}

pub fn test_sources() -> CueSources {
    CueSources {
        send: PathBuf::from("send.mp3"),
        receive: PathBuf::from("receive.mp3"),
    }
}

/// Fakes for every session collaborator, with accessors for what they saw.
pub struct TestHarness {
    pub provider: Arc<ScriptedProvider>,
    pub sink: RecordingSink,
    pub sounds: Arc<SoundNotifier>,
    played: Arc<Mutex<Vec<(PathBuf, f32)>>>,
}

impl TestHarness {
    pub fn new(provider: Arc<ScriptedProvider>) -> Self {
        let backend = RecordingBackend::default();
        let played = backend.played.clone();
        Self {
            provider,
            sink: RecordingSink::default(),
            sounds: Arc::new(SoundNotifier::new(Box::new(backend), test_sources(), 0.3, true)),
            played,
        }
    }

    pub fn deps(&self) -> SessionDeps {
        SessionDeps {
            provider: self.provider.clone(),
            model: "test-model".to_string(),
            sounds: self.sounds.clone(),
            notices: Arc::new(self.sink.clone()),
            scroll_threshold: crate::core::session::NEAR_BOTTOM_THRESHOLD,
        }
    }

    pub fn open(&self, mentor_id: &str) -> ChatSession {
        ChatSession::open_by_id(mentor_id, self.deps()).unwrap()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.sink.notices.lock().unwrap().clone()
    }

    /// File names of the cues played so far, in order.
    pub fn cues_played(&self) -> Vec<String> {
        self.played
            .lock()
            .unwrap()
            .iter()
            .map(|(path, _)| path.display().to_string())
            .collect()
    }
}
