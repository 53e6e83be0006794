//! # Sound Notifier
//!
//! Best-effort audio feedback for sent and received messages. One instance is
//! shared by every session (`Arc<SoundNotifier>`). Nothing here can fail the
//! chat: load and playback errors are logged and swallowed.
//!
//! ```text
//! play(cue) ─▶ enabled? ─▶ bank loaded once (OnceLock) ─▶ handle? ─▶ backend.play
//!                 │                  │ load error                     │ error
//!                 ▼                  ▼                                ▼
//!               no-op          sound disabled                     warn!, no-op
//! ```

use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, warn};
use thiserror::Error;

pub const DEFAULT_VOLUME: f32 = 0.3;

/// Audio cue tied to a chat event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Send,
    Receive,
}

impl Cue {
    pub fn label(self) -> &'static str {
        match self {
            Cue::Send => "send",
            Cue::Receive => "receive",
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum PlaybackError {
    #[error("failed to load {path}: {reason}")]
    Load { path: PathBuf, reason: String },
    #[error("playback failed: {0}")]
    Play(String),
}

/// A loaded audio resource, ready to play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioHandle {
    pub path: PathBuf,
}

/// Platform audio capability.
pub trait AudioBackend: Send + Sync {
    fn load(&self, path: &Path) -> Result<AudioHandle, PlaybackError>;
    fn play(&self, handle: &AudioHandle, volume: f32) -> Result<(), PlaybackError>;
}

/// Where each cue's asset lives.
#[derive(Debug, Clone)]
pub struct CueSources {
    pub send: PathBuf,
    pub receive: PathBuf,
}

struct CueBank {
    send: Option<AudioHandle>,
    receive: Option<AudioHandle>,
}

impl CueBank {
    fn get(&self, cue: Cue) -> Option<&AudioHandle> {
        match cue {
            Cue::Send => self.send.as_ref(),
            Cue::Receive => self.receive.as_ref(),
        }
    }
}

pub struct SoundNotifier {
    backend: Box<dyn AudioBackend>,
    sources: CueSources,
    volume: f32,
    enabled: AtomicBool,
    bank: OnceLock<CueBank>,
}

impl SoundNotifier {
    pub fn new(backend: Box<dyn AudioBackend>, sources: CueSources, volume: f32, enabled: bool) -> Self {
        Self {
            backend,
            sources,
            volume: volume.clamp(0.0, 1.0),
            enabled: AtomicBool::new(enabled),
            bank: OnceLock::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Flip enabled/disabled. Returns the new state. Lives only as long as the process.
    pub fn toggle(&self) -> bool {
        let now = !self.enabled.fetch_xor(true, Ordering::Relaxed);
        debug!("Sound {}", if now { "enabled" } else { "disabled" });
        now
    }

    /// Load both cues now instead of on first `play`.
    pub fn preload(&self) {
        self.bank();
    }

    pub fn play(&self, cue: Cue) {
        if !self.is_enabled() {
            return;
        }
        let Some(handle) = self.bank().get(cue) else {
            debug!("No {} cue loaded, skipping", cue.label());
            return;
        };
        if let Err(e) = self.backend.play(handle, self.volume) {
            warn!("Could not play {} cue: {}", cue.label(), e);
        }
    }

    fn bank(&self) -> &CueBank {
        self.bank.get_or_init(|| CueBank {
            send: self.load_cue(Cue::Send, &self.sources.send),
            receive: self.load_cue(Cue::Receive, &self.sources.receive),
        })
    }

    fn load_cue(&self, cue: Cue, path: &Path) -> Option<AudioHandle> {
        match self.backend.load(path) {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!("Audio for {} cue failed to load, disabling sound: {}", cue.label(), e);
                self.enabled.store(false, Ordering::Relaxed);
                None
            }
        }
    }
}
