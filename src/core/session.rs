//! # Chat Session Controller
//!
//! One open chat with one mentor. Wires the [`MessagePipeline`] to the shared
//! sound notifier, the notification sink and the generative provider, and
//! tells observers whenever the visible state changes.
//!
//! ```text
//! ChatSession
//! ├── pipeline: MessagePipeline            // messages, draft, in-flight guard
//! ├── provider: Arc<dyn GenerativeProvider>
//! ├── sounds: Arc<SoundNotifier>           // shared by every session
//! ├── notices: Arc<dyn NotificationSink>
//! ├── observers: Vec<(id, callback)>       // called with a snapshot on change
//! └── show_scroll_button: bool             // derived from ScrollMetrics
//! ```
//!
//! The external call is not made here. `submit` returns a [`GenerationJob`]
//! that the caller runs wherever it likes (a tokio task in the TUI, inline in
//! `send`) and feeds back through `complete`.

use std::fmt;
use std::sync::Arc;

use log::{debug, info, warn};

use crate::core::error::ChatError;
use crate::core::notice::{Notice, NotificationSink};
use crate::core::persona::{self, Persona};
use crate::core::pipeline::{GenerationTicket, MessagePipeline, Resolution, SessionState};
use crate::core::sound::{Cue, SoundNotifier};
use crate::inference::{GenerationRequest, GenerativeProvider, ProviderError};

/// Distance from the bottom, in the renderer's units, that still counts as "at the bottom".
pub const NEAR_BOTTOM_THRESHOLD: u16 = 100;

/// Collaborators a session is built from. Cheap to clone.
#[derive(Clone)]
pub struct SessionDeps {
    pub provider: Arc<dyn GenerativeProvider>,
    pub model: String,
    pub sounds: Arc<SoundNotifier>,
    pub notices: Arc<dyn NotificationSink>,
    pub scroll_threshold: u16,
}

/// Scroll position of the rendered message list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollMetrics {
    pub offset: u16,
    pub content_height: u16,
    pub viewport_height: u16,
}

impl ScrollMetrics {
    pub fn is_near_bottom(&self, threshold: u16) -> bool {
        let remaining = i32::from(self.content_height)
            - i32::from(self.offset)
            - i32::from(self.viewport_height);
        remaining < i32::from(threshold)
    }
}

/// Read-only view of a session handed to observers and renderers.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub mentor_id: &'static str,
    pub state: SessionState,
    pub show_scroll_button: bool,
    pub sound_enabled: bool,
}

pub type SubscriptionId = u64;
type Observer = Box<dyn FnMut(&SessionSnapshot)>;

/// One pending call to the generative provider.
pub struct GenerationJob {
    provider: Arc<dyn GenerativeProvider>,
    model: String,
    pub ticket: GenerationTicket,
}

impl GenerationJob {
    /// Perform the external call. Exactly one attempt, no retry.
    pub async fn run(self) -> (GenerationTicket, Result<String, ProviderError>) {
        let request = GenerationRequest {
            prompt: &self.ticket.prompt,
            model: &self.model,
        };
        let result = self.provider.generate(request).await;
        if let Err(e) = &result {
            warn!("Generation via {} failed: {}", self.provider.name(), e);
        }
        (self.ticket, result)
    }
}

impl fmt::Debug for GenerationJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationJob")
            .field("provider", &self.provider.name())
            .field("model", &self.model)
            .field("generation", &self.ticket.generation)
            .finish()
    }
}

pub struct ChatSession {
    id: String,
    pipeline: MessagePipeline,
    provider: Arc<dyn GenerativeProvider>,
    model: String,
    sounds: Arc<SoundNotifier>,
    notices: Arc<dyn NotificationSink>,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: SubscriptionId,
    show_scroll_button: bool,
    scroll_threshold: u16,
    focus_requested: bool,
}

impl ChatSession {
    /// Open a chat with `persona`, seeded with its welcome message.
    ///
    /// A missing credential is reported once here and blocks input for the
    /// lifetime of the session.
    pub fn open(persona: &'static Persona, deps: SessionDeps) -> Self {
        let id = uuid::Uuid::new_v4().to_string();
        let configured = deps.provider.is_configured();
        info!(
            "Opening session {} with {} (provider={}, configured={})",
            id,
            persona.id,
            deps.provider.name(),
            configured
        );

        if !configured {
            deps.notices.notify(Notice::configuration_missing());
        }

        Self {
            pipeline: MessagePipeline::new(id.clone(), persona, !configured),
            id,
            provider: deps.provider,
            model: deps.model,
            sounds: deps.sounds,
            notices: deps.notices,
            observers: Vec::new(),
            next_subscription: 0,
            show_scroll_button: false,
            scroll_threshold: deps.scroll_threshold,
            focus_requested: true,
        }
    }

    pub fn open_by_id(mentor_id: &str, deps: SessionDeps) -> Result<Self, ChatError> {
        let persona =
            persona::lookup(mentor_id).ok_or_else(|| ChatError::UnknownMentor(mentor_id.to_string()))?;
        Ok(Self::open(persona, deps))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn persona(&self) -> &'static Persona {
        self.pipeline.persona()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn state(&self) -> &SessionState {
        self.pipeline.state()
    }

    pub fn show_scroll_button(&self) -> bool {
        self.show_scroll_button
    }

    pub fn sound_enabled(&self) -> bool {
        self.sounds.is_enabled()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id.clone(),
            mentor_id: self.persona().id,
            state: self.state().clone(),
            show_scroll_button: self.show_scroll_button,
            sound_enabled: self.sound_enabled(),
        }
    }

    /// Returns true once after opening; the UI uses it to focus the input.
    pub fn take_focus_request(&mut self) -> bool {
        std::mem::take(&mut self.focus_requested)
    }

    pub fn set_input(&mut self, text: &str) {
        self.pipeline.set_pending_input(text);
        self.emit();
    }

    /// Submit `text`. On success the user message is already visible and the
    /// returned job must be run and passed back to [`complete`](Self::complete).
    pub fn submit(&mut self, text: &str) -> Result<GenerationJob, ChatError> {
        if !self.state().configuration_error && !self.provider.is_configured() {
            warn!("Provider {} lost its credential", self.provider.name());
            self.pipeline.set_configuration_error(true);
            self.emit();
        }

        let ticket = self.pipeline.submit(text)?;
        self.sounds.play(Cue::Send);
        self.emit();

        Ok(GenerationJob {
            provider: self.provider.clone(),
            model: self.model.clone(),
            ticket,
        })
    }

    /// Submit whatever is in the draft.
    pub fn submit_pending(&mut self) -> Result<GenerationJob, ChatError> {
        let text = self.state().pending_input.clone();
        self.submit(&text)
    }

    /// Bring a finished call back into the session.
    pub fn complete(
        &mut self,
        ticket: GenerationTicket,
        result: Result<String, ProviderError>,
    ) -> Resolution {
        let resolution = self.pipeline.resolve(&ticket, result);
        match &resolution {
            Resolution::Replied => self.sounds.play(Cue::Receive),
            Resolution::Failed(e) => self.notices.notify(Notice::generation_failed(&e.to_string())),
            Resolution::Stale => debug!("Ignored stale generation {}", ticket.generation),
        }
        self.emit();
        resolution
    }

    /// Submit, wait for the reply, and apply it.
    pub async fn send(&mut self, text: &str) -> Result<(), ChatError> {
        let job = self.submit(text)?;
        let (ticket, result) = job.run().await;
        match self.complete(ticket, result) {
            Resolution::Failed(e) => Err(e),
            Resolution::Replied | Resolution::Stale => Ok(()),
        }
    }

    pub fn clear(&mut self) {
        self.pipeline.clear();
        self.show_scroll_button = false;
        self.notices.notify(Notice::chat_cleared());
        self.emit();
    }

    /// Flip the shared sound setting. Returns the new state.
    pub fn toggle_sound(&mut self) -> bool {
        let enabled = self.sounds.toggle();
        self.notices.notify(Notice::sound_toggled(enabled));
        self.emit();
        enabled
    }

    pub fn update_scroll(&mut self, metrics: ScrollMetrics) {
        let show = !metrics.is_near_bottom(self.scroll_threshold);
        if show != self.show_scroll_button {
            self.show_scroll_button = show;
            self.emit();
        }
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&SessionSnapshot) + 'static) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    /// End the session. Listeners are detached and nothing is kept.
    pub fn close(mut self) {
        info!("Closing session {} ({} messages)", self.id, self.state().messages.len());
        self.observers.clear();
    }

    fn emit(&mut self) {
        if self.observers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for (_, observer) in &mut self.observers {
            observer(&snapshot);
        }
    }
}
