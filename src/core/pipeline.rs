//! # Message Pipeline
//!
//! Owns the message list of one open chat and turns a submitted string into
//! state changes. The external call itself happens outside: `submit` hands out
//! a [`GenerationTicket`], and the caller brings the result back to `resolve`.
//!
//! ```text
//! submit(text) ──▶ user message appended, awaiting = true ──▶ ticket
//!                                                                │
//!                                       provider.generate(prompt)│
//!                                                                ▼
//! resolve(ticket, result) ──▶ awaiting = false
//!     ├─ stale generation ─▶ dropped
//!     ├─ Ok(text)         ─▶ assistant message appended
//!     └─ Err(e)           ─▶ nothing appended, error returned
//! ```
//!
//! Each `clear()` bumps a generation counter. A ticket from an earlier
//! generation resolves as `Stale`, so a reply to a conversation the user has
//! already wiped never shows up in the fresh one.

use log::{debug, info};

use crate::core::error::ChatError;
use crate::core::message::{Message, Role};
use crate::core::persona::{self, Persona};
use crate::inference::ProviderError;

/// Longest draft, in characters, a user can submit.
pub const MAX_INPUT_CHARS: usize = 500;

/// Assemble the prompt sent to the model. Pure and deterministic.
pub fn build_prompt(mentor_id: &str, user_text: &str) -> String {
    let template = persona::lookup(mentor_id).map(|p| p.template).unwrap_or_default();
    format!("Act strictly as {mentor_id}\n{template}\n\nInput: {user_text}\nOutput:")
}

/// Cut `text` down to at most `MAX_INPUT_CHARS` characters.
pub fn truncate_input(text: &str) -> &str {
    match text.char_indices().nth(MAX_INPUT_CHARS) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub messages: Vec<Message>,
    pub pending_input: String,
    pub is_awaiting_response: bool,
    pub configuration_error: bool,
}

/// Proof of one in-flight request. Carries the prompt to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationTicket {
    pub session_id: String,
    pub generation: u64,
    pub prompt: String,
}

/// What `resolve` did with a result.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Assistant message appended.
    Replied,
    /// The call failed; the user message stays, no assistant message.
    Failed(ChatError),
    /// The ticket predates a clear (or belongs to another session) and was dropped.
    Stale,
}

pub struct MessagePipeline {
    session_id: String,
    persona: &'static Persona,
    state: SessionState,
    generation: u64,
}

impl MessagePipeline {
    /// New pipeline seeded with the persona's welcome message.
    pub fn new(session_id: String, persona: &'static Persona, configuration_error: bool) -> Self {
        Self {
            session_id,
            persona,
            state: SessionState {
                messages: vec![Message::assistant(persona.welcome)],
                pending_input: String::new(),
                is_awaiting_response: false,
                configuration_error,
            },
            generation: 0,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn persona(&self) -> &'static Persona {
        self.persona
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn set_configuration_error(&mut self, value: bool) {
        self.state.configuration_error = value;
    }

    /// Store the draft, truncated to `MAX_INPUT_CHARS`.
    pub fn set_pending_input(&mut self, text: &str) {
        self.state.pending_input = truncate_input(text).to_string();
    }

    /// Append the user's message and hand back a ticket for the external call.
    pub fn submit(&mut self, text: &str) -> Result<GenerationTicket, ChatError> {
        let text = truncate_input(text).trim();
        if text.is_empty() {
            return Err(ChatError::EmptyInput);
        }
        if self.state.configuration_error {
            return Err(ChatError::Configuration);
        }
        if self.state.is_awaiting_response {
            debug!("Submit rejected: response already pending");
            return Err(ChatError::Busy);
        }

        self.state.messages.push(Message::user(text));
        self.state.pending_input.clear();
        self.state.is_awaiting_response = true;

        info!(
            "Submitted message to {} (generation={}, len={})",
            self.persona.id,
            self.generation,
            text.len()
        );

        Ok(GenerationTicket {
            session_id: self.session_id.clone(),
            generation: self.generation,
            prompt: build_prompt(self.persona.id, text),
        })
    }

    /// Apply the outcome of the call started by `ticket`.
    pub fn resolve(
        &mut self,
        ticket: &GenerationTicket,
        result: Result<String, ProviderError>,
    ) -> Resolution {
        if ticket.session_id != self.session_id {
            debug!("Dropping result for session {}", ticket.session_id);
            return Resolution::Stale;
        }

        // Only one request exists at a time, so whatever resolves was it.
        self.state.is_awaiting_response = false;

        if ticket.generation != self.generation {
            info!(
                "Dropping stale result (ticket generation={}, current={})",
                ticket.generation, self.generation
            );
            return Resolution::Stale;
        }

        match result {
            Ok(text) => {
                self.state.messages.push(Message::assistant(text));
                Resolution::Replied
            }
            Err(e) => Resolution::Failed(ChatError::Generation(e)),
        }
    }

    /// Reset to the welcome message. Safe at any time, including mid-flight.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.state.messages = vec![Message::assistant(self.persona.welcome)];
        self.state.pending_input.clear();
    }

    pub fn message_count(&self, role: Role) -> usize {
        self.state.messages.iter().filter(|m| m.role == role).count()
    }
}
