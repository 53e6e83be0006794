//! # Application State
//!
//! Host shell state: which mentor the picker points at, and the chat that is
//! open (if any). Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── deps: SessionDeps            // provider, sounds, notices shared by every chat
//! ├── selected: usize              // picker cursor into persona::all()
//! ├── session: Option<ChatSession> // None = picker screen
//! └── status_message: String       // status bar text
//! ```
//!
//! State changes only happen through `update(app, action)` in action.rs.

use log::info;

use crate::core::error::ChatError;
use crate::core::persona::{self, Persona};
use crate::core::session::{ChatSession, SessionDeps};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Picker,
    Chat,
}

pub struct App {
    pub deps: SessionDeps,
    pub selected: usize,
    pub session: Option<ChatSession>,
    pub status_message: String,
}

impl App {
    /// Start on the picker with `default_mentor` highlighted (first mentor if unknown).
    pub fn new(deps: SessionDeps, default_mentor: &str) -> Self {
        let selected = persona::all()
            .iter()
            .position(|p| p.id == default_mentor)
            .unwrap_or(0);
        Self {
            deps,
            selected,
            session: None,
            status_message: String::from("Choose a mentor"),
        }
    }

    pub fn screen(&self) -> Screen {
        if self.session.is_some() {
            Screen::Chat
        } else {
            Screen::Picker
        }
    }

    pub fn mentors(&self) -> &'static [Persona] {
        persona::all()
    }

    pub fn selected_persona(&self) -> &'static Persona {
        &persona::all()[self.selected.min(persona::all().len() - 1)]
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % persona::all().len();
    }

    pub fn select_prev(&mut self) {
        let len = persona::all().len();
        self.selected = (self.selected + len - 1) % len;
    }

    /// Open a chat with `mentor_id`, closing any chat already open.
    pub fn open_mentor(&mut self, mentor_id: &str) -> Result<(), ChatError> {
        let session = ChatSession::open_by_id(mentor_id, self.deps.clone())?;
        if let Some(index) = persona::all().iter().position(|p| p.id == mentor_id) {
            self.selected = index;
        }
        self.close_session();
        self.status_message = format!("Chatting with {}", session.persona().name);
        self.session = Some(session);
        Ok(())
    }

    pub fn close_session(&mut self) {
        if let Some(session) = self.session.take() {
            info!("Back to picker from {}", session.persona().id);
            session.close();
            self.status_message = String::from("Choose a mentor");
        }
    }
}
