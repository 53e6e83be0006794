//! # Actions
//!
//! Everything that can happen in mentorchat becomes an `Action`.
//! User presses Enter? That's `Action::Submit(text)`.
//! Gemini responds? That's `Action::GenerationFinished { .. }`.
//!
//! `update()` applies an action to the [`App`] and returns an [`Effect`] the
//! adapter must carry out. No I/O happens here; the network call travels out
//! as `Effect::Generate` and comes back as another action.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use log::{debug, warn};

use crate::core::pipeline::GenerationTicket;
use crate::core::session::{GenerationJob, ScrollMetrics};
use crate::core::state::App;
use crate::inference::ProviderError;

#[derive(Debug)]
pub enum Action {
    // Picker
    SelectNext,
    SelectPrev,
    OpenSelected,
    OpenMentor(String),

    // Chat
    InputChanged(String),
    Submit(String),
    Clear,
    ToggleSound,
    Scrolled(ScrollMetrics),
    GenerationFinished {
        ticket: GenerationTicket,
        result: Result<String, ProviderError>,
    },
    CloseSession,

    Quit,
}

#[derive(Debug)]
pub enum Effect {
    None,
    /// Run this job off the UI thread and feed the result back as `GenerationFinished`.
    Generate(GenerationJob),
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Quit => {
            app.close_session();
            return Effect::Quit;
        }
        Action::SelectNext => app.select_next(),
        Action::SelectPrev => app.select_prev(),
        Action::OpenSelected => {
            let id = app.selected_persona().id;
            open(app, id);
        }
        Action::OpenMentor(id) => open(app, &id),
        Action::CloseSession => app.close_session(),
        chat_action => {
            let Some(session) = app.session.as_mut() else {
                debug!("No open session, ignoring {:?}", chat_action);
                return Effect::None;
            };
            match chat_action {
                Action::InputChanged(text) => session.set_input(&text),
                Action::Submit(text) => match session.submit(&text) {
                    Ok(job) => return Effect::Generate(job),
                    Err(e) if e.is_silent() => debug!("Submit ignored: {}", e),
                    Err(e) => {
                        warn!("Submit rejected: {}", e);
                        app.status_message = e.to_string();
                    }
                },
                Action::Clear => session.clear(),
                Action::ToggleSound => {
                    session.toggle_sound();
                }
                Action::Scrolled(metrics) => session.update_scroll(metrics),
                Action::GenerationFinished { ticket, result } => {
                    session.complete(ticket, result);
                }
                _ => {}
            }
        }
    }
    Effect::None
}

fn open(app: &mut App, mentor_id: &str) {
    if let Err(e) = app.open_mentor(mentor_id) {
        warn!("Could not open chat: {}", e);
        app.status_message = e.to_string();
    }
}
