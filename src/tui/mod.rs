//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! The event loop uses conditional redraw to avoid unnecessary work:
//!
//! - **Animating** (reply pending): draws every ~80ms for the typing spinner.
//! - **Idle**: sleeps up to 500ms, only redraws on events, session changes
//!   (observer callback), toast expiry or terminal resize.
//!
//! Generation runs on a tokio task. Its result comes back over an mpsc
//! channel as `Action::GenerationFinished` and goes through `update` like
//! any other action.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::cell::Cell;
use std::io::stdout;
use std::rc::Rc;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use ratatui::style::Color;

use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::session::GenerationJob;
use crate::core::state::{App, Screen};
use crate::session_deps;
use crate::tui::component::EventHandler;
use crate::tui::components::{InputBox, InputEvent, MessageListState, ToastQueue};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub message_list: MessageListState,
    pub input_box: InputBox,
    /// Shared with every session as its notification sink
    pub toast: ToastQueue,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new("", Color::Gray),
            toast: ToastQueue::new(),
        }
    }
}

/// Restores terminal modes on drop, including on panic unwinding.
struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol lets us tell Shift+Enter from Enter; terminals
        // without it ignore the escape sequence.
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

/// Event-loop plumbing shared by every dispatch.
struct Dispatcher {
    tx: mpsc::Sender<Action>,
    needs_redraw: Rc<Cell<bool>>,
}

impl Dispatcher {
    /// Apply `action` and carry out its effect. Returns true when the app should quit.
    fn dispatch(&self, app: &mut App, tui: &mut TuiState, action: Action) -> bool {
        let effect = update(app, action);
        self.attach_new_session(app, tui);
        match effect {
            Effect::Quit => return true,
            Effect::Generate(job) => {
                tui.input_box.clear();
                spawn_generation(job, self.tx.clone());
            }
            Effect::None => {}
        }
        false
    }

    /// Reset per-chat presentation state once for each newly opened session.
    fn attach_new_session(&self, app: &mut App, tui: &mut TuiState) {
        let Some(session) = app.session.as_mut() else {
            return;
        };
        if !session.take_focus_request() {
            return;
        }
        debug!("Attaching TUI to session {}", session.id());
        tui.message_list = MessageListState::new();
        tui.input_box.clear();
        let needs_redraw = self.needs_redraw.clone();
        session.subscribe(move |_| needs_redraw.set(true));
    }

    fn handle_event(&self, app: &mut App, tui: &mut TuiState, event: TuiEvent) -> bool {
        if matches!(event, TuiEvent::ForceQuit) {
            return self.dispatch(app, tui, Action::Quit);
        }

        match app.screen() {
            Screen::Picker => match event {
                TuiEvent::CursorUp => self.dispatch(app, tui, Action::SelectPrev),
                TuiEvent::CursorDown => self.dispatch(app, tui, Action::SelectNext),
                TuiEvent::Submit => self.dispatch(app, tui, Action::OpenSelected),
                TuiEvent::Escape => self.dispatch(app, tui, Action::Quit),
                _ => false,
            },
            Screen::Chat => match event {
                TuiEvent::Escape => self.dispatch(app, tui, Action::CloseSession),
                TuiEvent::ClearChat => {
                    tui.input_box.clear();
                    tui.message_list.scroll_to_bottom();
                    self.dispatch(app, tui, Action::Clear)
                }
                TuiEvent::ToggleSound => self.dispatch(app, tui, Action::ToggleSound),
                TuiEvent::ScrollUp
                | TuiEvent::ScrollDown
                | TuiEvent::ScrollPageUp
                | TuiEvent::ScrollPageDown
                | TuiEvent::ScrollToBottom
                | TuiEvent::CursorUp
                | TuiEvent::CursorDown => {
                    tui.message_list.handle_event(&event);
                    false
                }
                _ => match tui.input_box.handle_event(&event) {
                    Some(InputEvent::Submit(text)) => self.dispatch(app, tui, Action::Submit(text)),
                    Some(InputEvent::ContentChanged) => {
                        let text = tui.input_box.buffer.clone();
                        self.dispatch(app, tui, Action::InputChanged(text))
                    }
                    None => false,
                },
            },
        }
    }
}

/// Run the terminal UI until the user quits.
///
/// With `open_directly`, the chat with the configured default mentor opens
/// immediately instead of the picker.
pub fn run(config: ResolvedConfig, open_directly: bool) -> std::io::Result<()> {
    let mut tui = TuiState::new();
    let deps = session_deps(&config, Arc::new(tui.toast.clone()));
    let mut app = App::new(deps, &config.default_mentor);

    let (tx, rx) = mpsc::channel();
    let needs_redraw = Rc::new(Cell::new(true)); // Force first frame
    let dispatcher = Dispatcher {
        tx,
        needs_redraw: needs_redraw.clone(),
    };

    if open_directly {
        dispatcher.dispatch(&mut app, &mut tui, Action::OpenSelected);
    }

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    let start_time = Instant::now();
    let mut toast_visible = false;

    loop {
        let animating = app
            .session
            .as_ref()
            .is_some_and(|s| s.state().is_awaiting_response);
        if animating {
            needs_redraw.set(true);
        }

        let toast_now = tui.toast.current().is_some();
        if toast_now != toast_visible {
            toast_visible = toast_now;
            needs_redraw.set(true);
        }

        if needs_redraw.replace(false) {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;

            // The list knows its geometry only after drawing.
            if app.session.is_some() {
                let metrics = tui.message_list.metrics();
                dispatcher.dispatch(&mut app, &mut tui, Action::Scrolled(metrics));
            }
        }

        // Dynamic poll timeout: short when animating (~12fps), long when idle
        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw.set(true);
        }

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if matches!(event, TuiEvent::Resize) {
                continue;
            }
            if dispatcher.handle_event(&mut app, &mut tui, event) {
                should_quit = true;
                break;
            }
        }

        if should_quit {
            break;
        }

        // Handle results from generation tasks
        while let Ok(action) = rx.try_recv() {
            needs_redraw.set(true);
            debug!("Event loop received: {:?}", action);
            dispatcher.dispatch(&mut app, &mut tui, action);
        }
    }

    ratatui::restore();
    Ok(())
}

fn spawn_generation(job: GenerationJob, tx: mpsc::Sender<Action>) {
    info!("Spawning generation {}", job.ticket.generation);
    tokio::spawn(async move {
        let (ticket, result) = job.run().await;
        if tx.send(Action::GenerationFinished { ticket, result }).is_err() {
            warn!("Generation finished after the UI exited");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pipeline::GenerationTicket;
    use crate::test_support::{ScriptedProvider, TestHarness};

    fn setup() -> (App, TuiState, Dispatcher, mpsc::Receiver<Action>, TestHarness) {
        let harness = TestHarness::new(ScriptedProvider::replying(["Haanji, closures simple hai ☕"]));
        let app = App::new(harness.deps(), "hitesh");
        let (tx, rx) = mpsc::channel();
        let dispatcher = Dispatcher {
            tx,
            needs_redraw: Rc::new(Cell::new(false)),
        };
        (app, TuiState::new(), dispatcher, rx, harness)
    }

    fn type_str(d: &Dispatcher, app: &mut App, tui: &mut TuiState, s: &str) {
        for c in s.chars() {
            d.handle_event(app, tui, TuiEvent::InputChar(c));
        }
    }

    #[test]
    fn test_picker_escape_quits() {
        let (mut app, mut tui, d, _rx, _h) = setup();
        assert!(d.handle_event(&mut app, &mut tui, TuiEvent::Escape));
    }

    #[test]
    fn test_picker_enter_opens_and_escape_returns() {
        let (mut app, mut tui, d, _rx, _h) = setup();
        d.handle_event(&mut app, &mut tui, TuiEvent::CursorDown);
        assert!(!d.handle_event(&mut app, &mut tui, TuiEvent::Submit));
        assert_eq!(app.session.as_ref().unwrap().persona().id, "piyush");

        assert!(!d.handle_event(&mut app, &mut tui, TuiEvent::Escape));
        assert_eq!(app.screen(), Screen::Picker);
    }

    #[test]
    fn test_session_changes_request_redraw() {
        let (mut app, mut tui, d, _rx, _h) = setup();
        d.handle_event(&mut app, &mut tui, TuiEvent::Submit);
        d.needs_redraw.set(false);

        d.handle_event(&mut app, &mut tui, TuiEvent::ToggleSound);
        assert!(d.needs_redraw.get());
    }

    #[test]
    fn test_typing_mirrors_draft_into_session() {
        let (mut app, mut tui, d, _rx, _h) = setup();
        d.handle_event(&mut app, &mut tui, TuiEvent::Submit);
        type_str(&d, &mut app, &mut tui, "chai");
        assert_eq!(app.session.as_ref().unwrap().state().pending_input, "chai");
    }

    #[tokio::test]
    async fn test_submit_spawns_generation_and_result_comes_back() {
        let (mut app, mut tui, d, rx, harness) = setup();
        d.handle_event(&mut app, &mut tui, TuiEvent::Submit);
        type_str(&d, &mut app, &mut tui, "What is a closure?");
        d.handle_event(&mut app, &mut tui, TuiEvent::Submit);

        assert!(tui.input_box.buffer.is_empty());
        assert!(app.session.as_ref().unwrap().state().is_awaiting_response);

        let action = tokio::task::spawn_blocking(move || rx.recv_timeout(Duration::from_secs(5)))
            .await
            .unwrap()
            .unwrap();
        d.dispatch(&mut app, &mut tui, action);

        let state = app.session.as_ref().unwrap().state();
        assert!(!state.is_awaiting_response);
        assert_eq!(state.messages.len(), 3);
        assert_eq!(state.messages[2].content, "Haanji, closures simple hai ☕");
        assert_eq!(harness.provider.calls(), 1);
    }

    #[test]
    fn test_stale_result_after_reopen_is_ignored() {
        let (mut app, mut tui, d, _rx, _h) = setup();
        d.handle_event(&mut app, &mut tui, TuiEvent::Submit);
        let old_session = app.session.as_ref().unwrap().id().to_string();

        d.handle_event(&mut app, &mut tui, TuiEvent::Escape);
        d.handle_event(&mut app, &mut tui, TuiEvent::Submit);

        let ticket = GenerationTicket {
            session_id: old_session,
            generation: 1,
            prompt: String::new(),
        };
        d.dispatch(
            &mut app,
            &mut tui,
            Action::GenerationFinished {
                ticket,
                result: Ok("late".into()),
            },
        );
        assert_eq!(app.session.as_ref().unwrap().state().messages.len(), 1);
    }

    #[test]
    fn test_clear_resets_input() {
        let (mut app, mut tui, d, _rx, _h) = setup();
        d.handle_event(&mut app, &mut tui, TuiEvent::Submit);
        type_str(&d, &mut app, &mut tui, "draft");
        d.handle_event(&mut app, &mut tui, TuiEvent::ClearChat);
        assert!(tui.input_box.buffer.is_empty());
        assert!(app.session.as_ref().unwrap().state().pending_input.is_empty());
    }
}
