use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers, MouseEventKind};

/// TUI-specific input events
#[derive(Debug, Clone, PartialEq)]
pub enum TuiEvent {
    // Global
    ForceQuit, // Ctrl+C
    Escape,
    Resize,

    // Chat commands
    ClearChat,      // Ctrl+L
    ToggleSound,    // Ctrl+S
    ScrollToBottom, // Ctrl+B or End with an empty draft

    // Text editing
    Submit,
    InputChar(char),
    Paste(String), // Bracketed paste
    Backspace,
    Delete,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,

    // Navigation: picker selection, message scrolling
    CursorUp,
    CursorDown,
    ScrollUp,
    ScrollDown,
    ScrollPageUp,
    ScrollPageDown,
}

/// Poll for an event, blocking up to `timeout`.
pub fn poll_event_timeout(timeout: Duration) -> Option<TuiEvent> {
    match event::poll(timeout) {
        Ok(true) => {}
        Ok(false) => return None,
        Err(e) => {
            log::warn!("Event poll failed: {}", e);
            return None;
        }
    }
    match event::read() {
        Ok(ev) => translate(ev),
        Err(e) => {
            log::warn!("Event read failed: {}", e);
            None
        }
    }
}

/// Poll for an event without blocking (returns immediately)
pub fn poll_event_immediate() -> Option<TuiEvent> {
    poll_event_timeout(Duration::ZERO)
}

/// Map a crossterm event onto a `TuiEvent`. Unbound keys yield `None`.
pub fn translate(ev: Event) -> Option<TuiEvent> {
    match ev {
        Event::Key(key_event) => {
            if key_event.kind == KeyEventKind::Release {
                return None;
            }
            log::debug!("Key event: {:?} with modifiers {:?}", key_event.code, key_event.modifiers);
            match (key_event.modifiers, key_event.code) {
                (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(TuiEvent::ForceQuit),
                (KeyModifiers::CONTROL, KeyCode::Char('l')) => Some(TuiEvent::ClearChat),
                (KeyModifiers::CONTROL, KeyCode::Char('s')) => Some(TuiEvent::ToggleSound),
                (KeyModifiers::CONTROL, KeyCode::Char('b')) => Some(TuiEvent::ScrollToBottom),
                // Ctrl+J inserts newline (ASCII LF)
                (KeyModifiers::CONTROL, KeyCode::Char('j')) => Some(TuiEvent::InputChar('\n')),
                (KeyModifiers::SHIFT, KeyCode::Enter) => Some(TuiEvent::InputChar('\n')),
                (KeyModifiers::CONTROL, _) => None,
                (_, KeyCode::Char(c)) => Some(TuiEvent::InputChar(c)),
                (_, KeyCode::Backspace) => Some(TuiEvent::Backspace),
                (_, KeyCode::Delete) => Some(TuiEvent::Delete),
                (_, KeyCode::Enter) => Some(TuiEvent::Submit),
                (_, KeyCode::Esc) => Some(TuiEvent::Escape),
                (_, KeyCode::Left) => Some(TuiEvent::CursorLeft),
                (_, KeyCode::Right) => Some(TuiEvent::CursorRight),
                (_, KeyCode::Home) => Some(TuiEvent::CursorHome),
                (_, KeyCode::End) => Some(TuiEvent::CursorEnd),
                (_, KeyCode::Up) => Some(TuiEvent::CursorUp),
                (_, KeyCode::Down) => Some(TuiEvent::CursorDown),
                (_, KeyCode::PageUp) => Some(TuiEvent::ScrollPageUp),
                (_, KeyCode::PageDown) => Some(TuiEvent::ScrollPageDown),
                _ => None,
            }
        }
        Event::Mouse(mouse_event) => match mouse_event.kind {
            MouseEventKind::ScrollUp => Some(TuiEvent::ScrollUp),
            MouseEventKind::ScrollDown => Some(TuiEvent::ScrollDown),
            _ => None,
        },
        Event::Paste(data) => Some(TuiEvent::Paste(data)),
        Event::Resize(_, _) => Some(TuiEvent::Resize),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;

    fn key(modifiers: KeyModifiers, code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn test_control_chords() {
        assert_eq!(translate(key(KeyModifiers::CONTROL, KeyCode::Char('c'))), Some(TuiEvent::ForceQuit));
        assert_eq!(translate(key(KeyModifiers::CONTROL, KeyCode::Char('l'))), Some(TuiEvent::ClearChat));
        assert_eq!(translate(key(KeyModifiers::CONTROL, KeyCode::Char('s'))), Some(TuiEvent::ToggleSound));
        assert_eq!(translate(key(KeyModifiers::CONTROL, KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_plain_keys() {
        assert_eq!(translate(key(KeyModifiers::NONE, KeyCode::Char('a'))), Some(TuiEvent::InputChar('a')));
        assert_eq!(translate(key(KeyModifiers::SHIFT, KeyCode::Char('A'))), Some(TuiEvent::InputChar('A')));
        assert_eq!(translate(key(KeyModifiers::NONE, KeyCode::Enter)), Some(TuiEvent::Submit));
        assert_eq!(translate(key(KeyModifiers::SHIFT, KeyCode::Enter)), Some(TuiEvent::InputChar('\n')));
        assert_eq!(translate(key(KeyModifiers::NONE, KeyCode::Esc)), Some(TuiEvent::Escape));
    }

    #[test]
    fn test_paste_and_resize() {
        assert_eq!(translate(Event::Paste("x\ny".into())), Some(TuiEvent::Paste("x\ny".into())));
        assert_eq!(translate(Event::Resize(80, 24)), Some(TuiEvent::Resize));
    }
}
