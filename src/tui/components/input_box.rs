//! # InputBox Component
//!
//! Draft editor at the bottom of the chat screen.
//!
//! - Typing, paste, backspace/delete, left/right, Home/End
//! - Enter emits `InputEvent::Submit`; the parent clears the box only when
//!   the session accepted the message
//! - Capped at `MAX_INPUT_CHARS`, with a live counter in the bottom border
//! - `disabled` (prop) blocks editing and shows the reason as a placeholder
//!
//! The buffer and cursor are internal state. Grows up to `MAX_VISIBLE_LINES`
//! rows, then scrolls to keep the cursor in view.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::core::pipeline::MAX_INPUT_CHARS;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Border (2) + padding (2) consumed horizontally
const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders
const VERTICAL_OVERHEAD: u16 = 2;
/// Content rows shown before the box starts scrolling
const MAX_VISIBLE_LINES: u16 = 5;
/// Distance from the area's left edge to the first text column
const TEXT_OFFSET_X: u16 = 2;

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Submit(String),
    ContentChanged,
}

pub struct InputBox {
    pub buffer: String,
    /// Why input is blocked, shown in place of the draft. `None` = editable.
    pub disabled: Option<String>,
    /// Hint shown when the draft is empty.
    pub placeholder: String,
    /// Accent color for the border (prop).
    pub accent: Color,
    /// Cursor as a byte offset into `buffer`
    pos: usize,
    scroll_offset: u16,
}

fn wrap_options(width: u16) -> textwrap::Options<'static> {
    textwrap::Options::new(width.max(1) as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
}

fn wrapped_lines(text: &str, width: u16) -> Vec<String> {
    textwrap::wrap(text, wrap_options(width))
        .into_iter()
        .map(|l| l.into_owned())
        .collect()
}

impl InputBox {
    pub fn new(placeholder: impl Into<String>, accent: Color) -> Self {
        Self {
            buffer: String::new(),
            disabled: None,
            placeholder: placeholder.into(),
            accent,
            pos: 0,
            scroll_offset: 0,
        }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.pos = 0;
        self.scroll_offset = 0;
    }

    pub fn char_count(&self) -> usize {
        self.buffer.chars().count()
    }

    pub fn calculate_height(&self, width: u16) -> u16 {
        let inner = width.saturating_sub(HORIZONTAL_OVERHEAD);
        let lines = u16::try_from(wrapped_lines(&self.buffer, inner).len()).unwrap_or(u16::MAX);
        lines
            .clamp(1, MAX_VISIBLE_LINES)
            .saturating_add(VERTICAL_OVERHEAD)
    }

    fn insert(&mut self, text: &str) -> Option<InputEvent> {
        let room = MAX_INPUT_CHARS.saturating_sub(self.char_count());
        let accepted: String = text.chars().take(room).collect();
        if accepted.is_empty() {
            return None;
        }
        self.buffer.insert_str(self.pos, &accepted);
        self.pos += accepted.len();
        Some(InputEvent::ContentChanged)
    }

    fn prev_boundary(&self) -> usize {
        self.buffer[..self.pos]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn next_boundary(&self) -> usize {
        self.buffer[self.pos..]
            .chars()
            .next()
            .map(|c| self.pos + c.len_utf8())
            .unwrap_or(self.buffer.len())
    }

    /// (row, column) of the cursor within the wrapped text.
    fn cursor_cell(&self, width: u16) -> (u16, u16) {
        let before = &self.buffer[..self.pos];
        let row = wrapped_lines(before, width).len().saturating_sub(1) as u16;

        // Wrapped lines drop trailing spaces, so measure from the logical line start.
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let logical = &before[line_start..];
        let segments = wrapped_lines(logical, width);
        let consumed: usize = segments
            .iter()
            .take(segments.len().saturating_sub(1))
            .map(|s| s.chars().count())
            .sum();
        let tail: String = logical.chars().skip(consumed).collect();
        let tail = if consumed > 0 { tail.trim_start() } else { tail.as_str() };
        let col = (tail.width() as u16).min(width.saturating_sub(1));
        (row, col)
    }

    fn keep_cursor_visible(&mut self, width: u16) {
        let (row, _) = self.cursor_cell(width);
        if row < self.scroll_offset {
            self.scroll_offset = row;
        } else if row >= self.scroll_offset + MAX_VISIBLE_LINES {
            self.scroll_offset = row + 1 - MAX_VISIBLE_LINES;
        }
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let inner = area.width.saturating_sub(HORIZONTAL_OVERHEAD);
        let counter = format!(" {}/{} ", self.char_count(), MAX_INPUT_CHARS);

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(if self.disabled.is_some() {
                Color::DarkGray
            } else {
                self.accent
            }))
            .title_bottom(Line::from(counter).right_aligned())
            .padding(Padding::horizontal(1));

        let hint_style = Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC);

        if let Some(reason) = &self.disabled {
            frame.render_widget(Paragraph::new(Line::styled(reason.as_str(), hint_style)).block(block), area);
            return;
        }

        if self.buffer.is_empty() {
            frame.render_widget(
                Paragraph::new(Line::styled(self.placeholder.as_str(), hint_style)).block(block),
                area,
            );
            frame.set_cursor_position((area.x + TEXT_OFFSET_X, area.y + 1));
            return;
        }

        self.keep_cursor_visible(inner);
        let visible: Vec<Line> = wrapped_lines(&self.buffer, inner)
            .into_iter()
            .skip(self.scroll_offset as usize)
            .take(MAX_VISIBLE_LINES as usize)
            .map(Line::from)
            .collect();
        frame.render_widget(Paragraph::new(visible).block(block), area);

        let (row, col) = self.cursor_cell(inner);
        frame.set_cursor_position((
            area.x + TEXT_OFFSET_X + col,
            area.y + 1 + row.saturating_sub(self.scroll_offset),
        ));
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        if self.disabled.is_some() {
            return None;
        }
        match event {
            TuiEvent::InputChar(c) => self.insert(c.encode_utf8(&mut [0; 4])),
            TuiEvent::Paste(text) => self.insert(&text.replace('\r', "")),
            TuiEvent::Backspace if self.pos > 0 => {
                let prev = self.prev_boundary();
                self.buffer.drain(prev..self.pos);
                self.pos = prev;
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Delete if self.pos < self.buffer.len() => {
                let next = self.next_boundary();
                self.buffer.drain(self.pos..next);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::CursorLeft if self.pos > 0 => {
                self.pos = self.prev_boundary();
                None
            }
            TuiEvent::CursorRight if self.pos < self.buffer.len() => {
                self.pos = self.next_boundary();
                None
            }
            TuiEvent::CursorHome => {
                self.pos = 0;
                None
            }
            TuiEvent::CursorEnd => {
                self.pos = self.buffer.len();
                None
            }
            TuiEvent::Submit if !self.buffer.trim().is_empty() => {
                Some(InputEvent::Submit(self.buffer.clone()))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn input() -> InputBox {
        InputBox::new("Ask anything...", Color::Yellow)
    }

    fn type_str(input: &mut InputBox, s: &str) {
        for c in s.chars() {
            input.handle_event(&TuiEvent::InputChar(c));
        }
    }

    fn render_text(input: &mut InputBox, w: u16) -> String {
        let h = input.calculate_height(w);
        let mut terminal = Terminal::new(TestBackend::new(w, h)).unwrap();
        terminal.draw(|f| input.render(f, f.area())).unwrap();
        terminal.backend().buffer().content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut input = input();
        assert_eq!(input.handle_event(&TuiEvent::InputChar('a')), Some(InputEvent::ContentChanged));
        type_str(&mut input, "b☕");
        assert_eq!(input.buffer, "ab☕");

        input.handle_event(&TuiEvent::Backspace);
        assert_eq!(input.buffer, "ab");
        input.handle_event(&TuiEvent::CursorHome);
        input.handle_event(&TuiEvent::Delete);
        assert_eq!(input.buffer, "b");
    }

    #[test]
    fn test_insert_in_middle() {
        let mut input = input();
        type_str(&mut input, "ac");
        input.handle_event(&TuiEvent::CursorLeft);
        type_str(&mut input, "b");
        assert_eq!(input.buffer, "abc");
    }

    #[test]
    fn test_submit_keeps_buffer_until_cleared() {
        let mut input = input();
        type_str(&mut input, "hello");
        assert_eq!(
            input.handle_event(&TuiEvent::Submit),
            Some(InputEvent::Submit("hello".into()))
        );
        assert_eq!(input.buffer, "hello");
        input.clear();
        assert!(input.buffer.is_empty());
        assert_eq!(input.handle_event(&TuiEvent::Submit), None);
    }

    #[test]
    fn test_blank_submit_is_ignored() {
        let mut input = input();
        type_str(&mut input, "   ");
        assert_eq!(input.handle_event(&TuiEvent::Submit), None);
    }

    #[test]
    fn test_length_cap_applies_to_typing_and_paste() {
        let mut input = input();
        input.handle_event(&TuiEvent::Paste("x".repeat(MAX_INPUT_CHARS + 50)));
        assert_eq!(input.char_count(), MAX_INPUT_CHARS);
        assert_eq!(input.handle_event(&TuiEvent::InputChar('y')), None);
        assert_eq!(input.char_count(), MAX_INPUT_CHARS);
    }

    #[test]
    fn test_height_caps_at_visible_lines_for_any_line_count() {
        let mut input = input();
        // 65536 lines: one more than fits in a u16
        input.buffer = format!("{}a", "a\n".repeat(usize::from(u16::MAX)));
        assert_eq!(input.calculate_height(40), MAX_VISIBLE_LINES + VERTICAL_OVERHEAD);
    }

    #[test]
    fn test_disabled_ignores_input() {
        let mut input = input();
        input.disabled = Some("API key not configured".into());
        assert_eq!(input.handle_event(&TuiEvent::InputChar('a')), None);
        assert!(input.buffer.is_empty());

        let text = render_text(&mut input, 40);
        assert!(text.contains("API key not configured"));
    }

    #[test]
    fn test_render_placeholder_and_counter() {
        let mut input = input();
        let text = render_text(&mut input, 40);
        assert!(text.contains("Ask anything..."));
        assert!(text.contains("0/500"));

        type_str(&mut input, "Dekho");
        let text = render_text(&mut input, 40);
        assert!(text.contains("Dekho"));
        assert!(text.contains("5/500"));
    }

    #[test]
    fn test_height_grows_then_caps() {
        let mut input = input();
        assert_eq!(input.calculate_height(20), 1 + VERTICAL_OVERHEAD);
        type_str(&mut input, "one\ntwo\nthree");
        assert_eq!(input.calculate_height(20), 3 + VERTICAL_OVERHEAD);
        type_str(&mut input, "\n4\n5\n6\n7");
        assert_eq!(input.calculate_height(20), MAX_VISIBLE_LINES + VERTICAL_OVERHEAD);
    }

    #[test]
    fn test_cursor_cell_tracks_lines() {
        let mut input = input();
        type_str(&mut input, "ab\ncd");
        assert_eq!(input.cursor_cell(20), (1, 2));
        input.handle_event(&TuiEvent::CursorHome);
        assert_eq!(input.cursor_cell(20), (0, 0));
    }
}
