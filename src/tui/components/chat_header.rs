//! # ChatHeader Component
//!
//! Single-line bar at the top of the chat screen.
//!
//! ```text
//! ☕ Hitesh Choudhary · Chai aur Code  (gemini-pro)   🔊 | status | ↓ New
//! ```
//!
//! Stateless: every field is a prop copied from the session snapshot before
//! each draw. The "↓ New" marker mirrors `show_scroll_button`, so it only
//! appears while the user has scrolled away from the latest message.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::core::persona::{Accent, Persona};
use crate::tui::component::Component;

pub fn accent_color(accent: Accent) -> Color {
    match accent {
        Accent::Amber => Color::Rgb(245, 158, 11),
        Accent::Blue => Color::Rgb(59, 130, 246),
    }
}

pub struct ChatHeader {
    pub persona: &'static Persona,
    pub model_name: String,
    pub status_message: String,
    pub sound_enabled: bool,
    pub has_unseen_content: bool,
}

impl ChatHeader {
    pub fn new(persona: &'static Persona, model_name: String) -> Self {
        Self {
            persona,
            model_name,
            status_message: String::new(),
            sound_enabled: true,
            has_unseen_content: false,
        }
    }
}

impl Component for ChatHeader {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let accent = accent_color(self.persona.accent);
        let mut spans = vec![
            Span::raw(format!("{} ", self.persona.icon)),
            Span::styled(
                self.persona.name,
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" · {}", self.persona.title),
                Style::default().fg(Color::Gray),
            ),
            Span::styled(
                format!("  ({})", self.model_name),
                Style::default().fg(Color::DarkGray),
            ),
            Span::raw(if self.sound_enabled { "  🔊" } else { "  🔇" }),
        ];
        if !self.status_message.is_empty() {
            spans.push(Span::raw(format!(" | {}", self.status_message)));
        }
        if self.has_unseen_content {
            spans.push(Span::styled(" | ↓ New", Style::default().fg(Color::Yellow)));
        }

        frame.render_widget(Line::from(spans), area);
    }
}
