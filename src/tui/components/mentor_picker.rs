//! # Mentor Picker
//!
//! Start screen: one card per registered mentor. Stateless; the selection
//! lives in `App::selected` and moves through `Action::SelectNext/Prev`.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph, Wrap};

use crate::core::persona::Persona;
use crate::tui::component::Component;
use crate::tui::components::chat_header::accent_color;

const HELP_TEXT: &str = " ↑↓ Select  Enter Open  Esc Quit ";
const CARD_HEIGHT: u16 = 6;

pub struct MentorPicker<'a> {
    pub mentors: &'static [Persona],
    pub selected: usize,
    pub status: &'a str,
}

impl<'a> MentorPicker<'a> {
    pub fn new(mentors: &'static [Persona], selected: usize, status: &'a str) -> Self {
        Self {
            mentors,
            selected,
            status,
        }
    }

    fn render_card(&self, frame: &mut Frame, area: Rect, persona: &Persona, is_selected: bool) {
        let accent = accent_color(persona.accent);
        let border_style = if is_selected {
            Style::default().fg(accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let name_style = if is_selected {
            Style::default().fg(accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };

        let marker = if is_selected { "▶ " } else { "  " };
        let lines = vec![
            Line::from(vec![
                Span::styled(marker, Style::default().fg(accent)),
                Span::raw(format!("{} ", persona.icon)),
                Span::styled(persona.name, name_style),
                Span::styled(format!("  {}", persona.title), Style::default().fg(Color::Gray)),
            ]),
            Line::styled(persona.description, Style::default().fg(Color::DarkGray)),
        ];

        let border_type = if is_selected {
            BorderType::Thick
        } else {
            BorderType::Rounded
        };
        let card = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(border_type)
                .border_style(border_style)
                .padding(Padding::horizontal(1)),
        );
        frame.render_widget(card, area);
    }
}

impl<'a> Component for MentorPicker<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(70, 80, area);
        frame.render_widget(Clear, overlay);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Choose your mentor ")
            .title_alignment(Alignment::Left)
            .title_bottom(Line::from(HELP_TEXT).centered())
            .padding(Padding::horizontal(1));
        let inner = block.inner(overlay);
        frame.render_widget(block, overlay);

        if self.mentors.is_empty() {
            frame.render_widget(
                Paragraph::new("No mentors registered.")
                    .style(Style::default().fg(Color::DarkGray))
                    .alignment(Alignment::Center),
                inner,
            );
            return;
        }

        let mut constraints = vec![Constraint::Length(CARD_HEIGHT); self.mentors.len()];
        constraints.push(Constraint::Min(0));
        constraints.push(Constraint::Length(1));
        let rows = Layout::vertical(constraints).split(inner);

        for (i, persona) in self.mentors.iter().enumerate() {
            self.render_card(frame, rows[i], persona, i == self.selected);
        }

        frame.render_widget(
            Paragraph::new(self.status)
                .style(Style::default().fg(Color::Gray))
                .alignment(Alignment::Center),
            rows[rows.len() - 1],
        );
    }
}

/// Compute a centered rect using percentage of the outer rect.
pub fn centered_rect(percent_x: u16, percent_y: u16, outer: Rect) -> Rect {
    let [_, center_v, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(center_v);
    center
}
