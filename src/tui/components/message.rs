use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};

use crate::core::display::{DisplaySpan, format_for_display};
use crate::core::message::{Message, Role};
use crate::core::persona::Persona;
use crate::tui::components::chat_header::accent_color;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

const USER_COLOR: Color = Color::Cyan;

/// One chat message in a rounded box: author on the left of the top border,
/// time on the right, links underlined in the mentor's accent color.
///
/// Created fresh each frame; holds no state.
#[derive(Clone, Copy)]
pub struct MessageBubble<'a> {
    pub message: &'a Message,
    pub persona: &'static Persona,
}

impl<'a> MessageBubble<'a> {
    pub fn new(message: &'a Message, persona: &'static Persona) -> Self {
        Self { message, persona }
    }

    /// Predict the rendered height without rendering.
    ///
    /// The wrap options must match `Paragraph`'s word wrapping so the scroll
    /// canvas lines up with what is drawn.
    pub fn calculate_height(content: &str, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            return 1;
        }

        let content = content.trim();
        if content.is_empty() {
            return VERTICAL_OVERHEAD;
        }

        let options = textwrap::Options::new(content_width as usize)
            .break_words(true)
            .word_separator(textwrap::WordSeparator::AsciiSpace);

        let lines = textwrap::wrap(content, options).len();
        u16::try_from(lines)
            .unwrap_or(u16::MAX)
            .max(1)
            .saturating_add(VERTICAL_OVERHEAD)
    }

    fn author(&self) -> &'static str {
        match self.message.role {
            Role::User => "you",
            Role::Assistant => self.persona.name,
        }
    }

    fn color(&self) -> Color {
        match self.message.role {
            Role::User => USER_COLOR,
            Role::Assistant => accent_color(self.persona.accent),
        }
    }

    fn body(&self) -> Text<'a> {
        let link_style = Style::default()
            .fg(accent_color(self.persona.accent))
            .add_modifier(Modifier::UNDERLINED);
        // URLs never contain whitespace, so splitting on newlines first is safe.
        let lines: Vec<Line<'a>> = self
            .message
            .content
            .trim()
            .split('\n')
            .map(|line| {
                let spans: Vec<Span<'a>> = format_for_display(line)
                    .into_iter()
                    .map(|span| match span {
                        DisplaySpan::Text(text) => Span::raw(text),
                        DisplaySpan::Link(url) => Span::styled(url, link_style),
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();
        Text::from(lines)
    }
}

impl<'a> Widget for MessageBubble<'a> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let color = self.color();
        let border_style = Style::default().fg(color).add_modifier(Modifier::DIM);

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(Line::styled(
                format!(" {} ", self.author()),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))
            .title(
                Line::styled(
                    format!(" {} ", self.message.time_label()),
                    Style::default().fg(Color::DarkGray),
                )
                .right_aligned(),
            )
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner_area = block.inner(area);
        block.render(area, buf);

        Paragraph::new(self.body())
            .wrap(Wrap { trim: true })
            .render(inner_area, buf);
    }
}
