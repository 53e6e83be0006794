//! # MessageList Component
//!
//! Scrollable view of the open chat.
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the session's messages
//! (props). Heights are cached per message; messages never change once
//! appended, so only new ones are measured, and a clear (fewer messages or a
//! different first message) throws the cache away.
//!
//! While a reply is pending, a typing indicator sits under the last message
//! and is part of the scroll canvas, so "stick to bottom" keeps it visible.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Paragraph};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::message::Message;
use crate::core::persona::Persona;
use crate::core::session::ScrollMetrics;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::chat_header::accent_color;
use crate::tui::components::message::MessageBubble;
use crate::tui::event::TuiEvent;

/// Rows taken by the typing indicator box.
const TYPING_HEIGHT: u16 = 3;

const SPINNER_FRAMES: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    pub scroll_state: ScrollViewState,
    pub layout: LayoutCache,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
    /// Canvas height of the last frame, typing indicator included
    pub canvas_height: u16,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::default(),
            stick_to_bottom: true,
            viewport_height: 0,
            canvas_height: 0,
        }
    }

    fn max_offset(&self) -> u16 {
        self.canvas_height.saturating_sub(self.viewport_height)
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position { x: current.x, y: max_y });
        }
    }

    /// Re-engage auto-scroll if the user has reached the bottom.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position { x: current.x, y: max_y });
        }
    }

    pub fn scroll_to_bottom(&mut self) {
        self.stick_to_bottom = true;
        let max_y = self.max_offset();
        self.scroll_state.set_offset(Position { x: 0, y: max_y });
    }

    /// Scroll position as of the last render, for the session's scroll button.
    pub fn metrics(&self) -> ScrollMetrics {
        ScrollMetrics {
            offset: self.scroll_state.offset().y.min(self.max_offset()),
            content_height: self.canvas_height,
            viewport_height: self.viewport_height,
        }
    }
}

/// Scrollable conversation view component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub messages: &'a [Message],
    pub persona: &'static Persona,
    pub is_awaiting_response: bool,
    pub spinner_frame: usize,
}

impl<'a> MessageList<'a> {
    pub fn new(
        state: &'a mut MessageListState,
        messages: &'a [Message],
        persona: &'static Persona,
        is_awaiting_response: bool,
        spinner_frame: usize,
    ) -> Self {
        Self {
            state,
            messages,
            persona,
            is_awaiting_response,
            spinner_frame,
        }
    }

    fn typing_indicator(&self) -> Paragraph<'static> {
        let accent = accent_color(self.persona.accent);
        let frame = SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()];
        Paragraph::new(Line::styled(
            format!("{} {} is typing...", frame, self.persona.name),
            Style::default().fg(accent).add_modifier(Modifier::ITALIC),
        ))
        .block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
    }
}

impl<'a> Component for MessageList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar

        // 1. Update layout cache
        let layout = &mut self.state.layout;
        let reusable = layout.reusable_count(self.messages, content_width);
        layout.heights.truncate(reusable);
        for message in self.messages.iter().skip(layout.heights.len()) {
            layout
                .heights
                .push(MessageBubble::calculate_height(&message.content, content_width));
        }
        layout.rebuild_prefix_heights();
        layout.update_metadata(self.messages, content_width);

        let total_height = layout.total_height();
        let typing_height = if self.is_awaiting_response { TYPING_HEIGHT } else { 0 };
        let canvas_height = total_height.saturating_add(typing_height);

        // 2. Clamp scroll against the new canvas
        self.state.viewport_height = area.height;
        self.state.canvas_height = canvas_height;
        if self.state.stick_to_bottom {
            let max_y = self.state.max_offset();
            self.state.scroll_state.set_offset(Position { x: 0, y: max_y });
        } else {
            self.state.clamp_scroll();
        }

        let scroll_offset = self.state.scroll_state.offset().y;
        let visible_range = self.state.layout.visible_range(scroll_offset, area.height);

        // 3. Render visible messages into a ScrollView
        let mut scroll_view = ScrollView::new(Size::new(content_width, canvas_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        // Heights saturate at u16::MAX, so a very long chat fills the canvas
        // and anything past its last row is not drawn.
        let mut y_offset = self.state.layout.top_of(visible_range.start);
        for i in visible_range {
            if y_offset >= canvas_height {
                break;
            }
            let height = self.state.layout.heights[i].min(canvas_height - y_offset);
            let rect = Rect::new(0, y_offset, content_width, height);
            scroll_view.render_widget(MessageBubble::new(&self.messages[i], self.persona), rect);
            y_offset = y_offset.saturating_add(height);
        }

        if self.is_awaiting_response && total_height < canvas_height {
            let height = TYPING_HEIGHT.min(canvas_height - total_height);
            let rect = Rect::new(0, total_height, content_width, height);
            scroll_view.render_widget(self.typing_indicator(), rect);
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp | TuiEvent::CursorUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown | TuiEvent::CursorDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollToBottom => self.scroll_to_bottom(),
            _ => {}
        }
        None
    }
}

/// Cached message heights for one content width.
#[derive(Default)]
pub struct LayoutCache {
    pub heights: Vec<u16>,
    pub prefix_heights: Vec<u16>,
    message_count: usize,
    first_message_id: Option<String>,
    content_width: u16,
}

impl LayoutCache {
    /// How many cached heights are still valid for `messages` at `content_width`.
    pub fn reusable_count(&self, messages: &[Message], content_width: u16) -> usize {
        if self.content_width != content_width || self.heights.is_empty() {
            return 0;
        }
        // Fewer messages or a new first message means the chat was cleared
        if messages.len() < self.message_count
            || messages.first().map(|m| &m.id) != self.first_message_id.as_ref()
        {
            return 0;
        }
        self.message_count.min(self.heights.len())
    }

    pub fn update_metadata(&mut self, messages: &[Message], content_width: u16) {
        self.message_count = messages.len();
        self.first_message_id = messages.first().map(|m| m.id.clone());
        self.content_width = content_width;
    }

    pub fn rebuild_prefix_heights(&mut self) {
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u16, |acc, &h| {
                *acc = acc.saturating_add(h);
                Some(*acc)
            })
            .collect();
    }

    pub fn total_height(&self) -> u16 {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    /// Canvas row where message `index` starts.
    pub fn top_of(&self, index: usize) -> u16 {
        match index {
            0 => 0,
            i => self.prefix_heights.get(i - 1).copied().unwrap_or(0),
        }
    }

    /// Indices of messages overlapping the viewport, with half a screen of slack.
    pub fn visible_range(&self, scroll_offset: u16, viewport_height: u16) -> std::ops::Range<usize> {
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::persona;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn messages(n: usize) -> Vec<Message> {
        (0..n).map(|i| Message::user(format!("message {i}"))).collect()
    }

    fn draw(state: &mut MessageListState, msgs: &[Message], awaiting: bool, w: u16, h: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(w, h)).unwrap();
        let hitesh = persona::lookup("hitesh").unwrap();
        terminal
            .draw(|f| MessageList::new(state, msgs, hitesh, awaiting, 0).render(f, f.area()))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_layout_cache_reuse_and_invalidation() {
        let msgs = messages(3);
        let mut cache = LayoutCache::default();
        assert_eq!(cache.reusable_count(&msgs, 80), 0);

        cache.heights = vec![3, 3, 3];
        cache.update_metadata(&msgs, 80);
        assert_eq!(cache.reusable_count(&msgs, 80), 3);

        // Appending keeps the old heights
        let mut more = msgs.clone();
        more.push(Message::assistant("reply"));
        assert_eq!(cache.reusable_count(&more, 80), 3);

        // Width change
        assert_eq!(cache.reusable_count(&msgs, 40), 0);

        // Cleared: same length, different first message
        assert_eq!(cache.reusable_count(&messages(3), 80), 0);
        assert_eq!(cache.reusable_count(&msgs[..1], 80), 0);
    }

    #[test]
    fn test_visible_range() {
        let mut cache = LayoutCache {
            heights: vec![3; 10],
            ..Default::default()
        };
        cache.rebuild_prefix_heights();
        assert_eq!(cache.total_height(), 30);
        assert_eq!(cache.top_of(4), 12);
        let range = cache.visible_range(12, 6);
        assert!(range.contains(&4) && range.contains(&5));
        assert!(!range.contains(&0));
    }

    #[test]
    fn test_sticks_to_bottom_and_reports_metrics() {
        let msgs = messages(10);
        let mut state = MessageListState::new();
        let text = draw(&mut state, &msgs, false, 40, 9);

        assert!(text.contains("message 9"));
        let m = state.metrics();
        assert_eq!(m.content_height, 30);
        assert_eq!(m.viewport_height, 9);
        assert_eq!(m.offset, 21);
        assert!(m.is_near_bottom(3));
    }

    #[test]
    fn test_scrolling_up_detaches() {
        let msgs = messages(10);
        let mut state = MessageListState::new();
        draw(&mut state, &msgs, false, 40, 9);

        for _ in 0..10 {
            state.handle_event(&TuiEvent::ScrollUp);
        }
        assert!(!state.stick_to_bottom);
        draw(&mut state, &msgs, false, 40, 9);
        assert!(!state.metrics().is_near_bottom(3));

        state.handle_event(&TuiEvent::ScrollToBottom);
        assert!(state.stick_to_bottom);
        draw(&mut state, &msgs, false, 40, 9);
        assert!(state.metrics().is_near_bottom(3));
    }

    #[test]
    fn test_chat_taller_than_canvas_limit_renders() {
        let msgs: Vec<Message> = (0..700)
            .map(|_| Message::assistant("line\n".repeat(100)))
            .collect();
        let mut state = MessageListState::new();

        draw(&mut state, &msgs, true, 40, 20);
        assert_eq!(state.canvas_height, u16::MAX);
        assert_eq!(state.layout.total_height(), u16::MAX);
        assert_eq!(state.metrics().offset, u16::MAX - 20);

        // Scrolled into the middle of the saturated region
        state.handle_event(&TuiEvent::ScrollPageUp);
        let text = draw(&mut state, &msgs, false, 40, 20);
        assert!(text.contains("line"));
    }

    #[test]
    fn test_typing_indicator_while_awaiting() {
        let msgs = messages(1);
        let mut state = MessageListState::new();
        let text = draw(&mut state, &msgs, true, 50, 10);
        assert!(text.contains("Hitesh Choudhary is typing"));
        assert_eq!(state.canvas_height, 3 + TYPING_HEIGHT);

        let text = draw(&mut state, &msgs, false, 50, 10);
        assert!(!text.contains("is typing"));
    }
}
