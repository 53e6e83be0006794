//! # Toast
//!
//! Transient banner in the top-right corner. `ToastQueue` is the TUI's
//! [`NotificationSink`]: sessions push notices into it, the render loop asks
//! it what to show. Only the newest notice is shown, for `TOAST_DURATION`.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Text};
use ratatui::widgets::{Block, BorderType, Clear, Paragraph, Wrap};

use crate::core::notice::{Notice, NotificationSink, Severity};

pub const TOAST_DURATION: Duration = Duration::from_secs(4);
const TOAST_WIDTH: u16 = 48;

#[derive(Clone, Default)]
pub struct ToastQueue {
    latest: Arc<Mutex<Option<(Notice, Instant)>>>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> MutexGuard<'_, Option<(Notice, Instant)>> {
        // A poisoned lock only means a panicking writer; the data is still a notice.
        self.latest.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn push_at(&self, notice: Notice, shown_at: Instant) {
        *self.slot() = Some((notice, shown_at));
    }

    /// The notice to display at `now`, if it has not expired.
    pub fn current_at(&self, now: Instant) -> Option<Notice> {
        let mut slot = self.slot();
        match slot.as_ref() {
            Some((notice, shown_at)) if now.duration_since(*shown_at) < TOAST_DURATION => {
                Some(notice.clone())
            }
            Some(_) => {
                *slot = None;
                None
            }
            None => None,
        }
    }

    pub fn current(&self) -> Option<Notice> {
        self.current_at(Instant::now())
    }
}

impl NotificationSink for ToastQueue {
    fn notify(&self, notice: Notice) {
        log::info!("Toast: {} ({})", notice.title, notice.description);
        self.push_at(notice, Instant::now());
    }
}

/// Draw `notice` in the top-right corner of `area`.
pub fn render_toast(frame: &mut Frame, area: Rect, notice: &Notice) {
    let width = TOAST_WIDTH.min(area.width);
    let text_width = width.saturating_sub(2).max(1) as usize;
    let body_lines = textwrap::wrap(&notice.description, text_width).len() as u16;
    let height = (body_lines + 3).min(area.height);
    let rect = Rect::new(area.x + area.width - width, area.y, width, height);

    let color = match notice.severity {
        Severity::Info => Color::Green,
        Severity::Destructive => Color::Red,
    };

    let text = Text::from(vec![
        Line::styled(
            notice.title.as_str(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Line::raw(notice.description.as_str()),
    ]);

    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(text).wrap(Wrap { trim: true }).block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(color)),
        ),
        rect,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_newest_notice_wins() {
        let queue = ToastQueue::new();
        let t0 = Instant::now();
        queue.push_at(Notice::chat_cleared(), t0);
        queue.push_at(Notice::sound_toggled(false), t0);
        assert_eq!(queue.current_at(t0).unwrap().title, "Sound disabled");
    }

    #[test]
    fn test_notice_expires() {
        let queue = ToastQueue::new();
        let t0 = Instant::now();
        queue.push_at(Notice::chat_cleared(), t0);
        assert!(queue.current_at(t0 + Duration::from_secs(3)).is_some());
        assert!(queue.current_at(t0 + TOAST_DURATION).is_none());
        // Stays gone
        assert!(queue.current_at(t0).is_none());
    }

    #[test]
    fn test_clones_share_the_slot() {
        let queue = ToastQueue::new();
        let sink: Arc<dyn NotificationSink> = Arc::new(queue.clone());
        sink.notify(Notice::configuration_missing());
        assert_eq!(queue.current().unwrap().title, "API Key Not Configured");
    }

    #[test]
    fn test_render_toast() {
        let mut terminal = Terminal::new(TestBackend::new(80, 10)).unwrap();
        let notice = Notice::generation_failed("network error: timed out");
        terminal.draw(|f| render_toast(f, f.area(), &notice)).unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Error"));
        assert!(text.contains("network error: timed out"));
        // Anchored to the right edge
        assert_eq!(buffer[(79, 0)].symbol(), "╮");
        assert_eq!(buffer[(0, 0)].symbol(), " ");
    }
}
