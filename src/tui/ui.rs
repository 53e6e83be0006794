use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph, Wrap};

use crate::core::session::ChatSession;
use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{
    ChatHeader, MentorPicker, MessageList, accent_color, render_toast,
};

const CONFIG_ERROR_TEXT: &str =
    "API key not configured. Set GOOGLE_GEMINI_API_KEY in .env or ~/.mentorchat/config.toml and restart.";
const SCROLL_HINT: &str = "↓ Jump to latest (Ctrl+B)";
const PLACEHOLDER: &str = "Ask anything... (Enter to send, Shift+Enter for newline)";

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    let area = frame.area();
    match &app.session {
        None => {
            MentorPicker::new(app.mentors(), app.selected, &app.status_message).render(frame, area);
        }
        Some(session) => draw_chat(frame, area, app, session, tui, spinner_frame),
    }

    if let Some(notice) = tui.toast.current() {
        render_toast(frame, area, &notice);
    }
}

fn draw_chat(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    session: &ChatSession,
    tui: &mut TuiState,
    spinner_frame: usize,
) {
    use Constraint::{Length, Min};

    let persona = session.persona();
    let state = session.state();

    // Sync InputBox props with the session
    tui.input_box.accent = accent_color(persona.accent);
    tui.input_box.placeholder = PLACEHOLDER.to_string();
    tui.input_box.disabled = if state.configuration_error {
        Some("Input disabled: API key not configured".to_string())
    } else if state.is_awaiting_response {
        Some(format!("{} is typing...", persona.name))
    } else {
        None
    };

    let banner_height = if state.configuration_error { 4 } else { 0 };
    let hint_height = if session.show_scroll_button() { 1 } else { 0 };
    let input_height = tui.input_box.calculate_height(area.width);
    let [header_area, banner_area, list_area, hint_area, input_area] = Layout::vertical([
        Length(1),
        Length(banner_height),
        Min(0),
        Length(hint_height),
        Length(input_height),
    ])
    .areas(area);

    let mut header = ChatHeader::new(persona, session.model().to_string());
    header.status_message = app.status_message.clone();
    header.sound_enabled = session.sound_enabled();
    header.has_unseen_content = session.show_scroll_button();
    header.render(frame, header_area);

    if state.configuration_error {
        draw_config_error(frame, banner_area);
    }

    MessageList::new(
        &mut tui.message_list,
        &state.messages,
        persona,
        state.is_awaiting_response,
        spinner_frame,
    )
    .render(frame, list_area);

    if session.show_scroll_button() {
        frame.render_widget(
            Line::styled(SCROLL_HINT, Style::default().fg(Color::Yellow)).right_aligned(),
            hint_area,
        );
    }

    tui.input_box.render(frame, input_area);
}

fn draw_config_error(frame: &mut Frame, area: Rect) {
    let banner = Paragraph::new(CONFIG_ERROR_TEXT)
        .style(Style::default().fg(Color::Red))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::bordered()
                .title(" Configuration ")
                .border_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
        );
    frame.render_widget(banner, area);
}
