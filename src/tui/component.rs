use ratatui::Frame;
use ratatui::layout::Rect;

use super::event::TuiEvent;

/// Something that draws itself into a rectangle of the frame.
///
/// Props live in struct fields and are refreshed by the parent before each
/// draw. `render` takes `&mut self` so components can keep layout caches
/// (message heights, input scroll) between frames.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that turns low-level key events into its own event type.
pub trait EventHandler {
    type Event;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event>;
}
