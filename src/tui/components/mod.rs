//! # TUI Components
//!
//! Components follow two patterns:
//!
//! ### Stateless (props-based rendering)
//!
//! Receive everything they show as fields, refreshed before each draw:
//! - `ChatHeader`: mentor, model, sound state, status
//! - `MessageBubble`: one chat message
//! - `MentorPicker`: start screen
//! - `render_toast`: the current notice
//!
//! ### Stateful (event-driven)
//!
//! Keep local state in `TuiState` and turn `TuiEvent`s into their own events:
//! - `InputBox`: draft editor with character counter
//! - `MessageList`: scrollable conversation with layout caching
//!
//! `ToastQueue` is the odd one out: it is shared with the chat sessions as
//! their notification sink, and the renderer reads from it.
//!
//! ```text
//! components/
//! ├── mod.rs
//! ├── chat_header.rs
//! ├── input_box.rs
//! ├── mentor_picker.rs
//! ├── message.rs
//! ├── message_list.rs
//! └── toast.rs
//! ```

pub mod chat_header;
pub mod input_box;
pub mod mentor_picker;
pub mod message;
pub mod message_list;
pub mod toast;

pub use chat_header::{ChatHeader, accent_color};
pub use input_box::{InputBox, InputEvent};
pub use mentor_picker::MentorPicker;
pub use message_list::{MessageList, MessageListState};
pub use toast::{ToastQueue, render_toast};
