//! # Core Application Logic
//!
//! The chat domain of mentorchat. It knows nothing about any specific UI
//! technology: the TUI and the headless `--ask` mode both drive it through
//! the same `ChatSession` API.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │          CORE           │
//!                    │                         │
//!                    │  • persona registry     │
//!                    │  • message pipeline     │
//!                    │  • ChatSession          │
//!                    │  • update() (reducer)   │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    TUI     │      │  headless  │      │  inference │
//!     │  Adapter   │      │   --ask    │      │  (Gemini)  │
//!     │ (ratatui)  │      │            │      │            │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`persona`]: static mentor table
//! - [`message`]: `Message` and `Role`
//! - [`pipeline`]: submit/resolve/clear over one message list
//! - [`session`]: `ChatSession`, the controller a UI talks to
//! - [`state`]: `App`, the host shell (picker or open chat)
//! - [`action`]: the `Action` enum and `update()` reducer
//! - [`sound`], [`notice`]: side channels for cues and toasts
//! - [`display`]: link detection for rendering
//! - [`config`]: layered settings

pub mod action;
pub mod config;
pub mod display;
pub mod error;
pub mod message;
pub mod notice;
pub mod persona;
pub mod pipeline;
pub mod session;
pub mod sound;
pub mod state;
