//! Terminal UI layer for interactive chat sessions.
//!
//! - [`chat_loop`]: the event loop that turns keys and stream items into
//!   [`crate::core::app::AppAction`]s and starts completion streams.
//! - [`renderer`] and [`wrap`]: frame composition (sidebar, transcript,
//!   status line, input box).
//! - [`help`]: key binding reference shared with `/help`.
//!
//! This layer only presents and captures interaction state; the session and
//! streaming logic live in [`crate::core`].

pub mod chat_loop;
pub mod help;
pub mod renderer;
pub mod wrap;
