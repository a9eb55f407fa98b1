//! Parley is a small terminal chat front-end for OpenAI-compatible APIs.
//!
//! The crate is organized around a few collaborating layers:
//! - [`core`] owns the conversation session, personas, generation settings,
//!   configuration and the streaming completion client.
//! - [`ui`] renders the terminal interface and runs the interactive event loop.
//! - [`commands`] implements the slash commands typed into the input box.
//! - [`cli`] parses arguments and runs the one-shot commands.
//! - [`api`] defines the chat-completions wire payloads.
//!
//! The binary (`src/main.rs`) routes through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod commands;
pub mod core;
pub mod ui;
pub mod utils;
