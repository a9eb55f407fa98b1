//! Conversation state for one interactive session.
//!
//! A [`Session`] owns the active persona and the retained history. The history
//! only ever holds user and assistant messages; the persona instruction is
//! synthesized into each request instead of being stored.

use std::fmt;

use crate::core::message::Message;
use crate::core::persona::Persona;

/// How many retained messages are forwarded to the model on each turn.
pub const HISTORY_WINDOW: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    EmptyMessage,
    TurnInProgress,
    NoTurnInProgress,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::EmptyMessage => write!(f, "Message is empty"),
            SessionError::TurnInProgress => {
                write!(f, "Wait for the current response to finish")
            }
            SessionError::NoTurnInProgress => write!(f, "No response is pending"),
        }
    }
}

impl std::error::Error for SessionError {}

/// Message counts shown next to the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionStats {
    pub total_messages: usize,
    pub user_messages: usize,
}

#[derive(Debug, Clone)]
pub struct Session {
    persona: Persona,
    default_persona: Persona,
    history: Vec<Message>,
    turn_in_progress: bool,
}

impl Session {
    pub fn new(default_persona: Persona) -> Self {
        Self {
            persona: default_persona,
            default_persona,
            history: Vec::new(),
            turn_in_progress: false,
        }
    }

    pub fn persona(&self) -> Persona {
        self.persona
    }

    pub fn default_persona(&self) -> Persona {
        self.default_persona
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn turn_in_progress(&self) -> bool {
        self.turn_in_progress
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            total_messages: self.history.len(),
            user_messages: self.history.iter().filter(|m| m.is_user()).count(),
        }
    }

    /// Record a user message and return the messages to send for this turn:
    /// the persona instruction followed by the most recent history entries.
    pub fn begin_turn(&mut self, content: &str) -> Result<Vec<Message>, SessionError> {
        if self.turn_in_progress {
            return Err(SessionError::TurnInProgress);
        }
        if content.trim().is_empty() {
            return Err(SessionError::EmptyMessage);
        }

        self.history.push(Message::user(content));
        self.turn_in_progress = true;
        Ok(self.request_messages())
    }

    /// The request payload for the current history: one system message built
    /// from the persona, then at most [`HISTORY_WINDOW`] recent messages.
    pub fn request_messages(&self) -> Vec<Message> {
        let start = self.history.len().saturating_sub(HISTORY_WINDOW);
        let mut messages = Vec::with_capacity(1 + self.history.len() - start);
        messages.push(Message::system(self.persona.instructions()));
        messages.extend(self.history[start..].iter().cloned());
        messages
    }

    /// Commit the streamed reply of the pending turn.
    pub fn complete_turn(&mut self, reply: String) -> Result<(), SessionError> {
        if !self.turn_in_progress {
            return Err(SessionError::NoTurnInProgress);
        }
        self.turn_in_progress = false;
        self.history.push(Message::assistant(reply));
        Ok(())
    }

    /// Drop the pending turn after a failed call and hand back the user text,
    /// leaving the history as it was before the turn began.
    pub fn abandon_turn(&mut self) -> Result<String, SessionError> {
        if !self.turn_in_progress {
            return Err(SessionError::NoTurnInProgress);
        }
        self.turn_in_progress = false;
        match self.history.last() {
            Some(last) if last.is_user() => Ok(self
                .history
                .pop()
                .map(|message| message.content().to_string())
                .unwrap_or_default()),
            _ => Ok(String::new()),
        }
    }

    /// Switch persona. The history is always cleared so instruction styles
    /// never mix within one transcript.
    pub fn select_persona(&mut self, persona: Persona) {
        self.persona = persona;
        self.clear_history();
    }

    pub fn reset(&mut self) {
        self.persona = self.default_persona;
        self.clear_history();
    }

    fn clear_history(&mut self) {
        self.history.clear();
        self.turn_in_progress = false;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Persona::default())
    }
}
