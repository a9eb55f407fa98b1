use std::time::Instant;

use tui_textarea::TextArea;

use crate::core::chat_stream::StreamError;

/// The reply currently being streamed. Only `text` is ever shown; it is
/// re-rendered in full after every fragment.
#[derive(Debug, Clone)]
pub struct PendingReply {
    pub text: String,
    pub started_at: Instant,
}

impl PendingReply {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            started_at: Instant::now(),
        }
    }
}

impl Default for PendingReply {
    fn default() -> Self {
        Self::new()
    }
}

/// A turn that failed. Shown until the next submission, persona change or
/// reset, never recorded in the session history.
#[derive(Debug, Clone, PartialEq)]
pub struct FailedTurn {
    pub prompt: String,
    pub partial: String,
    pub error: StreamError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// App-authored text shown under the transcript (help, listings, export
/// results). Not part of the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

pub struct UiState {
    pub textarea: TextArea<'static>,
    pub pending: Option<PendingReply>,
    pub failed_turn: Option<FailedTurn>,
    pub notice: Option<Notice>,
    pub status: Option<String>,
    pub scroll_offset: u16,
    pub auto_scroll: bool,
    pub exit_requested: bool,
}

impl UiState {
    pub fn new() -> Self {
        Self {
            textarea: TextArea::default(),
            pending: None,
            failed_turn: None,
            notice: None,
            status: None,
            scroll_offset: 0,
            auto_scroll: true,
            exit_requested: false,
        }
    }

    pub fn input_text(&self) -> String {
        self.textarea.lines().join("\n")
    }

    pub fn take_input(&mut self) -> String {
        let text = self.input_text();
        self.clear_input();
        text
    }

    pub fn set_input(&mut self, text: &str) {
        let lines: Vec<String> = text.split('\n').map(str::to_string).collect();
        self.textarea = TextArea::new(lines);
        self.textarea.move_cursor(tui_textarea::CursorMove::Bottom);
        self.textarea.move_cursor(tui_textarea::CursorMove::End);
    }

    pub fn clear_input(&mut self) {
        self.textarea = TextArea::default();
    }

    pub fn set_status<S: Into<String>>(&mut self, s: S) {
        self.status = Some(s.into());
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    pub fn show_notice<S: Into<String>>(&mut self, kind: NoticeKind, text: S) {
        self.notice = Some(Notice {
            kind,
            text: text.into(),
        });
        self.auto_scroll = true;
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.auto_scroll = false;
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll_offset = self.scroll_offset.saturating_add(lines);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.auto_scroll = true;
    }

    /// Forget transient output from earlier turns.
    pub fn clear_transient(&mut self) {
        self.failed_turn = None;
        self.notice = None;
        self.status = None;
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}
