//! Manual transcript export.
//!
//! [`render_transcript`] is a pure transform of the retained history. Writing
//! the result is a separate, explicit step driven by the user.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::info;

use crate::core::message::Message;

pub const DEFAULT_EXPORT_FILENAME: &str = "chat_history.md";

#[derive(Debug)]
pub enum TranscriptError {
    Empty,
    AlreadyExists(PathBuf),
    Io(std::io::Error),
}

impl fmt::Display for TranscriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranscriptError::Empty => {
                write!(f, "No conversation to export - the chat history is empty.")
            }
            TranscriptError::AlreadyExists(path) => write!(
                f,
                "File '{}' already exists. Use /export <filename> to pick another name.",
                path.display()
            ),
            TranscriptError::Io(err) => write!(f, "Failed to write transcript: {err}"),
        }
    }
}

impl std::error::Error for TranscriptError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TranscriptError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TranscriptError {
    fn from(err: std::io::Error) -> Self {
        TranscriptError::Io(err)
    }
}

/// Render the history as `**role**: content` entries separated by blank lines.
/// Returns `None` for an empty history, which has nothing to export.
pub fn render_transcript(history: &[Message]) -> Option<String> {
    if history.is_empty() {
        return None;
    }

    let entries: Vec<String> = history
        .iter()
        .map(|message| format!("**{}**: {}", message.role(), message.content()))
        .collect();
    Some(entries.join("\n\n"))
}

/// Write the rendered history to `path`, refusing to replace an existing file.
pub fn export_transcript(history: &[Message], path: &Path) -> Result<(), TranscriptError> {
    let contents = render_transcript(history).ok_or(TranscriptError::Empty)?;

    if path.exists() {
        return Err(TranscriptError::AlreadyExists(path.to_path_buf()));
    }

    let parent = path.parent().filter(|dir| !dir.as_os_str().is_empty());
    let mut temp_file = match parent {
        Some(dir) => NamedTempFile::new_in(dir)?,
        None => NamedTempFile::new_in(".")?,
    };
    temp_file.write_all(contents.as_bytes())?;
    temp_file.as_file_mut().sync_all()?;
    temp_file
        .persist_noclobber(path)
        .map_err(|err| match err.error.kind() {
            std::io::ErrorKind::AlreadyExists => TranscriptError::AlreadyExists(path.to_path_buf()),
            _ => TranscriptError::Io(err.error),
        })?;

    info!(path = %path.display(), messages = history.len(), "transcript exported");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn sample_history() -> Vec<Message> {
        vec![
            Message::user("Hello"),
            Message::assistant("Hi there!"),
            Message::user("How are you?"),
            Message::assistant("Doing well, thanks."),
        ]
    }

    #[test]
    fn render_labels_each_message_in_order() {
        let rendered = render_transcript(&sample_history()).expect("history is not empty");
        assert_eq!(
            rendered,
            "**user**: Hello\n\n**assistant**: Hi there!\n\n**user**: How are you?\n\n**assistant**: Doing well, thanks."
        );
    }

    #[test]
    fn render_produces_one_entry_per_message() {
        let history = sample_history();
        let rendered = render_transcript(&history).expect("history is not empty");
        assert_eq!(rendered.split("\n\n").count(), history.len());
    }

    #[test]
    fn render_returns_none_for_empty_history() {
        assert_eq!(render_transcript(&[]), None);
    }

    #[test]
    fn export_writes_rendered_transcript() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join(DEFAULT_EXPORT_FILENAME);

        export_transcript(&sample_history(), &path).expect("export should succeed");

        let written = fs::read_to_string(&path).expect("file should exist");
        assert_eq!(Some(written), render_transcript(&sample_history()));
    }

    #[test]
    fn export_refuses_to_overwrite() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("existing.md");
        fs::write(&path, "keep me").expect("seed file");

        let err = export_transcript(&sample_history(), &path).unwrap_err();
        assert!(matches!(err, TranscriptError::AlreadyExists(_)));
        assert_eq!(fs::read_to_string(&path).expect("file"), "keep me");
    }

    #[test]
    fn export_of_empty_history_writes_nothing() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("empty.md");

        let err = export_transcript(&[], &path).unwrap_err();
        assert!(matches!(err, TranscriptError::Empty));
        assert!(!path.exists());
    }
}
