use crate::core::app::{App, NoticeKind};
use crate::core::message::Role;
use crate::core::persona::Persona;
use crate::core::settings::ModelChoice;
use crate::ui::wrap::wrap_text;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const SIDEBAR_WIDTH: u16 = 30;
const MAX_INPUT_LINES: u16 = 6;
const USER_PREFIX: &str = "You: ";

pub fn ui(f: &mut Frame, app: &mut App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
        .split(f.area());

    render_sidebar(f, app, columns[0]);

    let input_lines = (app.ui.textarea.lines().len() as u16).clamp(1, MAX_INPUT_LINES);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(input_lines + 2),
        ])
        .split(columns[1]);

    render_transcript(f, app, rows[0]);
    render_status(f, app, rows[1]);
    render_input(f, app, rows[2]);
}

fn render_transcript(f: &mut Frame, app: &mut App, area: Rect) {
    let title = format!(
        "Parley v{} - {} ({})",
        env!("CARGO_PKG_VERSION"),
        app.session.persona().display_name(),
        app.settings.model()
    );
    let block = Block::default().title(title);
    let inner = block.inner(area);

    let lines = build_transcript_lines(app, inner.width);
    let total = row_count(lines.len());
    let max_offset = total.saturating_sub(inner.height);
    if app.ui.auto_scroll || app.ui.scroll_offset >= max_offset {
        app.ui.scroll_offset = max_offset;
        app.ui.auto_scroll = true;
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((app.ui.scroll_offset, 0));
    f.render_widget(paragraph, area);
}

/// Row count for scroll math, saturating at what ratatui can address.
fn row_count(rows: usize) -> u16 {
    u16::try_from(rows).unwrap_or(u16::MAX)
}

/// Every visual row of the transcript pane, pre-wrapped to `width`.
pub fn build_transcript_lines(app: &App, width: u16) -> Vec<Line<'static>> {
    let width = usize::from(width);
    let user_style = Style::default().fg(Color::Cyan);
    let dim_style = Style::default().fg(Color::DarkGray);
    let mut lines = Vec::new();

    if app.session.is_empty() && app.ui.pending.is_none() && app.ui.failed_turn.is_none() {
        lines.push(Line::from(Span::styled(
            format!(
                "{} is ready. Type a message and press Enter, or /help.",
                app.session.persona().display_name()
            ),
            dim_style,
        )));
        lines.push(Line::from(""));
    }

    for message in app.session.history() {
        match message.role() {
            Role::User => push_user_lines(&mut lines, message.content(), width, user_style),
            _ => push_plain_lines(&mut lines, message.content(), width, Style::default()),
        }
        lines.push(Line::from(""));
    }

    if let Some(pending) = &app.ui.pending {
        let text = if pending.text.is_empty() {
            "…".to_string()
        } else {
            format!("{}▌", pending.text)
        };
        push_plain_lines(&mut lines, &text, width, Style::default());
        lines.push(Line::from(""));
    }

    if let Some(failed) = &app.ui.failed_turn {
        push_user_lines(&mut lines, &failed.prompt, width, dim_style);
        if !failed.partial.is_empty() {
            push_plain_lines(&mut lines, &failed.partial, width, dim_style);
        }
        push_plain_lines(
            &mut lines,
            &format!("Error: {}", failed.error),
            width,
            Style::default().fg(Color::Red),
        );
        lines.push(Line::from(""));
    }

    if let Some(notice) = &app.ui.notice {
        let style = match notice.kind {
            NoticeKind::Info => Style::default().fg(Color::Gray),
            NoticeKind::Error => Style::default().fg(Color::Red),
        };
        push_plain_lines(&mut lines, &notice.text, width, style);
        lines.push(Line::from(""));
    }

    lines
}

fn push_user_lines(lines: &mut Vec<Line<'static>>, content: &str, width: usize, style: Style) {
    let prefix_style = style.add_modifier(Modifier::BOLD);
    let wrapped = wrap_text(content, width.saturating_sub(USER_PREFIX.len()));
    for (i, row) in wrapped.into_iter().enumerate() {
        let prefix = if i == 0 {
            USER_PREFIX.to_string()
        } else {
            " ".repeat(USER_PREFIX.len())
        };
        lines.push(Line::from(vec![
            Span::styled(prefix, prefix_style),
            Span::styled(row, style),
        ]));
    }
}

fn push_plain_lines(lines: &mut Vec<Line<'static>>, content: &str, width: usize, style: Style) {
    for row in wrap_text(content, width) {
        lines.push(Line::from(Span::styled(row, style)));
    }
}

fn render_status(f: &mut Frame, app: &App, area: Rect) {
    let text = match (&app.ui.status, &app.ui.pending) {
        (Some(status), _) => status.clone(),
        (None, Some(_)) => "Receiving reply...".to_string(),
        (None, None) => String::new(),
    };
    f.render_widget(
        Paragraph::new(text).style(Style::default().fg(Color::Yellow)),
        area,
    );
}

fn render_input(f: &mut Frame, app: &mut App, area: Rect) {
    let title = if app.is_streaming() {
        "Waiting for reply (Ctrl+C to quit)"
    } else {
        "Type your message (Enter to send, Alt+Enter for new line, /help)"
    };
    app.ui.textarea.set_block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(&app.ui.textarea, area);
}

fn render_sidebar(f: &mut Frame, app: &App, area: Rect) {
    let lines = build_sidebar_lines(app);
    let block = Block::default().borders(Borders::RIGHT).title("Settings");
    f.render_widget(Paragraph::new(lines).block(block), area);
}

/// Selectors, counters and key hints shown to the left of the transcript.
pub fn build_sidebar_lines(app: &App) -> Vec<Line<'static>> {
    let heading = Style::default().add_modifier(Modifier::BOLD);
    let selected = Style::default()
        .fg(Color::Green)
        .add_modifier(Modifier::BOLD);
    let hint = Style::default().fg(Color::DarkGray);
    let mut lines = Vec::new();

    lines.push(Line::from(Span::styled("Model  [F2]", heading)));
    for model in ModelChoice::ALL {
        lines.push(option_line(
            model.id(),
            model == app.settings.model(),
            selected,
        ));
    }
    lines.push(Line::from(""));

    lines.push(Line::from(vec![
        Span::styled("Temperature  ", heading),
        Span::raw(format!("{:.1}", app.settings.temperature())),
    ]));
    lines.push(Line::from(Span::styled("  F3 lower, F4 raise", hint)));
    lines.push(Line::from(vec![
        Span::styled("Max tokens   ", heading),
        Span::raw(app.settings.max_tokens().to_string()),
    ]));
    lines.push(Line::from(Span::styled("  F5 lower, F6 raise", hint)));
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled("Persona  [F7]", heading)));
    for persona in Persona::ALL {
        lines.push(option_line(
            persona.display_name(),
            persona == app.session.persona(),
            selected,
        ));
    }
    lines.push(Line::from(Span::styled("  F8 reset conversation", hint)));
    lines.push(Line::from(""));

    let stats = app.session.stats();
    lines.push(Line::from(Span::styled("Conversation", heading)));
    lines.push(Line::from(format!("  Messages: {}", stats.total_messages)));
    lines.push(Line::from(format!("  Your messages: {}", stats.user_messages)));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Ctrl+S export, /help", hint)));

    lines
}

fn option_line(label: &str, is_selected: bool, selected_style: Style) -> Line<'static> {
    if is_selected {
        Line::from(Span::styled(format!("> {label}"), selected_style))
    } else {
        Line::from(format!("  {label}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::app::{apply_action, AppAction};
    use crate::core::chat_stream::{StreamError, StreamErrorKind};
    use crate::utils::test_utils::{complete_test_turn, create_test_app};
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn row_count_saturates_instead_of_wrapping() {
        assert_eq!(row_count(42), 42);
        assert_eq!(row_count(usize::from(u16::MAX)), u16::MAX);
        assert_eq!(row_count(70_000), u16::MAX);
    }

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    fn all_text(lines: &[Line<'_>]) -> Vec<String> {
        lines.iter().map(line_text).collect()
    }

    #[test]
    fn transcript_prefixes_user_messages() {
        let mut app = create_test_app();
        complete_test_turn(&mut app, "Hello", "Hi there!");

        let text = all_text(&build_transcript_lines(&app, 40));
        assert_eq!(text, vec!["You: Hello", "", "Hi there!", ""]);
    }

    #[test]
    fn wrapped_user_lines_are_indented() {
        let mut app = create_test_app();
        complete_test_turn(&mut app, "one two three four", "ok");

        let text = all_text(&build_transcript_lines(&app, 14));
        assert_eq!(text[0], "You: one two");
        assert_eq!(text[1], "     three");
        assert_eq!(text[2], "     four");
    }

    #[test]
    fn pending_reply_is_rendered_with_cursor() {
        let mut app = create_test_app();
        apply_action(
            &mut app,
            AppAction::SubmitMessage {
                message: "Hello".to_string(),
            },
        );
        apply_action(
            &mut app,
            AppAction::AppendResponseChunk {
                content: "Hi".to_string(),
            },
        );

        let text = all_text(&build_transcript_lines(&app, 40));
        assert!(text.contains(&"Hi▌".to_string()));
    }

    #[test]
    fn failed_turn_shows_error_label() {
        let mut app = create_test_app();
        apply_action(
            &mut app,
            AppAction::SubmitMessage {
                message: "Hello".to_string(),
            },
        );
        apply_action(
            &mut app,
            AppAction::StreamErrored {
                error: StreamError::new(StreamErrorKind::Authentication, "HTTP 401: bad key"),
            },
        );

        let text = all_text(&build_transcript_lines(&app, 80));
        assert!(text
            .iter()
            .any(|line| line == "Error: Authentication error — HTTP 401: bad key"));
    }

    #[test]
    fn sidebar_shows_selection_and_counters() {
        let mut app = create_test_app();
        complete_test_turn(&mut app, "Hello", "Hi");
        complete_test_turn(&mut app, "Again", "Sure");

        let text = all_text(&build_sidebar_lines(&app));
        assert!(text.contains(&"> gpt-4o-mini".to_string()));
        assert!(text.contains(&"> Friendly mentor".to_string()));
        assert!(text.contains(&"  Messages: 4".to_string()));
        assert!(text.contains(&"  Your messages: 2".to_string()));
    }

    #[test]
    fn full_frame_renders_without_panicking() {
        let mut app = create_test_app();
        for i in 0..30 {
            complete_test_turn(&mut app, &format!("question {i}"), &format!("answer {i}"));
        }
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).expect("terminal");
        terminal.draw(|f| ui(f, &mut app)).expect("draw");
        assert!(app.ui.auto_scroll);
        assert!(app.ui.scroll_offset > 0);
    }
}
