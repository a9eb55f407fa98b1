//! Word wrapping for transcript display.
//!
//! Lines are wrapped up front so the renderer knows the exact number of
//! visual rows, which the scroll arithmetic depends on.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Wrap `text` to `width` display columns.
///
/// Explicit newlines are kept. Words wider than a whole line are split at the
/// column limit. A zero width disables wrapping.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for source_line in text.split('\n') {
        if width == 0 {
            lines.push(source_line.to_string());
            continue;
        }
        wrap_line(source_line.trim_end_matches('\r'), width, &mut lines);
    }
    lines
}

fn wrap_line(line: &str, width: usize, out: &mut Vec<String>) {
    let mut current = String::new();
    let mut current_width = 0;

    for word in line.split(' ') {
        let word_width = word.width();

        if current_width > 0 && current_width + 1 + word_width > width {
            out.push(std::mem::take(&mut current));
            current_width = 0;
        }

        if current_width > 0 {
            current.push(' ');
            current_width += 1;
        }

        if word_width <= width - current_width {
            current.push_str(word);
            current_width += word_width;
            continue;
        }

        for ch in word.chars() {
            let ch_width = ch.width().unwrap_or(0);
            if current_width + ch_width > width && current_width > 0 {
                out.push(std::mem::take(&mut current));
                current_width = 0;
            }
            current.push(ch);
            current_width += ch_width;
        }
    }

    out.push(current);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_a_single_line() {
        assert_eq!(wrap_text("hello world", 20), vec!["hello world"]);
    }

    #[test]
    fn wraps_at_word_boundaries() {
        assert_eq!(
            wrap_text("the quick brown fox jumps", 10),
            vec!["the quick", "brown fox", "jumps"]
        );
    }

    #[test]
    fn keeps_explicit_newlines_and_blank_lines() {
        assert_eq!(wrap_text("one\n\ntwo", 10), vec!["one", "", "two"]);
    }

    #[test]
    fn splits_words_longer_than_the_width() {
        assert_eq!(wrap_text("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn measures_wide_characters_by_display_width() {
        // Each of these occupies two columns.
        let lines = wrap_text("안녕하세요", 4);
        assert_eq!(lines, vec!["안녕", "하세", "요"]);
        assert!(lines.iter().all(|line| line.width() <= 4));
    }

    #[test]
    fn zero_width_disables_wrapping() {
        assert_eq!(wrap_text("a b c", 0), vec!["a b c"]);
    }
}
