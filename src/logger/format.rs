//! Console/file rendering of log lines
//!
//! Console lines get a dimmed time prefix, a colored fixed-width tag column and
//! a level column; long messages wrap at word boundaries under the message
//! column. File lines carry the same content without ANSI codes.

use super::file::write_to_file;
use super::tags::LogTag;
use chrono::Local;
use colored::*;
use std::io::{stdout, ErrorKind, Write};

const TAG_WIDTH: usize = 10;
const LEVEL_WIDTH: usize = 8;
/// `[TAG] [LEVEL] ` including brackets and spaces
const PREFIX_WIDTH: usize = TAG_WIDTH + LEVEL_WIDTH + 6;
const MAX_LINE_LENGTH: usize = 140;
const MIN_MESSAGE_WIDTH: usize = 40;

pub fn format_and_log(tag: LogTag, level: &str, message: &str) {
    let now = Local::now();
    let time = now.format("%H:%M:%S").to_string();
    let timestamp = now.format("%Y-%m-%d %H:%M:%S").to_string();

    let width = MAX_LINE_LENGTH
        .saturating_sub(PREFIX_WIDTH + time.len() + 1)
        .max(MIN_MESSAGE_WIDTH);
    let chunks = wrap_text(message, width);

    let head = format!(
        "{} [{}] [{}] ",
        time.dimmed(),
        format_tag(&tag),
        format_level(level)
    );
    let indent = " ".repeat(time.len() + 1 + PREFIX_WIDTH);
    let plain_tag = tag.to_plain_string();

    for (i, chunk) in chunks.iter().enumerate() {
        if i == 0 {
            print_stdout_safe(&format!("{}{}", head, chunk));
        } else {
            print_stdout_safe(&format!("{}{}", indent, chunk));
        }
        write_to_file(&format!("{} [{}] [{}] {}", timestamp, plain_tag, level, chunk));
    }
}

fn format_tag(tag: &LogTag) -> ColoredString {
    let label = format!("{:<width$}", tag.to_plain_string(), width = TAG_WIDTH);
    match tag {
        LogTag::System => label.bright_yellow().bold(),
        LogTag::Api => label.bright_purple().bold(),
        LogTag::Cache => label.bright_cyan().bold(),
        LogTag::Tools => label.bright_green().bold(),
        LogTag::Webserver => label.bright_blue().bold(),
        LogTag::Config => label.bright_white().bold(),
        LogTag::Test => label.blue().bold(),
        LogTag::Other(_) => label.white().bold(),
    }
}

fn format_level(level: &str) -> ColoredString {
    let label = format!("{:<width$}", level, width = LEVEL_WIDTH);
    match level {
        "ERROR" => label.bright_red().bold(),
        "WARNING" => label.yellow().bold(),
        "DEBUG" | "VERBOSE" => label.dimmed(),
        _ => label.white().bold(),
    }
}

/// Print to stdout, exiting quietly when the reader went away
fn print_stdout_safe(line: &str) {
    let mut out = stdout().lock();
    let result = writeln!(out, "{}", line).and_then(|_| out.flush());
    if let Err(e) = result {
        if e.kind() == ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
        let _ = writeln!(std::io::stderr(), "Logger stdout error: {}", e);
    }
}

/// Wrap at word boundaries, keeping explicit newlines; words longer than the
/// width are split by character count.
pub(crate) fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for raw in text.split('\n') {
        if raw.chars().count() <= width {
            lines.push(raw.to_string());
            continue;
        }

        let mut current = String::new();
        for word in raw.split_whitespace() {
            let word_len = word.chars().count();
            let current_len = current.chars().count();

            if word_len > width {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let chars: Vec<char> = word.chars().collect();
                for piece in chars.chunks(width) {
                    lines.push(piece.iter().collect());
                }
            } else if current.is_empty() {
                current.push_str(word);
            } else if current_len + 1 + word_len <= width {
                current.push(' ');
                current.push_str(word);
            } else {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_short_line_untouched() {
        assert_eq!(wrap_text("cache hit", 40), vec!["cache hit".to_string()]);
    }

    #[test]
    fn test_wrap_at_word_boundary() {
        let lines = wrap_text("alpha beta gamma delta", 11);
        assert_eq!(lines, vec!["alpha beta", "gamma delta"]);
    }

    #[test]
    fn test_wrap_splits_long_word_and_keeps_newlines() {
        let lines = wrap_text("abcdefghij\nxy", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij", "xy"]);
    }
}
