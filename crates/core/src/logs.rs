//! Log tail formatting for in-progress renders.
//!
//! The queue reports the full, ever-growing log of a running job on
//! every poll. Only a short tail of it is worth showing, and anything
//! sent to the chat host must stay under its message-size ceiling.

use serde::{Deserialize, Deserializer, Serialize};

/// Default number of log lines shown under an in-progress message.
pub const DEFAULT_MAX_LOG_LINES: usize = 10;

/// Texts at or above this many characters are truncated before display.
pub const WRAP_THRESHOLD: usize = 1500;
/// Characters kept from the start of a truncated text.
pub const WRAP_HEAD_CHARS: usize = 300;
/// Characters kept from the end of a truncated text.
pub const WRAP_TAIL_CHARS: usize = 1200;
/// Marker inserted where a truncated text was cut.
pub const ELISION_MARKER: &str = "[...]";

/// One log record reported by a running job.
///
/// Only `message` is interpreted; every other field the queue sends is
/// kept verbatim in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(default, deserialize_with = "message_as_text")]
    pub message: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl LogEntry {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            extra: serde_json::Map::new(),
        }
    }
}

/// `null` reads as empty; numbers, booleans and structures keep their JSON text.
fn message_as_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(text) => text,
        other => other.to_string(),
    })
}

/// Reduce a log sequence to its last `max_lines` non-blank lines.
///
/// Only the last `2 * max_lines` entries are inspected, so the cost stays
/// bounded however long the job has been running. Multi-line messages are
/// split before counting. Returns an empty string when nothing survives;
/// callers must then omit the log block entirely.
pub fn format_logs(logs: &[LogEntry], max_lines: usize) -> String {
    let window = max_lines.saturating_mul(2);
    let start = logs.len().saturating_sub(window);

    let kept: Vec<&str> = logs[start..]
        .iter()
        .flat_map(|log| log.message.lines())
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .collect();

    let skip = kept.len().saturating_sub(max_lines);
    kept[skip..].join("\n")
}

/// Wrap text in a fenced code block, cutting out the middle of long texts.
///
/// Texts of [`WRAP_THRESHOLD`] characters or more keep their first
/// [`WRAP_HEAD_CHARS`] and last [`WRAP_TAIL_CHARS`] characters joined by
/// [`ELISION_MARKER`]. Lengths are counted in chars, never bytes.
pub fn wrap_source_code(source: &str) -> String {
    let len = source.chars().count();
    if len < WRAP_THRESHOLD {
        return format!("```\n{source}```");
    }

    let head: String = source.chars().take(WRAP_HEAD_CHARS).collect();
    let tail: String = source.chars().skip(len - WRAP_TAIL_CHARS).collect();
    format!("```\n{head}{ELISION_MARKER}{tail}```")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(messages: &[&str]) -> Vec<LogEntry> {
        messages.iter().map(|m| LogEntry::new(*m)).collect()
    }

    #[test]
    fn empty_logs_format_to_empty_text() {
        assert_eq!(format_logs(&[], DEFAULT_MAX_LOG_LINES), "");
    }

    #[test]
    fn blank_only_logs_format_to_empty_text() {
        let logs = entries(&["", "   ", "\t\n"]);
        assert_eq!(format_logs(&logs, DEFAULT_MAX_LOG_LINES), "");
    }

    #[test]
    fn short_logs_are_joined_in_order() {
        let logs = entries(&["loading model", "", "step 1/30"]);
        assert_eq!(format_logs(&logs, 10), "loading model\nstep 1/30");
    }

    #[test]
    fn tail_of_fifteen_with_blanks_is_bounded() {
        let mut messages: Vec<String> = (0..15).map(|i| format!("line {i}")).collect();
        messages[3] = String::new();
        messages[9] = "  ".to_string();
        messages[14] = String::new();
        let logs: Vec<LogEntry> = messages.iter().map(LogEntry::new).collect();

        let formatted = format_logs(&logs, 10);
        let lines: Vec<&str> = formatted.lines().collect();

        assert_eq!(lines.len(), 10);
        assert!(lines.iter().all(|l| !l.trim().is_empty()));
        assert_eq!(lines.first(), Some(&"line 2"));
        assert_eq!(lines.last(), Some(&"line 13"));
    }

    #[test]
    fn only_the_lookback_window_is_inspected() {
        // 30 entries, max 2: only the last 4 are considered and they are blank
        // except one, so earlier non-blank lines must not leak in.
        let mut messages: Vec<String> = (0..26).map(|i| format!("old {i}")).collect();
        messages.extend(["", "fresh", "", ""].map(String::from));
        let logs: Vec<LogEntry> = messages.iter().map(LogEntry::new).collect();

        assert_eq!(format_logs(&logs, 2), "fresh");
    }

    #[test]
    fn trailing_newlines_do_not_produce_blank_lines() {
        let logs = entries(&["first\n", "second\r\n"]);
        assert_eq!(format_logs(&logs, 10), "first\nsecond");
    }

    #[test]
    fn multi_line_messages_count_per_line() {
        let logs = entries(&["a\n\nb", "c\n   \nd"]);
        assert_eq!(format_logs(&logs, 1), "d");
        assert_eq!(format_logs(&logs, 3), "b\nc\nd");
        assert_eq!(format_logs(&logs, 10), "a\nb\nc\nd");
    }

    #[test]
    fn zero_max_lines_yields_nothing() {
        let logs = entries(&["a", "b"]);
        assert_eq!(format_logs(&logs, 0), "");
    }

    #[test]
    fn log_entry_keeps_unknown_fields() {
        let json = r#"{"message":"hi","level":"INFO","timestamp":"2024-01-01T00:00:00"}"#;
        let entry: LogEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.message, "hi");
        assert_eq!(entry.extra["level"], "INFO");
    }

    #[test]
    fn log_entry_without_message_reads_as_empty() {
        let entry: LogEntry = serde_json::from_str(r#"{"level":"DEBUG"}"#).unwrap();
        assert_eq!(entry.message, "");
        let entry: LogEntry = serde_json::from_str(r#"{"message":null}"#).unwrap();
        assert_eq!(entry.message, "");
    }

    #[test]
    fn non_string_message_is_kept_as_json_text() {
        let entry: LogEntry = serde_json::from_str(r#"{"message":42}"#).unwrap();
        assert_eq!(entry.message, "42");
        let entry: LogEntry = serde_json::from_str(r#"{"message":{"step":3}}"#).unwrap();
        assert_eq!(entry.message, r#"{"step":3}"#);
    }

    #[test]
    fn short_text_is_fenced_unchanged() {
        assert_eq!(wrap_source_code("hello"), "```\nhello```");
    }

    #[test]
    fn text_just_below_threshold_is_not_truncated() {
        let text = "a".repeat(WRAP_THRESHOLD - 1);
        let wrapped = wrap_source_code(&text);
        assert!(!wrapped.contains(ELISION_MARKER));
        assert_eq!(wrapped, format!("```\n{text}```"));
    }

    #[test]
    fn long_text_keeps_head_and_tail() {
        let text: String = (0..2000).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
        let wrapped = wrap_source_code(&text);

        let body = wrapped
            .strip_prefix("```\n")
            .and_then(|s| s.strip_suffix("```"))
            .unwrap();
        let (head, tail) = body.split_once(ELISION_MARKER).unwrap();

        assert_eq!(head, &text[..WRAP_HEAD_CHARS]);
        assert_eq!(tail, &text[text.len() - WRAP_TAIL_CHARS..]);
        assert_eq!(
            body.chars().count(),
            WRAP_HEAD_CHARS + ELISION_MARKER.len() + WRAP_TAIL_CHARS
        );
    }

    #[test]
    fn truncation_counts_chars_not_bytes() {
        let text = "é".repeat(WRAP_THRESHOLD);
        let wrapped = wrap_source_code(&text);
        assert!(wrapped.contains(ELISION_MARKER));
        assert!(wrapped.starts_with("```\né"));
    }
}
