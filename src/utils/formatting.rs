use std::fmt::Display;

use time::macros::format_description;
use time::{format_description, OffsetDateTime, UtcOffset};

const DATETIME_FORMAT: &[format_description::FormatItem<'_>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]");

/// Discord rejects messages longer than this, in characters.
pub const MESSAGE_LIMIT: usize = 2000;

/// Discord timestamp markup styles, rendered in the reader's own time zone.
pub enum TimestampStyle {
    /// Short date/time, e.g. `20 April 2021 16:20`
    ShortDateTime,
    /// Relative time, e.g. `in 2 hours`
    RelativeTime,
}

impl Display for TimestampStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use TimestampStyle::*;

        let suffix = match self {
            ShortDateTime => "f",
            RelativeTime => "R",
        };
        f.write_str(suffix)
    }
}

pub fn timestamp(date_time: impl Into<OffsetDateTime>, style: TimestampStyle) -> String {
    let date_time: OffsetDateTime = date_time.into();
    let unix_timestamp = date_time.unix_timestamp();
    format!("<t:{unix_timestamp}:{style}>")
}

pub fn format_utc(date_time: impl Into<OffsetDateTime>) -> String {
    let offset_date_time: OffsetDateTime = date_time.into();
    let offset_date_time = offset_date_time.to_offset(UtcOffset::UTC);
    offset_date_time
        .format(DATETIME_FORMAT)
        .unwrap_or_else(|_| offset_date_time.to_string())
}

pub fn format_local(date_time: impl Into<OffsetDateTime>) -> String {
    timestamp(date_time, TimestampStyle::ShortDateTime)
}

pub fn format_relative(date_time: impl Into<OffsetDateTime>) -> String {
    timestamp(date_time, TimestampStyle::RelativeTime)
}

/// Splits `text` into messages Discord will accept, breaking between lines.
/// Only a single line longer than [`MESSAGE_LIMIT`] is cut in the middle.
pub fn split_message(text: &str) -> Vec<String> {
    split_message_at(text, MESSAGE_LIMIT)
}

fn split_message_at(text: &str, limit: usize) -> Vec<String> {
    let mut messages = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split_inclusive('\n') {
        for piece in split_line(line, limit) {
            let piece_len = piece.chars().count();

            if current_len + piece_len > limit {
                messages.push(std::mem::take(&mut current));
                current_len = 0;
            }

            current.push_str(piece);
            current_len += piece_len;
        }
    }
    messages.push(current);

    messages.retain(|message| !message.trim().is_empty());
    messages
}

fn split_line(line: &str, limit: usize) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut rest = line;

    while let Some((at, _)) = rest.char_indices().nth(limit) {
        pieces.push(&rest[..at]);
        rest = &rest[at..];
    }
    pieces.push(rest);

    pieces
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::{format_local, format_relative, format_utc, split_message, split_message_at};

    #[test]
    fn utc_ignores_the_offset() {
        assert_eq!(format_utc(datetime!(2024-05-17 20:15 +2)), "2024-05-17 18:15");
    }

    #[test]
    fn discord_markup() {
        assert_eq!(
            format_local(datetime!(2021-04-20 16:20 UTC)),
            "<t:1618935600:f>"
        );
        assert_eq!(
            format_relative(datetime!(2021-04-20 16:20 UTC)),
            "<t:1618935600:R>"
        );
    }

    #[test]
    fn short_message_is_kept_whole() {
        assert_eq!(split_message("# Title\n - one\n"), vec!["# Title\n - one\n"]);
        assert!(split_message("").is_empty());
    }

    #[test]
    fn splits_between_lines() {
        assert_eq!(
            split_message_at("aaa\nbbb\ncc\n", 8),
            vec!["aaa\nbbb\n", "cc\n"]
        );
    }

    #[test]
    fn cuts_an_overlong_line() {
        assert_eq!(
            split_message_at("ab\nčččččč\n", 4),
            vec!["ab\n", "čččč", "čč\n"]
        );
    }
}
