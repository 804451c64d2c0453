use std::{fmt::Display, str::FromStr};

use crate::commands::CommandError;

use super::invalid_argument;

/// A match identifier unique within a guild. Always lower-case.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchSlug(String);

impl FromStr for MatchSlug {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if s.is_empty() {
            return Err(invalid_argument("The match slug can't be empty.".to_string()));
        }

        let is_valid = s
            .chars()
            .all(|c| matches!(c, 'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_'));

        if is_valid {
            Ok(MatchSlug(s.to_ascii_lowercase()))
        } else {
            Err(invalid_argument(format!(
                "Invalid match slug: `{}`.\nIt can only contain a-z, 0-9, a dash (-) or an underscore (_).",
                s.escape_default()
            )))
        }
    }
}

impl From<MatchSlug> for String {
    fn from(value: MatchSlug) -> Self {
        value.0
    }
}

impl Display for MatchSlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for MatchSlug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::MatchSlug;

    #[test]
    fn simple() {
        assert_eq!(
            MatchSlug::from_str("friday-5v5_2").unwrap().as_ref(),
            "friday-5v5_2"
        );
    }

    #[test]
    fn lower_cased() {
        assert_eq!(
            MatchSlug::from_str("Sunday-Futsal").unwrap().as_ref(),
            "sunday-futsal"
        );
    }

    #[test]
    fn space_before_after() {
        assert!(MatchSlug::from_str("  almost-valid   ").is_ok());
    }

    #[test]
    fn space_in_middle() {
        assert!(MatchSlug::from_str("almost valid").is_err());
    }

    #[test]
    fn special_char() {
        assert!(MatchSlug::from_str("foo!bar").is_err());
    }

    #[test]
    fn empty() {
        assert!(MatchSlug::from_str("   ").is_err());
    }
}
