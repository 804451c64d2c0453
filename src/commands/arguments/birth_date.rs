use std::str::FromStr;

use time::Date;

use crate::commands::CommandError;

use super::human_datetime::parse_date_token;

const EXAMPLE: &str = "1995-08-21";

fn invalid_argument(message: String) -> CommandError {
    super::invalid_argument(format!("{message}\nBirth date example: `{EXAMPLE}`."))
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct BirthDate(Date);

impl FromStr for BirthDate {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        match parse_date_token(s) {
            Some(date) => Ok(BirthDate(date.map_err(invalid_argument)?)),
            None => Err(invalid_argument(format!(
                "Invalid birth date: `{}`.",
                s.escape_default()
            ))),
        }
    }
}

impl From<BirthDate> for Date {
    fn from(value: BirthDate) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use time::{macros::date, Date};

    use super::{BirthDate, EXAMPLE};

    #[test]
    fn example() {
        assert_eq!(
            Date::from(BirthDate::from_str(EXAMPLE).unwrap()),
            date!(1995 - 08 - 21)
        );
    }

    #[test]
    fn leap_day() {
        assert!(BirthDate::from_str(" 2004-02-29 ").is_ok());
        assert!(BirthDate::from_str("2005-02-29").is_err());
    }

    #[test]
    fn not_a_date() {
        assert!(BirthDate::from_str("21.08.1995").is_err());
        assert!(BirthDate::from_str("1995-08-21 10:00").is_err());
    }
}
