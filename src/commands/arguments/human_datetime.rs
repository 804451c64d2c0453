use std::str::FromStr;

use lazy_regex::regex_captures;
use time::{Date, Month, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

use crate::commands::CommandError;

const EXAMPLE_1: &str = "2024-06-24 18:30 UTC+2";
const EXAMPLE_2: &str = "18:30";

fn invalid_argument(message: String) -> CommandError {
    super::invalid_argument(format!(
        "{message}\nDatetime examples: `{EXAMPLE_1}`, `{EXAMPLE_2}`."
    ))
}

/// Parses a `YYYY-MM-DD` token. Returns `None` if the token doesn't look like a date.
pub(super) fn parse_date_token(token: &str) -> Option<Result<Date, String>> {
    let (_, year, month, day) = regex_captures!(r"^(\d{4})-(\d{2})-(\d{2})$", token)?;

    let date = || -> Result<Date, String> {
        let year = year
            .parse()
            .map_err(|_| format!("Invalid year: `{year}`."))?;
        let month = month
            .parse::<u8>()
            .ok()
            .and_then(|month| Month::try_from(month).ok())
            .ok_or_else(|| format!("Invalid month: `{month}`."))?;
        let day = day.parse().map_err(|_| format!("Invalid day: `{day}`."))?;

        Date::from_calendar_date(year, month, day).map_err(|_| format!("Invalid date: `{token}`."))
    };

    Some(date())
}

/// A date-time as typed by a user, where any part may be left out.
#[derive(PartialEq, Eq, Debug)]
pub struct HumanDateTime {
    date: Option<Date>,
    time: Option<Time>,
    utc_offset: Option<UtcOffset>,
}

impl HumanDateTime {
    /// Fills in the missing parts: UTC for the offset, the date of `now` in that
    /// offset for the date, and midnight for the time.
    pub fn materialize(&self, now: OffsetDateTime) -> OffsetDateTime {
        let offset = self.utc_offset.unwrap_or(UtcOffset::UTC);
        let date = self.date.unwrap_or_else(|| now.to_offset(offset).date());
        let time = self.time.unwrap_or(Time::MIDNIGHT);

        PrimitiveDateTime::new(date, time).assume_offset(offset)
    }
}

impl FromStr for HumanDateTime {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut date = None;
        let mut time = None;
        let mut utc_offset = None;

        let tokens = s.split_whitespace().filter(|s| !s.is_empty());
        for token in tokens {
            if let Some(parsed) = parse_date_token(token) {
                if date.is_some() {
                    return Err(invalid_argument(format!("Duplicate date: `{token}`.")));
                }

                date = Some(parsed.map_err(invalid_argument)?);
            } else if let Some((_, hour, minute, _, second)) =
                regex_captures!(r"^(\d{2}):(\d{2})(:(\d{2}))?$", token)
            {
                if time.is_some() {
                    return Err(invalid_argument(format!("Duplicate time: `{token}`.")));
                }

                let hour = hour
                    .parse()
                    .map_err(|_| invalid_argument(format!("Invalid hour: `{hour}`.")))?;
                let minute = minute
                    .parse()
                    .map_err(|_| invalid_argument(format!("Invalid minute: `{minute}`.")))?;
                let second = if second.is_empty() {
                    0
                } else {
                    second
                        .parse()
                        .map_err(|_| invalid_argument(format!("Invalid second: `{second}`.")))?
                };

                time = Some(
                    Time::from_hms(hour, minute, second)
                        .map_err(|_| invalid_argument(format!("Invalid time: `{token}`.")))?,
                );
            } else if let Some((_, _, sign, hour, _, minute)) =
                regex_captures!(r"^UTC(([+-])(\d{1,2})(:(\d{2}))?)?$", token)
            {
                if utc_offset.is_some() {
                    return Err(invalid_argument(format!(
                        "Duplicate UTC offset: `{token}`."
                    )));
                }

                utc_offset = if sign.is_empty() {
                    Some(UtcOffset::UTC)
                } else {
                    let sign = if sign == "+" { 1 } else { -1 };

                    let hour: i8 = hour
                        .parse()
                        .map_err(|_| invalid_argument(format!("Invalid hour: `{hour}`.")))?;
                    let minute: i8 = if minute.is_empty() {
                        0
                    } else {
                        minute.parse().map_err(|_| {
                            invalid_argument(format!("Invalid minute: `{minute}`."))
                        })?
                    };

                    Some(
                        UtcOffset::from_hms(hour * sign, minute * sign, 0).map_err(|_| {
                            invalid_argument(format!("Invalid UTC offset: `{token}`."))
                        })?,
                    )
                };
            } else {
                return Err(invalid_argument(format!("Invalid token: `{token}`.")));
            }
        }

        if let (None, None) = (date, time) {
            return Err(invalid_argument(
                "Neither date nor time is provided.".to_string(),
            ));
        }

        Ok(HumanDateTime {
            date,
            time,
            utc_offset,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use time::{
        macros::{date, datetime, offset, time},
        UtcOffset,
    };

    use super::{HumanDateTime, EXAMPLE_1, EXAMPLE_2};

    #[test]
    fn example_1() {
        assert_eq!(
            HumanDateTime::from_str(EXAMPLE_1).unwrap(),
            HumanDateTime {
                date: Some(date!(2024 - 06 - 24)),
                time: Some(time!(18:30)),
                utc_offset: Some(offset!(+2)),
            }
        );
    }

    #[test]
    fn example_2() {
        assert_eq!(
            HumanDateTime::from_str(EXAMPLE_2).unwrap(),
            HumanDateTime {
                date: None,
                time: Some(time!(18:30)),
                utc_offset: None,
            }
        );
    }

    #[test]
    fn negative_offset_with_minutes() {
        assert_eq!(
            HumanDateTime::from_str("2023-02-15 14:37 UTC-2:30").unwrap(),
            HumanDateTime {
                date: Some(date!(2023 - 02 - 15)),
                time: Some(time!(14:37)),
                utc_offset: Some(offset!(-2:30)),
            }
        );
    }

    #[test]
    fn date_utc() {
        assert_eq!(
            HumanDateTime::from_str("1987-02-18 UTC").unwrap(),
            HumanDateTime {
                date: Some(date!(1987 - 02 - 18)),
                time: None,
                utc_offset: Some(UtcOffset::UTC),
            }
        );
    }

    #[test]
    fn invalid_date() {
        assert!(HumanDateTime::from_str("2023-02-30 10:00").is_err());
        assert!(HumanDateTime::from_str("2023-13-01").is_err());
    }

    #[test]
    fn duplicates() {
        assert!(HumanDateTime::from_str("10:00 11:00").is_err());
        assert!(HumanDateTime::from_str("2023-01-01 2023-01-02").is_err());
    }

    #[test]
    fn only_offset() {
        assert!(HumanDateTime::from_str("UTC+2").is_err());
    }

    #[test]
    fn materialize_full() {
        let parsed = HumanDateTime::from_str(EXAMPLE_1).unwrap();

        assert_eq!(
            parsed.materialize(datetime!(2020-01-01 00:00 UTC)),
            datetime!(2024-06-24 16:30 UTC)
        );
    }

    #[test]
    fn materialize_time_takes_the_date_in_the_given_offset() {
        let parsed = HumanDateTime::from_str("09:00 UTC+3").unwrap();

        // 22:00 UTC is already the next day at UTC+3.
        assert_eq!(
            parsed.materialize(datetime!(2024-05-17 22:00 UTC)),
            datetime!(2024-05-18 09:00 +3)
        );
    }

    #[test]
    fn materialize_date_at_midnight_utc() {
        let parsed = HumanDateTime::from_str("2024-07-01").unwrap();

        assert_eq!(
            parsed.materialize(datetime!(2024-05-17 22:00 UTC)),
            datetime!(2024-07-01 00:00 UTC)
        );
    }
}
