use poise::serenity_prelude::{ChannelId, GuildId, UserId};
use strum::IntoEnumIterator;
use thiserror::Error;
use time::{
    format_description::FormatItem, macros::format_description, Date, OffsetDateTime,
    PrimitiveDateTime,
};

use crate::{
    eligibility::{AgePolicy, GenderPolicy, SkillLevels},
    models::{types::UtcDateTime, Gender, MatchId, ParticipantId},
};

const DATETIME_FORMAT: &[FormatItem<'_>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]Z");
const DATE_FORMAT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

pub trait DBConvertible: Sized {
    type DBType;

    fn to_db(&self) -> Result<Self::DBType, DBToConversionError>;

    fn from_db(value: &Self::DBType) -> Result<Self, DBFromConversionError>;
}

#[derive(Debug, Error)]
pub enum DBFromConversionError {
    #[error("Failed to parse datetime: {0}")]
    DateTime(#[from] time::error::Parse),
    #[error("Failed to parse enum variant: {0}")]
    NoSuchVariant(String),
    #[error("Invalid number: {0}")]
    InvalidNumber(i64),
    #[error("Column {0} must be set")]
    MissingColumn(&'static str),
}

#[derive(Debug, Error)]
pub enum DBToConversionError {
    #[error("Failed to format datetime")]
    DateTime(#[from] time::error::Format),
    #[error("Number is too large to store: {0}")]
    NumberTooLarge(u64),
}

fn id_to_db(id: u64) -> Result<i64, DBToConversionError> {
    i64::try_from(id).map_err(|_| DBToConversionError::NumberTooLarge(id))
}

fn id_from_db(value: i64) -> Result<u64, DBFromConversionError> {
    u64::try_from(value).map_err(|_| DBFromConversionError::InvalidNumber(value))
}

/// Snowflakes are never zero, serenity panics on zero IDs.
fn snowflake_from_db(value: i64) -> Result<u64, DBFromConversionError> {
    match id_from_db(value)? {
        0 => Err(DBFromConversionError::InvalidNumber(value)),
        id => Ok(id),
    }
}

pub fn count_from_db(value: i64) -> Result<u32, DBFromConversionError> {
    u32::try_from(value).map_err(|_| DBFromConversionError::InvalidNumber(value))
}

impl DBConvertible for UtcDateTime {
    type DBType = String;

    fn to_db(&self) -> Result<Self::DBType, DBToConversionError> {
        let string = OffsetDateTime::from(*self).format(DATETIME_FORMAT)?;
        Ok(string)
    }

    fn from_db(db_value: &Self::DBType) -> Result<Self, DBFromConversionError> {
        let datetime = PrimitiveDateTime::parse(db_value, DATETIME_FORMAT)?;
        Ok(UtcDateTime::from(datetime.assume_utc()))
    }
}

impl DBConvertible for Date {
    type DBType = String;

    fn to_db(&self) -> Result<Self::DBType, DBToConversionError> {
        Ok(self.format(DATE_FORMAT)?)
    }

    fn from_db(value: &Self::DBType) -> Result<Self, DBFromConversionError> {
        Ok(Date::parse(value, DATE_FORMAT)?)
    }
}

impl DBConvertible for MatchId {
    type DBType = i64;

    fn to_db(&self) -> Result<Self::DBType, DBToConversionError> {
        id_to_db(self.0)
    }

    fn from_db(value: &Self::DBType) -> Result<Self, DBFromConversionError> {
        Ok(MatchId(id_from_db(*value)?))
    }
}

impl DBConvertible for ParticipantId {
    type DBType = i64;

    fn to_db(&self) -> Result<Self::DBType, DBToConversionError> {
        id_to_db(self.0)
    }

    fn from_db(value: &Self::DBType) -> Result<Self, DBFromConversionError> {
        Ok(ParticipantId(id_from_db(*value)?))
    }
}

impl DBConvertible for UserId {
    type DBType = i64;

    fn to_db(&self) -> Result<Self::DBType, DBToConversionError> {
        id_to_db(self.get())
    }

    fn from_db(value: &Self::DBType) -> Result<Self, DBFromConversionError> {
        Ok(UserId::new(snowflake_from_db(*value)?))
    }
}

impl DBConvertible for GuildId {
    type DBType = i64;

    fn to_db(&self) -> Result<Self::DBType, DBToConversionError> {
        id_to_db(self.get())
    }

    fn from_db(value: &Self::DBType) -> Result<Self, DBFromConversionError> {
        Ok(GuildId::new(snowflake_from_db(*value)?))
    }
}

impl DBConvertible for ChannelId {
    type DBType = i64;

    fn to_db(&self) -> Result<Self::DBType, DBToConversionError> {
        id_to_db(self.get())
    }

    fn from_db(value: &Self::DBType) -> Result<Self, DBFromConversionError> {
        Ok(ChannelId::new(snowflake_from_db(*value)?))
    }
}

impl DBConvertible for Gender {
    type DBType = String;

    fn to_db(&self) -> Result<Self::DBType, DBToConversionError> {
        Ok(self.as_ref().to_string())
    }

    fn from_db(value: &Self::DBType) -> Result<Self, DBFromConversionError> {
        Gender::iter()
            .find(|gender| gender.as_ref() == value.as_str())
            .ok_or_else(|| DBFromConversionError::NoSuchVariant(value.to_string()))
    }
}

impl DBConvertible for SkillLevels {
    type DBType = String;

    fn to_db(&self) -> Result<Self::DBType, DBToConversionError> {
        Ok(self.sorted().join(","))
    }

    fn from_db(value: &Self::DBType) -> Result<Self, DBFromConversionError> {
        Ok(SkillLevels::only(value.split(',')))
    }
}

/// Policy name and its optional pair of numbers, as stored in two or three columns.
pub type PolicyColumns = (String, Option<i64>, Option<i64>);

impl DBConvertible for GenderPolicy {
    type DBType = PolicyColumns;

    fn to_db(&self) -> Result<Self::DBType, DBToConversionError> {
        use GenderPolicy::*;

        Ok(match self {
            Mixed => ("Mixed".to_string(), None, None),
            MenOnly => ("MenOnly".to_string(), None, None),
            WomenOnly => ("WomenOnly".to_string(), None, None),
            Ratio { men, women } => (
                "Ratio".to_string(),
                Some(i64::from(*men)),
                Some(i64::from(*women)),
            ),
        })
    }

    fn from_db(value: &Self::DBType) -> Result<Self, DBFromConversionError> {
        let (policy, men, women) = value;

        match policy.as_str() {
            "Mixed" => Ok(GenderPolicy::Mixed),
            "MenOnly" => Ok(GenderPolicy::MenOnly),
            "WomenOnly" => Ok(GenderPolicy::WomenOnly),
            "Ratio" => {
                let men = men.ok_or(DBFromConversionError::MissingColumn("ratio_men"))?;
                let women = women.ok_or(DBFromConversionError::MissingColumn("ratio_women"))?;

                Ok(GenderPolicy::Ratio {
                    men: count_from_db(men)?,
                    women: count_from_db(women)?,
                })
            }

            unknown => Err(DBFromConversionError::NoSuchVariant(unknown.to_string())),
        }
    }
}

impl DBConvertible for AgePolicy {
    type DBType = PolicyColumns;

    fn to_db(&self) -> Result<Self::DBType, DBToConversionError> {
        use AgePolicy::*;

        Ok(match self {
            NoRestriction => ("NoRestriction".to_string(), None, None),
            Under18 => ("Under18".to_string(), None, None),
            Over18 => ("Over18".to_string(), None, None),
            CustomRange { min, max } => (
                "CustomRange".to_string(),
                min.map(i64::from),
                max.map(i64::from),
            ),
        })
    }

    fn from_db(value: &Self::DBType) -> Result<Self, DBFromConversionError> {
        let (policy, min, max) = value;

        match policy.as_str() {
            "NoRestriction" => Ok(AgePolicy::NoRestriction),
            "Under18" => Ok(AgePolicy::Under18),
            "Over18" => Ok(AgePolicy::Over18),
            "CustomRange" => Ok(AgePolicy::CustomRange {
                min: min.map(count_from_db).transpose()?,
                max: max.map(count_from_db).transpose()?,
            }),

            unknown => Err(DBFromConversionError::NoSuchVariant(unknown.to_string())),
        }
    }
}
