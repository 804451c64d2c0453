use std::{collections::HashSet, convert::Infallible, fmt::Display, str::FromStr};

use thiserror::Error;

/// The skill level sentinel that lifts the skill restriction.
pub const ALL_SKILL_LEVELS: &str = "all";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenderPolicy {
    Mixed,
    MenOnly,
    WomenOnly,
    /// Target ratio of men to women, e.g. 2:1.
    Ratio { men: u32, women: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AgePolicy {
    NoRestriction,
    Under18,
    Over18,
    /// Inclusive bounds in whole years.
    CustomRange { min: Option<u32>, max: Option<u32> },
}

/// A set of allowed skill levels, compared case-insensitively.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkillLevels(HashSet<String>);

impl SkillLevels {
    pub fn all() -> SkillLevels {
        SkillLevels::only([ALL_SKILL_LEVELS])
    }

    pub fn only<I, S>(levels: I) -> SkillLevels
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        SkillLevels(
            levels
                .into_iter()
                .map(|level| level.as_ref().trim().to_lowercase())
                .filter(|level| !level.is_empty())
                .collect(),
        )
    }

    pub fn is_unrestricted(&self) -> bool {
        self.0.contains(ALL_SKILL_LEVELS)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn allows(&self, level: &str) -> bool {
        self.is_unrestricted() || self.0.contains(&level.trim().to_lowercase())
    }

    /// Levels in alphabetical order.
    pub fn sorted(&self) -> Vec<&str> {
        let mut levels: Vec<&str> = self.0.iter().map(String::as_str).collect();
        levels.sort_unstable();
        levels
    }
}

/// Parses a comma-separated list, e.g. `advanced, professional`.
impl FromStr for SkillLevels {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(SkillLevels::only(s.split(',')))
    }
}

impl Display for SkillLevels {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.sorted().join(", "))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchRestrictions {
    pub gender: GenderPolicy,
    pub age: AgePolicy,
    pub skill_levels: SkillLevels,
    pub max_players: u32,
    /// Advisory, never affects eligibility.
    pub team_balancing: bool,
}

impl MatchRestrictions {
    pub fn open(max_players: u32) -> MatchRestrictions {
        MatchRestrictions {
            gender: GenderPolicy::Mixed,
            age: AgePolicy::NoRestriction,
            skill_levels: SkillLevels::all(),
            max_players,
            team_balancing: false,
        }
    }

    /// Checks the restrictions an organizer submits when creating a match.
    ///
    /// The evaluator tolerates a custom age range without bounds, but a match
    /// should not be created with one.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.max_players == 0 {
            return Err(ConfigurationError::NoCapacity);
        }

        if let GenderPolicy::Ratio { men: 0, women: 0 } = self.gender {
            return Err(ConfigurationError::EmptyGenderRatio);
        }

        if let AgePolicy::CustomRange { min, max } = self.age {
            match (min, max) {
                (None, None) => return Err(ConfigurationError::EmptyAgeRange),
                (Some(min), Some(max)) if min > max => {
                    return Err(ConfigurationError::InvertedAgeRange { min, max })
                }
                _ => (),
            }
        }

        if self.skill_levels.is_empty() {
            return Err(ConfigurationError::NoSkillLevels);
        }

        Ok(())
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("The match must allow at least one player.")]
    NoCapacity,
    #[error("The gender ratio needs at least one men or women slot.")]
    EmptyGenderRatio,
    #[error("A custom age range needs a minimum age, a maximum age or both.")]
    EmptyAgeRange,
    #[error("The minimum age ({min}) is greater than the maximum age ({max}).")]
    InvertedAgeRange { min: u32, max: u32 },
    #[error("At least one skill level must be allowed, use `all` to allow everyone.")]
    NoSkillLevels,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{AgePolicy, ConfigurationError, GenderPolicy, MatchRestrictions, SkillLevels};

    #[test]
    fn open_restrictions_are_valid() {
        assert_eq!(MatchRestrictions::open(10).validate(), Ok(()));
    }

    #[test]
    fn zero_capacity() {
        assert_eq!(
            MatchRestrictions::open(0).validate(),
            Err(ConfigurationError::NoCapacity)
        );
    }

    #[test]
    fn empty_ratio() {
        let restrictions = MatchRestrictions {
            gender: GenderPolicy::Ratio { men: 0, women: 0 },
            ..MatchRestrictions::open(10)
        };
        assert_eq!(
            restrictions.validate(),
            Err(ConfigurationError::EmptyGenderRatio)
        );
    }

    #[test]
    fn one_sided_ratio_is_valid() {
        let restrictions = MatchRestrictions {
            gender: GenderPolicy::Ratio { men: 3, women: 0 },
            ..MatchRestrictions::open(10)
        };
        assert_eq!(restrictions.validate(), Ok(()));
    }

    #[test]
    fn age_ranges() {
        let with_age = |min, max| MatchRestrictions {
            age: AgePolicy::CustomRange { min, max },
            ..MatchRestrictions::open(10)
        };

        assert_eq!(
            with_age(None, None).validate(),
            Err(ConfigurationError::EmptyAgeRange)
        );
        assert_eq!(
            with_age(Some(30), Some(20)).validate(),
            Err(ConfigurationError::InvertedAgeRange { min: 30, max: 20 })
        );
        assert_eq!(with_age(Some(20), Some(20)).validate(), Ok(()));
        assert_eq!(with_age(None, Some(40)).validate(), Ok(()));
        assert_eq!(with_age(Some(16), None).validate(), Ok(()));
    }

    #[test]
    fn no_skill_levels() {
        let restrictions = MatchRestrictions {
            skill_levels: SkillLevels::from_str(" , ,").unwrap(),
            ..MatchRestrictions::open(10)
        };
        assert_eq!(
            restrictions.validate(),
            Err(ConfigurationError::NoSkillLevels)
        );
    }

    #[test]
    fn skill_levels_parse_and_compare_case_insensitively() {
        let levels = SkillLevels::from_str("Advanced, PROFESSIONAL ").unwrap();

        assert!(!levels.is_unrestricted());
        assert!(levels.allows("advanced"));
        assert!(levels.allows("Professional"));
        assert!(!levels.allows("beginner"));
        assert_eq!(levels.to_string(), "advanced, professional");
    }

    #[test]
    fn all_sentinel() {
        let levels = SkillLevels::from_str("beginner, ALL").unwrap();

        assert!(levels.is_unrestricted());
        assert!(levels.allows("anything at all"));
    }
}
