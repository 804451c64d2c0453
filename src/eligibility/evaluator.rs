use thiserror::Error;
use time::{Date, OffsetDateTime};

use crate::models::Gender;

use super::{
    age::age_on,
    restrictions::{AgePolicy, ConfigurationError, GenderPolicy, MatchRestrictions, SkillLevels},
};

/// The part of a player's profile that decides whether they may join a match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CandidateProfile {
    pub gender: Gender,
    pub birth_date: Option<Date>,
    /// Skill level from the sub-profile of the match's hub, if the player has one.
    pub skill_level: Option<String>,
}

/// Gender counts of the players who have already joined.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParticipantSnapshot {
    pub men: u32,
    pub women: u32,
    pub total: u32,
}

impl FromIterator<Gender> for ParticipantSnapshot {
    fn from_iter<I: IntoIterator<Item = Gender>>(genders: I) -> Self {
        genders
            .into_iter()
            .fold(ParticipantSnapshot::default(), |mut snapshot, gender| {
                match gender {
                    Gender::Male => snapshot.men += 1,
                    Gender::Female => snapshot.women += 1,
                    Gender::Other | Gender::Undisclosed => (),
                }
                snapshot.total += 1;
                snapshot
            })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Eligibility {
    Eligible,
    Ineligible(Rejection),
}

impl Eligibility {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Eligibility::Eligible)
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Eligibility::Eligible => None,
            Eligibility::Ineligible(rejection) => Some(rejection),
        }
    }
}

/// Why a candidate can't join. The messages are shown to players as is.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Rejection {
    #[error("profile incomplete: set your skill level in this match's hub first")]
    ProfileIncomplete,
    #[error("men only")]
    MenOnly,
    #[error("women only")]
    WomenOnly,
    #[error("gender ratio: another man would push the roster past the {men}:{women} men to women target")]
    TooManyMen { men: u32, women: u32 },
    #[error("gender ratio: another woman would push the roster past the {men}:{women} men to women target")]
    TooManyWomen { men: u32, women: u32 },
    #[error("gender ratio: this match balances men and women, so your profile has to say which you are")]
    GenderNotOnRatio,
    #[error("under 18 only")]
    Under18Only,
    #[error("over 18 only")]
    Over18Only,
    #[error("too young: the minimum age is {min}")]
    TooYoung { min: u32 },
    #[error("too old: the maximum age is {max}")]
    TooOld { max: u32 },
    #[error("skill level not allowed: allowed levels are {allowed}")]
    SkillLevelNotAllowed { allowed: String },
    #[error("match is full")]
    MatchFull,
    #[error("match restrictions are misconfigured")]
    Misconfigured(ConfigurationError),
}

/// Decides whether `candidate` may join a match with the given restrictions,
/// using today's UTC date for age checks.
///
/// The result is advisory: it has to be backed by a capacity check at write time.
pub fn evaluate(
    restrictions: &MatchRestrictions,
    candidate: &CandidateProfile,
    participants: &ParticipantSnapshot,
    capacity_used: u32,
) -> Eligibility {
    evaluate_on(
        restrictions,
        candidate,
        participants,
        capacity_used,
        OffsetDateTime::now_utc().date(),
    )
}

/// Same as [`evaluate`], with an explicit date for age checks.
///
/// Rules are checked in a fixed order and the first failing one is reported:
/// profile completeness, gender, age, skill level, capacity.
pub fn evaluate_on(
    restrictions: &MatchRestrictions,
    candidate: &CandidateProfile,
    participants: &ParticipantSnapshot,
    capacity_used: u32,
    today: Date,
) -> Eligibility {
    let checks = || -> Result<(), Rejection> {
        let skill_level = check_profile(candidate)?;
        check_gender(restrictions.gender, candidate.gender, participants)?;
        check_age(restrictions.age, candidate.birth_date, today)?;
        check_skill_level(&restrictions.skill_levels, skill_level)?;
        check_capacity(restrictions.max_players, capacity_used)
    };

    match checks() {
        Ok(()) => Eligibility::Eligible,
        Err(rejection) => Eligibility::Ineligible(rejection),
    }
}

fn check_profile(candidate: &CandidateProfile) -> Result<&str, Rejection> {
    candidate
        .skill_level
        .as_deref()
        .map(str::trim)
        .filter(|level| !level.is_empty())
        .ok_or(Rejection::ProfileIncomplete)
}

fn check_gender(
    policy: GenderPolicy,
    gender: Gender,
    participants: &ParticipantSnapshot,
) -> Result<(), Rejection> {
    match policy {
        GenderPolicy::Mixed => Ok(()),

        GenderPolicy::MenOnly if gender == Gender::Male => Ok(()),
        GenderPolicy::MenOnly => Err(Rejection::MenOnly),

        GenderPolicy::WomenOnly if gender == Gender::Female => Ok(()),
        GenderPolicy::WomenOnly => Err(Rejection::WomenOnly),

        GenderPolicy::Ratio { men: 0, women: 0 } => Err(Rejection::Misconfigured(
            ConfigurationError::EmptyGenderRatio,
        )),

        GenderPolicy::Ratio {
            men: target_men,
            women: target_women,
        } => {
            // Ratios are compared by cross-multiplication, a/b > c/d <=> a*d > c*b.
            let (target_men_wide, target_women_wide) =
                (u64::from(target_men), u64::from(target_women));
            let (men, women) = (u64::from(participants.men), u64::from(participants.women));

            let rejected = match gender {
                // (men + 1) / max(women, 1) > target_men / target_women
                Gender::Male => (men + 1) * target_women_wide > target_men_wide * women.max(1),

                // men / women < target_men / target_women, on the roster before joining
                Gender::Female => {
                    target_women == 0 || men * target_women_wide < target_men_wide * women
                }

                Gender::Other | Gender::Undisclosed => return Err(Rejection::GenderNotOnRatio),
            };

            match (rejected, gender) {
                (false, _) => Ok(()),
                (true, Gender::Male) => Err(Rejection::TooManyMen {
                    men: target_men,
                    women: target_women,
                }),
                (true, _) => Err(Rejection::TooManyWomen {
                    men: target_men,
                    women: target_women,
                }),
            }
        }
    }
}

fn check_age(policy: AgePolicy, birth_date: Option<Date>, today: Date) -> Result<(), Rejection> {
    if let AgePolicy::CustomRange {
        min: Some(min),
        max: Some(max),
    } = policy
    {
        if min > max {
            return Err(Rejection::Misconfigured(
                ConfigurationError::InvertedAgeRange { min, max },
            ));
        }
    }

    // Players without a birth date pass every age policy.
    let Some(birth_date) = birth_date else {
        return Ok(());
    };
    let age = age_on(birth_date, today);

    match policy {
        AgePolicy::NoRestriction => Ok(()),
        AgePolicy::Under18 if age >= 18 => Err(Rejection::Under18Only),
        AgePolicy::Under18 => Ok(()),
        AgePolicy::Over18 if age < 18 => Err(Rejection::Over18Only),
        AgePolicy::Over18 => Ok(()),
        AgePolicy::CustomRange { min, max } => match (min, max) {
            (Some(min), _) if age < min => Err(Rejection::TooYoung { min }),
            (_, Some(max)) if age > max => Err(Rejection::TooOld { max }),
            _ => Ok(()),
        },
    }
}

fn check_skill_level(allowed: &SkillLevels, skill_level: &str) -> Result<(), Rejection> {
    if allowed.is_empty() {
        return Err(Rejection::Misconfigured(ConfigurationError::NoSkillLevels));
    }

    if allowed.allows(skill_level) {
        Ok(())
    } else {
        Err(Rejection::SkillLevelNotAllowed {
            allowed: allowed.to_string(),
        })
    }
}

fn check_capacity(max_players: u32, capacity_used: u32) -> Result<(), Rejection> {
    if capacity_used >= max_players {
        Err(Rejection::MatchFull)
    } else {
        Ok(())
    }
}
