//! Rules that decide whether a player may join a match.
//!
//! Everything here is pure: callers fetch the match, the candidate's profile and
//! the current roster and pass them in. A positive verdict is not a reservation,
//! the join has to be re-checked against capacity when it's written.

mod age;
mod evaluator;
mod restrictions;
mod teams;

pub use evaluator::{evaluate, CandidateProfile, Eligibility, ParticipantSnapshot, Rejection};
pub use restrictions::{AgePolicy, GenderPolicy, MatchRestrictions, SkillLevels};
#[cfg(test)]
pub use restrictions::ConfigurationError;
pub use teams::balance_teams;
