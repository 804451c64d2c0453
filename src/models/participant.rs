use poise::serenity_prelude::UserId;

use super::{matches::MatchId, profile::Gender, types::UtcDateTime};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ParticipantId(pub u64);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Participant {
    pub id: ParticipantId,
    pub match_id: MatchId,
    pub player: UserId,
    /// Gender at the moment of joining.
    pub gender: Gender,
    pub joined_at: UtcDateTime,
}

#[derive(Clone, Debug)]
pub struct NewParticipant {
    pub match_id: MatchId,
    pub player: UserId,
    pub gender: Gender,
    pub joined_at: UtcDateTime,
}

/// A participant with their skill level in the match's hub.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RosterEntry {
    pub participant: Participant,
    pub skill_level: Option<String>,
}
