mod conversion;
mod match_repository;
mod participant_repository;
mod profile_repository;

use async_trait::async_trait;
use poise::serenity_prelude::UserId;

use crate::{
    eligibility::CandidateProfile,
    models::{Match, MatchId, NewParticipant, Participant},
};

pub use match_repository::MatchRepository;
pub use participant_repository::ParticipantRepository;
pub use profile_repository::ProfileRepository;

#[async_trait]
pub trait MatchStore: Send + Sync {
    async fn get_match(&self, id: MatchId) -> Result<Option<Match>, anyhow::Error>;
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Resolves the eligibility-relevant part of a player's profile for a hub.
    ///
    /// Players without a profile come back with an undisclosed gender and no
    /// skill level, which the evaluator reports as an incomplete profile.
    async fn get_candidate(
        &self,
        player: UserId,
        hub: &str,
    ) -> Result<CandidateProfile, anyhow::Error>;
}

#[derive(Debug, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted(Participant),
    AlreadyJoined,
    /// The match was full at write time, or doesn't exist anymore.
    Full,
}

#[async_trait]
pub trait ParticipantStore: Send + Sync {
    async fn get_participants(&self, match_id: MatchId)
        -> Result<Vec<Participant>, anyhow::Error>;

    /// Writes the participant only if the match has a free slot at the moment
    /// of writing and the player hasn't joined yet.
    async fn insert_participant(
        &self,
        participant: &NewParticipant,
    ) -> Result<InsertOutcome, anyhow::Error>;

    async fn remove_participant(
        &self,
        match_id: MatchId,
        player: UserId,
    ) -> Result<bool, anyhow::Error>;
}
