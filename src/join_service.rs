use std::sync::Arc;

use poise::serenity_prelude::UserId;
use thiserror::Error;
use tracing::{error, info};

use crate::{
    eligibility::{evaluate, Eligibility, ParticipantSnapshot, Rejection},
    models::{types::UtcDateTime, Gender, Match, MatchId, NewParticipant, Participant},
    repository::{InsertOutcome, MatchStore, ParticipantStore, ProfileStore},
};

#[derive(Debug, Error)]
pub enum JoinError {
    #[error("match not found")]
    MatchNotFound,
    #[error("already joined")]
    AlreadyJoined,
    #[error("{0}")]
    Ineligible(Rejection),
    /// Someone else took the last slot between the check and the write.
    #[error("match is full")]
    MatchFull,
    #[error("unable to verify eligibility: {0}")]
    Unverifiable(anyhow::Error),
}

/// Checks players against match restrictions and records joins.
///
/// The stores are injected, so the workflow runs the same against SQLite and
/// against in-memory stores.
pub struct JoinService {
    matches: Arc<dyn MatchStore>,
    profiles: Arc<dyn ProfileStore>,
    participants: Arc<dyn ParticipantStore>,
}

impl JoinService {
    pub fn new(
        matches: Arc<dyn MatchStore>,
        profiles: Arc<dyn ProfileStore>,
        participants: Arc<dyn ParticipantStore>,
    ) -> JoinService {
        JoinService {
            matches,
            profiles,
            participants,
        }
    }

    /// Evaluates the player against fresh match, profile and roster data
    /// without joining.
    #[tracing::instrument(skip(self))]
    pub async fn check(&self, match_id: MatchId, player: UserId) -> Result<Eligibility, JoinError> {
        let (_, eligibility) = self.evaluate_fresh(match_id, player).await?;
        Ok(eligibility)
    }

    #[tracing::instrument(skip(self))]
    pub async fn join(&self, match_id: MatchId, player: UserId) -> Result<Participant, JoinError> {
        let (candidate_gender, eligibility) = self.evaluate_fresh(match_id, player).await?;

        if let Eligibility::Ineligible(rejection) = eligibility {
            info!("Player {player} can't join match {match_id:?}: {rejection}");
            return Err(JoinError::Ineligible(rejection));
        }

        let new_participant = NewParticipant {
            match_id,
            player,
            gender: candidate_gender,
            joined_at: UtcDateTime::now(),
        };

        match self
            .participants
            .insert_participant(&new_participant)
            .await
            .map_err(unverifiable)?
        {
            InsertOutcome::Inserted(participant) => {
                info!("Player {player} joined match {match_id:?}");
                Ok(participant)
            }
            InsertOutcome::AlreadyJoined => Err(JoinError::AlreadyJoined),
            InsertOutcome::Full => {
                info!("Player {player} lost the last slot of match {match_id:?}");
                Err(JoinError::MatchFull)
            }
        }
    }

    /// Returns `false` if the player wasn't in the match.
    #[tracing::instrument(skip(self))]
    pub async fn leave(&self, match_id: MatchId, player: UserId) -> Result<bool, JoinError> {
        self.participants
            .remove_participant(match_id, player)
            .await
            .map_err(unverifiable)
    }

    async fn evaluate_fresh(
        &self,
        match_id: MatchId,
        player: UserId,
    ) -> Result<(Gender, Eligibility), JoinError> {
        let found: Match = self
            .matches
            .get_match(match_id)
            .await
            .map_err(unverifiable)?
            .ok_or(JoinError::MatchNotFound)?;

        let candidate = self
            .profiles
            .get_candidate(player, &found.hub)
            .await
            .map_err(unverifiable)?;

        let participants = self
            .participants
            .get_participants(match_id)
            .await
            .map_err(unverifiable)?;

        if participants.iter().any(|p| p.player == player) {
            return Err(JoinError::AlreadyJoined);
        }

        let snapshot: ParticipantSnapshot = participants.iter().map(|p| p.gender).collect();
        let eligibility = evaluate(&found.restrictions, &candidate, &snapshot, snapshot.total);

        Ok((candidate.gender, eligibility))
    }
}

fn unverifiable(err: anyhow::Error) -> JoinError {
    error!("Could not load eligibility data: {err:#}");
    JoinError::Unverifiable(err)
}
