use async_trait::async_trait;
use poise::serenity_prelude::UserId;
use sqlx::{query, query_as, FromRow, Pool, Sqlite, Transaction};
use tracing::debug;

use crate::models::{
    types::UtcDateTime, Gender, MatchId, NewParticipant, Participant, ParticipantId, RosterEntry,
};

use super::{
    conversion::{DBConvertible, DBFromConversionError, DBToConversionError},
    InsertOutcome, ParticipantStore,
};

pub struct ParticipantRepository {
    pool: Pool<Sqlite>,
}

impl ParticipantRepository {
    pub fn new(pool: Pool<Sqlite>) -> ParticipantRepository {
        ParticipantRepository { pool }
    }

    /// Participants in joining order, with skill levels from the match's hub.
    pub async fn get_roster(&self, match_id: MatchId) -> Result<Vec<RosterEntry>, anyhow::Error> {
        let mut transaction = self.pool.begin().await?;

        let roster = query_as::<_, SqlRosterEntry>(
            r#"
                SELECT
                    participants.id,
                    participants.match_id,
                    participants.player,
                    participants.gender,
                    participants.joined_at,
                    hub_profiles.skill_level
                FROM participants
                JOIN matches ON matches.id = participants.match_id
                LEFT JOIN hub_profiles
                    ON hub_profiles.player = participants.player AND hub_profiles.hub = matches.hub
                WHERE participants.match_id = $1
                ORDER BY participants.joined_at, participants.id
            "#,
        )
        .bind(match_id.to_db()?)
        .fetch_all(&mut *transaction)
        .await?;

        transaction.commit().await?;

        roster
            .iter()
            .map(|entry| -> Result<RosterEntry, anyhow::Error> {
                Ok(RosterEntry {
                    participant: Participant::from_db(&entry.participant)?,
                    skill_level: entry.skill_level.clone(),
                })
            })
            .collect()
    }
}

async fn has_joined(
    transaction: &mut Transaction<'_, Sqlite>,
    match_id: i64,
    player: i64,
) -> Result<bool, sqlx::Error> {
    let found: Option<(i64,)> =
        query_as("SELECT id FROM participants WHERE match_id = $1 AND player = $2")
            .bind(match_id)
            .bind(player)
            .fetch_optional(&mut **transaction)
            .await?;

    Ok(found.is_some())
}

#[async_trait]
impl ParticipantStore for ParticipantRepository {
    async fn get_participants(
        &self,
        match_id: MatchId,
    ) -> Result<Vec<Participant>, anyhow::Error> {
        let mut transaction = self.pool.begin().await?;

        let participants = query_as::<_, SqlParticipant>(
            r#"
                SELECT id, match_id, player, gender, joined_at
                FROM participants
                WHERE match_id = $1
                ORDER BY joined_at, id
            "#,
        )
        .bind(match_id.to_db()?)
        .fetch_all(&mut *transaction)
        .await?;

        transaction.commit().await?;

        Ok(participants
            .iter()
            .map(Participant::from_db)
            .collect::<Result<_, _>>()?)
    }

    async fn insert_participant(
        &self,
        participant: &NewParticipant,
    ) -> Result<InsertOutcome, anyhow::Error> {
        let match_id = participant.match_id.to_db()?;
        let player = participant.player.to_db()?;
        let gender = participant.gender.to_db()?;
        let joined_at = participant.joined_at.to_db()?;

        let mut transaction = self.pool.begin().await?;

        // The capacity check and the write are one statement, so two players
        // racing for the last slot can't both get in. It must also be the first
        // statement: a transaction that has already read can't wait for the
        // write lock and fails with SQLITE_BUSY instead.
        let inserted = query_as::<_, SqlParticipant>(
            r#"
                INSERT INTO participants (match_id, player, gender, joined_at)
                SELECT $1, $2, $3, $4
                WHERE (SELECT COUNT(*) FROM participants WHERE match_id = $1)
                    < (SELECT max_players FROM matches WHERE id = $1)
                ON CONFLICT (match_id, player) DO NOTHING
                RETURNING id, match_id, player, gender, joined_at
            "#,
        )
        .bind(match_id)
        .bind(player)
        .bind(gender)
        .bind(joined_at)
        .fetch_optional(&mut *transaction)
        .await?;

        let outcome = match inserted {
            Some(inserted) => InsertOutcome::Inserted(Participant::from_db(&inserted)?),
            // Already joined (maybe by a concurrent request), or the match is full.
            None => {
                if has_joined(&mut transaction, match_id, player).await? {
                    InsertOutcome::AlreadyJoined
                } else {
                    InsertOutcome::Full
                }
            }
        };

        transaction.commit().await?;

        debug!("Insert into match {match_id} for player {player}: {outcome:?}");

        Ok(outcome)
    }

    async fn remove_participant(
        &self,
        match_id: MatchId,
        player: UserId,
    ) -> Result<bool, anyhow::Error> {
        let mut transaction = self.pool.begin().await?;

        let query_result = query("DELETE FROM participants WHERE match_id = $1 AND player = $2")
            .bind(match_id.to_db()?)
            .bind(player.to_db()?)
            .execute(&mut *transaction)
            .await?;

        transaction.commit().await?;

        Ok(query_result.rows_affected() > 0)
    }
}

#[derive(Debug, FromRow)]
pub struct SqlParticipant {
    id: i64,
    match_id: i64,
    player: i64,
    gender: String,
    joined_at: String,
}

#[derive(Debug, FromRow)]
struct SqlRosterEntry {
    #[sqlx(flatten)]
    participant: SqlParticipant,
    skill_level: Option<String>,
}

impl DBConvertible for Participant {
    type DBType = SqlParticipant;

    fn to_db(&self) -> Result<Self::DBType, DBToConversionError> {
        Ok(SqlParticipant {
            id: self.id.to_db()?,
            match_id: self.match_id.to_db()?,
            player: self.player.to_db()?,
            gender: self.gender.to_db()?,
            joined_at: self.joined_at.to_db()?,
        })
    }

    fn from_db(value: &Self::DBType) -> Result<Self, DBFromConversionError> {
        Ok(Participant {
            id: ParticipantId::from_db(&value.id)?,
            match_id: MatchId::from_db(&value.match_id)?,
            player: UserId::from_db(&value.player)?,
            gender: Gender::from_db(&value.gender)?,
            joined_at: UtcDateTime::from_db(&value.joined_at)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use test_log::test;

    use poise::serenity_prelude::UserId;
    use time::macros::datetime;

    use crate::{
        eligibility::MatchRestrictions,
        models::{types::UtcDateTime, Gender, HubProfile, MatchId, NewParticipant},
        repository::{
            test_utils::{file_test_pool, new_match, test_pool},
            InsertOutcome, MatchRepository, ParticipantStore, ProfileRepository,
        },
    };

    use super::ParticipantRepository;

    fn joining(match_id: MatchId, player: u64) -> NewParticipant {
        NewParticipant {
            match_id,
            player: UserId::new(player),
            gender: Gender::Male,
            joined_at: UtcDateTime::from(datetime!(2030-05-01 10:00 UTC)),
        }
    }

    #[test(tokio::test)]
    async fn insert_until_full() {
        let pool = test_pool().await;
        let matches = MatchRepository::new(pool.clone());
        let participants = ParticipantRepository::new(pool);

        let mut small_match =
            new_match("small", UtcDateTime::from(datetime!(2030-06-01 12:00 UTC)));
        small_match.restrictions = MatchRestrictions::open(2);
        let created = matches.create_match(&small_match).await.unwrap().unwrap();

        for player in [10, 11] {
            assert!(matches!(
                participants
                    .insert_participant(&joining(created.id, player))
                    .await
                    .unwrap(),
                InsertOutcome::Inserted(_)
            ));
        }

        assert_eq!(
            participants
                .insert_participant(&joining(created.id, 12))
                .await
                .unwrap(),
            InsertOutcome::Full
        );

        let joined: Vec<UserId> = participants
            .get_participants(created.id)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.player)
            .collect();
        assert_eq!(joined, vec![UserId::new(10), UserId::new(11)]);
    }

    #[test(tokio::test)]
    async fn duplicate_join() {
        let pool = test_pool().await;
        let matches = MatchRepository::new(pool.clone());
        let participants = ParticipantRepository::new(pool);

        let created = matches
            .create_match(&new_match("dup", UtcDateTime::from(datetime!(2030-06-01 12:00 UTC))))
            .await
            .unwrap()
            .unwrap();

        assert!(matches!(
            participants
                .insert_participant(&joining(created.id, 10))
                .await
                .unwrap(),
            InsertOutcome::Inserted(_)
        ));
        assert_eq!(
            participants
                .insert_participant(&joining(created.id, 10))
                .await
                .unwrap(),
            InsertOutcome::AlreadyJoined
        );
        assert_eq!(participants.get_participants(created.id).await.unwrap().len(), 1);
    }

    #[test(tokio::test(flavor = "multi_thread", worker_threads = 4))]
    async fn concurrent_joins_fill_without_errors() {
        let db_dir = tempfile::tempdir().unwrap();
        let pool = file_test_pool(&db_dir.path().join("matches.db"), 10).await;
        let matches = MatchRepository::new(pool.clone());
        let participants = Arc::new(ParticipantRepository::new(pool));

        let mut small_match = new_match("rush", UtcDateTime::from(datetime!(2030-06-01 12:00 UTC)));
        small_match.restrictions = MatchRestrictions::open(3);
        let created = matches.create_match(&small_match).await.unwrap().unwrap();

        // Player 100 joins twice to race against itself as well.
        let players = (100..120).chain([100]);
        let tasks: Vec<_> = players
            .map(|player| {
                let participants = participants.clone();
                let joining = joining(created.id, player);
                tokio::spawn(async move { participants.insert_participant(&joining).await })
            })
            .collect();

        let mut inserted = 0;
        let mut refused = 0;
        for task in tasks {
            match task.await.unwrap().unwrap() {
                InsertOutcome::Inserted(_) => inserted += 1,
                InsertOutcome::Full | InsertOutcome::AlreadyJoined => refused += 1,
            }
        }

        assert_eq!(inserted, 3);
        assert_eq!(refused, 18);
        assert_eq!(participants.get_participants(created.id).await.unwrap().len(), 3);
    }

    #[test(tokio::test)]
    async fn unknown_match_takes_nobody() {
        let participants = ParticipantRepository::new(test_pool().await);

        assert_eq!(
            participants
                .insert_participant(&joining(MatchId(404), 10))
                .await
                .unwrap(),
            InsertOutcome::Full
        );
    }

    #[test(tokio::test)]
    async fn leave_and_cascade() {
        let pool = test_pool().await;
        let matches = MatchRepository::new(pool.clone());
        let participants = ParticipantRepository::new(pool);

        let created = matches
            .create_match(&new_match("bye", UtcDateTime::from(datetime!(2030-06-01 12:00 UTC))))
            .await
            .unwrap()
            .unwrap();

        for player in [10, 11] {
            participants
                .insert_participant(&joining(created.id, player))
                .await
                .unwrap();
        }

        assert!(participants
            .remove_participant(created.id, UserId::new(10))
            .await
            .unwrap());
        assert!(!participants
            .remove_participant(created.id, UserId::new(10))
            .await
            .unwrap());

        matches
            .delete_match(created.guild, &created.slug)
            .await
            .unwrap();
        assert!(participants
            .get_participants(created.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[test(tokio::test)]
    async fn roster_has_hub_skill_levels() {
        let pool = test_pool().await;
        let matches = MatchRepository::new(pool.clone());
        let profiles = ProfileRepository::new(pool.clone());
        let participants = ParticipantRepository::new(pool);

        let created = matches
            .create_match(&new_match("roster", UtcDateTime::from(datetime!(2030-06-01 12:00 UTC))))
            .await
            .unwrap()
            .unwrap();

        profiles
            .upsert_hub_profile(&HubProfile {
                player: UserId::new(10),
                hub: "soccer".to_string(),
                skill_level: "advanced".to_string(),
            })
            .await
            .unwrap();
        profiles
            .upsert_hub_profile(&HubProfile {
                player: UserId::new(11),
                hub: "tennis".to_string(),
                skill_level: "professional".to_string(),
            })
            .await
            .unwrap();

        for player in [10, 11] {
            participants
                .insert_participant(&joining(created.id, player))
                .await
                .unwrap();
        }

        let roster = participants.get_roster(created.id).await.unwrap();
        let levels: Vec<(UserId, Option<String>)> = roster
            .into_iter()
            .map(|entry| (entry.participant.player, entry.skill_level))
            .collect();

        assert_eq!(
            levels,
            vec![
                (UserId::new(10), Some("advanced".to_string())),
                (UserId::new(11), None),
            ]
        );
    }
}
