use async_trait::async_trait;
use poise::serenity_prelude::{ChannelId, GuildId, UserId};
use sqlx::{query, query_as, FromRow, Pool, Sqlite};
use tracing::warn;

use crate::{
    eligibility::{AgePolicy, GenderPolicy, MatchRestrictions, SkillLevels},
    models::{types::UtcDateTime, Match, MatchId, NewMatch},
};

use super::{
    conversion::{count_from_db, DBConvertible, DBFromConversionError, DBToConversionError},
    MatchStore,
};

const MATCH_COLUMNS: &str = r#"
    id,
    guild,
    channel,
    organizer,
    hub,
    slug,
    display_name,
    starts_at,
    gender_policy,
    ratio_men,
    ratio_women,
    age_policy,
    min_age,
    max_age,
    skill_levels,
    max_players,
    team_balancing
"#;

#[derive(Debug)]
pub struct MatchRepository {
    pool: Pool<Sqlite>,
}

impl MatchRepository {
    pub fn new(pool: Pool<Sqlite>) -> MatchRepository {
        MatchRepository { pool }
    }

    /// Returns `None` if the guild already has a match with the same slug.
    pub async fn create_match(&self, new_match: &NewMatch) -> Result<Option<Match>, anyhow::Error> {
        let row = SqlMatch::from_new(new_match)?;

        let mut transaction = self.pool.begin().await?;

        let created = query_as::<_, SqlMatch>(&format!(
            r#"
                INSERT INTO matches (
                    guild,
                    channel,
                    organizer,
                    hub,
                    slug,
                    display_name,
                    starts_at,
                    gender_policy,
                    ratio_men,
                    ratio_women,
                    age_policy,
                    min_age,
                    max_age,
                    skill_levels,
                    max_players,
                    team_balancing)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
                ON CONFLICT (guild, slug) DO NOTHING
                RETURNING {MATCH_COLUMNS}
            "#
        ))
        .bind(row.guild)
        .bind(row.channel)
        .bind(row.organizer)
        .bind(row.hub)
        .bind(row.slug)
        .bind(row.display_name)
        .bind(row.starts_at)
        .bind(row.gender_policy)
        .bind(row.ratio_men)
        .bind(row.ratio_women)
        .bind(row.age_policy)
        .bind(row.min_age)
        .bind(row.max_age)
        .bind(row.skill_levels)
        .bind(row.max_players)
        .bind(row.team_balancing)
        .fetch_optional(&mut *transaction)
        .await?;

        transaction.commit().await?;

        match created {
            Some(created) => Ok(Some(Match::from_db(&created)?)),
            None => Ok(None),
        }
    }

    pub async fn get_match_by_slug(
        &self,
        guild: GuildId,
        slug: &str,
    ) -> Result<Option<Match>, anyhow::Error> {
        let mut transaction = self.pool.begin().await?;

        let found = query_as::<_, SqlMatch>(&format!(
            "SELECT {MATCH_COLUMNS} FROM matches WHERE guild = $1 AND slug = $2"
        ))
        .bind(guild.to_db()?)
        .bind(slug)
        .fetch_optional(&mut *transaction)
        .await?;

        transaction.commit().await?;

        match found {
            Some(found) => Ok(Some(Match::from_db(&found)?)),
            None => Ok(None),
        }
    }

    /// Matches starting after `after`, with the number of players who joined each.
    pub async fn get_upcoming_matches(
        &self,
        guild: GuildId,
        after: UtcDateTime,
    ) -> Result<Vec<(Match, u32)>, anyhow::Error> {
        let mut transaction = self.pool.begin().await?;

        let upcoming = query_as::<_, SqlMatchSummary>(&format!(
            r#"
                SELECT
                    {MATCH_COLUMNS},
                    (SELECT COUNT(*) FROM participants WHERE participants.match_id = matches.id) AS joined
                FROM matches
                WHERE guild = $1 AND starts_at > $2
                ORDER BY starts_at, display_name
            "#
        ))
        .bind(guild.to_db()?)
        .bind(after.to_db()?)
        .fetch_all(&mut *transaction)
        .await?;

        transaction.commit().await?;

        upcoming
            .iter()
            .map(|summary| -> Result<(Match, u32), anyhow::Error> {
                Ok((
                    Match::from_db(&summary.sql_match)?,
                    count_from_db(summary.joined)?,
                ))
            })
            .collect()
    }

    pub async fn delete_match(&self, guild: GuildId, slug: &str) -> Result<bool, anyhow::Error> {
        let mut transaction = self.pool.begin().await?;

        let guild = guild.to_db()?;
        let query_result = query(r#"DELETE FROM matches WHERE guild = $1 AND slug = $2"#)
            .bind(guild)
            .bind(slug)
            .execute(&mut *transaction)
            .await?;

        transaction.commit().await?;

        let matches_deleted = query_result.rows_affected();

        if matches_deleted > 1 {
            warn!("Deleted more than one match. Guild: {guild}, slug: {slug}");
        }

        Ok(matches_deleted > 0)
    }
}

#[async_trait]
impl MatchStore for MatchRepository {
    async fn get_match(&self, id: MatchId) -> Result<Option<Match>, anyhow::Error> {
        let mut transaction = self.pool.begin().await?;

        let found = query_as::<_, SqlMatch>(&format!(
            "SELECT {MATCH_COLUMNS} FROM matches WHERE id = $1"
        ))
        .bind(id.to_db()?)
        .fetch_optional(&mut *transaction)
        .await?;

        transaction.commit().await?;

        match found {
            Some(found) => Ok(Some(Match::from_db(&found)?)),
            None => Ok(None),
        }
    }
}

#[derive(Debug, FromRow)]
pub struct SqlMatch {
    id: i64,
    guild: i64,
    channel: i64,
    organizer: i64,
    hub: String,
    slug: String,
    display_name: String,
    starts_at: String,
    gender_policy: String,
    ratio_men: Option<i64>,
    ratio_women: Option<i64>,
    age_policy: String,
    min_age: Option<i64>,
    max_age: Option<i64>,
    skill_levels: String,
    max_players: i64,
    team_balancing: bool,
}

#[derive(Debug, FromRow)]
struct SqlMatchSummary {
    #[sqlx(flatten)]
    sql_match: SqlMatch,
    joined: i64,
}

impl SqlMatch {
    fn from_new(new_match: &NewMatch) -> Result<SqlMatch, DBToConversionError> {
        let restrictions = &new_match.restrictions;
        let (gender_policy, ratio_men, ratio_women) = restrictions.gender.to_db()?;
        let (age_policy, min_age, max_age) = restrictions.age.to_db()?;

        Ok(SqlMatch {
            id: 0,
            guild: new_match.guild.to_db()?,
            channel: new_match.channel.to_db()?,
            organizer: new_match.organizer.to_db()?,
            hub: new_match.hub.clone(),
            slug: new_match.slug.clone(),
            display_name: new_match.display_name.clone(),
            starts_at: new_match.starts_at.to_db()?,
            gender_policy,
            ratio_men,
            ratio_women,
            age_policy,
            min_age,
            max_age,
            skill_levels: restrictions.skill_levels.to_db()?,
            max_players: i64::from(restrictions.max_players),
            team_balancing: restrictions.team_balancing,
        })
    }
}

impl DBConvertible for Match {
    type DBType = SqlMatch;

    fn to_db(&self) -> Result<Self::DBType, DBToConversionError> {
        let new_match = NewMatch {
            guild: self.guild,
            channel: self.channel,
            organizer: self.organizer,
            hub: self.hub.clone(),
            slug: self.slug.clone(),
            display_name: self.display_name.clone(),
            starts_at: self.starts_at,
            restrictions: self.restrictions.clone(),
        };

        Ok(SqlMatch {
            id: self.id.to_db()?,
            ..SqlMatch::from_new(&new_match)?
        })
    }

    fn from_db(value: &Self::DBType) -> Result<Self, DBFromConversionError> {
        let restrictions = MatchRestrictions {
            gender: GenderPolicy::from_db(&(
                value.gender_policy.clone(),
                value.ratio_men,
                value.ratio_women,
            ))?,
            age: AgePolicy::from_db(&(value.age_policy.clone(), value.min_age, value.max_age))?,
            skill_levels: SkillLevels::from_db(&value.skill_levels)?,
            max_players: count_from_db(value.max_players)?,
            team_balancing: value.team_balancing,
        };

        Ok(Match {
            id: MatchId::from_db(&value.id)?,
            guild: GuildId::from_db(&value.guild)?,
            channel: ChannelId::from_db(&value.channel)?,
            organizer: UserId::from_db(&value.organizer)?,
            hub: value.hub.clone(),
            slug: value.slug.clone(),
            display_name: value.display_name.clone(),
            starts_at: UtcDateTime::from_db(&value.starts_at)?,
            restrictions,
        })
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use poise::serenity_prelude::GuildId;
    use time::{macros::datetime, Duration};

    use crate::{
        models::types::UtcDateTime,
        repository::{
            test_utils::{new_match, test_pool},
            MatchStore,
        },
    };

    use super::MatchRepository;

    fn noon() -> UtcDateTime {
        UtcDateTime::from(datetime!(2030-06-01 12:00 UTC))
    }

    #[test(tokio::test)]
    async fn create_and_get() {
        let repository = MatchRepository::new(test_pool().await);

        let created = repository
            .create_match(&new_match("sunday-5v5", noon()))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(created.slug, "sunday-5v5");
        assert_eq!(created.restrictions, new_match("x", noon()).restrictions);
        assert_eq!(created.starts_at, noon());

        let by_id = repository.get_match(created.id).await.unwrap().unwrap();
        assert_eq!(by_id.id, created.id);
        assert_eq!(by_id.restrictions, created.restrictions);

        let by_slug = repository
            .get_match_by_slug(GuildId::new(1), "sunday-5v5")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_slug.id, created.id);

        assert!(repository
            .get_match_by_slug(GuildId::new(99), "sunday-5v5")
            .await
            .unwrap()
            .is_none());
    }

    #[test(tokio::test)]
    async fn duplicate_slug() {
        let repository = MatchRepository::new(test_pool().await);

        assert!(repository
            .create_match(&new_match("dup", noon()))
            .await
            .unwrap()
            .is_some());
        assert!(repository
            .create_match(&new_match("dup", noon() + Duration::days(1)))
            .await
            .unwrap()
            .is_none());
    }

    #[test(tokio::test)]
    async fn upcoming_matches_are_sorted_and_counted() {
        let repository = MatchRepository::new(test_pool().await);

        for (slug, offset) in [("later", 2), ("past", -2), ("sooner", 1)] {
            repository
                .create_match(&new_match(slug, noon() + Duration::days(offset)))
                .await
                .unwrap();
        }

        let upcoming = repository
            .get_upcoming_matches(GuildId::new(1), noon())
            .await
            .unwrap();

        let slugs: Vec<&str> = upcoming.iter().map(|(m, _)| m.slug.as_str()).collect();
        assert_eq!(slugs, vec!["sooner", "later"]);
        assert!(upcoming.iter().all(|(_, joined)| *joined == 0));
    }

    #[test(tokio::test)]
    async fn delete() {
        let repository = MatchRepository::new(test_pool().await);

        repository
            .create_match(&new_match("gone", noon()))
            .await
            .unwrap();

        assert!(repository
            .delete_match(GuildId::new(1), "gone")
            .await
            .unwrap());
        assert!(!repository
            .delete_match(GuildId::new(1), "gone")
            .await
            .unwrap());
    }

    #[test(tokio::test)]
    async fn ratio_without_counts_is_not_stored() {
        let pool = test_pool().await;

        let inserted = sqlx::query(
            r#"
                INSERT INTO matches (
                    guild, channel, organizer, hub, slug, display_name, starts_at,
                    gender_policy, ratio_men, ratio_women, age_policy, skill_levels, max_players
                )
                VALUES (1, 2, 3, 'soccer', 'broken', 'Broken', '2030-06-01 12:00:00',
                    'Ratio', 2, NULL, 'NoRestriction', 'all', 10)
            "#,
        )
        .execute(&pool)
        .await;

        assert!(inserted.is_err());
        assert!(MatchRepository::new(pool)
            .get_match_by_slug(GuildId::new(1), "broken")
            .await
            .unwrap()
            .is_none());
    }
}
