use async_trait::async_trait;
use poise::serenity_prelude::UserId;
use sqlx::{query, query_as, FromRow, Pool, Sqlite};
use time::Date;

use crate::{
    eligibility::CandidateProfile,
    models::{normalize_hub, Gender, HubProfile, Profile},
};

use super::{
    conversion::{DBConvertible, DBFromConversionError, DBToConversionError},
    ProfileStore,
};

pub struct ProfileRepository {
    pool: Pool<Sqlite>,
}

impl ProfileRepository {
    pub fn new(pool: Pool<Sqlite>) -> ProfileRepository {
        ProfileRepository { pool }
    }

    pub async fn upsert_profile(&self, profile: &Profile) -> Result<(), anyhow::Error> {
        let row = profile.to_db()?;

        let mut transaction = self.pool.begin().await?;

        query(
            r#"
                INSERT INTO profiles (player, gender, birth_date)
                VALUES ($1, $2, $3)
                ON CONFLICT (player) DO UPDATE SET gender = $2, birth_date = $3
            "#,
        )
        .bind(row.player)
        .bind(row.gender)
        .bind(row.birth_date)
        .execute(&mut *transaction)
        .await?;

        transaction.commit().await?;

        Ok(())
    }

    pub async fn get_profile(&self, player: UserId) -> Result<Option<Profile>, anyhow::Error> {
        let mut transaction = self.pool.begin().await?;

        let profile = query_as::<_, SqlProfile>(
            "SELECT player, gender, birth_date FROM profiles WHERE player = $1",
        )
        .bind(player.to_db()?)
        .fetch_optional(&mut *transaction)
        .await?;

        transaction.commit().await?;

        match profile {
            Some(profile) => Ok(Some(Profile::from_db(&profile)?)),
            None => Ok(None),
        }
    }

    pub async fn upsert_hub_profile(&self, hub_profile: &HubProfile) -> Result<(), anyhow::Error> {
        let row = hub_profile.to_db()?;

        let mut transaction = self.pool.begin().await?;

        query(
            r#"
                INSERT INTO hub_profiles (player, hub, skill_level)
                VALUES ($1, $2, $3)
                ON CONFLICT (player, hub) DO UPDATE SET skill_level = $3
            "#,
        )
        .bind(row.player)
        .bind(row.hub)
        .bind(row.skill_level)
        .execute(&mut *transaction)
        .await?;

        transaction.commit().await?;

        Ok(())
    }

    pub async fn get_hub_profiles(&self, player: UserId) -> Result<Vec<HubProfile>, anyhow::Error> {
        let mut transaction = self.pool.begin().await?;

        let hub_profiles = query_as::<_, SqlHubProfile>(
            "SELECT player, hub, skill_level FROM hub_profiles WHERE player = $1 ORDER BY hub",
        )
        .bind(player.to_db()?)
        .fetch_all(&mut *transaction)
        .await?;

        transaction.commit().await?;

        Ok(hub_profiles
            .iter()
            .map(HubProfile::from_db)
            .collect::<Result<_, _>>()?)
    }
}

#[async_trait]
impl ProfileStore for ProfileRepository {
    async fn get_candidate(
        &self,
        player: UserId,
        hub: &str,
    ) -> Result<CandidateProfile, anyhow::Error> {
        let player = player.to_db()?;

        let mut transaction = self.pool.begin().await?;

        let profile = query_as::<_, SqlProfile>(
            "SELECT player, gender, birth_date FROM profiles WHERE player = $1",
        )
        .bind(player)
        .fetch_optional(&mut *transaction)
        .await?;

        let skill_level: Option<(String,)> =
            query_as("SELECT skill_level FROM hub_profiles WHERE player = $1 AND hub = $2")
                .bind(player)
                .bind(normalize_hub(hub))
                .fetch_optional(&mut *transaction)
                .await?;

        transaction.commit().await?;

        let skill_level = skill_level.map(|(level,)| level);

        match profile {
            Some(profile) => {
                let profile = Profile::from_db(&profile)?;
                Ok(CandidateProfile {
                    gender: profile.gender,
                    birth_date: profile.birth_date,
                    skill_level,
                })
            }
            None => Ok(CandidateProfile {
                gender: Gender::Undisclosed,
                birth_date: None,
                skill_level,
            }),
        }
    }
}

#[derive(Debug, FromRow)]
pub struct SqlProfile {
    player: i64,
    gender: String,
    birth_date: Option<String>,
}

impl DBConvertible for Profile {
    type DBType = SqlProfile;

    fn to_db(&self) -> Result<Self::DBType, DBToConversionError> {
        Ok(SqlProfile {
            player: self.player.to_db()?,
            gender: self.gender.to_db()?,
            birth_date: self.birth_date.map(|date| date.to_db()).transpose()?,
        })
    }

    fn from_db(value: &Self::DBType) -> Result<Self, DBFromConversionError> {
        Ok(Profile {
            player: UserId::from_db(&value.player)?,
            gender: Gender::from_db(&value.gender)?,
            birth_date: value.birth_date.as_ref().map(Date::from_db).transpose()?,
        })
    }
}

#[derive(Debug, FromRow)]
pub struct SqlHubProfile {
    player: i64,
    hub: String,
    skill_level: String,
}

impl DBConvertible for HubProfile {
    type DBType = SqlHubProfile;

    fn to_db(&self) -> Result<Self::DBType, DBToConversionError> {
        Ok(SqlHubProfile {
            player: self.player.to_db()?,
            hub: normalize_hub(&self.hub),
            skill_level: self.skill_level.trim().to_lowercase(),
        })
    }

    fn from_db(value: &Self::DBType) -> Result<Self, DBFromConversionError> {
        Ok(HubProfile {
            player: UserId::from_db(&value.player)?,
            hub: value.hub.clone(),
            skill_level: value.skill_level.clone(),
        })
    }
}
