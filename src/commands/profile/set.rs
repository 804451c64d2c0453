use indoc::formatdoc;
use poise::{ChoiceParameter, CreateReply};
use time::{Date, OffsetDateTime};
use tracing::info;

use crate::{
    commands::{arguments::BirthDate, internal_err, user_err, CommandResult, Context},
    models::{Gender, Profile},
};

/// Set your gender and birth date.
#[poise::command(slash_command, rename = "set")]
pub async fn set(
    ctx: Context<'_>,
    #[description = "Your gender."] gender: Gender,
    #[description = "Your birth date, e.g. `1995-08-21`. Keeps the current one if not given."]
    birth_date: Option<BirthDate>,
) -> CommandResult {
    let player = ctx.author().id;
    let repository = &ctx.data().profile_repository;

    let birth_date = match birth_date.map(Date::from) {
        Some(birth_date) if birth_date > OffsetDateTime::now_utc().date() => {
            return Err(user_err("Your birth date can't be in the future."));
        }
        Some(birth_date) => Some(birth_date),
        None => repository
            .get_profile(player)
            .await
            .map_err(|err| internal_err(format!("Could not get your profile: {err}")))?
            .and_then(|profile| profile.birth_date),
    };

    let profile = Profile {
        player,
        gender,
        birth_date,
    };

    repository
        .upsert_profile(&profile)
        .await
        .map_err(|err| internal_err(format!("Could not save your profile: {err}")))?;

    info!("Player {player} updated their profile");

    let message = formatdoc! {
        r#"
            **Profile saved.**

            Gender: {gender}
            Birth date: {birth_date}
        "#,
        gender = gender.name(),
        birth_date = birth_date
            .map(|date| date.to_string())
            .unwrap_or_else(|| "not set".to_string()),
    };

    ctx.send(CreateReply::default().ephemeral(true).content(message))
        .await?;

    Ok(())
}
