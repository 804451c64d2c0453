use indoc::formatdoc;
use poise::{ChoiceParameter, CreateReply};

use crate::commands::{internal_err, CommandResult, Context};

/// Show your profile.
#[poise::command(slash_command, rename = "show")]
pub async fn show(ctx: Context<'_>) -> CommandResult {
    let player = ctx.author().id;
    let repository = &ctx.data().profile_repository;

    let profile = repository
        .get_profile(player)
        .await
        .map_err(|err| internal_err(format!("Could not get your profile: {err}")))?;

    let hub_profiles = repository
        .get_hub_profiles(player)
        .await
        .map_err(|err| internal_err(format!("Could not get your skill levels: {err}")))?;

    let (gender, birth_date) = match &profile {
        Some(profile) => (
            profile.gender.name().to_string(),
            profile
                .birth_date
                .map(|date| date.to_string())
                .unwrap_or_else(|| "not set".to_string()),
        ),
        None => ("not set".to_string(), "not set".to_string()),
    };

    let skill_levels = if hub_profiles.is_empty() {
        "None yet, use `/profile skill` to add one.\n".to_string()
    } else {
        hub_profiles.iter().fold(String::new(), |acc, hub_profile| {
            acc + &format!(" - **{}**: {}\n", hub_profile.hub, hub_profile.skill_level)
        })
    };

    let message = formatdoc! {
        r#"
            # Your profile
            Gender: {gender}
            Birth date: {birth_date}

            ## Skill levels
            {skill_levels}
        "#,
    };

    ctx.send(CreateReply::default().ephemeral(true).content(message))
        .await?;

    Ok(())
}
