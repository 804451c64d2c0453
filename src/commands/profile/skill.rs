use poise::CreateReply;

use crate::{
    commands::{arguments::TrimmedString, internal_err, user_err, CommandResult, Context},
    models::{normalize_hub, HubProfile, SkillLevel},
};

/// Set your skill level in a hub.
#[poise::command(slash_command, rename = "skill")]
pub async fn skill(
    ctx: Context<'_>,
    #[description = "The hub, e.g. soccer."] hub: TrimmedString,
    #[description = "Your skill level in this hub."] level: SkillLevel,
) -> CommandResult {
    if hub.is_empty() {
        return Err(user_err("The hub can't be empty."));
    }

    let hub_profile = HubProfile {
        player: ctx.author().id,
        hub: normalize_hub(hub.as_ref()),
        skill_level: level.as_ref().to_string(),
    };

    ctx.data()
        .profile_repository
        .upsert_hub_profile(&hub_profile)
        .await
        .map_err(|err| internal_err(format!("Could not save your skill level: {err}")))?;

    ctx.send(CreateReply::default().ephemeral(true).content(format!(
        "**Saved.** Your skill level in the **{}** hub is {}.",
        hub_profile.hub, hub_profile.skill_level
    )))
    .await?;

    Ok(())
}
