use poise::CreateReply;
use tracing::info;

use crate::commands::{arguments::MatchSlug, internal_err, user_err, CommandResult, Context};

use super::{find_match, guild};

/// Delete a match you organize.
#[poise::command(slash_command, guild_only, rename = "delete")]
pub async fn delete(
    ctx: Context<'_>,
    #[description = "Match slug"] slug: MatchSlug,
) -> CommandResult {
    let found = find_match(&ctx, &slug).await?;

    if found.organizer != ctx.author().id {
        return Err(user_err("Only the organizer of the match can delete it."));
    }

    let deleted = ctx
        .data()
        .match_repository
        .delete_match(guild(&ctx)?, slug.as_ref())
        .await
        .map_err(|err| internal_err(format!("Could not delete the match: {err}")))?;

    if !deleted {
        return Err(user_err(format!("Match with slug `{slug}` does not exist")));
    }

    info!("Match {} (id {:?}) deleted", found.slug, found.id);

    ctx.send(CreateReply::default().content(format!("# Match `{slug}` deleted")))
        .await?;

    Ok(())
}
