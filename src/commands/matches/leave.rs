use poise::CreateReply;

use crate::commands::{arguments::MatchSlug, user_err, CommandResult, Context};

use super::find_match;

/// Leave a match you joined.
#[poise::command(slash_command, guild_only, rename = "leave")]
pub async fn leave(
    ctx: Context<'_>,
    #[description = "Match slug"] slug: MatchSlug,
) -> CommandResult {
    let found = find_match(&ctx, &slug).await?;

    let left = ctx
        .data()
        .join_service
        .leave(found.id, ctx.author().id)
        .await?;

    if !left {
        return Err(user_err(format!("You are not in **{}**.", found.display_name)));
    }

    ctx.send(
        CreateReply::default()
            .ephemeral(true)
            .content(format!("You left **{}**.", found.display_name)),
    )
    .await?;

    Ok(())
}
