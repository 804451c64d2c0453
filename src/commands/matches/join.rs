use indoc::formatdoc;
use poise::CreateReply;

use crate::{
    commands::{arguments::MatchSlug, CommandResult, Context},
    utils::formatting::{format_local, format_utc},
};

use super::find_match;

/// Join a match.
#[poise::command(slash_command, guild_only, rename = "join")]
pub async fn join(
    ctx: Context<'_>,
    #[description = "Match slug"] slug: MatchSlug,
) -> CommandResult {
    let found = find_match(&ctx, &slug).await?;

    ctx.data()
        .join_service
        .join(found.id, ctx.author().id)
        .await?;

    let message = formatdoc! {
        r#"
            **You joined {display_name}!**

            The match starts at {start_local} your time or {start_utc} UTC.
        "#,
        display_name = found.display_name,
        start_local = format_local(found.starts_at),
        start_utc = format_utc(found.starts_at),
    };

    ctx.send(CreateReply::default().ephemeral(true).content(message))
        .await?;

    Ok(())
}
