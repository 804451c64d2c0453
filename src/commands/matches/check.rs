use indoc::formatdoc;
use poise::CreateReply;
use tracing::debug;

use crate::commands::{arguments::MatchSlug, CommandResult, Context};

use super::find_match;

/// Check whether you can join a match, without joining it.
#[poise::command(slash_command, guild_only, rename = "check")]
pub async fn check(
    ctx: Context<'_>,
    #[description = "Match slug"] slug: MatchSlug,
) -> CommandResult {
    let found = find_match(&ctx, &slug).await?;
    let player = ctx.author().id;

    let eligibility = ctx.data().join_service.check(found.id, player).await?;

    debug!(
        "Player {player} checked match {:?}, eligible: {}",
        found.id,
        eligibility.is_eligible()
    );

    let message = match eligibility.rejection() {
        None => formatdoc! {
            r#"
                **You can join {display_name}.**

                Use `/match join {slug}` to take a slot.
            "#,
            display_name = found.display_name,
            slug = found.slug,
        },
        Some(rejection) => formatdoc! {
            r#"
                **You can't join {display_name}.**

                Reason: {rejection}.
            "#,
            display_name = found.display_name,
        },
    };

    ctx.send(CreateReply::default().ephemeral(true).content(message))
        .await?;

    Ok(())
}
