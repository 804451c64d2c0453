use poise::CreateReply;

use crate::{
    commands::{internal_err, CommandResult, Context},
    models::types::UtcDateTime,
    utils::formatting::{format_local, format_relative, format_utc, split_message},
};

use super::guild;

/// List upcoming matches in this server.
#[poise::command(slash_command, guild_only, rename = "list")]
pub async fn list(ctx: Context<'_>) -> CommandResult {
    let upcoming_matches = ctx
        .data()
        .match_repository
        .get_upcoming_matches(guild(&ctx)?, UtcDateTime::now())
        .await;

    match upcoming_matches {
        Ok(matches) if matches.is_empty() => {
            ctx.send(
                CreateReply::default()
                    .content("# There are no upcoming matches")
                    .ephemeral(true),
            )
            .await?;
        }

        Ok(matches) => {
            let list = matches.iter().fold(String::new(), |acc, (upcoming, joined)| {
                acc + &format!(
                    " - **{}** (slug: `{}`, hub: {}) - starts {}, at {} your time or {} UTC, {}/{} players\n",
                    upcoming.display_name,
                    upcoming.slug,
                    upcoming.hub,
                    format_relative(upcoming.starts_at),
                    format_local(upcoming.starts_at),
                    format_utc(upcoming.starts_at),
                    joined,
                    upcoming.restrictions.max_players,
                )
            });

            for part in split_message(&format!("# Upcoming matches:\n{list}")) {
                ctx.send(CreateReply::default().content(part).ephemeral(true))
                    .await?;
            }
        }

        Err(err) => {
            return Err(internal_err(format!(
                "Could not get the upcoming matches: {err}"
            )));
        }
    }

    Ok(())
}
