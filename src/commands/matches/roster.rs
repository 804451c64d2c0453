use indoc::formatdoc;
use poise::{serenity_prelude::Mentionable, CreateReply};

use crate::{
    commands::{arguments::MatchSlug, internal_err, CommandResult, Context},
    eligibility::balance_teams,
    models::{RosterEntry, SkillLevel},
    utils::formatting::split_message,
};

use super::find_match;

fn rank(entry: &RosterEntry) -> u8 {
    entry
        .skill_level
        .as_deref()
        .map(SkillLevel::rank_of)
        .unwrap_or(0)
}

fn format_entries<'a>(entries: impl IntoIterator<Item = &'a RosterEntry>) -> String {
    entries.into_iter().fold(String::new(), |acc, entry| {
        acc + &format!(
            " - {} ({})\n",
            entry.participant.player.mention(),
            entry.skill_level.as_deref().unwrap_or("no skill level"),
        )
    })
}

/// Show who joined a match.
#[poise::command(slash_command, guild_only, rename = "roster")]
pub async fn roster(
    ctx: Context<'_>,
    #[description = "Match slug"] slug: MatchSlug,
) -> CommandResult {
    let found = find_match(&ctx, &slug).await?;

    let roster = ctx
        .data()
        .participant_repository
        .get_roster(found.id)
        .await
        .map_err(|err| internal_err(format!("Could not get the roster: {err}")))?;

    if roster.is_empty() {
        ctx.send(
            CreateReply::default()
                .ephemeral(true)
                .content(format!("# Nobody joined {} yet", found.display_name)),
        )
        .await?;

        return Ok(());
    }

    let mut message = formatdoc! {
        r#"
            # {display_name}: {joined}/{max_players} players
            {players}
        "#,
        display_name = found.display_name,
        joined = roster.len(),
        max_players = found.restrictions.max_players,
        players = format_entries(&roster),
    };

    if found.restrictions.team_balancing && roster.len() > 1 {
        let teams = balance_teams(roster, rank);

        message += &formatdoc! {
            r#"

                ## Proposed teams
                **Home**
                {home}
                **Away**
                {away}
            "#,
            home = format_entries(&teams.home),
            away = format_entries(&teams.away),
        };
    }

    // A full roster for a big match doesn't fit into a single message.
    for part in split_message(&message) {
        ctx.send(CreateReply::default().ephemeral(true).content(part))
            .await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use poise::serenity_prelude::UserId;
    use time::macros::datetime;

    use crate::{
        eligibility::balance_teams,
        models::{types::UtcDateTime, Gender, MatchId, Participant, ParticipantId, RosterEntry},
        utils::formatting::{split_message, MESSAGE_LIMIT},
    };

    use super::{format_entries, rank};

    fn entry(n: u64, skill_level: Option<&str>) -> RosterEntry {
        RosterEntry {
            participant: Participant {
                id: ParticipantId(n),
                match_id: MatchId(1),
                player: UserId::new(100_000_000_000_000_000 + n),
                gender: Gender::Male,
                joined_at: UtcDateTime::from(datetime!(2030-05-01 10:00 UTC)),
            },
            skill_level: skill_level.map(str::to_string),
        }
    }

    #[test]
    fn entry_lines() {
        let entries = [entry(1, Some("advanced")), entry(2, None)];

        assert_eq!(
            format_entries(&entries),
            " - <@100000000000000001> (advanced)\n - <@100000000000000002> (no skill level)\n"
        );
    }

    #[test]
    fn largest_roster_is_sent_in_parts() {
        let roster: Vec<RosterEntry> = (1..=200).map(|n| entry(n, Some("intermediate"))).collect();
        let players = format_entries(&roster);
        let teams = balance_teams(roster, rank);
        let message = players + &format_entries(&teams.home) + &format_entries(&teams.away);

        let parts = split_message(&message);

        assert!(message.chars().count() > MESSAGE_LIMIT);
        assert!(parts.len() > 1);
        assert!(parts
            .iter()
            .all(|part| part.chars().count() <= MESSAGE_LIMIT));
        assert!(parts.iter().all(|part| part.ends_with('\n')));
        assert_eq!(parts.concat(), message);
    }
}
