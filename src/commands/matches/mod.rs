mod check;
mod create;
mod delete;
mod join;
mod leave;
mod list;
mod roster;

use indoc::formatdoc;
use poise::serenity_prelude::GuildId;

use crate::{
    eligibility::{AgePolicy, GenderPolicy, MatchRestrictions},
    join_service::JoinError,
    models::Match,
};

use super::{arguments::MatchSlug, internal_err, user_err, CommandError, CommandResult, Context};

#[poise::command(
    slash_command,
    guild_only,
    rename = "match",
    subcommands(
        "create::create",
        "list::list",
        "check::check",
        "join::join",
        "leave::leave",
        "roster::roster",
        "delete::delete"
    ),
    subcommand_required
)]
pub async fn matches(_ctx: Context<'_>) -> CommandResult {
    Ok(())
}

fn guild(ctx: &Context<'_>) -> Result<GuildId, CommandError> {
    ctx.guild_id()
        .ok_or(internal_err("This command should be executed only in a guild"))
}

async fn find_match(ctx: &Context<'_>, slug: &MatchSlug) -> Result<Match, CommandError> {
    let found = ctx
        .data()
        .match_repository
        .get_match_by_slug(guild(ctx)?, slug.as_ref())
        .await
        .map_err(|err| internal_err(format!("Could not get the match: {err}")))?;

    found.ok_or_else(|| user_err(format!("Match with slug `{slug}` does not exist")))
}

fn describe_restrictions(restrictions: &MatchRestrictions) -> String {
    let gender = match restrictions.gender {
        GenderPolicy::Mixed => "mixed".to_string(),
        GenderPolicy::MenOnly => "men only".to_string(),
        GenderPolicy::WomenOnly => "women only".to_string(),
        GenderPolicy::Ratio { men, women } => format!("{men}:{women} men to women"),
    };

    let age = match restrictions.age {
        AgePolicy::NoRestriction => "any".to_string(),
        AgePolicy::Under18 => "under 18".to_string(),
        AgePolicy::Over18 => "18 and over".to_string(),
        AgePolicy::CustomRange {
            min: Some(min),
            max: Some(max),
        } => format!("{min} to {max}"),
        AgePolicy::CustomRange {
            min: Some(min),
            max: None,
        } => format!("{min} and over"),
        AgePolicy::CustomRange {
            min: None,
            max: Some(max),
        } => format!("up to {max}"),
        AgePolicy::CustomRange {
            min: None,
            max: None,
        } => "any".to_string(),
    };

    formatdoc! {
        r#"
            **Gender:** {gender}
            **Age:** {age}
            **Skill levels:** {skill_levels}
            **Players:** up to {max_players}
            **Team balancing:** {team_balancing}
        "#,
        skill_levels = restrictions.skill_levels,
        max_players = restrictions.max_players,
        team_balancing = if restrictions.team_balancing { "on" } else { "off" },
    }
}

impl From<JoinError> for CommandError {
    fn from(value: JoinError) -> Self {
        match value {
            JoinError::MatchNotFound => user_err("**This match does not exist anymore.**"),
            JoinError::AlreadyJoined => user_err("**You have already joined this match.**"),
            JoinError::MatchFull => user_err(formatdoc! {
                r#"
                    **The match is full.**

                    Someone took the last slot just before you.
                "#
            }),
            JoinError::Ineligible(rejection) => user_err(formatdoc! {
                r#"
                    **You can't join this match.**

                    Reason: {rejection}.
                "#
            }),
            err @ JoinError::Unverifiable(_) => internal_err(err.to_string()),
        }
    }
}
