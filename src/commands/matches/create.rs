use std::str::FromStr;

use indoc::formatdoc;
use poise::{serenity_prelude::Mentionable, CreateReply};
use time::OffsetDateTime;
use tracing::info;

use crate::{
    commands::{
        arguments::{AgePolicyChoice, GenderPolicyChoice, HumanDateTime, MatchSlug, TrimmedString},
        internal_err,
        kebab_slug::slugify_kebab,
        user_err, CommandResult, Context,
    },
    eligibility::{MatchRestrictions, SkillLevels},
    models::{normalize_hub, types::UtcDateTime, NewMatch},
    utils::formatting::{format_local, format_utc},
};

use super::{describe_restrictions, guild};

/// Organize a match in this channel.
#[allow(clippy::too_many_arguments)]
#[poise::command(slash_command, guild_only, rename = "create")]
pub async fn create(
    ctx: Context<'_>,

    #[description = "The name of the match to use in announcements."] display_name: TrimmedString,

    #[description = "The hub the match belongs to, e.g. soccer. Skill levels are taken from this hub."]
    hub: TrimmedString,

    #[description = "When the match starts, e.g. `2024-06-24 18:30 UTC+2`."] start: HumanDateTime,

    #[description = "How many players can join."]
    #[min = 1]
    #[max = 200]
    max_players: u32,

    #[description = "Who can join. Defaults to mixed."] gender_policy: Option<GenderPolicyChoice>,

    #[description = "Men in the target ratio, for the ratio gender policy."]
    #[max = 100]
    ratio_men: Option<u32>,

    #[description = "Women in the target ratio, for the ratio gender policy."]
    #[max = 100]
    ratio_women: Option<u32>,

    #[description = "Age restriction. Defaults to none."] age_policy: Option<AgePolicyChoice>,

    #[description = "Minimum age, for the custom range age policy."]
    #[max = 150]
    min_age: Option<u32>,

    #[description = "Maximum age, for the custom range age policy."]
    #[max = 150]
    max_age: Option<u32>,

    #[description = "Comma-separated allowed skill levels, e.g. `advanced, professional`. Defaults to `all`."]
    skill_levels: Option<SkillLevels>,

    #[description = "Propose balanced teams in the roster. Defaults to no."] team_balancing: Option<
        bool,
    >,

    #[description = "The name of the match to use in commands. Generated from the display name by default."]
    slug: Option<MatchSlug>,
) -> CommandResult {
    if display_name.is_empty() {
        return Err(user_err("The display name can't be empty."));
    }

    if hub.is_empty() {
        return Err(user_err("The hub can't be empty."));
    }

    let restrictions = MatchRestrictions {
        gender: gender_policy
            .unwrap_or(GenderPolicyChoice::Mixed)
            .into_policy(ratio_men, ratio_women)?,
        age: age_policy
            .unwrap_or(AgePolicyChoice::NoRestriction)
            .into_policy(min_age, max_age)?,
        skill_levels: skill_levels.unwrap_or_else(SkillLevels::all),
        max_players,
        team_balancing: team_balancing.unwrap_or(false),
    };

    restrictions
        .validate()
        .map_err(|err| user_err(format!("**Invalid restrictions.** {err}")))?;

    let now = OffsetDateTime::now_utc();
    let start = start.materialize(now);
    if start <= now {
        return Err(user_err(format!(
            "The match should start in the future, but `{}` UTC has already passed.",
            format_utc(start)
        )));
    }

    let slug = match slug {
        Some(slug) => slug,
        None => MatchSlug::from_str(&slugify_kebab(display_name.as_ref())).map_err(|_| {
            user_err("Could not make a slug from the display name, please provide the `slug` option.")
        })?,
    };

    let new_match = NewMatch {
        guild: guild(&ctx)?,
        channel: ctx.channel_id(),
        organizer: ctx.author().id,
        hub: normalize_hub(hub.as_ref()),
        slug: slug.into(),
        display_name: display_name.into(),
        starts_at: UtcDateTime::from(start),
        restrictions,
    };

    let created = ctx
        .data()
        .match_repository
        .create_match(&new_match)
        .await
        .map_err(|err| internal_err(format!("Could not create the match: {err}")))?;

    let Some(created) = created else {
        return Err(user_err(format!(
            "A match with slug `{}` already exists in this server, please pick another slug.",
            new_match.slug
        )));
    };

    info!(
        "Match {} (id {:?}) created by {} in guild {}",
        created.slug, created.id, created.organizer, created.guild
    );

    let message = formatdoc! {
        r#"
            # {display_name}
            Organized by {organizer} in the **{hub}** hub.

            Starts at {start_local} your time or {start_utc} UTC.

            {restrictions}

            Use `/match join {slug}` to join.
        "#,
        display_name = created.display_name,
        organizer = created.organizer.mention(),
        hub = created.hub,
        start_local = format_local(created.starts_at),
        start_utc = format_utc(created.starts_at),
        restrictions = describe_restrictions(&created.restrictions),
        slug = created.slug,
    };

    ctx.send(CreateReply::default().content(message)).await?;

    Ok(())
}
