use poise::serenity_prelude::{ChannelId, GuildId, UserId};

use crate::eligibility::MatchRestrictions;

use super::types::UtcDateTime;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MatchId(pub u64);

#[derive(Clone, Debug)]
pub struct Match {
    pub id: MatchId,
    pub guild: GuildId,
    pub channel: ChannelId,
    pub organizer: UserId,
    pub hub: String,
    pub slug: String,
    pub display_name: String,
    pub starts_at: UtcDateTime,
    pub restrictions: MatchRestrictions,
}

// TODO: Find a way to avoid such copy-paste
#[derive(Clone, Debug)]
pub struct NewMatch {
    pub guild: GuildId,
    pub channel: ChannelId,
    pub organizer: UserId,
    pub hub: String,
    pub slug: String,
    pub display_name: String,
    pub starts_at: UtcDateTime,
    pub restrictions: MatchRestrictions,
}
