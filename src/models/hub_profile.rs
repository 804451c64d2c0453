use poise::{serenity_prelude::UserId, ChoiceParameter};
use strum::{AsRefStr, EnumIter, IntoEnumIterator};

/// Skill levels offered by the bot. Stored as lower-case strings, so restrictions
/// and sub-profiles created elsewhere may carry levels outside of this list.
#[derive(ChoiceParameter, AsRefStr, EnumIter, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[strum(serialize_all = "lowercase")]
pub enum SkillLevel {
    #[name = "Beginner"]
    Beginner,
    #[name = "Intermediate"]
    Intermediate,
    #[name = "Advanced"]
    Advanced,
    #[name = "Professional"]
    Professional,
}

impl SkillLevel {
    pub fn parse(level: &str) -> Option<SkillLevel> {
        SkillLevel::iter().find(|known| known.as_ref().eq_ignore_ascii_case(level.trim()))
    }

    pub fn rank(&self) -> u8 {
        use SkillLevel::*;

        match self {
            Beginner => 1,
            Intermediate => 2,
            Advanced => 3,
            Professional => 4,
        }
    }

    /// Unknown levels rank below every known one.
    pub fn rank_of(level: &str) -> u8 {
        SkillLevel::parse(level).map(|l| l.rank()).unwrap_or(0)
    }
}

/// A player's sub-profile in a hub, e.g. their soccer profile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HubProfile {
    pub player: UserId,
    pub hub: String,
    pub skill_level: String,
}

pub fn normalize_hub(hub: &str) -> String {
    hub.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::{normalize_hub, SkillLevel};

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(SkillLevel::parse("ADVANCED"), Some(SkillLevel::Advanced));
        assert_eq!(SkillLevel::parse(" beginner "), Some(SkillLevel::Beginner));
        assert_eq!(SkillLevel::parse("grandmaster"), None);
    }

    #[test]
    fn stored_as_lowercase() {
        assert_eq!(SkillLevel::Professional.as_ref(), "professional");
    }

    #[test]
    fn unknown_levels_rank_lowest() {
        assert_eq!(SkillLevel::rank_of("grandmaster"), 0);
        assert!(SkillLevel::rank_of("Beginner") < SkillLevel::rank_of("intermediate"));
        assert!(SkillLevel::rank_of("advanced") < SkillLevel::rank_of("professional"));
    }

    #[test]
    fn hubs_are_lowercased() {
        assert_eq!(normalize_hub("  Soccer "), "soccer");
    }
}
