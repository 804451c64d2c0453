mod hub_profile;
mod matches;
mod participant;
mod profile;

pub mod types;

pub use hub_profile::{normalize_hub, HubProfile, SkillLevel};
pub use matches::{Match, MatchId, NewMatch};
pub use participant::{NewParticipant, Participant, ParticipantId, RosterEntry};
pub use profile::{Gender, Profile};
