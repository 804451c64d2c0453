use super::{user_err, CommandError};

mod birth_date;
mod human_datetime;
mod match_slug;
mod policy_choices;
mod trimmed_string;

pub use birth_date::BirthDate;
pub use human_datetime::HumanDateTime;
pub use match_slug::MatchSlug;
pub use policy_choices::{AgePolicyChoice, GenderPolicyChoice};
pub use trimmed_string::TrimmedString;

pub fn invalid_argument(message: String) -> CommandError {
    user_err(message)
}
