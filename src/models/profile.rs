use poise::{serenity_prelude::UserId, ChoiceParameter};
use strum::{AsRefStr, EnumIter};
use time::Date;

#[derive(ChoiceParameter, AsRefStr, EnumIter, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Gender {
    #[name = "Male"]
    Male,
    #[name = "Female"]
    Female,
    #[name = "Other"]
    Other,
    #[name = "Prefer not to say"]
    Undisclosed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Profile {
    pub player: UserId,
    pub gender: Gender,
    pub birth_date: Option<Date>,
}
