use poise::ChoiceParameter;

use crate::{
    commands::CommandError,
    eligibility::{AgePolicy, GenderPolicy},
};

use super::invalid_argument;

#[derive(ChoiceParameter, Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenderPolicyChoice {
    #[name = "Mixed"]
    Mixed,
    #[name = "Men only"]
    MenOnly,
    #[name = "Women only"]
    WomenOnly,
    #[name = "Men to women ratio"]
    Ratio,
}

impl GenderPolicyChoice {
    pub fn into_policy(
        self,
        ratio_men: Option<u32>,
        ratio_women: Option<u32>,
    ) -> Result<GenderPolicy, CommandError> {
        match (self, ratio_men, ratio_women) {
            (GenderPolicyChoice::Ratio, Some(men), Some(women)) => {
                Ok(GenderPolicy::Ratio { men, women })
            }
            (GenderPolicyChoice::Ratio, _, _) => Err(invalid_argument(
                "A ratio gender policy needs both `ratio_men` and `ratio_women`.".to_string(),
            )),
            (_, Some(_), _) | (_, _, Some(_)) => Err(invalid_argument(
                "`ratio_men` and `ratio_women` only apply to the ratio gender policy.".to_string(),
            )),
            (GenderPolicyChoice::Mixed, None, None) => Ok(GenderPolicy::Mixed),
            (GenderPolicyChoice::MenOnly, None, None) => Ok(GenderPolicy::MenOnly),
            (GenderPolicyChoice::WomenOnly, None, None) => Ok(GenderPolicy::WomenOnly),
        }
    }
}

#[derive(ChoiceParameter, Clone, Copy, Debug, PartialEq, Eq)]
pub enum AgePolicyChoice {
    #[name = "No restriction"]
    NoRestriction,
    #[name = "Under 18"]
    Under18,
    #[name = "18 and over"]
    Over18,
    #[name = "Custom range"]
    CustomRange,
}

impl AgePolicyChoice {
    pub fn into_policy(
        self,
        min_age: Option<u32>,
        max_age: Option<u32>,
    ) -> Result<AgePolicy, CommandError> {
        match (self, min_age, max_age) {
            (AgePolicyChoice::CustomRange, min, max) => Ok(AgePolicy::CustomRange { min, max }),
            (_, Some(_), _) | (_, _, Some(_)) => Err(invalid_argument(
                "`min_age` and `max_age` only apply to the custom range age policy.".to_string(),
            )),
            (AgePolicyChoice::NoRestriction, None, None) => Ok(AgePolicy::NoRestriction),
            (AgePolicyChoice::Under18, None, None) => Ok(AgePolicy::Under18),
            (AgePolicyChoice::Over18, None, None) => Ok(AgePolicy::Over18),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::eligibility::{AgePolicy, GenderPolicy};

    use super::{AgePolicyChoice, GenderPolicyChoice};

    #[test]
    fn ratio_needs_both_sides() {
        assert_eq!(
            GenderPolicyChoice::Ratio.into_policy(Some(2), Some(1)).unwrap(),
            GenderPolicy::Ratio { men: 2, women: 1 }
        );
        assert!(GenderPolicyChoice::Ratio.into_policy(Some(2), None).is_err());
    }

    #[test]
    fn ratio_values_without_ratio_policy() {
        assert!(GenderPolicyChoice::Mixed.into_policy(None, Some(1)).is_err());
        assert_eq!(
            GenderPolicyChoice::WomenOnly.into_policy(None, None).unwrap(),
            GenderPolicy::WomenOnly
        );
    }

    #[test]
    fn custom_range_is_left_to_validation() {
        assert_eq!(
            AgePolicyChoice::CustomRange.into_policy(None, None).unwrap(),
            AgePolicy::CustomRange {
                min: None,
                max: None
            }
        );
        assert!(AgePolicyChoice::Over18.into_policy(Some(18), None).is_err());
    }
}
