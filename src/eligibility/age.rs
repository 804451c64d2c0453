use time::Date;

/// Age in whole years on `today`. A birthday that hasn't come yet this year
/// doesn't count. Birth dates in the future give zero.
pub fn age_on(birth_date: Date, today: Date) -> u32 {
    let mut years = today.year() - birth_date.year();

    if (today.month() as u8, today.day()) < (birth_date.month() as u8, birth_date.day()) {
        years -= 1;
    }

    years.max(0) as u32
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::age_on;

    #[test]
    fn birthday_today() {
        assert_eq!(age_on(date!(2006 - 05 - 17), date!(2024 - 05 - 17)), 18);
    }

    #[test]
    fn birthday_tomorrow() {
        assert_eq!(age_on(date!(2006 - 05 - 18), date!(2024 - 05 - 17)), 17);
    }

    #[test]
    fn birthday_passed() {
        assert_eq!(age_on(date!(2006 - 01 - 02), date!(2024 - 05 - 17)), 18);
    }

    #[test]
    fn leap_day_birthday() {
        assert_eq!(age_on(date!(2004 - 02 - 29), date!(2022 - 02 - 28)), 17);
        assert_eq!(age_on(date!(2004 - 02 - 29), date!(2022 - 03 - 01)), 18);
        assert_eq!(age_on(date!(2004 - 02 - 29), date!(2024 - 02 - 29)), 20);
    }

    #[test]
    fn born_in_the_future() {
        assert_eq!(age_on(date!(2030 - 01 - 01), date!(2024 - 05 - 17)), 0);
    }
}
