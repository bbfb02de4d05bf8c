// Age calculation for sign-up.

use chrono::{Datelike, NaiveDate};

use super::AuthError;

pub const MIN_AGE: i32 = 16;
pub const MAX_AGE: i32 = 50;

/// Elapsed full years between `birth` and `today`.
///
/// The calendar-year difference is reduced by one when today's month/day
/// falls before the birthday within the year.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

/// Checks that a birth date is present and yields an age in [MIN_AGE, MAX_AGE].
pub fn validate_age(birth: Option<NaiveDate>, today: NaiveDate) -> Result<i32, AuthError> {
    let birth = birth.ok_or(AuthError::MissingField("date of birth"))?;
    let age = age_on(birth, today);
    if !(MIN_AGE..=MAX_AGE).contains(&age) {
        return Err(AuthError::AgeOutOfRange { age });
    }
    Ok(age)
}

/// Parses a `YYYY-MM-DD` birth date as typed into the sign-up prompt.
pub fn parse_birth_date(input: &str) -> Result<Option<NaiveDate>, AuthError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| AuthError::InvalidDate(input.to_string()))
}
