#![warn(missing_docs)]

//! Card validation and masking types.

mod validate;

use common_utils::{date_time, errors};
use error_stack::report;
use masking::{PeekInterface, StrongSecret};
use time::{util::days_in_year_month, Date, Duration, Month, PrimitiveDateTime, Time};
pub use validate::{
    is_valid_card_number, is_valid_holder_name, CardBrand, CardNumber, CardNumberStrategy,
    CardSecurityCode, CardValidationError, MAX_HOLDER_NAME_LENGTH,
};

/// How far into the future an expiry year may lie.
pub const EXPIRY_YEAR_WINDOW: u16 = 20;

/// A validated card expiration month (1 through 12).
pub struct CardExpirationMonth(StrongSecret<u8>);

impl CardExpirationMonth {
    /// Validate and wrap a month number.
    pub fn new(month: u8) -> errors::CustomResult<Self, errors::ValidationError> {
        if (1..=12).contains(&month) {
            Ok(Self(StrongSecret::new(month)))
        } else {
            Err(report!(errors::ValidationError::InvalidValue {
                message: "invalid card expiration month".to_string()
            }))
        }
    }

    /// The month as a zero-padded two digit string.
    pub fn two_digits(&self) -> String {
        format!("{:02}", self.0.peek())
    }

    /// The raw month number.
    pub fn number(&self) -> u8 {
        *self.0.peek()
    }
}

/// A validated card expiration year, bounded to a window starting at the
/// current year.
pub struct CardExpirationYear(StrongSecret<u16>);

impl CardExpirationYear {
    /// Validate and wrap a four digit year.
    pub fn new(year: u16) -> errors::CustomResult<Self, errors::ValidationError> {
        let current_year = u16::try_from(date_time::now().year()).unwrap_or(u16::MAX);

        if (current_year..=current_year.saturating_add(EXPIRY_YEAR_WINDOW)).contains(&year) {
            Ok(Self(StrongSecret::new(year)))
        } else {
            Err(report!(errors::ValidationError::InvalidValue {
                message: "invalid card expiration year".to_string()
            }))
        }
    }

    /// The year as four digits.
    pub fn four_digits(&self) -> String {
        self.0.peek().to_string()
    }

    /// The year's final two digits.
    pub fn two_digits(&self) -> String {
        format!("{:02}", self.0.peek() % 100)
    }

    /// The raw year number.
    pub fn number(&self) -> u16 {
        *self.0.peek()
    }
}

/// A validated card expiration date.
pub struct CardExpiration {
    /// Expiration month.
    pub month: CardExpirationMonth,
    /// Expiration year.
    pub year: CardExpirationYear,
}

impl CardExpiration {
    /// Validate and combine a month and a four digit year. A date in the
    /// current year but before the current month is rejected.
    pub fn new(month: u8, year: u16) -> errors::CustomResult<Self, errors::ValidationError> {
        let month = CardExpirationMonth::new(month)?;
        let year = CardExpirationYear::new(year)?;

        let now = date_time::now();
        let current_year = u16::try_from(now.year()).unwrap_or(u16::MAX);
        if year.number() == current_year && month.number() < u8::from(now.month()) {
            return Err(report!(errors::ValidationError::InvalidValue {
                message: "card expiration date is in the past".to_string()
            }));
        }

        Ok(Self { month, year })
    }

    /// Whether the expiration date has passed. Cards stay usable through the
    /// last day of their expiration month, in any timezone.
    pub fn is_expired(&self) -> bool {
        let current_datetime_utc = date_time::now();

        let year = i32::from(self.year.number());
        let Ok(month) = Month::try_from(self.month.number()) else {
            return true;
        };
        let expiration_day = days_in_year_month(year, month);
        let Ok(expiration_date) = Date::from_calendar_date(year, month, expiration_day) else {
            return true;
        };

        // max diff between utc and any local timezone is 14 hours
        let expiration_datetime_utc =
            PrimitiveDateTime::new(expiration_date, Time::MIDNIGHT) + Duration::hours(38);

        current_datetime_utc > expiration_datetime_utc
    }
}

/// Expiry validity for raw text input ("MM/YY" and friends): strip
/// non-digits, then require a real month within a twenty-year window that
/// has not already passed this year.
pub fn is_valid_expiry_text(text: &str) -> bool {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() != 4 {
        return false;
    }
    let (month_digits, year_digits) = digits.split_at(2);
    let (Ok(month), Ok(year)) = (month_digits.parse::<u8>(), year_digits.parse::<u8>()) else {
        return false;
    };

    if !(1..=12).contains(&month) {
        return false;
    }

    let now = date_time::now();
    let current_year = u8::try_from(now.year().rem_euclid(100)).unwrap_or(u8::MAX);
    let current_month = u8::from(now.month());

    if year < current_year || year > current_year.saturating_add(20) {
        return false;
    }
    if year == current_year && month < current_month {
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use common_utils::date_time;

    use super::*;

    fn current_month_year() -> (u8, u8) {
        let now = date_time::now();
        (
            u8::from(now.month()),
            u8::try_from(now.year().rem_euclid(100)).unwrap(),
        )
    }

    #[test]
    fn current_month_is_valid() {
        let (month, year) = current_month_year();
        assert!(is_valid_expiry_text(&format!("{month:02}/{year:02}")));
    }

    #[test]
    fn previous_year_is_invalid() {
        let (month, year) = current_month_year();
        assert!(!is_valid_expiry_text(&format!(
            "{:02}/{:02}",
            month,
            year.wrapping_sub(1)
        )));
    }

    #[test]
    fn month_thirteen_is_invalid() {
        let (_, year) = current_month_year();
        assert!(!is_valid_expiry_text(&format!("13/{:02}", year + 1)));
    }

    #[test]
    fn separator_is_stripped() {
        let (month, year) = current_month_year();
        assert!(is_valid_expiry_text(&format!("{month:02} / {year:02}")));
        assert!(is_valid_expiry_text(&format!("{month:02}{year:02}")));
    }

    #[test]
    fn too_far_in_the_future_is_invalid() {
        let (month, year) = current_month_year();
        assert!(!is_valid_expiry_text(&format!("{:02}/{:02}", month, year + 21)));
    }

    #[test]
    fn structured_expiration_rejects_past_month() {
        let now = date_time::now();
        let year = u16::try_from(now.year()).unwrap();
        let month = u8::from(now.month());
        assert!(CardExpiration::new(month, year).is_ok());
        if month > 1 {
            assert!(CardExpiration::new(month - 1, year).is_err());
        }
        assert!(CardExpiration::new(month, year + 21).is_err());
        assert!(CardExpiration::new(13, year + 1).is_err());
    }

    #[test]
    fn expiration_runs_to_end_of_month() {
        let now = date_time::now();
        let year = u16::try_from(now.year()).unwrap();
        let month = u8::from(now.month());
        let expiration = CardExpiration::new(month, year).expect("current month");
        assert!(!expiration.is_expired());
    }
}
