use std::{fmt, ops::Deref, str::FromStr, sync::LazyLock};

use masking::{PeekInterface, Strategy, StrongSecret, WithType};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Error produced when a card number fails brand, format or checksum checks.
#[derive(Debug, Deserialize, Serialize, Error)]
#[error("not a valid card number")]
pub struct CardValidationError;

/// Card brand, determined by the number's issuer prefix.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardBrand {
    /// Visa
    Visa,
    /// Mastercard
    Mastercard,
    /// American Express
    Amex,
    /// Discover
    Discover,
    /// No recognized issuer prefix.
    Unknown,
}

struct BrandPattern {
    brand: CardBrand,
    prefix: &'static str,
    full: &'static str,
    lengths: &'static [usize],
}

static BRAND_PATTERNS: &[BrandPattern] = &[
    BrandPattern {
        brand: CardBrand::Visa,
        prefix: r"^4",
        full: r"^4\d{12}(?:\d{3})?$",
        lengths: &[13, 16],
    },
    BrandPattern {
        brand: CardBrand::Mastercard,
        prefix: r"^(5[1-5]|2720|27[01]|2[3-6]|22[3-9]|222[1-9])",
        full: r"^(5[1-5]\d{14}|2(22[1-9]\d{12}|2[3-9]\d{13}|[3-6]\d{14}|7[01]\d{13}|720\d{12}))$",
        lengths: &[16],
    },
    BrandPattern {
        brand: CardBrand::Amex,
        prefix: r"^3[47]",
        full: r"^3[47]\d{13}$",
        lengths: &[15],
    },
    BrandPattern {
        brand: CardBrand::Discover,
        prefix: r"^6(011|5)",
        full: r"^6(?:011|5\d{2})\d{12}$",
        lengths: &[16],
    },
];

static PREFIX_REGEXES: LazyLock<Vec<Option<Regex>>> = LazyLock::new(|| {
    BRAND_PATTERNS
        .iter()
        .map(|pattern| Regex::new(pattern.prefix).ok())
        .collect()
});

static FULL_REGEXES: LazyLock<Vec<Option<Regex>>> = LazyLock::new(|| {
    BRAND_PATTERNS
        .iter()
        .map(|pattern| Regex::new(pattern.full).ok())
        .collect()
});

impl CardBrand {
    /// Determine the brand from a (possibly partial) card number.
    pub fn detect(number: &str) -> Self {
        BRAND_PATTERNS
            .iter()
            .zip(PREFIX_REGEXES.iter())
            .find(|(_, regex)| {
                regex
                    .as_ref()
                    .is_some_and(|regex| regex.is_match(number))
            })
            .map(|(pattern, _)| pattern.brand)
            .unwrap_or(Self::Unknown)
    }
}

/// Checksum over the card number.
///
/// Walking from the rightmost digit, every second digit is doubled; a
/// doubled digit contributes `(2d) % 9`, except that 9 contributes 9. The
/// number passes when the digit sum is divisible by ten.
fn luhn(number: &str) -> bool {
    let mut sum = 0u32;
    let mut double = false;
    for c in number.chars().rev() {
        let Some(digit) = c.to_digit(10) else {
            return false;
        };
        sum += if double {
            if digit == 9 {
                9
            } else {
                (digit * 2) % 9
            }
        } else {
            digit
        };
        double = !double;
    }
    !number.is_empty() && sum % 10 == 0
}

/// Full card number validity: recognized brand, brand-appropriate length,
/// brand pattern match and checksum pass.
pub fn is_valid_card_number(number: &str) -> bool {
    let digits: String = number.split_whitespace().collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    BRAND_PATTERNS
        .iter()
        .zip(FULL_REGEXES.iter())
        .any(|(pattern, regex)| {
            pattern.lengths.contains(&digits.len())
                && regex
                    .as_ref()
                    .is_some_and(|regex| regex.is_match(&digits))
        })
        && luhn(&digits)
}

/// A validated card number. Construction enforces the full validity check,
/// debug output shows the first six digits only, and the backing memory is
/// wiped on drop.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct CardNumber(StrongSecret<String, CardNumberStrategy>);

impl CardNumber {
    /// Brand of this card number.
    pub fn brand(&self) -> CardBrand {
        CardBrand::detect(self.0.peek())
    }

    /// First six digits, identifying the issuer.
    pub fn get_card_isin(&self) -> String {
        self.0.peek().chars().take(6).collect()
    }

    /// Last four digits, safe to display.
    pub fn get_last4(&self) -> String {
        let number = self.0.peek();
        number
            .chars()
            .skip(number.chars().count().saturating_sub(4))
            .collect()
    }
}

impl FromStr for CardNumber {
    type Err = CardValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if is_valid_card_number(s) {
            let digits: String = s.split_whitespace().collect();
            StrongSecret::from_str(&digits).map_or(Err(CardValidationError), |secret| {
                Ok(Self(secret))
            })
        } else {
            Err(CardValidationError)
        }
    }
}

impl TryFrom<String> for CardNumber {
    type Error = CardValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value)
    }
}

impl Deref for CardNumber {
    type Target = StrongSecret<String, CardNumberStrategy>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'de> Deserialize<'de> for CardNumber {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Masking strategy for card numbers: issuer prefix stays readable, the
/// account digits do not.
pub enum CardNumberStrategy {}

impl<T> Strategy<T> for CardNumberStrategy
where
    T: AsRef<str>,
{
    fn fmt(val: &T, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let val_str: &str = val.as_ref();

        if val_str.len() < 13 || val_str.len() > 19 {
            return WithType::fmt(val, f);
        }

        match val_str.get(..6) {
            Some(isin) => write!(f, "{}{}", isin, "*".repeat(val_str.len() - 6)),
            None => WithType::fmt(val, f),
        }
    }
}

static SECURITY_CODE_REGEX: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\d{3,4}$").ok());

/// A card security code (CVV/CVC), three or four digits.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct CardSecurityCode(StrongSecret<String>);

impl FromStr for CardSecurityCode {
    type Err = CardValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if SECURITY_CODE_REGEX
            .as_ref()
            .is_some_and(|regex| regex.is_match(s))
        {
            Ok(Self(StrongSecret::new(s.to_string())))
        } else {
            Err(CardValidationError)
        }
    }
}

impl Deref for CardSecurityCode {
    type Target = StrongSecret<String>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'de> Deserialize<'de> for CardSecurityCode {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Maximum length accepted for a cardholder name.
pub const MAX_HOLDER_NAME_LENGTH: usize = 60;

/// Whether `name` is acceptable as a cardholder name.
pub fn is_valid_holder_name(name: &str) -> bool {
    !name.trim().is_empty() && name.chars().count() <= MAX_HOLDER_NAME_LENGTH
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use test_case::test_case;

    use super::*;

    #[test_case("4242424242424242" => true ; "visa checksum passes")]
    #[test_case("4242424242424243" => false ; "single digit tamper flips the checksum")]
    #[test_case("4111111111111111" => true ; "visa test number")]
    #[test_case("371449635398431" => true ; "amex fifteen digits")]
    #[test_case("5555555555554444" => true ; "mastercard test number")]
    #[test_case("6011111111111117" => true ; "discover test number")]
    #[test_case("1234567812345670" => false ; "unknown brand rejected even with valid checksum")]
    #[test_case("4242 4242 4242 4242" => true ; "whitespace is stripped")]
    #[test_case("42424242" => false ; "too short for any brand")]
    #[test_case("" => false ; "empty input")]
    fn card_number_validity(number: &str) -> bool {
        is_valid_card_number(number)
    }

    #[test_case("4" => CardBrand::Visa)]
    #[test_case("51" => CardBrand::Mastercard)]
    #[test_case("2221" => CardBrand::Mastercard ; "two series mastercard")]
    #[test_case("34" => CardBrand::Amex)]
    #[test_case("37" => CardBrand::Amex ; "second amex prefix")]
    #[test_case("6011" => CardBrand::Discover)]
    #[test_case("65" => CardBrand::Discover ; "sixty five prefix")]
    #[test_case("99" => CardBrand::Unknown)]
    fn brand_detection(prefix: &str) -> CardBrand {
        CardBrand::detect(prefix)
    }

    #[test]
    fn card_number_debug_shows_isin_only() {
        let number: CardNumber = "4242424242424242".parse().unwrap();
        assert_eq!(format!("{:?}", &*number), "424242**********");
    }

    #[test]
    fn card_number_deserialization_rejects_invalid() {
        let result = serde_json::from_str::<CardNumber>(r#""1234 5678""#);
        assert_eq!(
            result.unwrap_err().to_string(),
            "not a valid card number".to_string()
        );
    }

    #[test]
    fn card_number_last4() {
        let number: CardNumber = "371449635398431".parse().unwrap();
        assert_eq!(number.get_last4(), "8431");
        assert_eq!(number.get_card_isin(), "371449");
        assert_eq!(number.brand(), CardBrand::Amex);
    }

    #[test]
    fn security_code_shape() {
        assert!(CardSecurityCode::from_str("042").is_ok());
        assert!(CardSecurityCode::from_str("1234").is_ok());
        assert!(CardSecurityCode::from_str("12").is_err());
        assert!(CardSecurityCode::from_str("12345").is_err());
        assert!(CardSecurityCode::from_str("12a").is_err());
    }

    #[test]
    fn holder_name_bounds() {
        assert!(is_valid_holder_name("Ada Lovelace"));
        assert!(!is_valid_holder_name("   "));
        assert!(!is_valid_holder_name(&"x".repeat(61)));
    }
}
