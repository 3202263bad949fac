//! Stateless validation predicates for tokenize-request fields.
//!
//! Every predicate is a pure function returning `bool`; callers translate a
//! `false` into the matching error before any network call is made. Optional
//! profile fields treat `None` as valid.

#![deny(clippy::invalid_regex)]

use std::sync::LazyLock;

use regex::Regex;

use crate::consts;

static EMAIL_REGEX: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[\w\-\.]+@([\w\-]+\.)+[\w\-]{2,4}$").ok());

/// Whether `amount` fits the backend amount field: strictly positive and
/// under one billion minor units.
pub fn is_valid_amount(amount: i64) -> bool {
    amount > 0 && amount <= consts::MAX_ALLOWED_AMOUNT
}

/// Whether `email` is absent or a plausible address.
pub fn is_valid_email(email: Option<&str>) -> bool {
    match email {
        None => true,
        Some(email) => {
            email.chars().count() <= consts::MAX_EMAIL_LENGTH
                && EMAIL_REGEX
                    .as_ref()
                    .is_some_and(|regex| regex.is_match(email))
        }
    }
}

fn is_within(value: Option<&str>, max_length: usize) -> bool {
    value.map_or(true, |value| value.chars().count() <= max_length)
}

/// Whether `first_name` is absent or within the profile name bound.
pub fn is_valid_first_name(first_name: Option<&str>) -> bool {
    is_within(first_name, consts::MAX_FIRST_NAME_LENGTH)
}

/// Whether `last_name` is absent or within the profile name bound.
pub fn is_valid_last_name(last_name: Option<&str>) -> bool {
    is_within(last_name, consts::MAX_LAST_NAME_LENGTH)
}

/// Whether `phone` is absent or within the profile phone bound.
pub fn is_valid_phone(phone: Option<&str>) -> bool {
    is_within(phone, consts::MAX_PHONE_LENGTH)
}

/// Whether `descriptor` is absent or within the soft-descriptor bound.
pub fn is_valid_dynamic_descriptor(descriptor: Option<&str>) -> bool {
    is_within(descriptor, consts::MAX_DYNAMIC_DESCRIPTOR_LENGTH)
}

/// Whether `phone` is absent or fits next to a dynamic descriptor.
pub fn is_valid_descriptor_phone(phone: Option<&str>) -> bool {
    is_within(phone, consts::MAX_DESCRIPTOR_PHONE_LENGTH)
}

/// Whether `code` is a three-letter ISO 4217 alphabetic code.
pub fn is_valid_currency_code(code: &str) -> bool {
    code.len() == consts::CURRENCY_CODE_LENGTH && code.chars().all(|c| c.is_ascii_alphabetic())
}

/// Whether `account_id` is a non-empty, digits-only identifier.
pub fn is_numeric_account_id(account_id: &str) -> bool {
    !account_id.is_empty() && account_id.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use proptest::prop_assert_eq;
    use test_case::test_case;

    use super::*;

    #[test_case(0 => false ; "zero is rejected")]
    #[test_case(1 => true ; "smallest chargeable amount")]
    #[test_case(999_999_999 => true ; "largest 11 digit amount")]
    #[test_case(1_000_000_000 => false ; "one billion overflows the field")]
    #[test_case(-5 => false ; "negative amount")]
    fn amount_bounds(amount: i64) -> bool {
        is_valid_amount(amount)
    }

    proptest::proptest! {
        #[test]
        fn amount_matches_open_interval(amount in proptest::num::i64::ANY) {
            prop_assert_eq!(is_valid_amount(amount), 0 < amount && amount < 1_000_000_000);
        }
    }

    #[test_case(None => true ; "absent email is valid")]
    #[test_case(Some("a@b.com") => true ; "short valid address")]
    #[test_case(Some("roxanne.doe@checkout.example.co") => true ; "subdomain address")]
    #[test_case(Some("not-an-email") => false ; "missing at sign")]
    #[test_case(Some("a@b") => false ; "missing tld")]
    #[test_case(Some("") => false ; "empty string is not absent")]
    fn email_format(email: Option<&str>) -> bool {
        is_valid_email(email)
    }

    #[test]
    fn name_bounds() {
        assert!(is_valid_first_name(None));
        assert!(is_valid_first_name(Some(&"a".repeat(80))));
        assert!(!is_valid_first_name(Some(&"a".repeat(81))));
        assert!(is_valid_last_name(Some("Nakamura")));
        assert!(!is_valid_last_name(Some(&"b".repeat(81))));
    }

    #[test]
    fn descriptor_bounds() {
        assert!(is_valid_dynamic_descriptor(Some("COFFEE*ROASTERY")));
        assert!(!is_valid_dynamic_descriptor(Some(&"d".repeat(21))));
        assert!(is_valid_descriptor_phone(Some("5551234567")));
        assert!(!is_valid_descriptor_phone(Some("+1 555 123 456 789")));
    }

    #[test_case("USD" => true)]
    #[test_case("eur" => true ; "case is normalized upstream")]
    #[test_case("US" => false ; "too short")]
    #[test_case("USDT" => false ; "too long")]
    #[test_case("U5D" => false ; "digit in code")]
    fn currency_code_shape(code: &str) -> bool {
        is_valid_currency_code(code)
    }

    #[test_case("1002696790" => true)]
    #[test_case("" => false ; "empty id")]
    #[test_case("12a4" => false ; "letters rejected")]
    fn account_id_shape(account_id: &str) -> bool {
        is_numeric_account_id(account_id)
    }
}
