//! Shared domain primitives.

use serde::{Deserialize, Serialize};

/// An amount in the smallest denomination of its currency (cents, pence,
/// yen). The backend amount field is 11 digits wide, so values are bounded
/// by [`crate::consts::MAX_ALLOWED_AMOUNT`]; that bound is enforced by the
/// validation layer, not by this type.
#[derive(
    Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize, Hash,
)]
#[serde(transparent)]
pub struct MinorUnit(i64);

impl MinorUnit {
    /// Wrap a raw minor-unit amount.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// The raw amount.
    pub fn get_amount_as_i64(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for MinorUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
