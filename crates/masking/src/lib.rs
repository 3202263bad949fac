#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Wrapper types and traits for secret management, ensuring payment secrets
//! are not accidentally logged or debug-printed, and that strongly held
//! secrets are wiped from memory when dropped.

pub use zeroize::{self, Zeroize as ZeroizableSecret};

mod strategy;
pub use strategy::{Strategy, WithType, WithoutType};

mod abs;
pub use abs::{ExposeInterface, ExposeOptionInterface, PeekInterface};

mod secret;
mod strong_secret;
pub use secret::Secret;
pub use strong_secret::StrongSecret;

mod maskable;
pub use maskable::{Mask, Maskable};

mod serde;
pub use crate::serde::{Deserialize, SerializableSecret, Serialize};

/// Commonly used exports.
///
/// `use masking::prelude::*;`
pub mod prelude {
    pub use super::{ExposeInterface, ExposeOptionInterface, PeekInterface};
}
