//! Wire types for the payment hub and 3DS APIs.

pub mod enums;
pub mod errors;
pub mod logs;
pub mod payment_handles;
pub mod payment_methods;
pub mod three_ds;
