//! Networking services.

pub mod api;

pub use api::{Gateway, RequestPerforming, Response};
