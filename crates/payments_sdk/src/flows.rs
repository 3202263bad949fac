//! Provider flow adapters, one per payment rail.
//!
//! Each adapter is a single-shot state object: `initiate_flow` consumes it,
//! collapses however many vendor callbacks arrive into one three-way
//! outcome, and the instance is gone. Starting a second concurrent flow is
//! the caller's responsibility to prevent (the contexts' in-flight flag).

pub mod apple_pay;
pub mod paypal;
pub mod venmo;

/// The normalized outcome of one provider authorization ritual.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ProviderFlowOutcome<T> {
    /// The provider authorized; carries whatever artifact the rail needs
    /// next (wallet token, processor nonce, nothing).
    Success(T),
    /// The provider failed the authorization.
    Failed,
    /// The user backed out. A first-class outcome, distinct from failure,
    /// so callers can skip alerting on it.
    Cancelled,
}

impl<T> ProviderFlowOutcome<T> {
    /// Whether this is a success.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}
