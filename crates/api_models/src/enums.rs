//! Enumerations shared across the wire types.

use serde::{Deserialize, Serialize};

/// Payment method family of a handle.
#[derive(
    Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
pub enum PaymentType {
    /// Card payment, with or without 3DS.
    #[serde(rename = "CARD")]
    #[strum(serialize = "CARD")]
    Card,
    /// Apple Pay wallet payment.
    #[serde(rename = "APPLEPAY")]
    #[strum(serialize = "APPLEPAY")]
    ApplePay,
    /// PayPal checkout.
    #[serde(rename = "PAYPAL")]
    #[strum(serialize = "PAYPAL")]
    PayPal,
    /// Venmo in-app checkout.
    #[serde(rename = "VENMO")]
    #[strum(serialize = "VENMO")]
    Venmo,
}

/// Transaction type carried on a payment handle.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum TransactionType {
    /// A one-off payment.
    #[default]
    #[serde(rename = "PAYMENT")]
    Payment,
}

/// Server-side payment handle status.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum PaymentHandleStatus {
    /// Handle created, no authorization started yet.
    Initiated,
    /// Ready for the merchant backend to charge.
    Payable,
    /// Authorization in flight on the server side.
    #[default]
    Processing,
    /// Authorization failed.
    Failed,
    /// Handle aged out before completion.
    Expired,
    /// Payment fully settled server-side.
    Completed,
}

impl PaymentHandleStatus {
    /// Whether the token can be refreshed and returned without further
    /// client-side authorization.
    pub fn is_terminal_success(self) -> bool {
        matches!(self, Self::Payable | Self::Completed)
    }

    /// Whether the handle can never become payable.
    pub fn is_terminal_failure(self) -> bool {
        matches!(self, Self::Failed | Self::Expired)
    }
}

/// The action hint the server attaches to a handle that still needs a
/// client-side authorization step.
pub const ACTION_REDIRECT: &str = "REDIRECT";
