//! Merchant payment-method configuration lookup.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::enums::PaymentType;

/// Response of `GET /paymenthub/v1/paymentmethods`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodsResponse {
    pub payment_methods: Vec<PaymentMethod>,
}

/// One configured payment method on the merchant account.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    pub payment_method: PaymentType,
    pub currency_code: String,
    pub account_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_configuration: Option<AccountConfiguration>,
}

/// Processor-side configuration of an account, as far as the SDK needs it.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountConfiguration {
    /// Accepted card networks mapped to the funding capability enabled for
    /// each. Drives the wallet sheet's supported-network list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_type_config: Option<HashMap<CardNetworkCode, CardCapability>>,
}

/// Two-letter processor code for a card network.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize, strum::Display)]
pub enum CardNetworkCode {
    /// American Express
    #[serde(rename = "AM")]
    #[strum(serialize = "AM")]
    Amex,
    /// Visa
    #[serde(rename = "VI")]
    #[strum(serialize = "VI")]
    Visa,
    /// Mastercard
    #[serde(rename = "MC")]
    #[strum(serialize = "MC")]
    Mastercard,
    /// Discover
    #[serde(rename = "DI")]
    #[strum(serialize = "DI")]
    Discover,
}

/// Funding capability enabled for a card network.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CardCapability {
    /// Credit cards only.
    Credit,
    /// Debit cards only.
    Debit,
    /// Both credit and debit.
    Both,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn configuration_round_trip() {
        let body = r#"{
            "paymentMethods": [
                {
                    "paymentMethod": "APPLEPAY",
                    "currencyCode": "USD",
                    "accountId": "1002696790",
                    "accountConfiguration": {
                        "cardTypeConfig": {"AM": "BOTH", "VI": "CREDIT"}
                    }
                },
                {"paymentMethod": "CARD", "currencyCode": "USD", "accountId": "1002696791"}
            ]
        }"#;
        let response: PaymentMethodsResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.payment_methods.len(), 2);
        let config = response.payment_methods[0]
            .account_configuration
            .as_ref()
            .unwrap()
            .card_type_config
            .as_ref()
            .unwrap();
        assert_eq!(config[&CardNetworkCode::Amex], CardCapability::Both);
        assert_eq!(config[&CardNetworkCode::Visa], CardCapability::Credit);
    }
}
