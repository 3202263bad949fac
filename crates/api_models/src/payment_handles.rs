//! Payment handle creation and lookup types.

use cards::{CardNumber, CardSecurityCode};
use common_utils::{request::Method, types::MinorUnit};
use masking::Secret;
use serde::{Deserialize, Serialize};

use crate::enums::{PaymentHandleStatus, PaymentType, TransactionType};

/// Relation name of a return link on a payment handle.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnLinkRel {
    /// Fallback link when no specific outcome link matches.
    Default,
    /// Authorization finished successfully.
    OnCompleted,
    /// Authorization failed.
    OnFailed,
    /// User abandoned the authorization.
    OnCancelled,
    /// Link the provider redirects the user to for payment.
    RedirectPayment,
}

/// A named URL the provider redirect flow navigates back to.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReturnLink {
    /// Link relation.
    pub rel: ReturnLinkRel,
    /// Absolute URL, matched verbatim against browser redirects.
    pub href: String,
    /// HTTP method for following the link.
    pub method: String,
}

impl ReturnLink {
    /// A GET link for the given relation.
    pub fn get(rel: ReturnLinkRel, href: String) -> Self {
        Self {
            rel,
            href,
            method: Method::Get.to_string(),
        }
    }
}

/// Card details included on a card-rail handle request.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub card_num: CardNumber,
    pub card_expiry: CardExpiry,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cvv: Option<CardSecurityCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holder_name: Option<Secret<String>>,
}

/// Card expiry on the wire: numeric month and four digit year.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CardExpiry {
    pub month: Secret<u8>,
    pub year: Secret<u16>,
}

/// Customer profile attached to a handle request.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<Secret<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<Secret<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Secret<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<Secret<String>>,
}

/// Billing address attached to a handle request.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<Secret<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<Secret<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<Secret<String>>,
}

/// Soft descriptor shown on the customer's statement.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantDescriptor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dynamic_descriptor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Where PayPal sources the shipping address from.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShippingPreference {
    /// Use the address on the consumer's PayPal file.
    GetFromFile,
    /// Digital goods, no shipping.
    NoShipping,
    /// Use the address provided on the handle.
    SetProvidedAddress,
}

/// PayPal-specific request payload.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayPalRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_preference: Option<ShippingPreference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumer_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_description: Option<String>,
}

/// Venmo-specific request payload.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenmoRequest {
    pub consumer_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant_account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<String>,
}

/// The decrypted-by-nobody Apple Pay payment token, forwarded opaquely.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplePayPaymentToken {
    pub token: ApplePayToken,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplePayToken {
    pub payment_data: ApplePayPaymentData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<ApplePayPaymentMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_identifier: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplePayPaymentData {
    pub version: String,
    pub data: Secret<String>,
    pub signature: Secret<String>,
    pub header: ApplePayHeader,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplePayHeader {
    pub public_key_hash: Secret<String>,
    pub ephemeral_public_key: Secret<String>,
    pub transaction_id: Secret<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplePayPaymentMethod {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub method_type: Option<String>,
}

/// Apple Pay request payload wrapping the wallet token.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplePayRequest {
    pub label: String,
    pub request_billing_address: bool,
    pub apple_pay_payment_token: ApplePayPaymentToken,
}

/// Request body for `POST /paymenthub/v1/paymenthandles`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentHandleRequest {
    pub merchant_ref_num: String,
    pub transaction_type: TransactionType,
    pub account_id: String,
    pub payment_type: PaymentType,
    pub amount: MinorUnit,
    pub currency_code: String,
    pub return_links: Vec<ReturnLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_details: Option<BillingDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant_descriptor: Option<MerchantDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apple_pay: Option<ApplePayRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paypal: Option<PayPalRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venmo: Option<VenmoRequest>,
    /// Whether the card rail should run 3DS authentication.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub three_ds: Option<ThreeDsRequest>,
}

/// 3DS enrolment detail on a card handle request.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreeDsRequest {
    pub merchant_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_channel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_category: Option<String>,
}

/// Processor handles returned alongside a redirect-style payment handle.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_token: Option<Secret<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_token: Option<Secret<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jwt_token: Option<Secret<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processor: Option<String>,
}

/// Body for reporting a processor-issued payment-method nonce back to the
/// payment hub after an in-app authorization.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNonceRequest {
    pub account_id: String,
    pub payment_method_nonce: Secret<String>,
    pub jwt_token: Secret<String>,
}

/// A server-issued payment handle.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentHandle {
    pub id: String,
    pub merchant_ref_num: String,
    pub payment_handle_token: Secret<String>,
    pub status: PaymentHandleStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway_response: Option<GatewayResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_links: Option<Vec<ReturnLink>>,
}

impl PaymentHandle {
    /// The return link with the given relation, if present.
    pub fn return_link(&self, rel: ReturnLinkRel) -> Option<&ReturnLink> {
        self.return_links
            .as_deref()
            .and_then(|links| links.iter().find(|link| link.rel == rel))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn handle_response_deserializes_wire_casing() {
        let body = r#"{
            "id": "ph_123",
            "merchantRefNum": "order-77",
            "paymentHandleToken": "SCtoken",
            "status": "INITIATED",
            "action": "REDIRECT",
            "returnLinks": [
                {"rel": "on_completed", "href": "https://app.example.com/done", "method": "GET"}
            ]
        }"#;
        let handle: PaymentHandle = serde_json::from_str(body).unwrap();
        assert_eq!(handle.status, PaymentHandleStatus::Initiated);
        assert_eq!(handle.action.as_deref(), Some("REDIRECT"));
        assert_eq!(
            handle
                .return_link(ReturnLinkRel::OnCompleted)
                .map(|link| link.href.as_str()),
            Some("https://app.example.com/done")
        );
        assert!(handle.return_link(ReturnLinkRel::OnFailed).is_none());
    }

    #[test]
    fn request_serializes_camel_case() {
        let request = PaymentHandleRequest {
            merchant_ref_num: "order-1".to_string(),
            transaction_type: TransactionType::Payment,
            account_id: "1002696790".to_string(),
            payment_type: PaymentType::Card,
            amount: MinorUnit::new(500),
            currency_code: "USD".to_string(),
            return_links: vec![ReturnLink::get(
                ReturnLinkRel::Default,
                "https://app.example.com/return".to_string(),
            )],
            card: None,
            profile: None,
            billing_details: None,
            merchant_descriptor: None,
            apple_pay: None,
            paypal: None,
            venmo: None,
            three_ds: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["merchantRefNum"], "order-1");
        assert_eq!(value["paymentType"], "CARD");
        assert_eq!(value["transactionType"], "PAYMENT");
        assert_eq!(value["returnLinks"][0]["rel"], "default");
        assert!(value.get("card").is_none());
    }
}
