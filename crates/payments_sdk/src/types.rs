//! Tokenize options, one variant per rail.
//!
//! An options value is built once by the caller, validated once by the
//! orchestrator before any network call, and immutable afterward.

use api_models::payment_handles::{
    ApplePayPaymentToken, BillingDetails, MerchantDescriptor, Profile, ShippingPreference,
};
use masking::Secret;

/// Fields shared by every rail.
#[derive(Clone, Debug)]
pub struct TokenizeOptions {
    /// Amount in minor units.
    pub amount: i64,
    /// ISO 4217 currency code.
    pub currency_code: String,
    /// Merchant-chosen reference, unique per attempt.
    pub merchant_ref_num: String,
    /// Merchant account the handle is created against.
    pub account_id: String,
    /// Customer profile, all fields optional.
    pub profile: Option<Profile>,
    /// Billing address.
    pub billing_details: Option<BillingDetails>,
    /// Statement soft descriptor.
    pub merchant_descriptor: Option<MerchantDescriptor>,
}

/// Raw card input for the card rail. Validated by the orchestrator, not at
/// construction, so invalid input surfaces as an error callback rather than
/// a construction failure.
#[derive(Clone, Debug)]
pub struct CardDetails {
    /// Full card number.
    pub card_number: Secret<String>,
    /// Expiry month, 1 through 12.
    pub expiry_month: u8,
    /// Four digit expiry year.
    pub expiry_year: u16,
    /// Security code, when collected.
    pub cvv: Option<Secret<String>>,
    /// Name on the card.
    pub holder_name: Option<Secret<String>>,
}

/// Options for the card rail.
#[derive(Clone, Debug)]
pub struct CardTokenizeOptions {
    /// Shared fields.
    pub options: TokenizeOptions,
    /// Card input.
    pub card: CardDetails,
}

/// Options for the Apple Pay rail.
#[derive(Clone, Debug)]
pub struct ApplePayTokenizeOptions {
    /// Shared fields.
    pub options: TokenizeOptions,
    /// Apple merchant identifier, e.g. `merchant.com.example.shop`.
    pub merchant_identifier: String,
    /// Two-letter merchant country code.
    pub country_code: String,
    /// Label shown on the wallet sheet's summary line.
    pub summary_label: String,
    /// Whether the sheet should collect a billing address.
    pub request_billing_address: bool,
    /// A wallet token obtained ahead of the flow, included on the handle
    /// request when present.
    pub payment_token: Option<ApplePayPaymentToken>,
}

/// Options for the PayPal rail.
#[derive(Clone, Debug)]
pub struct PayPalTokenizeOptions {
    /// Shared fields.
    pub options: TokenizeOptions,
    /// PayPal consumer id (usually the customer's email).
    pub consumer_id: String,
    /// Merchant description shown during checkout.
    pub recipient_description: Option<String>,
    /// Checkout locale override.
    pub language: Option<String>,
    /// Shipping address source.
    pub shipping_preference: Option<ShippingPreference>,
    /// Order description shown during checkout.
    pub order_description: Option<String>,
}

/// Options for the Venmo rail.
#[derive(Clone, Debug)]
pub struct VenmoTokenizeOptions {
    /// Shared fields.
    pub options: TokenizeOptions,
    /// Venmo consumer id.
    pub consumer_id: String,
    /// Braintree profile id override, when the merchant runs several.
    pub profile_id: Option<String>,
}
