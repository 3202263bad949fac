//! Conversions from tokenize options to payment-handle request bodies.

use api_models::{
    enums::{PaymentType, TransactionType},
    payment_handles::{
        ApplePayRequest, Card, CardExpiry, PayPalRequest, PaymentHandleRequest, ReturnLink,
        ReturnLinkRel, ThreeDsRequest, VenmoRequest,
    },
};
use cards::{CardExpiration, CardNumber, CardSecurityCode};
use common_utils::types::MinorUnit;
use masking::{PeekInterface, Secret};

use crate::{
    errors::ErrorCode,
    types::{
        ApplePayTokenizeOptions, CardTokenizeOptions, PayPalTokenizeOptions, TokenizeOptions,
        VenmoTokenizeOptions,
    },
};

/// Options plus the session detail request building needs.
pub(crate) struct HandleRequestData<'a, T> {
    pub options: &'a T,
    pub return_url_base: &'a str,
}

fn return_links(base: &str) -> Vec<ReturnLink> {
    [
        ReturnLinkRel::Default,
        ReturnLinkRel::OnCompleted,
        ReturnLinkRel::OnFailed,
        ReturnLinkRel::OnCancelled,
    ]
    .into_iter()
    .map(|rel| ReturnLink::get(rel, base.to_string()))
    .collect()
}

fn base_request(
    options: &TokenizeOptions,
    payment_type: PaymentType,
    return_url_base: &str,
) -> PaymentHandleRequest {
    PaymentHandleRequest {
        merchant_ref_num: options.merchant_ref_num.clone(),
        transaction_type: TransactionType::Payment,
        account_id: options.account_id.clone(),
        payment_type,
        amount: MinorUnit::new(options.amount),
        currency_code: options.currency_code.clone(),
        return_links: return_links(return_url_base),
        card: None,
        profile: options.profile.clone(),
        billing_details: options.billing_details.clone(),
        merchant_descriptor: options.merchant_descriptor.clone(),
        apple_pay: None,
        paypal: None,
        venmo: None,
        three_ds: None,
    }
}

impl TryFrom<HandleRequestData<'_, CardTokenizeOptions>> for PaymentHandleRequest {
    type Error = ErrorCode;

    fn try_from(item: HandleRequestData<'_, CardTokenizeOptions>) -> Result<Self, Self::Error> {
        let card_input = &item.options.card;

        let card_number: CardNumber = card_input
            .card_number
            .peek()
            .parse()
            .map_err(|_| ErrorCode::UnsupportedCardBrand)?;
        let expiration = CardExpiration::new(card_input.expiry_month, card_input.expiry_year)
            .map_err(|_| ErrorCode::InvalidExpiryDate)?;
        let cvv = card_input
            .cvv
            .as_ref()
            .map(|cvv| {
                cvv.peek()
                    .parse::<CardSecurityCode>()
                    .map_err(|_| ErrorCode::InvalidSecurityCode)
            })
            .transpose()?;

        let card = Card {
            card_num: card_number,
            card_expiry: CardExpiry {
                month: Secret::new(expiration.month.number()),
                year: Secret::new(expiration.year.number()),
            },
            cvv,
            holder_name: card_input.holder_name.clone(),
        };

        let mut request =
            base_request(&item.options.options, PaymentType::Card, item.return_url_base);
        request.card = Some(card);
        request.three_ds = Some(ThreeDsRequest {
            merchant_url: item.return_url_base.to_string(),
            device_channel: Some("SDK".to_string()),
            message_category: Some("PAYMENT".to_string()),
        });
        Ok(request)
    }
}

impl From<HandleRequestData<'_, ApplePayTokenizeOptions>> for PaymentHandleRequest {
    fn from(item: HandleRequestData<'_, ApplePayTokenizeOptions>) -> Self {
        let mut request = base_request(
            &item.options.options,
            PaymentType::ApplePay,
            item.return_url_base,
        );
        request.apple_pay = item
            .options
            .payment_token
            .clone()
            .map(|token| ApplePayRequest {
                label: item.options.summary_label.clone(),
                request_billing_address: item.options.request_billing_address,
                apple_pay_payment_token: token,
            });
        request
    }
}

impl From<HandleRequestData<'_, PayPalTokenizeOptions>> for PaymentHandleRequest {
    fn from(item: HandleRequestData<'_, PayPalTokenizeOptions>) -> Self {
        let mut request = base_request(
            &item.options.options,
            PaymentType::PayPal,
            item.return_url_base,
        );
        request.paypal = Some(PayPalRequest {
            consumer_id: Some(item.options.consumer_id.clone()),
            recipient_description: item.options.recipient_description.clone(),
            language: item.options.language.clone(),
            shipping_preference: item.options.shipping_preference,
            consumer_message: None,
            order_description: item.options.order_description.clone(),
        });
        request
    }
}

impl From<HandleRequestData<'_, VenmoTokenizeOptions>> for PaymentHandleRequest {
    fn from(item: HandleRequestData<'_, VenmoTokenizeOptions>) -> Self {
        let mut request = base_request(
            &item.options.options,
            PaymentType::Venmo,
            item.return_url_base,
        );
        request.venmo = Some(VenmoRequest {
            consumer_id: item.options.consumer_id.clone(),
            merchant_account_id: None,
            profile_id: item.options.profile_id.clone(),
        });
        request
    }
}
