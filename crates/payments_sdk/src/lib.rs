#![forbid(unsafe_code)]

//! Tokenization orchestration core for the mobile payments SDK.
//!
//! A merchant app builds one [`SdkSession`] and initializes a context per
//! payment rail; each context validates tokenize options, creates a payment
//! handle, drives whatever provider authorization the handle's status
//! demands, refreshes the handle token, and delivers exactly one terminal
//! result. Nothing here persists payment data: every flow's state lives in
//! memory, owned by the flow, and is gone when it resolves.
//!
//! Vendor SDKs (wallet sheet, checkout browser or native checkout, device
//! fingerprinting, challenge UI) sit behind the seams in [`vendors`].

pub mod client;
pub mod configs;
pub mod consts;
pub mod core;
pub mod errors;
pub mod fields;
pub mod flows;
pub mod services;
pub mod telemetry;
pub mod threeds;
pub mod types;
pub mod vendors;

pub use crate::{
    client::PaymentHubClient,
    configs::{Environment, SdkConfig, SdkSession},
    core::{
        apple_pay::ApplePayContext, card::CardContext, paypal::PayPalContext, venmo::VenmoContext,
    },
    errors::{ErrorCode, SdkError},
    fields::InputField,
    flows::ProviderFlowOutcome,
    types::{
        ApplePayTokenizeOptions, CardDetails, CardTokenizeOptions, PayPalTokenizeOptions,
        TokenizeOptions, VenmoTokenizeOptions,
    },
};
