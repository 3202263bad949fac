//! Seams over the vendor SDKs that drive native authorization UIs.
//!
//! Each trait mirrors one vendor ritual at its narrowest useful surface:
//! the flow adapter owns sequencing and outcome classification, the trait
//! implementation owns nothing but the vendor calls. Vendor callbacks are
//! delivered as events over a channel, preserving their real cardinality,
//! including the double-fire cases the adapters have to collapse.

use api_models::{payment_handles::ApplePayPaymentToken, three_ds::AuthenticationResponse};
use common_utils::errors::CustomResult;
use masking::Secret;
use tokio::sync::mpsc;

use crate::flows::apple_pay::WalletPaymentRequest;

/// Failure inside a vendor SDK, before any outcome could be produced.
#[derive(Debug, thiserror::Error)]
pub enum VendorError {
    /// The vendor UI could not be presented at all.
    #[error("vendor interface could not be presented")]
    PresentationFailed,

    /// The vendor session ended without delivering a terminal event.
    #[error("vendor session ended without a terminal event")]
    SessionDropped,
}

/// Events emitted by the platform wallet sheet. The sheet always fires
/// `Dismissed` when it leaves the screen, whether or not an authorization
/// happened first.
#[derive(Clone, Debug)]
pub enum WalletSheetEvent {
    /// The user authorized payment; carries the wallet payment token.
    Authorized(Box<ApplePayPaymentToken>),
    /// The sheet left the screen.
    Dismissed,
}

/// Presents the platform wallet sheet.
#[async_trait::async_trait]
pub trait WalletSheetPresenting: Send + Sync {
    /// Whether this device can present a wallet sheet for any configured
    /// network.
    fn is_available(&self) -> bool;

    /// Present the sheet, emitting delegate callbacks on `events`. Returns
    /// once presentation has started; events keep flowing afterward.
    async fn present(
        &self,
        request: WalletPaymentRequest,
        events: mpsc::Sender<WalletSheetEvent>,
    ) -> CustomResult<(), VendorError>;
}

/// Events from the native in-app PayPal checkout.
#[derive(Clone, Copy, Debug)]
pub enum NativeCheckoutEvent {
    /// Checkout approved by the consumer.
    Approved,
    /// Consumer backed out.
    Cancelled,
    /// Vendor-side failure.
    Failed,
}

/// Launches the native PayPal checkout for an order.
#[async_trait::async_trait]
pub trait NativeCheckoutLaunching: Send + Sync {
    /// Launch checkout for `order_id`, emitting outcome events on `events`.
    async fn launch(
        &self,
        order_id: String,
        events: mpsc::Sender<NativeCheckoutEvent>,
    ) -> CustomResult<(), VendorError>;
}

/// Events from the in-app browser used for web checkout.
#[derive(Clone, Debug)]
pub enum BrowserEvent {
    /// The browser navigated back to the app with this URL.
    Redirected(String),
    /// The user closed the browser.
    Dismissed,
}

/// Opens an in-app browser on a checkout URL.
#[async_trait::async_trait]
pub trait RedirectBrowsing: Send + Sync {
    /// Open `url`, emitting app-return redirects and dismissal on `events`.
    async fn open(
        &self,
        url: String,
        events: mpsc::Sender<BrowserEvent>,
    ) -> CustomResult<(), VendorError>;
}

/// Events from the Venmo app-switch authorization.
#[derive(Clone, Debug)]
pub enum VenmoAuthorizationEvent {
    /// Authorization succeeded; carries the processor payment-method nonce.
    Authorized {
        /// Single-use nonce to report back to the payment hub.
        nonce: Secret<String>,
    },
    /// Consumer backed out.
    Cancelled,
    /// Vendor-side failure.
    Failed,
}

/// Drives the processor-backed Venmo authorization.
#[async_trait::async_trait]
pub trait VenmoAuthorizing: Send + Sync {
    /// Start an authorization against `client_token`, emitting outcome
    /// events on `events`.
    async fn authorize(
        &self,
        client_token: Secret<String>,
        profile_id: Option<String>,
        events: mpsc::Sender<VenmoAuthorizationEvent>,
    ) -> CustomResult<(), VendorError>;
}

/// Runs the 3DS device-fingerprinting session for a JWT and reports the
/// resulting authentication state.
#[async_trait::async_trait]
pub trait FingerprintingSession: Send + Sync {
    /// Hand `jwt` to the fingerprinting SDK and wait for its
    /// authentication response.
    async fn run(
        &self,
        jwt: Secret<String>,
        device_fingerprinting_id: Option<String>,
    ) -> CustomResult<AuthenticationResponse, VendorError>;
}

/// Terminal event of a 3DS challenge presentation. The vendor callback is
/// the sole completion trigger, and it may legally arrive without a
/// validation JWT.
#[derive(Clone, Debug)]
pub enum ChallengeEvent {
    /// The challenge ran to completion.
    Completed {
        /// Server JWT proving the challenge outcome; absent when the vendor
        /// could not produce one.
        validation_jwt: Option<Secret<String>>,
    },
    /// The user abandoned the challenge.
    Cancelled,
}

/// Presents the interactive 3DS challenge UI.
#[async_trait::async_trait]
pub trait ChallengePresenting: Send + Sync {
    /// Present the challenge for `transaction_id` and wait for its terminal
    /// event.
    async fn present(
        &self,
        transaction_id: String,
        payload: Secret<String>,
    ) -> CustomResult<ChallengeEvent, VendorError>;
}
