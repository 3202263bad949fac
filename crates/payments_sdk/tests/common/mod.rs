//! Shared fakes for driving tokenize flows without a network or vendor SDK.

#![allow(clippy::unwrap_used, dead_code)]

use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use api_models::{
    payment_handles::{ApplePayHeader, ApplePayPaymentData, ApplePayPaymentToken, ApplePayToken},
    three_ds::AuthenticationResponse,
};
use common_utils::{errors::CustomResult, request::Request};
use error_stack::report;
use masking::Secret;
use payments_sdk::{
    errors::GatewayError,
    services::{RequestPerforming, Response},
    vendors::{
        BrowserEvent, ChallengeEvent, ChallengePresenting, FingerprintingSession,
        NativeCheckoutEvent, NativeCheckoutLaunching, RedirectBrowsing, VendorError,
        VenmoAuthorizationEvent, VenmoAuthorizing, WalletSheetEvent, WalletSheetPresenting,
    },
    Environment, SdkConfig, SdkSession,
};
use tokio::sync::mpsc;

/// One request the gateway saw, flattened for assertions.
#[derive(Clone, Debug)]
pub struct SeenRequest {
    pub method: String,
    pub url: String,
    pub body: Option<String>,
}

/// A gateway fed from a scripted queue of responses.
#[derive(Default)]
pub struct MockGateway {
    responses: Mutex<VecDeque<(u16, serde_json::Value)>>,
    requests: Mutex<Vec<SeenRequest>>,
}

impl MockGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push(self: &Arc<Self>, status_code: u16, body: serde_json::Value) {
        self.responses
            .lock()
            .unwrap()
            .push_back((status_code, body));
    }

    pub fn seen(&self) -> Vec<SeenRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Requests whose URL contains `fragment`.
    pub fn requests_matching(&self, fragment: &str) -> Vec<SeenRequest> {
        self.seen()
            .into_iter()
            .filter(|request| request.url.contains(fragment))
            .collect()
    }
}

#[async_trait::async_trait]
impl RequestPerforming for MockGateway {
    async fn perform(&self, request: Request) -> CustomResult<Response, GatewayError> {
        self.requests.lock().unwrap().push(SeenRequest {
            method: request.method.to_string(),
            url: request.url.clone(),
            body: request.body.as_ref().map(|body| body.get_inner().to_owned()),
        });

        let Some((status_code, body)) = self.responses.lock().unwrap().pop_front() else {
            return Err(report!(GatewayError::Generic)
                .attach_printable(format!("unscripted request: {}", request.url)));
        };

        let bytes = if body.is_null() {
            bytes::Bytes::new()
        } else {
            bytes::Bytes::from(serde_json::to_vec(&body).unwrap())
        };

        if (200..300).contains(&status_code) {
            Ok(Response {
                status_code,
                response: bytes,
            })
        } else {
            Err(report!(GatewayError::Api {
                status_code,
                code: "5000".to_string(),
                message: "scripted failure".to_string(),
            }))
        }
    }
}

/// A session over a fresh mock gateway.
pub fn session_with_gateway() -> (SdkSession, Arc<MockGateway>) {
    let gateway = MockGateway::new();
    let session = SdkSession::with_gateway(
        SdkConfig {
            api_key: Secret::new("dGVzdDp0ZXN0".to_string()),
            environment: Environment::Test,
            return_url_base: Some("https://app.example.com/return".to_string()),
            invocation_id: None,
            app_name: Some("demo-shop".to_string()),
        },
        gateway.clone(),
    )
    .expect("session");
    (session, gateway)
}

/// Payment methods response carrying one configured method.
pub fn methods_response(payment_method: &str, currency: &str, account_id: &str) -> serde_json::Value {
    serde_json::json!({
        "paymentMethods": [{
            "paymentMethod": payment_method,
            "currencyCode": currency,
            "accountId": account_id,
        }]
    })
}

/// Payment methods response with a wallet card-network configuration.
pub fn apple_pay_methods_response(currency: &str, account_id: &str) -> serde_json::Value {
    serde_json::json!({
        "paymentMethods": [{
            "paymentMethod": "APPLEPAY",
            "currencyCode": currency,
            "accountId": account_id,
            "accountConfiguration": {
                "cardTypeConfig": {"AM": "BOTH", "VI": "CREDIT", "MC": "BOTH", "DI": "BOTH"}
            }
        }]
    })
}

/// A payment handle response body.
pub fn handle_response(status: &str, action: Option<&str>) -> serde_json::Value {
    let mut handle = serde_json::json!({
        "id": "ph_1",
        "merchantRefNum": "order-1",
        "paymentHandleToken": "handle-token-1",
        "status": status,
    });
    if let Some(action) = action {
        handle["action"] = serde_json::Value::String(action.to_string());
    }
    handle
}

/// A wallet token fixture of the shape the sheet hands back.
pub fn wallet_token() -> ApplePayPaymentToken {
    ApplePayPaymentToken {
        token: ApplePayToken {
            payment_data: ApplePayPaymentData {
                version: "EC_v1".to_string(),
                data: Secret::new("data".to_string()),
                signature: Secret::new("sig".to_string()),
                header: ApplePayHeader {
                    public_key_hash: Secret::new("hash".to_string()),
                    ephemeral_public_key: Secret::new("key".to_string()),
                    transaction_id: Secret::new("txn".to_string()),
                },
            },
            payment_method: None,
            transaction_identifier: Some("txn-1".to_string()),
        },
    }
}

/// Wallet sheet fake replaying a scripted event sequence.
pub struct ScriptedSheet {
    events: Vec<WalletSheetEvent>,
    pub invocations: AtomicUsize,
    pub available: bool,
}

impl ScriptedSheet {
    pub fn new(events: Vec<WalletSheetEvent>) -> Arc<Self> {
        Arc::new(Self {
            events,
            invocations: AtomicUsize::new(0),
            available: true,
        })
    }
}

#[async_trait::async_trait]
impl WalletSheetPresenting for ScriptedSheet {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn present(
        &self,
        _request: payments_sdk::flows::apple_pay::WalletPaymentRequest,
        events: mpsc::Sender<WalletSheetEvent>,
    ) -> CustomResult<(), VendorError> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        let scripted = self.events.clone();
        tokio::spawn(async move {
            for event in scripted {
                let _ = events.send(event).await;
            }
        });
        Ok(())
    }
}

/// Venmo authorizer fake replaying a scripted event sequence.
pub struct ScriptedVenmo {
    events: Vec<VenmoAuthorizationEvent>,
    pub invocations: AtomicUsize,
    pub delay: Option<std::time::Duration>,
}

impl ScriptedVenmo {
    pub fn new(events: Vec<VenmoAuthorizationEvent>) -> Arc<Self> {
        Arc::new(Self {
            events,
            invocations: AtomicUsize::new(0),
            delay: None,
        })
    }

    pub fn delayed(
        events: Vec<VenmoAuthorizationEvent>,
        delay: std::time::Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            events,
            invocations: AtomicUsize::new(0),
            delay: Some(delay),
        })
    }
}

#[async_trait::async_trait]
impl VenmoAuthorizing for ScriptedVenmo {
    async fn authorize(
        &self,
        _client_token: Secret<String>,
        _profile_id: Option<String>,
        events: mpsc::Sender<VenmoAuthorizationEvent>,
    ) -> CustomResult<(), VendorError> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        let scripted = self.events.clone();
        let delay = self.delay;
        tokio::spawn(async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            for event in scripted {
                let _ = events.send(event).await;
            }
        });
        Ok(())
    }
}

/// Native checkout fake replaying one scripted event.
pub struct ScriptedNativeCheckout {
    event: NativeCheckoutEvent,
    pub invocations: AtomicUsize,
}

impl ScriptedNativeCheckout {
    pub fn new(event: NativeCheckoutEvent) -> Arc<Self> {
        Arc::new(Self {
            event,
            invocations: AtomicUsize::new(0),
        })
    }
}

#[async_trait::async_trait]
impl NativeCheckoutLaunching for ScriptedNativeCheckout {
    async fn launch(
        &self,
        _order_id: String,
        events: mpsc::Sender<NativeCheckoutEvent>,
    ) -> CustomResult<(), VendorError> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        let event = self.event;
        tokio::spawn(async move {
            let _ = events.send(event).await;
        });
        Ok(())
    }
}

/// Browser fake replaying scripted redirect/dismiss events.
pub struct ScriptedBrowser {
    events: Vec<BrowserEvent>,
    pub invocations: AtomicUsize,
}

impl ScriptedBrowser {
    pub fn new(events: Vec<BrowserEvent>) -> Arc<Self> {
        Arc::new(Self {
            events,
            invocations: AtomicUsize::new(0),
        })
    }
}

#[async_trait::async_trait]
impl RedirectBrowsing for ScriptedBrowser {
    async fn open(
        &self,
        _url: String,
        events: mpsc::Sender<BrowserEvent>,
    ) -> CustomResult<(), VendorError> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        let scripted = self.events.clone();
        tokio::spawn(async move {
            for event in scripted {
                let _ = events.send(event).await;
            }
        });
        Ok(())
    }
}

/// Fingerprinting fake returning a fixed authentication response.
pub struct ScriptedFingerprinter {
    response: AuthenticationResponse,
    pub invocations: AtomicUsize,
}

impl ScriptedFingerprinter {
    pub fn new(response: AuthenticationResponse) -> Arc<Self> {
        Arc::new(Self {
            response,
            invocations: AtomicUsize::new(0),
        })
    }

    pub fn completed() -> Arc<Self> {
        Self::new(
            serde_json::from_value(serde_json::json!({
                "status": "COMPLETED",
                "threeDResult": "Y",
            }))
            .unwrap(),
        )
    }

    pub fn pending_with_challenge(payload: &str) -> Arc<Self> {
        Self::new(
            serde_json::from_value(serde_json::json!({
                "status": "PENDING",
                "sdkChallengePayload": payload,
            }))
            .unwrap(),
        )
    }
}

#[async_trait::async_trait]
impl FingerprintingSession for ScriptedFingerprinter {
    async fn run(
        &self,
        _jwt: Secret<String>,
        _device_fingerprinting_id: Option<String>,
    ) -> CustomResult<AuthenticationResponse, VendorError> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        Ok(self.response.clone())
    }
}

/// Challenge fake returning a fixed terminal event.
pub struct ScriptedChallenger {
    event: ChallengeEvent,
    pub invocations: AtomicUsize,
}

impl ScriptedChallenger {
    pub fn new(event: ChallengeEvent) -> Arc<Self> {
        Arc::new(Self {
            event,
            invocations: AtomicUsize::new(0),
        })
    }
}

#[async_trait::async_trait]
impl ChallengePresenting for ScriptedChallenger {
    async fn present(
        &self,
        _transaction_id: String,
        _payload: Secret<String>,
    ) -> CustomResult<ChallengeEvent, VendorError> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        Ok(self.event.clone())
    }
}
