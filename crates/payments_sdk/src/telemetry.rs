//! Fire-and-forget telemetry log delivery.
//!
//! Delivery happens on a detached task; a failed or impossible delivery is
//! demoted to a debug log line and never alters the flow that produced the
//! event.

use std::sync::Arc;

use api_models::logs::{ClientInfo, LogEvent, LogEventType, LogPayload};
use common_utils::request::{Method, RequestBody, RequestBuilder};
use masking::Maskable;
use sdk_env::logger;

use crate::{
    consts,
    errors::SdkError,
    services::RequestPerforming,
};

/// Posts structured events to the telemetry endpoints.
#[derive(Clone)]
pub struct TelemetryLogger {
    gateway: Arc<dyn RequestPerforming>,
    log_url: String,
    three_ds_log_url: String,
    headers: Vec<(String, Maskable<String>)>,
    correlation_id: String,
    app_name: Option<String>,
}

impl std::fmt::Debug for TelemetryLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetryLogger")
            .field("log_url", &self.log_url)
            .field("correlation_id", &self.correlation_id)
            .finish()
    }
}

impl TelemetryLogger {
    pub(crate) fn new(
        gateway: Arc<dyn RequestPerforming>,
        base_url: &str,
        headers: Vec<(String, Maskable<String>)>,
        correlation_id: String,
        app_name: Option<String>,
    ) -> Self {
        Self {
            gateway,
            log_url: format!("{base_url}{}", consts::paths::MOBILE_LOG),
            three_ds_log_url: format!("{base_url}{}", consts::paths::THREEDS_LOG),
            headers,
            correlation_id,
            app_name,
        }
    }

    /// Record a successful tokenization.
    pub fn log_conversion(&self, message: impl Into<String>) {
        self.post(self.log_url.clone(), LogEventType::Conversion, message.into());
    }

    /// Record a surfaced error.
    pub fn log_error(&self, error: &SdkError) {
        self.post(self.log_url.clone(), LogEventType::Error, error.to_string());
    }

    /// Record a surfaced error against the 3DS log endpoint.
    pub fn log_three_ds_error(&self, error: &SdkError) {
        self.post(
            self.three_ds_log_url.clone(),
            LogEventType::Error,
            error.to_string(),
        );
    }

    fn post(&self, url: String, event_type: LogEventType, message: String) {
        let event = LogEvent {
            event_type,
            client_info: ClientInfo {
                version: sdk_env::version!().to_string(),
                correlation_id: self.correlation_id.clone(),
                app_name: self.app_name.clone(),
            },
            payload: LogPayload { message },
        };

        let Ok(body) = RequestBody::from_json(&event) else {
            logger::debug!("telemetry event could not be encoded, dropping");
            return;
        };
        let request = RequestBuilder::new()
            .method(Method::Post)
            .url(&url)
            .headers(self.headers.clone())
            .set_body(body)
            .build();

        let gateway = Arc::clone(&self.gateway);
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            logger::debug!("no async runtime for telemetry delivery, dropping event");
            return;
        };
        handle.spawn(async move {
            if let Err(error) = gateway.perform(request).await {
                logger::debug!(?error, "telemetry delivery failed");
            }
        });
    }
}
