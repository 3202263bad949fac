//! SDK configuration and the session object.
//!
//! There is no global shared state: a [`SdkSession`] is built once by the
//! merchant app and handed explicitly to every context and collaborator.

use std::sync::Arc;

use common_utils::errors::CustomResult;
use error_stack::report;
use masking::{Mask, Maskable, PeekInterface, Secret};

use crate::{
    consts,
    errors::{ErrorCode, SdkError},
    services::{Gateway, RequestPerforming},
    telemetry::TelemetryLogger,
};

/// Backend environment the SDK talks to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Environment {
    /// Merchant test environment.
    Test,
    /// Live environment.
    Production,
}

impl Environment {
    /// Base URL of the environment.
    pub fn base_url(self) -> &'static str {
        match self {
            Self::Test => "https://api.test.paysafe.com",
            Self::Production => "https://api.paysafe.com",
        }
    }
}

/// Static configuration for one session.
#[derive(Clone, Debug)]
pub struct SdkConfig {
    /// Pre-shared key for basic auth, already base64 encoded.
    pub api_key: Secret<String>,
    /// Which backend to talk to.
    pub environment: Environment,
    /// Base for the return links attached to payment handles. Defaults to
    /// the SDK's own redirect host.
    pub return_url_base: Option<String>,
    /// When set, requests additionally carry the invocation id and the
    /// simulator marker header.
    pub invocation_id: Option<String>,
    /// Merchant app name reported in telemetry.
    pub app_name: Option<String>,
}

struct SessionInner {
    config: SdkConfig,
    gateway: Arc<dyn RequestPerforming>,
    correlation_id: String,
    telemetry: TelemetryLogger,
}

/// A configured SDK session: gateway, correlation id and telemetry, shared
/// by every context created from it.
#[derive(Clone)]
pub struct SdkSession {
    inner: Arc<SessionInner>,
}

impl std::fmt::Debug for SdkSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SdkSession")
            .field("environment", &self.inner.config.environment)
            .field("correlation_id", &self.inner.correlation_id)
            .finish()
    }
}

impl SdkSession {
    /// Build a session over the production gateway.
    pub fn new(config: SdkConfig) -> CustomResult<Self, SdkError> {
        let correlation_id = uuid::Uuid::new_v4().to_string();
        let gateway = Gateway::new().map_err(|error| {
            report!(SdkError::from_gateway(error, &correlation_id))
        })?;
        Self::build(config, Arc::new(gateway), correlation_id)
    }

    /// Build a session over a caller-supplied gateway. This is the seam
    /// tests use to run flows without a network.
    pub fn with_gateway(
        config: SdkConfig,
        gateway: Arc<dyn RequestPerforming>,
    ) -> CustomResult<Self, SdkError> {
        let correlation_id = uuid::Uuid::new_v4().to_string();
        Self::build(config, gateway, correlation_id)
    }

    fn build(
        config: SdkConfig,
        gateway: Arc<dyn RequestPerforming>,
        correlation_id: String,
    ) -> CustomResult<Self, SdkError> {
        validate_api_key(&config.api_key, &correlation_id)?;

        let base_headers = build_headers(&config, &correlation_id);
        let telemetry = TelemetryLogger::new(
            Arc::clone(&gateway),
            config.environment.base_url(),
            base_headers,
            correlation_id.clone(),
            config.app_name.clone(),
        );

        Ok(Self {
            inner: Arc::new(SessionInner {
                config,
                gateway,
                correlation_id,
                telemetry,
            }),
        })
    }

    /// The session configuration.
    pub fn config(&self) -> &SdkConfig {
        &self.inner.config
    }

    /// Base URL of the configured environment.
    pub fn base_url(&self) -> &str {
        self.inner.config.environment.base_url()
    }

    /// Correlation id attached to every request and log event.
    pub fn correlation_id(&self) -> &str {
        &self.inner.correlation_id
    }

    /// The request-performing gateway.
    pub fn gateway(&self) -> &Arc<dyn RequestPerforming> {
        &self.inner.gateway
    }

    /// Telemetry sink for this session.
    pub fn telemetry(&self) -> &TelemetryLogger {
        &self.inner.telemetry
    }

    /// Base for merchant return links.
    pub fn return_url_base(&self) -> &str {
        self.inner
            .config
            .return_url_base
            .as_deref()
            .unwrap_or(consts::DEFAULT_RETURN_URL_BASE)
    }

    /// The headers attached to every request of this session.
    pub fn base_headers(&self) -> Vec<(String, Maskable<String>)> {
        build_headers(&self.inner.config, &self.inner.correlation_id)
    }
}

fn build_headers(config: &SdkConfig, correlation_id: &str) -> Vec<(String, Maskable<String>)> {
    let mut headers = vec![
        (
            consts::headers::ACCEPT.to_string(),
            "application/json".into(),
        ),
        (
            consts::headers::CONTENT_TYPE.to_string(),
            "application/json".into(),
        ),
        (
            consts::headers::AUTHORIZATION.to_string(),
            format!("Basic {}", config.api_key.peek()).into_masked(),
        ),
        (
            consts::headers::X_INTERNAL_CORRELATION_ID.to_string(),
            correlation_id.into(),
        ),
        (
            consts::headers::X_APP_VERSION.to_string(),
            sdk_env::version!().into(),
        ),
        (
            consts::headers::X_TRANSACTION_SOURCE.to_string(),
            consts::TRANSACTION_SOURCE.into(),
        ),
    ];
    if let Some(invocation_id) = &config.invocation_id {
        headers.push((
            consts::headers::X_INVOCATION_ID.to_string(),
            invocation_id.as_str().into(),
        ));
        headers.push((
            consts::headers::SIMULATOR.to_string(),
            consts::SIMULATOR_EXTERNAL.into(),
        ));
    }
    headers
}

fn validate_api_key(
    api_key: &Secret<String>,
    correlation_id: &str,
) -> CustomResult<(), SdkError> {
    let key = api_key.peek();
    if key.is_empty() {
        // Misuse of the API rather than a runtime condition; loud in debug,
        // a normal error in release.
        debug_assert!(!key.is_empty(), "session built with an empty API key");
        return Err(report!(SdkError::new(
            ErrorCode::SdkNotInitialized,
            correlation_id,
            "session built with an empty API key",
        )));
    }
    if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '='))
    {
        return Err(report!(SdkError::new(
            ErrorCode::InvalidApiKey,
            correlation_id,
            "API key is not valid base64",
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: &str) -> SdkConfig {
        SdkConfig {
            api_key: Secret::new(api_key.to_string()),
            environment: Environment::Test,
            return_url_base: None,
            invocation_id: None,
            app_name: None,
        }
    }

    #[test]
    fn environments_have_distinct_hosts() {
        assert_ne!(
            Environment::Test.base_url(),
            Environment::Production.base_url()
        );
    }

    #[test]
    fn malformed_api_key_is_rejected() {
        let error = SdkSession::new(config("not base64!"))
            .expect_err("must fail")
            .current_context()
            .clone();
        assert_eq!(error.error_code, ErrorCode::InvalidApiKey);
    }

    #[test]
    fn simulator_headers_ride_with_invocation_id() {
        let mut with_invocation = config("dGVzdDp0ZXN0");
        with_invocation.invocation_id = Some("inv-1".to_string());
        let session = SdkSession::new(with_invocation).expect("session");
        let headers = session.base_headers();
        assert!(headers
            .iter()
            .any(|(name, _)| name == consts::headers::X_INVOCATION_ID));
        assert!(headers
            .iter()
            .any(|(name, value)| name == consts::headers::SIMULATOR
                && value.clone().into_inner() == consts::SIMULATOR_EXTERNAL));

        let session = SdkSession::new(config("dGVzdDp0ZXN0")).expect("session");
        assert!(!session
            .base_headers()
            .iter()
            .any(|(name, _)| name == consts::headers::SIMULATOR));
    }

    #[test]
    fn authorization_header_is_masked() {
        let session = SdkSession::new(config("dGVzdDp0ZXN0")).expect("session");
        let authorization = session
            .base_headers()
            .into_iter()
            .find(|(name, _)| name == consts::headers::AUTHORIZATION)
            .expect("authorization header");
        assert!(authorization.1.is_masked());
        assert!(!format!("{:?}", authorization.1).contains("dGVzdDp0ZXN0"));
    }
}
