//! The request/response pipeline between the API client and the wire.
//!
//! Everything leaves through [`RequestPerforming::perform`]; the concrete
//! [`Gateway`] translates transport failures into the closed
//! [`GatewayError`] taxonomy so no reqwest detail escapes this module.

use common_utils::{
    errors::CustomResult,
    ext_traits::BytesExt,
    request::{Method, Request},
};
use error_stack::{report, ResultExt};
use sdk_env::logger;

use crate::{consts, errors::GatewayError};

/// A raw HTTP response: status plus undecoded body bytes.
#[derive(Clone, Debug)]
pub struct Response {
    /// HTTP status code.
    pub status_code: u16,
    /// Response body.
    pub response: bytes::Bytes,
}

/// Seam for performing requests, so flows are testable without a network.
#[async_trait::async_trait]
pub trait RequestPerforming: Send + Sync {
    /// Perform `request`, returning the body of a successful response or a
    /// [`GatewayError`] for anything else.
    async fn perform(&self, request: Request) -> CustomResult<Response, GatewayError>;
}

/// Production gateway over a shared reqwest client.
#[derive(Clone, Debug)]
pub struct Gateway {
    client: reqwest::Client,
}

impl Gateway {
    /// Build a gateway with the fixed request timeout.
    pub fn new() -> CustomResult<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(consts::REQUEST_TIMEOUT)
            .build()
            .change_context(GatewayError::Generic)
            .attach_printable("Unable to construct HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl RequestPerforming for Gateway {
    async fn perform(&self, request: Request) -> CustomResult<Response, GatewayError> {
        logger::debug!(
            tag = ?logger::Tag::ApiOutgoingRequest,
            method = %request.method,
            url = %request.url,
            headers = ?request.headers,
            body = ?request.body,
        );

        let url = reqwest::Url::parse(&request.url)
            .change_context(GatewayError::InvalidUrl)
            .attach_printable_lazy(|| format!("Malformed request URL: {}", request.url))?;

        let mut builder = match request.method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
            Method::Put => self.client.put(url),
            Method::Delete => self.client.delete(url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.clone().into_inner());
        }
        if let Some(body) = request.body {
            builder = builder.body(body.get_inner().to_owned());
        }

        let response = builder
            .timeout(consts::REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|error| {
                let context = if error.is_timeout() {
                    GatewayError::Timeout
                } else if error.is_connect() {
                    GatewayError::NoConnection
                } else {
                    GatewayError::Generic
                };
                report!(context).attach_printable(error.to_string())
            })?;

        handle_response(response).await
    }
}

async fn handle_response(response: reqwest::Response) -> CustomResult<Response, GatewayError> {
    let status_code = response.status().as_u16();
    let body = response
        .bytes()
        .await
        .change_context(GatewayError::InvalidResponse)
        .attach_printable("Error while reading response body")?;

    log_response_body(status_code, &body);

    if (200..300).contains(&status_code) {
        return Ok(Response {
            status_code,
            response: body,
        });
    }

    let envelope: CustomResult<api_models::errors::ErrorEnvelope, _> =
        body.parse_struct("ErrorEnvelope");
    match envelope {
        Ok(envelope) => Err(report!(GatewayError::Api {
            status_code,
            code: envelope.error.code,
            message: envelope.error.message,
        })),
        Err(_) => Err(report!(GatewayError::Generic)
            .attach_printable(format!("Server returned status {status_code}"))),
    }
}

// Best effort, debug level only; a body that is not JSON is logged by length.
fn log_response_body(status_code: u16, body: &bytes::Bytes) {
    match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(value) => logger::debug!(
            tag = ?logger::Tag::ApiIncomingResponse,
            status_code,
            body = %serde_json::to_string_pretty(&value).unwrap_or_default(),
        ),
        Err(_) => logger::debug!(
            tag = ?logger::Tag::ApiIncomingResponse,
            status_code,
            body_bytes = body.len(),
        ),
    }
}
