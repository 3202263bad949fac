//! Venmo app-switch adapter, driven off the handle's processor client
//! token.

use std::sync::Arc;

use api_models::payment_handles::GatewayResponse;
use common_utils::errors::CustomResult;
use error_stack::report;
use masking::Secret;
use sdk_env::logger;
use tokio::sync::mpsc;

use super::ProviderFlowOutcome;
use crate::vendors::{VendorError, VenmoAuthorizationEvent, VenmoAuthorizing};

/// Single-shot adapter around one Venmo authorization.
pub struct VenmoFlow {
    authorizer: Arc<dyn VenmoAuthorizing>,
}

impl VenmoFlow {
    /// Wrap a Venmo authorizer.
    pub fn new(authorizer: Arc<dyn VenmoAuthorizing>) -> Self {
        Self { authorizer }
    }

    /// Run the authorization and fold the vendor events into one outcome.
    /// Success carries the processor payment-method nonce the backend needs
    /// to be told about.
    pub async fn initiate_flow(
        self,
        gateway_response: &GatewayResponse,
        profile_id: Option<String>,
    ) -> CustomResult<ProviderFlowOutcome<Secret<String>>, VendorError> {
        let Some(client_token) = gateway_response.client_token.clone() else {
            logger::warn!("payment handle carries no client token for venmo authorization");
            return Ok(ProviderFlowOutcome::Failed);
        };

        let (events, mut receiver) = mpsc::channel(8);
        self.authorizer
            .authorize(client_token, profile_id, events)
            .await?;

        match receiver.recv().await {
            Some(VenmoAuthorizationEvent::Authorized { nonce }) => {
                Ok(ProviderFlowOutcome::Success(nonce))
            }
            Some(VenmoAuthorizationEvent::Cancelled) => Ok(ProviderFlowOutcome::Cancelled),
            Some(VenmoAuthorizationEvent::Failed) => Ok(ProviderFlowOutcome::Failed),
            None => Err(report!(VendorError::SessionDropped)),
        }
    }
}

/// Whether an incoming app-return URL belongs to this SDK's Venmo flow.
/// The scheme comparison is case-insensitive; everything else about the URL
/// is left to the adapter.
pub fn can_handle_return_url(url: &str, configured_scheme: &str) -> bool {
    match url::Url::parse(url) {
        Ok(parsed) => parsed.scheme().eq_ignore_ascii_case(configured_scheme),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_allowlist_is_case_insensitive() {
        assert!(can_handle_return_url(
            "expoalternatepayments://venmo/return",
            "expoalternatepayments"
        ));
        assert!(can_handle_return_url(
            "ExPoAlTeRnAtEpAyMeNtS://venmo/return",
            "expoalternatepayments"
        ));
        assert!(can_handle_return_url(
            "expoalternatepayments://venmo/return",
            "ExPoAlTeRnAtEpAyMeNtS"
        ));
    }

    #[test]
    fn foreign_schemes_are_rejected() {
        assert!(!can_handle_return_url("https://venmo/return", "expoalternatepayments"));
        assert!(!can_handle_return_url("not a url", "expoalternatepayments"));
    }
}
