//! PayPal checkout adapter: native in-app checkout or web redirect, chosen
//! at construction, both converging on the same three-way outcome.

use std::sync::Arc;

use api_models::payment_handles::{PaymentHandle, ReturnLinkRel};
use common_utils::errors::CustomResult;
use error_stack::report;
use sdk_env::logger;
use tokio::sync::mpsc;

use super::ProviderFlowOutcome;
use crate::vendors::{
    BrowserEvent, NativeCheckoutEvent, NativeCheckoutLaunching, RedirectBrowsing, VendorError,
};

/// How checkout is rendered.
#[derive(Clone)]
pub enum CheckoutStrategy {
    /// Native in-app checkout through the vendor SDK.
    Native(Arc<dyn NativeCheckoutLaunching>),
    /// Web checkout in an in-app browser, classified by return links.
    Web(Arc<dyn RedirectBrowsing>),
}

impl std::fmt::Debug for CheckoutStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Native(_) => "CheckoutStrategy::Native",
            Self::Web(_) => "CheckoutStrategy::Web",
        })
    }
}

/// Single-shot adapter around one PayPal checkout.
#[derive(Debug)]
pub struct PayPalFlow {
    strategy: CheckoutStrategy,
}

impl PayPalFlow {
    /// Wrap a render strategy.
    pub fn new(strategy: CheckoutStrategy) -> Self {
        Self { strategy }
    }

    /// Run checkout for `handle` and fold the vendor events into one
    /// outcome.
    pub async fn initiate_flow(
        self,
        handle: &PaymentHandle,
    ) -> CustomResult<ProviderFlowOutcome<()>, VendorError> {
        match self.strategy {
            CheckoutStrategy::Native(launcher) => {
                let Some(order_id) = handle.order_id.clone() else {
                    logger::warn!("payment handle carries no order id for native checkout");
                    return Ok(ProviderFlowOutcome::Failed);
                };
                native_checkout(launcher, order_id).await
            }
            CheckoutStrategy::Web(browser) => web_checkout(browser, handle).await,
        }
    }
}

async fn native_checkout(
    launcher: Arc<dyn NativeCheckoutLaunching>,
    order_id: String,
) -> CustomResult<ProviderFlowOutcome<()>, VendorError> {
    let (events, mut receiver) = mpsc::channel(8);
    launcher.launch(order_id, events).await?;

    match receiver.recv().await {
        Some(NativeCheckoutEvent::Approved) => Ok(ProviderFlowOutcome::Success(())),
        Some(NativeCheckoutEvent::Cancelled) => Ok(ProviderFlowOutcome::Cancelled),
        Some(NativeCheckoutEvent::Failed) => Ok(ProviderFlowOutcome::Failed),
        None => Err(report!(VendorError::SessionDropped)),
    }
}

async fn web_checkout(
    browser: Arc<dyn RedirectBrowsing>,
    handle: &PaymentHandle,
) -> CustomResult<ProviderFlowOutcome<()>, VendorError> {
    let Some(checkout_url) = handle
        .return_link(ReturnLinkRel::RedirectPayment)
        .map(|link| link.href.clone())
    else {
        logger::warn!("payment handle carries no redirect link for web checkout");
        return Ok(ProviderFlowOutcome::Failed);
    };

    let (events, mut receiver) = mpsc::channel(8);
    browser.open(checkout_url, events).await?;

    while let Some(event) = receiver.recv().await {
        match event {
            BrowserEvent::Redirected(url) => return Ok(classify_redirect(handle, &url)),
            BrowserEvent::Dismissed => return Ok(ProviderFlowOutcome::Failed),
        }
    }
    Err(report!(VendorError::SessionDropped))
}

/// Match a browser redirect against the handle's return links. Matching is
/// verbatim and case-sensitive; a URL matching nothing classifies as
/// cancelled.
fn classify_redirect(handle: &PaymentHandle, url: &str) -> ProviderFlowOutcome<()> {
    let href_of = |rel| {
        handle
            .return_link(rel)
            .map(|link| link.href.as_str())
    };

    if href_of(ReturnLinkRel::OnCompleted) == Some(url) {
        ProviderFlowOutcome::Success(())
    } else if href_of(ReturnLinkRel::OnFailed) == Some(url) {
        ProviderFlowOutcome::Failed
    } else if href_of(ReturnLinkRel::OnCancelled) == Some(url)
        || href_of(ReturnLinkRel::Default) == Some(url)
    {
        ProviderFlowOutcome::Cancelled
    } else {
        logger::debug!(%url, "unrecognized return URL, classifying as cancelled");
        ProviderFlowOutcome::Cancelled
    }
}

#[cfg(test)]
mod tests {
    use api_models::{
        enums::PaymentHandleStatus,
        payment_handles::ReturnLink,
    };
    use masking::Secret;

    use super::*;

    fn handle_with_links() -> PaymentHandle {
        PaymentHandle {
            id: "ph_1".to_string(),
            merchant_ref_num: "order-1".to_string(),
            payment_handle_token: Secret::new("tok".to_string()),
            status: PaymentHandleStatus::Initiated,
            action: Some("REDIRECT".to_string()),
            order_id: None,
            gateway_response: None,
            return_links: Some(vec![
                ReturnLink::get(
                    ReturnLinkRel::OnCompleted,
                    "https://app.example.com/Done".to_string(),
                ),
                ReturnLink::get(
                    ReturnLinkRel::OnFailed,
                    "https://app.example.com/failed".to_string(),
                ),
                ReturnLink::get(
                    ReturnLinkRel::OnCancelled,
                    "https://app.example.com/cancelled".to_string(),
                ),
                ReturnLink::get(
                    ReturnLinkRel::Default,
                    "https://app.example.com/return".to_string(),
                ),
            ]),
        }
    }

    #[test]
    fn redirect_classification_is_exact() {
        let handle = handle_with_links();
        assert_eq!(
            classify_redirect(&handle, "https://app.example.com/Done"),
            ProviderFlowOutcome::Success(())
        );
        assert_eq!(
            classify_redirect(&handle, "https://app.example.com/failed"),
            ProviderFlowOutcome::Failed
        );
        assert_eq!(
            classify_redirect(&handle, "https://app.example.com/cancelled"),
            ProviderFlowOutcome::Cancelled
        );
        assert_eq!(
            classify_redirect(&handle, "https://app.example.com/return"),
            ProviderFlowOutcome::Cancelled
        );
    }

    #[test]
    fn redirect_matching_is_case_sensitive() {
        let handle = handle_with_links();
        // The completed link is ".../Done"; a lowercase variant must not
        // count as success.
        assert_eq!(
            classify_redirect(&handle, "https://app.example.com/done"),
            ProviderFlowOutcome::Cancelled
        );
    }

    #[test]
    fn unknown_url_classifies_as_cancelled() {
        let handle = handle_with_links();
        assert_eq!(
            classify_redirect(&handle, "https://elsewhere.example.com/x"),
            ProviderFlowOutcome::Cancelled
        );
    }
}
