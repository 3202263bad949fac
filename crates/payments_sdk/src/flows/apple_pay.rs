//! Apple Pay wallet-sheet adapter.

use std::{collections::BTreeSet, sync::Arc};

use api_models::{
    payment_handles::ApplePayPaymentToken,
    payment_methods::{AccountConfiguration, CardCapability, CardNetworkCode},
};
use common_utils::{errors::CustomResult, types::MinorUnit};
use sdk_env::logger;
use tokio::sync::mpsc;

use super::ProviderFlowOutcome;
use crate::vendors::{VendorError, WalletSheetEvent, WalletSheetPresenting};

/// A card network the wallet sheet may offer, with the funding capability
/// the merchant account enables for it. Derived once from the account
/// configuration and held for the context's lifetime.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SupportedNetwork {
    /// The card network.
    pub network: CardNetworkCode,
    /// Enabled funding capability.
    pub capability: CardCapability,
}

/// Merchant capability flags handed to the wallet sheet.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum MerchantCapability {
    /// 3DS-backed card processing; always present.
    ThreeDSecure,
    /// At least one network accepts credit.
    Credit,
    /// At least one network accepts debit.
    Debit,
}

/// Networks enabled on the merchant account configuration.
pub fn supported_networks(configuration: Option<&AccountConfiguration>) -> Vec<SupportedNetwork> {
    configuration
        .and_then(|configuration| configuration.card_type_config.as_ref())
        .map(|config| {
            let mut networks: Vec<SupportedNetwork> = config
                .iter()
                .map(|(network, capability)| SupportedNetwork {
                    network: *network,
                    capability: *capability,
                })
                .collect();
            networks.sort_by_key(|entry| entry.network.to_string());
            networks
        })
        .unwrap_or_default()
}

/// Union of the capabilities across `networks`. 3DS processing is always
/// offered; credit and debit are offered when any network enables them.
pub fn merchant_capabilities(networks: &[SupportedNetwork]) -> BTreeSet<MerchantCapability> {
    let mut capabilities = BTreeSet::from([MerchantCapability::ThreeDSecure]);
    for entry in networks {
        match entry.capability {
            CardCapability::Credit => {
                capabilities.insert(MerchantCapability::Credit);
            }
            CardCapability::Debit => {
                capabilities.insert(MerchantCapability::Debit);
            }
            CardCapability::Both => {
                capabilities.insert(MerchantCapability::Credit);
                capabilities.insert(MerchantCapability::Debit);
            }
        }
    }
    capabilities
}

/// The single summary line shown on the wallet sheet.
#[derive(Clone, Debug)]
pub struct SummaryItem {
    /// Merchant label.
    pub label: String,
    /// Amount in minor units.
    pub amount: MinorUnit,
}

/// Everything the platform needs to configure the wallet sheet.
#[derive(Clone, Debug)]
pub struct WalletPaymentRequest {
    /// Apple merchant identifier.
    pub merchant_identifier: String,
    /// Merchant country.
    pub country_code: String,
    /// Payment currency.
    pub currency_code: String,
    /// Networks to offer.
    pub supported_networks: Vec<SupportedNetwork>,
    /// Capability flags.
    pub merchant_capabilities: BTreeSet<MerchantCapability>,
    /// Summary line.
    pub summary_item: SummaryItem,
    /// Whether to collect a billing address.
    pub request_billing_address: bool,
}

enum SheetState {
    Pending,
    Completed(Box<ApplePayPaymentToken>),
}

/// Single-shot adapter around the wallet sheet.
///
/// The OS fires the same dismissal callback whether the sheet closes after
/// an authorization or without one; the state flag is what tells the two
/// apart.
pub struct ApplePayFlow {
    presenter: Arc<dyn WalletSheetPresenting>,
}

impl ApplePayFlow {
    /// Wrap a sheet presenter.
    pub fn new(presenter: Arc<dyn WalletSheetPresenting>) -> Self {
        Self { presenter }
    }

    /// Whether the device can present a wallet sheet.
    pub fn is_available(&self) -> bool {
        self.presenter.is_available()
    }

    /// Present the sheet and fold its callbacks into one outcome.
    pub async fn initiate_flow(
        self,
        request: WalletPaymentRequest,
    ) -> CustomResult<ProviderFlowOutcome<ApplePayPaymentToken>, VendorError> {
        let (events, mut receiver) = mpsc::channel(8);
        self.presenter.present(request, events).await?;

        let mut state = SheetState::Pending;
        while let Some(event) = receiver.recv().await {
            match event {
                WalletSheetEvent::Authorized(token) => {
                    if matches!(state, SheetState::Pending) {
                        state = SheetState::Completed(token);
                    } else {
                        logger::debug!("duplicate wallet authorization ignored");
                    }
                }
                WalletSheetEvent::Dismissed => {
                    return Ok(match state {
                        SheetState::Completed(token) => ProviderFlowOutcome::Success(*token),
                        SheetState::Pending => ProviderFlowOutcome::Cancelled,
                    });
                }
            }
        }

        // The sheet went away without its dismissal callback.
        match state {
            SheetState::Completed(token) => Ok(ProviderFlowOutcome::Success(*token)),
            SheetState::Pending => Err(error_stack::report!(VendorError::SessionDropped)),
        }
    }
}
