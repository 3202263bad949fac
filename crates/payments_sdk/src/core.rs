//! Per-rail tokenization orchestrators and their shared plumbing.
//!
//! Every rail runs the same skeleton: validate options → create a payment
//! handle → branch on its status → run the rail's provider flow if the
//! handle demands one → refresh the token → exactly one terminal result.

pub mod apple_pay;
pub mod card;
pub mod paypal;
pub(crate) mod transformers;
pub mod venmo;

use std::sync::atomic::{AtomicBool, Ordering};

use api_models::{enums, payment_handles::PaymentHandle};
use common_utils::validation;
use masking::PeekInterface;

use crate::{errors::ErrorCode, types::TokenizeOptions};

/// What the handle's status means for the flow.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum HandleDisposition {
    /// Payable or completed: refresh and return, no provider flow.
    Ready,
    /// Initiated or processing with a redirect action: the rail's provider
    /// flow must run.
    NeedsAuthorization,
    /// Failed, expired, or a shape the flow cannot act on.
    Dead,
}

pub(crate) fn disposition(handle: &PaymentHandle) -> HandleDisposition {
    if handle.status.is_terminal_success() {
        HandleDisposition::Ready
    } else if matches!(
        handle.status,
        enums::PaymentHandleStatus::Initiated | enums::PaymentHandleStatus::Processing
    ) && handle.action.as_deref() == Some(enums::ACTION_REDIRECT)
    {
        HandleDisposition::NeedsAuthorization
    } else {
        HandleDisposition::Dead
    }
}

/// Check the shared option fields, first violation wins. The order is part
/// of the API contract: amount, then email, then first name, then last
/// name, then the remaining optional fields.
pub(crate) fn validate_tokenize_options(options: &TokenizeOptions) -> Result<(), ErrorCode> {
    if !validation::is_valid_amount(options.amount) {
        return Err(ErrorCode::InvalidAmount);
    }

    let profile = options.profile.as_ref();
    let email = profile
        .and_then(|profile| profile.email.as_ref())
        .map(|value| value.peek().as_str());
    if !validation::is_valid_email(email) {
        return Err(ErrorCode::InvalidEmail);
    }
    let first_name = profile
        .and_then(|profile| profile.first_name.as_ref())
        .map(|value| value.peek().as_str());
    if !validation::is_valid_first_name(first_name) {
        return Err(ErrorCode::InvalidFirstName);
    }
    let last_name = profile
        .and_then(|profile| profile.last_name.as_ref())
        .map(|value| value.peek().as_str());
    if !validation::is_valid_last_name(last_name) {
        return Err(ErrorCode::InvalidLastName);
    }
    let phone = profile
        .and_then(|profile| profile.phone.as_ref())
        .map(|value| value.peek().as_str());
    if !validation::is_valid_phone(phone) {
        return Err(ErrorCode::InvalidPhone);
    }

    let descriptor = options.merchant_descriptor.as_ref();
    if !validation::is_valid_dynamic_descriptor(
        descriptor.and_then(|descriptor| descriptor.dynamic_descriptor.as_deref()),
    ) {
        return Err(ErrorCode::InvalidDynamicDescriptor);
    }
    if !validation::is_valid_descriptor_phone(
        descriptor.and_then(|descriptor| descriptor.phone.as_deref()),
    ) {
        return Err(ErrorCode::InvalidPhone);
    }

    Ok(())
}

/// Guard over a context's in-flight flag: acquired at flow entry, released
/// on drop so every exit path clears it.
pub(crate) struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    pub(crate) fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
