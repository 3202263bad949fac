//! Card rail flows: 3DS as the authorization step, challenge handling, and
//! the refresh retry policy.

#![allow(clippy::unwrap_used)]

mod common;

use std::sync::{atomic::Ordering, Arc};

use base64::Engine;
use common::*;
use common_utils::date_time;
use masking::{PeekInterface, Secret};
use payments_sdk::{
    vendors::ChallengeEvent, CardContext, CardDetails, CardTokenizeOptions, ErrorCode,
    TokenizeOptions,
};

fn options() -> TokenizeOptions {
    TokenizeOptions {
        amount: 1099,
        currency_code: "USD".to_string(),
        merchant_ref_num: "order-1".to_string(),
        account_id: "1002696790".to_string(),
        profile: None,
        billing_details: None,
        merchant_descriptor: None,
    }
}

fn card_options() -> CardTokenizeOptions {
    let next_year = u16::try_from(date_time::now().year()).unwrap() + 1;
    CardTokenizeOptions {
        options: options(),
        card: CardDetails {
            card_number: Secret::new("4242424242424242".to_string()),
            expiry_month: 12,
            expiry_year: next_year,
            cvv: Some(Secret::new("123".to_string())),
            holder_name: None,
        },
    }
}

fn challenge_envelope() -> String {
    base64::engine::general_purpose::STANDARD.encode(
        serde_json::to_vec(&serde_json::json!({
            "id": "auth-1",
            "transactionId": "txn-9",
            "payload": "cca-payload",
            "accountId": "1002696790",
        }))
        .unwrap(),
    )
}

async fn card_context(
    fingerprinter: Arc<ScriptedFingerprinter>,
    challenger: Arc<ScriptedChallenger>,
) -> (CardContext, Arc<MockGateway>) {
    let (session, gateway) = session_with_gateway();
    gateway.push(200, methods_response("CARD", "USD", "1002696790"));
    let context = CardContext::initialize(
        session,
        "USD",
        "1002696790",
        fingerprinter,
        challenger,
    )
    .await
    .expect("context");
    (context, gateway)
}

#[tokio::test]
async fn payable_card_handle_skips_three_ds() {
    let fingerprinter = ScriptedFingerprinter::completed();
    let challenger = ScriptedChallenger::new(ChallengeEvent::Cancelled);
    let (context, gateway) = card_context(fingerprinter.clone(), challenger).await;

    gateway.push(201, handle_response("PAYABLE", None));
    gateway.push(200, handle_response("PAYABLE", None));

    let token = context.tokenize(&card_options()).await.expect("token");
    assert_eq!(token.peek(), "handle-token-1");
    assert_eq!(fingerprinter.invocations.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn redirect_card_handle_runs_fingerprinting_then_refreshes() {
    let fingerprinter = ScriptedFingerprinter::completed();
    let challenger = ScriptedChallenger::new(ChallengeEvent::Cancelled);
    let (context, gateway) = card_context(fingerprinter.clone(), challenger.clone()).await;

    gateway.push(201, handle_response("INITIATED", Some("REDIRECT")));
    gateway.push(200, serde_json::json!({"jwt": "fingerprint-jwt", "id": "auth-1"}));
    gateway.push(200, handle_response("PAYABLE", None));

    let token = context.tokenize(&card_options()).await.expect("token");
    assert_eq!(token.peek(), "handle-token-1");
    assert_eq!(fingerprinter.invocations.load(Ordering::SeqCst), 1);
    assert_eq!(challenger.invocations.load(Ordering::SeqCst), 0);

    let seen = gateway.seen();
    let jwt_position = seen
        .iter()
        .position(|request| request.url.contains("/threedsecure/v2/jwt"))
        .unwrap();
    let refresh_position = seen
        .iter()
        .position(|request| request.url.contains("/paymenthandles/handle-token-1"))
        .unwrap();
    assert!(jwt_position < refresh_position);
    // The JWT request carries the card bin.
    assert!(seen[jwt_position].body.as_deref().unwrap().contains("424242"));
}

#[tokio::test]
async fn pending_authentication_walks_the_challenge_and_finalizes() {
    let fingerprinter = ScriptedFingerprinter::pending_with_challenge(&challenge_envelope());
    let challenger = ScriptedChallenger::new(ChallengeEvent::Completed {
        validation_jwt: Some(Secret::new("server-jwt".to_string())),
    });
    let (context, gateway) = card_context(fingerprinter, challenger.clone()).await;

    gateway.push(201, handle_response("INITIATED", Some("REDIRECT")));
    gateway.push(200, serde_json::json!({"jwt": "fingerprint-jwt"}));
    gateway.push(200, serde_json::json!({"status": "COMPLETED", "threeDResult": "Y"}));
    gateway.push(200, handle_response("PAYABLE", None));

    let token = context.tokenize(&card_options()).await.expect("token");
    assert_eq!(token.peek(), "handle-token-1");
    assert_eq!(challenger.invocations.load(Ordering::SeqCst), 1);

    let finalize_calls =
        gateway.requests_matching("/accounts/1002696790/authentications/auth-1/finalize");
    assert_eq!(finalize_calls.len(), 1);
    assert!(finalize_calls[0].body.as_deref().unwrap().contains("server-jwt"));
}

#[tokio::test]
async fn challenge_callback_without_jwt_is_a_session_failure() {
    let fingerprinter = ScriptedFingerprinter::pending_with_challenge(&challenge_envelope());
    let challenger = ScriptedChallenger::new(ChallengeEvent::Completed {
        validation_jwt: None,
    });
    let (context, gateway) = card_context(fingerprinter, challenger).await;

    gateway.push(201, handle_response("INITIATED", Some("REDIRECT")));
    gateway.push(200, serde_json::json!({"jwt": "fingerprint-jwt"}));

    let error = context.tokenize(&card_options()).await.expect_err("no jwt");
    let error = error.current_context();
    assert_eq!(error.error_code, ErrorCode::ThreeDsSessionFailure);
    // 3DS failures live in their own numeric space.
    assert!(error.code < 9000);
    // Finalize never ran.
    assert!(gateway.requests_matching("/finalize").is_empty());
}

#[tokio::test]
async fn cancelled_challenge_is_a_three_ds_cancellation() {
    let fingerprinter = ScriptedFingerprinter::pending_with_challenge(&challenge_envelope());
    let challenger = ScriptedChallenger::new(ChallengeEvent::Cancelled);
    let (context, gateway) = card_context(fingerprinter, challenger).await;

    gateway.push(201, handle_response("INITIATED", Some("REDIRECT")));
    gateway.push(200, serde_json::json!({"jwt": "fingerprint-jwt"}));

    let error = context.tokenize(&card_options()).await.expect_err("cancelled");
    let error = error.current_context();
    assert_eq!(error.error_code, ErrorCode::ThreeDsUserCancelled);
    assert!(error.error_code.is_user_cancellation());
}

#[tokio::test]
async fn declined_finalize_fails_validation() {
    let fingerprinter = ScriptedFingerprinter::pending_with_challenge(&challenge_envelope());
    let challenger = ScriptedChallenger::new(ChallengeEvent::Completed {
        validation_jwt: Some(Secret::new("server-jwt".to_string())),
    });
    let (context, gateway) = card_context(fingerprinter, challenger).await;

    gateway.push(201, handle_response("INITIATED", Some("REDIRECT")));
    gateway.push(200, serde_json::json!({"jwt": "fingerprint-jwt"}));
    gateway.push(200, serde_json::json!({"status": "COMPLETED", "threeDResult": "N"}));

    let error = context.tokenize(&card_options()).await.expect_err("declined");
    assert_eq!(
        error.current_context().error_code,
        ErrorCode::ThreeDsFailedValidation
    );
}

#[tokio::test]
async fn dead_handle_is_a_card_authorization_failure() {
    let fingerprinter = ScriptedFingerprinter::completed();
    let challenger = ScriptedChallenger::new(ChallengeEvent::Cancelled);
    let (context, gateway) = card_context(fingerprinter, challenger).await;

    gateway.push(201, handle_response("FAILED", None));

    let error = context.tokenize(&card_options()).await.expect_err("failed");
    assert_eq!(
        error.current_context().error_code,
        ErrorCode::CardFailedAuthorization
    );
}

#[tokio::test]
async fn unknown_card_brand_fails_before_any_network_call() {
    let fingerprinter = ScriptedFingerprinter::completed();
    let challenger = ScriptedChallenger::new(ChallengeEvent::Cancelled);
    let (context, gateway) = card_context(fingerprinter, challenger).await;
    let requests_after_init = gateway.request_count();

    let mut invalid = card_options();
    invalid.card.card_number = Secret::new("1234567812345670".to_string());

    let error = context.tokenize(&invalid).await.expect_err("bad brand");
    assert_eq!(
        error.current_context().error_code,
        ErrorCode::UnsupportedCardBrand
    );
    assert_eq!(gateway.request_count(), requests_after_init);
}

#[tokio::test(start_paused = true)]
async fn refresh_polls_through_processing_to_payable() {
    let fingerprinter = ScriptedFingerprinter::completed();
    let challenger = ScriptedChallenger::new(ChallengeEvent::Cancelled);
    let (context, gateway) = card_context(fingerprinter, challenger).await;

    gateway.push(201, handle_response("PAYABLE", None));
    gateway.push(200, handle_response("PROCESSING", None));
    gateway.push(200, handle_response("PROCESSING", None));
    gateway.push(200, handle_response("PAYABLE", None));

    let token = context.tokenize(&card_options()).await.expect("token");
    assert_eq!(token.peek(), "handle-token-1");
    assert_eq!(
        gateway
            .requests_matching("/paymenthandles/handle-token-1")
            .len(),
        3
    );
}

#[tokio::test(start_paused = true)]
async fn refresh_retries_exhaust_into_a_terminal_error() {
    let fingerprinter = ScriptedFingerprinter::completed();
    let challenger = ScriptedChallenger::new(ChallengeEvent::Cancelled);
    let (context, gateway) = card_context(fingerprinter, challenger).await;

    gateway.push(201, handle_response("PAYABLE", None));
    gateway.push(200, handle_response("PROCESSING", None));
    gateway.push(200, handle_response("PROCESSING", None));
    gateway.push(200, handle_response("PROCESSING", None));

    let error = context.tokenize(&card_options()).await.expect_err("exhausted");
    assert_eq!(error.current_context().error_code, ErrorCode::TimeoutError);
    assert_eq!(
        gateway
            .requests_matching("/paymenthandles/handle-token-1")
            .len(),
        3
    );
}
