//! 3-D Secure authentication wire types.

use masking::Secret;
use serde::{Deserialize, Serialize};

/// Request body for `POST /threedsecure/v2/jwt`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JwtRequest {
    pub account_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<JwtCardInfo>,
}

/// Card detail attached to a JWT request; the issuer bin selects the right
/// fingerprinting configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JwtCardInfo {
    pub card_bin: String,
}

/// Response of the JWT endpoint.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JwtResponse {
    pub jwt: Secret<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_fingerprinting_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Status of an authentication attempt.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum AuthenticationStatus {
    /// Authentication finished; consult `three_d_result` for the verdict.
    Completed,
    /// A challenge is required before authentication can finish.
    Pending,
    /// Authentication failed outright.
    Failed,
}

/// Authentication outcome emitted after device fingerprinting.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationResponse {
    pub status: AuthenticationStatus,
    /// Base64 envelope describing the challenge to present, when `status`
    /// is pending.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sdk_challenge_payload: Option<Secret<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub three_d_result: Option<ThreeDResult>,
}

/// The decoded challenge envelope carried in `sdk_challenge_payload`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengePayload {
    pub id: String,
    pub transaction_id: String,
    pub payload: Secret<String>,
    pub account_id: String,
}

/// Request body for the finalize endpoint.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeRequest {
    /// Server JWT produced by the challenge, proving its completion.
    pub payload: Secret<String>,
}

/// Response of the finalize endpoint.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeResponse {
    pub status: AuthenticationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub three_d_result: Option<ThreeDResult>,
}

/// Directory-server verdict for a 3DS authentication.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize, strum::Display)]
pub enum ThreeDResult {
    /// Authenticated.
    Y,
    /// Attempted; proof available without full authentication.
    A,
    /// Not authenticated.
    N,
    /// Authentication could not be performed.
    U,
    /// Challenge required (intermediate, not terminal).
    C,
    /// Rejected by the issuer.
    R,
    /// Technical error at the directory server.
    E,
}

impl ThreeDResult {
    /// Whether the verdict lets the payment proceed.
    pub fn is_accepted(self) -> bool {
        matches!(self, Self::Y | Self::A)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn authentication_response_with_challenge() {
        let body = r#"{
            "status": "PENDING",
            "sdkChallengePayload": "eyJpZCI6ICJhdXRoLTEifQ=="
        }"#;
        let response: AuthenticationResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.status, AuthenticationStatus::Pending);
        assert!(response.sdk_challenge_payload.is_some());
        assert!(response.three_d_result.is_none());
    }

    #[test]
    fn finalize_verdicts() {
        let accepted: FinalizeResponse =
            serde_json::from_str(r#"{"status": "COMPLETED", "threeDResult": "Y"}"#).unwrap();
        assert!(accepted.three_d_result.unwrap().is_accepted());

        let declined: FinalizeResponse =
            serde_json::from_str(r#"{"status": "COMPLETED", "threeDResult": "N"}"#).unwrap();
        assert!(!declined.three_d_result.unwrap().is_accepted());
    }
}
