//! Telemetry log event types, posted fire-and-forget.

use serde::{Deserialize, Serialize};

/// Severity/category of a telemetry event.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum LogEventType {
    /// A successful end-to-end tokenization.
    Conversion,
    /// A surfaced error.
    Error,
    /// A non-fatal anomaly.
    Warning,
}

/// One telemetry event.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEvent {
    #[serde(rename = "type")]
    pub event_type: LogEventType,
    pub client_info: ClientInfo,
    pub payload: LogPayload,
}

/// Identifies the SDK build and flow emitting the event.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    pub version: String,
    pub correlation_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
}

/// Event body.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogPayload {
    pub message: String,
}
