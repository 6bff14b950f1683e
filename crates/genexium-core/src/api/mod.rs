//! Backend API: the `PlanApi` seam, its HTTP implementation and wire types.
//!
//! Both endpoints answer with a JSON envelope. A request only counts as
//! successful when the HTTP status is 2xx *and* the body carries
//! `"success": true`; anything else is a server-reported error whose
//! optional `error` string is surfaced to the user.

mod http;
mod types;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub use http::{ClientConfig, Credentials, HttpPlanClient};
pub use types::{DailyWorkoutRequest, DailyWorkoutResponse, GeneratePlanRequest, PlanResponse};

/// Errors returned by a [`PlanApi`] call.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server answered but did not report success.
    #[error("server reported failure (HTTP {status}): {}", .message.as_deref().unwrap_or("no message"))]
    Server {
        status: u16,
        message: Option<String>,
    },

    /// The request never produced a response (connection refused, reset, ...).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not the JSON the endpoint promises.
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// The server-provided message, if the server sent a non-empty one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Server { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// True for failures the user should read as "check your connection".
    pub fn is_connectivity(&self) -> bool {
        matches!(self, ApiError::Transport(_) | ApiError::Decode(_))
    }
}

/// Adapter interface for the generation backend.
///
/// The controller only talks to this trait, so tests can swap in a scripted
/// implementation. Object-safe: stored as `Arc<dyn PlanApi>` by the dashboard.
#[async_trait]
pub trait PlanApi: Send + Sync {
    /// `POST /generate_plan`.
    async fn generate_plan(&self, request: &GeneratePlanRequest) -> Result<PlanResponse, ApiError>;

    /// `POST /generate_daily_workout`.
    async fn generate_daily_workout(
        &self,
        request: &DailyWorkoutRequest,
    ) -> Result<DailyWorkoutResponse, ApiError>;
}

const _: () = {
    fn _assert_object_safe(_: &dyn PlanApi) {}
};

/// Interpret a response body according to the success envelope.
pub(crate) fn decode_envelope<T: DeserializeOwned>(
    status: u16,
    ok: bool,
    body: &[u8],
) -> Result<T, ApiError> {
    let value: Value = serde_json::from_slice(body)?;

    let success = value
        .get("success")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    if ok && success {
        return Ok(serde_json::from_value(value)?);
    }

    let message = value
        .get("error")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_owned);

    Err(ApiError::Server { status, message })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_decodes_payload() {
        let body = br###"{"success":true,"daily_workout":"## Monday"}"###;
        let resp: DailyWorkoutResponse = decode_envelope(200, true, body).unwrap();
        assert_eq!(resp.daily_workout, "## Monday");
    }

    #[test]
    fn success_false_is_server_error_with_message() {
        let body = br#"{"success":false,"error":"Invalid gene selected"}"#;
        let err = decode_envelope::<PlanResponse>(200, true, body).unwrap_err();
        assert_eq!(err.server_message(), Some("Invalid gene selected"));
        assert!(!err.is_connectivity());
    }

    #[test]
    fn non_2xx_with_error_field_is_server_error() {
        let body = br#"{"error":"Both gene and goal are required"}"#;
        let err = decode_envelope::<PlanResponse>(400, false, body).unwrap_err();
        match err {
            ApiError::Server { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message.as_deref(), Some("Both gene and goal are required"));
            }
            other => panic!("expected server error, got {other:?}"),
        }
    }

    #[test]
    fn non_2xx_overrides_success_flag() {
        let body = br#"{"success":true,"daily_workout":"x"}"#;
        let err = decode_envelope::<DailyWorkoutResponse>(500, false, body).unwrap_err();
        assert!(matches!(err, ApiError::Server { status: 500, message: None }));
    }

    #[test]
    fn empty_error_string_counts_as_absent() {
        let body = br#"{"success":false,"error":""}"#;
        let err = decode_envelope::<PlanResponse>(200, true, body).unwrap_err();
        assert_eq!(err.server_message(), None);
    }

    #[test]
    fn non_json_body_is_connectivity_error() {
        let body = b"Could not verify your access level for that URL.";
        let err = decode_envelope::<PlanResponse>(401, false, body).unwrap_err();
        assert!(err.is_connectivity());
    }

    #[test]
    fn success_with_missing_fields_is_connectivity_error() {
        let body = br#"{"success":true,"gene":"nos3"}"#;
        let err = decode_envelope::<PlanResponse>(200, true, body).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
