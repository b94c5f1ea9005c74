//! Turns rejected requests into [`AdminError`]s with messages fit for display

use admin_shared::{errors::AdminError, uac::RegisterResponse};
use reqwest::StatusCode;
use serde_json::Value;
use tracing::warn;

/// Which operation the failed request belonged to, each builds its message
/// differently
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorContext {
    Login,
    Registration,
    Resource,
}

const LOGIN_FALLBACK: &str = "Authentication failed";
const REGISTRATION_FALLBACK: &str = "Unknown registration error";
const RESOURCE_FALLBACK: &str = "request failed";

#[tracing::instrument(ret)]
pub(crate) async fn decode_error_response(
    context: ErrorContext,
    response: reqwest::Response,
) -> AdminError {
    let status = response.status();
    debug_assert!(
        !status.is_success(),
        "this is supposed to be an error, right? Status code is: {status}"
    );
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            warn!(?e, "failed to get response body");
            String::new()
        }
    };
    decode_error_body(context, status, &body)
}

pub(crate) fn decode_error_body(context: ErrorContext, status: StatusCode, body: &str) -> AdminError {
    let message = json_message(body);
    let reason = status.canonical_reason();
    match context {
        ErrorContext::Login => AdminError::Authentication(
            message
                .or_else(|| reason.map(str::to_string))
                .unwrap_or_else(|| LOGIN_FALLBACK.to_string()),
        ),
        ErrorContext::Registration => AdminError::Registration(message.unwrap_or_else(|| {
            format!("Registration failed: {}", reason.unwrap_or("Unknown error"))
        })),
        ErrorContext::Resource => AdminError::Http {
            status,
            message: message
                .or_else(|| Some(body.trim()).filter(|b| !b.is_empty()).map(str::to_string))
                .or_else(|| reason.map(str::to_string))
                .unwrap_or_else(|| RESOURCE_FALLBACK.to_string()),
        },
    }
}

/// The backend reports registration problems both through the status code and
/// through a success flag on an otherwise successful response
pub(crate) fn registration_outcome(response: RegisterResponse) -> Result<RegisterResponse, AdminError> {
    if response.is_success {
        Ok(response)
    } else {
        Err(AdminError::Registration(
            response
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| REGISTRATION_FALLBACK.to_string()),
        ))
    }
}

/// Extracts a non empty `message` field if the body is a json object
fn json_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}
