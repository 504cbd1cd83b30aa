// API client module: a small blocking HTTP client that sends one invite
// request and folds every possible outcome (HTTP status codes as well
// as transport failures) into a single enum the UI can present.

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;

/// Invitation endpoint used when the operator leaves the prompt blank.
pub const DEFAULT_ENDPOINT: &str = "https://team.8888822.xyz/api/invite";

/// Total time allowed for one invite request, connect included.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// JSON body of the invite request. Field names mirror the backend
/// expectations, so this serializes to `{"card_key": ..., "email": ...}`.
#[derive(Serialize, Clone, Debug)]
pub struct InviteRequest {
    pub card_key: String,
    pub email: String,
}

/// Classified result of one invite attempt. Produced only by
/// [`InviteClient::send_invite`]; every code path in that call ends in
/// one of these variants, never in an error crossing the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InviteOutcome {
    /// HTTP 200 with a truthy `success` field in the body.
    Success { message: String },
    /// HTTP 400, or HTTP 200 whose body reports `success: false`.
    ClientError { message: String },
    /// HTTP 404: the endpoint path is wrong.
    NotFound,
    /// HTTP 500.
    ServerError,
    /// Any other HTTP status.
    UnknownStatus { status: u16, message: String },
    /// The host refused the connection or was unreachable.
    ConnectionFailure,
    /// No response within the configured timeout.
    Timeout,
    /// Anything else that went wrong during the attempt.
    UnexpectedFailure { detail: String },
}

impl InviteOutcome {
    /// Only a truthy server-side `success` counts as overall success,
    /// even though HTTP 200 was returned for `ClientError` bodies too.
    pub fn is_success(&self) -> bool {
        matches!(self, InviteOutcome::Success { .. })
    }
}

/// Blocking invite client holding a reqwest client and the endpoint URL
/// resolved for this attempt. The endpoint is not validated here;
/// malformed URLs surface through the failure classification instead.
#[derive(Clone)]
pub struct InviteClient {
    client: Client,
    endpoint: String,
}

impl InviteClient {
    /// Create a client for `endpoint` with the standard 30-second timeout.
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        Self::with_timeout(endpoint, DEFAULT_TIMEOUT)
    }

    /// Same as [`InviteClient::new`] but with an explicit timeout. Tests
    /// use this to avoid waiting the full 30 seconds.
    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(InviteClient {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Issue exactly one POST with the invite payload and classify the
    /// result. No retries; the caller decides whether to try again.
    pub fn send_invite(&self, request: &InviteRequest) -> InviteOutcome {
        self.send_invite_with_status(request).1
    }

    /// Like [`InviteClient::send_invite`], but also returns the raw HTTP
    /// status when a response was received at all, so the UI can echo it
    /// to the operator before the classified report. Transport failures
    /// have no status.
    pub fn send_invite_with_status(
        &self,
        request: &InviteRequest,
    ) -> (Option<u16>, InviteOutcome) {
        let response = match self.client.post(&self.endpoint).json(request).send() {
            Ok(response) => response,
            Err(err) => return (None, classify_send_error(&err)),
        };

        let status = response.status().as_u16();
        let text = match response.text() {
            Ok(text) => text,
            Err(err) => {
                return (
                    Some(status),
                    InviteOutcome::UnexpectedFailure {
                        detail: err.to_string(),
                    },
                )
            }
        };

        // Best-effort body parse: a non-JSON body is wrapped so its raw
        // text still shows up as the `message` field.
        let body: Value =
            serde_json::from_str(&text).unwrap_or_else(|_| json!({ "message": text }));

        (Some(status), classify_status(status, &body))
    }
}

/// Map a transport-level reqwest error onto the outcome taxonomy.
fn classify_send_error(err: &reqwest::Error) -> InviteOutcome {
    if err.is_timeout() {
        InviteOutcome::Timeout
    } else if err.is_connect() {
        InviteOutcome::ConnectionFailure
    } else {
        InviteOutcome::UnexpectedFailure {
            detail: err.to_string(),
        }
    }
}

/// Status-code dispatch. The code is authoritative; the body only
/// supplies detail text.
fn classify_status(status: u16, body: &Value) -> InviteOutcome {
    match status {
        200 => {
            if is_truthy(body.get("success")) {
                InviteOutcome::Success {
                    message: body_message(body).unwrap_or_else(|| {
                        "Check your inbox for the invitation email".to_string()
                    }),
                }
            } else {
                InviteOutcome::ClientError {
                    message: body_message(body).unwrap_or_else(|| "unknown error".to_string()),
                }
            }
        }
        400 => InviteOutcome::ClientError {
            message: body_message(body)
                .or_else(|| detail_message(body))
                .unwrap_or_else(|| "unknown error".to_string()),
        },
        404 => InviteOutcome::NotFound,
        500 => InviteOutcome::ServerError,
        other => InviteOutcome::UnknownStatus {
            status: other,
            message: body_message(body).unwrap_or_else(|| "no details".to_string()),
        },
    }
}

fn body_message(body: &Value) -> Option<String> {
    body.get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Nested fallback used by 400 responses: `detail.message`.
fn detail_message(body: &Value) -> Option<String> {
    body.get("detail")
        .and_then(|detail| detail.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Truthiness in the loose sense the backend relies on: absent, null,
/// false, zero, and empty containers all count as false.
fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
    }
}
