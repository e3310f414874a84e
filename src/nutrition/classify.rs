//! Maps upstream status codes and embedded error payloads to [`ErrorKind`].
//!
//! Body signals take precedence over the HTTP status: FatSecret reports most
//! failures as `{"error": {"code": 13, "message": "..."}}`, sometimes with a
//! 200 status, and the OAuth endpoint uses `{"error": "invalid_client"}`.

use std::ops::RangeInclusive;

use super::domain::{ClassifiedError, ErrorKind};

/// Embedded error information extracted from a response body
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BodySignal<'a> {
    pub code: Option<i64>,
    pub text: Option<&'a str>,
}

const CODE_TABLE: &[(RangeInclusive<i64>, ErrorKind)] = &[
    // OAuth parameter, signature and token errors
    (2..=9, ErrorKind::Auth),
    // Invalid method
    (10..=10, ErrorKind::Validation),
    // API temporarily unavailable
    (11..=11, ErrorKind::UpstreamUnavailable),
    // Invalid/expired token, missing scope
    (13..=14, ErrorKind::Auth),
    // IP address not whitelisted
    (21..=21, ErrorKind::Auth),
    // Request quota exceeded
    (22..=22, ErrorKind::UpstreamUnavailable),
    // Missing parameter
    (101..=101, ErrorKind::Validation),
    // Invalid id, value out of range, invalid date
    (106..=108, ErrorKind::Validation),
];

const TEXT_TABLE: &[(&str, ErrorKind)] = &[
    ("invalid token", ErrorKind::Auth),
    ("invalid_token", ErrorKind::Auth),
    ("invalid_client", ErrorKind::Auth),
    ("invalid_grant", ErrorKind::Auth),
    ("unauthorized_client", ErrorKind::Auth),
    ("invalid_scope", ErrorKind::Auth),
    ("missing scope", ErrorKind::Auth),
    ("api_key_invalid", ErrorKind::Auth),
    ("missing required parameter", ErrorKind::Validation),
    ("missing parameter", ErrorKind::Validation),
    ("invalid_request", ErrorKind::Validation),
    ("out of range", ErrorKind::Validation),
    ("not found", ErrorKind::NotFound),
];

/// Classify an upstream failure
pub fn classify(http_status: u16, signal: BodySignal<'_>) -> ErrorKind {
    if let Some(kind) = signal.code.and_then(kind_for_code) {
        return kind;
    }
    if let Some(kind) = signal.text.and_then(kind_for_text) {
        return kind;
    }
    kind_for_status(http_status)
}

fn kind_for_code(code: i64) -> Option<ErrorKind> {
    CODE_TABLE
        .iter()
        .find(|(codes, _)| codes.contains(&code))
        .map(|(_, kind)| *kind)
}

fn kind_for_text(text: &str) -> Option<ErrorKind> {
    let text = text.to_lowercase();
    TEXT_TABLE
        .iter()
        .find(|(needle, _)| text.contains(needle))
        .map(|(_, kind)| *kind)
}

fn kind_for_status(status: u16) -> ErrorKind {
    match status {
        401 | 403 => ErrorKind::Auth,
        404 => ErrorKind::NotFound,
        429 | 500..=599 => ErrorKind::UpstreamUnavailable,
        400 => ErrorKind::Validation,
        _ => ErrorKind::Unknown,
    }
}

/// Build a [`ClassifiedError`] from a failed (or error-carrying) response
pub fn classify_response(provider: &str, http_status: u16, body: &str) -> ClassifiedError {
    let payload: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let (code, text) = payload
        .as_ref()
        .map(extract_signal)
        .unwrap_or((None, None));

    let kind = classify(
        http_status,
        BodySignal {
            code,
            text: text.as_deref().or(Some(body)),
        },
    );

    let message = match (code, text.as_deref()) {
        (Some(code), Some(text)) => format!("{provider} error {code}: {text}"),
        (None, Some(text)) => format!("{provider} error: {text}"),
        (Some(code), None) => format!("{provider} error {code}"),
        (None, None) => format!("{provider} returned HTTP {http_status}"),
    };

    let mut error = ClassifiedError::new(kind, message).with_detail(format!(
        "HTTP {http_status}: {}",
        truncate(body, 200)
    ));
    if let Some(code) = code.and_then(|c| u32::try_from(c).ok()) {
        error = error.with_code(code);
    }
    error
}

/// Pull `(code, text)` out of the error shapes our providers use
fn extract_signal(payload: &serde_json::Value) -> (Option<i64>, Option<String>) {
    match payload.get("error") {
        // FatSecret: {"error": {"code": 13, "message": "..."}}
        Some(serde_json::Value::Object(error)) => {
            let code = error.get("code").and_then(json_code);
            let text = error
                .get("message")
                .and_then(|m| m.as_str())
                .map(String::from);
            (code, text)
        }
        // OAuth2: {"error": "invalid_client", "error_description": "..."}
        Some(serde_json::Value::String(error)) => {
            let text = match payload.get("error_description").and_then(|d| d.as_str()) {
                Some(description) => format!("{error}: {description}"),
                None => error.clone(),
            };
            (None, Some(text))
        }
        _ => {
            // Open Food Facts: {"status": 0, "status_verbose": "product not found"}
            let text = payload
                .get("status_verbose")
                .or_else(|| payload.get("message"))
                .and_then(|m| m.as_str())
                .map(String::from);
            (None, text)
        }
    }
}

/// FatSecret sends codes as numbers or numeric strings
fn json_code(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
