use serde::Deserialize;
use thiserror::Error;

/// WeatherAPI.com reports "No matching location found." with this code.
pub const NO_MATCHING_LOCATION: i64 = 1006;

/// Why a lookup failed. `Display` is the message shown to the user.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{message}")]
    NotFound { message: String },

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Unexpected response from weather API: {message}")]
    Decode { message: String },
}

impl FetchError {
    /// Build an error from a non-2xx response, preferring the upstream error payload.
    pub fn from_response(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) if envelope.error.code == NO_MATCHING_LOCATION => FetchError::NotFound {
                message: envelope.error.message,
            },
            Ok(envelope) => FetchError::Api { status, message: envelope.error.message },
            Err(_) => FetchError::Api {
                status,
                message: format!(
                    "Request failed with status code {status}: {}",
                    truncate_body(body)
                ),
            },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound { .. })
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorPayload,
}

#[derive(Debug, Deserialize)]
struct ErrorPayload {
    code: i64,
    message: String,
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_city_payload_is_not_found() {
        let body = r#"{"error":{"code":1006,"message":"No matching location found."}}"#;
        let err = FetchError::from_response(400, body);

        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "No matching location found.");
    }

    #[test]
    fn other_payloads_keep_upstream_message() {
        let body = r#"{"error":{"code":2006,"message":"API key is invalid."}}"#;
        let err = FetchError::from_response(401, body);

        assert!(matches!(err, FetchError::Api { status: 401, .. }));
        assert_eq!(err.to_string(), "API key is invalid.");
    }

    #[test]
    fn non_json_body_falls_back_to_status_message() {
        let err = FetchError::from_response(502, "<html>Bad Gateway</html>");

        assert_eq!(
            err.to_string(),
            "Request failed with status code 502: <html>Bad Gateway</html>"
        );
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let body = "é".repeat(150);
        let out = truncate_body(&body);

        assert!(out.ends_with("..."));
        assert!(out.len() <= 203);
    }
}
