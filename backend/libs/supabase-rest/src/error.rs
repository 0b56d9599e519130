//! Error types for the hosted backend client

use serde::Deserialize;
use thiserror::Error;

/// Result type alias for hosted backend calls
pub type Result<T> = std::result::Result<T, SupabaseError>;

#[derive(Error, Debug)]
pub enum SupabaseError {
    /// The request never produced a response (connect, TLS, timeout)
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// The response body did not match the expected shape
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// `Prefer: count=exact` was sent but no usable `Content-Range` came back
    #[error("Missing count in response")]
    MissingCount,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SupabaseError {
    /// HTTP status of an API rejection, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            SupabaseError::Api { status, .. } => Some(*status),
            SupabaseError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True when a single-row select matched nothing
    pub fn is_not_found(&self) -> bool {
        matches!(self, SupabaseError::Api { status: 404 | 406, .. })
    }

    /// Build an API error from a raw response body.
    ///
    /// PostgREST reports `{message, code, details, hint}`; GoTrue reports
    /// `{msg}` or `{error, error_description}`. Anything else is kept verbatim.
    pub(crate) fn from_body(status: u16, body: &str) -> Self {
        let parsed = serde_json::from_str::<ErrorBody>(body).ok();
        let code = parsed.as_ref().and_then(|b| b.code.clone());
        let message = parsed
            .and_then(|b| b.message.or(b.msg).or(b.error_description).or(b.error))
            .unwrap_or_else(|| {
                if body.is_empty() {
                    "Unknown error".to_string()
                } else {
                    body.to_string()
                }
            });

        SupabaseError::Api {
            status,
            code,
            message,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    msg: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
    #[serde(default, deserialize_with = "code_as_string")]
    code: Option<String>,
}

// PostgREST sends string codes, GoTrue sends numeric ones.
fn code_as_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postgrest_error_body() {
        let err = SupabaseError::from_body(
            409,
            r#"{"code":"23505","details":null,"hint":null,"message":"duplicate key value"}"#,
        );
        match err {
            SupabaseError::Api {
                status,
                code,
                message,
            } => {
                assert_eq!(status, 409);
                assert_eq!(code.as_deref(), Some("23505"));
                assert_eq!(message, "duplicate key value");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_gotrue_error_body() {
        let err = SupabaseError::from_body(
            400,
            r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#,
        );
        assert_eq!(
            err.to_string(),
            "API error (400): Invalid login credentials"
        );

        let err = SupabaseError::from_body(422, r#"{"code":422,"msg":"Password too short"}"#);
        assert_eq!(err.to_string(), "API error (422): Password too short");
    }

    #[test]
    fn test_non_json_body_kept() {
        let err = SupabaseError::from_body(502, "bad gateway");
        assert_eq!(err.to_string(), "API error (502): bad gateway");
        assert_eq!(err.status(), Some(502));
        assert!(!err.is_not_found());
        assert!(SupabaseError::from_body(406, "").is_not_found());
    }
}
