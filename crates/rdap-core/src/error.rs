use itertools::Itertools;
use reqwest::StatusCode;
use serde::Deserialize;
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// An RDAP error result.
pub type Result<T> = std::result::Result<T, Error>;

/// An RDAP error.
#[derive(Error, Debug)]
pub enum Error {
    #[error("unsupported bootstrap registry version: {found} (expecting {expected})")]
    UnsupportedVersion { found: String, expected: String },
    #[error("invalid bootstrap registry: {0}")]
    RegistryDecode(#[from] serde_json::Error),
    #[error("unexpected bootstrap status code {}", format_status(.0))]
    BootstrapStatus(StatusCode),
    #[error("invalid AS range: {0}")]
    InvalidAsRange(String),
    #[error("invalid CIDR: {0}")]
    InvalidCidr(String),
    #[error("invalid query: {0}")]
    InvalidQuery(String),
    #[error("no matches for {0}")]
    NoMatch(String),
    #[error("no URIs defined to query")]
    NoEndpoints,
    #[error("invalid URI {0}")]
    InvalidUri(String),
    #[error("invalid config: {0}")]
    BadConfig(String),
    #[error("transport error: {0}")]
    Transport(Box<dyn std::error::Error + Send + Sync + 'static>),
    #[error("unexpected response: {} content type {content_type:?}", format_status(.status))]
    UnexpectedResponse {
        status: StatusCode,
        content_type: String,
    },
    #[error("invalid error response body: {0}")]
    ErrorBody(serde_json::Error),
    #[error("invalid response body: {0}")]
    ResponseBody(serde_json::Error),
    #[error("{0}")]
    Server(RdapError),
    #[error("not found at {endpoint}")]
    NotFound { endpoint: String },
    #[error("forbidden at {endpoint}")]
    Forbidden { endpoint: String },
    #[error("all endpoints failed for {key}: {}", format_attempts(.errors))]
    Exhausted {
        key: String,
        errors: Vec<(String, Error)>,
    },
    #[error("deadline exceeded")]
    DeadlineExceeded,
}

impl Error {
    /// Is this an outcome reported by a reachable server which should not cause fail-over?
    #[must_use]
    pub const fn is_definitive(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::Forbidden { .. } | Self::DeadlineExceeded
        )
    }

    /// Did an authoritative server report that the object does not exist?
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

fn format_status(status: &StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {reason}", status.as_u16()),
        None => status.as_u16().to_string(),
    }
}

fn format_attempts(errors: &[(String, Error)]) -> String {
    errors
        .iter()
        .map(|(endpoint, err)| format!("{endpoint}: {err}"))
        .join("; ")
}

/// An RDAP error response body.
///
/// See [RFC 9083 section 6](https://www.rfc-editor.org/rfc/rfc9083#section-6).
#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RdapError {
    #[serde(default)]
    pub error_code: u16,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Vec<String>,
}

impl Display for RdapError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "HTTP status code: {}", self.error_code)?;
        if let Some(reason) = StatusCode::from_u16(self.error_code)
            .ok()
            .and_then(|status| status.canonical_reason())
        {
            write!(f, " ({reason})")?;
        }
        write!(f, " {}: {}", self.title, self.description.join(", "))
    }
}
