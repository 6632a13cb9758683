// src/error.rs
use reqwest::StatusCode;
use thiserror::Error;

use crate::record::Record;

#[derive(Debug, Error)]
pub enum DnsError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("unsupported record type: {0}")]
    UnsupportedType(String),

    #[error("malformed record name: {0}")]
    MalformedName(String),

    #[error("ambiguous match: {count} records named '{name}' of type {rtype}")]
    AmbiguousMatch {
        name: String,
        rtype: String,
        count: usize,
    },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{} ({})", .0.canonical_reason().unwrap_or("Unknown Status"), .0.as_u16())]
    Status(StatusCode),

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl DnsError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        DnsError::InvalidArgument(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        DnsError::NotFound(msg.into())
    }

    pub fn unsupported_type(rtype: impl ToString) -> Self {
        DnsError::UnsupportedType(rtype.to_string())
    }

    pub fn malformed_name(name: impl Into<String>) -> Self {
        DnsError::MalformedName(name.into())
    }

    /// HTTP, network and response decoding failures.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            DnsError::Transport(_) | DnsError::Status(_) | DnsError::Decode(_)
        )
    }
}

/// Failure of a multi-record operation. Records in `applied` were already
/// written (or deleted) upstream before `source` occurred; nothing is rolled back.
#[derive(Debug, Error)]
#[error("{source} (after {} record(s) applied)", .applied.len())]
pub struct BatchError {
    pub applied: Vec<Record>,
    #[source]
    pub source: DnsError,
}

impl BatchError {
    pub fn new(applied: Vec<Record>, source: DnsError) -> Self {
        Self { applied, source }
    }
}

impl From<DnsError> for BatchError {
    fn from(source: DnsError) -> Self {
        Self::new(Vec::new(), source)
    }
}
