//! Result shapes for domain status checks.

use std::fmt;

/// Reported state of one domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DomainStatus {
    Ok,
    Blocked,
    /// The remote API answered with a status we do not recognize.
    Unknown,
}

impl DomainStatus {
    /// Map the remote `status` field (case-insensitive).
    pub fn from_remote(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "blocked" => DomainStatus::Blocked,
            "ok" | "allowed" | "accessible" | "unblocked" | "not blocked" => DomainStatus::Ok,
            _ => DomainStatus::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DomainStatus::Ok => "OK",
            DomainStatus::Blocked => "BLOCKED",
            DomainStatus::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for DomainStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Either a status or an error, never both.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Status {
        status: DomainStatus,
        ip: Option<String>,
    },
    Error(String),
}

/// Result of checking one domain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusResult {
    pub domain: String,
    pub outcome: Outcome,
}

impl StatusResult {
    pub fn status(domain: impl Into<String>, status: DomainStatus, ip: Option<String>) -> Self {
        Self {
            domain: domain.into(),
            outcome: Outcome::Status { status, ip },
        }
    }

    pub fn error(domain: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            outcome: Outcome::Error(message.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.outcome, Outcome::Error(_))
    }
}

/// Decoded answer from the remote status API.
///
/// Transport failures (timeouts, connection errors) are reported as `Err` by the
/// adapter instead; `Failure` means the API itself answered with an error body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApiReply {
    Success {
        status: String,
        ip: Option<String>,
    },
    Failure {
        message: String,
    },
}
