use std::fmt;

use bookmark_core::{AuditSettings, BookmarkNode, DeleteFailure, JobProgress, ResultIndex};

/// Bucket for probes that were sent but never answered.
pub const NO_RESPONSE_KEY: &str = "No Response";
/// Bucket for failures that fit no other class.
pub const UNKNOWN_KEY: &str = "Unknown";

/// Result of probing one bookmark URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// 2xx response.
    Success,
    /// Response with a status outside 200..300.
    HttpStatus(u16),
    /// Timed out or the connection failed before any response.
    NoResponse,
    /// The request could not be built or sent, e.g. a malformed URL.
    MalformedInput(String),
    Unknown(String),
}

impl ProbeOutcome {
    pub fn from_status(status: u16) -> Self {
        if (200..300).contains(&status) {
            Self::Success
        } else {
            Self::HttpStatus(status)
        }
    }

    /// Classification key in the result index; `None` for healthy links.
    pub fn bucket_key(&self) -> Option<String> {
        match self {
            Self::Success => None,
            Self::HttpStatus(code) => Some(code.to_string()),
            Self::NoResponse => Some(NO_RESPONSE_KEY.to_string()),
            Self::MalformedInput(message) => Some(message.clone()),
            Self::Unknown(_) => Some(UNKNOWN_KEY.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeOutcome::Success => write!(f, "ok"),
            ProbeOutcome::HttpStatus(code) => write!(f, "http status {code}"),
            ProbeOutcome::NoResponse => write!(f, "no response"),
            ProbeOutcome::MalformedInput(message) => write!(f, "malformed input: {message}"),
            ProbeOutcome::Unknown(message) => write!(f, "unknown failure: {message}"),
        }
    }
}

/// Events published by a running liveness job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckEvent {
    Progress(JobProgress),
    /// Snapshot of the index after a new leaf was classified.
    PartialResult(ResultIndex),
    /// Fired exactly once, after the pool drained.
    Finished(ResultIndex),
}

/// Everything the background engine reports back to its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    TreeLoaded(Vec<BookmarkNode>),
    SettingsLoaded(AuditSettings),
    SettingsSaved,
    Check(CheckEvent),
    /// A check was requested while another one was still draining.
    CheckRejected,
    BookmarksRemoved {
        removed: Vec<String>,
        failed: Vec<DeleteFailure>,
    },
    StoreFailed {
        operation: &'static str,
        message: String,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    #[error("failed to build http client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
