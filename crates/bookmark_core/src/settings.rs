use std::time::Duration;

use crate::DuplicateKeyMode;

pub const DEFAULT_MAX_REQUESTS: u32 = 5;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u32 = 15;
pub const MAX_REQUESTS_RANGE: (u32, u32) = (1, 10);
pub const REQUEST_TIMEOUT_RANGE_SECS: (u32, u32) = (1, 30);

/// User-tunable audit settings, persisted as a key/value blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditSettings {
    pub use_domain_for_duplication_check: bool,
    /// Number of subtrees probed concurrently.
    pub max_requests: u32,
    pub request_timeout_secs: u32,
}

impl Default for AuditSettings {
    fn default() -> Self {
        Self {
            use_domain_for_duplication_check: false,
            max_requests: DEFAULT_MAX_REQUESTS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl AuditSettings {
    /// Zero values fall back to defaults, everything else is clamped into the
    /// supported ranges.
    pub fn normalized(self) -> Self {
        let max_requests = match self.max_requests {
            0 => DEFAULT_MAX_REQUESTS,
            n => n.clamp(MAX_REQUESTS_RANGE.0, MAX_REQUESTS_RANGE.1),
        };
        let request_timeout_secs = match self.request_timeout_secs {
            0 => DEFAULT_REQUEST_TIMEOUT_SECS,
            n => n.clamp(REQUEST_TIMEOUT_RANGE_SECS.0, REQUEST_TIMEOUT_RANGE_SECS.1),
        };
        Self {
            use_domain_for_duplication_check: self.use_domain_for_duplication_check,
            max_requests,
            request_timeout_secs,
        }
    }

    pub fn duplicate_key_mode(&self) -> DuplicateKeyMode {
        DuplicateKeyMode::from_use_domain(self.use_domain_for_duplication_check)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.request_timeout_secs))
    }

    pub fn concurrency_limit(&self) -> usize {
        self.max_requests.max(1) as usize
    }
}
