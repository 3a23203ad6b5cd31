use std::time::Duration;

use crate::{AuditSettings, BookmarkNode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Probe every leaf under `roots`, at most `limit` subtrees at a time.
    StartLivenessCheck {
        roots: Vec<BookmarkNode>,
        limit: usize,
        timeout: Duration,
    },
    /// Delete these ids from the authoritative bookmark store.
    RemoveBookmarks { ids: Vec<String> },
    /// Re-read the forest from the bookmark store.
    ReloadTree,
    SaveSettings(AuditSettings),
}
