use crate::{AuditSettings, BookmarkNode, JobProgress, ResultIndex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Fresh forest from the bookmark store (initial load or reload).
    TreeLoaded(Vec<BookmarkNode>),
    /// Settings read from the settings store.
    SettingsLoaded(AuditSettings),
    /// User changed settings; they are normalised and persisted.
    SettingsEdited(AuditSettings),
    /// User scoped checks to these folders. Empty means everything.
    FoldersSelected(Vec<String>),
    /// User asked for a duplicate scan.
    CheckDuplicateClicked,
    /// User asked for a dead-link scan.
    CheckInvalidClicked,
    /// Liveness job progress.
    CheckProgress(JobProgress),
    /// Liveness job published a snapshot of its result index.
    CheckPartialResult(ResultIndex),
    /// Liveness job drained.
    CheckFinished(ResultIndex),
    /// User asked to delete these bookmarks.
    DeleteRequested(Vec<String>),
    /// Bookmark store finished deleting; only `removed` ids are gone.
    DeleteCompleted {
        removed: Vec<String>,
        failed: Vec<DeleteFailure>,
    },
    NoOp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteFailure {
    pub id: String,
    pub reason: String,
}
