use crate::tree::FolderEntry;
use crate::{ActionType, AuditSettings, BookmarkNode, DeleteFailure};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AuditViewModel {
    pub action: Option<ActionType>,
    pub busy: bool,
    /// 0..=100, only meaningful for the dead-link check.
    pub progress_percent: f64,
    pub processed: usize,
    pub total: usize,
    pub bookmark_count: usize,
    pub folders: Vec<FolderEntry>,
    pub selected_folders: Vec<String>,
    pub groups: Vec<ResultGroupView>,
    /// Set once a check has finished without findings.
    pub empty_message: Option<String>,
    pub errors: Vec<DeleteFailure>,
    pub settings: AuditSettings,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultGroupView {
    pub key: String,
    /// `URL: <key>` for duplicates, `Status: <key>` for dead links.
    pub label: String,
    pub nodes: Vec<BookmarkNode>,
}
