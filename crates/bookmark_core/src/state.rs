use crate::tree::{collect_folders, select_roots};
use crate::view_model::{AuditViewModel, ResultGroupView};
use crate::{AuditSettings, BookmarkNode, DeleteFailure, ResultIndex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionType {
    CheckDuplicate,
    CheckInvalid,
}

/// Progress of a running liveness job, shared by the engine and the state
/// machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JobProgress {
    pub processed: usize,
    pub total: usize,
}

impl JobProgress {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            self.processed as f64 / self.total as f64 * 100.0
        }
    }
}

/// Everything the audit front end needs between messages.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuditState {
    bookmarks: Vec<BookmarkNode>,
    selected_folders: Vec<String>,
    settings: AuditSettings,
    action: Option<ActionType>,
    busy: bool,
    progress: JobProgress,
    results: ResultIndex,
    errors: Vec<DeleteFailure>,
    dirty: bool,
}

impl AuditState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AuditViewModel {
        let label_prefix = match self.action {
            Some(ActionType::CheckDuplicate) => "URL",
            Some(ActionType::CheckInvalid) | None => "Status",
        };
        let groups = self
            .results
            .groups()
            .iter()
            .map(|group| ResultGroupView {
                key: group.key.clone(),
                label: format!("{label_prefix}: {}", group.key),
                nodes: group.nodes.clone(),
            })
            .collect();
        let empty_message = match self.action {
            Some(_) if self.busy || !self.results.is_empty() => None,
            Some(ActionType::CheckDuplicate) => Some("No duplicate bookmarks found".to_string()),
            Some(ActionType::CheckInvalid) => Some("No invalid bookmarks found".to_string()),
            None => None,
        };

        AuditViewModel {
            action: self.action,
            busy: self.busy,
            progress_percent: if self.action == Some(ActionType::CheckInvalid) {
                self.progress.percent()
            } else {
                0.0
            },
            processed: self.progress.processed,
            total: self.progress.total,
            bookmark_count: crate::count_leaves(&self.bookmarks),
            folders: collect_folders(&self.bookmarks),
            selected_folders: self.selected_folders.clone(),
            groups,
            empty_message,
            errors: self.errors.clone(),
            settings: self.settings,
            dirty: self.dirty,
        }
    }

    pub fn bookmarks(&self) -> &[BookmarkNode] {
        &self.bookmarks
    }

    pub fn results(&self) -> &ResultIndex {
        &self.results
    }

    pub fn settings(&self) -> AuditSettings {
        self.settings
    }

    pub fn action(&self) -> Option<ActionType> {
        self.action
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Returns whether anything changed since the last call and clears the
    /// flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_bookmarks(&mut self, bookmarks: Vec<BookmarkNode>) {
        self.bookmarks = bookmarks;
        self.mark_dirty();
    }

    pub(crate) fn set_settings(&mut self, settings: AuditSettings) {
        self.settings = settings.normalized();
        self.mark_dirty();
    }

    pub(crate) fn set_selected_folders(&mut self, ids: Vec<String>) {
        self.selected_folders = ids;
        self.mark_dirty();
    }

    /// Roots for the next check: the selected folders, or the whole forest.
    pub(crate) fn check_roots(&self) -> Vec<BookmarkNode> {
        select_roots(&self.bookmarks, &self.selected_folders)
    }

    /// Switches to `action`, discarding previous results and progress.
    pub(crate) fn change_action(&mut self, action: ActionType) {
        self.action = Some(action);
        self.results = ResultIndex::new();
        self.progress = JobProgress::default();
        self.errors.clear();
        self.mark_dirty();
    }

    pub(crate) fn begin_liveness(&mut self, total: usize) {
        self.busy = true;
        self.progress = JobProgress {
            processed: 0,
            total,
        };
        self.mark_dirty();
    }

    pub(crate) fn liveness_running(&self) -> bool {
        self.busy && self.action == Some(ActionType::CheckInvalid)
    }

    pub(crate) fn apply_progress(&mut self, progress: JobProgress) {
        // Progress never moves backwards within one job.
        if progress.processed >= self.progress.processed {
            self.progress = progress;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_results(&mut self, results: ResultIndex) {
        self.results = results;
        self.mark_dirty();
    }

    pub(crate) fn finish_liveness(&mut self, results: ResultIndex) {
        self.results = results;
        self.busy = false;
        self.progress.processed = self.progress.total;
        self.mark_dirty();
    }

    pub(crate) fn apply_deletion(&mut self, removed: &[String]) {
        if removed.is_empty() {
            return;
        }
        let (bookmarks, results) =
            crate::reconcile::apply_deletion(&self.bookmarks, &self.results, removed);
        self.bookmarks = bookmarks;
        self.results = results;
        self.selected_folders.retain(|id| !removed.contains(id));
        self.mark_dirty();
    }

    pub(crate) fn record_errors(&mut self, failed: Vec<DeleteFailure>) {
        if failed.is_empty() {
            return;
        }
        self.errors.extend(failed);
        self.mark_dirty();
    }
}
