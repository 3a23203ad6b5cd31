use audit_logging::{audit_debug, audit_info, audit_warn};

use crate::{count_leaves, find_duplicates, ActionType, AuditState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AuditState, msg: Msg) -> (AuditState, Vec<Effect>) {
    let effects = match msg {
        Msg::TreeLoaded(bookmarks) => {
            state.set_bookmarks(bookmarks);
            Vec::new()
        }
        Msg::SettingsLoaded(settings) => {
            state.set_settings(settings);
            Vec::new()
        }
        Msg::SettingsEdited(settings) => {
            state.set_settings(settings);
            vec![Effect::SaveSettings(state.settings())]
        }
        Msg::FoldersSelected(ids) => {
            state.set_selected_folders(ids);
            Vec::new()
        }
        Msg::CheckDuplicateClicked => {
            if state.is_busy() || state.bookmarks().is_empty() {
                return (state, Vec::new());
            }
            state.change_action(ActionType::CheckDuplicate);
            let mode = state.settings().duplicate_key_mode();
            let duplicates = find_duplicates(&state.check_roots(), mode);
            audit_info!("Duplicate check found {} groups", duplicates.len());
            state.set_results(duplicates);
            Vec::new()
        }
        Msg::CheckInvalidClicked => {
            if state.is_busy() || state.bookmarks().is_empty() {
                return (state, Vec::new());
            }
            state.change_action(ActionType::CheckInvalid);
            let roots = state.check_roots();
            let settings = state.settings();
            state.begin_liveness(count_leaves(&roots));
            vec![Effect::StartLivenessCheck {
                roots,
                limit: settings.concurrency_limit(),
                timeout: settings.request_timeout(),
            }]
        }
        Msg::CheckProgress(progress) => {
            if state.liveness_running() {
                state.apply_progress(progress);
            }
            Vec::new()
        }
        Msg::CheckPartialResult(results) => {
            if state.liveness_running() {
                state.set_results(results);
            }
            Vec::new()
        }
        Msg::CheckFinished(results) => {
            if state.liveness_running() {
                audit_info!("Dead-link check finished with {} buckets", results.len());
                state.finish_liveness(results);
            } else {
                audit_debug!("Ignoring completion of a check that is no longer current");
            }
            Vec::new()
        }
        Msg::DeleteRequested(ids) => {
            if ids.is_empty() {
                Vec::new()
            } else {
                vec![Effect::RemoveBookmarks { ids }]
            }
        }
        Msg::DeleteCompleted { removed, failed } => {
            for failure in &failed {
                audit_warn!("Bookmark {} was not deleted: {}", failure.id, failure.reason);
            }
            state.apply_deletion(&removed);
            state.record_errors(failed);
            vec![Effect::ReloadTree]
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
