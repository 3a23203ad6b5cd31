use std::sync::Once;
use std::time::Duration;

use bookmark_core::{
    update, ActionType, AuditSettings, AuditState, BookmarkNode, DeleteFailure, Effect,
    JobProgress, Msg, ResultIndex,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(audit_logging::initialize_for_tests);
}

fn forest() -> Vec<BookmarkNode> {
    vec![
        BookmarkNode::folder(
            "1",
            "Bar",
            vec![
                BookmarkNode::leaf("a", "A", "http://x.com/1"),
                BookmarkNode::leaf("b", "B", "http://x.com/1"),
                BookmarkNode::leaf("c", "C", "http://x.com/2"),
            ],
        ),
        BookmarkNode::folder(
            "2",
            "Other",
            vec![BookmarkNode::leaf("d", "D", "http://y.com/")],
        ),
    ]
}

fn loaded() -> AuditState {
    let (state, _) = update(AuditState::new(), Msg::TreeLoaded(forest()));
    state
}

fn start_invalid(state: AuditState) -> (AuditState, Vec<Effect>) {
    update(state, Msg::CheckInvalidClicked)
}

#[test]
fn duplicate_check_runs_inline_and_labels_groups() {
    init_logging();
    let (mut state, effects) = update(loaded(), Msg::CheckDuplicateClicked);

    assert!(effects.is_empty());
    assert!(state.consume_dirty());
    let view = state.view();
    assert_eq!(view.action, Some(ActionType::CheckDuplicate));
    assert!(!view.busy);
    assert_eq!(view.groups.len(), 1);
    assert_eq!(view.groups[0].label, "URL: http://x.com/1");
    assert_eq!(view.empty_message, None);
}

#[test]
fn domain_setting_changes_duplicate_keys() {
    init_logging();
    let settings = AuditSettings {
        use_domain_for_duplication_check: true,
        ..AuditSettings::default()
    };
    let (state, _) = update(loaded(), Msg::SettingsLoaded(settings));
    let (state, _) = update(state, Msg::CheckDuplicateClicked);

    let keys: Vec<_> = state.results().keys().map(str::to_string).collect();
    assert_eq!(keys, vec!["x.com".to_string()]);
    assert_eq!(state.results().get("x.com").unwrap().len(), 3);
}

#[test]
fn checks_are_ignored_without_bookmarks() {
    init_logging();
    let (state, effects) = update(AuditState::new(), Msg::CheckInvalidClicked);
    assert!(effects.is_empty());
    assert_eq!(state.action(), None);

    let (state, effects) = update(state, Msg::CheckDuplicateClicked);
    assert!(effects.is_empty());
    assert_eq!(state.action(), None);
}

#[test]
fn invalid_check_emits_job_with_settings() {
    init_logging();
    let settings = AuditSettings {
        use_domain_for_duplication_check: false,
        max_requests: 3,
        request_timeout_secs: 7,
    };
    let (state, _) = update(loaded(), Msg::SettingsLoaded(settings));
    let (state, effects) = start_invalid(state);

    assert!(state.is_busy());
    assert_eq!(
        effects,
        vec![Effect::StartLivenessCheck {
            roots: forest(),
            limit: 3,
            timeout: Duration::from_secs(7),
        }]
    );
    assert_eq!(state.view().total, 4);
}

#[test]
fn selected_folders_scope_the_check() {
    init_logging();
    let (state, _) = update(loaded(), Msg::FoldersSelected(vec!["2".to_string()]));
    let (_, effects) = start_invalid(state);

    match effects.as_slice() {
        [Effect::StartLivenessCheck { roots, .. }] => {
            assert_eq!(roots.len(), 1);
            assert_eq!(roots[0].id, "2");
        }
        other => panic!("unexpected effects {other:?}"),
    }
}

#[test]
fn busy_state_blocks_new_checks() {
    init_logging();
    let (state, _) = start_invalid(loaded());

    let (state, effects) = start_invalid(state);
    assert!(effects.is_empty());
    let (state, effects) = update(state, Msg::CheckDuplicateClicked);
    assert!(effects.is_empty());
    assert_eq!(state.action(), Some(ActionType::CheckInvalid));
    assert!(state.is_busy());
}

#[test]
fn progress_partials_and_finish_flow_into_the_view() {
    init_logging();
    let (state, _) = start_invalid(loaded());

    let (state, _) = update(
        state,
        Msg::CheckProgress(JobProgress {
            processed: 2,
            total: 4,
        }),
    );
    assert_eq!(state.view().progress_percent, 50.0);

    // A stale progress report never moves the bar backwards.
    let (state, _) = update(
        state,
        Msg::CheckProgress(JobProgress {
            processed: 1,
            total: 4,
        }),
    );
    assert_eq!(state.view().processed, 2);

    let mut partial = ResultIndex::new();
    partial.push("404", BookmarkNode::leaf("c", "C", "http://x.com/2"));
    let (state, _) = update(state, Msg::CheckPartialResult(partial.clone()));
    assert_eq!(state.view().groups[0].label, "Status: 404");
    assert!(state.view().empty_message.is_none());

    let (state, effects) = update(state, Msg::CheckFinished(partial));
    assert!(effects.is_empty());
    let view = state.view();
    assert!(!view.busy);
    assert_eq!(view.progress_percent, 100.0);
    assert_eq!(view.groups.len(), 1);
}

#[test]
fn clean_finish_reports_empty_message() {
    init_logging();
    let (state, _) = start_invalid(loaded());
    let (state, _) = update(state, Msg::CheckFinished(ResultIndex::new()));
    assert_eq!(
        state.view().empty_message.as_deref(),
        Some("No invalid bookmarks found")
    );
}

#[test]
fn late_job_messages_are_ignored_after_switching_action() {
    init_logging();
    let (state, _) = update(loaded(), Msg::CheckDuplicateClicked);
    let before = state.results().clone();

    let mut stray = ResultIndex::new();
    stray.push("500", BookmarkNode::leaf("a", "A", "http://x.com/1"));
    let (state, _) = update(state, Msg::CheckPartialResult(stray.clone()));
    let (state, _) = update(state, Msg::CheckFinished(stray));

    assert_eq!(state.results(), &before);
}

#[test]
fn delete_goes_to_the_store_first() {
    init_logging();
    let (state, _) = update(loaded(), Msg::CheckDuplicateClicked);
    let (state, effects) = update(state, Msg::DeleteRequested(vec!["a".to_string()]));

    assert_eq!(
        effects,
        vec![Effect::RemoveBookmarks {
            ids: vec!["a".to_string()]
        }]
    );
    // Nothing disappears until the store confirms.
    assert_eq!(state.results().node_count(), 2);

    let (_, effects) = update(state, Msg::DeleteRequested(Vec::new()));
    assert!(effects.is_empty());
}

#[test]
fn failed_deletes_stay_visible() {
    init_logging();
    let (state, _) = update(loaded(), Msg::CheckDuplicateClicked);
    let (state, effects) = update(
        state,
        Msg::DeleteCompleted {
            removed: vec!["a".to_string()],
            failed: vec![DeleteFailure {
                id: "b".to_string(),
                reason: "permission denied".to_string(),
            }],
        },
    );

    assert_eq!(effects, vec![Effect::ReloadTree]);
    // "a" removed, so the pair collapses; "b" failed but is still in the tree.
    assert!(state.results().is_empty());
    let view = state.view();
    assert_eq!(view.bookmark_count, 3);
    assert_eq!(view.errors.len(), 1);
    assert_eq!(view.errors[0].id, "b");
}

#[test]
fn settings_edits_are_normalised_and_saved() {
    init_logging();
    let (state, effects) = update(
        AuditState::new(),
        Msg::SettingsEdited(AuditSettings {
            use_domain_for_duplication_check: true,
            max_requests: 99,
            request_timeout_secs: 0,
        }),
    );

    let saved = AuditSettings {
        use_domain_for_duplication_check: true,
        max_requests: 10,
        request_timeout_secs: 15,
    };
    assert_eq!(effects, vec![Effect::SaveSettings(saved)]);
    assert_eq!(state.settings(), saved);
}
