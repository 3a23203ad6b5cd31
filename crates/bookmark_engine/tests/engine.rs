use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bookmark_core::{AuditSettings, BookmarkNode};
use bookmark_engine::{
    BookmarkStore, CheckEvent, EngineConfig, EngineEvent, EngineHandle, ProbeOutcome, Prober,
    SettingsError, SettingsStore, StoreError,
};
use pretty_assertions::assert_eq;

struct MemoryStore {
    tree: Mutex<Vec<BookmarkNode>>,
}

#[async_trait]
impl BookmarkStore for MemoryStore {
    async fn get_tree(&self) -> Result<Vec<BookmarkNode>, StoreError> {
        Ok(self.tree.lock().unwrap().clone())
    }

    async fn remove(&self, id: &str) -> Result<(), StoreError> {
        let mut tree = self.tree.lock().unwrap();
        let before = bookmark_core::count_leaves(&tree);
        *tree = bookmark_core::remove_by_ids(&tree, &[id]);
        if bookmark_core::count_leaves(&tree) == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

#[derive(Default)]
struct MemorySettings {
    saved: Mutex<Option<AuditSettings>>,
}

#[async_trait]
impl SettingsStore for MemorySettings {
    async fn load(&self) -> Result<AuditSettings, SettingsError> {
        Ok(self.saved.lock().unwrap().unwrap_or_default())
    }

    async fn save(&self, settings: &AuditSettings) -> Result<(), SettingsError> {
        *self.saved.lock().unwrap() = Some(*settings);
        Ok(())
    }
}

struct SlowProber;

#[async_trait]
impl Prober for SlowProber {
    async fn probe(&self, url: &str, _timeout: Duration) -> ProbeOutcome {
        tokio::time::sleep(Duration::from_millis(100)).await;
        if url.contains("dead") {
            ProbeOutcome::HttpStatus(410)
        } else {
            ProbeOutcome::Success
        }
    }
}

fn forest() -> Vec<BookmarkNode> {
    vec![BookmarkNode::folder(
        "1",
        "Bar",
        vec![
            BookmarkNode::leaf("10", "alive", "http://alive.test/"),
            BookmarkNode::leaf("11", "dead", "http://dead.test/"),
        ],
    )]
}

fn engine() -> (EngineHandle, Arc<MemorySettings>) {
    let settings = Arc::new(MemorySettings::default());
    let config = EngineConfig {
        bookmarks: Arc::new(MemoryStore {
            tree: Mutex::new(forest()),
        }),
        settings: settings.clone(),
        prober: Arc::new(SlowProber),
    };
    (EngineHandle::new(config).unwrap(), settings)
}

fn next(engine: &EngineHandle) -> EngineEvent {
    engine.recv().expect("engine alive")
}

#[test]
fn loads_tree_and_round_trips_settings() {
    let (engine, stored) = engine();

    engine.load_tree();
    assert_eq!(next(&engine), EngineEvent::TreeLoaded(forest()));

    let wanted = AuditSettings {
        use_domain_for_duplication_check: true,
        ..AuditSettings::default()
    };
    engine.save_settings(wanted);
    assert_eq!(next(&engine), EngineEvent::SettingsSaved);
    assert_eq!(*stored.saved.lock().unwrap(), Some(wanted));

    engine.load_settings();
    assert_eq!(next(&engine), EngineEvent::SettingsLoaded(wanted));
}

#[test]
fn second_check_is_rejected_while_first_runs() {
    let (engine, _) = engine();

    engine.start_check(forest(), 1, Duration::from_secs(1));
    engine.start_check(forest(), 1, Duration::from_secs(1));

    let mut rejected = 0;
    let finished = loop {
        match next(&engine) {
            EngineEvent::CheckRejected => rejected += 1,
            EngineEvent::Check(CheckEvent::Finished(index)) => break index,
            _ => {}
        }
    };
    assert_eq!(rejected, 1);
    assert_eq!(finished.get("410").unwrap()[0].id, "11");

    // The slot is free again once the job has finished.
    engine.start_check(Vec::new(), 1, Duration::from_secs(1));
    loop {
        match next(&engine) {
            EngineEvent::CheckRejected => panic!("check should have been accepted"),
            EngineEvent::Check(CheckEvent::Finished(_)) => break,
            _ => {}
        }
    }
}

#[test]
fn removal_reports_each_id() {
    let (engine, _) = engine();

    engine.remove(vec!["11".to_string(), "missing".to_string()]);

    match next(&engine) {
        EngineEvent::BookmarksRemoved { removed, failed } => {
            assert_eq!(removed, vec!["11".to_string()]);
            assert_eq!(failed.len(), 1);
            assert_eq!(failed[0].id, "missing");
        }
        other => panic!("unexpected event {other:?}"),
    }
}
