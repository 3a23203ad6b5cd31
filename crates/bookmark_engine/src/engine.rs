use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use audit_logging::{audit_error, audit_warn};
use bookmark_core::{AuditSettings, BookmarkNode, DeleteFailure};

use crate::liveness::{check_liveness, ChannelCheckSink};
use crate::{
    BookmarkStore, EngineError, EngineEvent, JsonBookmarkStore, JsonSettingsStore, ProbeSettings,
    Prober, ReqwestProber, SettingsStore,
};

/// The collaborators the engine drives.
#[derive(Clone)]
pub struct EngineConfig {
    pub bookmarks: Arc<dyn BookmarkStore>,
    pub settings: Arc<dyn SettingsStore>,
    pub prober: Arc<dyn Prober>,
}

impl EngineConfig {
    /// File-backed stores and a real HTTP prober.
    pub fn with_files(
        bookmarks_path: impl Into<PathBuf>,
        settings_path: impl Into<PathBuf>,
        probe: ProbeSettings,
    ) -> Result<Self, EngineError> {
        Ok(Self {
            bookmarks: Arc::new(JsonBookmarkStore::new(bookmarks_path)),
            settings: Arc::new(JsonSettingsStore::new(settings_path)),
            prober: Arc::new(ReqwestProber::new(probe)?),
        })
    }
}

enum EngineCommand {
    LoadTree,
    LoadSettings,
    SaveSettings(AuditSettings),
    StartCheck {
        roots: Vec<BookmarkNode>,
        limit: usize,
        timeout: Duration,
    },
    Remove {
        ids: Vec<String>,
    },
}

/// Runs store and network work on a background tokio runtime and reports
/// back through [`EngineEvent`]s.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("bookmark-engine")
            .build()
            .map_err(EngineError::Runtime)?;
        let check_running = Arc::new(AtomicBool::new(false));

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                if let EngineCommand::StartCheck { .. } = &command {
                    // Claimed here, on the command thread, so a second
                    // request is refused even before the first job starts.
                    if check_running.swap(true, Ordering::SeqCst) {
                        audit_warn!("Rejecting liveness check: another one is still running");
                        let _ = event_tx.send(EngineEvent::CheckRejected);
                        continue;
                    }
                }
                let config = config.clone();
                let event_tx = event_tx.clone();
                let check_running = check_running.clone();
                runtime.spawn(async move {
                    handle_command(&config, command, event_tx, &check_running).await;
                });
            }
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn load_tree(&self) {
        self.send(EngineCommand::LoadTree);
    }

    pub fn load_settings(&self) {
        self.send(EngineCommand::LoadSettings);
    }

    pub fn save_settings(&self, settings: AuditSettings) {
        self.send(EngineCommand::SaveSettings(settings));
    }

    pub fn start_check(&self, roots: Vec<BookmarkNode>, limit: usize, timeout: Duration) {
        self.send(EngineCommand::StartCheck {
            roots,
            limit,
            timeout,
        });
    }

    pub fn remove(&self, ids: Vec<String>) {
        self.send(EngineCommand::Remove { ids });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Blocks until the next event; `None` once the engine thread is gone.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            audit_error!("Engine thread is gone; command dropped");
        }
    }
}

async fn handle_command(
    config: &EngineConfig,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
    check_running: &AtomicBool,
) {
    let event = match command {
        EngineCommand::LoadTree => match config.bookmarks.get_tree().await {
            Ok(tree) => EngineEvent::TreeLoaded(tree),
            Err(err) => store_failed("load bookmarks", err),
        },
        EngineCommand::LoadSettings => match config.settings.load().await {
            Ok(settings) => EngineEvent::SettingsLoaded(settings),
            Err(err) => store_failed("load settings", err),
        },
        EngineCommand::SaveSettings(settings) => match config.settings.save(&settings).await {
            Ok(()) => EngineEvent::SettingsSaved,
            Err(err) => store_failed("save settings", err),
        },
        EngineCommand::StartCheck {
            roots,
            limit,
            timeout,
        } => {
            let sink = ChannelCheckSink::new(event_tx.clone());
            // Finished has already been emitted through the sink.
            let _ = check_liveness(roots, limit, timeout, config.prober.as_ref(), &sink).await;
            check_running.store(false, Ordering::SeqCst);
            return;
        }
        EngineCommand::Remove { ids } => {
            let mut removed = Vec::with_capacity(ids.len());
            let mut failed = Vec::new();
            for id in ids {
                match config.bookmarks.remove(&id).await {
                    Ok(()) => removed.push(id),
                    Err(err) => {
                        audit_warn!("Failed to remove bookmark {}: {}", id, err);
                        failed.push(DeleteFailure {
                            id,
                            reason: err.to_string(),
                        });
                    }
                }
            }
            EngineEvent::BookmarksRemoved { removed, failed }
        }
    };
    let _ = event_tx.send(event);
}

fn store_failed(operation: &'static str, err: impl std::fmt::Display) -> EngineEvent {
    audit_error!("Failed to {}: {}", operation, err);
    EngineEvent::StoreFailed {
        operation,
        message: err.to_string(),
    }
}
