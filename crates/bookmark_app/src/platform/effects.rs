use anyhow::{anyhow, Result};
use audit_logging::{audit_info, audit_warn};
use bookmark_core::{Effect, Msg};
use bookmark_engine::{CheckEvent, EngineEvent, EngineHandle};

/// Turns core effects into engine commands and engine events back into
/// messages.
///
/// Every command sent to the engine answers with exactly one completion
/// event, so counting them tells the caller when the engine has gone quiet.
pub struct EffectRunner {
    engine: EngineHandle,
    pending: usize,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine, pending: 0 }
    }

    /// Reads the forest and the stored settings.
    pub fn load(&mut self) {
        self.engine.load_tree();
        self.engine.load_settings();
        self.pending += 2;
    }

    pub fn enqueue(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartLivenessCheck {
                    roots,
                    limit,
                    timeout,
                } => {
                    audit_info!(
                        "StartLivenessCheck roots={} limit={} timeout={:?}",
                        roots.len(),
                        limit,
                        timeout
                    );
                    self.engine.start_check(roots, limit, timeout);
                }
                Effect::RemoveBookmarks { ids } => {
                    audit_info!("RemoveBookmarks count={}", ids.len());
                    self.engine.remove(ids);
                }
                Effect::ReloadTree => self.engine.load_tree(),
                Effect::SaveSettings(settings) => self.engine.save_settings(settings),
            }
            self.pending += 1;
        }
    }

    pub fn is_idle(&self) -> bool {
        self.pending == 0
    }

    /// Blocks for the next engine event. Store failures end the run.
    pub fn next_msg(&mut self) -> Result<Msg> {
        let event = self
            .engine
            .recv()
            .ok_or_else(|| anyhow!("bookmark engine stopped unexpectedly"))?;
        if is_completion(&event) {
            self.pending = self.pending.saturating_sub(1);
        }
        map_event(event)
    }
}

fn is_completion(event: &EngineEvent) -> bool {
    !matches!(
        event,
        EngineEvent::Check(CheckEvent::Progress(_)) | EngineEvent::Check(CheckEvent::PartialResult(_))
    )
}

fn map_event(event: EngineEvent) -> Result<Msg> {
    let msg = match event {
        EngineEvent::TreeLoaded(tree) => Msg::TreeLoaded(tree),
        EngineEvent::SettingsLoaded(settings) => Msg::SettingsLoaded(settings),
        EngineEvent::SettingsSaved => {
            audit_info!("Settings saved");
            Msg::NoOp
        }
        EngineEvent::Check(CheckEvent::Progress(progress)) => Msg::CheckProgress(progress),
        EngineEvent::Check(CheckEvent::PartialResult(index)) => Msg::CheckPartialResult(index),
        EngineEvent::Check(CheckEvent::Finished(index)) => Msg::CheckFinished(index),
        EngineEvent::CheckRejected => {
            audit_warn!("Engine refused the check: one is already running");
            Msg::NoOp
        }
        EngineEvent::BookmarksRemoved { removed, failed } => {
            Msg::DeleteCompleted { removed, failed }
        }
        EngineEvent::StoreFailed { operation, message } => {
            return Err(anyhow!("failed to {operation}: {message}"));
        }
    };
    Ok(msg)
}
