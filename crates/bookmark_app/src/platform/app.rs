use std::io::{self, IsTerminal, Write};

use anyhow::{bail, Context, Result};
use audit_logging::{audit_debug, LevelFilter};
use bookmark_core::{find_by_id, update, ActionType, AuditSettings, AuditState, Msg};
use bookmark_engine::{EngineConfig, EngineHandle, ProbeSettings};
use clap::Parser;

use super::cli::{Cli, Command};
use super::effects::EffectRunner;
use super::{logging, report};

pub fn run_app() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    logging::initialize(cli.log, level);

    let config = EngineConfig::with_files(&cli.bookmarks, &cli.settings, ProbeSettings::default())
        .context("failed to set up the bookmark engine")?;
    let engine = EngineHandle::new(config).context("failed to start the bookmark engine")?;
    let mut app = App::new(EffectRunner::new(engine));

    app.load()
        .with_context(|| format!("failed to load {}", cli.bookmarks.display()))?;
    app.execute(cli.command)
}

/// Owns the audit state and feeds it messages until the engine is idle.
struct App {
    state: AuditState,
    runner: EffectRunner,
    show_progress: bool,
}

impl App {
    fn new(runner: EffectRunner) -> Self {
        Self {
            state: AuditState::new(),
            runner,
            show_progress: io::stderr().is_terminal(),
        }
    }

    fn load(&mut self) -> Result<()> {
        self.runner.load();
        self.drain()
    }

    fn execute(&mut self, command: Command) -> Result<()> {
        let mut out = io::stdout().lock();
        match command {
            Command::Folders => {
                report::write_folders(&mut out, &self.state.view().folders)?;
            }
            Command::Duplicates { by_domain, folders } => {
                if by_domain {
                    self.override_settings(|s| s.use_domain_for_duplication_check = true);
                }
                self.select_folders(folders)?;
                self.dispatch(Msg::CheckDuplicateClicked);
                report::write_groups(&mut out, &self.state.view())?;
            }
            Command::DeadLinks {
                folders,
                max_requests,
                timeout,
            } => {
                self.override_settings(|s| {
                    if let Some(n) = max_requests {
                        s.max_requests = n;
                    }
                    if let Some(secs) = timeout {
                        s.request_timeout_secs = secs;
                    }
                });
                self.select_folders(folders)?;
                self.dispatch(Msg::CheckInvalidClicked);
                self.drain()?;
                if self.show_progress {
                    eprintln!();
                }
                report::write_groups(&mut out, &self.state.view())?;
            }
            Command::Remove { ids } => {
                self.dispatch(Msg::DeleteRequested(ids.clone()));
                self.drain()?;
                let view = self.state.view();
                let failed = view.errors.len();
                for id in ids.iter().filter(|id| !view.errors.iter().any(|e| &e.id == *id)) {
                    writeln!(out, "removed {id}")?;
                }
                report::write_errors(&mut out, &view.errors)?;
                if failed > 0 {
                    bail!("{failed} of {} bookmarks could not be removed", ids.len());
                }
            }
            Command::Settings {
                max_requests,
                timeout,
                by_domain,
            } => {
                if max_requests.is_some() || timeout.is_some() || by_domain.is_some() {
                    let mut edited = self.state.settings();
                    if let Some(n) = max_requests {
                        edited.max_requests = n;
                    }
                    if let Some(secs) = timeout {
                        edited.request_timeout_secs = secs;
                    }
                    if let Some(flag) = by_domain {
                        edited.use_domain_for_duplication_check = flag;
                    }
                    self.dispatch(Msg::SettingsEdited(edited));
                    self.drain()?;
                }
                report::write_settings(&mut out, &self.state.settings())?;
            }
        }
        Ok(())
    }

    /// Applies settings for this run only; nothing is saved.
    fn override_settings(&mut self, edit: impl FnOnce(&mut AuditSettings)) {
        let mut settings = self.state.settings();
        edit(&mut settings);
        self.dispatch(Msg::SettingsLoaded(settings));
    }

    fn select_folders(&mut self, ids: Vec<String>) -> Result<()> {
        for id in &ids {
            match find_by_id(self.state.bookmarks(), id) {
                Some(node) if node.is_folder() => {}
                Some(_) => bail!("{id} is a bookmark, not a folder"),
                None => bail!("no folder with id {id}"),
            }
        }
        self.dispatch(Msg::FoldersSelected(ids));
        Ok(())
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        if self.state.consume_dirty() {
            self.render_progress();
        }
        self.runner.enqueue(effects);
    }

    fn drain(&mut self) -> Result<()> {
        while !self.runner.is_idle() {
            let msg = self.runner.next_msg()?;
            self.dispatch(msg);
        }
        audit_debug!("engine idle");
        Ok(())
    }

    fn render_progress(&self) {
        if !self.show_progress || self.state.action() != Some(ActionType::CheckInvalid) {
            return;
        }
        let view = self.state.view();
        if view.total > 0 {
            eprint!("\r{}", report::progress_line(&view));
        }
    }
}
