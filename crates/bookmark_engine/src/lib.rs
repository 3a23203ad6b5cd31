//! Bookmark engine: stores, HTTP probing and the liveness job runner.
mod engine;
mod liveness;
mod persist;
mod probe;
mod settings_store;
mod store;
mod types;

pub use engine::{EngineConfig, EngineHandle};
pub use liveness::{check_liveness, ChannelCheckSink, CheckSink, ValidationJob};
pub use persist::{ensure_parent_dir, write_atomically, PersistError};
pub use probe::{ProbeSettings, Prober, ReqwestProber};
pub use settings_store::{JsonSettingsStore, SettingsError, SettingsStore};
pub use store::{BookmarkStore, JsonBookmarkStore, StoreError};
pub use types::{
    CheckEvent, EngineError, EngineEvent, ProbeOutcome, NO_RESPONSE_KEY, UNKNOWN_KEY,
};
pub use bookmark_core::JobProgress;
