use std::io;
use std::path::PathBuf;

use audit_logging::{audit_debug, audit_info};
use bookmark_core::AuditSettings;
use serde::{Deserialize, Serialize};

use crate::persist::{write_atomically, PersistError};

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("settings file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Persist(#[from] PersistError),
    #[error("settings task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[async_trait::async_trait]
pub trait SettingsStore: Send + Sync {
    /// Stored settings, with defaults for anything missing.
    async fn load(&self) -> Result<AuditSettings, SettingsError>;
    async fn save(&self, settings: &AuditSettings) -> Result<(), SettingsError>;
}

/// Key/value blob as written by the browser extension storage API.
///
/// Numbers are read as floats because the blob may come from a JavaScript
/// writer; unknown keys survive a save.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsBlob {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    use_domain_for_duplication_check: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_requests: Option<f64>,
    /// Seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    request_timeout: Option<f64>,
    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

impl SettingsBlob {
    fn to_settings(&self) -> AuditSettings {
        AuditSettings {
            use_domain_for_duplication_check: self.use_domain_for_duplication_check.unwrap_or(false),
            max_requests: positive_u32(self.max_requests),
            request_timeout_secs: positive_u32(self.request_timeout),
        }
        .normalized()
    }

    fn apply(&mut self, settings: &AuditSettings) {
        self.use_domain_for_duplication_check = Some(settings.use_domain_for_duplication_check);
        self.max_requests = Some(f64::from(settings.max_requests));
        self.request_timeout = Some(f64::from(settings.request_timeout_secs));
    }
}

/// Zero, negative and non-finite values read as 0, which means "default".
fn positive_u32(value: Option<f64>) -> u32 {
    match value {
        Some(n) if n.is_finite() && n >= 1.0 => n.round().min(f64::from(u32::MAX)) as u32,
        _ => 0,
    }
}

pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

fn read_blob(path: &std::path::Path) -> Result<Option<SettingsBlob>, SettingsError> {
    match std::fs::read(path) {
        Ok(raw) => Ok(Some(serde_json::from_slice(&raw)?)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(SettingsError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[async_trait::async_trait]
impl SettingsStore for JsonSettingsStore {
    async fn load(&self) -> Result<AuditSettings, SettingsError> {
        let path = self.path.clone();
        let blob = tokio::task::spawn_blocking(move || read_blob(&path)).await??;
        match blob {
            Some(blob) => {
                let settings = blob.to_settings();
                audit_info!("Loaded settings from {:?}: {:?}", self.path, settings);
                Ok(settings)
            }
            None => {
                audit_debug!("No settings at {:?}, using defaults", self.path);
                Ok(AuditSettings::default())
            }
        }
    }

    async fn save(&self, settings: &AuditSettings) -> Result<(), SettingsError> {
        let path = self.path.clone();
        let settings = settings.normalized();
        tokio::task::spawn_blocking(move || {
            // A corrupt file is reported rather than replaced, so its other
            // keys are not lost.
            let mut blob = read_blob(&path)?.unwrap_or_default();
            blob.apply(&settings);
            let content = serde_json::to_vec_pretty(&blob)?;
            write_atomically(&path, &content)?;
            Ok::<_, SettingsError>(())
        })
        .await??;
        audit_info!("Saved settings to {:?}", self.path);
        Ok(())
    }
}
