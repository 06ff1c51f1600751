use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::traits::Store;
use crate::common::error::{ImportError, Result};
use crate::domain::{Theatre, TheatreEvent};

/// On-disk layout of the data file: one JSON document holding both sets.
#[derive(Debug, Default, Serialize, Deserialize)]
struct DataFile {
    #[serde(default)]
    events: Vec<TheatreEvent>,
    #[serde(default)]
    theatres: Vec<Theatre>,
}

/// JSON-file persistence. The file is created with an empty data set on
/// first read; writes rewrite the whole document, serialized pretty so the
/// file stays hand-inspectable.
pub struct JsonFileStore {
    path: PathBuf,
    // One import is one atomic logical operation; the lock keeps a
    // concurrent request from interleaving a read-modify-write.
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn read(&self) -> Result<DataFile> {
        if !self.path.exists() {
            info!(path = %self.path.display(), "data file missing, initializing empty store");
            let initial = DataFile::default();
            self.write(&initial)?;
            return Ok(initial);
        }
        let content = std::fs::read_to_string(&self.path)?;
        let data: DataFile = serde_json::from_str(&content).map_err(|e| ImportError::Store {
            message: format!("corrupt data file '{}': {e}", self.path.display()),
        })?;
        Ok(data)
    }

    fn write(&self, data: &DataFile) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(data)?;
        std::fs::write(&self.path, json)?;
        debug!(
            path = %self.path.display(),
            events = data.events.len(),
            theatres = data.theatres.len(),
            "wrote data file"
        );
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl Store for JsonFileStore {
    async fn events(&self) -> Result<Vec<TheatreEvent>> {
        let _guard = self.lock.lock().await;
        Ok(self.read()?.events)
    }

    async fn theatres(&self) -> Result<Vec<Theatre>> {
        let _guard = self.lock.lock().await;
        Ok(self.read()?.theatres)
    }

    async fn append_events(&self, events: &[TheatreEvent]) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut data = self.read()?;
        data.events.extend_from_slice(events);
        self.write(&data)
    }

    async fn append_theatres(&self, theatres: &[Theatre]) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut data = self.read()?;
        data.theatres.extend_from_slice(theatres);
        self.write(&data)
    }
}
