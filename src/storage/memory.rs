use async_trait::async_trait;
use tokio::sync::Mutex;

use super::traits::Store;
use crate::common::error::Result;
use crate::domain::{Theatre, TheatreEvent};

/// In-memory store. Backs tests and the `--ephemeral` serve mode; contents
/// vanish with the process.
#[derive(Default)]
pub struct MemoryStore {
    events: Mutex<Vec<TheatreEvent>>,
    theatres: Mutex<Vec<Theatre>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn events(&self) -> Result<Vec<TheatreEvent>> {
        Ok(self.events.lock().await.clone())
    }

    async fn theatres(&self) -> Result<Vec<Theatre>> {
        Ok(self.theatres.lock().await.clone())
    }

    async fn append_events(&self, events: &[TheatreEvent]) -> Result<()> {
        self.events.lock().await.extend_from_slice(events);
        Ok(())
    }

    async fn append_theatres(&self, theatres: &[Theatre]) -> Result<()> {
        self.theatres.lock().await.extend_from_slice(theatres);
        Ok(())
    }
}
