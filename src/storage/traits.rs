use async_trait::async_trait;

use crate::common::error::Result;
use crate::domain::{Theatre, TheatreEvent};

/// Persistence boundary for the calendar data set. The import pipeline only
/// appends; nothing ever rewrites a previously persisted record.
#[async_trait]
pub trait Store: Send + Sync {
    async fn events(&self) -> Result<Vec<TheatreEvent>>;
    async fn theatres(&self) -> Result<Vec<Theatre>>;
    async fn append_events(&self, events: &[TheatreEvent]) -> Result<()>;
    async fn append_theatres(&self, theatres: &[Theatre]) -> Result<()>;

    /// Events with `start <= date <= end`; `YYYY-MM-DD` strings compare
    /// correctly as plain strings.
    async fn events_in_range(
        &self,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Vec<TheatreEvent>> {
        let mut events = self.events().await?;
        if let Some(start) = start {
            events.retain(|e| e.date.as_str() >= start);
        }
        if let Some(end) = end {
            events.retain(|e| e.date.as_str() <= end);
        }
        Ok(events)
    }
}
