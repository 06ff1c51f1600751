use serde::Serialize;
use std::collections::HashSet;
use tracing::info;

use crate::domain::{EventKey, Theatre, TheatreEvent};

/// Counts reported back to the caller after an import.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub companies_processed: usize,
    pub added_events: usize,
    pub added_theatres: usize,
    pub total_processed: usize,
    #[serde(skip_serializing_if = "is_zero")]
    pub rejected_rows: usize,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

impl ImportSummary {
    pub fn message(&self) -> String {
        format!(
            "Successfully processed {} companies and {} shows! Added {} new events and {} new theatres.",
            self.companies_processed, self.total_processed, self.added_events, self.added_theatres
        )
    }
}

/// The records that survived deduplication against the persisted sets.
#[derive(Debug, Default)]
pub struct MergeOutcome {
    pub new_events: Vec<TheatreEvent>,
    pub new_theatres: Vec<Theatre>,
}

/// Drop in-batch duplicates, keeping the first occurrence of each identity
/// key.
pub fn dedupe_events(events: Vec<TheatreEvent>) -> Vec<TheatreEvent> {
    let mut seen: HashSet<EventKey> = HashSet::new();
    events
        .into_iter()
        .filter(|event| seen.insert(event.identity_key()))
        .collect()
}

/// First-wins theatre dedup by exact display name.
pub fn dedupe_theatres(theatres: Vec<Theatre>) -> Vec<Theatre> {
    let mut seen: HashSet<String> = HashSet::new();
    theatres
        .into_iter()
        .filter(|theatre| seen.insert(theatre.name.clone()))
        .collect()
}

/// Keep only batch records not already present in the persisted sets:
/// events by identity key, theatres by exact name. The merge is append-only;
/// existing records are never rewritten.
pub fn merge(
    existing_events: &[TheatreEvent],
    existing_theatres: &[Theatre],
    batch_events: Vec<TheatreEvent>,
    batch_theatres: Vec<Theatre>,
) -> MergeOutcome {
    let known_events: HashSet<EventKey> =
        existing_events.iter().map(|e| e.identity_key()).collect();
    let known_theatres: HashSet<&str> =
        existing_theatres.iter().map(|t| t.name.as_str()).collect();

    let new_events: Vec<TheatreEvent> = batch_events
        .into_iter()
        .filter(|event| !known_events.contains(&event.identity_key()))
        .collect();
    let new_theatres: Vec<Theatre> = batch_theatres
        .into_iter()
        .filter(|theatre| !known_theatres.contains(theatre.name.as_str()))
        .collect();

    info!(
        added_events = new_events.len(),
        added_theatres = new_theatres.len(),
        "merged import batch against persisted set"
    );

    MergeOutcome {
        new_events,
        new_theatres,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EventType;

    fn event(title: &str, theatre: &str, date: &str, time: &str) -> TheatreEvent {
        TheatreEvent {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            theatre_name: theatre.into(),
            event_type: EventType::Play,
            date: date.into(),
            time: time.into(),
            description: String::new(),
            website_url: String::new(),
            ticket_url: None,
            venue: None,
            price: None,
            sign_language_interpreting: false,
        }
    }

    fn theatre(name: &str) -> Theatre {
        Theatre {
            name: name.into(),
            website: String::new(),
            address: None,
            email: None,
            phone: None,
        }
    }

    #[test]
    fn identical_key_rows_add_nothing() {
        let existing = vec![event("Hamlet", "X", "2025-01-01", "19:00")];
        let batch = vec![event("Hamlet", "X", "2025-01-01", "19:00")];
        let outcome = merge(&existing, &[], batch, Vec::new());
        assert!(outcome.new_events.is_empty());
    }

    #[test]
    fn any_differing_key_field_makes_a_new_event() {
        let existing = vec![event("Hamlet", "X", "2025-01-01", "19:00")];
        let batch = vec![
            event("Hamlet", "X", "2025-01-01", "14:00"),
            event("Hamlet", "Y", "2025-01-01", "19:00"),
        ];
        let outcome = merge(&existing, &[], batch, Vec::new());
        assert_eq!(outcome.new_events.len(), 2);
    }

    #[test]
    fn in_batch_dedup_keeps_the_first_occurrence() {
        let mut first = event("Cats", "ACME", "2025-01-15", "19:30");
        first.description = "first".into();
        let mut second = event("Cats", "ACME", "2025-01-15", "19:30");
        second.description = "second".into();
        let deduped = dedupe_events(vec![first, second]);
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].description, "first");
    }

    #[test]
    fn theatres_dedupe_by_exact_name_only() {
        let existing = vec![theatre("ACME Theatre")];
        let batch = vec![theatre("ACME Theatre"), theatre("acme theatre")];
        let outcome = merge(&[], &existing, Vec::new(), batch);
        // Exact-name dedup: case variant counts as a different theatre here.
        assert_eq!(outcome.new_theatres.len(), 1);
        assert_eq!(outcome.new_theatres[0].name, "acme theatre");
    }

    #[test]
    fn summary_message_reports_all_four_counts() {
        let summary = ImportSummary {
            companies_processed: 3,
            added_events: 2,
            added_theatres: 1,
            total_processed: 4,
            rejected_rows: 0,
        };
        let msg = summary.message();
        assert!(msg.contains("3 companies"));
        assert!(msg.contains("4 shows"));
        assert!(msg.contains("2 new events"));
        assert!(msg.contains("1 new theatres"));
    }
}
