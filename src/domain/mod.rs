use serde::{Deserialize, Serialize};

/// Closed set of event categories. Anything a spreadsheet throws at us that
/// does not resolve to one of these ends up as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    Play,
    Musical,
    Comedy,
    Drama,
    Children,
    Opera,
    Dance,
    Performance,
    Other,
}

impl EventType {
    pub const ALL: [EventType; 9] = [
        EventType::Play,
        EventType::Musical,
        EventType::Comedy,
        EventType::Drama,
        EventType::Children,
        EventType::Opera,
        EventType::Dance,
        EventType::Performance,
        EventType::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EventType::Play => "Play",
            EventType::Musical => "Musical",
            EventType::Comedy => "Comedy",
            EventType::Drama => "Drama",
            EventType::Children => "Children",
            EventType::Opera => "Opera",
            EventType::Dance => "Dance",
            EventType::Performance => "Performance",
            EventType::Other => "Other",
        }
    }
}

/// A single performance on the calendar.
///
/// `date` is always `YYYY-MM-DD` and `time` always `HH:MM` (24-hour); the
/// import pipeline guarantees both before a record is accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TheatreEvent {
    pub id: String,
    pub title: String,
    pub theatre_name: String,
    pub event_type: EventType,
    pub date: String,
    pub time: String,
    pub description: String,
    pub website_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default)]
    pub sign_language_interpreting: bool,
}

/// Composite identity used for deduplication. Two events with the same key
/// are the same performance; comparison is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventKey {
    pub title: String,
    pub theatre_name: String,
    pub date: String,
    pub time: String,
}

impl TheatreEvent {
    pub fn identity_key(&self) -> EventKey {
        EventKey {
            title: self.title.clone(),
            theatre_name: self.theatre_name.clone(),
            date: self.date.clone(),
            time: self.time.clone(),
        }
    }
}

/// A theatre company / venue, keyed by exact display name in the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theatre {
    pub name: String,
    #[serde(default)]
    pub website: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_key_is_the_four_field_tuple() {
        let event = TheatreEvent {
            id: "1".into(),
            title: "Hamlet".into(),
            theatre_name: "X".into(),
            event_type: EventType::Play,
            date: "2025-01-01".into(),
            time: "19:00".into(),
            description: String::new(),
            website_url: String::new(),
            ticket_url: None,
            venue: None,
            price: None,
            sign_language_interpreting: false,
        };
        let mut other = event.clone();
        other.id = "2".into();
        other.description = "different glue".into();
        assert_eq!(event.identity_key(), other.identity_key());

        other.time = "19:30".into();
        assert_ne!(event.identity_key(), other.identity_key());
    }

    #[test]
    fn event_serializes_with_camel_case_wire_names() {
        let event = TheatreEvent {
            id: "1".into(),
            title: "Cats".into(),
            theatre_name: "ACME Theatre".into(),
            event_type: EventType::Musical,
            date: "2025-01-15".into(),
            time: "19:30".into(),
            description: String::new(),
            website_url: "https://example.com".into(),
            ticket_url: None,
            venue: None,
            price: None,
            sign_language_interpreting: true,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["theatreName"], "ACME Theatre");
        assert_eq!(json["eventType"], "Musical");
        assert_eq!(json["signLanguageInterpreting"], true);
        assert!(json.get("ticketUrl").is_none());
    }
}
