use chrono::{NaiveDate, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::workbook::Cell;
use crate::config::TypeAliasProfile;
use crate::domain::EventType;

/// Fallback for unparseable times. Dates fall back to the empty string
/// instead; an event without a date is rejected, one without a time is not.
pub const TIME_FALLBACK: &str = "00:00";

/// Offset between the Excel day-serial epoch and the Unix epoch:
/// serial 25569 is 1970-01-01.
const EXCEL_UNIX_EPOCH_OFFSET: f64 = 25569.0;
const MS_PER_DAY: f64 = 86_400_000.0;

static SLASH_MDY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})$").unwrap());
static ISO_YMD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").unwrap());
static DASH_MDY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{1,2})-(\d{1,2})-(\d{4})$").unwrap());

static CLOCK_TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2}):(\d{2})\s*([AaPp][Mm])?$").unwrap());
static COMPACT_TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})(\d{2})\s*([AaPp][Mm])?$").unwrap());

/// Trim a cell down to display text. Missing and unrepresentable values
/// become the empty string.
pub fn clean_text(cell: &Cell) -> String {
    match cell {
        Cell::Empty => String::new(),
        Cell::Text(s) => s.trim().to_string(),
        Cell::Number(n) if n.fract() == 0.0 => format!("{}", *n as i64),
        Cell::Number(n) => n.to_string(),
        Cell::Bool(b) => b.to_string(),
        Cell::DateTime(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
    }
}

/// Coerce a cell to a `YYYY-MM-DD` calendar date, or `""` when it cannot be
/// read as one. All arithmetic stays in UTC so a serial never drifts a day.
pub fn normalize_date(cell: &Cell) -> String {
    match cell {
        Cell::Empty | Cell::Bool(_) => String::new(),
        Cell::Number(serial) => date_from_serial(*serial),
        Cell::DateTime(dt) => dt.date().format("%Y-%m-%d").to_string(),
        Cell::Text(s) => parse_date_str(s.trim()),
    }
}

fn date_from_serial(serial: f64) -> String {
    if !serial.is_finite() {
        return String::new();
    }
    let ms = ((serial - EXCEL_UNIX_EPOCH_OFFSET) * MS_PER_DAY).round() as i64;
    match chrono::DateTime::from_timestamp_millis(ms) {
        Some(dt) => dt.date_naive().format("%Y-%m-%d").to_string(),
        None => String::new(),
    }
}

fn parse_date_str(s: &str) -> String {
    if s.is_empty() {
        return String::new();
    }

    let ymd = if let Some(c) = SLASH_MDY.captures(s) {
        num3(&c, 3, 1, 2)
    } else if let Some(c) = ISO_YMD.captures(s) {
        num3(&c, 1, 2, 3)
    } else if let Some(c) = DASH_MDY.captures(s) {
        num3(&c, 3, 1, 2)
    } else {
        None
    };

    let date = match ymd {
        Some((y, m, d)) => NaiveDate::from_ymd_opt(y, m, d),
        None => parse_date_generic(s),
    };

    match date {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => {
            debug!(input = %s, "unparseable date");
            String::new()
        }
    }
}

fn num3(c: &regex::Captures<'_>, y: usize, m: usize, d: usize) -> Option<(i32, u32, u32)> {
    Some((c[y].parse().ok()?, c[m].parse().ok()?, c[d].parse().ok()?))
}

/// Last-resort formats for dates typed out long-hand.
fn parse_date_generic(s: &str) -> Option<NaiveDate> {
    for format in ["%B %d, %Y", "%b %d, %Y", "%d %B %Y", "%A, %B %d, %Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date);
        }
    }
    chrono::DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&chrono::Utc).date_naive())
}

/// Coerce a cell to a zero-padded 24-hour `HH:MM`, falling back to `"00:00"`.
pub fn normalize_time(cell: &Cell) -> String {
    match cell {
        Cell::Empty | Cell::Bool(_) => TIME_FALLBACK.to_string(),
        Cell::Number(v) => time_from_fraction(*v),
        Cell::DateTime(dt) => format!("{:02}:{:02}", dt.hour(), dt.minute()),
        Cell::Text(s) => parse_time_str(s.trim()),
    }
}

/// Excel times are fractions of a day. Whole days are discarded so a
/// combined date+time serial still yields the clock time.
fn time_from_fraction(v: f64) -> String {
    if !v.is_finite() || v < 0.0 {
        return TIME_FALLBACK.to_string();
    }
    let frac = v.fract();
    let hours = (frac * 24.0).floor() as u32;
    let minutes = ((frac * 24.0 * 60.0).floor() as u32) % 60;
    if hours > 23 {
        return TIME_FALLBACK.to_string();
    }
    format!("{hours:02}:{minutes:02}")
}

fn parse_time_str(s: &str) -> String {
    let captures = CLOCK_TIME.captures(s).or_else(|| COMPACT_TIME.captures(s));
    let Some(c) = captures else {
        debug!(input = %s, "unparseable time");
        return TIME_FALLBACK.to_string();
    };

    let mut hours: u32 = c[1].parse().unwrap_or(99);
    let minutes: u32 = c[2].parse().unwrap_or(99);

    if let Some(meridiem) = c.get(3) {
        let pm = meridiem.as_str().eq_ignore_ascii_case("pm");
        if pm && hours != 12 {
            hours += 12;
        } else if !pm && hours == 12 {
            hours = 0;
        }
    }

    if hours > 23 || minutes > 59 {
        debug!(input = %s, "time out of range");
        return TIME_FALLBACK.to_string();
    }
    format!("{hours:02}:{minutes:02}")
}

/// Tokens that count as "yes" for flag columns like sign-language
/// interpreting. Everything else, including blank, is false.
pub fn normalize_bool(cell: &Cell) -> bool {
    match cell {
        Cell::Bool(b) => *b,
        Cell::Number(n) => *n == 1.0,
        Cell::Text(s) => matches!(
            s.trim().to_lowercase().as_str(),
            "true" | "yes" | "1" | "available" | "offered" | "y"
        ),
        Cell::Empty | Cell::DateTime(_) => false,
    }
}

/// Resolve a free-text category label to the closed event-type set.
///
/// The alias table is a policy input: the two historical frontends disagree
/// on whether a bare "show" is a `Play` or a generic `Performance`.
pub fn normalize_event_type(cell: &Cell, profile: TypeAliasProfile) -> EventType {
    let raw = clean_text(cell);
    if raw.is_empty() {
        return EventType::Other;
    }
    let lower = raw.to_lowercase();

    if let Some(mapped) = alias_lookup(&lower, profile) {
        return mapped;
    }

    let capitalized = capitalize(&lower);
    EventType::ALL
        .into_iter()
        .find(|t| t.label() == capitalized)
        .unwrap_or(EventType::Other)
}

fn alias_lookup(label: &str, profile: TypeAliasProfile) -> Option<EventType> {
    let mapped = match label {
        "music" | "concert" => EventType::Musical,
        "theatre" | "theater" => EventType::Play,
        "kid" | "kids" | "child" => EventType::Children,
        "show" => match profile {
            TypeAliasProfile::Server => EventType::Play,
            TypeAliasProfile::Client => EventType::Performance,
        },
        "performance" if profile == TypeAliasProfile::Server => EventType::Play,
        _ => return None,
    };
    Some(mapped)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    #[test]
    fn date_serial_uses_the_unix_epoch_offset() {
        assert_eq!(normalize_date(&Cell::Number(25569.0)), "1970-01-01");
        assert_eq!(normalize_date(&Cell::Number(45905.0)), "2025-09-05");
    }

    #[test]
    fn date_string_formats_are_tried_in_order() {
        assert_eq!(normalize_date(&text("1/15/2025")), "2025-01-15");
        assert_eq!(normalize_date(&text("2025-01-15")), "2025-01-15");
        assert_eq!(normalize_date(&text("1-15-2025")), "2025-01-15");
        assert_eq!(normalize_date(&text("January 15, 2025")), "2025-01-15");
    }

    #[test]
    fn date_normalization_is_idempotent_on_canonical_strings() {
        for s in ["2025-01-15", "2024-02-29", "1999-12-31"] {
            let once = normalize_date(&text(s));
            assert_eq!(normalize_date(&text(&once)), once);
        }
    }

    #[test]
    fn invalid_dates_become_empty_not_errors() {
        assert_eq!(normalize_date(&text("not a date")), "");
        assert_eq!(normalize_date(&text("2025-13-40")), "");
        assert_eq!(normalize_date(&Cell::Empty), "");
    }

    #[test]
    fn native_datetime_takes_the_calendar_date() {
        let dt = NaiveDateTime::parse_from_str("2025-09-05 19:30:00", "%Y-%m-%d %H:%M:%S").unwrap();
        assert_eq!(normalize_date(&Cell::DateTime(dt)), "2025-09-05");
        assert_eq!(normalize_time(&Cell::DateTime(dt)), "19:30");
    }

    #[test]
    fn fractional_day_times_convert() {
        assert_eq!(normalize_time(&Cell::Number(0.8125)), "19:30");
        assert_eq!(normalize_time(&Cell::Number(0.0)), "00:00");
        // Combined date+time serial keeps the clock portion.
        assert_eq!(normalize_time(&Cell::Number(45905.8125)), "19:30");
    }

    #[test]
    fn clock_strings_handle_meridiem() {
        assert_eq!(normalize_time(&text("7:30 PM")), "19:30");
        assert_eq!(normalize_time(&text("7:30")), "07:30");
        assert_eq!(normalize_time(&text("12:15 AM")), "00:15");
        assert_eq!(normalize_time(&text("12:15 PM")), "12:15");
        assert_eq!(normalize_time(&text("730 PM")), "19:30");
    }

    #[test]
    fn bare_digit_times_convert() {
        assert_eq!(normalize_time(&text("930")), "09:30");
        assert_eq!(normalize_time(&text("1234")), "12:34");
    }

    #[test]
    fn unparseable_times_fall_back() {
        assert_eq!(normalize_time(&text("abcd")), "00:00");
        assert_eq!(normalize_time(&text("25:99")), "00:00");
        assert_eq!(normalize_time(&Cell::Empty), "00:00");
    }

    #[test]
    fn boolean_tokens() {
        for yes in ["Yes", "1", "available", "Y", "true", " offered "] {
            assert!(normalize_bool(&text(yes)), "{yes:?} should be true");
        }
        for no in ["no", "", "maybe", "0"] {
            assert!(!normalize_bool(&text(no)), "{no:?} should be false");
        }
        assert!(normalize_bool(&Cell::Number(1.0)));
        assert!(!normalize_bool(&Cell::Number(2.0)));
        assert!(normalize_bool(&Cell::Bool(true)));
    }

    #[test]
    fn event_type_aliases_follow_the_profile() {
        let server = TypeAliasProfile::Server;
        let client = TypeAliasProfile::Client;
        assert_eq!(normalize_event_type(&text("musical"), server), EventType::Musical);
        assert_eq!(normalize_event_type(&text("music"), server), EventType::Musical);
        assert_eq!(normalize_event_type(&text("THEATER"), server), EventType::Play);
        assert_eq!(normalize_event_type(&text("kids"), server), EventType::Children);
        assert_eq!(normalize_event_type(&text("show"), server), EventType::Play);
        assert_eq!(normalize_event_type(&text("show"), client), EventType::Performance);
        assert_eq!(normalize_event_type(&text("Performance"), server), EventType::Play);
        assert_eq!(normalize_event_type(&text("Performance"), client), EventType::Performance);
    }

    #[test]
    fn unknown_event_types_default_to_other() {
        let server = TypeAliasProfile::Server;
        assert_eq!(normalize_event_type(&text("juggling"), server), EventType::Other);
        assert_eq!(normalize_event_type(&Cell::Empty, server), EventType::Other);
    }

    #[test]
    fn clean_text_trims_and_renders_numbers() {
        assert_eq!(clean_text(&text("  Cats  ")), "Cats");
        assert_eq!(clean_text(&Cell::Number(8165551234.0)), "8165551234");
        assert_eq!(clean_text(&Cell::Number(25.5)), "25.5");
        assert_eq!(clean_text(&Cell::Empty), "");
    }
}
