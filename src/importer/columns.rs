use super::workbook::{Cell, RawRow};

/// Logical fields the import pipeline knows how to extract from a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Company,
    EventType,
    Date,
    Time,
    Venue,
    Url,
    TicketUrl,
    Description,
    Interpreting,
    Address,
    Email,
    Phone,
    Price,
    CompanyWebsite,
    ShowWebsite,
}

/// Accepted column headers per field, in priority order. Real uploads arrive
/// with inconsistent casing and the occasional renamed column, so each field
/// carries the full list of spellings seen in the wild.
pub fn aliases(field: Field) -> &'static [&'static str] {
    match field {
        Field::Title => &["Name", "name", "NAME", "Title", "title"],
        Field::Company => &["Company", "company", "COMPANY"],
        Field::EventType => &["Type", "type", "TYPE"],
        Field::Date => &["Date", "date", "DATE"],
        Field::Time => &["StartTime", "starttime", "STARTTIME", "Time", "time", "TIME"],
        Field::Venue => &["Theatre", "theatre", "THEATRE", "Venue", "venue", "VENUE"],
        Field::Url => &["url", "URL", "Website", "website"],
        Field::TicketUrl => &[
            "TicketURL",
            "ticketUrl",
            "TicketUrl",
            "ticketURL",
            "Ticket URL",
            "ticket url",
        ],
        Field::Description => &["Description", "description", "DESCRIPTION"],
        Field::Interpreting => &[
            "InterpretativePerformance",
            "InterpretivePerformance",
            "interpretativeperformance",
            "Interpreting",
            "interpreting",
            "INTERPRETING",
        ],
        Field::Address => &["Address", "address", "ADDRESS"],
        Field::Email => &["Email", "email", "EMAIL"],
        Field::Phone => &["Phone", "phone", "PHONE"],
        Field::Price => &["Price", "price", "PRICE"],
        Field::CompanyWebsite => &["CompanyWebsite", "companywebsite", "COMPANYWEBSITE"],
        Field::ShowWebsite => &[
            "ShowWebsite (if different)",
            "showwebsite (if different)",
            "ShowWebsite",
            "showwebsite",
        ],
    }
}

/// Return the cell under the first matching alias, or `None` when the row has
/// no such column. Absence is routine; the assembler decides what it means.
pub fn resolve<'a>(row: &'a RawRow, field: Field) -> Option<&'a Cell> {
    aliases(field).iter().find_map(|alias| row.get(*alias))
}
