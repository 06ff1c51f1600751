use tracing::{debug, warn};
use uuid::Uuid;

use super::columns::{resolve, Field};
use super::company::{CompanyMatcher, CompanyRef};
use super::normalize::{
    clean_text, normalize_bool, normalize_date, normalize_event_type, normalize_time,
};
use super::workbook::{Cell, RawRow};
use crate::config::ImportPolicy;
use crate::domain::{Theatre, TheatreEvent};

/// Result of assembling one show row. Rejection is routine and counted, not
/// an error condition.
#[derive(Debug)]
pub enum RowOutcome {
    Accepted {
        event: TheatreEvent,
        theatre: Theatre,
    },
    Rejected {
        missing: Vec<&'static str>,
    },
}

fn field_text(row: &RawRow, field: Field) -> String {
    resolve(row, field).map(clean_text).unwrap_or_default()
}

/// Build a candidate event (and its theatre) from one show row.
///
/// A matched company's show-specific website wins over the row's own URL,
/// which in turn wins over the company's general website. The candidate is
/// accepted only when title, theatre name, and date survived normalization.
pub fn assemble_row(
    row: &RawRow,
    matcher: &mut CompanyMatcher,
    policy: ImportPolicy,
) -> RowOutcome {
    let raw_company = field_text(row, Field::Company);
    let CompanyRef {
        name: theatre_name,
        details,
    } = matcher.resolve(&raw_company);

    let title = field_text(row, Field::Title);
    let date = normalize_date(resolve(row, Field::Date).unwrap_or(&Cell::Empty));
    let time = normalize_time(resolve(row, Field::Time).unwrap_or(&Cell::Empty));

    let row_url = field_text(row, Field::Url);
    let website_url = details
        .as_ref()
        .map(|d| d.show_website.clone())
        .filter(|url| !url.is_empty())
        .or_else(|| Some(row_url).filter(|url| !url.is_empty()))
        .or_else(|| {
            details
                .as_ref()
                .map(|d| d.website.clone())
                .filter(|url| !url.is_empty())
        })
        .unwrap_or_default();

    let mut missing = Vec::new();
    if title.is_empty() {
        missing.push("title");
    }
    if theatre_name.is_empty() {
        missing.push("theatreName");
    }
    if date.is_empty() {
        missing.push("date");
    }
    if !missing.is_empty() {
        warn!(?missing, title = %title, company = %theatre_name, "skipping invalid show row");
        return RowOutcome::Rejected { missing };
    }

    let event = TheatreEvent {
        id: Uuid::new_v4().to_string(),
        title,
        theatre_name: theatre_name.clone(),
        event_type: normalize_event_type(
            resolve(row, Field::EventType).unwrap_or(&Cell::Empty),
            policy.type_profile,
        ),
        date,
        time,
        description: field_text(row, Field::Description),
        website_url: website_url.clone(),
        ticket_url: non_empty(field_text(row, Field::TicketUrl)),
        venue: non_empty(field_text(row, Field::Venue)),
        price: non_empty(field_text(row, Field::Price)),
        sign_language_interpreting: normalize_bool(
            resolve(row, Field::Interpreting).unwrap_or(&Cell::Empty),
        ),
    };
    debug!(title = %event.title, date = %event.date, "accepted show row");

    // Theatre record: company-sheet details when matched, row-local fields
    // as the fallback for workbooks that only carry a Shows tab.
    let theatre = match details {
        Some(d) => Theatre {
            name: theatre_name,
            website: d.website,
            address: non_empty(d.address),
            email: non_empty(d.email),
            phone: non_empty(d.phone),
        },
        None => Theatre {
            name: theatre_name,
            website: website_url,
            address: non_empty(field_text(row, Field::Address)),
            email: non_empty(field_text(row, Field::Email)),
            phone: non_empty(field_text(row, Field::Phone)),
        },
    };

    RowOutcome::Accepted { event, theatre }
}

/// Read one companies-sheet row into a detail record; `None` when the row
/// has no company name.
pub fn assemble_company(row: &RawRow) -> Option<super::company::CompanyDetails> {
    let name = field_text(row, Field::Company);
    if name.is_empty() {
        debug!("skipping company row with no company name");
        return None;
    }
    Some(super::company::CompanyDetails {
        name,
        website: field_text(row, Field::CompanyWebsite),
        show_website: field_text(row, Field::ShowWebsite),
        email: field_text(row, Field::Email),
        phone: field_text(row, Field::Phone),
        address: field_text(row, Field::Address),
    })
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
