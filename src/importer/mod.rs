pub mod assemble;
pub mod columns;
pub mod company;
pub mod merge;
pub mod normalize;
pub mod workbook;

use std::sync::Arc;
use tracing::info;

use crate::common::error::{ImportError, Result};
use crate::config::ImportPolicy;
use assemble::{assemble_company, assemble_row, RowOutcome};
use company::CompanyMatcher;
use merge::{dedupe_events, dedupe_theatres, ImportSummary};
use workbook::{find_sheet, read_workbook, sheet_names, Sheet, COMPANIES_NEEDLE, SHOWS_NEEDLE};

use crate::storage::Store;

/// Use case for importing a workbook upload into the persisted calendar.
///
/// One upload is one atomic logical operation: a fatal parse error aborts
/// before any store write, and per-row problems are counted, not raised.
pub struct ImportUseCase {
    policy: ImportPolicy,
    store: Arc<dyn Store>,
}

impl ImportUseCase {
    pub fn new(policy: ImportPolicy, store: Arc<dyn Store>) -> Self {
        Self { policy, store }
    }

    /// Decode and import a binary workbook.
    pub async fn import_bytes(&self, bytes: &[u8]) -> Result<ImportSummary> {
        let sheets = read_workbook(bytes)?;
        self.import_sheets(&sheets).await
    }

    /// Import already-decoded sheets. A tab containing "show" is required; a
    /// "compan" tab optionally supplies company detail records.
    pub async fn import_sheets(&self, sheets: &[Sheet]) -> Result<ImportSummary> {
        let shows = find_sheet(sheets, SHOWS_NEEDLE)
            .ok_or_else(|| ImportError::missing_sheet(&sheet_names(sheets), "a \"Shows\" tab"))?;
        let companies = find_sheet(sheets, COMPANIES_NEEDLE);
        info!(
            shows_sheet = %shows.name,
            companies_sheet = companies.map(|s| s.name.as_str()).unwrap_or("(none)"),
            "starting import"
        );

        let mut matcher = CompanyMatcher::new(self.policy.matching);
        let mut companies_processed = 0;
        if let Some(companies) = companies {
            companies_processed = companies.rows.len();
            for row in &companies.rows {
                if let Some(details) = assemble_company(row) {
                    matcher.register(details);
                }
            }
            info!(
                rows = companies_processed,
                registered = matcher.registered_count(),
                "processed companies sheet"
            );
        }

        let mut events = Vec::new();
        let mut theatres = Vec::new();
        let mut rejected_rows = 0;
        for row in &shows.rows {
            match assemble_row(row, &mut matcher, self.policy) {
                RowOutcome::Accepted { event, theatre } => {
                    events.push(event);
                    theatres.push(theatre);
                }
                RowOutcome::Rejected { .. } => rejected_rows += 1,
            }
        }

        let events = dedupe_events(events);
        let theatres = dedupe_theatres(theatres);
        let total_processed = events.len();
        if companies.is_none() {
            // No companies sheet: count the distinct companies inferred from
            // the show rows instead.
            companies_processed = theatres.len();
        }

        let existing_events = self.store.events().await?;
        let existing_theatres = self.store.theatres().await?;
        let outcome = merge::merge(&existing_events, &existing_theatres, events, theatres);
        let added_events = outcome.new_events.len();
        let added_theatres = outcome.new_theatres.len();

        self.store.append_events(&outcome.new_events).await?;
        self.store.append_theatres(&outcome.new_theatres).await?;

        let summary = ImportSummary {
            companies_processed,
            added_events,
            added_theatres,
            total_processed,
            rejected_rows,
        };
        info!(
            companies = summary.companies_processed,
            accepted = summary.total_processed,
            rejected = summary.rejected_rows,
            added_events = summary.added_events,
            added_theatres = summary.added_theatres,
            "import complete"
        );
        Ok(summary)
    }
}
