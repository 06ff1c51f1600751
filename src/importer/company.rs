use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use tracing::debug;

use crate::config::MatchingStrictness;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static KC_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bkc\b").unwrap());
static INC_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\binc\b\.?").unwrap());
static THEATRE_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\btheatre\b").unwrap());

/// Detail fields from a Companies sheet row, keyed by display name.
#[derive(Debug, Clone, Default)]
pub struct CompanyDetails {
    pub name: String,
    pub website: String,
    pub show_website: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

/// A show row's company reference after resolution: the display name to use
/// and the detail record, when one was supplied.
#[derive(Debug, Clone)]
pub struct CompanyRef {
    pub name: String,
    pub details: Option<CompanyDetails>,
}

/// Canonical comparison key for a company name. Used only for matching,
/// never displayed: "ABC Theatre Inc." and "abc theater" collide here.
pub fn normalize_company_name(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let collapsed = WHITESPACE_RUN.replace_all(&lowered, " ");
    let without_kc = KC_TOKEN.replace_all(&collapsed, "");
    let without_inc = INC_TOKEN.replace_all(&without_kc, "");
    let spelled = THEATRE_TOKEN.replace_all(&without_inc, "theater");
    spelled.trim().to_string()
}

/// Resolves show-row company names against companies seen earlier in the
/// same batch. State lasts one import operation.
pub struct CompanyMatcher {
    strictness: MatchingStrictness,
    // display name -> detail record, from the companies sheet
    details: HashMap<String, CompanyDetails>,
    // normalized key -> first-seen display name
    seen: HashMap<String, String>,
}

impl CompanyMatcher {
    pub fn new(strictness: MatchingStrictness) -> Self {
        Self {
            strictness,
            details: HashMap::new(),
            seen: HashMap::new(),
        }
    }

    /// Register a detail record from the companies sheet. First registration
    /// of a normalized key owns the display form.
    pub fn register(&mut self, details: CompanyDetails) {
        if details.name.is_empty() {
            return;
        }
        let key = normalize_company_name(&details.name);
        self.seen.entry(key).or_insert_with(|| details.name.clone());
        self.details.insert(details.name.clone(), details);
    }

    /// Resolve a raw company name: exact display match first, then the
    /// normalized-key lookup (unless strictness is `Exact`), otherwise a new
    /// company under its own display form.
    pub fn resolve(&mut self, name: &str) -> CompanyRef {
        let name = name.trim();
        if name.is_empty() {
            return CompanyRef {
                name: String::new(),
                details: None,
            };
        }

        if let Some(details) = self.details.get(name) {
            return CompanyRef {
                name: name.to_string(),
                details: Some(details.clone()),
            };
        }

        let key = normalize_company_name(name);
        if self.strictness == MatchingStrictness::Normalized {
            if let Some(display_name) = self.seen.get(&key) {
                if display_name != name {
                    debug!(raw = %name, matched = %display_name, "fuzzy-matched company name");
                }
                return CompanyRef {
                    name: display_name.clone(),
                    details: self.details.get(display_name).cloned(),
                };
            }
        }

        self.seen.entry(key).or_insert_with(|| name.to_string());
        CompanyRef {
            name: name.to_string(),
            details: None,
        }
    }

    pub fn registered_count(&self) -> usize {
        self.details.len()
    }
}
