//! Tool-specific summarizers behind one capability contract.
//!
//! Each scanning tool's harvest dialect is owned by a single [`Summarizer`]
//! implementation; the caller picks the implementation matching the tool
//! that produced the harvest.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;
use thiserror::Error;

use crate::models::{Coordinates, DefinitionSummary};

pub mod clearlydefined;
pub mod scancode;

/// The sole fatal error in the core: the harvest is missing, malformed, or
/// does not carry the marker identifying the expected tool. Every other
/// absence is an empty case handled by omitting the output field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SummaryError {
    #[error("not valid {tool} data")]
    InvalidHarvest { tool: &'static str },
}

pub trait Summarizer {
    /// Summarize the raw harvest for the given coordinates.
    ///
    /// Pure: identical inputs always yield a structurally identical summary.
    fn summarize(
        &self,
        coordinates: &Coordinates,
        harvested: &Value,
    ) -> Result<DefinitionSummary, SummaryError>;
}

/// Normalize a raw timestamp to its ISO calendar date (`2018-03-06`),
/// dropping time-of-day and timezone. Unparseable values yield `None`.
pub(crate) fn extract_date(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if let Ok(date_time) = DateTime::parse_from_rfc3339(raw) {
        return Some(date_time.date_naive().to_string());
    }
    if let Ok(date_time) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(date_time.date().to_string());
    }
    let date_part = raw.get(..10)?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .ok()
        .map(|date| date.to_string())
}
