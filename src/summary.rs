//! Diagnostics collected while ingesting a trip file.
//!
//! Ingestion never fails towards its caller; everything that went wrong is
//! recorded here instead.

use serde::Serialize;

/// What happened to the input source as a whole.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceStatus {
    /// Header consumed and data rows processed (possibly zero of them).
    Read,
    /// The source could not be opened.
    #[default]
    Unavailable,
    /// The source had no lines, not even a header.
    Empty,
    /// A named column layout did not match the header row.
    HeaderMismatch,
    /// A read error stopped ingestion; rows before it were kept.
    Truncated,
}

/// Per-reason counters for data rows that were dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SkipCounts {
    pub empty_line: u64,
    pub too_few_fields: u64,
    pub missing_zone: u64,
    pub missing_datetime: u64,
    pub invalid_hour: u64,
}

/// Why a data row was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    EmptyLine,
    TooFewFields,
    MissingZone,
    MissingDatetime,
    InvalidHour,
}

impl SkipCounts {
    pub fn record(&mut self, reason: SkipReason) {
        let counter = match reason {
            SkipReason::EmptyLine => &mut self.empty_line,
            SkipReason::TooFewFields => &mut self.too_few_fields,
            SkipReason::MissingZone => &mut self.missing_zone,
            SkipReason::MissingDatetime => &mut self.missing_datetime,
            SkipReason::InvalidHour => &mut self.invalid_hour,
        };
        *counter += 1;
    }
}

/// Outcome of one ingestion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    pub source_status: SourceStatus,
    /// Data rows seen after the header.
    pub rows_seen: u64,
    pub rows_accepted: u64,
    pub skipped: SkipCounts,
}

impl IngestSummary {
    pub fn with_status(source_status: SourceStatus) -> Self {
        IngestSummary {
            source_status,
            ..Default::default()
        }
    }

    pub fn rows_skipped(&self) -> u64 {
        let s = &self.skipped;
        s.empty_line + s.too_few_fields + s.missing_zone + s.missing_datetime + s.invalid_hour
    }
}
