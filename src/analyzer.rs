//! Trip ingestion and zone / slot ranking.
//!
//! [`TripAnalyzer`] owns two count tables, one keyed by zone and one keyed
//! by (zone, hour-of-day). Every ingestion clears both and rebuilds them
//! from a single pass over the source; the ranking queries only read them.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use tracing::{debug, trace, warn};

use crate::hour::extract_hour;
use crate::layout::{ColumnLayout, ResolvedLayout};
use crate::report::{SlotCount, ZoneCount};
use crate::summary::{IngestSummary, SkipReason, SourceStatus};

/// In-memory trip aggregator.
///
/// Ingestion takes `&mut self` and queries take `&self`, so a shared
/// analyzer has to sit behind a lock for queries to never observe a
/// half-built table.
#[derive(Debug, Default)]
pub struct TripAnalyzer {
    layout: ColumnLayout,
    zone_counts: HashMap<String, u64>,
    slot_counts: HashMap<(String, u8), u64>,
}

impl TripAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(layout: ColumnLayout) -> Self {
        TripAnalyzer {
            layout,
            ..Default::default()
        }
    }

    pub fn layout(&self) -> &ColumnLayout {
        &self.layout
    }

    /// Drops all counts. The layout is kept.
    pub fn reset(&mut self) {
        self.zone_counts.clear();
        self.slot_counts.clear();
    }

    /// Replaces the current counts with those built from the file at `path`.
    ///
    /// Never fails: an unopenable or empty file leaves both tables empty and
    /// malformed rows are dropped. The returned summary says what happened
    /// and may be ignored.
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn ingest<P: AsRef<Path>>(&mut self, path: P) -> IngestSummary {
        let file = match File::open(path.as_ref()) {
            Ok(file) => file,
            Err(e) => {
                self.reset();
                warn!(error = %e, "Trip source unavailable, counts left empty");
                return IngestSummary::with_status(SourceStatus::Unavailable);
            }
        };

        self.ingest_reader(BufReader::new(file))
    }

    /// Same as [`TripAnalyzer::ingest`] over an already opened reader.
    ///
    /// Lines are read as raw bytes; bytes that are not valid UTF-8 are
    /// replaced rather than causing the row to be dropped.
    pub fn ingest_reader<R: BufRead>(&mut self, mut reader: R) -> IngestSummary {
        self.reset();

        let mut buf = Vec::new();

        // The header is always consumed, whatever it contains.
        let header = match next_line(&mut reader, &mut buf) {
            Ok(None) => {
                debug!("Trip source has no header line");
                return IngestSummary::with_status(SourceStatus::Empty);
            }
            Ok(Some(header)) => header,
            Err(e) => {
                warn!(error = %e, "Failed to read header line");
                return IngestSummary::with_status(SourceStatus::Unavailable);
            }
        };

        let Some(layout) = self.layout.resolve(&header) else {
            warn!(
                layout = ?self.layout,
                header = %header,
                "Header does not contain the configured columns"
            );
            return IngestSummary::with_status(SourceStatus::HeaderMismatch);
        };

        let mut summary = IngestSummary::with_status(SourceStatus::Read);

        loop {
            let line = match next_line(&mut reader, &mut buf) {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %e, "Read error, keeping rows ingested so far");
                    summary.source_status = SourceStatus::Truncated;
                    break;
                }
            };
            summary.rows_seen += 1;

            match parse_row(&line, &layout) {
                Ok((zone, hour)) => {
                    self.record(zone, hour);
                    summary.rows_accepted += 1;
                }
                Err(reason) => {
                    trace!(?reason, row = summary.rows_seen, "Row skipped");
                    summary.skipped.record(reason);
                }
            }
        }

        debug!(
            rows_seen = summary.rows_seen,
            rows_accepted = summary.rows_accepted,
            rows_skipped = summary.rows_skipped(),
            zones = self.zone_counts.len(),
            slots = self.slot_counts.len(),
            "Trip ingestion finished"
        );

        summary
    }

    fn record(&mut self, zone: &str, hour: u8) {
        *self.zone_counts.entry(zone.to_owned()).or_default() += 1;
        *self.slot_counts.entry((zone.to_owned(), hour)).or_default() += 1;
    }

    /// Up to `k` zones, busiest first, ties broken by zone id ascending.
    pub fn top_zones(&self, k: i64) -> Vec<ZoneCount> {
        let Some(k) = limit(k) else {
            return Vec::new();
        };

        let mut ranked: Vec<ZoneCount> = self
            .zone_counts
            .iter()
            .map(|(zone, &count)| ZoneCount {
                zone: zone.clone(),
                count,
            })
            .collect();

        ranked.sort_unstable_by(|a, b| b.count.cmp(&a.count).then_with(|| a.zone.cmp(&b.zone)));
        ranked.truncate(k);
        ranked
    }

    /// Up to `k` (zone, hour) slots, busiest first, ties broken by zone id
    /// then hour, both ascending.
    pub fn top_busy_slots(&self, k: i64) -> Vec<SlotCount> {
        let Some(k) = limit(k) else {
            return Vec::new();
        };

        let mut ranked: Vec<SlotCount> = self
            .slot_counts
            .iter()
            .map(|((zone, hour), &count)| SlotCount {
                zone: zone.clone(),
                hour: *hour,
                count,
            })
            .collect();

        ranked.sort_unstable_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.zone.cmp(&b.zone))
                .then_with(|| a.hour.cmp(&b.hour))
        });
        ranked.truncate(k);
        ranked
    }

    pub fn zone_count(&self, zone: &str) -> u64 {
        self.zone_counts.get(zone).copied().unwrap_or(0)
    }

    pub fn slot_count(&self, zone: &str, hour: u8) -> u64 {
        self.slot_counts
            .get(&(zone.to_owned(), hour))
            .copied()
            .unwrap_or(0)
    }

    pub fn distinct_zones(&self) -> usize {
        self.zone_counts.len()
    }

    pub fn distinct_slots(&self) -> usize {
        self.slot_counts.len()
    }

    pub fn total_trips(&self) -> u64 {
        self.zone_counts.values().sum()
    }
}

/// Reads one line without its `\n` or `\r\n` terminator.
///
/// Returns `Ok(None)` at end of input.
fn next_line<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>) -> io::Result<Option<String>> {
    buf.clear();
    if reader.read_until(b'\n', buf)? == 0 {
        return Ok(None);
    }

    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }

    Ok(Some(String::from_utf8_lossy(buf).into_owned()))
}

fn limit(k: i64) -> Option<usize> {
    if k <= 0 {
        None
    } else {
        Some(usize::try_from(k).unwrap_or(usize::MAX))
    }
}

/// Pulls (zone, hour) out of a data row.
///
/// Fields are split on every `,` with no quoting rules; a trailing comma
/// yields a trailing empty field.
fn parse_row<'a>(line: &'a str, layout: &ResolvedLayout) -> Result<(&'a str, u8), SkipReason> {
    if line.is_empty() {
        return Err(SkipReason::EmptyLine);
    }

    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() < layout.min_fields {
        return Err(SkipReason::TooFewFields);
    }

    let zone = *fields.get(layout.zone).ok_or(SkipReason::TooFewFields)?;
    if zone.is_empty() {
        return Err(SkipReason::MissingZone);
    }

    let datetime = *fields.get(layout.datetime).ok_or(SkipReason::TooFewFields)?;
    if datetime.is_empty() {
        return Err(SkipReason::MissingDatetime);
    }

    let hour = extract_hour(datetime).ok_or(SkipReason::InvalidHour)?;
    Ok((zone, hour))
}
