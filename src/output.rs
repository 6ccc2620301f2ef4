//! Output formatting and persistence for hotspot reports.
//!
//! Supports pretty-printing, JSON serialization, and CSV export of the
//! zone and slot rankings.

use anyhow::Result;
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::File;
use tracing::{debug, info};

use crate::report::{HotspotReport, SlotCount, ZoneCount};

/// Logs a report using Rust's debug pretty-print format.
pub fn print_pretty(report: &HotspotReport) {
    debug!("{:#?}", report);
}

/// Serializes a report as pretty-printed JSON.
pub fn to_json_string(report: &HotspotReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Logs a report as pretty-printed JSON.
pub fn print_json(report: &HotspotReport) -> Result<()> {
    info!("{}", to_json_string(report)?);
    Ok(())
}

/// Writes zone rankings to a CSV file with a `zone,count` header.
///
/// Overwrites any existing file.
pub fn write_zones_csv(path: &str, zones: &[ZoneCount]) -> Result<()> {
    write_rows(path, zones)
}

/// Writes slot rankings to a CSV file with a `zone,hour,count` header.
///
/// Overwrites any existing file.
pub fn write_slots_csv(path: &str, slots: &[SlotCount]) -> Result<()> {
    write_rows(path, slots)
}

fn write_rows<T: Serialize>(path: &str, rows: &[T]) -> Result<()> {
    debug!(path, rows = rows.len(), "Writing CSV report");

    let file = File::create(path)?;
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::IngestSummary;
    use chrono::Utc;
    use std::fs;

    fn sample_report() -> HotspotReport {
        HotspotReport {
            generated_at: Utc::now(),
            source: "trips.csv".to_string(),
            summary: IngestSummary::default(),
            top_zones: vec![ZoneCount {
                zone: "A".to_string(),
                count: 2,
            }],
            top_slots: vec![SlotCount {
                zone: "A".to_string(),
                hour: 8,
                count: 2,
            }],
        }
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&sample_report());
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&sample_report()).unwrap();
    }

    #[test]
    fn test_json_contains_rankings() {
        let json = to_json_string(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["top_zones"][0]["zone"], "A");
        assert_eq!(value["top_slots"][0]["hour"], 8);
        assert_eq!(value["summary"]["source_status"], "unavailable");
    }

    #[test]
    fn test_write_zones_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zones.csv");
        let path = path.to_str().unwrap();

        write_zones_csv(path, &sample_report().top_zones).unwrap();

        let content = fs::read_to_string(path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines, vec!["zone,count", "A,2"]);
    }

    #[test]
    fn test_write_slots_csv_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slots.csv");
        let path = path.to_str().unwrap();

        let slots = sample_report().top_slots;
        write_slots_csv(path, &slots).unwrap();
        write_slots_csv(path, &slots).unwrap();

        let content = fs::read_to_string(path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines, vec!["zone,hour,count", "A,8,2"]);
    }

    #[test]
    fn test_write_empty_rankings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        let path = path.to_str().unwrap();

        write_zones_csv(path, &[]).unwrap();

        assert!(fs::read_to_string(path).unwrap().is_empty());
    }
}
