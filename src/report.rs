//! Data types returned by ranking queries and written out as reports.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analyzer::TripAnalyzer;
use crate::summary::IngestSummary;

/// Trip count for a single zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneCount {
    pub zone: String,
    pub count: u64,
}

/// Trip count for a (zone, hour-of-day) slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotCount {
    pub zone: String,
    pub hour: u8,
    pub count: u64,
}

/// Snapshot of both rankings for one ingested source.
#[derive(Debug, Serialize)]
pub struct HotspotReport {
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub summary: IngestSummary,
    pub top_zones: Vec<ZoneCount>,
    pub top_slots: Vec<SlotCount>,
}

impl HotspotReport {
    pub fn build(
        source: &str,
        analyzer: &TripAnalyzer,
        summary: IngestSummary,
        zones_k: i64,
        slots_k: i64,
    ) -> Self {
        HotspotReport {
            generated_at: Utc::now(),
            source: source.to_string(),
            summary,
            top_zones: analyzer.top_zones(zones_k),
            top_slots: analyzer.top_busy_slots(slots_k),
        }
    }
}
