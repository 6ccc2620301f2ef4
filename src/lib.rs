pub mod analyzer;
pub mod config;
pub mod hour;
pub mod layout;
pub mod output;
pub mod report;
pub mod summary;

pub use analyzer::TripAnalyzer;
pub use report::{HotspotReport, SlotCount, ZoneCount};
pub use summary::{IngestSummary, SourceStatus};
