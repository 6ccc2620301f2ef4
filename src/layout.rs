//! Where the zone and datetime fields live in a trip row.

use serde::Deserialize;

/// Column layout used by ingestion to locate the zone and datetime fields.
///
/// The default is the positional contract: zone at index 1, datetime at
/// index 3, rows with fewer than six fields dropped.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnLayout {
    /// Omitted fields fall back to the defaults below.
    Positional {
        #[serde(default = "default_zone")]
        zone: usize,
        #[serde(default = "default_datetime")]
        datetime: usize,
        #[serde(default = "default_min_fields")]
        min_fields: usize,
    },
    /// Columns looked up by header name.
    Named { zone: String, datetime: String },
}

fn default_zone() -> usize {
    1
}

fn default_datetime() -> usize {
    3
}

fn default_min_fields() -> usize {
    6
}

impl Default for ColumnLayout {
    fn default() -> Self {
        ColumnLayout::Positional {
            zone: default_zone(),
            datetime: default_datetime(),
            min_fields: default_min_fields(),
        }
    }
}

/// Field indices after resolving a [`ColumnLayout`] against a header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedLayout {
    pub zone: usize,
    pub datetime: usize,
    pub min_fields: usize,
}

impl ColumnLayout {
    /// Resolves the layout against the header row.
    ///
    /// Returns `None` when a named column is not present in the header.
    pub fn resolve(&self, header: &str) -> Option<ResolvedLayout> {
        match self {
            ColumnLayout::Positional {
                zone,
                datetime,
                min_fields,
            } => Some(ResolvedLayout {
                zone: *zone,
                datetime: *datetime,
                min_fields: *min_fields,
            }),
            ColumnLayout::Named { zone, datetime } => {
                let find = |name: &str| header.split(',').position(|col| col.trim() == name);
                let zone = find(zone)?;
                let datetime = find(datetime)?;
                Some(ResolvedLayout {
                    zone,
                    datetime,
                    min_fields: zone.max(datetime) + 1,
                })
            }
        }
    }
}
