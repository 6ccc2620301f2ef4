use anyhow::{Context, Result};
use serde::Deserialize;

use crate::layout::ColumnLayout;

/// Ingestion settings, stored as a JSON object on disk:
/// ```json
/// {
///   "layout": { "kind": "named", "zone": "PULocationID", "datetime": "tpep_pickup_datetime" }
/// }
/// ```
/// An empty object keeps the positional layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct IngestConfig {
    #[serde(default)]
    pub layout: ColumnLayout,
}

impl IngestConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("reading config {path}"))?;
        let config = serde_json::from_str(&content).with_context(|| format!("parsing config {path}"))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_named_layout() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"layout":{{"kind":"named","zone":"zone_id","datetime":"pickup"}}}}"#
        )
        .unwrap();

        let config = IngestConfig::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(
            config.layout,
            ColumnLayout::Named {
                zone: "zone_id".into(),
                datetime: "pickup".into()
            }
        );
    }

    #[test]
    fn test_empty_object_is_positional() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{}}").unwrap();

        let config = IngestConfig::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config, IngestConfig::default());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(IngestConfig::load("/no/such/config.json").is_err());
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ layout: ").unwrap();

        assert!(IngestConfig::load(file.path().to_str().unwrap()).is_err());
    }
}
