//! Writing split records back to a record file
//!
//! The output uses the same `split.<id>.<field>` shape the config loader
//! reads, so a saved file can be used as `general.record_file` directly.

use std::fs;
use std::path::Path;

use crate::duration::format_duration;
use crate::splits::RecordSnapshot;
use crate::Result;

/// Render records as TOML
pub fn records_to_toml(records: &[RecordSnapshot]) -> Result<String> {
    let mut splits = toml::Table::new();
    for record in records {
        let mut fields = toml::Table::new();
        fields.insert("best".into(), format_duration(record.best).into());
        fields.insert("average".into(), format_duration(record.average).into());
        fields.insert("attempts".into(), i64::from(record.attempts).into());
        splits.insert(record.id.clone(), toml::Value::Table(fields));
    }

    let mut root = toml::Table::new();
    root.insert("split".into(), toml::Value::Table(splits));
    Ok(toml::to_string(&root)?)
}

/// Write records to `path`, replacing its contents
pub fn save_records(path: &Path, records: &[RecordSnapshot]) -> Result<()> {
    let text = records_to_toml(records)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, text)?;
    log::info!("Saved records for {} splits to {}", records.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{map_splits, KeyValueConfig, ResourceKeys};
    use std::time::Duration;

    fn snapshot() -> Vec<RecordSnapshot> {
        vec![
            RecordSnapshot {
                id: "hera".into(),
                best: Duration::from_millis(95_120),
                average: Duration::from_millis(101_000),
                attempts: 6,
            },
            RecordSnapshot {
                id: "eastern".into(),
                best: Duration::ZERO,
                average: Duration::ZERO,
                attempts: 0,
            },
        ]
    }

    #[test]
    fn test_records_to_toml_shape() {
        let text = records_to_toml(&snapshot()).unwrap();
        let flat = KeyValueConfig::from_toml_str(&text).unwrap();

        assert_eq!(flat.get("split.hera.best"), Some("00:01:35.12"));
        assert_eq!(flat.get("split.hera.average"), Some("00:01:41.00"));
        assert_eq!(flat.get("split.hera.attempts"), Some("6"));
        assert_eq!(flat.get("split.eastern.attempts"), Some("0"));
    }

    #[test]
    fn test_saved_records_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("records.toml");
        save_records(&path, &snapshot()).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let flat = KeyValueConfig::from_toml_str(&text).unwrap();
        let specs = map_splits(&flat, &mut ResourceKeys::new()).unwrap();

        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].id, "hera");
        assert_eq!(specs[0].records.best, Duration::from_millis(95_120));
        assert_eq!(specs[0].records.attempts, 6);
    }
}
