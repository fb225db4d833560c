//! Configuration loading and the config-to-splits mapping
//!
//! Config files are TOML. They are flattened into an ordered list of dotted
//! keys (`[split.ep] name = "Eastern Palace"` becomes `split.ep.name`), and
//! `split.<id>.<field>` entries are mapped onto [`SplitSpec`]s. The
//! `[general]` table is read into [`GeneralSettings`].

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::duration::parse_duration;
use crate::splits::SplitSpec;
use crate::{Result, SplitsError};

/// Settings from the `[general]` table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct GeneralSettings {
    /// Read commands from stdin
    #[serde(default)]
    pub use_console: bool,
    /// Redraw interval in milliseconds while a timer runs
    #[serde(default)]
    pub render_wait: u64,
    /// Secondary file holding split records, merged over the main config
    #[serde(default)]
    pub record_file: Option<PathBuf>,
}

/// Ordered dotted-key configuration
///
/// Keys keep the order they were first seen in. Setting an existing key
/// replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyValueConfig {
    entries: Vec<(String, String)>,
    positions: HashMap<String, usize>,
}

impl KeyValueConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse TOML text and flatten it
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let table: toml::Table = text.parse()?;
        Ok(Self::from_table(&table))
    }

    /// Flatten an already-parsed TOML table
    pub fn from_table(table: &toml::Table) -> Self {
        let mut config = Self::new();
        flatten_into(&mut config, "", table);
        config
    }

    /// Set a key, keeping its original position if it already exists
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.positions.get(&key) {
            Some(&position) => self.entries[position].1 = value,
            None => {
                self.positions.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.positions
            .get(key)
            .map(|&position| self.entries[position].1.as_str())
    }

    /// Apply every entry of `other` on top of this config
    pub fn merge(&mut self, other: &KeyValueConfig) {
        for (key, value) in other.iter() {
            self.set(key, value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for KeyValueConfig {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut config = Self::new();
        for (key, value) in iter {
            config.set(key, value);
        }
        config
    }
}

fn flatten_into(config: &mut KeyValueConfig, prefix: &str, table: &toml::Table) {
    for (key, value) in table {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        match value {
            toml::Value::Table(inner) => flatten_into(config, &path, inner),
            other => config.set(path, scalar_to_string(other)),
        }
    }
}

fn scalar_to_string(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Array(items) => items
            .iter()
            .map(scalar_to_string)
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}

/// Destination for image resources referenced by splits
pub trait ResourceRegistry {
    /// Check if a resource key is already registered
    fn contains(&self, key: &str) -> bool;

    /// Register a resource key
    fn register(&mut self, key: &str);
}

/// Registry that only remembers which keys were registered
#[derive(Debug, Clone, Default)]
pub struct ResourceKeys {
    keys: HashSet<String>,
}

impl ResourceKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl ResourceRegistry for ResourceKeys {
    fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    fn register(&mut self, key: &str) {
        if self.keys.insert(key.to_string()) {
            log::debug!("Registered resource '{}'", key);
        }
    }
}

/// Build split specs from `split.<id>.<field>` entries
///
/// Splits are created in the order their id is first seen. Nothing is
/// returned and no resource is registered unless every recognized field
/// parses.
pub fn map_splits(
    config: &KeyValueConfig,
    resources: &mut dyn ResourceRegistry,
) -> Result<Vec<SplitSpec>> {
    let mut specs: Vec<SplitSpec> = Vec::new();
    let mut by_id: HashMap<&str, usize> = HashMap::new();
    let mut new_images: Vec<&str> = Vec::new();

    for (key, value) in config.iter() {
        let mut parts = key.splitn(3, '.');
        let (Some("split"), Some(id), Some(field)) = (parts.next(), parts.next(), parts.next())
        else {
            continue;
        };

        let position = *by_id.entry(id).or_insert_with(|| {
            specs.push(SplitSpec::new(id));
            specs.len() - 1
        });
        let spec = &mut specs[position];

        match field {
            "name" => spec.name = value.to_string(),
            "image" => {
                spec.image = value.to_string();
                if !resources.contains(value) && !new_images.contains(&value) {
                    new_images.push(value);
                }
            }
            "short" => {
                spec.shortcuts = value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect();
            }
            "best" => {
                spec.records.best = parse_duration(value)
                    .map_err(|e| SplitsError::config_parse(key, value, e))?;
            }
            "average" => {
                spec.records.average = parse_duration(value)
                    .map_err(|e| SplitsError::config_parse(key, value, e))?;
            }
            "attempts" => {
                spec.records.attempts = value
                    .trim()
                    .parse::<u32>()
                    .map_err(|e| SplitsError::config_parse(key, value, e))?;
            }
            other => log::debug!("Ignoring unknown split field '{}'", other),
        }
    }

    for image in new_images {
        resources.register(image);
    }

    Ok(specs)
}

/// A loaded configuration: settings plus the merged key/value entries
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    pub settings: GeneralSettings,
    pub entries: KeyValueConfig,
}

impl ConfigFile {
    /// Parse config text without touching the filesystem
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let table: toml::Table = text.parse()?;

        let settings = match table.get("general") {
            Some(general) => general
                .clone()
                .try_into::<GeneralSettings>()
                .map_err(|e| SplitsError::InvalidSettings(e.to_string()))?,
            None => GeneralSettings::default(),
        };

        Ok(Self {
            settings,
            entries: KeyValueConfig::from_table(&table),
        })
    }

    /// Load a config file and merge its record file on top
    ///
    /// A record file that is configured but missing is skipped.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&text)?;
        log::info!("Loaded config from {}", path.display());

        if let Some(record_file) = config.record_path(path) {
            match fs::read_to_string(&record_file) {
                Ok(records) => {
                    config.entries.merge(&KeyValueConfig::from_toml_str(&records)?);
                    log::info!("Merged records from {}", record_file.display());
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    log::warn!("Record file {} not found, starting fresh", record_file.display());
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(config)
    }

    /// Record file path, relative paths resolved against the config's directory
    pub fn record_path(&self, config_path: &Path) -> Option<PathBuf> {
        let record_file = self.settings.record_file.as_ref()?;
        if record_file.is_absolute() {
            return Some(record_file.clone());
        }
        Some(match config_path.parent() {
            Some(dir) => dir.join(record_file),
            None => record_file.clone(),
        })
    }
}
