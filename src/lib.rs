//! NYA Core Splits
//!
//! A split timer engine: an ordered list of named splits, each with its own
//! stopwatch and best/average history, where the split at the front is the
//! one being timed.
//!
//! - `duration` - `H:MM:SS.CC` formatting and parsing
//! - `timer` - per-split stopwatch and the clock it reads
//! - `splits` - splits, records and the ordered collection
//! - `config` - TOML loading and the config-to-splits mapping
//! - `records` - writing records back out
//! - `runtime` - commands, the console worker and the redraw loop

pub mod config;
pub mod duration;
pub mod records;
pub mod runtime;
pub mod splits;
pub mod timer;

pub use config::{
    map_splits, ConfigFile, GeneralSettings, KeyValueConfig, ResourceKeys, ResourceRegistry,
};
pub use duration::{format_duration, parse_duration, ParseDurationError};
pub use runtime::{AppState, Command, CommandConsole, Renderer, ShutdownSignal, SplitTimer};
pub use splits::{
    RecordSnapshot, Records, RenderView, Split, SplitCollection, SplitSpec, SplitView,
};
pub use timer::{Clock, ManualClock, MonotonicClock, SharedClock, Timer, TimerState};

use std::fmt::Display;
use thiserror::Error;

/// Errors produced by the split timer
#[derive(Debug, Error)]
pub enum SplitsError {
    /// A recognized config field failed to parse
    #[error("invalid value '{value}' for '{key}': {reason}")]
    ConfigParse {
        key: String,
        value: String,
        reason: String,
    },

    /// The `[general]` table has the wrong shape
    #[error("invalid general settings: {0}")]
    InvalidSettings(String),

    /// A command token matched no split name or shortcut
    #[error("unknown command '{0}'")]
    UnknownReference(String),

    #[error("no split at position {0}")]
    InvalidPosition(usize),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML write error: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SplitsError {
    /// Config parse error for `key = value`
    pub fn config_parse(key: &str, value: &str, reason: impl Display) -> Self {
        Self::ConfigParse {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Result type for split timer operations
pub type Result<T> = std::result::Result<T, SplitsError>;
