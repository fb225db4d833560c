//! A single timed segment and its history

use std::fmt;
use std::time::Duration;

use crate::duration::format_duration;
use crate::timer::{SharedClock, Timer};

/// Historical performance for one split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Records {
    pub best: Duration,
    pub average: Duration,
    pub attempts: u32,
}

impl Records {
    /// Fold a finished attempt into the history
    pub fn complete(&mut self, duration: Duration) {
        self.attempts = self.attempts.saturating_add(1);

        if self.attempts == 1 {
            self.best = duration;
            self.average = duration;
            return;
        }

        self.best = self.best.min(duration);

        // Incremental mean, in signed milliseconds so it can move either way
        let average = self.average.as_millis() as i128;
        let delta = (duration.as_millis() as i128 - average) / self.attempts as i128;
        self.average = Duration::from_millis((average + delta).max(0) as u64);
    }
}

/// Everything needed to build a split, as read from configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SplitSpec {
    /// Stable key (`<id>` in `split.<id>.<field>`)
    pub id: String,
    /// Display name
    pub name: String,
    /// Resource key of the split's image
    pub image: String,
    /// Alternative tokens that activate this split
    pub shortcuts: Vec<String>,
    pub records: Records,
}

impl SplitSpec {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Add activation shortcuts
    pub fn with_shortcuts<I, S>(mut self, shortcuts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.shortcuts.extend(shortcuts.into_iter().map(Into::into));
        self
    }

    pub fn with_records(mut self, records: Records) -> Self {
        self.records = records;
        self
    }
}

/// A named segment owning its timer and records
#[derive(Debug, Clone)]
pub struct Split {
    pub id: String,
    pub name: String,
    pub image: String,
    pub shortcuts: Vec<String>,
    pub timer: Timer,
    pub records: Records,
}

impl Split {
    /// Build a stopped split from its spec
    pub fn from_spec(spec: SplitSpec, clock: SharedClock) -> Self {
        Self {
            id: spec.id,
            name: spec.name,
            image: spec.image,
            shortcuts: spec.shortcuts,
            timer: Timer::new(clock),
            records: spec.records,
        }
    }

    /// Check if `token` is one of this split's shortcuts
    pub fn has_shortcut(&self, token: &str) -> bool {
        self.shortcuts.iter().any(|s| s == token)
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Split name:     {}", self.name)?;
        writeln!(f, "Image:          {}", self.image)?;
        writeln!(
            f,
            "Timer active:   {}",
            if self.timer.running() { "yes" } else { "no" }
        )?;
        writeln!(f, "Current time:   {}", format_duration(self.timer.current()))?;
        writeln!(f, "Best time:      {}", format_duration(self.records.best))?;
        writeln!(f, "Average time:   {}", format_duration(self.records.average))?;
        writeln!(f, "Attempts:       {}", self.records.attempts)
    }
}
