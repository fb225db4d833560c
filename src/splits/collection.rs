//! Ordered split list with a single active position

use std::collections::HashMap;
use std::time::Duration;

use super::split::{Records, Split, SplitSpec};
use super::view::{RecordSnapshot, RenderView, SplitView};
use crate::duration::format_duration;
use crate::timer::SharedClock;
use crate::{Result, SplitsError};

/// Ordered splits plus a name index
///
/// Position 0 is the active split and the only one whose timer may run.
/// Every reorder goes through [`SplitCollection::activate`] or
/// [`SplitCollection::rebuild`], both of which keep the index in step.
#[derive(Debug)]
pub struct SplitCollection {
    clock: SharedClock,
    splits: Vec<Split>,
    /// Display name -> current position
    index: HashMap<String, usize>,
}

impl SplitCollection {
    /// Create an empty collection timed by `clock`
    pub fn new(clock: SharedClock) -> Self {
        Self {
            clock,
            splits: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Create a collection from split specs
    pub fn from_specs(clock: SharedClock, specs: Vec<SplitSpec>) -> Self {
        let mut collection = Self::new(clock);
        collection.rebuild(specs);
        collection
    }

    pub fn len(&self) -> usize {
        self.splits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.splits.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&Split> {
        self.splits.get(position)
    }

    /// The active split
    pub fn active(&self) -> Option<&Split> {
        self.splits.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Split> {
        self.splits.iter()
    }

    /// Check if any timer is running
    pub fn running(&self) -> bool {
        self.splits.iter().any(|s| s.timer.running())
    }

    /// Resolve a name or shortcut to a position
    ///
    /// Names win over shortcuts; among shortcuts the first split in the
    /// current order wins.
    pub fn find(&self, token: &str) -> Option<usize> {
        if let Some(&position) = self.index.get(token) {
            return Some(position);
        }
        self.splits.iter().position(|s| s.has_shortcut(token))
    }

    /// Like [`find`](Self::find), but reports a miss as an error
    pub fn resolve(&self, token: &str) -> Result<usize> {
        self.find(token)
            .ok_or_else(|| SplitsError::UnknownReference(token.to_string()))
    }

    /// Make the split at `position` the active one
    ///
    /// The running active split is stopped and its records completed, the
    /// target's timer starts, and the target moves to the front with every
    /// other split keeping its relative order.
    pub fn activate(&mut self, position: usize) -> Result<()> {
        if position >= self.splits.len() {
            return Err(SplitsError::InvalidPosition(position));
        }
        if position == 0 {
            return Ok(());
        }

        let previous = &mut self.splits[0];
        if previous.timer.running() {
            previous.timer.stop();
            let elapsed = previous.timer.current();
            previous.records.complete(elapsed);
        }

        self.splits[position].timer.start();
        self.splits[..=position].rotate_right(1);
        self.reindex(0..=position);

        log::debug!("Activated split '{}'", self.splits[0].name);
        Ok(())
    }

    /// Start the active split's timer
    pub fn start_active(&mut self) {
        if let Some(split) = self.splits.first_mut() {
            split.timer.start();
        }
    }

    /// Stop the active split's timer
    pub fn stop_active(&mut self) {
        if let Some(split) = self.splits.first_mut() {
            split.timer.stop();
        }
    }

    /// Stop and zero every timer
    pub fn reset_timers(&mut self) {
        for split in &mut self.splits {
            split.timer.stop();
            split.timer.reset();
        }
    }

    /// Replace every split and the whole index
    pub fn rebuild(&mut self, specs: Vec<SplitSpec>) {
        let clock = &self.clock;
        self.splits = specs
            .into_iter()
            .map(|spec| Split::from_spec(spec, clock.clone()))
            .collect();
        self.index = HashMap::with_capacity(self.splits.len());
        self.reindex(0..self.splits.len());
    }

    /// Overwrite records of splits whose id appears in `records`
    pub fn restore_records(&mut self, records: &HashMap<String, Records>) {
        for split in &mut self.splits {
            if let Some(saved) = records.get(&split.id) {
                split.records = *saved;
            }
        }
    }

    /// Records keyed by split id
    pub fn records_by_id(&self) -> HashMap<String, Records> {
        self.splits
            .iter()
            .map(|s| (s.id.clone(), s.records))
            .collect()
    }

    pub fn total_current(&self) -> Duration {
        self.splits.iter().map(|s| s.timer.current()).sum()
    }

    pub fn total_best(&self) -> Duration {
        self.splits.iter().map(|s| s.records.best).sum()
    }

    pub fn total_average(&self) -> Duration {
        self.splits.iter().map(|s| s.records.average).sum()
    }

    /// Records of every split, in current order
    pub fn record_snapshot(&self) -> Vec<RecordSnapshot> {
        self.splits
            .iter()
            .map(|s| RecordSnapshot {
                id: s.id.clone(),
                best: s.records.best,
                average: s.records.average,
                attempts: s.records.attempts,
            })
            .collect()
    }

    /// Display data for a renderer
    pub fn view(&self) -> RenderView {
        RenderView {
            splits: self
                .splits
                .iter()
                .map(|s| SplitView {
                    name: s.name.clone(),
                    image: s.image.clone(),
                    current: format_duration(s.timer.current()),
                    best: format_duration(s.records.best),
                    average: format_duration(s.records.average),
                    attempts: s.records.attempts,
                    running: s.timer.running(),
                })
                .collect(),
            total: format_duration(self.total_current()),
            total_best: format_duration(self.total_best()),
            total_average: format_duration(self.total_average()),
        }
    }

    /// Point the index at the current positions in `range`
    ///
    /// Unnamed splits are not indexed. With duplicate names the earliest
    /// position wins.
    fn reindex(&mut self, range: impl Iterator<Item = usize>) {
        for position in range {
            let name = &self.splits[position].name;
            if name.is_empty() {
                continue;
            }
            let earlier_duplicate = matches!(
                self.index.get(name),
                Some(&existing) if existing < position && self.splits[existing].name == *name
            );
            if !earlier_duplicate {
                self.index.insert(name.clone(), position);
            }
        }
    }
}
