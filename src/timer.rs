//! Per-split stopwatch

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Source of monotonic time for timers
pub trait Clock: Send + Sync + fmt::Debug {
    /// Current instant
    fn now(&self) -> Instant;
}

/// Clock backed by `Instant::now`
#[derive(Debug, Default, Clone, Copy)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to
///
/// Clones share the same time, so a test can keep one handle and give
/// another to the collection under test.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(Instant::now())),
        }
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock()
    }
}

/// Shared handle to a clock
pub type SharedClock = Arc<dyn Clock>;

/// Stopwatch state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Stopped,
    /// Running since the anchor instant
    Running { anchor: Instant },
}

/// Stopwatch with millisecond resolution
///
/// `accumulated` only changes when the timer stops or is reset. All
/// operations are total.
#[derive(Debug, Clone)]
pub struct Timer {
    clock: SharedClock,
    state: TimerState,
    accumulated: Duration,
}

impl Timer {
    /// Create a stopped timer reading zero
    pub fn new(clock: SharedClock) -> Self {
        Self {
            clock,
            state: TimerState::Stopped,
            accumulated: Duration::ZERO,
        }
    }

    /// Check if the timer is running
    pub fn running(&self) -> bool {
        matches!(self.state, TimerState::Running { .. })
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    /// Start timing; no-op if already running
    pub fn start(&mut self) {
        if self.running() {
            return;
        }
        self.state = TimerState::Running {
            anchor: self.clock.now(),
        };
    }

    /// Stop timing and bank the elapsed time; no-op if stopped
    pub fn stop(&mut self) {
        if let TimerState::Running { anchor } = self.state {
            let elapsed = self.since(anchor);
            self.accumulated += elapsed;
            self.state = TimerState::Stopped;
        }
    }

    /// Zero the banked time
    ///
    /// The state is left alone. A running timer keeps its anchor, so it
    /// then reads only the time since it was last started.
    pub fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
    }

    /// Elapsed time, including the running stretch if any
    pub fn current(&self) -> Duration {
        match self.state {
            TimerState::Running { anchor } => self.since(anchor) + self.accumulated,
            TimerState::Stopped => self.accumulated,
        }
    }

    fn since(&self, anchor: Instant) -> Duration {
        let elapsed = self.clock.now().saturating_duration_since(anchor);
        Duration::from_millis(elapsed.as_millis() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timer() -> (ManualClock, Timer) {
        let clock = ManualClock::new();
        let timer = Timer::new(Arc::new(clock.clone()));
        (clock, timer)
    }

    #[test]
    fn test_new_timer_is_stopped_at_zero() {
        let (_, timer) = timer();
        assert!(!timer.running());
        assert_eq!(timer.current(), Duration::ZERO);
    }

    #[test]
    fn test_start_advance_stop() {
        let (clock, mut timer) = timer();
        timer.start();
        clock.advance(Duration::from_millis(500));
        timer.stop();

        assert!(!timer.running());
        assert_eq!(timer.current(), Duration::from_millis(500));

        // Stopped timers do not move
        clock.advance(Duration::from_secs(3));
        assert_eq!(timer.current(), Duration::from_millis(500));
    }

    #[test]
    fn test_accumulates_across_runs() {
        let (clock, mut timer) = timer();
        timer.start();
        clock.advance(Duration::from_millis(300));
        timer.stop();
        timer.start();
        clock.advance(Duration::from_millis(200));

        assert_eq!(timer.current(), Duration::from_millis(500));
    }

    #[test]
    fn test_start_and_stop_are_idempotent() {
        let (clock, mut timer) = timer();
        timer.start();
        clock.advance(Duration::from_millis(100));
        // Second start must not move the anchor
        timer.start();
        clock.advance(Duration::from_millis(100));
        timer.stop();
        timer.stop();

        assert_eq!(timer.current(), Duration::from_millis(200));
    }

    #[test]
    fn test_reset_after_stop() {
        let (clock, mut timer) = timer();
        timer.start();
        clock.advance(Duration::from_millis(500));
        timer.stop();
        timer.reset();

        assert_eq!(timer.current(), Duration::ZERO);
        assert!(!timer.running());
    }

    #[test]
    fn test_reset_while_running_keeps_anchor() {
        let (clock, mut timer) = timer();
        timer.start();
        clock.advance(Duration::from_millis(300));
        timer.stop();
        timer.start();
        clock.advance(Duration::from_millis(200));

        let before = timer.current();
        timer.reset();

        assert!(timer.running());
        assert!(timer.current() < before);
        assert_eq!(timer.current(), Duration::from_millis(200));
    }

    #[test]
    fn test_sub_millisecond_is_truncated() {
        let (clock, mut timer) = timer();
        timer.start();
        clock.advance(Duration::from_micros(1_999));
        assert_eq!(timer.current(), Duration::from_millis(1));
    }
}
