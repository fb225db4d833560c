//! Application lifecycle and the shutdown signal

use crossbeam_channel::Sender;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::command::Command;

/// What the redraw loop is currently doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppState {
    /// A timer runs; redraws on a fixed interval
    Running,
    /// Nothing runs; blocked until a command arrives
    #[default]
    Idle,
    /// Shutdown observed; unwinding the loop and the console
    Terminating,
}

/// Shutdown request shared by the redraw loop and the console worker
///
/// Triggering it also pushes a `Quit` into the command channel, so a redraw
/// loop blocked waiting for commands wakes up immediately.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    triggered: Arc<AtomicBool>,
    wake: Sender<Command>,
}

impl ShutdownSignal {
    pub fn new(wake: Sender<Command>) -> Self {
        Self {
            triggered: Arc::new(AtomicBool::new(false)),
            wake,
        }
    }

    /// Request shutdown; later calls do nothing
    pub fn trigger(&self) {
        if !self.triggered.swap(true, Ordering::SeqCst) {
            log::info!("Shutdown requested");
            // The receiver may already be gone during teardown
            let _ = self.wake.send(Command::Quit);
        }
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_wakes_once() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let signal = ShutdownSignal::new(tx);
        let clone = signal.clone();

        assert!(!signal.is_triggered());
        clone.trigger();
        clone.trigger();
        signal.trigger();

        assert!(signal.is_triggered());
        assert_eq!(rx.try_recv(), Ok(Command::Quit));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_trigger_after_receiver_dropped() {
        let (tx, rx) = crossbeam_channel::unbounded();
        drop(rx);
        let signal = ShutdownSignal::new(tx);
        signal.trigger();
        assert!(signal.is_triggered());
    }

    #[test]
    fn test_default_state_is_idle() {
        assert_eq!(AppState::default(), AppState::Idle);
    }
}
