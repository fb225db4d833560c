//! Line-command console worker

use crossbeam_channel::Sender;
use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use super::command::Command;
use super::state::ShutdownSignal;
use crate::Result;

/// Background thread turning input lines into commands
///
/// Commands go over a channel to the redraw loop; the worker never touches
/// the splits itself. `quit` and end of input trigger the shutdown signal.
pub struct CommandConsole {
    worker: Option<JoinHandle<()>>,
    /// Set once the worker has left its read loop for good
    leaving: Arc<AtomicBool>,
}

impl CommandConsole {
    /// Spawn the worker reading from `input`
    pub fn spawn<R>(input: R, commands: Sender<Command>, shutdown: ShutdownSignal) -> Result<Self>
    where
        R: BufRead + Send + 'static,
    {
        let leaving = Arc::new(AtomicBool::new(false));
        let worker_leaving = leaving.clone();

        let handle = thread::Builder::new()
            .name("split-console".to_string())
            .spawn(move || {
                let shut_down = run_console(input, commands, &shutdown);
                // Must be visible before the redraw loop can see the shutdown
                worker_leaving.store(true, Ordering::SeqCst);
                if shut_down {
                    shutdown.trigger();
                }
            })?;

        log::info!("Console started");
        Ok(Self {
            worker: Some(handle),
            leaving,
        })
    }

    /// Check if the worker has stopped reading
    pub fn is_leaving(&self) -> bool {
        self.leaving.load(Ordering::SeqCst)
    }

    /// Wait for the worker to exit
    ///
    /// Safe to call more than once. A worker still blocked on input (the
    /// shutdown came from elsewhere) cannot be interrupted, so it is
    /// detached rather than waited on.
    pub fn join(&mut self) {
        let Some(handle) = self.worker.take() else {
            return;
        };

        if !self.is_leaving() && !handle.is_finished() {
            log::warn!("Console is still waiting for input, detaching it");
            return;
        }

        if handle.join().is_err() {
            log::error!("Console worker panicked");
        } else {
            log::debug!("Console worker joined");
        }
    }
}

impl Drop for CommandConsole {
    fn drop(&mut self) {
        self.join();
    }
}

/// Read until `quit` or end of input
///
/// Returns whether the shutdown signal should be triggered.
fn run_console<R: BufRead>(
    mut input: R,
    commands: Sender<Command>,
    shutdown: &ShutdownSignal,
) -> bool {
    let mut line = String::new();

    while !shutdown.is_triggered() {
        line.clear();
        match input.read_line(&mut line) {
            Ok(0) => {
                log::info!("Console input closed");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                log::error!("Console read failed: {}", e);
                break;
            }
        }

        let Some(command) = Command::parse(&line) else {
            continue;
        };
        log::debug!("Console command: {:?}", command);

        if command == Command::Quit {
            break;
        }
        if commands.send(command).is_err() {
            // Redraw loop is gone
            return false;
        }
    }

    true
}
