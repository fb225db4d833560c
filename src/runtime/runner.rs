//! Redraw loop and command application

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use super::command::Command;
use super::console::CommandConsole;
use super::state::{AppState, ShutdownSignal};
use crate::config::{map_splits, ConfigFile, GeneralSettings, ResourceKeys, ResourceRegistry};
use crate::records::save_records;
use crate::splits::{RenderView, SplitCollection};
use crate::timer::{MonotonicClock, SharedClock};
use crate::{Result, SplitsError};

/// Something that draws a snapshot of the splits
pub trait Renderer {
    fn draw(&mut self, view: &RenderView);
}

impl<F: FnMut(&RenderView)> Renderer for F {
    fn draw(&mut self, view: &RenderView) {
        self(view)
    }
}

/// Owns the splits and runs the redraw loop
///
/// The collection is only ever touched from the thread calling
/// [`run`](Self::run). Other threads, the console included, send
/// [`Command`]s through [`sender`](Self::sender) and the loop applies them
/// between frames.
pub struct SplitTimer {
    config: ConfigFile,
    record_path: Option<PathBuf>,
    collection: SplitCollection,
    resources: Box<dyn ResourceRegistry>,
    commands_tx: Sender<Command>,
    commands: Receiver<Command>,
    shutdown: ShutdownSignal,
    console: Option<CommandConsole>,
    state: AppState,
}

impl SplitTimer {
    /// Build the splits from a loaded config
    pub fn new(config: ConfigFile, clock: SharedClock) -> Result<Self> {
        Self::with_resources(config, clock, Box::new(ResourceKeys::new()))
    }

    /// Like [`new`](Self::new), registering split images with `resources`
    pub fn with_resources(
        config: ConfigFile,
        clock: SharedClock,
        mut resources: Box<dyn ResourceRegistry>,
    ) -> Result<Self> {
        let specs = map_splits(&config.entries, resources.as_mut())?;
        let collection = SplitCollection::from_specs(clock, specs);
        log::info!("Loaded {} splits", collection.len());

        let (commands_tx, commands) = crossbeam_channel::unbounded();
        let shutdown = ShutdownSignal::new(commands_tx.clone());

        Ok(Self {
            record_path: config.settings.record_file.clone(),
            config,
            collection,
            resources,
            commands_tx,
            commands,
            shutdown,
            console: None,
            state: AppState::Idle,
        })
    }

    /// Load a config file and build the splits, timed by the system clock
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config = ConfigFile::load(path)?;
        let record_path = config.record_path(path);
        let mut timer = Self::new(config, Arc::new(MonotonicClock))?;
        timer.record_path = record_path;
        Ok(timer)
    }

    pub fn settings(&self) -> &GeneralSettings {
        &self.config.settings
    }

    /// Override the redraw interval used while a timer runs
    pub fn set_render_wait(&mut self, wait: Duration) {
        self.config.settings.render_wait = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX);
    }

    fn render_wait(&self) -> Duration {
        Duration::from_millis(self.config.settings.render_wait)
    }

    /// Where `save` writes records
    pub fn record_path(&self) -> Option<&Path> {
        self.record_path.as_deref()
    }

    pub fn collection(&self) -> &SplitCollection {
        &self.collection
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    /// Channel for feeding commands into the loop
    pub fn sender(&self) -> Sender<Command> {
        self.commands_tx.clone()
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.clone()
    }

    /// Start reading commands from `input` on a background thread
    pub fn start_console<R>(&mut self, input: R) -> Result<()>
    where
        R: BufRead + Send + 'static,
    {
        if self.console.is_some() {
            log::warn!("Console already running");
            return Ok(());
        }
        let console =
            CommandConsole::spawn(input, self.commands_tx.clone(), self.shutdown.clone())?;
        self.console = Some(console);
        Ok(())
    }

    /// Apply one command to the splits
    ///
    /// On error the splits are left as they were.
    pub fn apply(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Quit => {
                self.state = AppState::Terminating;
                self.shutdown.trigger();
            }
            Command::Start => self.collection.start_active(),
            Command::Stop => self.collection.stop_active(),
            Command::Reset => self.reset()?,
            Command::Save => self.save()?,
            Command::Activate(token) => {
                let position = self.collection.resolve(&token)?;
                log::info!("Switching active split to '{}'", token);
                self.collection.activate(position)?;
            }
        }
        Ok(())
    }

    /// Zero every timer and rebuild the splits from config
    ///
    /// Records gathered this session survive for every split that still
    /// exists after the rebuild.
    fn reset(&mut self) -> Result<()> {
        let specs = map_splits(&self.config.entries, self.resources.as_mut())?;
        let records = self.collection.records_by_id();

        self.collection.reset_timers();
        self.collection.rebuild(specs);
        self.collection.restore_records(&records);

        log::info!("Reset {} splits", self.collection.len());
        Ok(())
    }

    fn save(&self) -> Result<()> {
        match &self.record_path {
            Some(path) => save_records(path, &self.collection.record_snapshot()),
            None => {
                log::warn!("No general.record_file configured, nothing saved");
                Ok(())
            }
        }
    }

    fn dispatch(&mut self, command: Command) {
        match self.apply(command) {
            Ok(()) => {}
            Err(SplitsError::UnknownReference(token)) => {
                log::warn!("Unknown command '{}'", token);
            }
            Err(e) => log::error!("Command failed: {}", e),
        }
    }

    /// Run the redraw loop until shutdown
    ///
    /// While a timer runs the loop redraws every `render_wait`; otherwise it
    /// blocks until a command arrives. Pending commands are applied in
    /// order before the next frame. On exit the console is joined.
    pub fn run(&mut self, renderer: &mut dyn Renderer) {
        while self.state != AppState::Terminating {
            renderer.draw(&self.collection.view());

            let next = if self.collection.running() {
                self.state = AppState::Running;
                match self.commands.recv_timeout(self.render_wait()) {
                    Ok(command) => Some(command),
                    Err(RecvTimeoutError::Timeout) => None,
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            } else {
                self.state = AppState::Idle;
                match self.commands.recv() {
                    Ok(command) => Some(command),
                    Err(_) => break,
                }
            };

            let Some(command) = next else {
                continue;
            };
            self.dispatch(command);
            while self.state != AppState::Terminating {
                match self.commands.try_recv() {
                    Ok(command) => self.dispatch(command),
                    Err(_) => break,
                }
            }
        }

        self.state = AppState::Terminating;
        self.finish();
    }

    /// Join the console worker; safe to call repeatedly
    pub fn finish(&mut self) {
        if let Some(mut console) = self.console.take() {
            console.join();
        }
    }
}

impl Drop for SplitTimer {
    fn drop(&mut self) {
        self.finish();
    }
}
