//! Runtime: commands, the console worker and the redraw loop
//!
//! - `Command` - a parsed console line
//! - `CommandConsole` - worker thread reading lines into commands
//! - `SplitTimer` - owns the splits and applies commands between frames
//! - `ShutdownSignal` / `AppState` - lifecycle shared by the two threads

mod command;
mod console;
mod runner;
mod state;

pub use command::Command;
pub use console::CommandConsole;
pub use runner::{Renderer, SplitTimer};
pub use state::{AppState, ShutdownSignal};
