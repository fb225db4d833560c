//! Split tracking
//!
//! - `Split` / `Records` - one timed segment and its history
//! - `SplitCollection` - ordered splits with the active one at the front
//! - `RenderView` / `RecordSnapshot` - read-only snapshots for renderers and persistence

mod collection;
mod split;
mod view;

pub use collection::SplitCollection;
pub use split::{Records, Split, SplitSpec};
pub use view::{RecordSnapshot, RenderView, SplitView};
