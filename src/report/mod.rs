//! Result of a synchronisation run and its rendering for the terminal.

mod sync_report;

pub use sync_report::{PlaceholderEntry, SyncReport};
