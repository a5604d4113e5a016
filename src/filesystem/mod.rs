//! Directory-tree placeholder handling.
//!
//! [`TreePlaceholderSynchronizer`] walks a root directory and makes sure every
//! directory below it, the root included, carries a marker file so that
//! version control keeps otherwise-empty directories. [`Skeleton`] creates a
//! fixed set of project directories ahead of that walk.

mod directory_node;
mod marker;
mod skeleton;
mod synchronizer;

pub use directory_node::{DirectoryNode, PlaceholderStatus};
pub use marker::{InvalidMarkerName, MarkerName};
pub use skeleton::{InvalidSkeletonPath, MaterializeError, Skeleton};
pub use synchronizer::{SynchronizeError, TreePlaceholderSynchronizer};
