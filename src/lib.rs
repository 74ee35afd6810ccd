#![deny(missing_docs)]
//! Compaction picking for LSM merge trees.
//!
//! The engine hands a picker the current sorted runs, ordered from the newest
//! (shallowest) to the oldest (deepest). The picker answers which prefix of
//! those runs should be merged next and which level the merged run belongs
//! to. Reading and writing files, scheduling the merge, and persisting the
//! resulting layout stay with the caller.
//!
//! ```
//! use std::sync::Arc;
//!
//! use mergetree_compact::{
//!     compaction::{CompactStrategy, UniversalCompaction},
//!     file::{DataFileMeta, FileId},
//!     run::{LevelSortedRun, SortedRun},
//! };
//!
//! let run = |level, size| {
//!     let file = DataFileMeta::new(FileId::new(), size, "a", "z");
//!     LevelSortedRun::new(level, SortedRun::from_single(Arc::new(file)))
//! };
//! let runs = vec![run(0, 10), run(0, 10), run(0, 10), run(0, 10), run(4, 100)];
//!
//! let unit = UniversalCompaction::new(200, 1, 5)
//!     .pick(5, &runs)
//!     .expect("comparable runs are merged");
//! assert_eq!(unit.output_level(), 3);
//! assert_eq!(unit.runs().len(), 4);
//! ```

mod observability;

/// Compaction pickers and their results.
pub mod compaction;
/// Data file metadata.
pub mod file;
/// Level layout snapshots.
pub mod levels;
/// Sorted runs.
pub mod run;

pub use crate::{
    compaction::{CompactStrategy, CompactUnit, CompactionStrategy, UniversalCompaction},
    levels::Levels,
    run::{LevelSortedRun, SortedRun},
};
