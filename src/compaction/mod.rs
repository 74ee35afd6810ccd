//! Compaction pickers for the merge tree.
//!
//! A picker inspects the ordered list of sorted runs (newest first, deepest
//! last) and decides which prefix, if any, should be merged next and at which
//! level the merged output belongs. Executing the merge is left to the caller.

/// Errors raised while building pickers from configuration.
mod error;
/// Strategy selection and dispatch.
pub mod planner;
/// Universal (size-tiered) compaction picker.
pub mod universal;

use std::sync::Arc;

pub use error::ConfigError;
pub use planner::{CompactStrategyKind, CompactionStrategy};
pub use universal::{UniversalCompaction, UniversalOptions};

use crate::{file::DataFileMeta, levels::Levels, run::LevelSortedRun};

/// Abstract compaction picker interface to support selectable strategies.
pub trait CompactStrategy {
    /// Examine the ordered runs and return the next compaction, if any.
    ///
    /// `runs` is ordered from the newest run (index 0) to the oldest. The
    /// slice is never modified and no reference to it is retained.
    fn pick(&self, num_levels: usize, runs: &[LevelSortedRun]) -> Option<CompactUnit>;

    /// Merge every run into the deepest level regardless of thresholds.
    ///
    /// Returns `None` when there is nothing to merge: no runs at all, or a
    /// single run already sitting at the deepest level.
    fn pick_full(&self, num_levels: usize, runs: &[LevelSortedRun]) -> Option<CompactUnit> {
        let max_level = max_level(num_levels);
        match runs {
            [] => None,
            [only] if only.level() == max_level => None,
            _ => Some(CompactUnit::from_level_runs(max_level, runs.to_vec())),
        }
    }

    /// Run [`CompactStrategy::pick`] against a levels snapshot.
    fn pick_from(&self, levels: &Levels) -> Option<CompactUnit> {
        self.pick(levels.number_of_levels(), &levels.level_sorted_runs())
    }
}

/// Deepest level index for a tree of `num_levels` levels.
pub(crate) fn max_level(num_levels: usize) -> usize {
    debug_assert!(num_levels >= 1, "a merge tree has at least one level");
    num_levels.saturating_sub(1)
}

/// Outcome of a pick: the runs to merge and the level receiving the output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompactUnit {
    output_level: usize,
    runs: Vec<LevelSortedRun>,
}

impl CompactUnit {
    /// Build a unit merging `runs` into `output_level`.
    pub fn from_level_runs(output_level: usize, runs: Vec<LevelSortedRun>) -> Self {
        Self { output_level, runs }
    }

    /// Level that will receive the merged run.
    pub fn output_level(&self) -> usize {
        self.output_level
    }

    /// Runs selected for merging, newest first.
    pub fn runs(&self) -> &[LevelSortedRun] {
        &self.runs
    }

    /// Data files of every selected run, in run order.
    pub fn files(&self) -> impl Iterator<Item = &Arc<DataFileMeta>> + '_ {
        self.runs.iter().flat_map(|level_run| level_run.run().files())
    }

    /// Combined byte size of the selected runs.
    pub fn total_size(&self) -> u64 {
        self.runs.iter().map(|level_run| level_run.run().total_size()).sum()
    }

    /// Combined row count of the selected files.
    pub fn row_count(&self) -> u64 {
        self.files().map(|file| file.row_count()).sum()
    }
}
