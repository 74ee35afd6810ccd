//! Snapshot of the merge tree layout used to feed compaction pickers.
//!
//! Level 0 holds freshly flushed files whose key ranges may overlap, so each
//! file forms its own sorted run. Every deeper level holds at most one sorted
//! run.

use std::sync::Arc;

use thiserror::Error;

use crate::{
    compaction::{max_level, ConfigError},
    file::DataFileMeta,
    observability::log_trace,
    run::{LevelSortedRun, SortedRun},
};

/// Error raised when a run is placed outside the tree.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LevelsError {
    /// Level index does not exist in this tree.
    #[error("level {level} is out of range for a tree with {num_levels} levels")]
    LevelOutOfRange {
        /// Requested level.
        level: usize,
        /// Number of levels in the tree.
        num_levels: usize,
    },
    /// Level 0 is populated file by file, not with a whole run.
    #[error("level 0 cannot hold a single sorted run")]
    Level0Run,
}

/// Files and runs of a merge tree, grouped by level.
#[derive(Clone, Debug)]
pub struct Levels {
    level0: Vec<Arc<DataFileMeta>>,
    levels: Vec<SortedRun>,
}

impl Levels {
    /// Create an empty tree with `num_levels` levels.
    pub fn new(num_levels: usize) -> Result<Self, ConfigError> {
        if num_levels == 0 {
            return Err(ConfigError::ZeroLevels);
        }
        Ok(Self {
            level0: Vec::new(),
            levels: vec![SortedRun::empty(); num_levels - 1],
        })
    }

    /// Add a flushed file to level 0, keeping the newest file first.
    pub fn add_level0_file(&mut self, file: Arc<DataFileMeta>) {
        let seq = file.max_sequence_number();
        let pos = self
            .level0
            .partition_point(|existing| existing.max_sequence_number() > seq);
        self.level0.insert(pos, file);
    }

    /// Replace the run stored at `level` (1 or deeper).
    pub fn set_run(&mut self, level: usize, run: SortedRun) -> Result<(), LevelsError> {
        if level == 0 {
            return Err(LevelsError::Level0Run);
        }
        let num_levels = self.number_of_levels();
        let slot = self
            .levels
            .get_mut(level - 1)
            .ok_or(LevelsError::LevelOutOfRange { level, num_levels })?;
        *slot = run;
        Ok(())
    }

    /// Files in level 0, newest first.
    pub fn level0(&self) -> &[Arc<DataFileMeta>] {
        &self.level0
    }

    /// Total number of levels, level 0 included.
    pub fn number_of_levels(&self) -> usize {
        self.levels.len() + 1
    }

    /// Index of the deepest level.
    pub fn max_level(&self) -> usize {
        max_level(self.number_of_levels())
    }

    /// Number of sorted runs currently in the tree.
    pub fn number_of_sorted_runs(&self) -> usize {
        self.level0.len() + self.levels.iter().filter(|run| !run.is_empty()).count()
    }

    /// Sorted runs ordered from newest to oldest, as expected by pickers.
    pub fn level_sorted_runs(&self) -> Vec<LevelSortedRun> {
        let mut runs = Vec::with_capacity(self.number_of_sorted_runs());
        for file in &self.level0 {
            runs.push(LevelSortedRun::new(0, SortedRun::from_single(Arc::clone(file))));
        }
        for (idx, run) in self.levels.iter().enumerate() {
            if !run.is_empty() {
                runs.push(LevelSortedRun::new(idx + 1, run.clone()));
            }
        }
        log_trace!(
            component = "levels",
            event = "level_sorted_runs",
            runs = runs.len(),
        );
        runs
    }
}
