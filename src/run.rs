//! Sorted runs and their placement within the level hierarchy.

use std::sync::Arc;

use thiserror::Error;

use crate::file::DataFileMeta;

/// Error raised when a sorted run violates its ordering invariant.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SortedRunError {
    /// File at `index` starts at or before the end of the file preceding it.
    #[error("file {index} of sorted run overlaps with or precedes the file before it")]
    Overlap {
        /// Position of the offending file within the run.
        index: usize,
    },
}

/// Ordered collection of data files whose key ranges do not overlap.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SortedRun {
    files: Vec<Arc<DataFileMeta>>,
    total_size: u64,
}

impl SortedRun {
    /// A run without files.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A run made of exactly one file.
    pub fn from_single(file: Arc<DataFileMeta>) -> Self {
        Self::from_sorted(vec![file])
    }

    /// Build a run from files already ordered by key.
    pub fn from_sorted(files: Vec<Arc<DataFileMeta>>) -> Self {
        let total_size = files.iter().map(|file| file.file_size()).sum();
        Self { files, total_size }
    }

    /// Build a run from files in arbitrary order, sorting them by their smallest key.
    pub fn from_unsorted(mut files: Vec<Arc<DataFileMeta>>) -> Self {
        files.sort_by(|lhs, rhs| lhs.min_key().cmp(rhs.min_key()));
        Self::from_sorted(files)
    }

    /// Files in key order.
    pub fn files(&self) -> &[Arc<DataFileMeta>] {
        &self.files
    }

    /// Returns `true` if the run holds no files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Sum of the byte sizes of every file in the run.
    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    /// Check that each file starts strictly after the previous one ends.
    pub fn validate(&self) -> Result<(), SortedRunError> {
        for (index, pair) in self.files.windows(2).enumerate() {
            if pair[1].min_key() <= pair[0].max_key() {
                return Err(SortedRunError::Overlap { index: index + 1 });
            }
        }
        Ok(())
    }
}

/// A sorted run tagged with the level it currently resides at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelSortedRun {
    level: usize,
    run: SortedRun,
}

impl LevelSortedRun {
    /// Place `run` at `level`.
    pub fn new(level: usize, run: SortedRun) -> Self {
        Self { level, run }
    }

    /// Level holding the run.
    pub fn level(&self) -> usize {
        self.level
    }

    /// The run itself.
    pub fn run(&self) -> &SortedRun {
        &self.run
    }
}
