//! Universal compaction: a size-tiered picker trading read and space
//! amplification for lower write amplification.
//!
//! Runs are examined newest first. Three checks are applied in priority
//! order and the first one that selects something wins:
//!
//! 1. size amplification: everything above the oldest run has grown too large
//!    relative to it, so the whole tree is merged into the deepest level;
//! 2. size ratio: a prefix of runs with comparable sizes is merged together;
//! 3. run count: too many runs exist, so the smallest prefix that brings the
//!    count back within the limit is merged.

use super::{error::ConfigError, max_level, CompactStrategy, CompactUnit};
use crate::{
    observability::{log_debug, log_trace},
    run::LevelSortedRun,
};

/// Universal compaction configuration knobs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UniversalOptions {
    /// Tolerated size of all runs above the oldest one, as a percentage of the oldest run.
    pub max_size_amp: u64,
    /// Percentage by which the next run may exceed the accumulated candidate size and still join it.
    pub size_ratio: u64,
    /// Number of sorted runs that forces a compaction; also the minimum for the size checks.
    pub max_run_num: usize,
}

impl Default for UniversalOptions {
    fn default() -> Self {
        Self {
            max_size_amp: 200,
            size_ratio: 1,
            max_run_num: 5,
        }
    }
}

impl UniversalOptions {
    /// Set the size amplification percentage.
    pub fn max_size_amp(mut self, value: u64) -> Self {
        self.max_size_amp = value;
        self
    }

    /// Set the size ratio percentage.
    pub fn size_ratio(mut self, value: u64) -> Self {
        self.size_ratio = value;
        self
    }

    /// Set the sorted run limit.
    pub fn max_run_num(mut self, value: usize) -> Self {
        self.max_run_num = value;
        self
    }

    /// Default tree depth: one level per tolerated run plus the base level.
    pub fn num_levels(&self) -> usize {
        self.max_run_num + 1
    }

    /// Reject configurations the picker cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_run_num == 0 {
            return Err(ConfigError::ZeroRunNum);
        }
        Ok(())
    }
}

/// Universal compaction picker. Holds only its thresholds; every pick is a
/// pure function of them and the runs it is given.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UniversalCompaction {
    max_size_amp: u64,
    size_ratio: u64,
    max_run_num: usize,
}

impl From<UniversalOptions> for UniversalCompaction {
    fn from(options: UniversalOptions) -> Self {
        Self::new(options.max_size_amp, options.size_ratio, options.max_run_num)
    }
}

impl UniversalCompaction {
    /// Create a picker from raw thresholds.
    pub fn new(max_size_amp: u64, size_ratio: u64, max_run_num: usize) -> Self {
        Self {
            max_size_amp,
            size_ratio,
            max_run_num,
        }
    }

    fn pick_for_size_amp(&self, max_level: usize, runs: &[LevelSortedRun]) -> Option<CompactUnit> {
        if runs.len() < self.max_run_num {
            return None;
        }
        let (earliest, newer) = runs.split_last()?;

        let candidate_size: u128 = newer
            .iter()
            .map(|level_run| u128::from(level_run.run().total_size()))
            .sum();
        let earliest_run_size = u128::from(earliest.run().total_size());

        // size amplification = percentage of additional size
        if candidate_size * 100 > u128::from(self.max_size_amp) * earliest_run_size {
            log_trace!(
                component = "compaction",
                event = "size_amp_exceeded",
                candidate_size = %candidate_size,
                earliest_run_size = %earliest_run_size,
            );
            return Some(CompactUnit::from_level_runs(max_level, runs.to_vec()));
        }
        None
    }

    fn pick_for_size_ratio(
        &self,
        max_level: usize,
        runs: &[LevelSortedRun],
    ) -> Option<CompactUnit> {
        if runs.len() < self.max_run_num {
            return None;
        }
        let (first, rest) = runs.split_first()?;

        let ratio = 100.0 + self.size_ratio as f64;
        let mut candidate_count = 1;
        let mut candidate_size = first.run().total_size();
        for next in rest {
            let next_size = next.run().total_size();
            if candidate_size as f64 * ratio / 100.0 < next_size as f64 {
                break;
            }
            candidate_size = candidate_size.saturating_add(next_size);
            candidate_count += 1;
        }

        if candidate_count > 1 {
            return Some(create_unit(runs, max_level, candidate_count));
        }
        None
    }
}

impl CompactStrategy for UniversalCompaction {
    fn pick(&self, num_levels: usize, runs: &[LevelSortedRun]) -> Option<CompactUnit> {
        let max_level = max_level(num_levels);

        // 1 checking for reducing size amplification
        if let Some(unit) = self.pick_for_size_amp(max_level, runs) {
            log_pick("size_amp", &unit);
            return Some(unit);
        }

        // 2 checking for size ratio
        if let Some(unit) = self.pick_for_size_ratio(max_level, runs) {
            log_pick("size_ratio", &unit);
            return Some(unit);
        }

        // 3 checking for run num
        if runs.len() > self.max_run_num {
            let run_count = (runs.len() - self.max_run_num + 1).min(runs.len());
            let unit = create_unit(runs, max_level, run_count);
            log_pick("run_num", &unit);
            return Some(unit);
        }

        None
    }
}

/// Merge the first `run_count` runs. The output lands one level above the
/// first run left out, or at `max_level` when every run is merged.
fn create_unit(runs: &[LevelSortedRun], max_level: usize, run_count: usize) -> CompactUnit {
    let output_level = match runs.get(run_count) {
        Some(excluded) => excluded.level().saturating_sub(1),
        None => max_level,
    };
    CompactUnit::from_level_runs(output_level, runs[..run_count].to_vec())
}

fn log_pick(rule: &'static str, unit: &CompactUnit) {
    log_debug!(
        component = "compaction",
        event = "universal_pick",
        rule,
        output_level = unit.output_level(),
        runs = unit.runs().len(),
        bytes = unit.total_size(),
        rows = unit.row_count(),
    );
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        file::{DataFileMeta, FileId},
        run::SortedRun,
    };

    fn level_run(level: usize, size: u64) -> LevelSortedRun {
        let file = DataFileMeta::new(FileId::new(), size, "a", "z");
        LevelSortedRun::new(level, SortedRun::from_single(Arc::new(file)))
    }

    fn level_runs(layout: &[(usize, u64)]) -> Vec<LevelSortedRun> {
        layout.iter().map(|(level, size)| level_run(*level, *size)).collect()
    }

    fn sizes(unit: &CompactUnit) -> Vec<u64> {
        unit.runs()
            .iter()
            .map(|level_run| level_run.run().total_size())
            .collect()
    }

    #[test]
    fn size_amp_below_threshold() {
        let picker = UniversalCompaction::new(25, 1, 3);
        let runs = level_runs(&[(0, 1), (1, 2), (2, 12)]);
        assert!(picker.pick_for_size_amp(2, &runs).is_none());
    }

    #[test]
    fn size_amp_over_threshold_merges_all() {
        let picker = UniversalCompaction::new(25, 1, 3);
        let runs = level_runs(&[(0, 1), (1, 3), (2, 12)]);
        let unit = picker.pick_for_size_amp(2, &runs).expect("size amp unit");
        assert_eq!(unit.output_level(), 2);
        assert_eq!(sizes(&unit), vec![1, 3, 12]);
    }

    #[test]
    fn size_amp_boundary_is_strict() {
        // 4 * 100 == 200 * 2: equal is not over the limit.
        let picker = UniversalCompaction::new(200, 1, 3);
        let runs = level_runs(&[(0, 2), (0, 2), (3, 2)]);
        assert!(picker.pick_for_size_amp(3, &runs).is_none());
        let runs = level_runs(&[(0, 2), (0, 3), (3, 2)]);
        assert!(picker.pick_for_size_amp(3, &runs).is_some());
    }

    #[test]
    fn size_amp_does_not_overflow_on_large_sizes() {
        let picker = UniversalCompaction::new(200, 1, 2);
        let runs = level_runs(&[(0, u64::MAX / 2), (3, u64::MAX)]);
        assert!(picker.pick_for_size_amp(3, &runs).is_none());
        let runs = level_runs(&[(0, u64::MAX), (3, u64::MAX / 4)]);
        assert!(picker.pick_for_size_amp(3, &runs).is_some());
    }

    #[test]
    fn size_ratio_groups_comparable_prefix() {
        let picker = UniversalCompaction::new(25, 1, 4);
        let runs = level_runs(&[(0, 1), (0, 1), (1, 2), (2, 20)]);
        let unit = picker.pick_for_size_ratio(2, &runs).expect("size ratio unit");
        assert_eq!(sizes(&unit), vec![1, 1, 2]);
        assert_eq!(unit.output_level(), 1);
    }

    #[test]
    fn size_ratio_whole_list_goes_to_max_level() {
        let picker = UniversalCompaction::new(25, 1, 3);
        let runs = level_runs(&[(0, 1), (1, 1), (2, 2)]);
        let unit = picker.pick_for_size_ratio(5, &runs).expect("size ratio unit");
        assert_eq!(unit.runs().len(), 3);
        assert_eq!(unit.output_level(), 5);
    }

    #[test]
    fn size_ratio_single_candidate_yields_nothing() {
        let picker = UniversalCompaction::new(25, 1, 3);
        let runs = level_runs(&[(0, 1), (1, 5), (2, 30)]);
        assert!(picker.pick_for_size_ratio(2, &runs).is_none());
    }

    #[test]
    fn size_ratio_uses_fractional_scaling() {
        // 100 * 1.01 = 101 is not below 101, so the second run joins.
        let picker = UniversalCompaction::new(200, 1, 2);
        let runs = level_runs(&[(0, 100), (0, 101), (4, 500)]);
        let unit = picker.pick_for_size_ratio(4, &runs).expect("size ratio unit");
        assert_eq!(sizes(&unit), vec![100, 101]);
        assert_eq!(unit.output_level(), 3);

        let runs = level_runs(&[(0, 100), (0, 102), (4, 500)]);
        assert!(picker.pick_for_size_ratio(4, &runs).is_none());
    }

    #[test]
    fn size_checks_require_enough_runs() {
        let picker = UniversalCompaction::new(25, 1, 4);
        let runs = level_runs(&[(0, 10), (0, 10), (3, 1)]);
        assert!(picker.pick_for_size_amp(3, &runs).is_none());
        assert!(picker.pick_for_size_ratio(3, &runs).is_none());
        assert!(picker.pick(4, &runs).is_none());
    }

    #[test]
    fn create_unit_output_level() {
        let runs = level_runs(&[(0, 1), (0, 1), (2, 1), (5, 1)]);
        assert_eq!(create_unit(&runs, 5, 4).output_level(), 5);
        assert_eq!(create_unit(&runs, 5, 3).output_level(), 4);
        assert_eq!(create_unit(&runs, 5, 2).output_level(), 1);
        // Excluded run at level 0 cannot go below zero.
        assert_eq!(create_unit(&runs, 5, 1).output_level(), 0);
        assert_eq!(create_unit(&runs, 5, 2).runs(), &runs[..2]);
    }

    #[test]
    fn pick_prefers_size_amp_over_size_ratio() {
        let picker = UniversalCompaction::new(25, 1, 3);
        let runs = level_runs(&[(0, 1), (0, 1), (1, 2), (2, 4)]);
        let unit = picker.pick(3, &runs).expect("unit");
        assert_eq!(unit.output_level(), 2);
        assert_eq!(unit.runs().len(), 4);
    }

    #[test]
    fn pick_falls_back_to_run_num() {
        let picker = UniversalCompaction::new(200, 1, 3);
        let runs = level_runs(&[(0, 1), (0, 10), (1, 100), (2, 1000), (3, 10_000)]);
        let unit = picker.pick(4, &runs).expect("run num unit");
        assert_eq!(sizes(&unit), vec![1, 10, 100]);
        assert_eq!(unit.output_level(), 1);
    }

    #[test]
    fn pick_on_empty_runs() {
        let picker = UniversalCompaction::new(200, 1, 5);
        assert!(picker.pick(5, &[]).is_none());
        let picker = UniversalCompaction::new(200, 1, 0);
        assert!(picker.pick(5, &[]).is_none());
    }

    #[test]
    fn zero_run_limit_merges_whole_list() {
        let picker = UniversalCompaction::new(200, 1, 0);
        let runs = level_runs(&[(0, 10)]);
        let unit = picker.pick(5, &runs).expect("run num unit");
        assert_eq!(unit.runs(), runs.as_slice());
        assert_eq!(unit.output_level(), 4);

        let runs = level_runs(&[(0, 1), (1, 100), (3, 10_000)]);
        let unit = picker.pick(5, &runs).expect("run num unit");
        assert_eq!(unit.runs().len(), 3);
        assert_eq!(unit.output_level(), 4);
    }

    #[test]
    fn options_defaults_and_setters() {
        let options = UniversalOptions::default();
        assert_eq!(options.num_levels(), 6);
        assert!(options.validate().is_ok());

        let options = options.max_size_amp(150).size_ratio(10).max_run_num(7);
        assert_eq!(
            UniversalCompaction::from(options.clone()),
            UniversalCompaction::new(150, 10, 7)
        );
        assert_eq!(options.num_levels(), 8);
        assert_eq!(
            options.max_run_num(0).validate(),
            Err(ConfigError::ZeroRunNum)
        );
    }
}
