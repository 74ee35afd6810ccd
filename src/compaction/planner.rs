//! Strategy selection: configuration picks a strategy, `build` yields a picker.

use super::{
    error::ConfigError,
    universal::{UniversalCompaction, UniversalOptions},
    CompactStrategy, CompactUnit,
};
use crate::run::LevelSortedRun;

/// Available compaction strategies selectable via configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CompactionStrategy {
    /// Universal compaction (size-tiered runs, bounded space amplification).
    Universal(UniversalOptions),
}

impl Default for CompactionStrategy {
    fn default() -> Self {
        Self::Universal(UniversalOptions::default())
    }
}

impl CompactionStrategy {
    /// Validate the configuration and build a concrete picker for the selected strategy.
    pub fn build(self) -> Result<CompactStrategyKind, ConfigError> {
        match self {
            Self::Universal(options) => {
                options.validate()?;
                Ok(CompactStrategyKind::Universal(UniversalCompaction::from(
                    options,
                )))
            }
        }
    }
}

/// Picker enum used to keep a concrete instance around while the strategy stays pluggable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CompactStrategyKind {
    /// Universal picker implementation.
    Universal(UniversalCompaction),
}

impl CompactStrategy for CompactStrategyKind {
    fn pick(&self, num_levels: usize, runs: &[LevelSortedRun]) -> Option<CompactUnit> {
        match self {
            Self::Universal(picker) => picker.pick(num_levels, runs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_strategy_builds_universal_picker() {
        let kind = CompactionStrategy::default().build().expect("build");
        let CompactStrategyKind::Universal(picker) = kind;
        assert_eq!(picker, UniversalCompaction::new(200, 1, 5));
    }

    #[test]
    fn build_rejects_zero_run_num() {
        let strategy = CompactionStrategy::Universal(UniversalOptions::default().max_run_num(0));
        assert_eq!(strategy.build(), Err(ConfigError::ZeroRunNum));
    }

    #[test]
    fn kind_dispatches_to_inner_picker() {
        let kind = CompactionStrategy::default().build().expect("build");
        assert!(kind.pick(6, &[]).is_none());
    }
}
