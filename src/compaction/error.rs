use thiserror::Error;

/// Invalid compaction configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// `max_run_num` was zero.
    #[error("max sorted run number must be at least 1")]
    ZeroRunNum,
    /// The tree was configured without levels.
    #[error("a merge tree needs at least one level")]
    ZeroLevels,
}
