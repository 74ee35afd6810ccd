//! Metadata describing immutable data files owned by the merge tree.

use ulid::Ulid;

/// Identifier used for data files.
pub type FileId = Ulid;

/// Metadata for a single data file tracked by a sorted run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataFileMeta {
    id: FileId,
    file_size: u64,
    row_count: u64,
    min_key: Vec<u8>,
    max_key: Vec<u8>,
    max_sequence_number: u64,
}

impl DataFileMeta {
    /// Describe a file covering `[min_key, max_key]` with the given byte size.
    pub fn new(
        id: FileId,
        file_size: u64,
        min_key: impl Into<Vec<u8>>,
        max_key: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            id,
            file_size,
            row_count: 0,
            min_key: min_key.into(),
            max_key: max_key.into(),
            max_sequence_number: 0,
        }
    }

    /// Set the number of rows stored in the file.
    pub fn with_row_count(mut self, row_count: u64) -> Self {
        self.row_count = row_count;
        self
    }

    /// Set the largest sequence number written into the file.
    pub fn with_max_sequence_number(mut self, max_sequence_number: u64) -> Self {
        self.max_sequence_number = max_sequence_number;
        self
    }

    /// File identifier.
    pub fn id(&self) -> FileId {
        self.id
    }

    /// On-disk size of the file in bytes.
    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    /// Number of rows stored in the file.
    pub fn row_count(&self) -> u64 {
        self.row_count
    }

    /// Smallest key in the file.
    pub fn min_key(&self) -> &[u8] {
        &self.min_key
    }

    /// Largest key in the file.
    pub fn max_key(&self) -> &[u8] {
        &self.max_key
    }

    /// Largest sequence number written into the file; newer files carry larger values.
    pub fn max_sequence_number(&self) -> u64 {
        self.max_sequence_number
    }
}
