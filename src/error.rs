use thiserror::Error;

// Unified error type for trialloc

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreallocError {
    #[error("invalid mesh: {0}")]
    InvalidMesh(String),
    #[error("invalid ownership range [{start}, {end}) for {n} rows")]
    InvalidPartition { start: usize, end: usize, n: usize },
    #[error("rank {rank} out of range for a communicator of size {size}")]
    InvalidRank { rank: usize, size: usize },
    #[error("expected {expected} {what}, found {found}")]
    LengthMismatch { what: &'static str, expected: usize, found: usize },
    #[error("row {row} is not owned by range [{start}, {end})")]
    RowNotOwned { row: usize, start: usize, end: usize },
    #[error("column {col} out of range for {ncols} columns")]
    ColumnOutOfRange { col: usize, ncols: usize },
    #[error("new nonzero at ({row}, {col}) caused a malloc")]
    AllocationError { row: usize, col: usize },
    #[error("invalid option: {0}")]
    InvalidOption(String),
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),
}

pub type Result<T> = std::result::Result<T, PreallocError>;
