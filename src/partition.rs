//! Contiguous row ownership.
//!
//! Every worker owns a half-open block `[start, end)` of global row indices. The
//! blocks of all workers are disjoint and cover `[0, N)`.

use crate::error::{PreallocError, Result};
use crate::parallel::Comm;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OwnershipRange {
    start: usize,
    end: usize,
}

impl OwnershipRange {
    /// A range over a matrix with `n` rows. Fails unless `start <= end <= n`.
    pub fn new(start: usize, end: usize, n: usize) -> Result<Self> {
        if start > end || end > n {
            return Err(PreallocError::InvalidPartition { start, end, n });
        }
        Ok(OwnershipRange { start, end })
    }

    /// The whole matrix on one worker.
    pub fn full(n: usize) -> Self {
        OwnershipRange { start: 0, end: n }
    }

    /// Default block layout: each of `size` ranks gets `n / size` rows, and the
    /// first `n % size` ranks get one more.
    pub fn block(n: usize, size: usize, rank: usize) -> Result<Self> {
        if size == 0 || rank >= size {
            return Err(PreallocError::InvalidRank { rank, size });
        }
        let base = n / size;
        let extra = n % size;
        let start = rank * base + rank.min(extra);
        let len = base + usize::from(rank < extra);
        Ok(OwnershipRange { start, end: start + len })
    }

    /// Block layout for the calling rank of `comm`.
    pub fn for_comm<C: Comm>(n: usize, comm: &C) -> Result<Self> {
        Self::block(n, comm.size(), comm.rank())
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, i: usize) -> bool {
        i >= self.start && i < self.end
    }

    /// Local row index of global row `i`, if owned.
    pub fn to_local(&self, i: usize) -> Option<usize> {
        self.contains(i).then(|| i - self.start)
    }

    pub fn rows(&self) -> Range<usize> {
        self.start..self.end
    }
}
