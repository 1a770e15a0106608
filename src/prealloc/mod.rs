//! Nonzero preallocation estimators.
//!
//! This module defines the `Preallocator` trait and its implementations. Each one
//! scans the replicated mesh connectivity and, for every row in the caller's
//! ownership range, reports how many nonzeros land in columns owned by the same
//! worker (`local`, diagonal included) and in columns owned elsewhere (`remote`).
//! The scan is read-only; the only allocation is the two output arrays.

use crate::config::{PreallocOptions, PreallocPolicy};
use crate::error::{PreallocError, Result};
use crate::mesh::TriMesh;
use crate::parallel::Comm;
use crate::partition::OwnershipRange;

/// Per-row nonzero counts of one ownership range, in row order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NnzCounts {
    /// Nonzeros in same-worker columns, diagonal included
    pub local: Vec<usize>,
    /// Nonzeros in other-worker columns
    pub remote: Vec<usize>,
}

impl NnzCounts {
    pub fn len(&self) -> usize {
        self.local.len()
    }

    pub fn is_empty(&self) -> bool {
        self.local.is_empty()
    }

    /// `(local, remote)` for local row `i`.
    pub fn row(&self, i: usize) -> (usize, usize) {
        (self.local[i], self.remote[i])
    }

    pub fn total(&self) -> usize {
        self.local.iter().sum::<usize>() + self.remote.iter().sum::<usize>()
    }
}

/// A row counting policy.
pub trait Preallocator {
    /// Count nonzeros for every row of `range`.
    fn estimate(&self, mesh: &TriMesh, range: OwnershipRange) -> Result<NnzCounts>;
}

// Submodules for the counting policies
pub mod boundary_type;
pub mod distinct;
pub mod halved;

// Re-exports for convenience
pub use boundary_type::BoundaryTypeCount;
pub use distinct::DistinctNeighbors;
pub use halved::HalvedPairCount;

impl Preallocator for PreallocPolicy {
    fn estimate(&self, mesh: &TriMesh, range: OwnershipRange) -> Result<NnzCounts> {
        match self {
            PreallocPolicy::Distinct => DistinctNeighbors.estimate(mesh, range),
            PreallocPolicy::Halved => HalvedPairCount.estimate(mesh, range),
            PreallocPolicy::BoundaryType => BoundaryTypeCount.estimate(mesh, range),
        }
    }
}

/// Count the rows of `range` with `policy`.
pub fn estimate(policy: PreallocPolicy, mesh: &TriMesh, range: OwnershipRange) -> Result<NnzCounts> {
    policy.estimate(mesh, range)
}

pub(crate) fn check_range(mesh: &TriMesh, range: OwnershipRange) -> Result<()> {
    let n = mesh.num_nodes();
    if range.end() > n {
        return Err(PreallocError::InvalidPartition { start: range.start(), end: range.end(), n });
    }
    Ok(())
}

/// What one rank knows after a distributed preallocation pass.
#[derive(Debug, Clone)]
pub struct RankPreallocation {
    /// Full replicated mesh
    pub mesh: TriMesh,
    /// Rows owned by this rank
    pub range: OwnershipRange,
    /// Counts for the owned rows
    pub counts: NnzCounts,
    /// Sum of all counts over all ranks
    pub global_nnz: usize,
}

/// Replicate the mesh from `options.root`, take this rank's block of rows and count
/// them with `options.policy`.
///
/// Collective over `comm`. Only the root needs to pass the mesh.
pub fn preallocate_distributed<C: Comm>(
    comm: &C,
    mesh: Option<&TriMesh>,
    options: &PreallocOptions,
) -> Result<RankPreallocation> {
    let mesh = TriMesh::replicate(mesh, comm, options.root)?;
    let range = OwnershipRange::for_comm(mesh.num_nodes(), comm)?;
    let counts = options.policy.estimate(&mesh, range)?;

    log::debug!(
        "rank {} rows [{}, {}) {} preallocation: local {:?}, remote {:?}",
        comm.rank(),
        range.start(),
        range.end(),
        options.policy,
        counts.local,
        counts.remote
    );
    let global_nnz = comm.all_reduce_sum(counts.total());
    if comm.rank() == options.root {
        log::info!("preallocated {} nonzeros for {} rows", global_nnz, mesh.num_nodes());
    }
    Ok(RankPreallocation { mesh, range, counts, global_nnz })
}
