//! MPI-based parallel communication module.
//!
//! This module provides an implementation of the `Comm` trait using the MPI (Message Passing Interface)
//! backend for distributed-memory parallelism. Each process owns a contiguous block of matrix rows and
//! receives a full copy of the mesh connectivity through [`super::Comm::broadcast`] before counting its rows.
//! The implementation is only available when the `mpi` feature is enabled.
//!
//! # Example
//! ```no_run
//! #[cfg(feature = "mpi")]
//! {
//!     use trialloc::parallel::{Comm, MpiComm};
//!     let comm = MpiComm::new().unwrap();
//!     println!("Rank: {} / {}", comm.rank(), comm.size());
//! }
//! ```

#[cfg(feature = "mpi")]
use mpi::traits::*;
#[cfg(feature = "mpi")]
use mpi::environment::Universe;
#[cfg(feature = "mpi")]
use mpi::topology::SimpleCommunicator;

#[cfg(feature = "mpi")]
use crate::error::{PreallocError, Result};

/// MPI communicator wrapper for distributed parallelism.
///
/// Holds the MPI world communicator, the rank of the current process, and the total number of processes.
/// The universe is kept alive for as long as the communicator; dropping it finalizes MPI.
#[cfg(feature = "mpi")]
pub struct MpiComm {
    /// The MPI world communicator (all processes in the job).
    pub world: SimpleCommunicator,
    /// The rank (ID) of this process within the communicator.
    pub rank: usize,
    /// The total number of processes in the communicator.
    pub size: usize,
    _universe: Universe,
}

#[cfg(feature = "mpi")]
impl MpiComm {
    /// Initializes MPI and constructs a new `MpiComm` instance.
    ///
    /// Fails if MPI has already been initialized in this process.
    pub fn new() -> Result<Self> {
        let universe = mpi::initialize().ok_or(PreallocError::Unsupported("MPI is already initialized"))?;
        let world    = universe.world();
        let rank     = world.rank() as usize;
        let size     = world.size() as usize;
        Ok(MpiComm { world, rank, size, _universe: universe })
    }
}

#[cfg(feature = "mpi")]
impl super::Comm for MpiComm {
    /// Returns the rank (ID) of this process.
    fn rank(&self) -> usize { self.rank }
    /// Returns the total number of processes in the communicator.
    fn size(&self) -> usize { self.size }

    /// Copies the root's array to every process.
    ///
    /// The length goes first so non-root processes can size their receive buffer.
    fn broadcast<T: Clone + Default + Equivalence>(&self, data: &mut Vec<T>, root: usize) {
        let root_process = self.world.process_at_rank(root as i32);
        let mut len = data.len() as u64;
        root_process.broadcast_into(&mut len);
        if self.rank != root {
            data.clear();
            data.resize(len as usize, T::default());
        }
        root_process.broadcast_into(&mut data[..]);
    }

    /// Performs an all-reduce sum operation across all processes.
    fn all_reduce_sum(&self, x: usize) -> usize {
        use mpi::collective::SystemOperation;
        let local = x as u64;
        let mut total = 0u64;
        self.world.all_reduce_into(&local, &mut total, &SystemOperation::sum());
        total as usize
    }
}
