//! Communication layer between workers.
//!
//! Row counting itself is shared-nothing: every worker writes only its own count
//! arrays. The one collective that must complete before counting starts is the
//! broadcast that puts a full copy of the mesh connectivity on every worker; the
//! `all_reduce_sum` is only used afterwards for reporting totals.

#[cfg(feature = "mpi")]
pub use mpi::datatype::Equivalence;

/// Types that may travel through [`Comm::broadcast`].
///
/// With the `mpi` feature this is MPI's own `Equivalence`; without it every plain
/// numeric type used by the mesh qualifies.
#[cfg(not(feature = "mpi"))]
pub trait Equivalence {}
#[cfg(not(feature = "mpi"))]
impl Equivalence for usize {}
#[cfg(not(feature = "mpi"))]
impl Equivalence for u64 {}
#[cfg(not(feature = "mpi"))]
impl Equivalence for i32 {}
#[cfg(not(feature = "mpi"))]
impl Equivalence for f64 {}

pub trait Comm {
    fn rank(&self) -> usize;
    fn size(&self) -> usize;
    /// Replace `data` on every rank with the contents it has on `root`.
    fn broadcast<T: Clone + Default + Equivalence>(&self, data: &mut Vec<T>, root: usize);
    fn all_reduce_sum(&self, x: usize) -> usize;
}

#[cfg(feature="mpi")]
pub mod mpi_comm;
#[cfg(feature="mpi")]
pub use mpi_comm::MpiComm;

#[cfg(feature="rayon")]
pub mod rayon_comm;
#[cfg(feature="rayon")]
pub use rayon_comm::RayonComm;

pub enum UniverseComm {
    #[cfg(feature="mpi")]
    Mpi(MpiComm),
    #[cfg(feature="rayon")]
    Rayon(RayonComm),
    Serial,
}

impl Comm for UniverseComm {
    fn rank(&self) -> usize {
        match self {
            #[cfg(feature="mpi")]
            UniverseComm::Mpi(comm) => comm.rank(),
            #[cfg(feature="rayon")]
            UniverseComm::Rayon(comm) => comm.rank(),
            UniverseComm::Serial => 0,
        }
    }
    fn size(&self) -> usize {
        match self {
            #[cfg(feature="mpi")]
            UniverseComm::Mpi(comm) => comm.size(),
            #[cfg(feature="rayon")]
            UniverseComm::Rayon(comm) => comm.size(),
            UniverseComm::Serial => 1,
        }
    }
    fn broadcast<T: Clone + Default + Equivalence>(&self, data: &mut Vec<T>, root: usize) {
        match self {
            #[cfg(feature="mpi")]
            UniverseComm::Mpi(comm) => comm.broadcast(data, root),
            #[cfg(feature="rayon")]
            UniverseComm::Rayon(comm) => comm.broadcast(data, root),
            // a single rank already holds the root's data
            UniverseComm::Serial => {},
        }
    }
    fn all_reduce_sum(&self, x: usize) -> usize {
        match self {
            #[cfg(feature="mpi")]
            UniverseComm::Mpi(comm) => comm.all_reduce_sum(x),
            #[cfg(feature="rayon")]
            UniverseComm::Rayon(comm) => comm.all_reduce_sum(x),
            UniverseComm::Serial => x,
        }
    }
}
