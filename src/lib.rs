//! trialloc: PETSc-style nonzero preallocation for unstructured triangular meshes
//!
//! Given element and boundary-segment connectivity of a P1 triangular mesh and the
//! contiguous block of rows owned by the current worker, this crate computes how many
//! nonzeros each owned row will hold in the diagonal (same-worker columns) and
//! off-diagonal (other-worker columns) blocks, so a sparse matrix can reserve its
//! storage up front.

pub mod parallel;

pub mod config;
pub mod error;
pub mod matrix;
pub mod mesh;
pub mod partition;
pub mod prealloc;

// Re-exports for convenience
pub use config::*;
pub use error::*;
pub use matrix::*;
pub use mesh::*;
pub use partition::*;
pub use prealloc::*;
