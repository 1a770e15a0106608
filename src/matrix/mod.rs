//! Matrix module: the preallocated matrix that consumes row counts, and the CSR
//! matrix it assembles into.

pub mod preallocated;
pub use preallocated::{AssemblyInfo, PreallocatedMatrix, assemble_element_pattern};
pub mod sparse;
pub use sparse::{CsrMatrix, SparseMatrix};
