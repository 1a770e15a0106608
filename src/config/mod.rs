//! Configuration of the preallocation pass.

pub mod options;
pub use options::{PreallocOptions, PreallocPolicy};
