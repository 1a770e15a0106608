//! Boundary classification of nodes and segments.

use crate::error::{PreallocError, Result};

/// Boundary type flag carried by every node (and optionally every segment).
///
/// The integer codes match the mesh files produced by the triangle converters:
/// `0` interior, `1` Neumann, `2` Dirichlet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BoundaryType {
    #[default]
    Interior,
    Neumann,
    Dirichlet,
}

impl BoundaryType {
    pub fn code(self) -> usize {
        match self {
            BoundaryType::Interior => 0,
            BoundaryType::Neumann => 1,
            BoundaryType::Dirichlet => 2,
        }
    }

    pub fn from_code(code: usize) -> Result<Self> {
        match code {
            0 => Ok(BoundaryType::Interior),
            1 => Ok(BoundaryType::Neumann),
            2 => Ok(BoundaryType::Dirichlet),
            _ => Err(PreallocError::InvalidMesh(format!(
                "boundary type {} is not one of 0 (interior), 1 (Neumann), 2 (Dirichlet)",
                code
            ))),
        }
    }

    /// Decode a flag stored as a scalar, as in PETSc binary vectors.
    pub fn from_scalar(value: f64) -> Result<Self> {
        Self::from_code(scalar_to_index(value, "boundary type")?)
    }

    pub fn is_dirichlet(self) -> bool {
        self == BoundaryType::Dirichlet
    }
}

/// Convert a scalar-encoded index to `usize`, rejecting anything that is not a
/// finite non-negative integer.
pub(crate) fn scalar_to_index(value: f64, what: &str) -> Result<usize> {
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 {
        return Err(PreallocError::InvalidMesh(format!(
            "{} {} is not a non-negative integer",
            what, value
        )));
    }
    Ok(value as usize)
}
