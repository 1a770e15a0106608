// Boundary-type driven row counting for serial matrices

use super::{NnzCounts, Preallocator, check_range};
use crate::error::{PreallocError, Result};
use crate::mesh::{BoundaryType, TriMesh};
use crate::partition::OwnershipRange;

/// Serial estimate used when the matrix rows of Dirichlet nodes are identity rows.
///
/// A Dirichlet row holds only its diagonal. Every other row holds the diagonal
/// plus one entry per incident triangle, and a Neumann row one more, since a
/// boundary node has one neighbour more than it has triangles. Everything is
/// reported as `local`; the range must cover the whole mesh.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundaryTypeCount;

impl Preallocator for BoundaryTypeCount {
    fn estimate(&self, mesh: &TriMesh, range: OwnershipRange) -> Result<NnzCounts> {
        check_range(mesh, range)?;
        if range.start() != 0 || range.end() != mesh.num_nodes() {
            return Err(PreallocError::Unsupported(
                "boundary-type preallocation is serial; the range must cover the whole mesh",
            ));
        }
        let types = mesh.node_types();
        let mut local: Vec<usize> = types
            .iter()
            .map(|&bt| if bt == BoundaryType::Neumann { 2 } else { 1 })
            .collect();
        for &i in mesh.element_indices() {
            if !types[i].is_dirichlet() {
                local[i] += 1;
            }
        }
        let remote = vec![0; local.len()];
        Ok(NnzCounts { local, remote })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(types: Vec<BoundaryType>) -> TriMesh {
        TriMesh::new(
            vec![0.0, 1.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0, 1.0],
            types,
            vec![0, 1, 2, 0, 2, 3],
            vec![0, 1, 1, 2, 2, 3, 3, 0],
        )
        .unwrap()
    }

    #[test]
    fn dirichlet_rows_hold_only_the_diagonal() {
        let m = square(vec![BoundaryType::Dirichlet; 4]);
        let counts = BoundaryTypeCount.estimate(&m, OwnershipRange::full(4)).unwrap();
        assert_eq!(counts.local, vec![1; 4]);
        assert_eq!(counts.remote, vec![0; 4]);
    }

    #[test]
    fn neumann_rows_get_one_extra() {
        let m = square(vec![
            BoundaryType::Neumann,
            BoundaryType::Neumann,
            BoundaryType::Dirichlet,
            BoundaryType::Interior,
        ]);
        let counts = BoundaryTypeCount.estimate(&m, OwnershipRange::full(4)).unwrap();
        // node 0: 2 + 2 triangles, node 1: 2 + 1, node 2: Dirichlet, node 3: 1 + 1
        assert_eq!(counts.local, vec![4, 3, 1, 2]);
    }

    #[test]
    fn partial_range_is_unsupported() {
        let m = square(vec![BoundaryType::Interior; 4]);
        let range = OwnershipRange::new(0, 2, 4).unwrap();
        assert!(matches!(
            BoundaryTypeCount.estimate(&m, range),
            Err(PreallocError::Unsupported(_))
        ));
    }
}
