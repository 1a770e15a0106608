// Distinct-neighbour row counting

use super::{NnzCounts, Preallocator, check_range};
use crate::error::Result;
use crate::mesh::TriMesh;
use crate::partition::OwnershipRange;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Counts, for every owned row, the diagonal plus each distinct node reachable
/// through a shared element or boundary segment.
///
/// Every undirected edge is counted exactly once per endpoint no matter how many
/// elements or segments carry it, so the counts equal the row lengths of the
/// assembled P1 matrix.
#[derive(Debug, Clone, Copy, Default)]
pub struct DistinctNeighbors;

impl Preallocator for DistinctNeighbors {
    fn estimate(&self, mesh: &TriMesh, range: OwnershipRange) -> Result<NnzCounts> {
        check_range(mesh, range)?;
        let (elem_offsets, elem_incident) = mesh.node_element_incidence();
        let (seg_offsets, seg_incident) = mesh.node_segment_incidence();

        let count_row = |i: usize| -> (usize, usize) {
            let mut neighbors = Vec::new();
            for &k in &elem_incident[elem_offsets[i]..elem_offsets[i + 1]] {
                neighbors.extend(mesh.element(k).into_iter().filter(|&j| j != i));
            }
            for &m in &seg_incident[seg_offsets[i]..seg_offsets[i + 1]] {
                neighbors.extend(mesh.segment(m).into_iter().filter(|&j| j != i));
            }
            neighbors.sort_unstable();
            neighbors.dedup();
            let local = neighbors.iter().filter(|&&j| range.contains(j)).count();
            (1 + local, neighbors.len() - local)
        };

        #[cfg(feature = "rayon")]
        let rows: Vec<(usize, usize)> = range.rows().into_par_iter().map(count_row).collect();
        #[cfg(not(feature = "rayon"))]
        let rows: Vec<(usize, usize)> = range.rows().map(count_row).collect();

        let (local, remote) = rows.into_iter().unzip();
        Ok(NnzCounts { local, remote })
    }
}
