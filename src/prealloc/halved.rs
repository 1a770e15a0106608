// Dual-pass pair counting with a final halving

use super::{NnzCounts, Preallocator, check_range};
use crate::error::Result;
use crate::mesh::TriMesh;
use crate::partition::OwnershipRange;

/// The classic distributed counting pass.
///
/// Every row starts at 2 local. Each element adds one for every ordered pair
/// (owned node, other node), each boundary segment does the same for its two
/// nodes, and finally both counts are halved with integer division.
///
/// On a mesh where every interior edge is shared by two triangles and every
/// boundary edge by one triangle and one boundary segment, each edge is seen
/// exactly twice and the halved counts are exact. Anywhere else the raw sum can
/// be odd and the division truncates; such rows are reported with `log::warn!`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HalvedPairCount;

impl Preallocator for HalvedPairCount {
    fn estimate(&self, mesh: &TriMesh, range: OwnershipRange) -> Result<NnzCounts> {
        check_range(mesh, range)?;
        let mut local = vec![2usize; range.len()];
        let mut remote = vec![0usize; range.len()];

        let mut count_pairs = |nodes: &[usize]| {
            for (q, &i) in nodes.iter().enumerate() {
                let Some(iloc) = range.to_local(i) else { continue };
                for (r, &j) in nodes.iter().enumerate() {
                    if r == q {
                        continue;
                    }
                    if range.contains(j) {
                        local[iloc] += 1;
                    } else {
                        remote[iloc] += 1;
                    }
                }
            }
        };
        for element in mesh.elements() {
            count_pairs(&element[..]);
        }
        for segment in mesh.segments() {
            count_pairs(&segment[..]);
        }

        for (iloc, (l, r)) in local.iter_mut().zip(remote.iter_mut()).enumerate() {
            if *l % 2 != 0 || *r % 2 != 0 {
                log::warn!(
                    "row {} has odd raw counts (local {}, remote {}); halving truncates",
                    range.start() + iloc,
                    l,
                    r
                );
            }
            *l /= 2;
            *r /= 2;
        }
        Ok(NnzCounts { local, remote })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::BoundaryType;

    fn mesh(n: usize, elements: Vec<usize>, segments: Vec<usize>) -> TriMesh {
        TriMesh::new(vec![0.0; n], vec![0.0; n], vec![BoundaryType::Interior; n], elements, segments).unwrap()
    }

    #[test]
    fn lone_triangle_is_undercounted() {
        // raw 2 + 2 = 4 per row
        let m = mesh(3, vec![0, 1, 2], vec![]);
        let counts = HalvedPairCount.estimate(&m, OwnershipRange::full(3)).unwrap();
        assert_eq!(counts.local, vec![2, 2, 2]);
    }

    #[test]
    fn odd_raw_counts_truncate() {
        // node 2: 2 + 2 + 1 = 5, node 3: 2 + 1 = 3
        let m = mesh(4, vec![0, 1, 2], vec![2, 3]);
        let counts = HalvedPairCount.estimate(&m, OwnershipRange::full(4)).unwrap();
        assert_eq!(counts.local, vec![2, 2, 2, 1]);
        assert_eq!(counts.remote, vec![0; 4]);
    }

    #[test]
    fn closed_square_is_exact() {
        // 3---2
        // | / |
        // 0---1   with all four boundary edges as segments
        let m = mesh(4, vec![0, 1, 2, 0, 2, 3], vec![0, 1, 1, 2, 2, 3, 3, 0]);
        let counts = HalvedPairCount.estimate(&m, OwnershipRange::full(4)).unwrap();
        assert_eq!(counts.local, vec![4, 3, 4, 3]);

        let counts = HalvedPairCount.estimate(&m, OwnershipRange::new(0, 2, 4).unwrap()).unwrap();
        assert_eq!(counts.local, vec![2, 2]);
        assert_eq!(counts.remote, vec![2, 1]);
    }
}
