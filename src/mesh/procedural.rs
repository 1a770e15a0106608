//! Basic procedural mesh generation routines.

use super::{BoundaryType, TriMesh};
use crate::error::Result;

/// Uniform triangulation of the rectangle `[0, lx] x [0, ly]` with `nx` by `ny`
/// cells, each split into two triangles along its lower-left to upper-right
/// diagonal. Nodes are numbered row by row from the lower-left corner.
///
/// Every perimeter edge is a boundary segment and every perimeter node is
/// flagged `boundary`. With `nx` or `ny` zero the mesh
/// is empty.
pub fn create_rectangular_uniform_tri_mesh(
    lx: f64,
    ly: f64,
    nx: usize,
    ny: usize,
    boundary: BoundaryType,
) -> Result<TriMesh> {
    if nx == 0 || ny == 0 {
        return TriMesh::new(Vec::new(), Vec::new(), Vec::new(), Vec::new(), Vec::new());
    }
    let num_vertices_x = nx + 1;
    let num_vertices_y = ny + 1;
    let to_global_vertex_index = |i: usize, j: usize| num_vertices_x * j + i;

    let mut x = Vec::with_capacity(num_vertices_x * num_vertices_y);
    let mut y = Vec::with_capacity(num_vertices_x * num_vertices_y);
    let mut node_types = Vec::with_capacity(num_vertices_x * num_vertices_y);
    for j in 0..num_vertices_y {
        for i in 0..num_vertices_x {
            x.push(lx * i as f64 / nx as f64);
            y.push(ly * j as f64 / ny as f64);
            let on_boundary = i == 0 || j == 0 || i == nx || j == ny;
            node_types.push(if on_boundary { boundary } else { BoundaryType::Interior });
        }
    }

    let mut elements = Vec::with_capacity(6 * nx * ny);
    for j in 0..ny {
        for i in 0..nx {
            let v00 = to_global_vertex_index(i, j);
            let v10 = to_global_vertex_index(i + 1, j);
            let v11 = to_global_vertex_index(i + 1, j + 1);
            let v01 = to_global_vertex_index(i, j + 1);
            elements.extend_from_slice(&[v00, v10, v11, v00, v11, v01]);
        }
    }

    // counter-clockwise around the perimeter
    let mut segments = Vec::with_capacity(4 * (nx + ny));
    for i in 0..nx {
        segments.extend_from_slice(&[to_global_vertex_index(i, 0), to_global_vertex_index(i + 1, 0)]);
    }
    for j in 0..ny {
        segments.extend_from_slice(&[to_global_vertex_index(nx, j), to_global_vertex_index(nx, j + 1)]);
    }
    for i in (0..nx).rev() {
        segments.extend_from_slice(&[to_global_vertex_index(i + 1, ny), to_global_vertex_index(i, ny)]);
    }
    for j in (0..ny).rev() {
        segments.extend_from_slice(&[to_global_vertex_index(0, j + 1), to_global_vertex_index(0, j)]);
    }
    TriMesh::new(x, y, node_types, elements, segments)
}

pub fn create_unit_square_uniform_tri_mesh(cells_per_dim: usize, boundary: BoundaryType) -> Result<TriMesh> {
    create_rectangular_uniform_tri_mesh(1.0, 1.0, cells_per_dim, cells_per_dim, boundary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn node_coordinates() {
        let mesh = create_rectangular_uniform_tri_mesh(2.0, 1.0, 3, 3, BoundaryType::Dirichlet).unwrap();
        let (x, y) = mesh.coords(5);
        assert_relative_eq!(x, 2.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(y, 1.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn unit_square_sizes() {
        let mesh = create_unit_square_uniform_tri_mesh(3, BoundaryType::Dirichlet).unwrap();
        assert_eq!(mesh.num_nodes(), 16);
        assert_eq!(mesh.num_elements(), 18);
        assert_eq!(mesh.num_segments(), 12);
        assert_eq!(mesh.node_type(5), BoundaryType::Interior);
        assert_eq!(mesh.node_type(4), BoundaryType::Dirichlet);
        assert_eq!(mesh.coords(15), (1.0, 1.0));
    }

    #[test]
    fn perimeter_is_closed() {
        let mesh = create_rectangular_uniform_tri_mesh(2.0, 1.0, 2, 1, BoundaryType::Neumann).unwrap();
        let segs: Vec<_> = mesh.segments().collect();
        for w in segs.windows(2) {
            assert_eq!(w[0][1], w[1][0]);
        }
        assert_eq!(segs.last().unwrap()[1], segs[0][0]);
        for seg in &segs {
            assert_eq!(mesh.node_type(seg[0]), BoundaryType::Neumann);
        }
    }

    #[test]
    fn empty_when_no_cells() {
        let mesh = create_rectangular_uniform_tri_mesh(1.0, 1.0, 0, 4, BoundaryType::Dirichlet).unwrap();
        assert_eq!(mesh.num_nodes(), 0);
    }
}
