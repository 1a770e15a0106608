//! Unstructured triangular mesh: node coordinates, boundary flags, element and
//! boundary-segment connectivity.
//!
//! Connectivity is held as flat, 0-indexed arrays exactly as it comes out of the
//! mesh converters: element `k` is `elements[3k..3k+3]`, segment `m` is
//! `segments[2m..2m+2]`. A [`TriMesh`] is validated once on construction and is
//! immutable afterwards, so every consumer can index it without further checks.
//!
//! In a distributed run the full mesh is replicated on every worker with
//! [`TriMesh::replicate`] before any row counting starts. This costs O(N + K + M)
//! memory per worker in exchange for a single broadcast and no ownership-aware
//! ghost exchange.

pub mod boundary;
pub mod procedural;
pub use boundary::BoundaryType;
pub use procedural::{create_rectangular_uniform_tri_mesh, create_unit_square_uniform_tri_mesh};

use crate::error::{PreallocError, Result};
use crate::parallel::Comm;
use boundary::scalar_to_index;

/// A validated P1 triangulation.
#[derive(Debug, Clone, PartialEq)]
pub struct TriMesh {
    x: Vec<f64>,
    y: Vec<f64>,
    node_types: Vec<BoundaryType>,
    elements: Vec<usize>,
    segments: Vec<usize>,
}

impl TriMesh {
    /// Build a mesh from flat arrays.
    ///
    /// Fails with [`PreallocError::InvalidMesh`] when the node arrays disagree in
    /// length, when `elements.len()` is not a multiple of 3 or `segments.len()` not a
    /// multiple of 2, or when any connectivity index lies outside `[0, N)`.
    pub fn new(
        x: Vec<f64>,
        y: Vec<f64>,
        node_types: Vec<BoundaryType>,
        elements: Vec<usize>,
        segments: Vec<usize>,
    ) -> Result<Self> {
        let n = x.len();
        if y.len() != n || node_types.len() != n {
            return Err(PreallocError::InvalidMesh(format!(
                "node arrays disagree in length: x has {}, y has {}, boundary types has {}",
                n,
                y.len(),
                node_types.len()
            )));
        }
        if elements.len() % 3 != 0 {
            return Err(PreallocError::InvalidMesh(format!(
                "element node index array has {} entries, must have 3 K entries",
                elements.len()
            )));
        }
        if segments.len() % 2 != 0 {
            return Err(PreallocError::InvalidMesh(format!(
                "boundary segment index array has {} entries, must have 2 M entries",
                segments.len()
            )));
        }
        check_indices("element", 3, &elements, n)?;
        check_indices("segment", 2, &segments, n)?;

        let mesh = TriMesh { x, y, node_types, elements, segments };
        log::debug!(
            "N={} nodes, K={} elements, M={} boundary segments",
            mesh.num_nodes(),
            mesh.num_elements(),
            mesh.num_segments()
        );
        Ok(mesh)
    }

    /// Build a mesh from scalar-valued arrays, the layout PETSc binary files use
    /// for the node-boundary-type, element-node-indices and
    /// boundary-segment-indices vectors.
    pub fn from_scalar_arrays(
        x: &[f64],
        y: &[f64],
        node_types: &[f64],
        elements: &[f64],
        segments: &[f64],
    ) -> Result<Self> {
        let node_types = node_types
            .iter()
            .map(|&v| BoundaryType::from_scalar(v))
            .collect::<Result<Vec<_>>>()?;
        let elements = elements
            .iter()
            .map(|&v| scalar_to_index(v, "element node index"))
            .collect::<Result<Vec<_>>>()?;
        let segments = segments
            .iter()
            .map(|&v| scalar_to_index(v, "segment node index"))
            .collect::<Result<Vec<_>>>()?;
        Self::new(x.to_vec(), y.to_vec(), node_types, elements, segments)
    }

    /// Put a copy of the full mesh on every rank of `comm`.
    ///
    /// Blocking collective: every rank must call it. Only `root` needs to pass
    /// `Some(mesh)`; whatever other ranks pass is ignored. If the root itself has no
    /// mesh, every rank ends up with the empty mesh.
    pub fn replicate<C: Comm>(mesh: Option<&TriMesh>, comm: &C, root: usize) -> Result<TriMesh> {
        let is_root = comm.rank() == root;
        let source = if is_root { mesh } else { None };

        let mut x = source.map(|m| m.x.clone()).unwrap_or_default();
        let mut y = source.map(|m| m.y.clone()).unwrap_or_default();
        let mut node_codes: Vec<usize> = source
            .map(|m| m.node_types.iter().map(|bt| bt.code()).collect())
            .unwrap_or_default();
        let mut elements = source.map(|m| m.elements.clone()).unwrap_or_default();
        let mut segments = source.map(|m| m.segments.clone()).unwrap_or_default();

        comm.broadcast(&mut x, root);
        comm.broadcast(&mut y, root);
        comm.broadcast(&mut node_codes, root);
        comm.broadcast(&mut elements, root);
        comm.broadcast(&mut segments, root);
        log::debug!(
            "rank {} received full connectivity: {} element indices, {} segment indices",
            comm.rank(),
            elements.len(),
            segments.len()
        );

        let node_types = node_codes
            .into_iter()
            .map(BoundaryType::from_code)
            .collect::<Result<Vec<_>>>()?;
        let replicated = TriMesh::new(x, y, node_types, elements, segments)?;
        if is_root {
            log::info!(
                "N={} nodes, K={} elements, M={} boundary segments",
                replicated.num_nodes(),
                replicated.num_elements(),
                replicated.num_segments()
            );
        }
        Ok(replicated)
    }

    /// Number of nodes N.
    pub fn num_nodes(&self) -> usize {
        self.x.len()
    }

    /// Number of triangles K.
    pub fn num_elements(&self) -> usize {
        self.elements.len() / 3
    }

    /// Number of boundary segments M.
    pub fn num_segments(&self) -> usize {
        self.segments.len() / 2
    }

    pub fn element(&self, k: usize) -> [usize; 3] {
        let e = &self.elements[3 * k..3 * k + 3];
        [e[0], e[1], e[2]]
    }

    pub fn segment(&self, m: usize) -> [usize; 2] {
        let s = &self.segments[2 * m..2 * m + 2];
        [s[0], s[1]]
    }

    pub fn elements(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        self.elements.chunks_exact(3).map(|e| [e[0], e[1], e[2]])
    }

    pub fn segments(&self) -> impl Iterator<Item = [usize; 2]> + '_ {
        self.segments.chunks_exact(2).map(|s| [s[0], s[1]])
    }

    /// Flat element connectivity, `3 K` entries.
    pub fn element_indices(&self) -> &[usize] {
        &self.elements
    }

    /// Flat segment connectivity, `2 M` entries.
    pub fn segment_indices(&self) -> &[usize] {
        &self.segments
    }

    pub fn coords(&self, i: usize) -> (f64, f64) {
        (self.x[i], self.y[i])
    }

    pub fn node_type(&self, i: usize) -> BoundaryType {
        self.node_types[i]
    }

    pub fn node_types(&self) -> &[BoundaryType] {
        &self.node_types
    }

    /// Node-to-element incidence in CSR form: the elements touching node `i` are
    /// `incident[offsets[i]..offsets[i + 1]]`.
    pub fn node_element_incidence(&self) -> (Vec<usize>, Vec<usize>) {
        incidence(self.num_nodes(), &self.elements, 3)
    }

    /// Node-to-segment incidence in CSR form, as [`TriMesh::node_element_incidence`].
    pub fn node_segment_incidence(&self) -> (Vec<usize>, Vec<usize>) {
        incidence(self.num_nodes(), &self.segments, 2)
    }
}

fn check_indices(what: &str, arity: usize, indices: &[usize], n: usize) -> Result<()> {
    if let Some(pos) = indices.iter().position(|&i| i >= n) {
        return Err(PreallocError::InvalidMesh(format!(
            "{} {} references node {} outside [0, {})",
            what,
            pos / arity,
            indices[pos],
            n
        )));
    }
    Ok(())
}

fn incidence(n: usize, flat: &[usize], arity: usize) -> (Vec<usize>, Vec<usize>) {
    let mut offsets = vec![0usize; n + 1];
    for &i in flat {
        offsets[i + 1] += 1;
    }
    for i in 0..n {
        offsets[i + 1] += offsets[i];
    }
    let mut fill = offsets.clone();
    let mut incident = vec![0usize; flat.len()];
    for (pos, &i) in flat.iter().enumerate() {
        incident[fill[i]] = pos / arity;
        fill[i] += 1;
    }
    (offsets, incident)
}
