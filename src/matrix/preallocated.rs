//! A worker's block of rows with storage reserved from nonzero counts.
//!
//! Each owned row reserves `local` slots for columns inside the ownership range
//! (the diagonal block) and `remote` slots for the others (the off-diagonal
//! block). Insertions add into existing entries; a new entry that does not fit in
//! its block's reservation either counts as a malloc or, with
//! `new_nonzero_allocation_err`, fails with [`PreallocError::AllocationError`].

use crate::config::PreallocOptions;
use crate::error::{PreallocError, Result};
use crate::matrix::sparse::CsrMatrix;
use crate::mesh::TriMesh;
use crate::partition::OwnershipRange;
use crate::prealloc::NnzCounts;
use std::collections::BTreeMap;

/// Storage statistics reported by [`PreallocatedMatrix::assemble`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AssemblyInfo {
    /// Stored entries after assembly
    pub nnz: usize,
    /// Slots reserved up front
    pub reserved: usize,
    /// Entries that did not fit their row's reservation
    pub mallocs: usize,
    /// Reserved slots that were never used
    pub unused: usize,
}

#[derive(Debug, Clone)]
struct Row {
    entries: BTreeMap<usize, f64>,
    diag_reserved: usize,
    off_reserved: usize,
    diag_used: usize,
    off_used: usize,
}

#[derive(Debug, Clone)]
pub struct PreallocatedMatrix {
    range: OwnershipRange,
    ncols: usize,
    rows: Vec<Row>,
    mallocs: usize,
    new_nonzero_allocation_err: bool,
}

impl PreallocatedMatrix {
    /// Reserve storage for the rows of `range` in a square matrix of order `ncols`.
    pub fn new(range: OwnershipRange, ncols: usize, counts: &NnzCounts, options: &PreallocOptions) -> Result<Self> {
        if range.end() > ncols {
            return Err(PreallocError::InvalidPartition { start: range.start(), end: range.end(), n: ncols });
        }
        for found in [counts.local.len(), counts.remote.len()] {
            if found != range.len() {
                return Err(PreallocError::LengthMismatch {
                    what: "row counts for the ownership range",
                    expected: range.len(),
                    found,
                });
            }
        }
        let rows = counts
            .local
            .iter()
            .zip(&counts.remote)
            .map(|(&diag_reserved, &off_reserved)| Row {
                entries: BTreeMap::new(),
                diag_reserved,
                off_reserved,
                diag_used: 0,
                off_used: 0,
            })
            .collect();
        Ok(PreallocatedMatrix {
            range,
            ncols,
            rows,
            mallocs: 0,
            new_nonzero_allocation_err: options.new_nonzero_allocation_err,
        })
    }

    pub fn range(&self) -> OwnershipRange {
        self.range
    }

    /// Number of insertions so far that needed storage beyond the reservation.
    pub fn mallocs(&self) -> usize {
        self.mallocs
    }

    /// Stored entries so far.
    pub fn nnz(&self) -> usize {
        self.rows.iter().map(|r| r.entries.len()).sum()
    }

    /// Add `values` into global row `row` at global columns `cols`.
    ///
    /// Every column is checked before anything is stored: a call that fails leaves
    /// the matrix exactly as it was.
    pub fn add_values(&mut self, row: usize, cols: &[usize], values: &[f64]) -> Result<()> {
        if cols.len() != values.len() {
            return Err(PreallocError::LengthMismatch {
                what: "values for the given columns",
                expected: cols.len(),
                found: values.len(),
            });
        }
        let iloc = self.range.to_local(row).ok_or(PreallocError::RowNotOwned {
            row,
            start: self.range.start(),
            end: self.range.end(),
        })?;

        let r = &self.rows[iloc];
        let mut new_cols: Vec<usize> = Vec::new();
        let (mut diag_used, mut off_used) = (r.diag_used, r.off_used);
        let mut new_mallocs = 0;
        for &col in cols {
            if col >= self.ncols {
                return Err(PreallocError::ColumnOutOfRange { col, ncols: self.ncols });
            }
            if r.entries.contains_key(&col) || new_cols.contains(&col) {
                continue;
            }
            let (used, reserved) = if self.range.contains(col) {
                (&mut diag_used, r.diag_reserved)
            } else {
                (&mut off_used, r.off_reserved)
            };
            if *used >= reserved {
                if self.new_nonzero_allocation_err {
                    return Err(PreallocError::AllocationError { row, col });
                }
                new_mallocs += 1;
            }
            *used += 1;
            new_cols.push(col);
        }

        let r = &mut self.rows[iloc];
        r.diag_used = diag_used;
        r.off_used = off_used;
        for (&col, &value) in cols.iter().zip(values) {
            *r.entries.entry(col).or_insert(0.0) += value;
        }
        self.mallocs += new_mallocs;
        Ok(())
    }

    /// Compress into CSR. Rows are local (row `i` is global row `range.start() + i`),
    /// columns are global.
    pub fn assemble(self) -> (CsrMatrix<f64>, AssemblyInfo) {
        let reserved: usize = self.rows.iter().map(|r| r.diag_reserved + r.off_reserved).sum();
        let unused: usize = self
            .rows
            .iter()
            .map(|r| r.diag_reserved.saturating_sub(r.diag_used) + r.off_reserved.saturating_sub(r.off_used))
            .sum();

        let mut row_ptr = Vec::with_capacity(self.rows.len() + 1);
        let mut col_idx = Vec::new();
        let mut values = Vec::new();
        row_ptr.push(0);
        for row in self.rows {
            for (col, value) in row.entries {
                col_idx.push(col);
                values.push(value);
            }
            row_ptr.push(col_idx.len());
        }
        let info = AssemblyInfo { nnz: col_idx.len(), reserved, mallocs: self.mallocs, unused };
        log::debug!(
            "rows [{}, {}): {} nonzeros, {} reserved, {} unused, {} mallocs",
            self.range.start(),
            self.range.end(),
            info.nnz,
            info.reserved,
            info.unused,
            info.mallocs
        );
        let matrix = CsrMatrix::from_csr(self.range.len(), self.ncols, row_ptr, col_idx, values);
        (matrix, info)
    }
}

/// Fill the owned rows with 1.0 for every node pair of every triangle that
/// touches an owned node, then assemble.
///
/// This reproduces the sparsity of a P1 stiffness matrix and shows whether
/// `counts` reserved enough storage for it.
pub fn assemble_element_pattern(
    mesh: &TriMesh,
    range: OwnershipRange,
    counts: &NnzCounts,
    options: &PreallocOptions,
) -> Result<(CsrMatrix<f64>, AssemblyInfo)> {
    let mut matrix = PreallocatedMatrix::new(range, mesh.num_nodes(), counts, options)?;
    let ones = [1.0; 3];
    for element in mesh.elements() {
        for &i in element.iter().filter(|&&i| range.contains(i)) {
            matrix.add_values(i, &element, &ones)?;
        }
    }
    Ok(matrix.assemble())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::sparse::SparseMatrix;
    use crate::mesh::BoundaryType;

    fn triangle() -> TriMesh {
        TriMesh::new(vec![0.0, 1.0, 0.0], vec![0.0, 0.0, 1.0], vec![BoundaryType::Interior; 3], vec![0, 1, 2], vec![])
            .unwrap()
    }

    #[test]
    fn exact_counts_need_no_mallocs() {
        let mesh = triangle();
        let range = OwnershipRange::full(3);
        let counts = NnzCounts { local: vec![3; 3], remote: vec![0; 3] };
        let (a, info) = assemble_element_pattern(&mesh, range, &counts, &PreallocOptions::default()).unwrap();
        assert_eq!(info, AssemblyInfo { nnz: 9, reserved: 9, mallocs: 0, unused: 0 });
        let mut y = vec![0.0; 3];
        a.spmv(&[1.0; 3], &mut y);
        assert_eq!(y, vec![3.0; 3]);
    }

    #[test]
    fn short_counts_malloc() {
        let mesh = triangle();
        let range = OwnershipRange::full(3);
        let counts = NnzCounts { local: vec![2; 3], remote: vec![0; 3] };
        let (_, info) = assemble_element_pattern(&mesh, range, &counts, &PreallocOptions::default()).unwrap();
        assert_eq!(info.mallocs, 3);
        assert_eq!(info.unused, 0);

        let strict = PreallocOptions::default().with_allocation_err(true);
        assert!(matches!(
            assemble_element_pattern(&mesh, range, &counts, &strict),
            Err(PreallocError::AllocationError { row: 0, col: 2 })
        ));
    }

    #[test]
    fn repeated_insertions_add() {
        let range = OwnershipRange::new(0, 2, 4).unwrap();
        let counts = NnzCounts { local: vec![1, 1], remote: vec![1, 0] };
        let mut m = PreallocatedMatrix::new(range, 4, &counts, &PreallocOptions::default()).unwrap();
        m.add_values(0, &[0, 3], &[1.0, 2.0]).unwrap();
        m.add_values(0, &[3, 0], &[0.5, 1.0]).unwrap();
        m.add_values(1, &[1], &[4.0]).unwrap();
        assert_eq!(m.mallocs(), 0);
        let (a, info) = m.assemble();
        assert_eq!(info.nnz, 3);
        let dense = a.to_dense();
        assert_eq!(dense[(0, 0)], 2.0);
        assert_eq!(dense[(0, 3)], 2.5);
        assert_eq!(dense[(1, 1)], 4.0);
    }

    #[test]
    fn off_diagonal_block_has_its_own_reservation() {
        let range = OwnershipRange::new(0, 1, 3).unwrap();
        let counts = NnzCounts { local: vec![2], remote: vec![0] };
        let mut m = PreallocatedMatrix::new(range, 3, &counts, &PreallocOptions::default()).unwrap();
        m.add_values(0, &[0, 2], &[1.0, 1.0]).unwrap();
        assert_eq!(m.mallocs(), 1);
    }

    #[test]
    fn rejects_foreign_rows_and_columns() {
        let range = OwnershipRange::new(0, 2, 4).unwrap();
        let counts = NnzCounts { local: vec![1, 1], remote: vec![0, 0] };
        let mut m = PreallocatedMatrix::new(range, 4, &counts, &PreallocOptions::default()).unwrap();
        assert!(matches!(
            m.add_values(2, &[0], &[1.0]),
            Err(PreallocError::RowNotOwned { row: 2, start: 0, end: 2 })
        ));
        assert!(matches!(
            m.add_values(0, &[4], &[1.0]),
            Err(PreallocError::ColumnOutOfRange { col: 4, ncols: 4 })
        ));
    }

    #[test]
    fn counts_must_match_range() {
        let range = OwnershipRange::new(0, 2, 4).unwrap();
        let counts = NnzCounts { local: vec![1], remote: vec![0] };
        assert_eq!(
            PreallocatedMatrix::new(range, 4, &counts, &PreallocOptions::default()).unwrap_err(),
            PreallocError::LengthMismatch { what: "row counts for the ownership range", expected: 2, found: 1 }
        );
        let counts = NnzCounts { local: vec![1, 1], remote: vec![0, 0, 0] };
        assert!(matches!(
            PreallocatedMatrix::new(range, 4, &counts, &PreallocOptions::default()),
            Err(PreallocError::LengthMismatch { expected: 2, found: 3, .. })
        ));
        let counts = NnzCounts { local: vec![1, 1], remote: vec![0, 0] };
        assert!(matches!(
            PreallocatedMatrix::new(range, 1, &counts, &PreallocOptions::default()),
            Err(PreallocError::InvalidPartition { start: 0, end: 2, n: 1 })
        ));
    }

    #[test]
    fn values_must_match_columns() {
        let range = OwnershipRange::new(0, 2, 4).unwrap();
        let counts = NnzCounts { local: vec![2, 2], remote: vec![0, 0] };
        let mut m = PreallocatedMatrix::new(range, 4, &counts, &PreallocOptions::default()).unwrap();
        assert_eq!(
            m.add_values(0, &[0, 1], &[1.0]),
            Err(PreallocError::LengthMismatch { what: "values for the given columns", expected: 2, found: 1 })
        );
        assert_eq!(m.nnz(), 0);
    }

    #[test]
    fn bad_column_leaves_row_untouched() {
        let range = OwnershipRange::new(0, 2, 4).unwrap();
        let counts = NnzCounts { local: vec![2, 2], remote: vec![0, 0] };
        let mut m = PreallocatedMatrix::new(range, 4, &counts, &PreallocOptions::default()).unwrap();
        assert_eq!(
            m.add_values(0, &[0, 9], &[1.0, 1.0]),
            Err(PreallocError::ColumnOutOfRange { col: 9, ncols: 4 })
        );
        assert_eq!(m.nnz(), 0);
        assert_eq!(m.mallocs(), 0);
        let (_, info) = m.assemble();
        assert_eq!(info, AssemblyInfo { nnz: 0, reserved: 4, mallocs: 0, unused: 4 });
    }

    #[test]
    fn strict_rejection_leaves_row_untouched() {
        let range = OwnershipRange::new(0, 2, 4).unwrap();
        let counts = NnzCounts { local: vec![1, 1], remote: vec![0, 0] };
        let strict = PreallocOptions::default().with_allocation_err(true);
        let mut m = PreallocatedMatrix::new(range, 4, &counts, &strict).unwrap();
        assert_eq!(
            m.add_values(0, &[0, 1], &[1.0, 1.0]),
            Err(PreallocError::AllocationError { row: 0, col: 1 })
        );
        assert_eq!(m.nnz(), 0);
        assert_eq!(m.mallocs(), 0);

        // the reserved slot is still free for a call that fits
        m.add_values(0, &[1], &[2.0]).unwrap();
        let (a, info) = m.assemble();
        assert_eq!(info, AssemblyInfo { nnz: 1, reserved: 2, mallocs: 0, unused: 1 });
        assert_eq!(a.to_dense()[(0, 1)], 2.0);
    }

    #[test]
    fn duplicate_columns_in_one_call_take_one_slot() {
        let range = OwnershipRange::new(0, 1, 2).unwrap();
        let counts = NnzCounts { local: vec![1], remote: vec![0] };
        let strict = PreallocOptions::default().with_allocation_err(true);
        let mut m = PreallocatedMatrix::new(range, 2, &counts, &strict).unwrap();
        m.add_values(0, &[0, 0], &[1.0, 0.5]).unwrap();
        let (a, info) = m.assemble();
        assert_eq!(info.nnz, 1);
        assert_eq!(a.to_dense()[(0, 0)], 1.5);
    }
}
