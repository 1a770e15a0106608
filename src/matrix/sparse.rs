// SparseMatrix trait and the CSR storage assembled rows end up in

/// A read‐only sparse matrix supporting y = A * x.
pub trait SparseMatrix<T> {
    /// Number of rows.
    fn nrows(&self) -> usize;
    /// Number of columns.
    fn ncols(&self) -> usize;
    /// Number of stored entries.
    fn nnz(&self) -> usize;
    /// Compute y = A * x.  `x.len() == ncols()`, `y.len() == nrows()`.
    fn spmv(&self, x: &[T], y: &mut [T]);
}

use faer::sparse::{
    SymbolicSparseRowMat,    // owning symbolic CSR alias
    SparseRowMat,            // owning numeric CSR alias
};
use faer::traits::ComplexField;

/// Row-compressed matrix. Rows may be a worker's local block of a larger matrix,
/// in which case columns stay global.
pub struct CsrMatrix<T> {
    inner: SparseRowMat<usize, T>,
    row_nnz: Vec<usize>,
}

impl<T: ComplexField + Copy> CsrMatrix<T> {
    /// Build a CSR from raw row‐ptr, col‐idx, and values.
    ///
    /// Column indices must be sorted and unique within every row.
    pub fn from_csr(
        nrows: usize,
        ncols: usize,
        row_ptr: Vec<usize>,
        col_idx: Vec<usize>,
        values: Vec<T>,
    ) -> Self {
        assert_eq!(row_ptr.len(), nrows + 1, "row_ptr must have nrows + 1 entries");
        assert_eq!(col_idx.len(), values.len(), "col_idx and values disagree in length");
        let row_nnz = row_ptr.windows(2).map(|w| w[1] - w[0]).collect();
        // Build symbolic structure; second argument `None` means “no separate row_nnz”:
        let symbolic = SymbolicSparseRowMat::new_checked(
            nrows,
            ncols,
            row_ptr,
            None,      // optional row_nnz: Option<Vec<usize>>
            col_idx,
        );
        // Attach the numerical values:
        let inner = SparseRowMat::new(symbolic, values);
        Self { inner, row_nnz }
    }

    /// Stored entries in row `i`.
    pub fn row_nnz(&self, i: usize) -> usize {
        self.row_nnz[i]
    }

    /// Dense copy, for inspection of small matrices.
    pub fn to_dense(&self) -> faer::Mat<T> {
        self.inner.to_dense()
    }
}

impl<T: ComplexField + Copy> SparseMatrix<T> for CsrMatrix<T> {
    fn nrows(&self) -> usize {
        self.inner.nrows()
    }
    fn ncols(&self) -> usize {
        self.inner.ncols()
    }
    fn nnz(&self) -> usize {
        self.row_nnz.iter().sum()
    }
    fn spmv(&self, x: &[T], y: &mut [T]) {
        assert_eq!(x.len(), self.ncols());
        assert_eq!(y.len(), self.nrows());
        let x_mat = faer::Mat::<T>::from_fn(self.ncols(), 1, |i, _| x[i]);
        let mut y_mat = faer::Mat::<T>::zeros(self.nrows(), 1);
        // Fallback: convert to dense and multiply
        let dense = self.inner.to_dense();
        y_mat.copy_from(&dense * &x_mat);
        for i in 0..y.len() {
            y[i] = y_mat[(i, 0)];
        }
    }
}
