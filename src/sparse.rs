use crate::error::{Error, Result};

use indexmap::IndexMap;

/// Which part of the matrix is stored.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
  #[default]
  General,
  /// Symmetric matrix, only entries with `row <= col` are stored.
  /// Writes below the diagonal are implied by their mirror and dropped.
  SymmetricUpper,
}

/// Sparse matrix under assembly.
///
/// Repeated writes to the same entry accumulate. Call [`SparseMatrix::finalize`]
/// to obtain the compressed [`PackedMatrix`] used by the solvers.
#[derive(Debug, Default, Clone)]
pub struct SparseMatrix {
  nrows: usize,
  ncols: usize,
  storage: Storage,
  entries: IndexMap<(usize, usize), f64>,
}

impl SparseMatrix {
  pub fn zeros(nrows: usize, ncols: usize, storage: Storage) -> Self {
    Self {
      nrows,
      ncols,
      storage,
      entries: IndexMap::new(),
    }
  }

  /// Reserves room for `nnz_estimate` entries up front.
  pub fn with_capacity(
    nrows: usize,
    ncols: usize,
    nnz_estimate: usize,
    storage: Storage,
  ) -> Result<Self> {
    let mut this = Self::zeros(nrows, ncols, storage);
    this
      .entries
      .try_reserve(nnz_estimate)
      .map_err(|_| Error::Allocation {
        what: "sparse matrix entries",
        len: nnz_estimate,
      })?;
    Ok(this)
  }

  pub fn nrows(&self) -> usize {
    self.nrows
  }
  pub fn ncols(&self) -> usize {
    self.ncols
  }
  pub fn storage(&self) -> Storage {
    self.storage
  }
  pub fn nentries(&self) -> usize {
    self.entries.len()
  }

  pub fn get(&self, r: usize, c: usize) -> f64 {
    self.entries.get(&(r, c)).copied().unwrap_or(0.0)
  }

  fn is_stored(&self, r: usize, c: usize) -> bool {
    assert!(r < self.nrows && c < self.ncols, "entry ({r},{c}) out of bounds");
    match self.storage {
      Storage::General => true,
      Storage::SymmetricUpper => r <= c,
    }
  }

  /// Adds `v` to entry `(r, c)`.
  pub fn accumulate(&mut self, r: usize, c: usize, v: f64) {
    if self.is_stored(r, c) {
      *self.entries.entry((r, c)).or_insert(0.0) += v;
    }
  }

  /// Replaces whatever was accumulated in entry `(r, c)` by `v`.
  pub fn overwrite(&mut self, r: usize, c: usize, v: f64) {
    if self.is_stored(r, c) {
      self.entries.insert((r, c), v);
    }
  }

  /// Compacts the entries into compressed sparse row layout.
  pub fn finalize(self) -> PackedMatrix {
    let mut coo = nas::CooMatrix::new(self.nrows, self.ncols);
    for ((r, c), v) in self.entries {
      coo.push(r, c, v);
    }
    PackedMatrix {
      storage: self.storage,
      csr: nas::CsrMatrix::from(&coo),
    }
  }
}

/// Compressed sparse row matrix, ready to be solved.
#[derive(Debug, Clone, PartialEq)]
pub struct PackedMatrix {
  storage: Storage,
  csr: nas::CsrMatrix<f64>,
}

impl PackedMatrix {
  pub fn nrows(&self) -> usize {
    self.csr.nrows()
  }
  pub fn ncols(&self) -> usize {
    self.csr.ncols()
  }
  pub fn storage(&self) -> Storage {
    self.storage
  }
  pub fn csr(&self) -> &nas::CsrMatrix<f64> {
    &self.csr
  }

  /// Number of stored entries.
  pub fn nnz(&self) -> usize {
    self.csr.nnz()
  }

  /// Stored entries in percent of all `nrows * ncols` entries.
  pub fn density(&self) -> f64 {
    let size = self.nrows() * self.ncols();
    if size == 0 {
      return 0.0;
    }
    100.0 * self.nnz() as f64 / size as f64
  }

  /// The value of entry `(r, c)` of the represented matrix.
  pub fn get(&self, mut r: usize, mut c: usize) -> f64 {
    if self.storage == Storage::SymmetricUpper && r > c {
      std::mem::swap(&mut r, &mut c);
    }
    self
      .csr
      .get_entry(r, c)
      .map_or(0.0, |entry| entry.into_value())
  }

  pub fn diagonal(&self) -> na::DVector<f64> {
    let n = self.nrows().min(self.ncols());
    na::DVector::from_iterator(n, (0..n).map(|i| self.get(i, i)))
  }

  pub fn triplets(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
    self.csr.triplet_iter().map(|(r, c, &v)| (r, c, v))
  }

  /// Matrix vector product, mirroring the upper triangle for symmetric storage.
  pub fn mul_vec(&self, x: &na::DVector<f64>) -> na::DVector<f64> {
    assert_eq!(x.len(), self.ncols());
    let mirror = self.storage == Storage::SymmetricUpper;

    let mut y = na::DVector::zeros(self.nrows());
    for (irow, row) in self.csr.row_iter().enumerate() {
      for (&icol, &v) in row.col_indices().iter().zip(row.values()) {
        y[irow] += v * x[icol];
        if mirror && icol != irow {
          y[icol] += v * x[irow];
        }
      }
    }
    y
  }

  /// Full dense reconstruction of the represented matrix.
  pub fn to_full_dense(&self) -> na::DMatrix<f64> {
    let mut dense = na::DMatrix::zeros(self.nrows(), self.ncols());
    for (r, c, v) in self.triplets() {
      dense[(r, c)] = v;
      if self.storage == Storage::SymmetricUpper {
        dense[(c, r)] = v;
      }
    }
    dense
  }

  /// Stored entries as a faer matrix, for the direct solver.
  pub fn to_faer_csc(&self) -> Option<faer::sparse::SparseColMat<usize, f64>> {
    let triplets: Vec<_> = self.triplets().collect();
    faer::sparse::SparseColMat::try_new_from_triplets(self.nrows(), self.ncols(), &triplets).ok()
  }
}
