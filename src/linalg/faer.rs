//! Sparse direct solve through faer.

use super::{relative_residual, SolveReport, SolveStatus};
use crate::{
  error::{Error, Result},
  sparse::PackedMatrix,
};

pub struct FaerCholesky {
  raw: faer::sparse::linalg::solvers::Cholesky<usize, f64>,
}

impl FaerCholesky {
  /// Factors a symmetric positive definite matrix.
  ///
  /// Only the upper triangle is read.
  pub fn new(a: &PackedMatrix) -> Result<Self> {
    let raw = a
      .to_faer_csc()
      .ok_or(Error::Factorization)?
      .sp_cholesky(faer::Side::Upper)
      .map_err(|_| Error::Factorization)?;
    Ok(Self { raw })
  }

  pub fn solve(&self, b: &na::DVector<f64>) -> na::DVector<f64> {
    use faer::solvers::SpSolver as _;

    let b = faer::col::from_slice(b.as_slice());
    na::DVector::from_vec(self.raw.solve(b).as_slice().to_vec())
  }
}

/// Solves `A x = b` directly, overwriting `x`.
pub fn solve_cholesky(
  a: &PackedMatrix,
  x: &mut na::DVector<f64>,
  b: &na::DVector<f64>,
) -> Result<SolveReport> {
  *x = FaerCholesky::new(a)?.solve(b);
  Ok(SolveReport {
    status: SolveStatus::Converged,
    error: relative_residual(a, x, b),
    iterations: 0,
  })
}
