//! Linear solvers for the assembled system.

use crate::sparse::PackedMatrix;

pub mod cg;
pub mod faer;

/// Termination state of a linear solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
  Converged,
  /// Iteration cap reached before the tolerance.
  MaxIterations,
  /// The search direction lost positive curvature.
  Breakdown,
}

impl SolveStatus {
  /// Positive iff converged.
  pub fn code(self) -> i32 {
    match self {
      Self::Converged => 1,
      Self::MaxIterations => 0,
      Self::Breakdown => -1,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveReport {
  pub status: SolveStatus,
  /// Achieved relative residual, see [`relative_residual`].
  pub error: f64,
  pub iterations: usize,
}

impl SolveReport {
  pub fn converged(&self) -> bool {
    self.status.code() > 0
  }
}

/// Inverse of the diagonal of `a`. Zero diagonal entries are treated as one.
pub fn inverse_diagonal(a: &PackedMatrix) -> na::DVector<f64> {
  a.diagonal().map(|d| if d != 0.0 { d.recip() } else { 1.0 })
}

/// Relative residual `||D^-1 (b - A x)|| / ||D^-1 b||`, with `D` the diagonal of `A`.
///
/// The diagonal scaling keeps penalized rows from dominating the norm.
/// Absolute for `b = 0`.
pub fn relative_residual(a: &PackedMatrix, x: &na::DVector<f64>, b: &na::DVector<f64>) -> f64 {
  let dinv = inverse_diagonal(a);
  let residual = (b - a.mul_vec(x)).component_mul(&dinv).norm();
  let bnorm = b.component_mul(&dinv).norm();
  if bnorm > 0.0 {
    residual / bnorm
  } else {
    residual
  }
}
