//! Preconditioned conjugate gradient method.

use super::{inverse_diagonal, SolveReport, SolveStatus};
use crate::sparse::PackedMatrix;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Preconditioner {
  None,
  /// Diagonal scaling.
  #[default]
  Jacobi,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CgSettings {
  /// Scaled relative residual at which the iteration stops.
  pub tolerance: f64,
  pub max_iterations: usize,
  pub preconditioner: Preconditioner,
}

impl Default for CgSettings {
  fn default() -> Self {
    Self {
      tolerance: 1e-6,
      max_iterations: 10_000,
      preconditioner: Preconditioner::Jacobi,
    }
  }
}

/// Solves `A x = b` for symmetric positive definite `A`.
///
/// `x` supplies the initial guess and receives the result.
/// Convergence is measured by the diagonally scaled relative residual
/// of [`super::relative_residual`].
pub fn solve_cg(
  a: &PackedMatrix,
  x: &mut na::DVector<f64>,
  b: &na::DVector<f64>,
  settings: &CgSettings,
) -> SolveReport {
  assert_eq!(a.nrows(), a.ncols());
  assert_eq!(x.len(), a.ncols());
  assert_eq!(b.len(), a.nrows());

  let dinv = inverse_diagonal(a);
  let minv = match settings.preconditioner {
    Preconditioner::None => na::DVector::from_element(a.nrows(), 1.0),
    Preconditioner::Jacobi => dinv.clone(),
  };
  let bnorm = b.component_mul(&dinv).norm();
  let scale = if bnorm > 0.0 { bnorm.recip() } else { 1.0 };

  let mut r = b - a.mul_vec(x);
  let mut error = r.component_mul(&dinv).norm() * scale;
  if error <= settings.tolerance {
    return SolveReport {
      status: SolveStatus::Converged,
      error,
      iterations: 0,
    };
  }

  let mut z = r.component_mul(&minv);
  let mut p = z.clone();
  let mut rz = r.dot(&z);

  for iteration in 1..=settings.max_iterations {
    let q = a.mul_vec(&p);
    let pq = p.dot(&q);
    if pq <= 0.0 || !pq.is_finite() {
      tracing::debug!("cg breakdown at iteration {iteration}: p.Ap = {pq:e}");
      return SolveReport {
        status: SolveStatus::Breakdown,
        error,
        iterations: iteration,
      };
    }

    let step = rz / pq;
    x.axpy(step, &p, 1.0);
    r.axpy(-step, &q, 1.0);

    error = r.component_mul(&dinv).norm() * scale;
    if error <= settings.tolerance {
      return SolveReport {
        status: SolveStatus::Converged,
        error,
        iterations: iteration,
      };
    }

    z = r.component_mul(&minv);
    let rz_next = r.dot(&z);
    let beta = rz_next / rz;
    rz = rz_next;
    p.axpy(1.0, &z, beta);
  }

  SolveReport {
    status: SolveStatus::MaxIterations,
    error,
    iterations: settings.max_iterations,
  }
}
