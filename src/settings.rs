use crate::{assemble::Field, linalg::cg::CgSettings, mesh::MeshRelease};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
  Quiet,
  #[default]
  Normal,
  /// Also reports matrix statistics and applied boundary conditions.
  Verbose,
}

impl Verbosity {
  pub fn normal(self) -> bool {
    self >= Self::Normal
  }
  pub fn verbose(self) -> bool {
    self >= Self::Verbose
  }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LinearSolver {
  ConjugateGradient(CgSettings),
  /// Sparse Cholesky factorization.
  Cholesky,
}

impl Default for LinearSolver {
  fn default() -> Self {
    Self::ConjugateGradient(CgSettings::default())
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
  pub field: Field,
  /// Coefficient used for every element when no materials are given.
  pub default_alpha: f64,
  pub verbosity: Verbosity,
  pub release: MeshRelease,
  pub solver: LinearSolver,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      field: Field::Scalar,
      default_alpha: 1.0,
      verbosity: Verbosity::Normal,
      release: MeshRelease::Keep,
      solver: LinearSolver::default(),
    }
  }
}
