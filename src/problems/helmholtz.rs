//! Module for the Helmholtz-type elliptic problem `u - div(alpha grad u) = 0`
//! with Dirichlet conditions, for scalar and 2-component vector fields.

use crate::{
  assemble::{self, AssemblyContext, Field},
  boundary::BoundaryCondition,
  error::Result,
  linalg::{cg, faer, SolveReport},
  material::Material,
  mesh::Mesh,
  settings::{LinearSolver, Settings},
};

/// Inputs of a solve: the mesh and the lists its reference tags are resolved against.
#[derive(Debug, Clone, Default)]
pub struct Problem {
  pub mesh: Mesh,
  pub conditions: Vec<BoundaryCondition>,
  pub materials: Vec<Material>,
}

impl Problem {
  pub fn new(mesh: Mesh) -> Self {
    Self {
      mesh,
      conditions: Vec::new(),
      materials: Vec::new(),
    }
  }

  pub fn with_conditions(mut self, conditions: Vec<BoundaryCondition>) -> Self {
    self.conditions = conditions;
    self
  }

  pub fn with_materials(mut self, materials: Vec<Material>) -> Self {
    self.materials = materials;
    self
  }
}

/// Assembles and solves the linear system.
///
/// `solution` supplies the initial guess, and the values of conditions following
/// the solution, and receives the result. The mesh storage is released after
/// assembly as requested by `settings.release`.
///
/// Fatal assembly failures are returned as errors. Non-convergence of the
/// solver is not an error: check [`SolveReport::converged`].
pub fn solve_helmholtz(
  problem: &mut Problem,
  solution: &mut na::DVector<f64>,
  settings: &Settings,
) -> Result<SolveReport> {
  let verbosity = settings.verbosity;
  if verbosity.normal() {
    tracing::info!("matrix and right-hand side assembly");
  }

  let (galmat, galvec) = {
    let ctx = AssemblyContext::new(problem, solution, settings)?;
    let galmat = match settings.field {
      Field::Scalar => assemble::assemble_scalar_galmat(&ctx)?,
      Field::Vector => assemble::assemble_vector_galmat(&ctx)?,
    };
    let galvec = assemble::assemble_rhs(&ctx)?;
    (galmat, galvec)
  };

  problem.mesh.release(settings.release);

  if verbosity.normal() {
    tracing::info!("solving linear system");
  }
  let report = match &settings.solver {
    LinearSolver::ConjugateGradient(cg_settings) => {
      cg::solve_cg(&galmat, solution, &galvec, cg_settings)
    }
    LinearSolver::Cholesky => faer::solve_cholesky(&galmat, solution, &galvec)?,
  };

  if verbosity.normal() {
    if report.converged() {
      tracing::info!(
        "{:e} in {} iterations",
        report.error,
        report.iterations
      );
    } else {
      tracing::warn!("convergence problem: {}", report.status.code());
    }
  }

  Ok(report)
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::{
    boundary::Entity,
    error::Error,
    mesh::{MeshRelease, Point, Triangle},
  };

  fn triangle() -> Problem {
    let points = vec![
      Point::new(0.0, 0.0, 1),
      Point::new(1.0, 0.0, 1),
      Point::new(0.0, 1.0, 1),
    ];
    let triangles = vec![Triangle::new([0, 1, 2], 0)];
    Problem::new(Mesh::new(points, triangles, vec![]).unwrap()).with_conditions(vec![
      BoundaryCondition::dirichlet_scalar(1, Entity::Vertex, 2.0),
    ])
  }

  #[test]
  fn release_after_assembly_is_one_way() {
    let mut problem = triangle();
    let mut solution = na::DVector::zeros(3);
    let settings = Settings {
      release: MeshRelease::Elements,
      ..Default::default()
    };

    let report = solve_helmholtz(&mut problem, &mut solution, &settings).unwrap();
    assert!(report.converged());
    assert!(problem.mesh.is_released());
    assert_eq!(problem.mesh.ncells(), 0);
    assert_eq!(problem.mesh.nvertices(), 3);

    let err = solve_helmholtz(&mut problem, &mut solution, &settings).unwrap_err();
    assert!(matches!(err, Error::MeshReleased));
  }

  #[test]
  fn kept_mesh_can_be_solved_again() {
    let mut problem = triangle();
    let mut solution = na::DVector::zeros(3);
    let settings = Settings::default();
    solve_helmholtz(&mut problem, &mut solution, &settings).unwrap();
    let first = solution.clone();
    let report = solve_helmholtz(&mut problem, &mut solution, &settings).unwrap();
    assert!(report.converged());
    assert_eq!(report.iterations, 0);
    assert_eq!(solution, first);
  }

  #[test]
  fn wrong_initial_guess_length() {
    let mut problem = triangle();
    let mut solution = na::DVector::zeros(6);
    let err = solve_helmholtz(&mut problem, &mut solution, &Settings::default()).unwrap_err();
    assert!(matches!(
      err,
      Error::SolutionLength {
        expected: 3,
        found: 6
      }
    ));
    assert!(!problem.mesh.is_released());
  }
}
