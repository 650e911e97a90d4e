//! Compares the P1 stiffness matrix on structured rectangle meshes
//! with the 5-point finite difference Laplacian.
//!
//! On this triangulation the stiffness matrix of the negative Laplacian does not
//! depend on the mesh width and is the integer (graph) Laplacian on interior nodes.
//! The stiffness part is isolated by assembling with `alpha = 1` and `alpha = 0`,
//! which differ by exactly the stiffness matrix.

extern crate nalgebra as na;

use helmholtz2d::{
  assemble::{assemble_scalar_galmat, AssemblyContext},
  mesh::rectangle::RectangleMeshInfo,
  problems::helmholtz::Problem,
  settings::Settings,
};

use approx::assert_relative_eq;

fn assemble_dense(problem: &Problem, alpha: f64) -> na::DMatrix<f64> {
  let solution = na::DVector::zeros(problem.mesh.nvertices());
  let settings = Settings {
    default_alpha: alpha,
    ..Default::default()
  };
  let ctx = AssemblyContext::new(problem, &solution, &settings).unwrap();
  assemble_scalar_galmat(&ctx).unwrap().to_full_dense()
}

#[test]
fn fe_vs_fd() {
  for nboxes_per_dim in [2, 3, 5, 8] {
    let info = RectangleMeshInfo::new_unit(nboxes_per_dim);
    let problem = Problem::new(info.compute_mesh().unwrap());

    let mass = assemble_dense(&problem, 0.0);
    let stiffness = assemble_dense(&problem, 1.0) - &mass;
    let fd_laplacian = laplacian_2d_dirichlet(nboxes_per_dim + 1);

    for inode in 0..info.nnodes() {
      if info.is_node_on_boundary(inode) {
        continue;
      }
      assert_relative_eq!(
        stiffness.row(inode),
        fd_laplacian.row(inode),
        epsilon = 1e-12
      );
    }
  }
}

#[test]
fn stiffness_annihilates_constants() {
  let info = RectangleMeshInfo::new_unit(4);
  let problem = Problem::new(info.compute_mesh().unwrap());
  let stiffness = assemble_dense(&problem, 1.0) - assemble_dense(&problem, 0.0);
  let ones = na::DVector::from_element(info.nnodes(), 1.0);
  assert_relative_eq!(
    &stiffness * ones,
    na::DVector::zeros(info.nnodes()),
    epsilon = 1e-12
  );
}

#[test]
fn mass_integrates_the_domain() {
  let info = RectangleMeshInfo::new_min_max(
    na::Point2::new(-1.0, 0.0),
    na::Point2::new(2.0, 0.5),
    [6, 2],
  );
  let problem = Problem::new(info.compute_mesh().unwrap());
  let mass = assemble_dense(&problem, 0.0);
  assert_relative_eq!(mass.sum(), 1.5, epsilon = 1e-12);
}

#[test]
fn stiffness_scales_with_alpha() {
  let info = RectangleMeshInfo::new_unit(3);
  let problem = Problem::new(info.compute_mesh().unwrap());
  let mass = assemble_dense(&problem, 0.0);
  let stiffness = assemble_dense(&problem, 1.0) - &mass;
  let scaled = assemble_dense(&problem, 2.5) - &mass;
  assert_relative_eq!(scaled, 2.5 * stiffness, epsilon = 1e-12);
}

fn laplacian_2d_dirichlet(nnodes_per_dim: usize) -> na::DMatrix<f64> {
  let lapl = laplacian_1d_dirichlet(nnodes_per_dim);
  let eye = na::DMatrix::identity(nnodes_per_dim, nnodes_per_dim);
  eye.kronecker(&lapl) + lapl.kronecker(&eye)
}

fn laplacian_1d_dirichlet(size: usize) -> na::DMatrix<f64> {
  na::DMatrix::from_fn(size, size, |r, c| {
    if r == c {
      2.0
    } else if r.abs_diff(c) == 1 {
      -1.0
    } else {
      0.0
    }
  })
}
