//! Assembly of the global Galerkin matrix and the right-hand side.

use crate::{
  boundary::{BoundaryCondition, ConstraintMode},
  dirichlet,
  error::{Error, Result},
  fe::{ElMat, ElmatProvider, ScalarHelmholtzElmat, VectorHelmholtzElmat},
  geometry::TriangleGeometry,
  material::{find_material, Material},
  mesh::{CellIdx, Mesh, Triangle, VertexIdx},
  problems::helmholtz::Problem,
  settings::{Settings, Verbosity},
  sparse::{PackedMatrix, SparseMatrix, Storage},
};

use std::ops::Range;

pub type DofIdx = usize;
pub type GalVec = na::DVector<f64>;

/// The unknown field, selecting the number of DOFs per mesh node.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Field {
  #[default]
  Scalar,
  /// Two components per node, interleaved as `(x, y)`.
  Vector,
}

impl Field {
  pub fn ncomponents(self) -> usize {
    match self {
      Self::Scalar => 1,
      Self::Vector => 2,
    }
  }

  pub fn ndofs(self, nvertices: usize) -> usize {
    self.ncomponents() * nvertices
  }

  /// Global DOFs of mesh node `ivertex`.
  pub fn node_dofs(self, ivertex: VertexIdx) -> Range<DofIdx> {
    let n = self.ncomponents();
    n * ivertex..n * (ivertex + 1)
  }
}

/// Read-only inputs of one assembly.
#[derive(Debug, Clone, Copy)]
pub struct AssemblyContext<'a> {
  pub mesh: &'a Mesh,
  pub conditions: &'a [BoundaryCondition],
  pub materials: &'a [Material],
  /// Current solution, read by conditions following the solution.
  pub solution: &'a na::DVector<f64>,
  pub field: Field,
  pub default_alpha: f64,
  pub verbosity: Verbosity,
}

impl<'a> AssemblyContext<'a> {
  pub fn new(
    problem: &'a Problem,
    solution: &'a na::DVector<f64>,
    settings: &Settings,
  ) -> Result<Self> {
    if problem.mesh.is_released() {
      return Err(Error::MeshReleased);
    }
    let expected = settings.field.ndofs(problem.mesh.nvertices());
    if solution.len() != expected {
      return Err(Error::SolutionLength {
        expected,
        found: solution.len(),
      });
    }

    Ok(Self {
      mesh: &problem.mesh,
      conditions: &problem.conditions,
      materials: &problem.materials,
      solution,
      field: settings.field,
      default_alpha: settings.default_alpha,
      verbosity: settings.verbosity,
    })
  }

  pub fn ndofs(&self) -> usize {
    self.field.ndofs(self.mesh.nvertices())
  }

  pub fn constraint_mode(&self) -> Option<ConstraintMode> {
    ConstraintMode::detect(self.conditions)
  }
}

/// Calls `f` with the element matrix of every triangle taking part in assembly.
///
/// Triangles whose region tag is missing from a non-empty material list are skipped.
fn for_each_elmat<P, F>(ctx: &AssemblyContext, provider: impl Fn(f64) -> P, mut f: F) -> Result<()>
where
  P: ElmatProvider,
  F: FnMut(&Triangle, ElMat),
{
  for (icell, cell) in ctx.mesh.triangles().iter().enumerate() {
    let Some(alpha) =
      find_material(ctx.materials, cell.reference, ctx.default_alpha).coefficient()
    else {
      tracing::debug!("skipping triangle {icell}, no material for reference {}", cell.reference);
      continue;
    };
    let geo = cell_geometry(ctx.mesh, icell, cell)?;
    f(cell, provider(alpha).eval(&geo));
  }
  Ok(())
}

fn cell_geometry(mesh: &Mesh, icell: CellIdx, cell: &Triangle) -> Result<TriangleGeometry> {
  let coords = mesh.cell_coords(cell);
  TriangleGeometry::new(coords).ok_or_else(|| {
    let [p0, p1, p2] = coords;
    let det = (p1 - p0).perp(&(p2 - p0));
    Error::DegenerateElement { cell: icell, det }
  })
}

fn new_galmat(ctx: &AssemblyContext) -> Result<SparseMatrix> {
  let ndofs = ctx.ndofs();
  let nnz_estimate = 10 * ctx.mesh.nvertices();
  SparseMatrix::with_capacity(ndofs, ndofs, nnz_estimate, Storage::SymmetricUpper)
}

fn finish_galmat(ctx: &AssemblyContext, mut galmat: SparseMatrix) -> PackedMatrix {
  dirichlet::enforce_penalty(ctx, &mut galmat);
  let galmat = galmat.finalize();
  if ctx.verbosity.verbose() {
    tracing::info!(
      "{}x{} matrix, {:.2} sparsity",
      galmat.nrows(),
      galmat.ncols(),
      galmat.density()
    );
  }
  galmat
}

/// Galerkin matrix for a scalar field, one DOF per node.
///
/// Dirichlet conditions are enforced before the matrix is packed.
pub fn assemble_scalar_galmat(ctx: &AssemblyContext) -> Result<PackedMatrix> {
  let mut galmat = new_galmat(ctx)?;

  for_each_elmat(
    ctx,
    |alpha| ScalarHelmholtzElmat { alpha },
    |cell, elmat| {
      for i in 0..3 {
        for j in i..3 {
          let ni = cell.vertices[i];
          let nj = cell.vertices[j];
          galmat.accumulate(ni.min(nj), ni.max(nj), elmat[(i, j)]);
        }
      }
    },
  )?;

  Ok(finish_galmat(ctx, galmat))
}

/// Galerkin matrix for a two-component vector field.
///
/// The element matrix is written into the `x` and the `y` block alike,
/// the components do not couple.
pub fn assemble_vector_galmat(ctx: &AssemblyContext) -> Result<PackedMatrix> {
  let mut galmat = new_galmat(ctx)?;

  for_each_elmat(
    ctx,
    |alpha| VectorHelmholtzElmat { alpha },
    |cell, elmat| {
      for i in 0..3 {
        for j in i..3 {
          let kij = elmat[(i, j)];
          let il = 2 * cell.vertices[i];
          let ic = 2 * cell.vertices[j];
          if i == j {
            galmat.accumulate(il, ic, kij);
            galmat.accumulate(il + 1, ic + 1, kij);
          } else {
            galmat.accumulate(il, ic, kij);
            galmat.accumulate(ic, il, kij);
            galmat.accumulate(il + 1, ic + 1, kij);
            galmat.accumulate(ic + 1, il + 1, kij);
          }
        }
      }
    },
  )?;

  Ok(finish_galmat(ctx, galmat))
}

/// Right-hand side with the Dirichlet penalty values in place.
///
/// There is no volumetric source, unconstrained entries stay zero.
pub fn assemble_rhs(ctx: &AssemblyContext) -> Result<GalVec> {
  let ndofs = ctx.ndofs();
  let mut values = Vec::new();
  values
    .try_reserve_exact(ndofs)
    .map_err(|_| Error::Allocation {
      what: "right-hand side",
      len: ndofs,
    })?;
  values.resize(ndofs, 0.0);
  let mut galvec = GalVec::from_vec(values);

  let nconditions = dirichlet::inject_penalty_values(ctx, &mut galvec);
  if ctx.verbosity.verbose() {
    tracing::info!("body forces: {nconditions} conditions assigned");
  }
  Ok(galvec)
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::{
    boundary::Entity,
    mesh::{Point, Triangle},
  };

  use approx::assert_relative_eq;

  /// Unit square split along its diagonal into two triangles.
  fn square() -> Problem {
    let points = vec![
      Point::new(0.0, 0.0, 0),
      Point::new(1.0, 0.0, 0),
      Point::new(1.0, 1.0, 0),
      Point::new(0.0, 1.0, 0),
    ];
    let triangles = vec![Triangle::new([0, 1, 2], 1), Triangle::new([0, 2, 3], 2)];
    Problem::new(Mesh::new(points, triangles, vec![]).unwrap())
  }

  #[test]
  fn node_dofs() {
    assert_eq!(Field::Scalar.node_dofs(3), 3..4);
    assert_eq!(Field::Vector.node_dofs(3), 6..8);
    assert_eq!(Field::Vector.ndofs(5), 10);
  }

  #[test]
  fn shared_entries_accumulate() {
    let problem = square();
    let solution = na::DVector::zeros(4);
    let settings = Settings::default();
    let ctx = AssemblyContext::new(&problem, &solution, &settings).unwrap();
    let galmat = assemble_scalar_galmat(&ctx).unwrap();

    // Diagonal entries of the shared nodes sum both triangles.
    let elmat = ScalarHelmholtzElmat { alpha: 1.0 };
    let mesh = &problem.mesh;
    let k0 = elmat.eval(&cell_geometry(mesh, 0, &mesh.triangles()[0]).unwrap());
    let k1 = elmat.eval(&cell_geometry(mesh, 1, &mesh.triangles()[1]).unwrap());
    assert_relative_eq!(galmat.get(0, 0), k0[(0, 0)] + k1[(0, 0)]);
    assert_relative_eq!(galmat.get(0, 2), k0[(0, 2)] + k1[(0, 1)]);
    assert_relative_eq!(galmat.get(1, 1), k0[(1, 1)]);
    assert_eq!(galmat.get(1, 3), 0.0);
  }

  #[test]
  fn stored_entries_are_upper_triangular() {
    let problem = square();
    let settings = Settings {
      field: Field::Vector,
      ..Default::default()
    };
    let solution = na::DVector::zeros(8);
    let ctx = AssemblyContext::new(&problem, &solution, &settings).unwrap();
    let galmat = assemble_vector_galmat(&ctx).unwrap();
    assert!(galmat.triplets().all(|(r, c, _)| r <= c));
    // no coupling between components
    assert_eq!(galmat.get(0, 1), 0.0);
    assert_eq!(galmat.get(0, 3), 0.0);
  }

  #[test]
  fn vector_blocks_equal_scalar_matrix() {
    let problem = square();
    let scalar_solution = na::DVector::zeros(4);
    let vector_solution = na::DVector::zeros(8);
    let scalar_settings = Settings::default();
    let vector_settings = Settings {
      field: Field::Vector,
      ..Default::default()
    };

    let ctx = AssemblyContext::new(&problem, &scalar_solution, &scalar_settings).unwrap();
    let scalar = assemble_scalar_galmat(&ctx).unwrap().to_full_dense();
    let ctx = AssemblyContext::new(&problem, &vector_solution, &vector_settings).unwrap();
    let vector = assemble_vector_galmat(&ctx).unwrap().to_full_dense();

    for r in 0..4 {
      for c in 0..4 {
        assert_relative_eq!(vector[(2 * r, 2 * c)], scalar[(r, c)], epsilon = 1e-14);
        assert_relative_eq!(vector[(2 * r + 1, 2 * c + 1)], scalar[(r, c)], epsilon = 1e-14);
        assert_eq!(vector[(2 * r, 2 * c + 1)], 0.0);
      }
    }
  }

  #[test]
  fn missing_material_skips_element() {
    let mut problem = square();
    problem.materials = vec![Material::new(1, 1.0)];
    let solution = na::DVector::zeros(4);
    let settings = Settings::default();
    let ctx = AssemblyContext::new(&problem, &solution, &settings).unwrap();
    let galmat = assemble_scalar_galmat(&ctx).unwrap();

    // node 3 only belongs to the skipped triangle
    assert_eq!(galmat.get(3, 3), 0.0);
    assert_eq!(galmat.get(0, 3), 0.0);
    assert!(galmat.get(1, 1) > 0.0);
  }

  #[test]
  fn materials_select_coefficient() {
    let mut problem = square();
    let solution = na::DVector::zeros(4);
    let settings = Settings {
      default_alpha: 2.0,
      ..Default::default()
    };
    let ctx = AssemblyContext::new(&problem, &solution, &settings).unwrap();
    let by_default = assemble_scalar_galmat(&ctx).unwrap();

    problem.materials = vec![Material::new(1, 2.0), Material::new(2, 2.0)];
    let ctx = AssemblyContext::new(&problem, &solution, &settings).unwrap();
    let by_material = assemble_scalar_galmat(&ctx).unwrap();
    assert_eq!(by_default, by_material);
  }

  #[test]
  fn degenerate_triangle_aborts() {
    let points = vec![
      Point::new(0.0, 0.0, 0),
      Point::new(1.0, 0.0, 0),
      Point::new(0.0, 1.0, 0),
      Point::new(2.0, 0.0, 0),
    ];
    let triangles = vec![Triangle::new([0, 1, 2], 0), Triangle::new([0, 1, 3], 0)];
    let problem = Problem::new(Mesh::new(points, triangles, vec![]).unwrap());
    let solution = na::DVector::zeros(4);
    let settings = Settings::default();
    let ctx = AssemblyContext::new(&problem, &solution, &settings).unwrap();

    let err = assemble_scalar_galmat(&ctx).unwrap_err();
    assert!(matches!(err, Error::DegenerateElement { cell: 1, .. }));

    let vector_solution = na::DVector::zeros(8);
    let vector_settings = Settings {
      field: Field::Vector,
      ..Default::default()
    };
    let ctx = AssemblyContext::new(&problem, &vector_solution, &vector_settings).unwrap();
    let err = assemble_vector_galmat(&ctx).unwrap_err();
    assert!(matches!(err, Error::DegenerateElement { cell: 1, .. }));
  }

  #[test]
  fn context_validation() {
    let mut problem = square();
    let settings = Settings::default();

    let short = na::DVector::zeros(3);
    assert!(matches!(
      AssemblyContext::new(&problem, &short, &settings),
      Err(Error::SolutionLength {
        expected: 4,
        found: 3
      })
    ));

    problem.mesh.release(crate::mesh::MeshRelease::Elements);
    let solution = na::DVector::zeros(4);
    assert!(matches!(
      AssemblyContext::new(&problem, &solution, &settings),
      Err(Error::MeshReleased)
    ));
  }

  #[test]
  fn rhs_without_conditions_is_zero() {
    let mut problem = square();
    problem.conditions = vec![BoundaryCondition::dirichlet_scalar(9, Entity::Vertex, 1.0)];
    let solution = na::DVector::zeros(4);
    let settings = Settings::default();
    let ctx = AssemblyContext::new(&problem, &solution, &settings).unwrap();
    assert_eq!(assemble_rhs(&ctx).unwrap(), GalVec::zeros(4));
  }
}
