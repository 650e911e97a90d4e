//! Element matrices of the Helmholtz-type operator `u - div(alpha grad u)`
//! for linear Lagrange elements on triangles.

use crate::geometry::TriangleGeometry;

pub type ElMat = na::Matrix3<f64>;

pub trait ElmatProvider {
  fn eval(&self, geo: &TriangleGeometry) -> ElMat;
}

impl<F> ElmatProvider for F
where
  F: Fn(&TriangleGeometry) -> ElMat,
{
  fn eval(&self, geo: &TriangleGeometry) -> ElMat {
    self(geo)
  }
}

/// Gradients of the reference barycentric coordinate functions.
pub const REF_DIFBARYS: [[f64; 2]; 3] = [[-1.0, -1.0], [1.0, 0.0], [0.0, 1.0]];

/// Gradients of the barycentric coordinate functions of the physical triangle.
pub fn difbarys(geo: &TriangleGeometry) -> [na::Vector2<f64>; 3] {
  let inv = geo.edges_inv();
  REF_DIFBARYS.map(|[dx, dy]| {
    na::Vector2::new(
      inv[(0, 0)] * dx + inv[(0, 1)] * dy,
      inv[(1, 0)] * dx + inv[(1, 1)] * dy,
    )
  })
}

/// Mass-like term of the local pair `(i, j)`.
fn mass_term(area: f64, i: usize, j: usize) -> f64 {
  if i == j {
    area / 6.0
  } else {
    area / 12.0
  }
}

/// Element matrix for scalar fields, using explicit gradients.
///
/// $K_(i j) = |K|/12 (1 + delta_(i j)) + alpha |K| nabla lambda_i dot nabla lambda_j$
#[derive(Debug, Clone, Copy)]
pub struct ScalarHelmholtzElmat {
  pub alpha: f64,
}
impl ElmatProvider for ScalarHelmholtzElmat {
  fn eval(&self, geo: &TriangleGeometry) -> ElMat {
    let area = geo.area();
    let grads = difbarys(geo);

    let mut elmat = ElMat::zeros();
    for i in 0..3 {
      for j in i..3 {
        let term_g = area * (grads[i][0] * grads[j][0] + grads[i][1] * grads[j][1]);
        let kij = mass_term(area, i, j) + self.alpha * term_g;
        elmat[(i, j)] = kij;
        elmat[(j, i)] = kij;
      }
    }
    elmat
  }
}

/// Closed form of $|K| nabla lambda_i dot nabla lambda_j$, expressed through
/// the edge vectors of the triangle.
pub fn stiffness_block(geo: &TriangleGeometry) -> ElMat {
  let e = geo.edges();
  let (m0, m1, m2, m3) = (e[(0, 0)], e[(0, 1)], e[(1, 0)], e[(1, 1)]);
  let cof = 1.0 / (4.0 * geo.area());

  let g00 = cof * (m2 - m0) * (m2 - m0) + cof * (m3 - m1) * (m3 - m1);
  let g11 = cof * (m2 * m2 + m3 * m3);
  let g22 = cof * (m0 * m0 + m1 * m1);
  let g01 = -cof * (m2 - m0) * (m2) - cof * (m3 - m1) * (m3);
  let g02 = cof * (m2 - m0) * (m0) + cof * (m3 - m1) * (m1);
  let g12 = -cof * (m2) * (m0) - cof * (m3) * (m1);

  #[rustfmt::skip]
  let block = ElMat::new(
    g00, g01, g02,
    g01, g11, g12,
    g02, g12, g22,
  );
  block
}

/// Element matrix shared by both components of a vector field.
///
/// Components do not couple, so one 3x3 matrix describes the element.
#[derive(Debug, Clone, Copy)]
pub struct VectorHelmholtzElmat {
  pub alpha: f64,
}
impl ElmatProvider for VectorHelmholtzElmat {
  fn eval(&self, geo: &TriangleGeometry) -> ElMat {
    let area = geo.area();
    let block = stiffness_block(geo);

    let mut elmat = ElMat::zeros();
    for i in 0..3 {
      for j in i..3 {
        let kij = mass_term(area, i, j) + self.alpha * block[(i, j)];
        elmat[(i, j)] = kij;
        elmat[(j, i)] = kij;
      }
    }
    elmat
  }
}
