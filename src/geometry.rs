//! Element geometry of straight 2D triangles.

pub type Coord = na::Point2<f64>;

/// Determinants below this magnitude mark a triangle as degenerate.
pub const EPS_DET: f64 = 1e-200;

/// The signed area of the triangle `(a, b, c)`.
///
/// Positive for counter-clockwise vertices, negative for clockwise ones.
/// This is the element volume weight, sign included.
pub fn signed_area(a: &Coord, b: &Coord, c: &Coord) -> f64 {
  let ux = b.x - a.x;
  let uy = b.y - a.y;
  let vx = c.x - a.x;
  let vy = c.y - a.y;
  0.5 * (ux * vy - uy * vx)
}

/// Adjugate based inverse of a 2x2 matrix.
///
/// Returns `None` if `|det| < EPS_DET`.
pub fn invert_2x2(m: &na::Matrix2<f64>) -> Option<na::Matrix2<f64>> {
  let det = m[(0, 0)] * m[(1, 1)] - m[(1, 0)] * m[(0, 1)];
  if det.abs() < EPS_DET {
    return None;
  }
  let det = det.recip();
  Some(na::Matrix2::new(
    m[(1, 1)] * det,
    -m[(0, 1)] * det,
    -m[(1, 0)] * det,
    m[(0, 0)] * det,
  ))
}

/// Geometry of a single triangle, as needed by the element matrix providers.
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleGeometry {
  /// Rows are the edge vectors `v1 - v0` and `v2 - v0`.
  edges: na::Matrix2<f64>,
  /// Inverse of `edges`.
  edges_inv: na::Matrix2<f64>,
  area: f64,
}

impl TriangleGeometry {
  /// Returns `None` for a degenerate triangle.
  pub fn new(vertices: [&Coord; 3]) -> Option<Self> {
    let [p0, p1, p2] = vertices;
    let edges = na::Matrix2::new(
      p1.x - p0.x,
      p1.y - p0.y,
      p2.x - p0.x,
      p2.y - p0.y,
    );
    let edges_inv = invert_2x2(&edges)?;
    let area = signed_area(p0, p1, p2);
    Some(Self {
      edges,
      edges_inv,
      area,
    })
  }

  pub fn edges(&self) -> &na::Matrix2<f64> {
    &self.edges
  }
  pub fn edges_inv(&self) -> &na::Matrix2<f64> {
    &self.edges_inv
  }
  /// Signed area.
  pub fn area(&self) -> f64 {
    self.area
  }
  pub fn det(&self) -> f64 {
    self.edges.determinant()
  }
}
