//! Structured triangulations of axis-aligned rectangles.
//!
//! Nodes are ordered lexicographically, `x` running fastest.
//! Every box is split along its diagonal from the lower left to the upper right corner.

use super::{Edge, Mesh, Point, Reference, Triangle, VertexIdx};
use crate::{error::Result, geometry::Coord};

/// Reference of all boundary points.
pub const BOUNDARY_POINT: Reference = 1;

/// References of the boundary edges, one per side.
pub const SIDE_BOTTOM: Reference = 1;
pub const SIDE_RIGHT: Reference = 2;
pub const SIDE_TOP: Reference = 3;
pub const SIDE_LEFT: Reference = 4;

/// Region reference of all triangles.
pub const REGION: Reference = 1;

/// helper struct
#[derive(Debug, Clone)]
pub struct RectangleMeshInfo {
  min: Coord,
  max: Coord,
  nboxes_per_dim: [usize; 2],
}

// constructors
impl RectangleMeshInfo {
  pub fn new_min_max(min: Coord, max: Coord, nboxes_per_dim: [usize; 2]) -> Self {
    assert!(min.x < max.x && min.y < max.y, "empty rectangle");
    assert!(nboxes_per_dim.iter().all(|&n| n > 0), "no boxes");
    Self {
      min,
      max,
      nboxes_per_dim,
    }
  }
  pub fn new_unit(nboxes_per_dim: usize) -> Self {
    Self::new_min_max(
      Coord::origin(),
      Coord::new(1.0, 1.0),
      [nboxes_per_dim; 2],
    )
  }
}

// getters
impl RectangleMeshInfo {
  pub fn min(&self) -> &Coord {
    &self.min
  }
  pub fn max(&self) -> &Coord {
    &self.max
  }
  pub fn nboxes_per_dim(&self) -> [usize; 2] {
    self.nboxes_per_dim
  }
  pub fn nnodes_per_dim(&self) -> [usize; 2] {
    self.nboxes_per_dim.map(|n| n + 1)
  }
  pub fn nboxes(&self) -> usize {
    self.nboxes_per_dim.iter().product()
  }
  pub fn nnodes(&self) -> usize {
    self.nnodes_per_dim().iter().product()
  }
  pub fn mesh_widths(&self) -> na::Vector2<f64> {
    let [nx, ny] = self.nboxes_per_dim;
    let lengths = self.max - self.min;
    na::Vector2::new(lengths.x / nx as f64, lengths.y / ny as f64)
  }

  pub fn node_idx(&self, ix: usize, iy: usize) -> VertexIdx {
    ix + iy * self.nnodes_per_dim()[0]
  }
  pub fn node_cart_idx(&self, inode: VertexIdx) -> [usize; 2] {
    let nx = self.nnodes_per_dim()[0];
    [inode % nx, inode / nx]
  }
  pub fn node_pos(&self, inode: VertexIdx) -> Coord {
    let [ix, iy] = self.node_cart_idx(inode);
    let h = self.mesh_widths();
    Coord::new(
      self.min.x + ix as f64 * h.x,
      self.min.y + iy as f64 * h.y,
    )
  }

  pub fn is_node_on_boundary(&self, inode: VertexIdx) -> bool {
    let [ix, iy] = self.node_cart_idx(inode);
    let [nx, ny] = self.nboxes_per_dim;
    ix == 0 || iy == 0 || ix == nx || iy == ny
  }

  pub fn boundary_nodes(&self) -> Vec<VertexIdx> {
    (0..self.nnodes())
      .filter(|&inode| self.is_node_on_boundary(inode))
      .collect()
  }
}

impl RectangleMeshInfo {
  pub fn compute_points(&self) -> Vec<Point> {
    (0..self.nnodes())
      .map(|inode| {
        let reference = if self.is_node_on_boundary(inode) {
          BOUNDARY_POINT
        } else {
          0
        };
        Point {
          coord: self.node_pos(inode),
          reference,
        }
      })
      .collect()
  }

  /// Two counterclockwise triangles per box.
  pub fn compute_triangles(&self) -> Vec<Triangle> {
    let [nx, ny] = self.nboxes_per_dim;
    let mut triangles = Vec::with_capacity(2 * self.nboxes());
    for iy in 0..ny {
      for ix in 0..nx {
        let v00 = self.node_idx(ix, iy);
        let v10 = self.node_idx(ix + 1, iy);
        let v11 = self.node_idx(ix + 1, iy + 1);
        let v01 = self.node_idx(ix, iy + 1);
        triangles.push(Triangle::new([v00, v10, v11], REGION));
        triangles.push(Triangle::new([v00, v11, v01], REGION));
      }
    }
    triangles
  }

  /// Boundary edges, counterclockwise starting at the origin corner.
  pub fn compute_boundary_edges(&self) -> Vec<Edge> {
    let [nx, ny] = self.nboxes_per_dim;
    let bottom = (0..nx).map(|i| Edge::new([self.node_idx(i, 0), self.node_idx(i + 1, 0)], SIDE_BOTTOM));
    let right = (0..ny).map(|i| Edge::new([self.node_idx(nx, i), self.node_idx(nx, i + 1)], SIDE_RIGHT));
    let top = (0..nx)
      .rev()
      .map(|i| Edge::new([self.node_idx(i + 1, ny), self.node_idx(i, ny)], SIDE_TOP));
    let left = (0..ny)
      .rev()
      .map(|i| Edge::new([self.node_idx(0, i + 1), self.node_idx(0, i)], SIDE_LEFT));
    bottom.chain(right).chain(top).chain(left).collect()
  }

  pub fn compute_mesh(&self) -> Result<Mesh> {
    Mesh::new(
      self.compute_points(),
      self.compute_triangles(),
      self.compute_boundary_edges(),
    )
  }
}
