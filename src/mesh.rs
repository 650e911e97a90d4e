//! A 2D triangle mesh with reference tags.
//!
//! All indices are 0-based. Meshes coming from 1-based sources are translated
//! once through [`Mesh::from_one_based`].

pub mod rectangle;

use crate::{
  error::{Error, Result},
  geometry::Coord,
};

pub type VertexIdx = usize;
pub type CellIdx = usize;
pub type EdgeIdx = usize;

/// Reference tag of a mesh entity. `0` means untagged.
pub type Reference = u32;

#[derive(Debug, Clone, PartialEq)]
pub struct Point {
  pub coord: Coord,
  pub reference: Reference,
}
impl Point {
  pub fn new(x: f64, y: f64, reference: Reference) -> Self {
    Self {
      coord: Coord::new(x, y),
      reference,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triangle {
  /// Defines the local node numbering 0, 1, 2.
  pub vertices: [VertexIdx; 3],
  /// Region tag, selects the material.
  pub reference: Reference,
}
impl Triangle {
  pub fn new(vertices: [VertexIdx; 3], reference: Reference) -> Self {
    Self {
      vertices,
      reference,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
  pub vertices: [VertexIdx; 2],
  pub reference: Reference,
}
impl Edge {
  pub fn new(vertices: [VertexIdx; 2], reference: Reference) -> Self {
    Self {
      vertices,
      reference,
    }
  }
}

/// Which storage is freed once the matrix and right-hand side are assembled.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum MeshRelease {
  #[default]
  Keep,
  /// Free the triangles, retain the points.
  Elements,
  /// Free the triangles and the points.
  All,
}

#[derive(Debug, Clone, Default)]
pub struct Mesh {
  points: Vec<Point>,
  triangles: Vec<Triangle>,
  edges: Vec<Edge>,
  released: bool,
}

// constructors
impl Mesh {
  pub fn new(points: Vec<Point>, triangles: Vec<Triangle>, edges: Vec<Edge>) -> Result<Self> {
    let nvertices = points.len();
    let check = |cell: usize, vertices: &[VertexIdx]| {
      match vertices.iter().find(|&&v| v >= nvertices) {
        Some(&vertex) => Err(Error::InvalidVertex {
          cell,
          vertex,
          nvertices,
        }),
        None => Ok(()),
      }
    };
    for (icell, triangle) in triangles.iter().enumerate() {
      check(icell, &triangle.vertices)?;
    }
    for (iedge, edge) in edges.iter().enumerate() {
      check(iedge, &edge.vertices)?;
    }

    Ok(Self {
      points,
      triangles,
      edges,
      released: false,
    })
  }

  /// Builds a mesh whose triangles and edges use 1-based vertex indices.
  ///
  /// Vertex index `0` is invalid and reported as such.
  pub fn from_one_based(
    points: Vec<Point>,
    triangles: Vec<Triangle>,
    edges: Vec<Edge>,
  ) -> Result<Self> {
    let nvertices = points.len();
    let shift = |cell: usize, vertex: VertexIdx| {
      vertex.checked_sub(1).ok_or(Error::InvalidVertex {
        cell,
        vertex,
        nvertices,
      })
    };

    let triangles = triangles
      .into_iter()
      .enumerate()
      .map(|(icell, t)| {
        let [a, b, c] = t.vertices;
        let vertices = [shift(icell, a)?, shift(icell, b)?, shift(icell, c)?];
        Ok(Triangle::new(vertices, t.reference))
      })
      .collect::<Result<Vec<_>>>()?;
    let edges = edges
      .into_iter()
      .enumerate()
      .map(|(iedge, e)| {
        let [a, b] = e.vertices;
        let vertices = [shift(iedge, a)?, shift(iedge, b)?];
        Ok(Edge::new(vertices, e.reference))
      })
      .collect::<Result<Vec<_>>>()?;

    Self::new(points, triangles, edges)
  }
}

// getters
impl Mesh {
  pub fn points(&self) -> &[Point] {
    &self.points
  }
  pub fn triangles(&self) -> &[Triangle] {
    &self.triangles
  }
  pub fn edges(&self) -> &[Edge] {
    &self.edges
  }
  pub fn nvertices(&self) -> usize {
    self.points.len()
  }
  pub fn ncells(&self) -> usize {
    self.triangles.len()
  }

  pub fn cell_coords(&self, cell: &Triangle) -> [&Coord; 3] {
    cell.vertices.map(|ivertex| &self.points[ivertex].coord)
  }

  pub fn is_released(&self) -> bool {
    self.released
  }
}

impl Mesh {
  /// Frees mesh storage according to `policy`.
  ///
  /// Any policy other than [`MeshRelease::Keep`] is a one-way transition:
  /// the mesh can no longer be assembled afterwards.
  pub fn release(&mut self, policy: MeshRelease) {
    match policy {
      MeshRelease::Keep => return,
      MeshRelease::Elements => {
        self.triangles = Vec::new();
      }
      MeshRelease::All => {
        self.triangles = Vec::new();
        self.points = Vec::new();
      }
    }
    self.released = true;
    tracing::debug!("released mesh storage ({policy:?})");
  }
}
