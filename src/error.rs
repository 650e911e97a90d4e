use crate::mesh::{CellIdx, VertexIdx};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
  #[error("degenerate triangle {cell}: jacobian determinant {det:e} is not invertible")]
  DegenerateElement { cell: CellIdx, det: f64 },
  #[error("failed to allocate {what} for {len} entries")]
  Allocation { what: &'static str, len: usize },
  #[error("mesh storage has been released, no further assembly is possible")]
  MeshReleased,
  #[error("entity {cell} references vertex {vertex}, but the mesh has {nvertices} vertices")]
  InvalidVertex {
    cell: usize,
    vertex: VertexIdx,
    nvertices: usize,
  },
  #[error("solution vector has length {found}, expected {expected}")]
  SolutionLength { expected: usize, found: usize },
  #[error("sparse cholesky factorization failed")]
  Factorization,
}
