//! Dirichlet conditions enforced by penalty.
//!
//! The diagonal entry of a constrained DOF is overwritten with [`TGV`] and the
//! right-hand side receives `TGV * value`, so the row reads `TGV x = TGV value`
//! up to the comparatively tiny off-diagonal stiffness. No rows or columns are
//! eliminated from the sparse structure, at the cost of conditioning.

use crate::{
  assemble::{AssemblyContext, GalVec},
  boundary::{find_condition, BoundaryCondition, BoundaryValue, ConstraintMode, Entity},
  mesh::{Reference, VertexIdx},
  sparse::SparseMatrix,
};

use itertools::Itertools;

/// Penalty placed on the diagonal of constrained DOFs.
pub const TGV: f64 = 1e30;

fn dirichlet_condition<'a>(
  ctx: &AssemblyContext<'a>,
  reference: Reference,
  entity: Entity,
) -> Option<&'a BoundaryCondition> {
  find_condition(ctx.conditions, reference, entity).filter(|c| c.is_dirichlet())
}

/// Constrained mesh nodes together with the condition constraining them.
///
/// In edge mode a node shared by several constrained edges is reported once,
/// for the first such edge in mesh order.
pub fn constrained_nodes<'a>(ctx: &AssemblyContext<'a>) -> Vec<(VertexIdx, &'a BoundaryCondition)> {
  match ctx.constraint_mode() {
    None => Vec::new(),
    Some(ConstraintMode::Vertices) => ctx
      .mesh
      .points()
      .iter()
      .enumerate()
      .filter(|(_, p)| p.reference != 0)
      .filter_map(|(ivertex, p)| {
        dirichlet_condition(ctx, p.reference, Entity::Vertex).map(|c| (ivertex, c))
      })
      .collect(),
    Some(ConstraintMode::Edges) => ctx
      .mesh
      .edges()
      .iter()
      .filter_map(|e| dirichlet_condition(ctx, e.reference, Entity::Edge).map(|c| (e, c)))
      .flat_map(|(e, c)| e.vertices.map(|ivertex| (ivertex, c)))
      .unique_by(|&(ivertex, _)| ivertex)
      .collect(),
  }
}

/// Overwrites the diagonal of every constrained DOF with [`TGV`].
///
/// Whatever was accumulated there before is discarded.
pub fn enforce_penalty(ctx: &AssemblyContext, galmat: &mut SparseMatrix) {
  for (ivertex, _) in constrained_nodes(ctx) {
    for idof in ctx.field.node_dofs(ivertex) {
      galmat.overwrite(idof, idof, TGV);
    }
  }
}

/// Writes `TGV * value` into the right-hand side of every constrained DOF.
///
/// Returns the number of constrained nodes.
pub fn inject_penalty_values(ctx: &AssemblyContext, galvec: &mut GalVec) -> usize {
  let nodes = constrained_nodes(ctx);
  for &(ivertex, condition) in &nodes {
    for (icomp, idof) in ctx.field.node_dofs(ivertex).enumerate() {
      let value = match condition.value {
        BoundaryValue::Fixed(value) => value[icomp],
        BoundaryValue::Solution => ctx.solution[idof],
      };
      galvec[idof] = TGV * value;
    }
  }
  nodes.len()
}
