//! Boundary conditions and their lookup by reference tag.

use crate::mesh::Reference;

/// The kind of mesh entity a boundary condition is declared on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
  Vertex,
  Edge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionKind {
  Dirichlet,
}

/// Where the prescribed value of a condition comes from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundaryValue {
  /// Literal value. Scalar fields only read the `x` component.
  Fixed(na::Vector2<f64>),
  /// The value currently stored in the solution vector at the constrained DOFs.
  Solution,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryCondition {
  pub reference: Reference,
  pub entity: Entity,
  pub kind: ConditionKind,
  pub value: BoundaryValue,
}

impl BoundaryCondition {
  pub fn dirichlet(reference: Reference, entity: Entity, value: BoundaryValue) -> Self {
    Self {
      reference,
      entity,
      kind: ConditionKind::Dirichlet,
      value,
    }
  }

  pub fn dirichlet_scalar(reference: Reference, entity: Entity, value: f64) -> Self {
    Self::dirichlet(
      reference,
      entity,
      BoundaryValue::Fixed(na::Vector2::new(value, 0.0)),
    )
  }

  pub fn dirichlet_vector(reference: Reference, entity: Entity, value: [f64; 2]) -> Self {
    Self::dirichlet(reference, entity, BoundaryValue::Fixed(value.into()))
  }

  pub fn is_dirichlet(&self) -> bool {
    self.kind == ConditionKind::Dirichlet
  }
}

/// First condition in list order matching both `reference` and `entity`.
pub fn find_condition(
  conditions: &[BoundaryCondition],
  reference: Reference,
  entity: Entity,
) -> Option<&BoundaryCondition> {
  conditions
    .iter()
    .find(|c| c.reference == reference && c.entity == entity)
}

/// Whether constraints are applied at mesh nodes or at mesh edges.
///
/// The two modes are mutually exclusive within one solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintMode {
  Vertices,
  Edges,
}

impl ConstraintMode {
  /// Vertex conditions take precedence over edge conditions.
  pub fn detect(conditions: &[BoundaryCondition]) -> Option<Self> {
    if conditions.iter().any(|c| c.entity == Entity::Vertex) {
      Some(Self::Vertices)
    } else if conditions.iter().any(|c| c.entity == Entity::Edge) {
      Some(Self::Edges)
    } else {
      None
    }
  }
}
