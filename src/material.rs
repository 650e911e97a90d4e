use crate::mesh::Reference;

/// Coefficient reported for a region tag missing from a non-empty material list.
pub const FALLBACK_ALPHA: f64 = 1e-2;

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
  pub reference: Reference,
  /// Diffusion coefficient.
  pub alpha: f64,
}
impl Material {
  pub fn new(reference: Reference, alpha: f64) -> Self {
    Self { reference, alpha }
  }
}

/// Outcome of a material lookup.
///
/// An empty material list and an unmatched tag in a non-empty list are
/// both "not found", but only the latter excludes the element from assembly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaterialLookup {
  /// The material list is empty, the global default applies.
  Default(f64),
  Found(f64),
  /// No entry for the tag. Carries [`FALLBACK_ALPHA`].
  Missing(f64),
}

impl MaterialLookup {
  pub fn found(self) -> bool {
    matches!(self, Self::Found(_))
  }

  pub fn alpha(self) -> f64 {
    match self {
      Self::Default(alpha) | Self::Found(alpha) | Self::Missing(alpha) => alpha,
    }
  }

  /// The coefficient an element contributes with, `None` if it is skipped.
  pub fn coefficient(self) -> Option<f64> {
    match self {
      Self::Default(alpha) | Self::Found(alpha) => Some(alpha),
      Self::Missing(_) => None,
    }
  }
}

pub fn find_material(materials: &[Material], reference: Reference, default_alpha: f64) -> MaterialLookup {
  if materials.is_empty() {
    return MaterialLookup::Default(default_alpha);
  }
  materials
    .iter()
    .find(|m| m.reference == reference)
    .map_or(MaterialLookup::Missing(FALLBACK_ALPHA), |m| {
      MaterialLookup::Found(m.alpha)
    })
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn empty_list_uses_default() {
    let lookup = find_material(&[], 3, 0.25);
    assert_eq!(lookup, MaterialLookup::Default(0.25));
    assert!(!lookup.found());
    assert_eq!(lookup.coefficient(), Some(0.25));
  }

  #[test]
  fn matched_material() {
    let materials = [Material::new(1, 2.0), Material::new(3, 4.0), Material::new(3, 8.0)];
    let lookup = find_material(&materials, 3, 0.25);
    assert_eq!(lookup, MaterialLookup::Found(4.0));
    assert!(lookup.found());
    assert_eq!(lookup.coefficient(), Some(4.0));
  }

  #[test]
  fn unmatched_material_is_skipped() {
    let materials = [Material::new(1, 2.0)];
    let lookup = find_material(&materials, 5, 0.25);
    assert!(!lookup.found());
    assert_eq!(lookup.alpha(), FALLBACK_ALPHA);
    assert_ne!(lookup.alpha(), 0.25);
    assert_eq!(lookup.coefficient(), None);
  }
}
