extern crate nalgebra as na;
extern crate nalgebra_sparse as nas;

pub mod assemble;
pub mod boundary;
pub mod dirichlet;
pub mod error;
pub mod fe;
pub mod geometry;
pub mod linalg;
pub mod material;
pub mod mesh;
pub mod problems;
pub mod settings;
pub mod sparse;

pub use error::{Error, Result};
