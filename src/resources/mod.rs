//! Resource definitions shared by the scene and the loaders.

pub mod material;
pub mod mesh;

pub use material::{Material, MaterialSettings, Side};
pub use mesh::Mesh;
