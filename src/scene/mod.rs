//! Scene graph.
//!
//! - [`Node`]: hierarchy and transform
//! - [`Transform`]: position, rotation, scale with cached matrices
//! - [`Scene`]: node storage, component maps, materials, prefab instantiation
//! - [`transform_system`]: world matrix propagation

pub mod node;
pub mod scene;
pub mod transform;
pub mod transform_system;

pub use node::Node;
pub use scene::{PrefabInstance, Scene};
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeHandle;
    pub struct MaterialKey;
}
