pub mod gltf;

pub use self::gltf::{GltfLoader, sanitize_node_name};
