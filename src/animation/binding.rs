use glam::{Quat, Vec3};

use crate::scene::NodeHandle;

/// Defines the target property for animation data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetPath {
    /// Maps to `transform.position`
    Translation,
    /// Maps to `transform.rotation`
    Rotation,
    /// Maps to `transform.scale`
    Scale,
}

/// A sampled or captured property value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyValue {
    Vector3(Vec3),
    Quaternion(Quat),
}

/// Maps track `track_index` of a clip to the target property of `node_handle`.
#[derive(Debug, Clone)]
pub struct PropertyBinding {
    pub track_index: usize,
    pub node_handle: NodeHandle,
    pub target: TargetPath,
    /// Value of the property before any animation touched it; partial
    /// weights blend toward it.
    pub rest: PropertyValue,
}
