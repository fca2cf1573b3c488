use glam::Affine3A;

use crate::scene::NodeHandle;
use crate::scene::transform::Transform;

/// A minimal scene node containing only hot data.
///
/// Names, meshes and other attributes live in the [`Scene`](crate::scene::Scene)
/// component maps, keyed by [`NodeHandle`].
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,

    pub transform: Transform,
}

impl Node {
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            transform: Transform::new(),
        }
    }

    #[must_use]
    pub fn with_transform(transform: Transform) -> Self {
        Self {
            transform,
            ..Self::new()
        }
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    /// World matrix as of the last [`Scene::update_matrix_world`](crate::scene::Scene::update_matrix_world).
    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.transform.world_matrix
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}
