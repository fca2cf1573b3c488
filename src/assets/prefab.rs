use std::sync::Arc;

use smallvec::SmallVec;

use crate::animation::clip::AnimationClip;
use crate::resources::material::Material;
use crate::scene::transform::Transform;

/// Mesh data carried by a prefab node: which prefab materials it draws with.
#[derive(Debug, Clone)]
pub struct PrefabMesh {
    pub name: String,
    /// Indices into [`Prefab::materials`], one per primitive
    pub material_indices: SmallVec<[usize; 4]>,
}

/// Prefab node: plain data, children referenced by index.
#[derive(Debug, Clone, Default)]
pub struct PrefabNode {
    pub name: Option<String>,
    pub transform: Transform,
    /// Indices of the children in [`Prefab::nodes`]
    pub children_indices: Vec<usize>,
    pub mesh: Option<PrefabMesh>,
}

impl PrefabNode {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

/// Prefab: the intermediate result of parsing a model file.
///
/// A prefab holds no scene handles; it is shared through the asset cache and
/// turned into live nodes with [`Scene::instantiate`](crate::scene::Scene::instantiate).
#[derive(Debug, Clone, Default)]
pub struct Prefab {
    /// All nodes, flattened
    pub nodes: Vec<PrefabNode>,
    /// Indices of the scene roots in `nodes`
    pub root_indices: Vec<usize>,
    pub materials: Vec<Material>,
    pub animations: Vec<Arc<AnimationClip>>,
}

impl Prefab {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a node and returns its index.
    pub fn push_node(&mut self, node: PrefabNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Index of the first node carrying `name`.
    #[must_use]
    pub fn find_node(&self, name: &str) -> Option<usize> {
        self.nodes
            .iter()
            .position(|n| n.name.as_deref() == Some(name))
    }
}

/// Thread-safe prefab reference.
pub type SharedPrefab = Arc<Prefab>;
