use glam::{Affine3A, Quat, Vec3};
use slotmap::{SecondaryMap, SlotMap};

use crate::assets::prefab::Prefab;
use crate::resources::material::Material;
use crate::resources::mesh::Mesh;
use crate::scene::node::Node;
use crate::scene::transform::facing_rotation;
use crate::scene::transform_system;
use crate::scene::{MaterialKey, NodeHandle};

/// Live nodes and materials created by [`Scene::instantiate`].
#[derive(Debug, Clone, Default)]
pub struct PrefabInstance {
    /// Instantiated prefab roots, attached under the requested parent
    pub roots: Vec<NodeHandle>,
    /// Every node created, in prefab order
    pub nodes: Vec<NodeHandle>,
    /// Materials created, in prefab order
    pub materials: Vec<MaterialKey>,
}

/// Scene graph.
///
/// Pure data: node hierarchy plus component maps (names, meshes) and the
/// material pool the meshes reference.
#[derive(Debug, Default)]
pub struct Scene {
    pub nodes: SlotMap<NodeHandle, Node>,
    pub root_nodes: Vec<NodeHandle>,

    names: SecondaryMap<NodeHandle, String>,
    meshes: SecondaryMap<NodeHandle, Mesh>,
    materials: SlotMap<MaterialKey, Material>,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Node creation & hierarchy
    // ========================================================================

    /// Creates a detached node (neither rooted nor parented).
    pub fn create_node(&mut self) -> NodeHandle {
        self.nodes.insert(Node::new())
    }

    pub fn create_node_with_name(&mut self, name: &str) -> NodeHandle {
        let handle = self.create_node();
        self.names.insert(handle, name.to_string());
        handle
    }

    /// Adds a node as a scene root.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        let handle = self.nodes.insert(node);
        self.root_nodes.push(handle);
        handle
    }

    pub fn add_to_parent(&mut self, child: Node, parent: NodeHandle) -> NodeHandle {
        let handle = self.nodes.insert(child);
        self.attach(handle, parent);
        handle
    }

    /// Makes `child` a child of `parent`, detaching it from its previous
    /// parent or from the root list.
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) {
        if child == parent {
            log::warn!("Cannot attach node to itself!");
            return;
        }
        if !self.nodes.contains_key(parent) {
            log::error!("Parent node not found during attach!");
            return;
        }

        let old_parent = self.nodes.get(child).and_then(|n| n.parent);
        if let Some(p) = old_parent {
            if let Some(n) = self.nodes.get_mut(p)
                && let Some(i) = n.children.iter().position(|&x| x == child)
            {
                n.children.remove(i);
            }
        } else if let Some(i) = self.root_nodes.iter().position(|&x| x == child) {
            self.root_nodes.remove(i);
        }

        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(parent);
            c.transform.mark_dirty();
        }
    }

    /// Removes a node and its whole subtree, with their components.
    pub fn remove_node(&mut self, handle: NodeHandle) {
        let Some(node) = self.nodes.get(handle) else {
            return;
        };

        match node.parent {
            Some(parent) => {
                if let Some(p) = self.nodes.get_mut(parent)
                    && let Some(pos) = p.children.iter().position(|&x| x == handle)
                {
                    p.children.remove(pos);
                }
            }
            None => {
                if let Some(pos) = self.root_nodes.iter().position(|&x| x == handle) {
                    self.root_nodes.remove(pos);
                }
            }
        }

        let mut stack = vec![handle];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(current) {
                stack.extend(node.children);
            }
            self.names.remove(current);
            self.meshes.remove(current);
        }
    }

    #[inline]
    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    #[inline]
    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    // ========================================================================
    // Names
    // ========================================================================

    #[must_use]
    pub fn get_name(&self, handle: NodeHandle) -> Option<&str> {
        self.names.get(handle).map(String::as_str)
    }

    pub fn set_name(&mut self, handle: NodeHandle, name: &str) {
        if self.nodes.contains_key(handle) {
            self.names.insert(handle, name.to_string());
        }
    }

    /// Depth-first search for a node called `name` in the subtree of `root`
    /// (the root itself included).
    #[must_use]
    pub fn find_node_by_name(&self, root: NodeHandle, name: &str) -> Option<NodeHandle> {
        let mut stack = vec![root];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(current) else {
                continue;
            };
            if self.get_name(current) == Some(name) {
                return Some(current);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        None
    }

    // ========================================================================
    // Components
    // ========================================================================

    pub fn set_mesh(&mut self, handle: NodeHandle, mesh: Mesh) {
        if self.nodes.contains_key(handle) {
            self.meshes.insert(handle, mesh);
        }
    }

    #[must_use]
    pub fn mesh(&self, handle: NodeHandle) -> Option<&Mesh> {
        self.meshes.get(handle)
    }

    pub fn add_material(&mut self, material: Material) -> MaterialKey {
        self.materials.insert(material)
    }

    #[must_use]
    pub fn material(&self, key: MaterialKey) -> Option<&Material> {
        self.materials.get(key)
    }

    pub fn material_mut(&mut self, key: MaterialKey) -> Option<&mut Material> {
        self.materials.get_mut(key)
    }

    pub fn remove_material(&mut self, key: MaterialKey) -> Option<Material> {
        self.materials.remove(key)
    }

    pub fn materials(&self) -> impl Iterator<Item = (MaterialKey, &Material)> {
        self.materials.iter()
    }

    // ========================================================================
    // Matrices
    // ========================================================================

    /// Updates world matrices of the whole scene. Call once per frame before
    /// rendering.
    pub fn update_matrix_world(&mut self) {
        transform_system::update_hierarchy_iterative(&mut self.nodes, &self.root_nodes);
    }

    pub fn update_subtree(&mut self, root: NodeHandle) {
        transform_system::update_subtree(&mut self.nodes, root);
    }

    /// World matrix computed from the current TRS of the node and all its
    /// ancestors. Does not read or write the cached matrices.
    #[must_use]
    pub fn world_matrix(&self, handle: NodeHandle) -> Affine3A {
        let mut matrix = Affine3A::IDENTITY;
        let mut current = Some(handle);
        while let Some(h) = current {
            let Some(node) = self.nodes.get(h) else {
                break;
            };
            matrix = node.transform.compose() * matrix;
            current = node.parent;
        }
        matrix
    }

    #[must_use]
    pub fn world_position(&self, handle: NodeHandle) -> Vec3 {
        Vec3::from(self.world_matrix(handle).translation)
    }

    /// Rotates a node so its local +Z axis faces `target` (world space).
    ///
    /// The parent's world rotation is factored out so the result is a local
    /// rotation. Returns `false` when the node is missing or `target` sits on
    /// the node; the rotation is left untouched in that case. Targets straight
    /// above or below still get a rotation.
    pub fn look_at(&mut self, handle: NodeHandle, target: Vec3) -> bool {
        let Some(node) = self.nodes.get(handle) else {
            return false;
        };
        let parent_rotation = node.parent.map_or(Quat::IDENTITY, |p| {
            let (_, rotation, _) = self.world_matrix(p).to_scale_rotation_translation();
            rotation
        });
        let eye = self.world_position(handle);

        let Some(world_rotation) = facing_rotation(eye, target, Vec3::Y) else {
            return false;
        };

        if let Some(node) = self.nodes.get_mut(handle) {
            node.transform.rotation = (parent_rotation.inverse() * world_rotation).normalize();
            return true;
        }
        false
    }

    // ========================================================================
    // Prefab instantiation
    // ========================================================================

    /// Instantiates `prefab` under `parent`: nodes, names, meshes and a copy
    /// of every material.
    pub fn instantiate(&mut self, prefab: &Prefab, parent: NodeHandle) -> PrefabInstance {
        let materials: Vec<MaterialKey> = prefab
            .materials
            .iter()
            .map(|m| self.materials.insert(m.clone()))
            .collect();

        let nodes: Vec<NodeHandle> = prefab
            .nodes
            .iter()
            .map(|p| {
                let mut transform = p.transform.clone();
                transform.mark_dirty();
                let handle = self.nodes.insert(Node::with_transform(transform));
                if let Some(name) = &p.name {
                    self.names.insert(handle, name.clone());
                }
                if let Some(mesh) = &p.mesh {
                    let keys = mesh
                        .material_indices
                        .iter()
                        .filter_map(|&i| materials.get(i).copied());
                    self.meshes
                        .insert(handle, Mesh::new(mesh.name.clone()).with_materials(keys));
                }
                handle
            })
            .collect();

        for (index, p) in prefab.nodes.iter().enumerate() {
            for &child in &p.children_indices {
                if let Some(&child_handle) = nodes.get(child) {
                    self.attach(child_handle, nodes[index]);
                }
            }
        }

        let roots: Vec<NodeHandle> = prefab
            .root_indices
            .iter()
            .filter_map(|&i| nodes.get(i).copied())
            .collect();
        for &root in &roots {
            self.attach(root, parent);
        }

        PrefabInstance {
            roots,
            nodes,
            materials,
        }
    }
}
