//! Transform System
//!
//! Propagates local matrices down the hierarchy. Decoupled from [`Scene`]
//! so only the node storage is borrowed.
//!
//! [`Scene`]: crate::scene::Scene

use glam::Affine3A;
use slotmap::SlotMap;

use crate::scene::NodeHandle;
use crate::scene::node::Node;

/// Updates world matrices for every node reachable from `roots`.
///
/// Uses an explicit stack so deep skeletons cannot overflow the call stack.
/// A subtree is only recomputed when its own local matrix or an ancestor's
/// world matrix changed.
pub fn update_hierarchy_iterative(nodes: &mut SlotMap<NodeHandle, Node>, roots: &[NodeHandle]) {
    // (node, parent world matrix, parent changed)
    let mut stack: Vec<(NodeHandle, Affine3A, bool)> = Vec::with_capacity(64);

    for &root in roots.iter().rev() {
        stack.push((root, Affine3A::IDENTITY, false));
    }

    while let Some((handle, parent_world, parent_changed)) = stack.pop() {
        let Some(node) = nodes.get_mut(handle) else {
            continue;
        };

        let local_changed = node.transform.update_local_matrix();
        let world_needs_update = local_changed || parent_changed;

        if world_needs_update {
            let world = parent_world * *node.transform.local_matrix();
            node.transform.set_world_matrix(world);
        }

        let current_world = node.transform.world_matrix;
        for &child in node.children.iter().rev() {
            stack.push((child, current_world, world_needs_update));
        }
    }
}

/// Updates the subtree rooted at `root`, starting from its parent's cached
/// world matrix.
pub fn update_subtree(nodes: &mut SlotMap<NodeHandle, Node>, root: NodeHandle) {
    let Some(node) = nodes.get(root) else {
        return;
    };
    let parent_world = node
        .parent
        .and_then(|p| nodes.get(p))
        .map_or(Affine3A::IDENTITY, |p| p.transform.world_matrix);

    let mut stack = vec![(root, parent_world, true)];
    while let Some((handle, parent_world, parent_changed)) = stack.pop() {
        let Some(node) = nodes.get_mut(handle) else {
            continue;
        };
        let local_changed = node.transform.update_local_matrix();
        let world_needs_update = local_changed || parent_changed;
        if world_needs_update {
            let world = parent_world * *node.transform.local_matrix();
            node.transform.set_world_matrix(world);
        }
        let current_world = node.transform.world_matrix;
        for &child in node.children.iter().rev() {
            stack.push((child, current_world, world_needs_update));
        }
    }
}
