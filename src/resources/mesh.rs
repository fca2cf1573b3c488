use smallvec::SmallVec;

use crate::scene::MaterialKey;

/// Mesh component attached to a scene node.
///
/// Geometry lives with the renderer; the avatar only needs to know which
/// materials each mesh draws with (one per primitive).
#[derive(Debug, Clone)]
pub struct Mesh {
    pub name: String,
    pub materials: SmallVec<[MaterialKey; 4]>,
}

impl Mesh {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            materials: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn with_materials(mut self, materials: impl IntoIterator<Item = MaterialKey>) -> Self {
        self.materials.extend(materials);
        self
    }
}
