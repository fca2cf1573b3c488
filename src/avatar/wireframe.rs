use crate::scene::{MaterialKey, Scene};
use crate::utils::Changed;

/// Mirrors the wireframe control onto a fixed set of materials.
///
/// Materials are only touched when the flag differs from the last synced
/// value.
#[derive(Debug, Clone, Default)]
pub struct WireframeToggle {
    materials: Vec<MaterialKey>,
    flag: Changed<bool>,
}

impl WireframeToggle {
    #[must_use]
    pub fn new(materials: Vec<MaterialKey>) -> Self {
        Self {
            materials,
            flag: Changed::new(),
        }
    }

    #[must_use]
    pub fn materials(&self) -> &[MaterialKey] {
        &self.materials
    }

    /// Applies `wireframe` to every material. Returns whether anything ran.
    pub fn sync(&mut self, scene: &mut Scene, wireframe: bool) -> bool {
        if !self.flag.update(wireframe) {
            return false;
        }
        for &key in &self.materials {
            if let Some(material) = scene.material_mut(key) {
                material.set_wireframe(wireframe);
            }
        }
        log::debug!(
            "Wireframe {} on {} materials",
            if wireframe { "enabled" } else { "disabled" },
            self.materials.len()
        );
        true
    }
}
