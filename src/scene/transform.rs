use glam::{Affine3A, Mat3, Quat, Vec3};

/// Transform component.
///
/// Wraps a node's position, rotation and scale (TRS) together with the
/// cached matrices and the dirty-check state.
#[derive(Debug, Clone)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,

    pub(crate) local_matrix: Affine3A,
    pub(crate) world_matrix: Affine3A,

    last_position: Vec3,
    last_rotation: Quat,
    last_scale: Vec3,
    force_update: bool,
}

impl Transform {
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,

            local_matrix: Affine3A::IDENTITY,
            world_matrix: Affine3A::IDENTITY,

            last_position: Vec3::ZERO,
            last_rotation: Quat::IDENTITY,
            last_scale: Vec3::ONE,
            force_update: true,
        }
    }

    /// Builds a transform from decomposed TRS values.
    #[must_use]
    pub fn from_trs(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        let mut t = Self::new();
        t.position = position;
        t.rotation = rotation;
        t.scale = scale;
        t
    }

    /// Recomputes the local matrix if any TRS component changed.
    ///
    /// Returns whether the matrix was rebuilt.
    pub fn update_local_matrix(&mut self) -> bool {
        let changed = self.position != self.last_position
            || self.rotation != self.last_rotation
            || self.scale != self.last_scale
            || self.force_update;

        if changed {
            self.local_matrix =
                Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.position);

            self.last_position = self.position;
            self.last_rotation = self.rotation;
            self.last_scale = self.scale;
            self.force_update = false;
        }

        changed
    }

    /// Local matrix built from the current TRS, ignoring the cache.
    #[inline]
    #[must_use]
    pub fn compose(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    #[inline]
    #[must_use]
    pub fn local_matrix(&self) -> &Affine3A {
        &self.local_matrix
    }

    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.world_matrix
    }

    pub fn set_world_matrix(&mut self, mat: Affine3A) {
        self.world_matrix = mat;
    }

    /// Orients the transform so its local +Z axis points at `target`.
    ///
    /// This is the object convention (cameras look down -Z instead).
    /// `target` and `up` are expressed in the parent's coordinate space.
    /// A target straight along `up` still gets a rotation; a target on the
    /// node itself leaves the rotation untouched.
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        if let Some(rotation) = facing_rotation(self.position, target, up) {
            self.rotation = rotation;
        }
    }

    pub fn mark_dirty(&mut self) {
        self.force_update = true;
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

/// Rotation turning local +Z from `eye` toward `target`.
pub(crate) fn facing_rotation(eye: Vec3, target: Vec3, up: Vec3) -> Option<Quat> {
    let forward = target - eye;
    if forward.length_squared() < 1e-12 {
        return None;
    }
    let mut forward = forward.normalize();

    let mut right = up.cross(forward);
    if right.length_squared() < 1e-8 {
        // Target along `up`: nudge the direction off the axis
        if (up.z.abs() - 1.0).abs() < 1e-4 {
            forward.x += 1e-4;
        } else {
            forward.z += 1e-4;
        }
        forward = forward.normalize();
        right = up.cross(forward);
        if right.length_squared() < 1e-12 {
            return None;
        }
    }
    let right = right.normalize();
    let new_up = forward.cross(right);

    Some(Quat::from_mat3(&Mat3::from_cols(right, new_up, forward)).normalize())
}
