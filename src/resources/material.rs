use glam::Vec4;

/// Which faces a material renders.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Side {
    Front,
    Back,
    Double,
}

/// Material settings - changes here require a different render pipeline.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct MaterialSettings {
    pub transparent: bool,
    pub side: Side,
    /// Render triangle edges only (debug view)
    pub wireframe: bool,
}

impl Default for MaterialSettings {
    fn default() -> Self {
        Self {
            transparent: false,
            side: Side::Front,
            wireframe: false,
        }
    }
}

/// A surface material as seen by the avatar.
///
/// Holds the handful of parameters a renderer needs to pick a pipeline.
/// Every mutation through [`settings_mut`](Self::settings_mut) bumps
/// [`version`](Self::version) so a renderer can detect stale pipelines.
#[derive(Debug, Clone)]
pub struct Material {
    pub name: String,
    pub color: Vec4,
    settings: MaterialSettings,
    version: u64,
}

impl Material {
    #[must_use]
    pub fn new(name: impl Into<String>, color: Vec4) -> Self {
        Self {
            name: name.into(),
            color,
            settings: MaterialSettings::default(),
            version: 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &MaterialSettings {
        &self.settings
    }

    /// Mutable access to the settings; the version advances when the guard drops.
    pub fn settings_mut(&mut self) -> SettingsGuard<'_> {
        SettingsGuard {
            settings: &mut self.settings,
            version: &mut self.version,
        }
    }

    #[inline]
    #[must_use]
    pub fn wireframe(&self) -> bool {
        self.settings.wireframe
    }

    /// Sets the wireframe flag. Writing the current value is a no-op.
    pub fn set_wireframe(&mut self, wireframe: bool) {
        if self.settings.wireframe != wireframe {
            self.settings_mut().wireframe = wireframe;
        }
    }

    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new("Default", Vec4::ONE)
    }
}

/// Write guard over [`MaterialSettings`].
pub struct SettingsGuard<'a> {
    settings: &'a mut MaterialSettings,
    version: &'a mut u64,
}

impl std::ops::Deref for SettingsGuard<'_> {
    type Target = MaterialSettings;

    fn deref(&self) -> &Self::Target {
        self.settings
    }
}

impl std::ops::DerefMut for SettingsGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.settings
    }
}

impl Drop for SettingsGuard<'_> {
    fn drop(&mut self) {
        *self.version = self.version.wrapping_add(1);
    }
}
