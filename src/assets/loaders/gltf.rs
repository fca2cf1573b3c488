use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use base64::Engine as _;
use glam::{Quat, Vec3, Vec4};
use smallvec::SmallVec;

use crate::animation::binding::TargetPath;
use crate::animation::clip::{AnimationClip, Track, TrackData, TrackMeta};
use crate::animation::tracks::{InterpolationMode, KeyframeTrack};
use crate::assets::PrefabLoader;
use crate::assets::prefab::{Prefab, PrefabMesh, PrefabNode};
use crate::errors::{AvatarError, Result};
use crate::resources::material::{Material, Side};
use crate::scene::transform::Transform;

/// Characters stripped from node names, matching the names animation
/// tracks reference after export.
const RESERVED_NAME_CHARS: &[char] = &['[', ']', '.', ':', '/'];

/// Normalizes a node name: whitespace becomes `_`, reserved characters are
/// removed.
#[must_use]
pub fn sanitize_node_name(name: &str) -> String {
    name.chars()
        .filter(|c| !RESERVED_NAME_CHARS.contains(c))
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}

/// glTF 2.0 loader producing [`Prefab`]s.
///
/// Reads `.gltf` (JSON) and `.glb` files. Buffers may come from the GLB
/// binary chunk, sibling files, or base64 `data:` URIs. Geometry is left to
/// the renderer; the prefab keeps hierarchy, transforms, material
/// assignments, materials and animations.
#[derive(Debug, Default, Clone, Copy)]
pub struct GltfLoader;

impl GltfLoader {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Loads a glTF file from disk.
    pub fn load_file(path: &Path) -> Result<Prefab> {
        let bytes = fs::read(path).map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                AvatarError::AssetNotFound(path.display().to_string())
            } else {
                AvatarError::Io(err)
            }
        })?;
        let base_path = path.parent().unwrap_or(Path::new("./")).to_path_buf();
        Self::load_slice(&bytes, &base_path)
    }

    /// Loads a glTF document from memory; relative buffer URIs resolve
    /// against `base_path`.
    pub fn load_slice(bytes: &[u8], base_path: &Path) -> Result<Prefab> {
        let gltf = gltf::Gltf::from_slice_without_validation(bytes)?;

        let unsupported: Vec<&str> = gltf.extensions_required().collect();
        if !unsupported.is_empty() {
            log::warn!("glTF file requires unsupported extensions: {unsupported:?}");
        }

        let buffers = load_buffers(&gltf, base_path)?;

        let mut prefab = Prefab::new();
        load_materials(&gltf, &mut prefab);
        load_nodes(&gltf, &mut prefab);
        prefab.animations = load_animations(&gltf, &buffers)?
            .into_iter()
            .map(Arc::new)
            .collect();

        log::debug!(
            "Parsed glTF: {} nodes, {} materials, {} animations",
            prefab.nodes.len(),
            prefab.materials.len(),
            prefab.animations.len()
        );

        Ok(prefab)
    }
}

impl PrefabLoader for GltfLoader {
    fn load(&self, path: &Path) -> Result<Prefab> {
        Self::load_file(path)
    }
}

// ============================================================================
// Buffers
// ============================================================================

fn load_buffers(gltf: &gltf::Gltf, base_path: &Path) -> Result<Vec<Vec<u8>>> {
    let mut buffer_data = Vec::new();
    for buffer in gltf.buffers() {
        let data = match buffer.source() {
            gltf::buffer::Source::Bin => gltf
                .blob
                .clone()
                .ok_or_else(|| AvatarError::MissingBuffer("GLB binary chunk".to_string()))?,
            gltf::buffer::Source::Uri(uri) if uri.starts_with("data:") => decode_data_uri(uri)?,
            gltf::buffer::Source::Uri(uri) => {
                let buffer_path: PathBuf = base_path.join(uri);
                fs::read(&buffer_path)
                    .map_err(|_| AvatarError::MissingBuffer(buffer_path.display().to_string()))?
            }
        };
        if data.len() < buffer.length() {
            return Err(AvatarError::MissingBuffer(format!(
                "buffer {} holds {} bytes, expected {}",
                buffer.index(),
                data.len(),
                buffer.length()
            )));
        }
        buffer_data.push(data);
    }
    Ok(buffer_data)
}

fn decode_data_uri(uri: &str) -> Result<Vec<u8>> {
    let (header, payload) = uri
        .split_once(',')
        .ok_or_else(|| AvatarError::DataUri("missing ',' separator".to_string()))?;
    if !header.ends_with(";base64") {
        return Err(AvatarError::DataUri(format!(
            "unsupported encoding in '{header}'"
        )));
    }
    Ok(base64::engine::general_purpose::STANDARD.decode(payload)?)
}

// ============================================================================
// Materials & nodes
// ============================================================================

fn load_materials(gltf: &gltf::Gltf, prefab: &mut Prefab) {
    for material in gltf.materials() {
        let name = material
            .name()
            .map_or_else(|| format!("Material_{}", prefab.materials.len()), str::to_string);
        let color = Vec4::from_array(material.pbr_metallic_roughness().base_color_factor());

        let mut mat = Material::new(name, color);
        {
            let mut settings = mat.settings_mut();
            if material.double_sided() {
                settings.side = Side::Double;
            }
            settings.transparent = material.alpha_mode() == gltf::material::AlphaMode::Blend;
        }
        prefab.materials.push(mat);
    }
}

fn load_nodes(gltf: &gltf::Gltf, prefab: &mut Prefab) {
    // Primitives without a material use a shared default, appended lazily.
    let mut default_material: Option<usize> = None;

    for node in gltf.nodes() {
        let (t, r, s) = node.transform().decomposed();
        let transform =
            Transform::from_trs(Vec3::from_array(t), Quat::from_array(r), Vec3::from_array(s));

        let mesh = node.mesh().map(|mesh| {
            let material_indices: SmallVec<[usize; 4]> = mesh
                .primitives()
                .map(|primitive| match primitive.material().index() {
                    Some(index) => index,
                    None => *default_material.get_or_insert_with(|| {
                        prefab.materials.push(Material::default());
                        prefab.materials.len() - 1
                    }),
                })
                .collect();
            PrefabMesh {
                name: mesh
                    .name()
                    .map_or_else(|| format!("Mesh_{}", mesh.index()), str::to_string),
                material_indices,
            }
        });

        // Unnamed nodes stay unnamed so name lookups can never reach them
        prefab.nodes.push(PrefabNode {
            name: node.name().map(sanitize_node_name),
            transform,
            children_indices: node.children().map(|c| c.index()).collect(),
            mesh,
        });
    }

    prefab.root_indices = match gltf.default_scene().or_else(|| gltf.scenes().next()) {
        Some(scene) => scene.nodes().map(|n| n.index()).collect(),
        None => {
            // No scene: every node without a parent is a root
            let mut is_child = vec![false; prefab.nodes.len()];
            for node in &prefab.nodes {
                for &child in &node.children_indices {
                    if let Some(flag) = is_child.get_mut(child) {
                        *flag = true;
                    }
                }
            }
            (0..prefab.nodes.len()).filter(|&i| !is_child[i]).collect()
        }
    };
}

// ============================================================================
// Animations
// ============================================================================

fn load_animations(gltf: &gltf::Gltf, buffers: &[Vec<u8>]) -> Result<Vec<AnimationClip>> {
    use gltf::animation::util::ReadOutputs;

    let mut animations = Vec::new();

    for anim in gltf.animations() {
        let mut tracks = Vec::new();

        for channel in anim.channels() {
            let reader = channel.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));
            let target = channel.target();
            let gltf_node = target.node();

            // Tracks bind by name, possibly against another file's nodes
            let Some(node_name) = gltf_node.name().map(sanitize_node_name) else {
                log::debug!(
                    "Animation channel {} targets unnamed node {}, skipped",
                    channel.index(),
                    gltf_node.index()
                );
                continue;
            };

            let times: Vec<f32> = reader
                .read_inputs()
                .ok_or_else(|| {
                    AvatarError::Gltf(format!("animation channel {} has no input", channel.index()))
                })?
                .collect();

            let interpolation = match channel.sampler().interpolation() {
                gltf::animation::Interpolation::Linear => InterpolationMode::Linear,
                gltf::animation::Interpolation::Step => InterpolationMode::Step,
                gltf::animation::Interpolation::CubicSpline => InterpolationMode::CubicSpline,
            };

            let Some(outputs) = reader.read_outputs() else {
                log::warn!("Animation channel {} has no output, skipped", channel.index());
                continue;
            };

            let (target_path, data) = match outputs {
                ReadOutputs::Translations(iter) => (
                    TargetPath::Translation,
                    TrackData::Vector3(KeyframeTrack::new(
                        times,
                        iter.map(Vec3::from_array).collect(),
                        interpolation,
                    )),
                ),
                ReadOutputs::Scales(iter) => (
                    TargetPath::Scale,
                    TrackData::Vector3(KeyframeTrack::new(
                        times,
                        iter.map(Vec3::from_array).collect(),
                        interpolation,
                    )),
                ),
                ReadOutputs::Rotations(iter) => (
                    TargetPath::Rotation,
                    TrackData::Quaternion(KeyframeTrack::new(
                        times,
                        iter.into_f32().map(Quat::from_array).collect(),
                        interpolation,
                    )),
                ),
                ReadOutputs::MorphTargetWeights(_) => {
                    log::debug!("Morph target weight channel on '{node_name}' skipped");
                    continue;
                }
            };

            let consistent = match &data {
                TrackData::Vector3(t) => t.is_consistent() && !t.is_empty(),
                TrackData::Quaternion(t) => t.is_consistent() && !t.is_empty(),
            };
            if !consistent {
                log::warn!("Animation channel {} has mismatched keyframes, skipped", channel.index());
                continue;
            }

            tracks.push(Track {
                meta: TrackMeta {
                    node_name,
                    target: target_path,
                },
                data,
            });
        }

        let name = anim
            .name()
            .map_or_else(|| format!("Animation_{}", anim.index()), str::to_string);
        animations.push(AnimationClip::new(name, tracks));
    }

    Ok(animations)
}
