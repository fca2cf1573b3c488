//! Asset Loading Tests
//!
//! Tests for:
//! - GltfLoader: glTF JSON with data-URI buffers, GLB containers
//! - Node names, hierarchy, materials and animation tracks
//! - Error cases: missing files, missing buffers, malformed documents
//! - AssetCache: deduplication, path resolution, failed loads

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use base64::Engine as _;
use glam::{Quat, Vec3};
use serde_json::json;

use myth_avatar::animation::AnimationMixer;
use myth_avatar::animation::clip::TrackData;
use myth_avatar::animation::binding::TargetPath;
use myth_avatar::assets::{AssetCache, GltfLoader, Prefab, PrefabLoader};
use myth_avatar::errors::{AvatarError, Result};
use myth_avatar::scene::{Node, Scene};
use myth_avatar::resources::Side;

// ============================================================================
// Document Builders
// ============================================================================

/// Keyframe data: 2 times, 2 translations, 2 rotations (64 bytes).
fn keyframe_bytes() -> Vec<u8> {
    let floats: [f32; 16] = [
        0.0, 1.0, // times
        0.0, 0.0, 0.0, 1.0, 2.0, 3.0, // translations
        0.0, 0.0, 0.0, 1.0, 0.0, 0.707_106_8, 0.0, 0.707_106_8, // rotations
    ];
    floats.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// A three-bone rig (Hips > Spine2 > Head) with one mesh and one clip.
/// `buffer` is the JSON of the single buffer entry.
fn document(buffer: serde_json::Value) -> serde_json::Value {
    json!({
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
        "nodes": [
            { "name": "mixamorig:Hips", "children": [1], "translation": [0.0, 1.0, 0.0] },
            { "name": "Spine2", "children": [2] },
            { "name": "Head", "mesh": 0 }
        ],
        "meshes": [{
            "name": "Face",
            "primitives": [
                { "attributes": { "POSITION": 1 }, "material": 0 },
                { "attributes": { "POSITION": 1 } }
            ]
        }],
        "materials": [{
            "name": "Skin",
            "pbrMetallicRoughness": { "baseColorFactor": [1.0, 0.5, 0.5, 1.0] },
            "doubleSided": true
        }],
        "buffers": [buffer],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 8 },
            { "buffer": 0, "byteOffset": 8, "byteLength": 24 },
            { "buffer": 0, "byteOffset": 32, "byteLength": 32 }
        ],
        "accessors": [
            { "bufferView": 0, "componentType": 5126, "count": 2, "type": "SCALAR", "min": [0.0], "max": [1.0] },
            { "bufferView": 1, "componentType": 5126, "count": 2, "type": "VEC3" },
            { "bufferView": 2, "componentType": 5126, "count": 2, "type": "VEC4" }
        ],
        "animations": [{
            "name": "mixamo.com",
            "channels": [
                { "sampler": 0, "target": { "node": 0, "path": "translation" } },
                { "sampler": 1, "target": { "node": 2, "path": "rotation" } }
            ],
            "samplers": [
                { "input": 0, "output": 1, "interpolation": "LINEAR" },
                { "input": 0, "output": 2 }
            ]
        }]
    })
}

fn gltf_json_with_data_uri() -> Vec<u8> {
    let bytes = keyframe_bytes();
    let uri = format!(
        "data:application/octet-stream;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(&bytes)
    );
    let doc = document(json!({ "byteLength": bytes.len(), "uri": uri }));
    serde_json::to_vec(&doc).unwrap()
}

fn glb() -> Vec<u8> {
    let bin = keyframe_bytes();
    let mut json = serde_json::to_vec(&document(json!({ "byteLength": bin.len() }))).unwrap();
    while json.len() % 4 != 0 {
        json.push(b' ');
    }

    let total = 12 + 8 + json.len() + 8 + bin.len();
    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(b"glTF");
    out.extend_from_slice(&2u32.to_le_bytes());
    out.extend_from_slice(&(total as u32).to_le_bytes());
    out.extend_from_slice(&(json.len() as u32).to_le_bytes());
    out.extend_from_slice(b"JSON");
    out.extend_from_slice(&json);
    out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
    out.extend_from_slice(b"BIN\0");
    out.extend_from_slice(&bin);
    out
}

fn scratch_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("myth-avatar-{tag}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn load_json_prefab() -> Prefab {
    GltfLoader::load_slice(&gltf_json_with_data_uri(), Path::new(".")).unwrap()
}

/// The rig document with the `Head` node's name removed.
fn load_prefab_with_unnamed_head() -> Prefab {
    let mut doc: serde_json::Value = serde_json::from_slice(&gltf_json_with_data_uri()).unwrap();
    doc["nodes"][2].as_object_mut().unwrap().remove("name");
    GltfLoader::load_slice(&serde_json::to_vec(&doc).unwrap(), Path::new(".")).unwrap()
}

// ============================================================================
// GltfLoader: Nodes & Materials
// ============================================================================

#[test]
fn gltf_nodes_are_named_and_linked() {
    let prefab = load_json_prefab();

    assert_eq!(prefab.nodes.len(), 3);
    assert_eq!(prefab.root_indices, vec![0]);
    assert_eq!(prefab.nodes[0].name.as_deref(), Some("mixamorigHips"));
    assert_eq!(prefab.nodes[0].children_indices, vec![1]);
    assert_eq!(prefab.find_node("Spine2"), Some(1));
    assert_eq!(prefab.find_node("Head"), Some(2));
    assert_eq!(prefab.nodes[0].transform.position, Vec3::new(0.0, 1.0, 0.0));
}

#[test]
fn gltf_materials_and_default_material() {
    let prefab = load_json_prefab();

    // "Skin" plus the default for the primitive without a material
    assert_eq!(prefab.materials.len(), 2);
    let skin = &prefab.materials[0];
    assert_eq!(skin.name, "Skin");
    assert_eq!(skin.settings().side, Side::Double);
    assert!(!skin.settings().transparent);
    assert!(!skin.wireframe());

    let mesh = prefab.nodes[2].mesh.as_ref().unwrap();
    assert_eq!(mesh.name, "Face");
    assert_eq!(mesh.material_indices.as_slice(), &[0, 1]);
}

// ============================================================================
// GltfLoader: Animations
// ============================================================================

#[test]
fn gltf_animation_tracks() {
    let prefab = load_json_prefab();

    assert_eq!(prefab.animations.len(), 1);
    let clip = &prefab.animations[0];
    assert_eq!(clip.name, "mixamo.com");
    assert!((clip.duration - 1.0).abs() < 1e-6);
    assert_eq!(clip.tracks.len(), 2);

    let hips = &clip.tracks[0];
    assert_eq!(hips.meta.node_name, "mixamorigHips");
    assert_eq!(hips.meta.target, TargetPath::Translation);
    let TrackData::Vector3(track) = &hips.data else {
        panic!("translation track should hold Vec3 data");
    };
    let mid = track.sample(0.5).unwrap();
    assert!((mid - Vec3::new(0.5, 1.0, 1.5)).length() < 1e-5);

    let head = &clip.tracks[1];
    assert_eq!(head.meta.node_name, "Head");
    assert_eq!(head.meta.target, TargetPath::Rotation);
    assert!(matches!(head.data, TrackData::Quaternion(_)));
}

#[test]
fn gltf_unnamed_nodes_stay_unnamed() {
    let prefab = load_prefab_with_unnamed_head();

    assert_eq!(prefab.nodes.len(), 3);
    assert_eq!(prefab.nodes[2].name, None);
    assert_eq!(prefab.nodes[1].children_indices, vec![2]);
    assert!(prefab.nodes[2].mesh.is_some());
}

#[test]
fn gltf_channels_on_unnamed_nodes_are_skipped() {
    let prefab = load_prefab_with_unnamed_head();

    let clip = &prefab.animations[0];
    assert_eq!(clip.tracks.len(), 1);
    assert_eq!(clip.tracks[0].meta.node_name, "mixamorigHips");
}

#[test]
fn clip_from_other_file_leaves_unnamed_model_nodes_alone() {
    // Model and animation come from separate files, both with an unnamed
    // node at the same index
    let model = load_prefab_with_unnamed_head();
    let animation_file = load_prefab_with_unnamed_head();

    let mut scene = Scene::new();
    let root = scene.add_node(Node::new());
    let instance = scene.instantiate(&model, root);
    let unnamed = instance.nodes[2];
    assert_eq!(scene.get_name(unnamed), None);

    let mut mixer = AnimationMixer::new(root);
    let handle = mixer.clip_action(Arc::clone(&animation_file.animations[0]), &scene);
    mixer.action_mut(handle).unwrap().play();
    mixer.update(0.5, &mut scene);

    assert_eq!(mixer.action(handle).unwrap().bindings.len(), 1);
    assert_eq!(scene.get_node(unnamed).unwrap().transform.rotation, Quat::IDENTITY);
    let hips = instance.nodes[0];
    assert!((scene.get_node(hips).unwrap().transform.position - Vec3::new(0.5, 1.0, 1.5)).length() < 1e-5);
}

#[test]
fn gltf_glb_container_uses_binary_chunk() {
    let prefab = GltfLoader::load_slice(&glb(), Path::new(".")).unwrap();
    assert_eq!(prefab.nodes.len(), 3);
    assert_eq!(prefab.animations.len(), 1);
    assert_eq!(prefab.animations[0].tracks.len(), 2);
}

// ============================================================================
// GltfLoader: Errors
// ============================================================================

#[test]
fn gltf_missing_file_is_asset_not_found() {
    let err = GltfLoader::load_file(Path::new("does/not/exist.glb")).unwrap_err();
    assert!(matches!(err, AvatarError::AssetNotFound(_)), "got {err:?}");
}

#[test]
fn gltf_missing_external_buffer() {
    let doc = document(json!({ "byteLength": 64, "uri": "missing.bin" }));
    let bytes = serde_json::to_vec(&doc).unwrap();

    let err = GltfLoader::load_slice(&bytes, &scratch_dir("nobuf")).unwrap_err();
    assert!(matches!(err, AvatarError::MissingBuffer(_)), "got {err:?}");
}

#[test]
fn gltf_short_buffer_is_rejected() {
    let uri = format!(
        "data:application/octet-stream;base64,{}",
        base64::engine::general_purpose::STANDARD.encode([0u8; 8])
    );
    let doc = document(json!({ "byteLength": 64, "uri": uri }));
    let bytes = serde_json::to_vec(&doc).unwrap();

    let err = GltfLoader::load_slice(&bytes, Path::new(".")).unwrap_err();
    assert!(matches!(err, AvatarError::MissingBuffer(_)), "got {err:?}");
}

#[test]
fn gltf_malformed_document() {
    let err = GltfLoader::load_slice(b"{ not json", Path::new(".")).unwrap_err();
    assert!(matches!(err, AvatarError::Gltf(_)), "got {err:?}");
}

#[test]
fn gltf_external_buffer_file() {
    let dir = scratch_dir("extbuf");
    std::fs::write(dir.join("keys.bin"), keyframe_bytes()).unwrap();
    let doc = document(json!({ "byteLength": 64, "uri": "keys.bin" }));
    std::fs::write(dir.join("rig.gltf"), serde_json::to_vec(&doc).unwrap()).unwrap();

    let prefab = GltfLoader::load_file(&dir.join("rig.gltf")).unwrap();
    assert_eq!(prefab.animations[0].tracks.len(), 2);
}

// ============================================================================
// AssetCache
// ============================================================================

/// Loader that counts calls and fails for paths containing "broken".
#[derive(Default)]
struct CountingLoader {
    calls: Arc<AtomicUsize>,
}

impl PrefabLoader for CountingLoader {
    fn load(&self, path: &Path) -> Result<Prefab> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if path.to_string_lossy().contains("broken") {
            return Err(AvatarError::AssetNotFound(path.display().to_string()));
        }
        Ok(Prefab::new())
    }
}

fn counting_cache() -> (AssetCache, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let loader = CountingLoader {
        calls: Arc::clone(&calls),
    };
    (AssetCache::with_loader("assets", loader), calls)
}

#[test]
fn cache_loads_each_path_once() {
    let (cache, calls) = counting_cache();

    let a = cache.load("models/avatar.glb").unwrap();
    let b = cache.load("models/avatar.glb").unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(cache.len(), 1);
}

#[test]
fn cache_leading_slash_resolves_against_root() {
    let (cache, calls) = counting_cache();

    cache.load("/models/avatar.glb").unwrap();
    assert!(cache.contains("models/avatar.glb"));
    cache.load("models/avatar.glb").unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(cache.resolve("/a/b.glb"), Path::new("assets").join("a/b.glb"));
}

#[test]
fn cache_preload_then_hits() {
    let (cache, calls) = counting_cache();

    cache
        .preload(["models/avatar.glb", "animations/Typing.glb", "animations/Typing.glb"])
        .unwrap();
    assert_eq!(cache.len(), 2);
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    cache.load("animations/Typing.glb").unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn cache_does_not_store_failures() {
    let (cache, calls) = counting_cache();

    assert!(cache.load("broken.glb").is_err());
    assert!(cache.load("broken.glb").is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert!(cache.is_empty());
    assert!(!cache.contains("broken.glb"));
}

#[test]
fn cache_preload_stops_at_first_error() {
    let (cache, _) = counting_cache();
    let result = cache.preload(["a.glb", "broken.glb", "c.glb"]);
    assert!(result.is_err());
    assert!(cache.contains("a.glb"));
    assert!(!cache.contains("c.glb"));
}

#[test]
fn cache_clear_forces_reload() {
    let (cache, calls) = counting_cache();
    cache.load("a.glb").unwrap();
    cache.clear();
    assert!(cache.is_empty());
    cache.load("a.glb").unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn cache_reads_gltf_files_from_root() {
    let dir = scratch_dir("cache");
    std::fs::create_dir_all(dir.join("models")).unwrap();
    std::fs::write(dir.join("models/rig.glb"), glb()).unwrap();

    let cache = AssetCache::new(&dir);
    let prefab = cache.load("/models/rig.glb").unwrap();
    assert_eq!(prefab.nodes.len(), 3);

    let err = cache.load("models/absent.glb").unwrap_err();
    assert!(matches!(err, AvatarError::AssetNotFound(_)));
}
