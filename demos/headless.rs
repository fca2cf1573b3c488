//! Drives an avatar without a window.
//!
//! ```text
//! cargo run --example headless -- [ASSET_ROOT] [CONFIG_JSON]
//! ```
//!
//! Loads the model and clips below `ASSET_ROOT` (default `public`), then
//! cycles through the three clips at 60 fps while sweeping a virtual pointer
//! across the screen.

use std::time::Duration;

use anyhow::Context;
use glam::Vec3;
use myth_avatar::app::{FrameState, Input};
use myth_avatar::avatar::{FALLING, STANDING, TYPING};
use myth_avatar::utils::Timer;
use myth_avatar::{AssetCache, Avatar, AvatarConfig, AvatarControls, Scene};

const FRAMES_PER_CLIP: u64 = 120;
const SCREEN: (u32, u32) = (1280, 720);

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let root = args.next().unwrap_or_else(|| "public".to_string());
    let config = match args.next() {
        Some(path) => AvatarConfig::from_json_file(&path)
            .with_context(|| format!("reading config {path}"))?,
        None => AvatarConfig::default(),
    };

    if AssetCache::install_global(AssetCache::new(&root)).is_err() {
        log::warn!("Global asset cache already installed");
    }
    let cache = AssetCache::global();

    let mut scene = Scene::new();
    let mut avatar = Avatar::load(&mut scene, cache, &config)
        .with_context(|| format!("loading avatar assets from '{root}'"))?;

    let head = avatar.orientation().head();
    let camera = Vec3::new(0.0, 1.5, 4.0);
    let step = Duration::from_micros(16_667);
    let mut timer = Timer::new();
    let mut input = Input::new();
    input.handle_resize(SCREEN.0, SCREEN.1);

    let sequence = [TYPING, STANDING, FALLING];
    let total = FRAMES_PER_CLIP * sequence.len() as u64;

    for frame in 0..total {
        let clip = sequence[(frame / FRAMES_PER_CLIP) as usize];
        avatar.set_animation(Some(clip));
        avatar.set_controls(
            &mut scene,
            AvatarControls {
                head_follow: true,
                cursor_follow: true,
                wireframe: clip == FALLING,
            },
        );

        let sweep = frame as f64 / total as f64;
        input.handle_cursor_move(sweep * f64::from(SCREEN.0), f64::from(SCREEN.1) / 2.0);

        timer.tick_fixed(step);
        avatar.update(&mut scene, &FrameState::capture(&timer, &input, camera));
        input.end_frame();

        if frame % 30 == 0 {
            let head_position = head.map(|h| scene.world_position(h));
            println!(
                "[{:>6.2}s] clip={:<8} head={:?}",
                timer.elapsed.as_secs_f32(),
                avatar.active_clip().unwrap_or("-"),
                head_position
            );
        }
    }

    avatar.unmount(&mut scene);
    Ok(())
}
