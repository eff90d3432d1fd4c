use std::path::PathBuf;

use bevy_ecs::prelude::*;
use clap::Parser;
use log::{error, info};

use focusinteract::components::interactable::Interactable;
use focusinteract::components::interactor::Interactor;
use focusinteract::components::label::Label;
use focusinteract::components::scanconfig::ScanConfig;
use focusinteract::engine;
use focusinteract::events::switchdebug::SwitchDebugEvent;
use focusinteract::resources::debugdraw::DebugDrawBuffer;
use focusinteract::scene::SceneDescription;

const HALLWAY_SCENE: &str = include_str!("../assets/scenes/hallway.json");

#[derive(Parser)]
#[command(
    version,
    about = "Runs a scripted focus-and-interact scene and logs every transition."
)]
struct Cli {
    /// Scene JSON file. Defaults to the bundled hallway scene.
    #[arg(long, value_name = "PATH")]
    scene: Option<PathBuf>,

    /// INI file with scan settings; scene values take precedence.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write the effective scan settings to PATH and exit.
    #[arg(long, value_name = "PATH")]
    write_config: Option<PathBuf>,

    /// Frames to simulate. Defaults to the timeline length plus one second.
    #[arg(long)]
    frames: Option<u64>,

    /// Fixed frame delta in seconds.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Record debug traces and log every transition.
    #[arg(long)]
    debug: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let scene = match &cli.scene {
        Some(path) => SceneDescription::load_from_file(path),
        None => SceneDescription::from_json(HALLWAY_SCENE),
    };
    let scene = match scene {
        Ok(scene) => scene,
        Err(e) => {
            error!("Error loading scene: {e}");
            std::process::exit(1);
        }
    };

    let mut base = ScanConfig::new();
    if let Some(path) = &cli.config
        && let Err(e) = base.load_from_file(path)
    {
        error!("Error loading config: {e}");
        std::process::exit(1);
    }

    let mut world = World::new();
    engine::install(&mut world);

    let spawned = match scene.spawn(&mut world, base) {
        Ok(spawned) => spawned,
        Err(e) => {
            error!("Error spawning scene: {e}");
            std::process::exit(1);
        }
    };

    if let Some(path) = cli.write_config {
        let config = world
            .get::<Interactor>(spawned.agent)
            .map(|i| i.config.clone())
            .unwrap_or_default();
        if let Err(e) = config.save_to_file(&path) {
            error!("Error: {e}");
            std::process::exit(1);
        }
        println!("Scan config written to {}", path.display());
        return;
    }

    if cli.debug {
        world.trigger(SwitchDebugEvent {});
        world.flush();
    }

    let dt = cli.dt.max(0.0);
    let frames = cli.frames.unwrap_or_else(|| {
        let one_second = if dt > 0.0 { (1.0 / dt).ceil() as u64 } else { 0 };
        scene.last_frame() + one_second
    });

    info!("Running {} frames at dt={:.4}s", frames, dt);
    let mut update = engine::build_schedule();
    for frame in 0..frames {
        scene.apply_frame(&mut world, &spawned, frame);
        engine::step(&mut world, &mut update, dt);
    }

    let mut targets = world.query::<(&Label, &Interactable)>();
    for (label, interactable) in targets.iter(&world) {
        info!(
            "{}: {} interaction(s), last at {:?}",
            label.name(),
            interactable.interaction_count(),
            interactable.last_interaction()
        );
    }
    if let Some(buffer) = world.get_resource::<DebugDrawBuffer>() {
        info!("{} debug shape(s) alive at exit", buffer.len());
    }
}
