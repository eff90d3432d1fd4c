//! End-to-end tests through the built-in collider caster and the demo scene.

use bevy_ecs::prelude::*;
use bevy_math::Vec3;

use focusinteract::components::collider::{Collider, CollisionChannel, CollisionResponse};
use focusinteract::components::interactable::Interactable;
use focusinteract::components::interactor::Interactor;
use focusinteract::components::scanconfig::{DebugTrace, ScanConfig, TraceOrigin, TraceShape};
use focusinteract::components::transform3d::Transform3d;
use focusinteract::engine;
use focusinteract::events::switchdebug::SwitchDebugEvent;
use focusinteract::resources::debugdraw::{DebugColor, DebugDrawBuffer, DebugShape};
use focusinteract::resources::debugmode::DebugMode;
use focusinteract::resources::simulation::SimulationState;
use focusinteract::scene::SceneDescription;

const HALLWAY: &str = include_str!("../assets/scenes/hallway.json");
const DT: f32 = 0.1;

fn make_world(config: ScanConfig) -> (World, Schedule, Entity) {
    let mut world = World::new();
    engine::install(&mut world);
    world.insert_resource(SimulationState::running());
    let agent = world
        .spawn((
            Transform3d::default(),
            Interactor::new(
                config
                    .with_interval(0.05)
                    .with_origin(TraceOrigin::AgentAnchor),
            )
            .with_auto_activate(true),
        ))
        .id();
    (world, engine::build_schedule(), agent)
}

fn focused(world: &World, agent: Entity) -> Option<Entity> {
    world.get::<Interactor>(agent).unwrap().tracker.focused()
}

fn spawn_target(world: &mut World, z: f32, collider: Collider, interactable: bool) -> Entity {
    let mut e = world.spawn((Transform3d::new(0.0, 0.0, z), collider));
    if interactable {
        e.insert(Interactable::new());
    }
    e.id()
}

#[test]
fn nearest_interactable_ahead_is_focused() {
    let (mut world, mut schedule, agent) = make_world(ScanConfig::new().with_distance(100.0));
    let near = spawn_target(&mut world, -40.0, Collider::sphere(5.0), true);
    let _far = spawn_target(&mut world, -80.0, Collider::sphere(5.0), true);

    engine::step(&mut world, &mut schedule, DT);

    assert_eq!(focused(&world, agent), Some(near));
    let hit = *world
        .get::<Interactor>(agent)
        .unwrap()
        .tracker
        .state()
        .last_hit()
        .unwrap();
    // Sphere cast of radius 20 touches the 5-unit sphere 25 units early.
    assert!((hit.distance - 15.0).abs() < 1e-3);
    assert!(hit.blocking);
}

#[test]
fn blocking_wall_hides_targets_behind_it() {
    let (mut world, mut schedule, agent) =
        make_world(ScanConfig::new().with_shape(TraceShape::Line, 1.0));
    let _wall = spawn_target(&mut world, -30.0, Collider::cuboid(50.0, 50.0, 1.0), false);
    let _behind = spawn_target(&mut world, -60.0, Collider::sphere(5.0), true);

    engine::step(&mut world, &mut schedule, DT);

    assert_eq!(focused(&world, agent), None);
}

#[test]
fn overlap_volumes_do_not_hide_targets() {
    let (mut world, mut schedule, agent) =
        make_world(ScanConfig::new().with_shape(TraceShape::Line, 1.0));
    let _glass = spawn_target(
        &mut world,
        -30.0,
        Collider::cuboid(50.0, 50.0, 1.0).with_response(CollisionResponse::Overlap),
        false,
    );
    let behind = spawn_target(&mut world, -60.0, Collider::sphere(5.0), true);

    engine::step(&mut world, &mut schedule, DT);

    assert_eq!(focused(&world, agent), Some(behind));
}

#[test]
fn colliders_on_other_channels_are_invisible() {
    let (mut world, mut schedule, agent) =
        make_world(ScanConfig::new().with_channel(CollisionChannel::VISIBILITY));
    let _camera_only = spawn_target(
        &mut world,
        -40.0,
        Collider::sphere(5.0).with_channels(CollisionChannel::CAMERA),
        true,
    );

    engine::step(&mut world, &mut schedule, DT);

    assert_eq!(focused(&world, agent), None);
}

#[test]
fn turning_away_moves_focus() {
    let (mut world, mut schedule, agent) = make_world(ScanConfig::new().with_distance(100.0));
    let ahead = spawn_target(&mut world, -40.0, Collider::sphere(5.0), true);
    let left = world
        .spawn((
            Transform3d::new(-40.0, 0.0, 0.0),
            Collider::sphere(5.0),
            Interactable::new(),
        ))
        .id();

    engine::step(&mut world, &mut schedule, DT);
    assert_eq!(focused(&world, agent), Some(ahead));

    *world.get_mut::<Transform3d>(agent).unwrap() = Transform3d::default().with_yaw_pitch(90.0, 0.0);
    engine::step(&mut world, &mut schedule, DT);

    assert_eq!(focused(&world, agent), Some(left));
    assert!(!world.get::<Interactable>(ahead).unwrap().is_focused());
    assert!(world.get::<Interactable>(left).unwrap().is_focused());
}

#[test]
fn debug_mode_records_traces_without_changing_results() {
    let (mut world, mut schedule, agent) = make_world(ScanConfig::new());
    let target = spawn_target(&mut world, -40.0, Collider::sphere(5.0), true);

    world.trigger(SwitchDebugEvent {});
    world.flush();
    assert!(world.get_resource::<DebugMode>().is_some());
    engine::step(&mut world, &mut schedule, DT);

    assert_eq!(focused(&world, agent), Some(target));
    let buffer = world.resource::<DebugDrawBuffer>();
    assert!(!buffer.is_empty());
    assert!(buffer.shapes().iter().any(|s| matches!(
        s.shape,
        DebugShape::Line {
            color: DebugColor::Red,
            ..
        }
    )));
}

#[test]
fn one_frame_traces_expire() {
    let (mut world, mut schedule, agent) =
        make_world(ScanConfig::new().with_debug_trace(DebugTrace::ForOneFrame));

    engine::step(&mut world, &mut schedule, DT);
    assert!(!world.resource::<DebugDrawBuffer>().is_empty());

    world
        .get_mut::<Interactor>(agent)
        .unwrap()
        .config
        .debug_trace = DebugTrace::None;
    engine::step(&mut world, &mut schedule, DT);
    assert!(world.resource::<DebugDrawBuffer>().is_empty());
}

fn interactions(world: &mut World, name: &str) -> u32 {
    let mut q = world.query::<(&focusinteract::components::label::Label, &Interactable)>();
    q.iter(world)
        .find(|(label, _)| label.name() == name)
        .map(|(_, i)| i.interaction_count())
        .unwrap_or(0)
}

#[test]
fn hallway_scene_plays_through() {
    let scene = SceneDescription::from_json(HALLWAY).unwrap();
    let mut world = World::new();
    engine::install(&mut world);
    let spawned = scene.spawn(&mut world, ScanConfig::new()).unwrap();
    let mut schedule = engine::build_schedule();
    let dt = 1.0 / 60.0;

    let mut run_until = |world: &mut World, from: u64, to: u64| {
        for frame in from..to {
            scene.apply_frame(world, &spawned, frame);
            engine::step(world, &mut schedule, dt);
        }
    };

    // Door ahead: the second press falls inside the cooldown.
    run_until(&mut world, 0, 50);
    assert_eq!(focused(&world, spawned.agent), Some(spawned.targets["door"]));
    assert_eq!(interactions(&mut world, "door"), 1);

    // Lever to the left, seen through the glass pane.
    run_until(&mut world, 50, 85);
    assert_eq!(focused(&world, spawned.agent), Some(spawned.targets["lever"]));
    assert_eq!(interactions(&mut world, "lever"), 1);

    // Chest to the right needs a long hold; short and canceled holds do nothing.
    run_until(&mut world, 85, 235);
    assert_eq!(focused(&world, spawned.agent), Some(spawned.targets["chest"]));
    assert_eq!(interactions(&mut world, "chest"), 1);

    // Facing the pillar keeps the chest; with detection off, turning back changes nothing.
    run_until(&mut world, 235, 275);
    assert_eq!(focused(&world, spawned.agent), Some(spawned.targets["chest"]));

    // Detection back on: the door is focused again and usable.
    run_until(&mut world, 275, 320);
    assert_eq!(focused(&world, spawned.agent), Some(spawned.targets["door"]));
    assert_eq!(interactions(&mut world, "door"), 2);
    assert_eq!(interactions(&mut world, "chest"), 1);
}

#[test]
fn scene_targets_sit_where_described() {
    let scene = SceneDescription::from_json(HALLWAY).unwrap();
    let mut world = World::new();
    let spawned = scene.spawn(&mut world, ScanConfig::new()).unwrap();
    let door = world.get::<Transform3d>(spawned.targets["door"]).unwrap();
    assert_eq!(door.position, Vec3::new(0.0, 160.0, -250.0));
}
