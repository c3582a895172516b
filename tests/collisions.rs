//! Collision detection and impulse-resolution behavior.

use std::collections::HashSet;

use approx::assert_relative_eq;

use kinetica::components::{CircleBound, Particle};
use kinetica::ecs::{Entity, World};
use kinetica::engine::Engine;
use kinetica::math::Vec2;
use kinetica::systems::{
    Boundary, CollisionSystem, ContactPair, ForceSystem, System, TickContext,
};

fn spawn_ball(world: &mut World, particle: Particle, radius: f64) -> Entity {
    let entity = world.create_entity();
    world.add_component(entity, particle).unwrap();
    world
        .add_component(entity, CircleBound::new(radius).unwrap())
        .unwrap();
    entity
}

fn centered_boundary() -> Boundary {
    Boundary::new(Vec2::new(-100.0, -100.0), Vec2::new(100.0, 100.0)).unwrap()
}

fn tick() -> TickContext {
    TickContext { tick: 1, dt: 0.1 }
}

#[test]
fn head_on_fixture_produces_expected_impulse_and_accelerations() {
    // Two approaching balls on the x axis, touching exactly:
    // v_rel = 4 along the contact normal, e = 0.9,
    // J = -(1 + 0.9) * 4 / (1/2 + 1/3) = -9.12.
    let mut world = World::new();
    let p1 = spawn_ball(
        &mut world,
        Particle::new(Vec2::new(2.0, 0.0), Vec2::new(3.0, 0.0), 2.0)
            .unwrap()
            .with_restitution(0.9)
            .unwrap(),
        2.0,
    );
    let p2 = spawn_ball(
        &mut world,
        Particle::new(Vec2::new(6.0, 0.0), Vec2::new(-1.0, 0.0), 3.0)
            .unwrap()
            .with_restitution(0.9)
            .unwrap(),
        2.0,
    );

    let mut collision = CollisionSystem::new(centered_boundary());
    collision.run(&tick(), &mut world).unwrap();

    let f1 = world.component::<Particle>(p1).unwrap().force();
    let f2 = world.component::<Particle>(p2).unwrap().force();
    assert_relative_eq!(f1.x, -9.12, epsilon = 1e-12);
    assert_relative_eq!(f2.x, 9.12, epsilon = 1e-12);
    assert_relative_eq!(f1.y, 0.0);
    assert_relative_eq!(f2.y, 0.0);

    // The next force pass turns the stored impulse into acceleration.
    let mut forces = ForceSystem::new(Vec2::ZERO);
    forces.set_enabled(false);
    forces.run(&tick(), &mut world).unwrap();

    let a1 = world.component::<Particle>(p1).unwrap().acceleration();
    let a2 = world.component::<Particle>(p2).unwrap().acceleration();
    assert_relative_eq!(a1.magnitude(), 4.56, epsilon = 1e-12);
    assert_relative_eq!(a2.magnitude(), 3.04, epsilon = 1e-12);
    assert!(a1.x < 0.0 && a2.x > 0.0);
}

#[test]
fn equal_mass_elastic_collision_is_symmetric() {
    let mut world = World::new();
    let p1 = spawn_ball(
        &mut world,
        Particle::new(Vec2::new(-1.0, 0.0), Vec2::new(5.0, 0.0), 1.0).unwrap(),
        1.0,
    );
    let p2 = spawn_ball(
        &mut world,
        Particle::new(Vec2::new(1.0, 0.0), Vec2::new(-5.0, 0.0), 1.0).unwrap(),
        1.0,
    );

    let mut collision = CollisionSystem::new(centered_boundary());
    collision.run(&tick(), &mut world).unwrap();

    let f1 = world.component::<Particle>(p1).unwrap().force();
    let f2 = world.component::<Particle>(p2).unwrap().force();
    assert_eq!(f1, -f2);
    assert!(f1.magnitude() > 0.0);
}

#[test]
fn separating_overlap_is_left_alone() {
    let mut world = World::new();
    let p1 = spawn_ball(
        &mut world,
        Particle::new(Vec2::new(-0.5, 0.0), Vec2::new(-2.0, 0.0), 1.0).unwrap(),
        1.0,
    );
    let p2 = spawn_ball(
        &mut world,
        Particle::new(Vec2::new(0.5, 0.0), Vec2::new(2.0, 0.0), 1.0).unwrap(),
        1.0,
    );

    let mut collision = CollisionSystem::new(centered_boundary());
    collision.run(&tick(), &mut world).unwrap();

    assert_eq!(world.component::<Particle>(p1).unwrap().force(), Vec2::ZERO);
    assert_eq!(world.component::<Particle>(p2).unwrap().force(), Vec2::ZERO);
}

#[test]
fn wall_crossing_flips_velocity_and_clamps_position() {
    let mut world = World::new();
    let entity = spawn_ball(
        &mut world,
        Particle::new(Vec2::new(0.25, 5.0), Vec2::new(-1.0, 0.0), 1.0).unwrap(),
        0.5,
    );

    let mut collision = CollisionSystem::new(Boundary::from_size(10.0, 10.0).unwrap());
    collision.run(&tick(), &mut world).unwrap();

    let particle = world.component::<Particle>(entity).unwrap();
    assert_eq!(particle.position().x, 0.5);
    assert_eq!(particle.velocity().x, 1.0);
}

#[test]
fn contact_pairs_are_unordered() {
    let mut world = World::new();
    let a = spawn_ball(
        &mut world,
        Particle::new(Vec2::ZERO, Vec2::ZERO, 1.0).unwrap(),
        1.0,
    );
    let b = spawn_ball(
        &mut world,
        Particle::new(Vec2::new(1.0, 0.0), Vec2::ZERO, 1.0).unwrap(),
        1.0,
    );

    let ab = ContactPair::new(a, b, Vec2::new(1.0, 0.0));
    let ba = ContactPair::new(b, a, Vec2::new(-1.0, 0.0));
    assert_eq!(ab, ba);

    let mut set = HashSet::new();
    set.insert(ab);
    set.insert(ba);
    assert_eq!(set.len(), 1);
}

#[test]
fn impulse_is_consumed_on_the_following_tick() {
    // Full pipeline: tick 1 deposits the impulse as force, tick 2's force
    // pass derives acceleration from it and integration starts to slow the
    // approach. Velocities are never written out-of-band.
    let mut world = World::new();
    let p1 = spawn_ball(
        &mut world,
        Particle::new(Vec2::new(-0.9, 0.0), Vec2::new(2.0, 0.0), 1.0).unwrap(),
        1.0,
    );
    let p2 = spawn_ball(
        &mut world,
        Particle::new(Vec2::new(0.9, 0.0), Vec2::new(-2.0, 0.0), 1.0).unwrap(),
        1.0,
    );

    let mut engine = Engine::builder(world, centered_boundary())
        .gravity_on(false)
        .build();

    engine.update(0.01).unwrap();
    // Tick 1: the contact deposited force, velocity is still untouched.
    let after_first = engine.world().component::<Particle>(p1).unwrap();
    assert!(after_first.force().magnitude() > 0.0);
    assert_relative_eq!(after_first.velocity().x, 2.0);

    engine.update(0.01).unwrap();
    let p1_state = engine.world().component::<Particle>(p1).unwrap();
    let p2_state = engine.world().component::<Particle>(p2).unwrap();
    // a = J / m with J = -(1 + 1) * 4 / 2 = -4 from the first contact.
    assert_relative_eq!(p1_state.acceleration().x, -4.0, epsilon = 1e-12);
    assert_relative_eq!(p2_state.acceleration().x, 4.0, epsilon = 1e-12);
    assert!(p1_state.velocity().x < 2.0);
    assert!(p2_state.velocity().x > -2.0);
}
