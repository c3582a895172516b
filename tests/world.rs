//! Registry semantics through the public API.

use kinetica::components::{Category, CircleBound, Particle};
use kinetica::ecs::World;
use kinetica::math::Vec2;
use kinetica::Error;

fn particle() -> Particle {
    Particle::new(Vec2::new(1.0, 1.0), Vec2::ZERO, 1.0).unwrap()
}

#[test]
fn entity_ids_are_never_reused() {
    let mut world = World::new();

    let first = world.create_entity();
    assert!(world.destroy_entity(first));

    let second = world.create_entity();
    assert_ne!(first, second);
    assert!(!world.is_alive(first));
    assert!(world.is_alive(second));

    // Destroying the stale handle again is a no-op.
    assert!(!world.destroy_entity(first));
    assert!(world.is_alive(second));
}

#[test]
fn duplicate_component_fails_and_preserves_the_original() {
    let mut world = World::new();
    let entity = world.create_entity();

    world.add_component(entity, particle()).unwrap();
    let err = world
        .add_component(
            entity,
            Particle::new(Vec2::new(9.0, 9.0), Vec2::ZERO, 5.0).unwrap(),
        )
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateComponent { .. }));

    let kept = world.component::<Particle>(entity).unwrap();
    assert_eq!(kept.position(), Vec2::new(1.0, 1.0));
    assert_eq!(kept.mass(), 1.0);
}

#[test]
fn lookups_on_missing_state_are_empty_not_fatal() {
    let mut world = World::new();
    let entity = world.create_entity();

    assert!(world.component::<Particle>(entity).is_none());
    assert!(!world.has_component::<CircleBound>(entity));
    assert!(!world.remove_component::<Particle>(entity));

    world.destroy_entity(entity);
    assert!(world.component::<Particle>(entity).is_none());
}

#[test]
fn destroying_an_entity_detaches_its_components() {
    let mut world = World::new();
    let entity = world.create_entity();
    world.add_component(entity, particle()).unwrap();
    world
        .add_component(entity, CircleBound::new(1.0).unwrap())
        .unwrap();

    world.destroy_entity(entity);

    // A fresh entity on the recycled slot sees none of the old components.
    let recycled = world.create_entity();
    assert_eq!(recycled.index(), entity.index());
    assert!(world.component::<Particle>(recycled).is_none());
    assert!(world.component::<CircleBound>(recycled).is_none());
}

#[test]
fn categories_require_the_full_component_set() {
    let mut world = World::new();

    let ball = world.create_entity();
    world.add_component(ball, particle()).unwrap();
    world
        .add_component(ball, CircleBound::new(1.0).unwrap())
        .unwrap();

    let point = world.create_entity();
    world.add_component(point, particle()).unwrap();

    let shape = world.create_entity();
    world
        .add_component(shape, CircleBound::new(2.0).unwrap())
        .unwrap();

    assert_eq!(world.entities_of_category(Category::Ball), vec![ball]);

    world.remove_component::<CircleBound>(ball);
    assert!(world.entities_of_category(Category::Ball).is_empty());
}
