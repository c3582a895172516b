use std::time::Instant;

use log::debug;

use crate::ecs::World;
use crate::error::Result;
use crate::math::Vec2;
use crate::systems::{
    Boundary, CollisionSystem, ForceSystem, IntegrationMethod, MotionSystem, System, TickContext,
};

/// Standard gravitational acceleration, pointing down the y axis.
pub const DEFAULT_GRAVITY: Vec2 = Vec2::new(0.0, -9.81);

pub struct EngineBuilder {
    world: World,
    boundary: Boundary,
    gravity: Vec2,
    gravity_on: bool,
    integrator: Option<Box<dyn IntegrationMethod>>,
}

impl EngineBuilder {
    pub fn new(world: World, boundary: Boundary) -> Self {
        Self {
            world,
            boundary,
            gravity: DEFAULT_GRAVITY,
            gravity_on: true,
            integrator: None,
        }
    }

    pub fn gravity(mut self, gravity: Vec2) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn gravity_on(mut self, on: bool) -> Self {
        self.gravity_on = on;
        self
    }

    pub fn integrator(mut self, integrator: Box<dyn IntegrationMethod>) -> Self {
        self.integrator = Some(integrator);
        self
    }

    pub fn build(self) -> Engine {
        let mut forces = ForceSystem::new(self.gravity);
        forces.set_enabled(self.gravity_on);
        let motion = match self.integrator {
            Some(integrator) => MotionSystem::new(integrator),
            None => MotionSystem::default(),
        };
        let collision = CollisionSystem::new(self.boundary);

        Engine {
            world: self.world,
            systems: vec![Box::new(forces), Box::new(motion), Box::new(collision)],
            tick: 0,
        }
    }
}

/// Simulation facade: owns the world and the force -> motion -> collision
/// pipeline, driven by an external frame clock through [`Engine::update`].
///
/// Everything runs synchronously on the calling thread. Collaborators read
/// component state through [`Engine::world`] strictly between ticks.
pub struct Engine {
    world: World,
    systems: Vec<Box<dyn System>>,
    tick: u64,
}

impl Engine {
    pub fn builder(world: World, boundary: Boundary) -> EngineBuilder {
        EngineBuilder::new(world, boundary)
    }

    /// Advance the simulation by one tick of `delta_time` seconds.
    ///
    /// `delta_time` is used as given; the caller owns clamping. Returns
    /// per-system wall-clock timings for the completed tick.
    pub fn update(&mut self, delta_time: f64) -> Result<TickReport> {
        self.tick += 1;
        let ctx = TickContext {
            tick: self.tick,
            dt: delta_time,
        };

        let mut system_reports = Vec::with_capacity(self.systems.len());
        for system in &mut self.systems {
            let start = Instant::now();
            system.run(&ctx, &mut self.world)?;
            system_reports.push(SystemRunReport {
                name: system.name(),
                duration_ms: start.elapsed().as_secs_f64() * 1_000.0,
            });
        }

        debug!("tick {} complete ({} systems)", self.tick, system_reports.len());
        Ok(TickReport {
            tick: self.tick,
            system_reports,
        })
    }

    /// Toggle gravity accumulation; consumed by scene-setup code.
    pub fn set_gravity_on(&mut self, on: bool) {
        if let Some(forces) = self.get_system_mut::<ForceSystem>() {
            forces.set_enabled(on);
        }
    }

    pub fn gravity_on(&self) -> bool {
        self.get_system::<ForceSystem>()
            .map(ForceSystem::is_enabled)
            .unwrap_or(false)
    }

    /// Completed update count.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Total kinetic energy of all dynamic particles, for summaries.
    pub fn total_kinetic_energy(&self) -> f64 {
        use crate::components::Particle;
        self.world
            .column::<Particle>()
            .iter()
            .map(|(_, particle)| particle.kinetic_energy())
            .sum()
    }

    pub fn get_system<T: 'static>(&self) -> Option<&T> {
        self.systems
            .iter()
            .find_map(|system| system.as_any().downcast_ref::<T>())
    }

    fn get_system_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.systems
            .iter_mut()
            .find_map(|system| system.as_any_mut().downcast_mut::<T>())
    }
}

#[derive(Clone, Debug)]
pub struct SystemRunReport {
    pub name: &'static str,
    pub duration_ms: f64,
}

#[derive(Clone, Debug)]
pub struct TickReport {
    pub tick: u64,
    pub system_reports: Vec<SystemRunReport>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Particle;

    fn engine() -> Engine {
        Engine::builder(World::new(), Boundary::from_size(100.0, 100.0).unwrap()).build()
    }

    #[test]
    fn test_pipeline_runs_in_order() {
        let mut engine = engine();
        let report = engine.update(0.016).unwrap();

        assert_eq!(report.tick, 1);
        let names: Vec<&str> = report
            .system_reports
            .iter()
            .map(|report| report.name)
            .collect();
        assert_eq!(names, vec!["forces", "motion", "collision"]);

        engine.update(0.016).unwrap();
        assert_eq!(engine.tick(), 2);
    }

    #[test]
    fn test_gravity_toggle_reaches_the_force_system() {
        let mut engine = engine();
        assert!(engine.gravity_on());

        engine.set_gravity_on(false);
        assert!(!engine.gravity_on());

        let entity = engine.world_mut().create_entity();
        engine
            .world_mut()
            .add_component(
                entity,
                Particle::new(Vec2::new(50.0, 50.0), Vec2::ZERO, 1.0).unwrap(),
            )
            .unwrap();

        engine.update(0.1).unwrap();
        let particle = engine.world().component::<Particle>(entity).unwrap();
        assert_eq!(particle.velocity(), Vec2::ZERO);
        assert_eq!(particle.position(), Vec2::new(50.0, 50.0));
    }
}
