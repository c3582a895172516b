use std::any::Any;

use crate::components::Particle;
use crate::ecs::World;
use crate::error::Result;
use crate::math::Vec2;

use super::{System, TickContext};

/// Accumulates environmental forces and derives accelerations.
///
/// For every non-fixed particle: deposit gravity (weight = g * m) into the
/// force accumulator, set `acceleration = force / mass`, then clear the
/// accumulator. Whatever other passes deposited since the previous run
/// (collision impulses) is consumed here too, so the accumulator is empty
/// after every pass and never carries state further than one tick.
pub struct ForceSystem {
    gravity: Vec2,
    enabled: bool,
}

impl ForceSystem {
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity,
            enabled: true,
        }
    }

    pub fn gravity(&self) -> Vec2 {
        self.gravity
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl System for ForceSystem {
    fn name(&self) -> &'static str {
        "forces"
    }

    fn run(&mut self, _ctx: &TickContext, world: &mut World) -> Result<()> {
        let gravity = self.enabled.then_some(self.gravity);
        for (_, particle) in world.column_mut::<Particle>().iter_mut() {
            if particle.is_fixed() {
                continue;
            }
            if let Some(gravity) = gravity {
                particle.apply_force(gravity * particle.mass());
            }
            let acceleration = particle.force() * particle.inverse_mass();
            particle.set_acceleration(acceleration);
            particle.clear_forces();
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
