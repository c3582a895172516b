use std::any::Any;

use crate::components::Particle;
use crate::ecs::World;
use crate::error::Result;

use super::{Euler, IntegrationMethod, System, TickContext};

/// Advances every dynamic particle with the configured integration method.
pub struct MotionSystem {
    integrator: Box<dyn IntegrationMethod>,
}

impl MotionSystem {
    pub fn new(integrator: Box<dyn IntegrationMethod>) -> Self {
        Self { integrator }
    }

    pub fn integrator_name(&self) -> &'static str {
        self.integrator.name()
    }
}

impl Default for MotionSystem {
    fn default() -> Self {
        Self::new(Box::new(Euler))
    }
}

impl System for MotionSystem {
    fn name(&self) -> &'static str {
        "motion"
    }

    fn run(&mut self, ctx: &TickContext, world: &mut World) -> Result<()> {
        for (_, particle) in world.column_mut::<Particle>().iter_mut() {
            if particle.is_fixed() {
                continue;
            }
            self.integrator.step(particle, ctx.dt);
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
