mod collision;
mod forces;
mod integrate;
mod motion;

pub use collision::{Boundary, CollisionSystem, ContactPair};
pub use forces::ForceSystem;
pub use integrate::{Euler, IntegrationMethod};
pub use motion::MotionSystem;

use std::any::Any;

use crate::ecs::World;
use crate::error::Result;

/// Per-tick invocation context handed to every system.
pub struct TickContext {
    /// Completed-tick counter at the time of this run (1-based).
    pub tick: u64,
    /// Timestep in seconds, used as given by the caller.
    pub dt: f64,
}

/// A stage of the simulation pipeline.
///
/// Systems run in a fixed order once per tick, single-threaded, over the
/// world they are handed. `as_any_mut` allows the engine to reach a system
/// after it has been boxed into the pipeline (e.g. the gravity toggle).
pub trait System {
    fn name(&self) -> &'static str;
    fn run(&mut self, ctx: &TickContext, world: &mut World) -> Result<()>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
