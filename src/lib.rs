pub mod components;
pub mod config;
pub mod ecs;
pub mod engine;
pub mod error;
pub mod math;
pub mod systems;

pub use config::{Scenario, ScenarioLoader};
pub use engine::{Engine, EngineBuilder, TickReport};
pub use error::{Error, Result};
