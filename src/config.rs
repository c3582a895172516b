use std::fs;
use std::path::{Path, PathBuf};

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;

use crate::components::{CircleBound, Particle};
use crate::ecs::World;
use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::math::Vec2;
use crate::systems::Boundary;

fn default_ticks() -> u64 {
    600
}

fn default_dt_seconds() -> f64 {
    1.0 / 60.0
}

fn default_mass() -> f64 {
    1.0
}

fn default_damping() -> f64 {
    1.0
}

fn default_restitution() -> f64 {
    1.0
}

fn default_gravity_y() -> f64 {
    -9.81
}

fn default_gravity_enabled() -> bool {
    true
}

/// Declarative description of a simulation run: box size, gravity,
/// timestep, and the initial particles (listed explicitly, scattered
/// randomly, or both).
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "default_ticks")]
    pub ticks: u64,
    #[serde(default = "default_dt_seconds")]
    pub dt_seconds: f64,
    pub bounds: BoundsConfig,
    #[serde(default)]
    pub gravity: GravityConfig,
    #[serde(default)]
    pub particles: Vec<ParticleConfig>,
    #[serde(default)]
    pub scatter: Option<ScatterConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BoundsConfig {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GravityConfig {
    #[serde(default)]
    pub x: f64,
    #[serde(default = "default_gravity_y")]
    pub y: f64,
    #[serde(default = "default_gravity_enabled")]
    pub enabled: bool,
}

impl Default for GravityConfig {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: default_gravity_y(),
            enabled: default_gravity_enabled(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParticleConfig {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub vx: f64,
    #[serde(default)]
    pub vy: f64,
    #[serde(default = "default_mass")]
    pub mass: f64,
    pub radius: f64,
    #[serde(default = "default_damping")]
    pub damping: f64,
    #[serde(default = "default_restitution")]
    pub restitution: f64,
    #[serde(default)]
    pub fixed: bool,
}

/// Randomly placed extra particles, reproducible from the scenario seed.
#[derive(Debug, Clone, Deserialize)]
pub struct ScatterConfig {
    pub count: usize,
    pub radius: f64,
    #[serde(default = "default_mass")]
    pub mass: f64,
    pub max_speed: f64,
    #[serde(default = "default_restitution")]
    pub restitution: f64,
}

/// Loads scenario files relative to a base directory.
pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)?;
        let scenario: Scenario = serde_yaml::from_str(&data)
            .map_err(|err| Error::Scenario(format!("failed to parse {}: {err}", path.display())))?;
        scenario.validate()?;
        Ok(scenario)
    }
}

impl Scenario {
    pub fn from_str(text: &str) -> Result<Self> {
        let scenario: Scenario = serde_yaml::from_str(text)
            .map_err(|err| Error::Scenario(format!("failed to parse scenario: {err}")))?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.bounds.width.is_finite()
            || !self.bounds.height.is_finite()
            || self.bounds.width <= 0.0
            || self.bounds.height <= 0.0
        {
            return Err(Error::Scenario(
                "bounds must have positive finite width and height".into(),
            ));
        }
        if !self.dt_seconds.is_finite() || self.dt_seconds < 0.0 {
            return Err(Error::Scenario(
                "dt_seconds must be finite and non-negative".into(),
            ));
        }

        let scatter_count = self.scatter.as_ref().map(|s| s.count).unwrap_or(0);
        if self.particles.is_empty() && scatter_count == 0 {
            return Err(Error::Scenario(
                "scenario must define at least one particle".into(),
            ));
        }
        if let Some(scatter) = &self.scatter {
            if scatter.count == 0 {
                return Err(Error::Scenario("scatter count must be greater than zero".into()));
            }
            let fits = 2.0 * scatter.radius < self.bounds.width.min(self.bounds.height);
            if !fits {
                return Err(Error::Scenario(
                    "scatter radius does not fit inside the bounds".into(),
                ));
            }
        }
        Ok(())
    }

    /// Build a ready-to-run engine: world populated from the particle list
    /// and scatter block, boundary and gravity wired in. Particle
    /// invariants are enforced by component construction, so an invalid
    /// entry surfaces as [`Error::InvalidParam`].
    pub fn build_engine(&self) -> Result<Engine> {
        self.validate()?;

        let mut world = World::new();
        for config in &self.particles {
            let particle = if config.fixed {
                Particle::fixed(Vec2::new(config.x, config.y))?
            } else {
                Particle::new(
                    Vec2::new(config.x, config.y),
                    Vec2::new(config.vx, config.vy),
                    config.mass,
                )?
            };
            let particle = particle
                .with_damping(config.damping)?
                .with_restitution(config.restitution)?;
            spawn_ball(&mut world, particle, config.radius)?;
        }

        if let Some(scatter) = &self.scatter {
            let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
            for _ in 0..scatter.count {
                let r = scatter.radius;
                let position = Vec2::new(
                    rng.gen_range(r..=self.bounds.width - r),
                    rng.gen_range(r..=self.bounds.height - r),
                );
                let velocity = Vec2::new(
                    rng.gen_range(-scatter.max_speed..=scatter.max_speed),
                    rng.gen_range(-scatter.max_speed..=scatter.max_speed),
                );
                let particle = Particle::new(position, velocity, scatter.mass)?
                    .with_restitution(scatter.restitution)?;
                spawn_ball(&mut world, particle, r)?;
            }
        }

        let boundary = Boundary::from_size(self.bounds.width, self.bounds.height)?;
        Ok(Engine::builder(world, boundary)
            .gravity(Vec2::new(self.gravity.x, self.gravity.y))
            .gravity_on(self.gravity.enabled)
            .build())
    }

    pub fn ticks(&self, override_ticks: Option<u64>) -> u64 {
        override_ticks.unwrap_or(self.ticks)
    }
}

fn spawn_ball(world: &mut World, particle: Particle, radius: f64) -> Result<()> {
    let entity = world.create_entity();
    world.add_component(entity, particle)?;
    world.add_component(entity, CircleBound::new(radius)?)?;
    Ok(())
}
