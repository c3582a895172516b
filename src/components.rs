use crate::ecs::{Entity, World};
use crate::error::{Error, Result};
use crate::math::Vec2;

/// A circular point mass.
///
/// Position, velocity, acceleration and the force accumulator are all
/// mutated in place by the systems each tick; nothing here allocates.
/// Construction validates every invariant up front, so a `Particle` in a
/// world is always well-formed.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    position: Vec2,
    velocity: Vec2,
    acceleration: Vec2,
    force: Vec2,
    mass: f64,
    damping: f64,
    restitution: f64,
    fixed: bool,
}

impl Particle {
    /// Create a dynamic particle.
    ///
    /// Errors with [`Error::InvalidParam`] when `mass` is not finite and
    /// positive, or when position/velocity carry non-finite components.
    pub fn new(position: Vec2, velocity: Vec2, mass: f64) -> Result<Self> {
        if !mass.is_finite() || mass <= 0.0 {
            return Err(Error::InvalidParam("mass must be finite and > 0".into()));
        }
        if !position.x.is_finite() || !position.y.is_finite() {
            return Err(Error::InvalidParam("position must be finite".into()));
        }
        if !velocity.x.is_finite() || !velocity.y.is_finite() {
            return Err(Error::InvalidParam("velocity must be finite".into()));
        }
        Ok(Self {
            position,
            velocity,
            acceleration: Vec2::ZERO,
            force: Vec2::ZERO,
            mass,
            damping: 1.0,
            restitution: 1.0,
            fixed: false,
        })
    }

    /// Create a fixed (immovable) particle. Fixed particles are skipped by
    /// the force and motion passes and act as infinite mass in collisions.
    pub fn fixed(position: Vec2) -> Result<Self> {
        if !position.x.is_finite() || !position.y.is_finite() {
            return Err(Error::InvalidParam("position must be finite".into()));
        }
        Ok(Self {
            position,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            force: Vec2::ZERO,
            mass: f64::INFINITY,
            damping: 1.0,
            restitution: 1.0,
            fixed: true,
        })
    }

    /// Builder-style damping override, validated like the setter.
    pub fn with_damping(mut self, damping: f64) -> Result<Self> {
        self.set_damping(damping)?;
        Ok(self)
    }

    /// Builder-style restitution override, validated like the setter.
    pub fn with_restitution(mut self, restitution: f64) -> Result<Self> {
        self.set_restitution(restitution)?;
        Ok(self)
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn acceleration(&self) -> Vec2 {
        self.acceleration
    }

    pub fn force(&self) -> Vec2 {
        self.force
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Inverse mass; zero for fixed particles, which removes them from
    /// impulse denominators.
    pub fn inverse_mass(&self) -> f64 {
        if self.fixed {
            0.0
        } else {
            1.0 / self.mass
        }
    }

    pub fn damping(&self) -> f64 {
        self.damping
    }

    pub fn restitution(&self) -> f64 {
        self.restitution
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    pub(crate) fn set_acceleration(&mut self, acceleration: Vec2) {
        self.acceleration = acceleration;
    }

    /// Damping factor applied to velocity each integration step;
    /// 1.0 leaves the velocity untouched. Out-of-range values are an
    /// error, never clamped.
    pub fn set_damping(&mut self, damping: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&damping) {
            return Err(Error::InvalidParam("damping must be in [0, 1]".into()));
        }
        self.damping = damping;
        Ok(())
    }

    /// Bounciness: 0 is fully inelastic, 1 fully elastic. Out-of-range
    /// values are an error, never clamped.
    pub fn set_restitution(&mut self, restitution: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&restitution) {
            return Err(Error::InvalidParam("restitution must be in [0, 1]".into()));
        }
        self.restitution = restitution;
        Ok(())
    }

    /// Deposit a force into the accumulator. Consumed and cleared by the
    /// next force pass.
    pub fn apply_force(&mut self, force: Vec2) {
        self.force.add_in_place(force);
    }

    pub(crate) fn clear_forces(&mut self) {
        self.force = Vec2::ZERO;
    }

    /// Kinetic energy 1/2 m |v|^2; zero for fixed particles.
    pub fn kinetic_energy(&self) -> f64 {
        if self.fixed {
            0.0
        } else {
            0.5 * self.mass * self.velocity.magnitude_squared()
        }
    }
}

/// Circular extent of an entity.
///
/// Only the radius is stored; diameter, circumference and area are derived
/// on access so they can never drift out of sync with it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleBound {
    radius: f64,
}

impl CircleBound {
    pub fn new(radius: f64) -> Result<Self> {
        if !radius.is_finite() || radius < 0.0 {
            return Err(Error::InvalidParam("radius must be finite and >= 0".into()));
        }
        Ok(Self { radius })
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn set_radius(&mut self, radius: f64) -> Result<()> {
        if !radius.is_finite() || radius < 0.0 {
            return Err(Error::InvalidParam("radius must be finite and >= 0".into()));
        }
        self.radius = radius;
        Ok(())
    }

    pub fn diameter(&self) -> f64 {
        2.0 * self.radius
    }

    pub fn circumference(&self) -> f64 {
        std::f64::consts::TAU * self.radius
    }

    pub fn area(&self) -> f64 {
        std::f64::consts::PI * self.radius * self.radius
    }
}

/// Semantic grouping of entities by the components they must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// A simulated ball: a [`Particle`] with a [`CircleBound`].
    Ball,
}

impl Category {
    pub fn matches(&self, world: &World, entity: Entity) -> bool {
        match self {
            Category::Ball => {
                world.has_component::<Particle>(entity)
                    && world.has_component::<CircleBound>(entity)
            }
        }
    }
}
