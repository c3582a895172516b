use std::any::Any;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use log::trace;

use crate::components::{Category, CircleBound, Particle};
use crate::ecs::{Entity, World};
use crate::error::{Error, Result};
use crate::math::Vec2;

use super::{System, TickContext};

/// Axis-aligned rectangular simulation box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boundary {
    min: Vec2,
    max: Vec2,
}

impl Boundary {
    pub fn new(min: Vec2, max: Vec2) -> Result<Self> {
        let finite = min.x.is_finite() && min.y.is_finite() && max.x.is_finite() && max.y.is_finite();
        if !finite || max.x <= min.x || max.y <= min.y {
            return Err(Error::InvalidParam(
                "boundary must be finite with positive extent".into(),
            ));
        }
        Ok(Self { min, max })
    }

    /// Box with its lower-left corner at the origin.
    pub fn from_size(width: f64, height: f64) -> Result<Self> {
        Self::new(Vec2::ZERO, Vec2::new(width, height))
    }

    pub fn min(&self) -> Vec2 {
        self.min
    }

    pub fn max(&self) -> Vec2 {
        self.max
    }
}

/// Unordered pair of colliding entities plus their contact normal.
///
/// Equality and hashing are symmetric over the endpoints, so records built
/// from (A, B) and (B, A) collapse to one entry in a set and each physical
/// contact resolves exactly once per tick. The normal points from `a`
/// toward `b` and is stored un-normalized.
#[derive(Debug, Clone, Copy)]
pub struct ContactPair {
    a: Entity,
    b: Entity,
    normal: Vec2,
}

impl ContactPair {
    pub fn new(a: Entity, b: Entity, normal: Vec2) -> Self {
        Self { a, b, normal }
    }

    pub fn first(&self) -> Entity {
        self.a
    }

    pub fn second(&self) -> Entity {
        self.b
    }

    pub fn normal(&self) -> Vec2 {
        self.normal
    }

    fn endpoints_sorted(&self) -> (Entity, Entity) {
        if self.a <= self.b {
            (self.a, self.b)
        } else {
            (self.b, self.a)
        }
    }
}

impl PartialEq for ContactPair {
    fn eq(&self, other: &Self) -> bool {
        self.endpoints_sorted() == other.endpoints_sorted()
    }
}

impl Eq for ContactPair {}

impl Hash for ContactPair {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.endpoints_sorted().hash(state);
    }
}

/// Boundary reflection, brute-force pair detection, and impulse resolution.
///
/// Detection is O(n^2) over the ball category by design; entity counts stay
/// small and no broad phase sits in front of it.
pub struct CollisionSystem {
    boundary: Boundary,
    // Scratch buffers reused across ticks.
    balls: Vec<Entity>,
    contacts: Vec<ContactPair>,
    seen: HashSet<ContactPair>,
}

impl CollisionSystem {
    pub fn new(boundary: Boundary) -> Self {
        Self {
            boundary,
            balls: Vec::new(),
            contacts: Vec::new(),
            seen: HashSet::new(),
        }
    }

    pub fn boundary(&self) -> Boundary {
        self.boundary
    }

    /// Reflect a particle off the box walls: negate the crossing axis'
    /// velocity and clamp the position so the circle sits exactly inside.
    /// Single-step approximation, no sub-step timing.
    fn bounce_off_walls(&self, particle: &mut Particle, radius: f64) {
        let mut position = particle.position();
        let mut velocity = particle.velocity();
        let mut bounced = false;

        if position.x - radius < self.boundary.min.x {
            position.x = self.boundary.min.x + radius;
            velocity.x = -velocity.x;
            bounced = true;
        } else if position.x + radius > self.boundary.max.x {
            position.x = self.boundary.max.x - radius;
            velocity.x = -velocity.x;
            bounced = true;
        }

        if position.y - radius < self.boundary.min.y {
            position.y = self.boundary.min.y + radius;
            velocity.y = -velocity.y;
            bounced = true;
        } else if position.y + radius > self.boundary.max.y {
            position.y = self.boundary.max.y - radius;
            velocity.y = -velocity.y;
            bounced = true;
        }

        if bounced {
            particle.set_position(position);
            particle.set_velocity(velocity);
        }
    }

    /// Sweep every unordered pair and record overlapping ones. Exact
    /// touching counts as contact. Pairs of two fixed particles are
    /// dropped here, ahead of any inverse-mass arithmetic.
    fn detect_contacts(&mut self, world: &World) {
        self.contacts.clear();
        self.seen.clear();

        for i in 0..self.balls.len() {
            for j in (i + 1)..self.balls.len() {
                let (a, b) = (self.balls[i], self.balls[j]);
                let (Some(pa), Some(pb)) =
                    (world.component::<Particle>(a), world.component::<Particle>(b))
                else {
                    continue;
                };
                if pa.is_fixed() && pb.is_fixed() {
                    continue;
                }
                let (Some(ba), Some(bb)) = (
                    world.component::<CircleBound>(a),
                    world.component::<CircleBound>(b),
                ) else {
                    continue;
                };

                let normal = pb.position() - pa.position();
                if normal.magnitude() <= ba.radius() + bb.radius() {
                    let pair = ContactPair::new(a, b, normal);
                    if self.seen.insert(pair) {
                        self.contacts.push(pair);
                    }
                }
            }
        }
    }

    /// Exchange an impulse along the contact normal, deposited as force.
    ///
    /// The impulse enters both force accumulators and is turned into
    /// acceleration by the next force pass, the same route every other
    /// force takes. Velocities are never written directly here.
    fn resolve(world: &mut World, contact: &ContactPair) {
        let (Some(pa), Some(pb)) = (
            world.component::<Particle>(contact.a),
            world.component::<Particle>(contact.b),
        ) else {
            return;
        };

        let normal = contact.normal.normalized();
        let v_rel = pa.velocity() - pb.velocity();
        let v_normal = v_rel.dot(normal);
        if v_normal < 0.0 {
            // Already separating; an impulse would pull them together.
            return;
        }

        let restitution = (pa.restitution() + pb.restitution()) / 2.0;
        let inverse_mass_sum = pa.inverse_mass() + pb.inverse_mass();
        let impulse = -(1.0 + restitution) * v_normal / inverse_mass_sum;
        let impulse_vec = normal * impulse;

        // Fixed particles never run a force pass, so their accumulator
        // would keep the impulse forever; leave it out.
        if let Some(particle) = world.component_mut::<Particle>(contact.a) {
            if !particle.is_fixed() {
                particle.apply_force(impulse_vec);
            }
        }
        if let Some(particle) = world.component_mut::<Particle>(contact.b) {
            if !particle.is_fixed() {
                particle.apply_force(-impulse_vec);
            }
        }
    }
}

impl System for CollisionSystem {
    fn name(&self) -> &'static str {
        "collision"
    }

    fn run(&mut self, ctx: &TickContext, world: &mut World) -> Result<()> {
        world.entities_of_category_into(Category::Ball, &mut self.balls);

        for index in 0..self.balls.len() {
            let entity = self.balls[index];
            let Some(bound) = world.component::<CircleBound>(entity) else {
                continue;
            };
            let radius = bound.radius();
            let Some(particle) = world.component_mut::<Particle>(entity) else {
                continue;
            };
            if particle.is_fixed() {
                continue;
            }
            self.bounce_off_walls(particle, radius);
        }

        self.detect_contacts(world);
        if !self.contacts.is_empty() {
            trace!("tick {}: resolving {} contacts", ctx.tick, self.contacts.len());
        }
        for contact in &self.contacts {
            Self::resolve(world, contact);
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
