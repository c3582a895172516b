use crate::components::Particle;

/// Numerical scheme advancing one particle over one timestep.
///
/// Swappable at engine construction; adding a scheme (Verlet, RK4) means
/// implementing this trait, callers stay unchanged.
pub trait IntegrationMethod {
    fn name(&self) -> &'static str;
    fn step(&self, particle: &mut Particle, dt: f64);
}

/// Euler integration with an averaged-velocity position update:
///
/// ```text
/// v_new = v_old + a * dt
/// x_new = x_old + v_old * dt + a * dt^2 / 2
/// ```
///
/// The position term equals `avg(v_old, v_new) * dt`.
#[derive(Debug, Default)]
pub struct Euler;

impl IntegrationMethod for Euler {
    fn name(&self) -> &'static str {
        "euler"
    }

    fn step(&self, particle: &mut Particle, dt: f64) {
        // The position update needs the pre-step velocity; writing the new
        // velocity first and reusing it would count the acceleration twice.
        let v_old = particle.velocity();
        let acceleration = particle.acceleration();

        let v_new = v_old + acceleration * dt;
        particle.set_position(particle.position() + v_old * dt + acceleration * (0.5 * dt * dt));
        particle.set_velocity(v_new * particle.damping());
    }
}
