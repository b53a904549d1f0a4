//! Motion policies.
//!
//! A policy is the rule governing how pooled entity positions evolve per
//! frame. Advancement is a deterministic function of (current state,
//! elapsed time, tick length, injected generator): the same seed replays
//! the same trajectory.

use crate::param::{self, ParamSet};
use crate::pool::EntityPool;
use crate::rng::SeededRng;
use crate::time::TICK_SECS;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// What happens when a random walker crosses its boundary radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryRule {
    /// Negate velocity and clamp position back onto the boundary.
    Reflect,
    /// Reset the entity to its home point.
    Respawn,
}

/// Where attractor-seeking entities converge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttractorTarget {
    /// A pool slot, usually one of the fixed scene bodies.
    Slot(usize),
    /// A fixed point in world space.
    Point(Vec3),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionPolicy {
    /// Small random displacement each step, confined to a sphere of
    /// `radius` around each entity's home. No step displaces an entity
    /// by more than `step`.
    RandomWalk {
        step: f32,
        radius: f32,
        boundary: BoundaryRule,
    },
    /// Closed-form orbit about each entity's home: a circle of `amplitude`
    /// in the XZ plane plus a vertical bob, phase-shifted per entity.
    /// `frequency` is in radians per second.
    Oscillate { amplitude: f32, frequency: f32 },
    /// Blend every position toward the target by `blend` per tick.
    SeekAttractor { target: AttractorTarget, blend: f32 },
    /// Entities live for a bounded time, then respawn at `source` with a
    /// fresh random velocity of magnitude `speed`.
    Emission {
        source: Vec3,
        speed: f32,
        lifetime: f32,
    },
}

/// Closed-form oscillator position. Exposed so tests and the simulator
/// agree on the exact curve.
pub fn oscillator_position(home: Vec3, amplitude: f32, angle: f32) -> Vec3 {
    home + Vec3::new(
        amplitude * angle.cos(),
        0.25 * amplitude * (2.0 * angle).sin(),
        amplitude * angle.sin(),
    )
}

/// Stop a step at the boundary sphere instead of letting it overshoot.
///
/// Returns the point where the segment `prev -> prev + delta` crosses the
/// sphere of `radius` around `home`. Displacement never exceeds `delta`.
fn stop_at_boundary(prev: Vec3, delta: Vec3, home: Vec3, radius: f32) -> Vec3 {
    let p = prev - home;
    let a = delta.length_squared();
    if a <= f32::EPSILON {
        return prev;
    }
    let b = p.dot(delta);
    let c = p.length_squared() - radius * radius;
    let disc = b * b - a * c;
    if disc < 0.0 {
        // Start point already outside (degenerate spawn); pull it in radially.
        return home + p.clamp_length_max(radius);
    }
    let t = ((-b + disc.sqrt()) / a).clamp(0.0, 1.0);
    prev + delta * t
}

/// Advance every slot from `fixed` onward by one step.
///
/// Slots below `fixed` are the scene's fixed bodies and are exempt.
/// `elapsed` is total simulated seconds, `dt` the tick length; both are
/// already speed-scaled by the caller.
pub fn advance(
    pool: &mut EntityPool,
    fixed: usize,
    policy: &MotionPolicy,
    elapsed: f32,
    dt: f32,
    rng: &mut SeededRng,
) {
    match *policy {
        MotionPolicy::RandomWalk {
            step,
            radius,
            boundary,
        } => {
            // `dt` arrives speed-scaled; scaling the jitter by the same
            // ratio keeps a zeroed speed slider an actual freeze. The
            // clamp still caps any one step at `step`.
            let pace = dt / TICK_SECS;
            for entity in pool.slots_mut().iter_mut().skip(fixed) {
                let drift = entity.velocity.unwrap_or(Vec3::ZERO) * dt;
                let jitter = rng.in_sphere(step) * pace;
                let delta = (drift + jitter).clamp_length_max(step);
                let mut next = entity.position + delta;
                if dt > 0.0 {
                    entity.velocity = Some(delta / dt);
                }

                if (next - entity.home).length() > radius {
                    match boundary {
                        BoundaryRule::Reflect => {
                            entity.velocity = entity.velocity.map(|v| -v);
                            next = stop_at_boundary(entity.position, delta, entity.home, radius);
                        }
                        BoundaryRule::Respawn => {
                            next = entity.home;
                            entity.velocity = None;
                        }
                    }
                }
                entity.position = next;
                entity.age += dt;
            }
        }
        MotionPolicy::Oscillate {
            amplitude,
            frequency,
        } => {
            for entity in pool.slots_mut().iter_mut().skip(fixed) {
                let angle = frequency * elapsed + entity.phase;
                entity.position = oscillator_position(entity.home, amplitude, angle);
                entity.age += dt;
            }
        }
        MotionPolicy::SeekAttractor { target, blend } => {
            let goal = match target {
                AttractorTarget::Point(p) => p,
                AttractorTarget::Slot(slot) => match pool.get(slot) {
                    Ok(e) => e.position,
                    Err(err) => {
                        tracing::trace!(%err, "attractor slot unavailable, converging on origin");
                        Vec3::ZERO
                    }
                },
            };
            let blend = blend.clamp(0.0, 1.0);
            for entity in pool.slots_mut().iter_mut().skip(fixed) {
                entity.position = entity.position.lerp(goal, blend);
                entity.age += dt;
            }
        }
        MotionPolicy::Emission {
            source,
            speed,
            lifetime,
        } => {
            for entity in pool.slots_mut().iter_mut().skip(fixed) {
                entity.age += dt;
                if entity.expired() {
                    let velocity = rng.unit_vec3() * speed;
                    entity.lifetime = lifetime;
                    entity.respawn(source, Some(velocity));
                    continue;
                }
                let velocity = entity.velocity.unwrap_or(Vec3::ZERO);
                entity.position += velocity * dt;
            }
        }
    }
}

/// Give every non-fixed slot a fresh random velocity.
///
/// Used when the measurement interaction releases a collapsed pool, so no
/// entity is left with the zero velocity the convergence gave it.
pub fn scatter_velocities(pool: &mut EntityPool, fixed: usize, speed: f32, rng: &mut SeededRng) {
    for entity in pool.slots_mut().iter_mut().skip(fixed) {
        entity.velocity = Some(rng.unit_vec3() * speed);
    }
}

/// Owns one visualization's pool, policy, and generator, and applies the
/// per-frame step in order.
#[derive(Debug)]
pub struct Simulator {
    pool: EntityPool,
    policy: MotionPolicy,
    fixed: usize,
    elapsed: f32,
    rng: SeededRng,
}

impl Simulator {
    pub fn new(pool: EntityPool, policy: MotionPolicy, seed: u64) -> Self {
        Self {
            pool,
            policy,
            fixed: 0,
            elapsed: 0.0,
            rng: SeededRng::new(seed),
        }
    }

    /// Exempt the first `fixed` slots (the scene's bodies) from the policy.
    pub fn with_fixed(mut self, fixed: usize) -> Self {
        self.fixed = fixed;
        self
    }

    /// One simulation step. `dt` is real tick seconds; the `speed`
    /// parameter scales it before any policy math runs.
    pub fn step(&mut self, dt: f32, params: &ParamSet) {
        let speed = params.scalar(param::SPEED, 1.0).max(0.0);
        let scaled = dt * speed;
        self.elapsed += scaled;
        advance(
            &mut self.pool,
            self.fixed,
            &self.policy,
            self.elapsed,
            scaled,
            &mut self.rng,
        );
    }

    /// Swap in a new policy, returning the previous one.
    pub fn swap_policy(&mut self, policy: MotionPolicy) -> MotionPolicy {
        std::mem::replace(&mut self.policy, policy)
    }

    pub fn policy(&self) -> &MotionPolicy {
        &self.policy
    }

    pub fn pool(&self) -> &EntityPool {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut EntityPool {
        &mut self.pool
    }

    pub fn fixed(&self) -> usize {
        self.fixed
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Re-randomize non-fixed velocities, e.g. after a collapse releases.
    pub fn scatter(&mut self, speed: f32) {
        scatter_velocities(&mut self.pool, self.fixed, speed, &mut self.rng);
    }
}
