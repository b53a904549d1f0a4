//! Deterministic random numbers.
//!
//! Simulation code takes the generator as an argument so tests can inject
//! a fixed seed and replay identical trajectories.

use glam::Vec3;

/// Seeded linear congruential generator.
#[derive(Debug)]
pub struct SeededRng {
    seed: u64,
    state: u64,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self { seed, state: seed }
    }

    /// The seed this generator was constructed with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Restart the sequence from the original seed.
    pub fn reset(&mut self) {
        self.state = self.seed;
    }

    pub fn next_u32(&mut self) -> u32 {
        // LCG constants
        const A: u64 = 1664525;
        const C: u64 = 1013904223;
        const M: u64 = 1u64 << 32;

        self.state = (A.wrapping_mul(self.state).wrapping_add(C)) % M;
        self.state as u32
    }

    /// Uniform in [0, 1).
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Uniform in [min, max).
    pub fn range_f32(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }

    /// Uniform in [-magnitude, magnitude).
    pub fn signed_f32(&mut self, magnitude: f32) -> f32 {
        self.range_f32(-magnitude, magnitude)
    }

    /// Uniform direction on the unit sphere.
    pub fn unit_vec3(&mut self) -> Vec3 {
        let theta = self.next_f32() * std::f32::consts::TAU;
        let cos_phi = self.signed_f32(1.0);
        let sin_phi = (1.0 - cos_phi * cos_phi).max(0.0).sqrt();
        Vec3::new(sin_phi * theta.cos(), sin_phi * theta.sin(), cos_phi)
    }

    /// Uniform point inside a sphere of the given radius.
    /// Cube root keeps the volume distribution uniform.
    pub fn in_sphere(&mut self, radius: f32) -> Vec3 {
        let dir = self.unit_vec3();
        dir * (self.next_f32().cbrt() * radius)
    }
}
