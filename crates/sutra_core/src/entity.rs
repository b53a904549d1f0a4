//! Simulated point and body records.

use glam::Vec3;

/// A single simulated point or body in a visualization.
///
/// Position is always defined. Velocity is absent for kinematic-only
/// entities whose position is a closed-form function of time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualEntity {
    pub position: Vec3,
    pub velocity: Option<Vec3>,
    /// Spawn/base position. Boundary checks and respawns are relative to it.
    pub home: Vec3,
    pub scale: f32,
    pub color: Vec3,
    pub intensity: f32,
    /// Phase offset for oscillatory motion, radians.
    pub phase: f32,
    /// Seconds since (re)spawn.
    pub age: f32,
    /// Seconds before the slot is eligible for recycling.
    /// `f32::INFINITY` disables expiry.
    pub lifetime: f32,
    /// Pool slot of a parent body this entity orbits or is tethered to.
    pub anchor: Option<usize>,
}

impl VisualEntity {
    /// Create an entity at a position, with `home` set to the same point.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            velocity: None,
            home: position,
            scale: 0.05,
            color: Vec3::ONE,
            intensity: 1.0,
            phase: 0.0,
            age: 0.0,
            lifetime: f32::INFINITY,
            anchor: None,
        }
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = Some(velocity);
        self
    }

    pub fn with_home(mut self, home: Vec3) -> Self {
        self.home = home;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_color(mut self, color: Vec3) -> Self {
        self.color = color;
        self
    }

    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn with_phase(mut self, phase: f32) -> Self {
        self.phase = phase;
        self
    }

    pub fn with_lifetime(mut self, lifetime: f32) -> Self {
        self.lifetime = lifetime;
        self
    }

    pub fn with_age(mut self, age: f32) -> Self {
        self.age = age;
        self
    }

    pub fn with_anchor(mut self, slot: usize) -> Self {
        self.anchor = Some(slot);
        self
    }

    /// Whether the slot has outlived its configured lifetime.
    pub fn expired(&self) -> bool {
        self.age >= self.lifetime
    }

    /// Reset the slot in place for reuse. The slot index stays valid;
    /// nothing is deallocated.
    pub fn respawn(&mut self, position: Vec3, velocity: Option<Vec3>) {
        self.position = position;
        self.velocity = velocity;
        self.age = 0.0;
    }
}

impl Default for VisualEntity {
    fn default() -> Self {
        Self::at(Vec3::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_uses_lifetime() {
        let mut e = VisualEntity::at(Vec3::ZERO).with_lifetime(2.0);
        assert!(!e.expired());
        e.age = 2.5;
        assert!(e.expired());
    }

    #[test]
    fn test_infinite_lifetime_never_expires() {
        let mut e = VisualEntity::at(Vec3::ZERO);
        e.age = 1.0e9;
        assert!(!e.expired());
    }

    #[test]
    fn test_respawn_resets_age_and_motion() {
        let mut e = VisualEntity::at(Vec3::ONE)
            .with_velocity(Vec3::X)
            .with_lifetime(1.0);
        e.age = 3.0;
        e.respawn(Vec3::ZERO, Some(Vec3::Y));
        assert_eq!(e.position, Vec3::ZERO);
        assert_eq!(e.velocity, Some(Vec3::Y));
        assert_eq!(e.age, 0.0);
        // Home is the original spawn point, not the respawn point.
        assert_eq!(e.home, Vec3::ONE);
    }
}
