//! Declarative scene descriptors.
//!
//! One descriptor fully parameterizes a verse's visualization: the same
//! engine renders every verse, so a new animation is a new data record,
//! not a new module.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use sutra_core::policy::{AttractorTarget, MotionPolicy};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("tether endpoint {slot} out of range for {len} scene slots")]
    TetherOutOfRange { slot: usize, len: usize },
    #[error("attractor slot {slot} out of range for {len} scene slots")]
    AttractorOutOfRange { slot: usize, len: usize },
    #[error("failed to read scene descriptor: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse scene descriptor: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub background: Vec3,
    pub primary: Vec3,
    pub accent: Vec3,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Vec3::new(0.02, 0.02, 0.05),
            primary: Vec3::new(0.55, 0.75, 1.0),
            accent: Vec3::new(1.0, 0.65, 0.35),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPlacement {
    pub eye: Vec3,
    pub target: Vec3,
    pub fov_y_deg: f32,
}

impl Default for CameraPlacement {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 1.2, 4.0),
            target: Vec3::ZERO,
            fov_y_deg: 55.0,
        }
    }
}

/// Primitive shape of a fixed body. Bodies render as soft billboards;
/// the shape picks the sprite footprint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyShape {
    Sphere { radius: f32 },
    Torus { radius: f32, tube: f32 },
    Halo { radius: f32 },
}

impl BodyShape {
    /// Sprite extent used for rendering.
    pub fn extent(&self) -> f32 {
        match *self {
            BodyShape::Sphere { radius } => radius,
            BodyShape::Torus { radius, tube } => radius + tube,
            BodyShape::Halo { radius } => radius,
        }
    }
}

/// One fixed conceptual body ("observer", "source", one of a pair).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyDescriptor {
    pub role: String,
    pub shape: BodyShape,
    pub position: Vec3,
    pub color: Vec3,
    #[serde(default = "default_intensity")]
    pub intensity: f32,
}

fn default_intensity() -> f32 {
    1.0
}

/// The particle cloud and the policy that governs it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudDescriptor {
    pub count: usize,
    pub center: Vec3,
    pub spawn_radius: f32,
    pub policy: MotionPolicy,
    pub seed: u64,
    #[serde(default = "default_particle_scale")]
    pub particle_scale: f32,
}

fn default_particle_scale() -> f32 {
    0.04
}

/// Which interaction the verse wires up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    /// No interactive element; the scene just runs.
    None,
    /// The measurement metaphor: collapse the cloud onto a target, and
    /// release it again.
    Measurement {
        target: AttractorTarget,
        blend: f32,
        scatter_speed: f32,
    },
    /// A continuous speed control clamped to [min, max].
    SpeedSlider { min: f32, max: f32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDescriptor {
    pub name: String,
    #[serde(default)]
    pub palette: Palette,
    #[serde(default)]
    pub camera: CameraPlacement,
    #[serde(default)]
    pub bodies: Vec<BodyDescriptor>,
    pub cloud: CloudDescriptor,
    /// Pairs of scene slots to join with a rendered beam. Slots index
    /// bodies first, then cloud particles.
    #[serde(default)]
    pub tethers: Vec<[usize; 2]>,
    pub interaction: InteractionKind,
}

impl SceneDescriptor {
    pub fn from_json_str(json: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Total pool slots the scene needs.
    pub fn slot_count(&self) -> usize {
        self.bodies.len() + self.cloud.count
    }
}
