//! Scene graph construction.
//!
//! Building is pure: no window, no GPU, no side effects. Mounting the
//! result onto a rendering surface is the render layer's job, which
//! keeps scene construction testable headlessly.

use crate::camera::Camera;
use crate::descriptor::{InteractionKind, Palette, SceneDescriptor, SceneError};
use glam::Vec3;
use sutra_core::entity::VisualEntity;
use sutra_core::param::{self, ParamSet};
use sutra_core::policy::{AttractorTarget, MotionPolicy, Simulator};
use sutra_core::pool::EntityPool;
use sutra_core::rng::SeededRng;

/// Non-owning link between two pool slots, rendered as a beam. Slot
/// indices are stable for the pool's lifetime, so a tether can never
/// outlive its endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tether {
    pub a: usize,
    pub b: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    pub direction: Vec3,
    pub ambient: f32,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            direction: Vec3::new(-0.4, -1.0, -0.3).normalize(),
            ambient: 0.35,
        }
    }
}

/// One verse's constructed scene: camera, lighting, simulated pool,
/// tethers, and the parameter set the interaction layer writes.
#[derive(Debug)]
pub struct SceneGraph {
    pub name: String,
    pub palette: Palette,
    pub camera: Camera,
    pub lighting: Lighting,
    pub params: ParamSet,
    simulator: Simulator,
    tethers: Vec<Tether>,
    body_roles: Vec<String>,
}

impl SceneGraph {
    /// One simulation step. Callers draw only after this returns, which
    /// keeps step-then-render ordering inside a frame.
    pub fn step(&mut self, dt: f32) {
        self.simulator.step(dt, &self.params);
    }

    pub fn simulator(&self) -> &Simulator {
        &self.simulator
    }

    pub fn simulator_mut(&mut self) -> &mut Simulator {
        &mut self.simulator
    }

    /// Split borrow for the interaction controller, which writes params
    /// and swaps policies in one call.
    pub fn interaction_targets(&mut self) -> (&mut Simulator, &mut ParamSet) {
        (&mut self.simulator, &mut self.params)
    }

    pub fn entities(&self) -> &[VisualEntity] {
        self.simulator.pool().slots()
    }

    pub fn tethers(&self) -> &[Tether] {
        &self.tethers
    }

    pub fn body_roles(&self) -> &[String] {
        &self.body_roles
    }

    /// Current world-space segments for every tether, recomputed from
    /// the endpoints' positions each frame.
    pub fn tether_segments(&self) -> Vec<(Vec3, Vec3)> {
        let pool = self.simulator.pool();
        self.tethers
            .iter()
            .filter_map(|t| {
                let a = pool.get(t.a).ok()?.position;
                let b = pool.get(t.b).ok()?.position;
                Some((a, b))
            })
            .collect()
    }
}

/// Builds a `SceneGraph` from a descriptor and a viewport size.
pub struct SceneBuilder {
    descriptor: SceneDescriptor,
}

impl SceneBuilder {
    pub fn new(descriptor: SceneDescriptor) -> Self {
        Self { descriptor }
    }

    pub fn descriptor(&self) -> &SceneDescriptor {
        &self.descriptor
    }

    pub fn build(&self, width: u32, height: u32) -> Result<SceneGraph, SceneError> {
        let desc = &self.descriptor;
        let slot_count = desc.slot_count();
        self.validate(slot_count)?;

        let camera = Camera::new(&desc.camera, width, height);
        let mut pool = EntityPool::with_capacity(slot_count.max(1));
        let mut rng = SeededRng::new(desc.cloud.seed);

        // Fixed bodies occupy the leading slots so tethers and attractor
        // targets can address them by small stable indices.
        let mut body_roles = Vec::with_capacity(desc.bodies.len());
        for body in &desc.bodies {
            pool.spawn(
                VisualEntity::at(body.position)
                    .with_scale(body.shape.extent())
                    .with_color(body.color)
                    .with_intensity(body.intensity),
            );
            body_roles.push(body.role.clone());
        }

        for _ in 0..desc.cloud.count {
            pool.spawn(Self::cloud_entity(desc, &mut rng));
        }

        let simulator = Simulator::new(pool, desc.cloud.policy, desc.cloud.seed)
            .with_fixed(desc.bodies.len());

        let mut params = ParamSet::new();
        params.set_scalar(param::SPEED, 1.0);
        params.set_flag(param::COLLAPSED, false);

        Ok(SceneGraph {
            name: desc.name.clone(),
            palette: desc.palette,
            camera,
            lighting: Lighting::default(),
            params,
            simulator,
            tethers: desc.tethers.iter().map(|&[a, b]| Tether { a, b }).collect(),
            body_roles,
        })
    }

    fn validate(&self, slot_count: usize) -> Result<(), SceneError> {
        for &[a, b] in &self.descriptor.tethers {
            for slot in [a, b] {
                if slot >= slot_count {
                    return Err(SceneError::TetherOutOfRange {
                        slot,
                        len: slot_count,
                    });
                }
            }
        }
        if let InteractionKind::Measurement {
            target: AttractorTarget::Slot(slot),
            ..
        } = self.descriptor.interaction
        {
            if slot >= slot_count {
                return Err(SceneError::AttractorOutOfRange {
                    slot,
                    len: slot_count,
                });
            }
        }
        if let MotionPolicy::SeekAttractor {
            target: AttractorTarget::Slot(slot),
            ..
        } = self.descriptor.cloud.policy
        {
            if slot >= slot_count {
                return Err(SceneError::AttractorOutOfRange {
                    slot,
                    len: slot_count,
                });
            }
        }
        Ok(())
    }

    fn cloud_entity(desc: &SceneDescriptor, rng: &mut SeededRng) -> VisualEntity {
        let cloud = &desc.cloud;
        let position = cloud.center + rng.in_sphere(cloud.spawn_radius);
        let color = desc
            .palette
            .primary
            .lerp(desc.palette.accent, rng.next_f32());
        let scale = cloud.particle_scale * rng.range_f32(0.75, 1.25);
        let phase = rng.next_f32() * std::f32::consts::TAU;

        let entity = VisualEntity::at(position)
            .with_color(color)
            .with_scale(scale)
            .with_phase(phase)
            .with_intensity(rng.range_f32(0.7, 1.0));

        // Spawn shape depends on the governing policy.
        match cloud.policy {
            MotionPolicy::Oscillate { .. } => {
                // Oscillators orbit their own base point.
                entity
            }
            MotionPolicy::Emission {
                source,
                speed,
                lifetime,
            } => VisualEntity {
                position: source,
                home: source,
                ..entity
            }
            .with_velocity(rng.unit_vec3() * speed)
            .with_lifetime(lifetime)
            // Stagger ages so the stream flows instead of pulsing.
            .with_age(rng.next_f32() * lifetime),
            _ => {
                // Walkers and seekers share the cloud's center as home so
                // the boundary sphere and respawn point are communal.
                entity.with_home(cloud.center)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{BodyDescriptor, BodyShape, CameraPlacement, CloudDescriptor};
    use sutra_core::policy::BoundaryRule;

    fn descriptor() -> SceneDescriptor {
        SceneDescriptor {
            name: "pair".to_string(),
            palette: Palette::default(),
            camera: CameraPlacement::default(),
            bodies: vec![
                BodyDescriptor {
                    role: "left".to_string(),
                    shape: BodyShape::Sphere { radius: 0.25 },
                    position: Vec3::new(-1.0, 0.0, 0.0),
                    color: Vec3::ONE,
                    intensity: 1.0,
                },
                BodyDescriptor {
                    role: "right".to_string(),
                    shape: BodyShape::Sphere { radius: 0.25 },
                    position: Vec3::new(1.0, 0.0, 0.0),
                    color: Vec3::ONE,
                    intensity: 1.0,
                },
            ],
            cloud: CloudDescriptor {
                count: 16,
                center: Vec3::ZERO,
                spawn_radius: 1.0,
                policy: MotionPolicy::RandomWalk {
                    step: 0.02,
                    radius: 1.5,
                    boundary: BoundaryRule::Reflect,
                },
                seed: 42,
                particle_scale: 0.04,
            },
            tethers: vec![[0, 1]],
            interaction: InteractionKind::None,
        }
    }

    #[test]
    fn test_build_places_bodies_before_cloud() {
        let graph = SceneBuilder::new(descriptor()).build(800, 600).unwrap();
        assert_eq!(graph.entities().len(), 18);
        assert_eq!(graph.simulator().fixed(), 2);
        assert_eq!(graph.body_roles(), &["left", "right"]);
        assert_eq!(graph.entities()[0].position, Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_build_is_deterministic_for_a_seed() {
        let a = SceneBuilder::new(descriptor()).build(800, 600).unwrap();
        let b = SceneBuilder::new(descriptor()).build(800, 600).unwrap();
        assert_eq!(a.entities(), b.entities());
    }

    #[test]
    fn test_tether_segments_track_positions() {
        let mut graph = SceneBuilder::new(descriptor()).build(800, 600).unwrap();
        let before = graph.tether_segments();
        assert_eq!(before.len(), 1);
        assert_eq!(before[0].0, Vec3::new(-1.0, 0.0, 0.0));

        // Move an endpoint; the segment follows on the next query.
        graph
            .simulator_mut()
            .pool_mut()
            .get_mut(0)
            .unwrap()
            .position = Vec3::new(-2.0, 0.5, 0.0);
        let after = graph.tether_segments();
        assert_eq!(after[0].0, Vec3::new(-2.0, 0.5, 0.0));
    }

    #[test]
    fn test_tether_out_of_range_is_rejected() {
        let mut desc = descriptor();
        desc.tethers = vec![[0, 99]];
        let err = SceneBuilder::new(desc).build(800, 600).unwrap_err();
        assert!(matches!(
            err,
            SceneError::TetherOutOfRange { slot: 99, len: 18 }
        ));
    }

    #[test]
    fn test_attractor_slot_is_validated() {
        let mut desc = descriptor();
        desc.interaction = InteractionKind::Measurement {
            target: AttractorTarget::Slot(50),
            blend: 0.1,
            scatter_speed: 0.5,
        };
        let err = SceneBuilder::new(desc).build(800, 600).unwrap_err();
        assert!(matches!(err, SceneError::AttractorOutOfRange { .. }));
    }

    #[test]
    fn test_zero_viewport_builds_anyway() {
        let graph = SceneBuilder::new(descriptor()).build(0, 0).unwrap();
        assert_eq!(graph.camera.aspect(), 1.0);
    }

    #[test]
    fn test_emission_cloud_spawns_at_source_with_staggered_ages() {
        let mut desc = descriptor();
        desc.bodies.clear();
        desc.tethers.clear();
        let source = Vec3::new(0.0, -1.0, 0.0);
        desc.cloud.policy = MotionPolicy::Emission {
            source,
            speed: 1.0,
            lifetime: 2.0,
        };
        let graph = SceneBuilder::new(desc).build(800, 600).unwrap();
        let ages: Vec<f32> = graph.entities().iter().map(|e| e.age).collect();
        assert!(graph.entities().iter().all(|e| e.position == source));
        assert!(graph.entities().iter().all(|e| e.velocity.is_some()));
        // Not all identical, or the stream would pulse.
        assert!(ages.iter().any(|&a| (a - ages[0]).abs() > 1.0e-3));
    }
}
