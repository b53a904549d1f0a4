//! Animation registry.
//!
//! Maps animation ids (derived from chapter and verse numbers) to scene
//! descriptors. A missing id is not an error: the page degrades to
//! text-only and the caller logs it.

use crate::descriptor::{
    BodyDescriptor, BodyShape, CloudDescriptor, InteractionKind, Palette, SceneDescriptor,
};
use glam::Vec3;
use std::collections::HashMap;
use std::path::Path;
use sutra_core::policy::{AttractorTarget, BoundaryRule, MotionPolicy};

pub struct AnimationRegistry {
    descriptors: HashMap<String, SceneDescriptor>,
}

impl AnimationRegistry {
    pub fn new() -> Self {
        Self {
            descriptors: HashMap::new(),
        }
    }

    /// Registry pre-populated with the built-in verse scenes.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        for (id, descriptor) in builtin_scenes() {
            registry.register(id, descriptor);
        }
        registry
    }

    pub fn register(&mut self, id: impl Into<String>, descriptor: SceneDescriptor) {
        self.descriptors.insert(id.into(), descriptor);
    }

    pub fn descriptor(&self, id: &str) -> Option<&SceneDescriptor> {
        self.descriptors.get(id)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Merge `scene-<id>.json` files from a directory.
    ///
    /// Unparseable files are reported and skipped; one bad descriptor
    /// must not take down every other verse's animation. Returns how
    /// many descriptors were loaded.
    pub fn load_scene_dir(&mut self, dir: &Path) -> usize {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(dir = %dir.display(), %err, "scene directory unreadable");
                return 0;
            }
        };

        let mut loaded = 0;
        for entry in entries.flatten() {
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(id) = name
                .strip_prefix("scene-")
                .and_then(|rest| rest.strip_suffix(".json"))
            else {
                continue;
            };
            match SceneDescriptor::load(&path) {
                Ok(descriptor) => {
                    self.register(id, descriptor);
                    loaded += 1;
                }
                Err(err) => {
                    tracing::warn!(file = %path.display(), %err, "skipping bad scene descriptor");
                }
            }
        }
        loaded
    }
}

impl Default for AnimationRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

fn builtin_scenes() -> Vec<(&'static str, SceneDescriptor)> {
    vec![
        // Chapter 1, verse 1: a superposed cloud the viewer can measure.
        (
            "verse-1-1",
            SceneDescriptor {
                name: "nameless-field".to_string(),
                palette: Palette::default(),
                camera: Default::default(),
                bodies: vec![],
                cloud: CloudDescriptor {
                    count: 220,
                    center: Vec3::ZERO,
                    spawn_radius: 1.2,
                    policy: MotionPolicy::RandomWalk {
                        step: 0.015,
                        radius: 1.4,
                        boundary: BoundaryRule::Reflect,
                    },
                    seed: 0x5EED_0101,
                    particle_scale: 0.035,
                },
                tethers: vec![],
                interaction: InteractionKind::Measurement {
                    target: AttractorTarget::Point(Vec3::ZERO),
                    blend: 0.08,
                    scatter_speed: 0.6,
                },
            },
        ),
        // Chapter 1, verse 2: an entangled pair joined by a beam.
        (
            "verse-1-2",
            SceneDescriptor {
                name: "two-born-together".to_string(),
                palette: Palette {
                    background: Vec3::new(0.03, 0.02, 0.06),
                    primary: Vec3::new(0.7, 0.55, 1.0),
                    accent: Vec3::new(0.4, 0.9, 0.9),
                },
                camera: Default::default(),
                bodies: vec![
                    BodyDescriptor {
                        role: "left-particle".to_string(),
                        shape: BodyShape::Sphere { radius: 0.22 },
                        position: Vec3::new(-1.3, 0.0, 0.0),
                        color: Vec3::new(0.7, 0.55, 1.0),
                        intensity: 1.0,
                    },
                    BodyDescriptor {
                        role: "right-particle".to_string(),
                        shape: BodyShape::Sphere { radius: 0.22 },
                        position: Vec3::new(1.3, 0.0, 0.0),
                        color: Vec3::new(0.4, 0.9, 0.9),
                        intensity: 1.0,
                    },
                ],
                cloud: CloudDescriptor {
                    count: 120,
                    center: Vec3::ZERO,
                    spawn_radius: 1.6,
                    policy: MotionPolicy::RandomWalk {
                        step: 0.012,
                        radius: 1.8,
                        boundary: BoundaryRule::Reflect,
                    },
                    seed: 0x5EED_0102,
                    particle_scale: 0.03,
                },
                tethers: vec![[0, 1]],
                interaction: InteractionKind::Measurement {
                    target: AttractorTarget::Slot(0),
                    blend: 0.1,
                    scatter_speed: 0.5,
                },
            },
        ),
        // Chapter 1, verse 3: an oscillating lattice with a tempo slider.
        (
            "verse-1-3",
            SceneDescriptor {
                name: "breathing-lattice".to_string(),
                palette: Palette {
                    background: Vec3::new(0.01, 0.03, 0.04),
                    primary: Vec3::new(0.4, 0.95, 0.7),
                    accent: Vec3::new(0.9, 0.95, 0.5),
                },
                camera: Default::default(),
                bodies: vec![],
                cloud: CloudDescriptor {
                    count: 260,
                    center: Vec3::ZERO,
                    spawn_radius: 1.5,
                    policy: MotionPolicy::Oscillate {
                        amplitude: 0.25,
                        frequency: 1.6,
                    },
                    seed: 0x5EED_0103,
                    particle_scale: 0.03,
                },
                tethers: vec![],
                interaction: InteractionKind::SpeedSlider { min: 0.2, max: 3.0 },
            },
        ),
        // Chapter 1, verse 4: emission fountain.
        (
            "verse-1-4",
            SceneDescriptor {
                name: "well-of-becoming".to_string(),
                palette: Palette {
                    background: Vec3::new(0.04, 0.02, 0.02),
                    primary: Vec3::new(1.0, 0.75, 0.4),
                    accent: Vec3::new(1.0, 0.45, 0.55),
                },
                camera: Default::default(),
                bodies: vec![BodyDescriptor {
                    role: "source".to_string(),
                    shape: BodyShape::Halo { radius: 0.3 },
                    position: Vec3::new(0.0, -0.8, 0.0),
                    color: Vec3::new(1.0, 0.9, 0.7),
                    intensity: 1.2,
                }],
                cloud: CloudDescriptor {
                    count: 300,
                    center: Vec3::new(0.0, -0.8, 0.0),
                    spawn_radius: 0.1,
                    policy: MotionPolicy::Emission {
                        source: Vec3::new(0.0, -0.8, 0.0),
                        speed: 0.7,
                        lifetime: 2.5,
                    },
                    seed: 0x5EED_0104,
                    particle_scale: 0.028,
                },
                tethers: vec![],
                interaction: InteractionKind::SpeedSlider { min: 0.2, max: 3.0 },
            },
        ),
        // Chapter 1, verse 5: an observer that draws the current to it.
        (
            "verse-1-5",
            SceneDescriptor {
                name: "watcher-on-the-shore".to_string(),
                palette: Palette::default(),
                camera: Default::default(),
                bodies: vec![BodyDescriptor {
                    role: "observer".to_string(),
                    shape: BodyShape::Sphere { radius: 0.28 },
                    position: Vec3::new(0.0, 0.6, 0.0),
                    color: Vec3::new(1.0, 1.0, 0.9),
                    intensity: 1.1,
                }],
                cloud: CloudDescriptor {
                    count: 180,
                    center: Vec3::new(0.0, -0.2, 0.0),
                    spawn_radius: 1.3,
                    policy: MotionPolicy::RandomWalk {
                        step: 0.01,
                        radius: 1.5,
                        boundary: BoundaryRule::Respawn,
                    },
                    seed: 0x5EED_0105,
                    particle_scale: 0.032,
                },
                tethers: vec![],
                interaction: InteractionKind::Measurement {
                    target: AttractorTarget::Slot(0),
                    blend: 0.06,
                    scatter_speed: 0.45,
                },
            },
        ),
        // Chapter 1, verse 6: orbits with a pace slider.
        (
            "verse-1-6",
            SceneDescriptor {
                name: "orbits-without-rails".to_string(),
                palette: Palette {
                    background: Vec3::new(0.02, 0.02, 0.03),
                    primary: Vec3::new(0.8, 0.85, 1.0),
                    accent: Vec3::new(1.0, 0.8, 0.3),
                },
                camera: Default::default(),
                bodies: vec![BodyDescriptor {
                    role: "center".to_string(),
                    shape: BodyShape::Sphere { radius: 0.35 },
                    position: Vec3::ZERO,
                    color: Vec3::new(1.0, 0.85, 0.5),
                    intensity: 1.3,
                }],
                cloud: CloudDescriptor {
                    count: 140,
                    center: Vec3::ZERO,
                    spawn_radius: 1.4,
                    policy: MotionPolicy::Oscillate {
                        amplitude: 0.9,
                        frequency: 0.9,
                    },
                    seed: 0x5EED_0106,
                    particle_scale: 0.034,
                },
                tethers: vec![],
                interaction: InteractionKind::SpeedSlider { min: 0.2, max: 3.0 },
            },
        ),
        // Chapter 2, verse 2: vacuum flicker around an empty hub.
        // (Chapter 2, verse 1 is deliberately text-only.)
        (
            "verse-2-2",
            SceneDescriptor {
                name: "empty-hub".to_string(),
                palette: Palette {
                    background: Vec3::new(0.02, 0.02, 0.02),
                    primary: Vec3::new(0.75, 0.75, 0.85),
                    accent: Vec3::new(0.55, 0.7, 1.0),
                },
                camera: Default::default(),
                bodies: vec![BodyDescriptor {
                    role: "hub".to_string(),
                    shape: BodyShape::Torus {
                        radius: 0.5,
                        tube: 0.08,
                    },
                    position: Vec3::ZERO,
                    color: Vec3::new(0.9, 0.9, 1.0),
                    intensity: 0.9,
                }],
                cloud: CloudDescriptor {
                    count: 200,
                    center: Vec3::ZERO,
                    spawn_radius: 0.2,
                    policy: MotionPolicy::Emission {
                        source: Vec3::ZERO,
                        speed: 0.5,
                        lifetime: 0.9,
                    },
                    seed: 0x5EED_0202,
                    particle_scale: 0.025,
                },
                tethers: vec![],
                interaction: InteractionKind::SpeedSlider { min: 0.2, max: 3.0 },
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::SceneBuilder;

    #[test]
    fn test_builtin_ids_resolve() {
        let registry = AnimationRegistry::with_builtin();
        assert!(registry.descriptor("verse-1-1").is_some());
        assert!(registry.descriptor("verse-1-6").is_some());
        assert!(registry.descriptor("verse-2-2").is_some());
        // Deliberately text-only.
        assert!(registry.descriptor("verse-2-1").is_none());
    }

    #[test]
    fn test_every_builtin_scene_builds() {
        let registry = AnimationRegistry::with_builtin();
        for (id, _) in builtin_scenes() {
            let descriptor = registry.descriptor(id).unwrap().clone();
            SceneBuilder::new(descriptor)
                .build(640, 480)
                .unwrap_or_else(|err| panic!("{id} failed to build: {err}"));
        }
    }

    #[test]
    fn test_load_scene_dir_merges_and_skips_bad_files() {
        let dir = std::env::temp_dir().join(format!(
            "sutra-registry-test-{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();

        let good = serde_json::to_string(
            AnimationRegistry::with_builtin()
                .descriptor("verse-1-3")
                .unwrap(),
        )
        .unwrap();
        std::fs::write(dir.join("scene-custom-1.json"), good).unwrap();
        std::fs::write(dir.join("scene-broken.json"), "{nope").unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let mut registry = AnimationRegistry::new();
        let loaded = registry.load_scene_dir(&dir);
        assert_eq!(loaded, 1);
        assert!(registry.descriptor("custom-1").is_some());
        assert!(registry.descriptor("broken").is_none());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_dir_loads_nothing() {
        let mut registry = AnimationRegistry::new();
        let loaded = registry.load_scene_dir(Path::new("/nonexistent/sutra-scenes"));
        assert_eq!(loaded, 0);
        assert!(registry.is_empty());
    }
}
