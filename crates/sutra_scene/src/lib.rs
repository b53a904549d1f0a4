//! Sutra Scene Layer
//!
//! Declarative verse scenes and their runtime shape:
//! - Scene descriptors (palette, bodies, particle cloud, interaction)
//! - Scene graph construction (camera, lighting, seeded entity pool)
//! - The animation lifecycle contract every visualization implements
//! - The interaction controller with the measurement state machine
//! - The registry mapping animation ids to descriptors

pub mod camera;
pub mod descriptor;
pub mod graph;
pub mod interaction;
pub mod lifecycle;
pub mod registry;

pub use camera::Camera;
pub use descriptor::{
    BodyDescriptor, BodyShape, CameraPlacement, CloudDescriptor, InteractionKind, Palette,
    SceneDescriptor, SceneError,
};
pub use graph::{Lighting, SceneBuilder, SceneGraph, Tether};
pub use interaction::{InputEvent, InteractionController, MeasurementState};
pub use lifecycle::{Animation, AnimationHandle, HandlePhase, LifecycleError};
pub use registry::AnimationRegistry;
