//! Sutra Render Layer
//!
//! GPU-facing half of the engine:
//! - wgpu surface/device/pipeline management per visualization
//! - Instanced particle and tether-beam buffer upload
//! - Frame-loop cancellation via generation tokens
//! - Resource tracking with idempotent, exactly-once release

pub mod context;
pub mod frame;
pub mod instances;
pub mod resources;

pub use wgpu;
pub use winit;

pub use context::{RenderContext, RenderError, RenderStats};
pub use frame::{FrameScheduler, FrameToken};
pub use instances::{FrameData, ParticleInstance, TetherVertex};
pub use resources::{GpuResource, ResourceSlot, ResourceTracker};
