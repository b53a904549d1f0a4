//! GPU-facing frame data.
//!
//! Rebuilt from entity state after every simulation step, then uploaded
//! in one `write_buffer` per stream.

use glam::{Mat4, Vec3};
use sutra_core::entity::VisualEntity;

/// Per-particle instance record, one per pool slot.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleInstance {
    pub position: [f32; 3],
    pub scale: f32,
    pub color: [f32; 3],
    pub intensity: f32,
}

impl ParticleInstance {
    pub fn from_entity(entity: &VisualEntity) -> Self {
        Self {
            position: entity.position.to_array(),
            scale: entity.scale,
            color: entity.color.to_array(),
            intensity: entity.intensity,
        }
    }
}

/// Line-list vertex for tether beams.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TetherVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

/// Everything the render context needs for one draw.
pub struct FrameData {
    pub background: Vec3,
    pub view: Mat4,
    pub proj: Mat4,
    pub light_direction: Vec3,
    pub ambient: f32,
    pub instances: Vec<ParticleInstance>,
    pub tether_vertices: Vec<TetherVertex>,
}

impl FrameData {
    pub fn new(background: Vec3, view: Mat4, proj: Mat4) -> Self {
        Self {
            background,
            view,
            proj,
            light_direction: Vec3::new(-0.4, -1.0, -0.3).normalize(),
            ambient: 0.35,
            instances: Vec::new(),
            tether_vertices: Vec::new(),
        }
    }

    /// Append one instance per entity.
    pub fn push_entities(&mut self, entities: &[VisualEntity]) {
        self.instances
            .extend(entities.iter().map(ParticleInstance::from_entity));
    }

    /// Append two line vertices per tether segment.
    pub fn push_tethers(&mut self, segments: &[(Vec3, Vec3)], color: Vec3) {
        for &(a, b) in segments {
            self.tether_vertices.push(TetherVertex {
                position: a.to_array(),
                color: color.to_array(),
            });
            self.tether_vertices.push(TetherVertex {
                position: b.to_array(),
                color: color.to_array(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_mirrors_entity_state() {
        let entity = VisualEntity::at(Vec3::new(1.0, 2.0, 3.0))
            .with_scale(0.2)
            .with_color(Vec3::new(0.5, 0.6, 0.7))
            .with_intensity(0.9);
        let instance = ParticleInstance::from_entity(&entity);
        assert_eq!(instance.position, [1.0, 2.0, 3.0]);
        assert_eq!(instance.scale, 0.2);
        assert_eq!(instance.color, [0.5, 0.6, 0.7]);
        assert_eq!(instance.intensity, 0.9);
    }

    #[test]
    fn test_tethers_become_vertex_pairs() {
        let mut frame = FrameData::new(Vec3::ZERO, Mat4::IDENTITY, Mat4::IDENTITY);
        frame.push_tethers(
            &[(Vec3::ZERO, Vec3::X), (Vec3::Y, Vec3::Z)],
            Vec3::ONE,
        );
        assert_eq!(frame.tether_vertices.len(), 4);
        assert_eq!(frame.tether_vertices[1].position, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_instance_layout_is_tightly_packed() {
        // The shader's vertex layout depends on this exact stride.
        assert_eq!(std::mem::size_of::<ParticleInstance>(), 32);
        assert_eq!(std::mem::size_of::<TetherVertex>(), 24);
    }
}
