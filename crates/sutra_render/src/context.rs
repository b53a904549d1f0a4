//! wgpu surface, pipelines, and per-frame drawing.
//!
//! One `RenderContext` per visualization: nothing on the GPU is shared
//! across verses, so releasing a context can never disturb another
//! scene.

use crate::instances::{FrameData, ParticleInstance, TetherVertex};
use crate::resources::{ResourceSlot, ResourceTracker};
use std::sync::Arc;
use thiserror::Error;
use winit::window::Window;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create rendering surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible graphics adapter found")]
    AdapterUnavailable,
    #[error("graphics device request failed: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub draws: u32,
    pub instances: u32,
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct SceneUniforms {
    view: [[f32; 4]; 4],
    proj: [[f32; 4]; 4],
    /// xyz: light direction, w: ambient strength.
    light: [f32; 4],
}

pub struct RenderContext {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    particle_pipeline: Option<wgpu::RenderPipeline>,
    tether_pipeline: Option<wgpu::RenderPipeline>,
    uniform_bind_group: Option<wgpu::BindGroup>,
    buffers: ResourceTracker<wgpu::Buffer>,
    uniform_slot: ResourceSlot,
    instance_slot: ResourceSlot,
    tether_slot: ResourceSlot,
    max_instances: u32,
    max_tether_vertices: u32,
}

impl RenderContext {
    /// Acquire a surface and device for the window and build both
    /// pipelines. Capacities bound the instance and tether buffers; the
    /// pools behind them are fixed-size, so these never need to grow.
    pub async fn new(
        window: Arc<Window>,
        max_instances: u32,
        max_tether_vertices: u32,
    ) -> Result<Self, RenderError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RenderError::AdapterUnavailable)?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Sutra Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps.formats[0];

        // A collapsed window still gets a minimum viable surface.
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Particle Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/particles.wgsl").into()),
        });
        let tether_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Tether Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/tethers.wgsl").into()),
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scene Uniforms Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&uniform_layout],
            push_constant_ranges: &[],
        });

        let particle_pipeline =
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Particle Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<ParticleInstance>()
                            as wgpu::BufferAddress,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![
                            0 => Float32x3,
                            1 => Float32,
                            2 => Float32x3,
                            3 => Float32,
                        ],
                    }],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: config.format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleStrip,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState {
                    count: 1,
                    mask: !0,
                    alpha_to_coverage_enabled: false,
                },
                multiview: None,
                cache: None,
            });

        let tether_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Tether Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &tether_shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<TetherVertex>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3,
                        1 => Float32x3,
                    ],
                }],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &tether_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        let mut buffers = ResourceTracker::new();
        let uniform_slot = buffers.track(
            "scene-uniforms",
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Scene Uniforms"),
                size: std::mem::size_of::<SceneUniforms>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }),
        );
        let instance_slot = buffers.track(
            "particle-instances",
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Particle Instances"),
                size: (std::mem::size_of::<ParticleInstance>() as u64)
                    * u64::from(max_instances.max(1)),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }),
        );
        let tether_slot = buffers.track(
            "tether-vertices",
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Tether Vertices"),
                size: (std::mem::size_of::<TetherVertex>() as u64)
                    * u64::from(max_tether_vertices.max(2)),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }),
        );

        let uniform_bind_group = buffers.get(uniform_slot).map(|uniform_buffer| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Scene Uniforms Bind Group"),
                layout: &uniform_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                }],
            })
        });

        tracing::info!(
            width = config.width,
            height = config.height,
            max_instances,
            "render context ready"
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            particle_pipeline: Some(particle_pipeline),
            tether_pipeline: Some(tether_pipeline),
            uniform_bind_group,
            buffers,
            uniform_slot,
            instance_slot,
            tether_slot,
            max_instances: max_instances.max(1),
            max_tether_vertices: max_tether_vertices.max(2),
        })
    }

    /// Reconfigure for a new size, clamping away zero dimensions.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.buffers.is_released() {
            return;
        }
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.surface.configure(&self.device, &self.config);
    }

    pub fn is_released(&self) -> bool {
        self.buffers.is_released()
    }

    /// Upload frame data and draw. Simulation for this frame has already
    /// stepped by the time this runs; the caller enforces that order.
    pub fn render(&mut self, frame: &FrameData) -> Result<RenderStats, wgpu::SurfaceError> {
        if self.buffers.is_released() {
            // Cleanup raced a scheduled frame; drawing is over.
            return Ok(RenderStats::default());
        }

        let uniforms = SceneUniforms {
            view: frame.view.to_cols_array_2d(),
            proj: frame.proj.to_cols_array_2d(),
            light: [
                frame.light_direction.x,
                frame.light_direction.y,
                frame.light_direction.z,
                frame.ambient,
            ],
        };

        let instance_count = (frame.instances.len() as u32).min(self.max_instances);
        if instance_count < frame.instances.len() as u32 {
            tracing::trace!(
                dropped = frame.instances.len() as u32 - instance_count,
                "instance buffer full, dropping overflow"
            );
        }
        let tether_count = (frame.tether_vertices.len() as u32).min(self.max_tether_vertices);

        if let Some(buffer) = self.buffers.get(self.uniform_slot) {
            self.queue
                .write_buffer(buffer, 0, bytemuck::bytes_of(&uniforms));
        }
        if instance_count > 0 {
            if let Some(buffer) = self.buffers.get(self.instance_slot) {
                self.queue.write_buffer(
                    buffer,
                    0,
                    bytemuck::cast_slice(&frame.instances[..instance_count as usize]),
                );
            }
        }
        if tether_count > 0 {
            if let Some(buffer) = self.buffers.get(self.tether_slot) {
                self.queue.write_buffer(
                    buffer,
                    0,
                    bytemuck::cast_slice(&frame.tether_vertices[..tether_count as usize]),
                );
            }
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Encoder"),
            });

        let mut stats = RenderStats::default();
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: f64::from(frame.background.x),
                            g: f64::from(frame.background.y),
                            b: f64::from(frame.background.z),
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if let (Some(pipeline), Some(bind_group), Some(buffer)) = (
                self.particle_pipeline.as_ref(),
                self.uniform_bind_group.as_ref(),
                self.buffers.get(self.instance_slot),
            ) {
                if instance_count > 0 {
                    render_pass.set_pipeline(pipeline);
                    render_pass.set_bind_group(0, bind_group, &[]);
                    render_pass.set_vertex_buffer(0, buffer.slice(..));
                    render_pass.draw(0..4, 0..instance_count);
                    stats.draws += 1;
                    stats.instances += instance_count;
                }
            }

            if let (Some(pipeline), Some(bind_group), Some(buffer)) = (
                self.tether_pipeline.as_ref(),
                self.uniform_bind_group.as_ref(),
                self.buffers.get(self.tether_slot),
            ) {
                if tether_count > 0 {
                    render_pass.set_pipeline(pipeline);
                    render_pass.set_bind_group(0, bind_group, &[]);
                    render_pass.set_vertex_buffer(0, buffer.slice(..));
                    render_pass.draw(0..tether_count, 0..1);
                    stats.draws += 1;
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(stats)
    }

    /// Destroy buffers and drop pipelines. Idempotent: the second call
    /// is a logged no-op.
    pub fn release(&mut self) {
        let released = self.buffers.release_all();
        self.particle_pipeline = None;
        self.tether_pipeline = None;
        self.uniform_bind_group = None;
        if released > 0 {
            tracing::info!(released, "render context released");
        }
    }
}
