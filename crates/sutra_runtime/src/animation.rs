//! The one animation implementation.
//!
//! Every verse runs through this type; what differs between verses is
//! the descriptor, not the code. Frame order inside `animate` is fixed:
//! simulate, rebuild frame data, draw.

use std::sync::Arc;
use sutra_metrics::DrawCounter;
use sutra_render::{FrameData, RenderContext, RenderStats};
use sutra_scene::{
    Animation, InputEvent, InteractionController, LifecycleError, SceneBuilder, SceneDescriptor,
    SceneGraph,
};
use winit::window::Window;

pub struct VerseAnimation {
    descriptor: SceneDescriptor,
    window: Arc<Window>,
    viewport: (u32, u32),
    graph: Option<SceneGraph>,
    interaction: InteractionController,
    context: Option<RenderContext>,
    stats: RenderStats,
    draws: DrawCounter,
}

impl VerseAnimation {
    pub fn new(descriptor: SceneDescriptor, window: Arc<Window>) -> Self {
        let size = window.inner_size();
        let interaction = InteractionController::new(descriptor.interaction);
        Self {
            descriptor,
            window,
            viewport: (size.width.max(1), size.height.max(1)),
            graph: None,
            interaction,
            context: None,
            stats: RenderStats::default(),
            draws: DrawCounter::new(),
        }
    }

    pub fn stats(&self) -> RenderStats {
        self.stats
    }
}

impl Animation for VerseAnimation {
    fn init(&mut self) -> Result<(), LifecycleError> {
        let graph = SceneBuilder::new(self.descriptor.clone())
            .build(self.viewport.0, self.viewport.1)
            .map_err(LifecycleError::from)?;

        let max_instances = graph.entities().len() as u32;
        let max_tether_vertices = (graph.tethers().len() as u32) * 2;
        match pollster::block_on(RenderContext::new(
            self.window.clone(),
            max_instances,
            max_tether_vertices.max(2),
        )) {
            Ok(context) => self.context = Some(context),
            Err(err) => {
                // A page without a GPU still shows its text; the scene
                // steps invisibly rather than failing the shell.
                tracing::warn!(%err, scene = self.descriptor.name.as_str(), "rendering unavailable, running without draws");
                self.context = None;
            }
        }

        self.graph = Some(graph);
        Ok(())
    }

    fn animate(&mut self, dt: f32) {
        let Some(graph) = self.graph.as_mut() else {
            return;
        };

        // 1. Simulation step.
        graph.step(dt);

        let Some(context) = self.context.as_mut() else {
            return;
        };

        // 2. Rebuild GPU-facing buffers from the stepped state.
        let mut frame = FrameData::new(
            graph.palette.background,
            graph.camera.view(),
            graph.camera.proj(),
        );
        frame.light_direction = graph.lighting.direction;
        frame.ambient = graph.lighting.ambient;
        frame.push_entities(graph.entities());
        frame.push_tethers(&graph.tether_segments(), graph.palette.accent);

        // 3. Draw.
        self.draws.begin_frame();
        match context.render(&frame) {
            Ok(stats) => {
                self.draws.record_draw(stats.instances);
                tracing::trace!(
                    draws = stats.draws,
                    instances = self.draws.instances(),
                    "frame drawn"
                );
                self.stats = stats;
            }
            Err(wgpu::SurfaceError::Lost) => {
                context.resize(self.viewport.0, self.viewport.1);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                tracing::error!("gpu out of memory, dropping this verse's renderer");
                context.release();
                self.context = None;
            }
            Err(err) => {
                tracing::warn!(%err, "frame skipped");
            }
        }
    }

    fn input(&mut self, event: &InputEvent) {
        if let Some(graph) = self.graph.as_mut() {
            let (simulator, params) = graph.interaction_targets();
            self.interaction.apply(event, simulator, params);
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.viewport = (width.max(1), height.max(1));
        if let Some(graph) = self.graph.as_mut() {
            graph.camera.set_viewport(width, height);
        }
        if let Some(context) = self.context.as_mut() {
            context.resize(width, height);
        }
    }

    fn cleanup(&mut self) {
        if let Some(context) = self.context.as_mut() {
            context.release();
        }
        self.context = None;
        self.graph = None;
    }
}
