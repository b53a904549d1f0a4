//! winit application shell.
//!
//! One redraw callback per display refresh; each callback drains fixed
//! simulation ticks, then the live visualization draws. Input maps to
//! engine-agnostic events before it reaches the scene layer.

use crate::controller::PageController;
use std::sync::Arc;
use std::time::Instant;
use sutra_core::param;
use sutra_core::time::{SimulationTime, TICK_SECS};
use sutra_metrics::FrameTimer;
use sutra_scene::InputEvent;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseButton, WindowEvent},
    event_loop::ActiveEventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

const SPEED_STEP: f32 = 0.2;

pub struct PageApp {
    controller: PageController,
    window: Option<Arc<Window>>,
    time: SimulationTime,
    last_frame: Option<Instant>,
    frame_timer: FrameTimer,
    last_report: Instant,
    speed: f32,
}

impl PageApp {
    pub fn new(controller: PageController) -> Self {
        Self {
            controller,
            window: None,
            time: SimulationTime::new(),
            last_frame: None,
            frame_timer: FrameTimer::new(120),
            last_report: Instant::now(),
            speed: 1.0,
        }
    }

    fn adjust_speed(&mut self, delta: f32) {
        self.speed = (self.speed + delta).clamp(0.1, 5.0);
        self.controller.input(&InputEvent::Slider {
            name: param::SPEED.to_string(),
            value: self.speed,
        });
    }
}

impl ApplicationHandler for PageApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let attrs = Window::default_attributes()
                .with_title("Sutra — verses in motion")
                .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));
            match event_loop.create_window(attrs) {
                Ok(window) => {
                    let window = Arc::new(window);
                    self.window = Some(window.clone());
                    self.controller.select_initial(window);
                }
                Err(err) => {
                    tracing::error!(%err, "window creation failed");
                    event_loop.exit();
                }
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                self.controller.teardown();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                self.controller.resize(size.width, size.height);
            }
            WindowEvent::RedrawRequested => {
                self.frame_timer.begin();

                let now = Instant::now();
                let real = self
                    .last_frame
                    .map(|last| now.duration_since(last))
                    .unwrap_or_default();
                self.last_frame = Some(now);

                let ticks = self.time.advance(real);
                for _ in 0..ticks {
                    self.controller.frame(TICK_SECS);
                }

                self.frame_timer.end();

                if self.last_report.elapsed().as_secs() >= 5 {
                    self.last_report = Instant::now();
                    tracing::info!(
                        fps = self.frame_timer.fps(),
                        frame_ms = self.frame_timer.frame_time_ms(),
                        chapter = self.controller.chapter(),
                        verse = self.controller.verse(),
                        "frame report"
                    );
                }
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                self.controller.input(&InputEvent::Pointer);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || event.repeat {
                    return;
                }
                let Some(window) = self.window.clone() else {
                    return;
                };
                match event.physical_key {
                    PhysicalKey::Code(KeyCode::ArrowRight) => {
                        self.controller.next_verse(window);
                    }
                    PhysicalKey::Code(KeyCode::ArrowLeft) => {
                        self.controller.prev_verse(window);
                    }
                    PhysicalKey::Code(KeyCode::Space) => {
                        self.controller.input(&InputEvent::Toggle);
                    }
                    PhysicalKey::Code(KeyCode::Equal | KeyCode::NumpadAdd) => {
                        self.adjust_speed(SPEED_STEP);
                    }
                    PhysicalKey::Code(KeyCode::Minus | KeyCode::NumpadSubtract) => {
                        self.adjust_speed(-SPEED_STEP);
                    }
                    PhysicalKey::Code(KeyCode::Escape) => {
                        self.controller.teardown();
                        event_loop.exit();
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
