//! Sutra Engine Runtime
//!
//! Binary that links the engine crates and drives the verse page shell.

mod animation;
mod app;
mod controller;

use anyhow::Result;
use app::PageApp;
use controller::PageController;
use std::path::Path;
use sutra_content::ChapterStore;
use sutra_media::{MediaCache, MediaClient, OfflineUpstream};
use sutra_scene::AnimationRegistry;
use winit::event_loop::{ControlFlow, EventLoop};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    tracing::info!("Sutra Engine v{}", sutra_core::VERSION);

    let content = ChapterStore::builtin()?;
    let mut registry = AnimationRegistry::with_builtin();
    let extra = registry.load_scene_dir(Path::new("content/chapter-01"));
    if extra > 0 {
        tracing::info!(extra, "merged scene descriptors from content directory");
    }

    // No upstream generator is configured for local runs; every media
    // request resolves through the fallback catalog.
    let media = MediaClient::new(Box::new(OfflineUpstream), MediaCache::with_capacity(64));

    let chapter = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(1);
    let controller = PageController::new(content, registry, media, chapter);

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = PageApp::new(controller);
    event_loop.run_app(&mut app)?;

    Ok(())
}
