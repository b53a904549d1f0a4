//! The page controller.
//!
//! Owns exactly one live `AnimationHandle`. Switching verses cancels the
//! outstanding frame token and finishes cleanup before the next scene's
//! init begins, so two render loops can never overlap on one window.

use crate::animation::VerseAnimation;
use std::sync::Arc;
use sutra_content::{animation_id, Caption, ChapterStore};
use sutra_media::{MediaClient, MediaRequest};
use sutra_render::{FrameScheduler, FrameToken};
use sutra_scene::{AnimationHandle, AnimationRegistry, InputEvent};
use winit::window::Window;

/// Run one frame step if the token is still the live generation.
/// A stale token means cleanup already happened; nothing runs.
pub(crate) fn advance_if_live(handle: &mut AnimationHandle, token: &FrameToken, dt: f32) -> bool {
    if !token.is_live() {
        return false;
    }
    handle.animate(dt);
    true
}

pub struct PageController {
    content: ChapterStore,
    registry: AnimationRegistry,
    media: MediaClient,
    scheduler: FrameScheduler,
    chapter: u32,
    verse: u32,
    current: Option<(AnimationHandle, FrameToken)>,
}

impl PageController {
    pub fn new(
        content: ChapterStore,
        registry: AnimationRegistry,
        media: MediaClient,
        chapter: u32,
    ) -> Self {
        let verse = content
            .chapter(chapter)
            .and_then(|c| c.verse_numbers().min())
            .unwrap_or(1);
        Self {
            content,
            registry,
            media,
            scheduler: FrameScheduler::new(),
            chapter,
            verse,
            current: None,
        }
    }

    pub fn chapter(&self) -> u32 {
        self.chapter
    }

    pub fn verse(&self) -> u32 {
        self.verse
    }

    pub fn has_animation(&self) -> bool {
        self.current.is_some()
    }

    /// Select the controller's current verse (used on startup).
    pub fn select_initial(&mut self, window: Arc<Window>) {
        let verse = self.verse;
        self.select_verse(window, verse);
    }

    pub fn select_verse(&mut self, window: Arc<Window>, verse: u32) {
        let Some(record) = self.content.verse(self.chapter, verse).cloned() else {
            tracing::warn!(chapter = self.chapter, verse, "verse not found");
            return;
        };

        // Teardown strictly precedes the next init: cancel the token so
        // any already-scheduled frame goes stale, then release.
        self.scheduler.cancel();
        if let Some((mut handle, _token)) = self.current.take() {
            handle.cleanup();
        }

        self.verse = verse;
        let caption = Caption::for_record(&record);
        tracing::info!(
            chapter = self.chapter,
            verse,
            heading = caption.heading.as_str(),
            hint = caption.hint.as_str(),
            "verse selected"
        );

        let media = self.media.fetch(&MediaRequest {
            prompt: format!("{}: {}", record.concept_summary, record.analogy_summary),
            chapter: self.chapter,
            verse,
            method: "animation".to_string(),
        });
        tracing::debug!(
            animation_url = media.animation_url.as_str(),
            is_fallback = media.is_fallback,
            "verse media resolved"
        );

        let id = animation_id(self.chapter, verse);
        let Some(descriptor) = self.registry.descriptor(&id).cloned() else {
            tracing::warn!(id = id.as_str(), "no animation registered, rendering text only");
            return;
        };

        let mut handle = AnimationHandle::new(Box::new(VerseAnimation::new(descriptor, window)));
        match handle.init() {
            Ok(()) => {
                let token = self.scheduler.issue();
                self.current = Some((handle, token));
            }
            Err(err) => {
                tracing::warn!(%err, "visualization init failed, rendering text only");
                handle.cleanup();
            }
        }
    }

    pub fn next_verse(&mut self, window: Arc<Window>) {
        if let Some(verse) = self.neighbor_verse(1) {
            self.select_verse(window, verse);
        }
    }

    pub fn prev_verse(&mut self, window: Arc<Window>) {
        if let Some(verse) = self.neighbor_verse(-1) {
            self.select_verse(window, verse);
        }
    }

    /// Next/previous verse by explicit number, wrapping at the ends.
    fn neighbor_verse(&self, direction: i32) -> Option<u32> {
        let chapter = self.content.chapter(self.chapter)?;
        let mut numbers: Vec<u32> = chapter.verse_numbers().collect();
        if numbers.is_empty() {
            return None;
        }
        numbers.sort_unstable();
        let pos = numbers.iter().position(|&n| n == self.verse).unwrap_or(0);
        let len = numbers.len() as i32;
        let next = (pos as i32 + direction).rem_euclid(len) as usize;
        Some(numbers[next])
    }

    pub fn frame(&mut self, dt: f32) {
        if let Some((handle, token)) = self.current.as_mut() {
            advance_if_live(handle, token, dt);
        }
    }

    pub fn input(&mut self, event: &InputEvent) {
        if let Some((handle, token)) = self.current.as_mut() {
            if token.is_live() {
                handle.input(event);
            }
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if let Some((handle, _)) = self.current.as_mut() {
            handle.resize(width, height);
        }
    }

    /// Cancel and clean up everything, e.g. on window close.
    pub fn teardown(&mut self) {
        self.scheduler.cancel();
        if let Some((mut handle, _)) = self.current.take() {
            handle.cleanup();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use sutra_scene::{Animation, LifecycleError};

    struct ProbeAnimation {
        steps: Rc<RefCell<u32>>,
        cleanups: Rc<RefCell<u32>>,
    }

    impl Animation for ProbeAnimation {
        fn init(&mut self) -> Result<(), LifecycleError> {
            Ok(())
        }
        fn animate(&mut self, _dt: f32) {
            *self.steps.borrow_mut() += 1;
        }
        fn resize(&mut self, _width: u32, _height: u32) {}
        fn cleanup(&mut self) {
            *self.cleanups.borrow_mut() += 1;
        }
    }

    fn probe() -> (AnimationHandle, Rc<RefCell<u32>>, Rc<RefCell<u32>>) {
        let steps = Rc::new(RefCell::new(0));
        let cleanups = Rc::new(RefCell::new(0));
        let handle = AnimationHandle::new(Box::new(ProbeAnimation {
            steps: steps.clone(),
            cleanups: cleanups.clone(),
        }));
        (handle, steps, cleanups)
    }

    #[test]
    fn test_stale_token_applies_no_mutation() {
        let mut scheduler = FrameScheduler::new();

        // Visualization A starts and runs a frame.
        let (mut a, a_steps, a_cleanups) = probe();
        a.init().unwrap();
        let a_token = scheduler.issue();
        assert!(advance_if_live(&mut a, &a_token, 0.016));
        assert_eq!(*a_steps.borrow(), 1);

        // Navigation: cancel, clean up A, start B.
        scheduler.cancel();
        a.cleanup();
        assert_eq!(*a_cleanups.borrow(), 1);

        let (mut b, b_steps, _) = probe();
        b.init().unwrap();
        let b_token = scheduler.issue();

        // A late-scheduled callback still holding A's token does nothing.
        assert!(!advance_if_live(&mut a, &a_token, 0.016));
        assert_eq!(*a_steps.borrow(), 1, "A mutated after its cleanup");

        // B's frames run normally.
        assert!(advance_if_live(&mut b, &b_token, 0.016));
        assert_eq!(*b_steps.borrow(), 1);
    }

    #[test]
    fn test_cancel_without_successor_freezes_frames() {
        let mut scheduler = FrameScheduler::new();
        let (mut a, a_steps, _) = probe();
        a.init().unwrap();
        let token = scheduler.issue();
        scheduler.cancel();
        assert!(!advance_if_live(&mut a, &token, 0.016));
        assert_eq!(*a_steps.borrow(), 0);
    }
}
