//! The animation lifecycle contract.
//!
//! Every visualization implements `Animation`; the page controller only
//! ever holds an `AnimationHandle`, which enforces the ordering and
//! idempotence rules so individual implementations don't have to.

use crate::descriptor::SceneError;
use crate::interaction::InputEvent;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("rendering resources unavailable: {reason}")]
    ResourceAcquisition { reason: String },
    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// The shape every per-verse visualization plugs into the page
/// controller with.
pub trait Animation {
    fn init(&mut self) -> Result<(), LifecycleError>;
    /// One frame step: simulate, then upload, then draw.
    fn animate(&mut self, dt: f32);
    /// Input forwarded from the page shell. Default: ignore.
    fn input(&mut self, _event: &InputEvent) {}
    fn resize(&mut self, width: u32, height: u32);
    /// Release resources. Must be safe to call repeatedly and after a
    /// failed `init`.
    fn cleanup(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlePhase {
    Fresh,
    Live,
    Failed,
    Cleaned,
}

/// Owns one visualization and gates every call on its phase:
/// - `animate`/`input` only run while live
/// - `cleanup` forwards exactly once, even after a failed init
/// - dropping the handle cleans up if the owner forgot
pub struct AnimationHandle {
    inner: Box<dyn Animation>,
    phase: HandlePhase,
}

impl AnimationHandle {
    pub fn new(inner: Box<dyn Animation>) -> Self {
        Self {
            inner,
            phase: HandlePhase::Fresh,
        }
    }

    pub fn phase(&self) -> HandlePhase {
        self.phase
    }

    pub fn is_live(&self) -> bool {
        self.phase == HandlePhase::Live
    }

    pub fn init(&mut self) -> Result<(), LifecycleError> {
        match self.phase {
            HandlePhase::Fresh => match self.inner.init() {
                Ok(()) => {
                    self.phase = HandlePhase::Live;
                    Ok(())
                }
                Err(err) => {
                    self.phase = HandlePhase::Failed;
                    Err(err)
                }
            },
            _ => {
                tracing::warn!(phase = ?self.phase, "init called twice on one handle");
                Ok(())
            }
        }
    }

    pub fn animate(&mut self, dt: f32) {
        if self.is_live() {
            self.inner.animate(dt);
        }
    }

    pub fn input(&mut self, event: &InputEvent) {
        if self.is_live() {
            self.inner.input(event);
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if self.phase != HandlePhase::Cleaned {
            self.inner.resize(width, height);
        }
    }

    pub fn cleanup(&mut self) {
        if self.phase == HandlePhase::Cleaned {
            tracing::trace!("cleanup called on an already-cleaned handle");
            return;
        }
        self.inner.cleanup();
        self.phase = HandlePhase::Cleaned;
    }
}

impl Drop for AnimationHandle {
    fn drop(&mut self) {
        self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Counts {
        inits: u32,
        steps: u32,
        cleanups: u32,
        fail_init: bool,
    }

    struct ProbeAnimation {
        counts: Rc<RefCell<Counts>>,
    }

    impl Animation for ProbeAnimation {
        fn init(&mut self) -> Result<(), LifecycleError> {
            let mut counts = self.counts.borrow_mut();
            counts.inits += 1;
            if counts.fail_init {
                return Err(LifecycleError::ResourceAcquisition {
                    reason: "probe".to_string(),
                });
            }
            Ok(())
        }

        fn animate(&mut self, _dt: f32) {
            self.counts.borrow_mut().steps += 1;
        }

        fn resize(&mut self, _width: u32, _height: u32) {}

        fn cleanup(&mut self) {
            self.counts.borrow_mut().cleanups += 1;
        }
    }

    fn probe(fail_init: bool) -> (AnimationHandle, Rc<RefCell<Counts>>) {
        let counts = Rc::new(RefCell::new(Counts {
            fail_init,
            ..Counts::default()
        }));
        let handle = AnimationHandle::new(Box::new(ProbeAnimation {
            counts: counts.clone(),
        }));
        (handle, counts)
    }

    #[test]
    fn test_double_cleanup_forwards_once() {
        let (mut handle, counts) = probe(false);
        handle.init().unwrap();
        handle.cleanup();
        handle.cleanup();
        assert_eq!(counts.borrow().cleanups, 1);
        assert_eq!(handle.phase(), HandlePhase::Cleaned);
    }

    #[test]
    fn test_animate_stops_after_cleanup() {
        let (mut handle, counts) = probe(false);
        handle.init().unwrap();
        handle.animate(0.016);
        handle.cleanup();
        handle.animate(0.016);
        handle.animate(0.016);
        assert_eq!(counts.borrow().steps, 1);
    }

    #[test]
    fn test_animate_requires_init() {
        let (mut handle, counts) = probe(false);
        handle.animate(0.016);
        assert_eq!(counts.borrow().steps, 0);
    }

    #[test]
    fn test_cleanup_safe_after_failed_init() {
        let (mut handle, counts) = probe(true);
        assert!(handle.init().is_err());
        assert_eq!(handle.phase(), HandlePhase::Failed);
        handle.cleanup();
        handle.cleanup();
        assert_eq!(counts.borrow().cleanups, 1);
    }

    #[test]
    fn test_drop_cleans_up_once() {
        let (mut handle, counts) = probe(false);
        handle.init().unwrap();
        drop(handle);
        assert_eq!(counts.borrow().cleanups, 1);

        // An explicitly cleaned handle is not cleaned again on drop.
        let (mut handle, counts) = probe(false);
        handle.init().unwrap();
        handle.cleanup();
        drop(handle);
        assert_eq!(counts.borrow().cleanups, 1);
    }
}
