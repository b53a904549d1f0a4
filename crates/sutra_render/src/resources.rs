//! GPU resource tracking.
//!
//! Every GPU-backed resource a visualization creates is registered here,
//! and `release_all` frees each exactly once. Releasing twice is a
//! logged no-op: navigation code may tear a scene down from more than
//! one path, and the second pass must be harmless.

/// A resource with an explicit release action. wgpu buffers are
/// destroyed eagerly rather than waiting for drop, so the GPU memory of
/// a dismissed verse is reclaimed before the next scene allocates.
pub trait GpuResource {
    fn release(&self);
}

impl GpuResource for wgpu::Buffer {
    fn release(&self) {
        self.destroy();
    }
}

/// Stable handle into a tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceSlot(usize);

pub struct ResourceTracker<R: GpuResource> {
    slots: Vec<(String, Option<R>)>,
    released: bool,
}

impl<R: GpuResource> ResourceTracker<R> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            released: false,
        }
    }

    pub fn track(&mut self, label: &str, resource: R) -> ResourceSlot {
        self.slots.push((label.to_string(), Some(resource)));
        ResourceSlot(self.slots.len() - 1)
    }

    pub fn get(&self, slot: ResourceSlot) -> Option<&R> {
        self.slots.get(slot.0).and_then(|(_, r)| r.as_ref())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Release every tracked resource. Returns how many were released by
    /// this call; a repeat call releases nothing.
    pub fn release_all(&mut self) -> usize {
        if self.released {
            tracing::trace!("resource tracker already released");
            return 0;
        }
        let mut count = 0;
        for (label, resource) in &mut self.slots {
            if let Some(resource) = resource.take() {
                resource.release();
                count += 1;
                tracing::trace!(label = label.as_str(), "released gpu resource");
            }
        }
        self.released = true;
        count
    }
}

impl<R: GpuResource> Default for ResourceTracker<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct ProbeResource {
        releases: Rc<Cell<u32>>,
    }

    impl GpuResource for ProbeResource {
        fn release(&self) {
            self.releases.set(self.releases.get() + 1);
        }
    }

    #[test]
    fn test_release_all_frees_each_exactly_once() {
        let releases = Rc::new(Cell::new(0));
        let mut tracker = ResourceTracker::new();
        for label in ["uniforms", "instances", "tethers"] {
            tracker.track(
                label,
                ProbeResource {
                    releases: releases.clone(),
                },
            );
        }

        assert_eq!(tracker.release_all(), 3);
        assert_eq!(releases.get(), 3);

        // Second release: nothing double-freed.
        assert_eq!(tracker.release_all(), 0);
        assert_eq!(releases.get(), 3);
        assert!(tracker.is_released());
    }

    #[test]
    fn test_released_resources_are_gone() {
        let releases = Rc::new(Cell::new(0));
        let mut tracker = ResourceTracker::new();
        let slot = tracker.track(
            "uniforms",
            ProbeResource {
                releases: releases.clone(),
            },
        );
        assert!(tracker.get(slot).is_some());
        tracker.release_all();
        assert!(tracker.get(slot).is_none());
    }
}
