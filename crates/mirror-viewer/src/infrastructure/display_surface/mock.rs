//! Mock display surface for unit and integration testing.
//!
//! Events are scripted as batches: each [`drain_events`] call returns the
//! next pushed batch (or nothing once they run out), which is exactly one
//! loop iteration's worth of input.  `Resized` events in a batch also update
//! the surface's reported window size, like a real window would.
//!
//! Uploaded textures increment a shared live counter and decrement it on
//! drop, so tests can check that no texture outlives its tick.  Set
//! `fail_upload` or `fail_present` to exercise the pipeline's skip paths.
//!
//! [`drain_events`]: crate::application::run_session::EventSource::drain_events

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use mirror_core::{Drawable, LocalEvent};

use crate::application::present_frame::{PresentSurface, SurfaceError};
use crate::application::run_session::EventSource;

/// Texture handed out by [`MockDisplaySurface::upload`].
#[derive(Debug)]
pub struct MockTexture {
    pub width: u32,
    pub height: u32,
    live: Arc<AtomicUsize>,
}

impl Drop for MockTexture {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

/// A mock surface with scripted events and counted uploads.
#[derive(Debug)]
pub struct MockDisplaySurface {
    size: Mutex<(u32, u32)>,
    batches: Mutex<VecDeque<Vec<LocalEvent>>>,
    uploads: AtomicUsize,
    presented: Mutex<Vec<(u32, u32)>>,
    live_textures: Arc<AtomicUsize>,
    /// When `true`, every upload returns `SurfaceError::Upload`.
    pub fail_upload: bool,
    /// When `true`, every present returns `SurfaceError::Present`.
    pub fail_present: bool,
}

impl MockDisplaySurface {
    /// Creates a surface reporting a `width` x `height` window.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: Mutex::new((width, height)),
            batches: Mutex::new(VecDeque::new()),
            uploads: AtomicUsize::new(0),
            presented: Mutex::new(Vec::new()),
            live_textures: Arc::new(AtomicUsize::new(0)),
            fail_upload: false,
            fail_present: false,
        }
    }

    /// Queues one iteration's worth of events.
    pub fn push_events(&self, batch: Vec<LocalEvent>) {
        self.batches.lock().unwrap().push_back(batch);
    }

    /// Successful upload calls.
    pub fn uploads(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    /// Frames presented successfully.
    pub fn presented_frames(&self) -> usize {
        self.presented.lock().unwrap().len()
    }

    /// Texture sizes of every presented frame, in order.
    pub fn presented_sizes(&self) -> Vec<(u32, u32)> {
        self.presented.lock().unwrap().clone()
    }

    /// Textures currently alive.
    pub fn live_textures(&self) -> usize {
        self.live_textures.load(Ordering::SeqCst)
    }
}

impl EventSource for MockDisplaySurface {
    fn drain_events(&mut self) -> Vec<LocalEvent> {
        let batch = self.batches.lock().unwrap().pop_front().unwrap_or_default();
        for event in &batch {
            if let LocalEvent::Resized { width, height } = *event {
                *self.size.lock().unwrap() = (width, height);
            }
        }
        batch
    }

    fn window_size(&self) -> (u32, u32) {
        *self.size.lock().unwrap()
    }
}

impl PresentSurface for MockDisplaySurface {
    type Texture = MockTexture;

    fn upload(&mut self, drawable: &Drawable<'_>) -> Result<MockTexture, SurfaceError> {
        if self.fail_upload {
            return Err(SurfaceError::Upload("injected failure".to_string()));
        }
        self.uploads.fetch_add(1, Ordering::SeqCst);
        self.live_textures.fetch_add(1, Ordering::SeqCst);
        Ok(MockTexture {
            width: drawable.width(),
            height: drawable.height(),
            live: Arc::clone(&self.live_textures),
        })
    }

    fn present(&mut self, texture: &MockTexture) -> Result<(), SurfaceError> {
        if self.fail_present {
            return Err(SurfaceError::Present("injected failure".to_string()));
        }
        self.presented
            .lock()
            .unwrap()
            .push((texture.width, texture.height));
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batches_drain_one_per_call() {
        let mut surface = MockDisplaySurface::new(10, 10);
        surface.push_events(vec![LocalEvent::Quit]);

        assert_eq!(surface.drain_events(), vec![LocalEvent::Quit]);
        assert!(surface.drain_events().is_empty());
    }

    #[test]
    fn test_resize_in_batch_updates_window_size() {
        let mut surface = MockDisplaySurface::new(10, 10);
        surface.push_events(vec![LocalEvent::Resized {
            width: 40,
            height: 30,
        }]);

        surface.drain_events();

        assert_eq!(surface.window_size(), (40, 30));
    }
}
