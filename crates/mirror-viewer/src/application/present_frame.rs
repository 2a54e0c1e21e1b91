//! PresentFrameUseCase: one capture/present tick.
//!
//! # Resource lifetime (for beginners)
//!
//! A tick acquires three resources, each dependent on the one before:
//!
//! ```text
//! FrameSnapshot (owns the captured pixels)
//!   └─ Drawable (borrows the snapshot)
//!        └─ Texture (surface-side copy of the drawable)
//! ```
//!
//! All three are locals of [`present_tick`], so Rust drops them in reverse
//! order when the function returns, whichever `return` is taken.  A failed
//! upload drops the drawable and snapshot; a failed capture acquires nothing.
//! No frame resource survives into the next tick.

use std::fmt;

use mirror_core::{Drawable, FrameSnapshot, ViewportGeometry};
use thiserror::Error;
use tracing::{debug, trace};

/// Errors from the target's capture path.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// The target returned no image.
    #[error("target returned no image")]
    NoImage,
    #[error("platform error: {0}")]
    Platform(String),
}

/// Errors from the local display surface.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("window creation failed: {0}")]
    Window(String),
    #[error("texture upload failed: {0}")]
    Upload(String),
    #[error("present failed: {0}")]
    Present(String),
}

/// Read side of the target display.
pub trait FrameSource {
    /// Pixel storage handed over with each snapshot; dropping it releases the capture.
    type Buffer: AsRef<[u8]>;

    /// Target screen size in pixels.
    fn screen_size(&self) -> (u32, u32);

    /// Captures the whole target screen.
    fn capture(&self) -> Result<FrameSnapshot<Self::Buffer>, CaptureError>;
}

/// Presentation side of the local display surface.
pub trait PresentSurface {
    /// Surface-side image; dropping it releases the upload.
    type Texture;

    /// Copies a drawable into a presentable texture.
    fn upload(&mut self, drawable: &Drawable<'_>) -> Result<Self::Texture, SurfaceError>;

    /// Stretches the texture over the current client area and shows it.
    fn present(&mut self, texture: &Self::Texture) -> Result<(), SurfaceError>;
}

/// Why a tick did not present a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    ViewportUnknown,
    Capture,
    Wrap,
    Upload,
    Present,
}

/// Result of one capture/present tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Presented,
    Skipped(SkipReason),
}

/// Runs one capture/present tick against the current viewport.
///
/// Never fails: every error skips the tick and is reported in the outcome.
pub fn present_tick<F, S>(source: &F, surface: &mut S, viewport: &ViewportGeometry) -> TickOutcome
where
    F: FrameSource + ?Sized,
    S: PresentSurface + ?Sized,
{
    if !viewport.is_usable() {
        trace!("viewport not usable; capture skipped");
        return TickOutcome::Skipped(SkipReason::ViewportUnknown);
    }

    let snapshot = match source.capture() {
        Ok(snapshot) => snapshot,
        Err(e) => {
            debug!(error = %e, "capture failed; tick skipped");
            return TickOutcome::Skipped(SkipReason::Capture);
        }
    };

    let drawable = match Drawable::wrap(&snapshot) {
        Ok(drawable) => drawable,
        Err(e) => {
            debug!(error = %e, "snapshot could not be wrapped; tick skipped");
            return TickOutcome::Skipped(SkipReason::Wrap);
        }
    };

    let texture = match surface.upload(&drawable) {
        Ok(texture) => texture,
        Err(e) => {
            debug!(error = %e, "upload failed; tick skipped");
            return TickOutcome::Skipped(SkipReason::Upload);
        }
    };

    match surface.present(&texture) {
        Ok(()) => TickOutcome::Presented,
        Err(e) => {
            debug!(error = %e, "present failed; tick skipped");
            TickOutcome::Skipped(SkipReason::Present)
        }
    }
}

/// Counts of tick outcomes over a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    pub presented: u64,
    pub viewport_unknown: u64,
    pub capture_failed: u64,
    pub wrap_failed: u64,
    pub upload_failed: u64,
    pub present_failed: u64,
}

impl TickStats {
    pub fn record(&mut self, outcome: TickOutcome) {
        let slot = match outcome {
            TickOutcome::Presented => &mut self.presented,
            TickOutcome::Skipped(SkipReason::ViewportUnknown) => &mut self.viewport_unknown,
            TickOutcome::Skipped(SkipReason::Capture) => &mut self.capture_failed,
            TickOutcome::Skipped(SkipReason::Wrap) => &mut self.wrap_failed,
            TickOutcome::Skipped(SkipReason::Upload) => &mut self.upload_failed,
            TickOutcome::Skipped(SkipReason::Present) => &mut self.present_failed,
        };
        *slot += 1;
    }

    pub fn total(&self) -> u64 {
        self.presented + self.skipped()
    }

    pub fn skipped(&self) -> u64 {
        self.viewport_unknown
            + self.capture_failed
            + self.wrap_failed
            + self.upload_failed
            + self.present_failed
    }
}

impl fmt::Display for TickStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ticks: {} presented, {} skipped (viewport {}, capture {}, wrap {}, upload {}, present {})",
            self.total(),
            self.presented,
            self.skipped(),
            self.viewport_unknown,
            self.capture_failed,
            self.wrap_failed,
            self.upload_failed,
            self.present_failed,
        )
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::display_surface::mock::MockDisplaySurface;
    use crate::infrastructure::target_display::mock::MockTargetDisplay;

    fn usable_viewport() -> ViewportGeometry {
        let mut v = ViewportGeometry::new(4, 4);
        v.resize(2, 2);
        v
    }

    #[test]
    fn test_successful_tick_presents_and_releases_everything() {
        // Arrange
        let target = MockTargetDisplay::new(4, 4);
        let mut surface = MockDisplaySurface::new(2, 2);

        // Act
        let outcome = present_tick(&target, &mut surface, &usable_viewport());

        // Assert
        assert_eq!(outcome, TickOutcome::Presented);
        assert_eq!(surface.presented_frames(), 1);
        assert_eq!(target.live_snapshots(), 0);
        assert_eq!(surface.live_textures(), 0);
    }

    #[test]
    fn test_unknown_viewport_skips_without_capturing() {
        let target = MockTargetDisplay::new(4, 4);
        let mut surface = MockDisplaySurface::new(2, 2);

        let outcome = present_tick(&target, &mut surface, &ViewportGeometry::new(4, 4));

        assert_eq!(outcome, TickOutcome::Skipped(SkipReason::ViewportUnknown));
        assert_eq!(target.captures(), 0);
    }

    #[test]
    fn test_capture_failure_skips_tick() {
        let mut target = MockTargetDisplay::new(4, 4);
        target.fail_capture = true;
        let mut surface = MockDisplaySurface::new(2, 2);

        let outcome = present_tick(&target, &mut surface, &usable_viewport());

        assert_eq!(outcome, TickOutcome::Skipped(SkipReason::Capture));
        assert_eq!(surface.presented_frames(), 0);
    }

    #[test]
    fn test_wrap_failure_releases_snapshot() {
        // Arrange: an empty frame cannot be wrapped.
        let target = MockTargetDisplay::new(4, 4);
        target.push_snapshot(0, 0, 32);
        let mut surface = MockDisplaySurface::new(2, 2);

        // Act
        let outcome = present_tick(&target, &mut surface, &usable_viewport());

        // Assert
        assert_eq!(outcome, TickOutcome::Skipped(SkipReason::Wrap));
        assert_eq!(target.live_snapshots(), 0);
        assert_eq!(surface.uploads(), 0);
    }

    #[test]
    fn test_upload_failure_releases_snapshot() {
        let target = MockTargetDisplay::new(4, 4);
        let mut surface = MockDisplaySurface::new(2, 2);
        surface.fail_upload = true;

        let outcome = present_tick(&target, &mut surface, &usable_viewport());

        assert_eq!(outcome, TickOutcome::Skipped(SkipReason::Upload));
        assert_eq!(target.live_snapshots(), 0);
        assert_eq!(surface.live_textures(), 0);
    }

    #[test]
    fn test_present_failure_releases_texture_and_snapshot() {
        let target = MockTargetDisplay::new(4, 4);
        let mut surface = MockDisplaySurface::new(2, 2);
        surface.fail_present = true;

        let outcome = present_tick(&target, &mut surface, &usable_viewport());

        assert_eq!(outcome, TickOutcome::Skipped(SkipReason::Present));
        assert_eq!(target.live_snapshots(), 0);
        assert_eq!(surface.live_textures(), 0);
    }

    #[test]
    fn test_unusual_depth_still_presents() {
        let target = MockTargetDisplay::new(4, 4);
        target.push_snapshot(4, 4, 8);
        let mut surface = MockDisplaySurface::new(2, 2);

        let outcome = present_tick(&target, &mut surface, &usable_viewport());

        assert_eq!(outcome, TickOutcome::Presented);
    }

    #[test]
    fn test_consecutive_ticks_capture_fresh_snapshots() {
        let target = MockTargetDisplay::new(4, 4);
        let mut surface = MockDisplaySurface::new(2, 2);
        let viewport = usable_viewport();

        present_tick(&target, &mut surface, &viewport);
        present_tick(&target, &mut surface, &viewport);

        assert_eq!(target.captures(), 2);
        assert_eq!(surface.uploads(), 2);
        assert_eq!(target.live_snapshots(), 0);
    }

    #[test]
    fn test_stats_count_each_outcome() {
        let mut stats = TickStats::default();

        stats.record(TickOutcome::Presented);
        stats.record(TickOutcome::Presented);
        stats.record(TickOutcome::Skipped(SkipReason::Capture));
        stats.record(TickOutcome::Skipped(SkipReason::ViewportUnknown));

        assert_eq!(stats.presented, 2);
        assert_eq!(stats.skipped(), 2);
        assert_eq!(stats.total(), 4);
        assert_eq!(
            stats.to_string(),
            "4 ticks: 2 presented, 2 skipped (viewport 1, capture 1, wrap 0, upload 0, present 0)"
        );
    }
}
