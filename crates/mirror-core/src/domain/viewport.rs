//! Viewport geometry and window-to-target coordinate mapping.
//!
//! The local window shows the whole target screen stretched to fit, so a
//! window position maps to the target by a plain linear scale per axis:
//!
//! ```text
//! target_x = x * target_w / local_w
//! target_y = y * target_h / local_h
//! ```
//!
//! The multiplication is done in 64 bits, so large screens cannot overflow.
//! Positions outside the window (pointer grabbed while dragging past the
//! edge) are clamped onto the target screen.

use thiserror::Error;

/// Errors returned by the coordinate mapper.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ViewportError {
    /// The local window size has not been reported yet.
    #[error("viewport size is not known yet")]
    Unknown,

    /// The local window has a zero-sized dimension (e.g. minimised).
    #[error("viewport has a zero dimension: {width}x{height}")]
    ZeroDimension { width: u32, height: u32 },
}

/// Maps a local window position to target screen coordinates.
///
/// # Errors
///
/// Returns [`ViewportError::ZeroDimension`] if `local_w` or `local_h` is zero.
pub fn map_coordinates(
    x: i32,
    y: i32,
    local_w: u32,
    local_h: u32,
    target_w: u32,
    target_h: u32,
) -> Result<(i32, i32), ViewportError> {
    if local_w == 0 || local_h == 0 {
        return Err(ViewportError::ZeroDimension {
            width: local_w,
            height: local_h,
        });
    }
    Ok((
        scale_axis(x, local_w, target_w),
        scale_axis(y, local_h, target_h),
    ))
}

fn scale_axis(value: i32, local: u32, target: u32) -> i32 {
    let scaled = i64::from(value) * i64::from(target) / i64::from(local);
    let max = i64::from(target.saturating_sub(1));
    // Screen coordinates are i32 on the X side.
    scaled.clamp(0, max).min(i64::from(i32::MAX)) as i32
}

/// The local window size (possibly unknown) and the fixed target screen size.
///
/// Only the main loop mutates this, in response to resize notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportGeometry {
    local: Option<(u32, u32)>,
    target_w: u32,
    target_h: u32,
}

impl ViewportGeometry {
    /// Creates a geometry with an unknown local size.
    pub fn new(target_w: u32, target_h: u32) -> Self {
        Self {
            local: None,
            target_w,
            target_h,
        }
    }

    /// Records a new local window size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.local = Some((width, height));
    }

    /// The last reported local size, if any.
    pub fn local_size(&self) -> Option<(u32, u32)> {
        self.local
    }

    pub fn target_size(&self) -> (u32, u32) {
        (self.target_w, self.target_h)
    }

    /// Returns `true` once a non-zero local size is known.
    pub fn is_usable(&self) -> bool {
        matches!(self.local, Some((w, h)) if w > 0 && h > 0)
    }

    /// Maps a local window position to target coordinates.
    ///
    /// # Errors
    ///
    /// [`ViewportError::Unknown`] before the first resize, or
    /// [`ViewportError::ZeroDimension`] while the window is zero-sized.
    pub fn map(&self, x: i32, y: i32) -> Result<(i32, i32), ViewportError> {
        let (w, h) = self.local.ok_or(ViewportError::Unknown)?;
        map_coordinates(x, y, w, h, self.target_w, self.target_h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_size_window_maps_to_screen_centre() {
        assert_eq!(map_coordinates(100, 50, 200, 100, 1920, 1080), Ok((960, 540)));
    }

    #[test]
    fn test_origin_maps_to_origin() {
        assert_eq!(map_coordinates(0, 0, 960, 540, 1920, 1080), Ok((0, 0)));
    }

    #[test]
    fn test_integer_division_truncates() {
        // 1 * 1920 / 7 = 274.28...
        assert_eq!(map_coordinates(1, 1, 7, 7, 1920, 1080), Ok((274, 154)));
    }

    #[test]
    fn test_large_values_do_not_overflow() {
        let result = map_coordinates(i32::MAX / 2, 10, 40_000, 20, 40_000, 20);
        assert_eq!(result, Ok((39_999, 10)));
    }

    #[test]
    fn test_outside_window_is_clamped_to_screen() {
        assert_eq!(map_coordinates(-5, 500, 200, 100, 1920, 1080), Ok((0, 1079)));
    }

    #[test]
    fn test_zero_width_is_refused() {
        assert_eq!(
            map_coordinates(10, 10, 0, 100, 1920, 1080),
            Err(ViewportError::ZeroDimension {
                width: 0,
                height: 100
            })
        );
    }

    #[test]
    fn test_unknown_viewport_is_refused() {
        // Arrange
        let geometry = ViewportGeometry::new(1920, 1080);

        // Act
        let result = geometry.map(10, 10);

        // Assert
        assert_eq!(result, Err(ViewportError::Unknown));
        assert!(!geometry.is_usable());
    }

    #[test]
    fn test_resize_makes_viewport_usable() {
        let mut geometry = ViewportGeometry::new(1920, 1080);

        geometry.resize(960, 540);

        assert!(geometry.is_usable());
        assert_eq!(geometry.local_size(), Some((960, 540)));
        assert_eq!(geometry.map(480, 270), Ok((960, 540)));
    }

    #[test]
    fn test_resize_to_zero_makes_viewport_unusable() {
        let mut geometry = ViewportGeometry::new(1920, 1080);
        geometry.resize(960, 540);

        geometry.resize(0, 0);

        assert!(!geometry.is_usable());
        assert!(geometry.map(1, 1).is_err());
    }
}
