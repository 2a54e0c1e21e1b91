//! Local display surface adapters.
//!
//! A display surface is both an [`EventSource`] (keyboard, pointer, resize
//! and quit events) and a [`PresentSurface`] (shows captured frames).  The
//! winit + softbuffer implementation is the real one; the mock scripts event
//! batches and counts uploads for tests.
//!
//! [`EventSource`]: crate::application::run_session::EventSource
//! [`PresentSurface`]: crate::application::present_frame::PresentSurface

pub mod mock;
pub mod window;

/// A frame converted to `0x00RRGGBB` pixels at the target's resolution,
/// ready to be stretched into a window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XrgbTexture {
    pub pixels: Vec<u32>,
    pub width: u32,
    pub height: u32,
}

/// Turns fractional wheel deltas into whole notches.
///
/// Touchpads report many small deltas; the remainder is carried to the next
/// event so slow scrolling still produces notches.  Reversing direction
/// discards the carried remainder.
#[derive(Debug, Clone, Copy, Default)]
pub struct WheelAccumulator {
    residual: f64,
}

impl WheelAccumulator {
    /// Adds `delta` lines (positive = up) and returns the whole notches now due.
    pub fn push(&mut self, delta: f64) -> i32 {
        if !delta.is_finite() {
            return 0;
        }
        if self.residual != 0.0 && self.residual.signum() != delta.signum() {
            self.residual = 0.0;
        }
        self.residual += delta;
        let whole = self.residual.trunc();
        self.residual -= whole;
        whole.clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_line_deltas_pass_through() {
        let mut acc = WheelAccumulator::default();
        assert_eq!(acc.push(3.0), 3);
        assert_eq!(acc.push(-2.0), -2);
    }

    #[test]
    fn test_fractions_accumulate_into_notches() {
        // Arrange
        let mut acc = WheelAccumulator::default();

        // Act
        let notches: Vec<i32> = [0.4, 0.4, 0.4, 0.4, 0.4].iter().map(|&d| acc.push(d)).collect();

        // Assert
        assert_eq!(notches, vec![0, 0, 1, 0, 1]);
    }

    #[test]
    fn test_direction_change_discards_remainder() {
        let mut acc = WheelAccumulator::default();
        acc.push(0.9);

        assert_eq!(acc.push(-0.5), 0);
        assert_eq!(acc.push(-0.5), -1);
    }

    #[test]
    fn test_non_finite_delta_is_ignored() {
        let mut acc = WheelAccumulator::default();
        assert_eq!(acc.push(f64::NAN), 0);
        assert_eq!(acc.push(1.0), 1);
    }
}
