//! Channel layouts derived from a framebuffer's bits-per-pixel.
//!
//! # Channel masks (for beginners)
//!
//! A packed pixel is one integer with the colour channels stored in fixed bit
//! ranges.  A *mask* selects one channel's bits:
//!
//! | depth | red        | green      | blue       | alpha      |
//! |-------|------------|------------|------------|------------|
//! | 32    | 0x00FF0000 | 0x0000FF00 | 0x000000FF | 0xFF000000 |
//! | 24    | 0x00FF0000 | 0x0000FF00 | 0x000000FF | none       |
//! | 16    | 0xF800     | 0x07E0     | 0x001F     | none       |
//!
//! Any other depth is read with the 32-bit layout.  That gives odd colours
//! for exotic visuals but never refuses to show a frame.

/// Bit masks selecting each channel of a packed pixel.  A zero mask means the
/// channel is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelLayout {
    pub red: u32,
    pub green: u32,
    pub blue: u32,
    pub alpha: u32,
}

impl ChannelLayout {
    pub const ARGB32: ChannelLayout = ChannelLayout {
        red: 0x00FF_0000,
        green: 0x0000_FF00,
        blue: 0x0000_00FF,
        alpha: 0xFF00_0000,
    };

    pub const RGB24: ChannelLayout = ChannelLayout {
        red: 0x00FF_0000,
        green: 0x0000_FF00,
        blue: 0x0000_00FF,
        alpha: 0,
    };

    pub const RGB565: ChannelLayout = ChannelLayout {
        red: 0xF800,
        green: 0x07E0,
        blue: 0x001F,
        alpha: 0,
    };

    /// Converts a packed pixel into `0x00RRGGBB`, widening each channel to 8 bits.
    #[inline]
    pub fn to_xrgb(&self, pixel: u32) -> u32 {
        let r = extract_channel(pixel, self.red);
        let g = extract_channel(pixel, self.green);
        let b = extract_channel(pixel, self.blue);
        (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
    }
}

/// Picks the channel layout for a framebuffer depth.
pub fn layout_for_depth(bits_per_pixel: u32) -> ChannelLayout {
    match bits_per_pixel {
        32 => ChannelLayout::ARGB32,
        24 => ChannelLayout::RGB24,
        16 => ChannelLayout::RGB565,
        _ => ChannelLayout::ARGB32,
    }
}

/// Number of bytes one pixel occupies in the buffer, clamped to `1..=4`.
pub fn bytes_per_pixel(bits_per_pixel: u32) -> usize {
    (bits_per_pixel.div_ceil(8) as usize).clamp(1, 4)
}

#[inline]
fn extract_channel(pixel: u32, mask: u32) -> u8 {
    if mask == 0 {
        return 0;
    }
    let shift = mask.trailing_zeros();
    let bits = (mask >> shift).count_ones();
    let value = (pixel & mask) >> shift;
    if bits >= 8 {
        (value >> (bits - 8)) as u8
    } else {
        let max = (1u32 << bits) - 1;
        ((value * 255 + max / 2) / max) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_depths_pick_their_layout() {
        assert_eq!(layout_for_depth(32), ChannelLayout::ARGB32);
        assert_eq!(layout_for_depth(24), ChannelLayout::RGB24);
        assert_eq!(layout_for_depth(16), ChannelLayout::RGB565);
    }

    #[test]
    fn test_unknown_depth_falls_back_to_32_bit_layout() {
        for depth in [0, 1, 8, 15, 30, 64] {
            assert_eq!(layout_for_depth(depth), ChannelLayout::ARGB32, "depth {depth}");
        }
    }

    #[test]
    fn test_argb32_drops_alpha_when_converting() {
        assert_eq!(ChannelLayout::ARGB32.to_xrgb(0x80_12_34_56), 0x0012_3456);
    }

    #[test]
    fn test_rgb565_widens_extremes_to_full_range() {
        assert_eq!(ChannelLayout::RGB565.to_xrgb(0xFFFF), 0x00FF_FFFF);
        assert_eq!(ChannelLayout::RGB565.to_xrgb(0xF800), 0x00FF_0000);
        assert_eq!(ChannelLayout::RGB565.to_xrgb(0x07E0), 0x0000_FF00);
        assert_eq!(ChannelLayout::RGB565.to_xrgb(0x001F), 0x0000_00FF);
        assert_eq!(ChannelLayout::RGB565.to_xrgb(0x0000), 0);
    }

    #[test]
    fn test_bytes_per_pixel_rounds_up_and_clamps() {
        assert_eq!(bytes_per_pixel(32), 4);
        assert_eq!(bytes_per_pixel(24), 3);
        assert_eq!(bytes_per_pixel(16), 2);
        assert_eq!(bytes_per_pixel(15), 2);
        assert_eq!(bytes_per_pixel(8), 1);
        assert_eq!(bytes_per_pixel(1), 1);
        assert_eq!(bytes_per_pixel(0), 1);
        assert_eq!(bytes_per_pixel(64), 4);
    }
}
