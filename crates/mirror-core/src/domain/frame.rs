//! Captured frames and the drawable view used to present them.
//!
//! A [`FrameSnapshot`] is the raw result of one capture: the target's pixel
//! buffer plus the metadata needed to interpret it.  The buffer type is
//! generic so the X11 adapter can hand over its own RAII image handle and the
//! snapshot owns (and on drop releases) it.
//!
//! A [`Drawable`] is a validated, borrowed view over a snapshot: the stride
//! and length have been checked against the geometry, and a channel layout
//! has been chosen from the depth.  It cannot outlive the snapshot it wraps.

use thiserror::Error;

use super::pixel_format::{bytes_per_pixel, layout_for_depth, ChannelLayout};

/// Order of the bytes of one packed pixel in memory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ByteOrder {
    /// Least significant byte first (X11 `LSBFirst`).
    #[default]
    LsbFirst,
    /// Most significant byte first (X11 `MSBFirst`).
    MsbFirst,
}

/// One full-screen capture of the target.
#[derive(Debug)]
pub struct FrameSnapshot<B> {
    pub buffer: B,
    pub width: u32,
    pub height: u32,
    pub bits_per_pixel: u32,
    /// Bytes from the start of one row to the start of the next.
    pub stride: usize,
    pub byte_order: ByteOrder,
}

/// Reasons a snapshot cannot be wrapped into a [`Drawable`].
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum WrapError {
    #[error("frame has no pixels ({width}x{height})")]
    Empty { width: u32, height: u32 },

    #[error("stride {stride} is smaller than one row ({row_bytes} bytes)")]
    StrideTooSmall { stride: usize, row_bytes: usize },

    #[error("buffer holds {len} bytes but the frame needs {required}")]
    BufferTooShort { len: usize, required: usize },
}

/// A validated view of a snapshot's pixels.
#[derive(Debug, Clone, Copy)]
pub struct Drawable<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
    stride: usize,
    bytes_per_pixel: usize,
    byte_order: ByteOrder,
    layout: ChannelLayout,
}

impl<'a> Drawable<'a> {
    /// Validates `snapshot` and picks its channel layout.
    ///
    /// # Errors
    ///
    /// Returns a [`WrapError`] if the frame is empty, the stride is shorter
    /// than a row, or the buffer is shorter than the frame.
    pub fn wrap<B: AsRef<[u8]>>(snapshot: &'a FrameSnapshot<B>) -> Result<Self, WrapError> {
        let data = snapshot.buffer.as_ref();
        let (width, height) = (snapshot.width, snapshot.height);
        if width == 0 || height == 0 {
            return Err(WrapError::Empty { width, height });
        }

        let bpp = bytes_per_pixel(snapshot.bits_per_pixel);
        let row_bytes = width as usize * bpp;
        if snapshot.stride < row_bytes {
            return Err(WrapError::StrideTooSmall {
                stride: snapshot.stride,
                row_bytes,
            });
        }

        let required = snapshot.stride * (height as usize - 1) + row_bytes;
        if data.len() < required {
            return Err(WrapError::BufferTooShort {
                len: data.len(),
                required,
            });
        }

        Ok(Self {
            data,
            width,
            height,
            stride: snapshot.stride,
            bytes_per_pixel: bpp,
            byte_order: snapshot.byte_order,
            layout: layout_for_depth(snapshot.bits_per_pixel),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn layout(&self) -> ChannelLayout {
        self.layout
    }

    /// Reads the pixel at `(x, y)` as `0x00RRGGBB`.  Out-of-range positions
    /// read as black.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> u32 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        let start = y as usize * self.stride + x as usize * self.bytes_per_pixel;
        let bytes = &self.data[start..start + self.bytes_per_pixel];
        let packed = match self.byte_order {
            ByteOrder::LsbFirst => bytes
                .iter()
                .rev()
                .fold(0u32, |acc, &b| (acc << 8) | u32::from(b)),
            ByteOrder::MsbFirst => bytes.iter().fold(0u32, |acc, &b| (acc << 8) | u32::from(b)),
        };
        self.layout.to_xrgb(packed)
    }

    /// Converts the whole frame into a row-major `0x00RRGGBB` buffer.
    pub fn to_xrgb(&self) -> Vec<u32> {
        let mut out = Vec::with_capacity(self.width as usize * self.height as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                out.push(self.pixel(x, y));
            }
        }
        out
    }
}

/// Nearest-neighbour stretch of a row-major `src` image into `dst`.
///
/// `dst` must hold at least `dst_w * dst_h` pixels; extra pixels are left
/// untouched.  Nothing is written when either image is empty.
pub fn stretch_nearest(src: &[u32], src_w: u32, src_h: u32, dst: &mut [u32], dst_w: u32, dst_h: u32) {
    let (sw, sh) = (src_w as usize, src_h as usize);
    let (dw, dh) = (dst_w as usize, dst_h as usize);
    if sw == 0 || sh == 0 || dw == 0 || dh == 0 || src.len() < sw * sh || dst.len() < dw * dh {
        return;
    }

    let columns: Vec<usize> = (0..dw).map(|dx| dx * sw / dw).collect();
    for (dy, row) in dst.chunks_exact_mut(dw).take(dh).enumerate() {
        let src_row = &src[(dy * sh / dh) * sw..][..sw];
        for (out, &sx) in row.iter_mut().zip(&columns) {
            *out = src_row[sx];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(buffer: Vec<u8>, width: u32, height: u32, bpp: u32, stride: usize) -> FrameSnapshot<Vec<u8>> {
        FrameSnapshot {
            buffer,
            width,
            height,
            bits_per_pixel: bpp,
            stride,
            byte_order: ByteOrder::LsbFirst,
        }
    }

    #[test]
    fn test_wrap_32_bit_lsb_frame_reads_bgra_bytes() {
        // Arrange
        let frame = snapshot(vec![0x56, 0x34, 0x12, 0xFF, 0x00, 0x00, 0xFF, 0x00], 2, 1, 32, 8);

        // Act
        let drawable = Drawable::wrap(&frame).unwrap();

        // Assert
        assert_eq!(drawable.pixel(0, 0), 0x0012_3456);
        assert_eq!(drawable.pixel(1, 0), 0x00FF_0000);
    }

    #[test]
    fn test_msb_first_frame_reverses_byte_order() {
        let mut frame = snapshot(vec![0xFF, 0x12, 0x34, 0x56], 1, 1, 32, 4);
        frame.byte_order = ByteOrder::MsbFirst;

        let drawable = Drawable::wrap(&frame).unwrap();

        assert_eq!(drawable.pixel(0, 0), 0x0012_3456);
    }

    #[test]
    fn test_wrap_honours_padded_stride() {
        // Two rows of one 16-bit pixel, each row padded to 4 bytes.
        let frame = snapshot(vec![0x00, 0xF8, 0xAA, 0xAA, 0x1F, 0x00, 0xAA, 0xAA], 1, 2, 16, 4);

        let drawable = Drawable::wrap(&frame).unwrap();

        assert_eq!(drawable.pixel(0, 0), 0x00FF_0000);
        assert_eq!(drawable.pixel(0, 1), 0x0000_00FF);
    }

    #[test]
    fn test_depth_8_still_wraps_with_32_bit_layout() {
        let frame = snapshot(vec![0x80; 4], 2, 2, 8, 2);

        let drawable = Drawable::wrap(&frame).unwrap();

        assert_eq!(drawable.layout(), ChannelLayout::ARGB32);
        assert_eq!(drawable.to_xrgb().len(), 4);
    }

    #[test]
    fn test_empty_frame_is_refused() {
        let frame = snapshot(Vec::new(), 0, 10, 32, 0);
        assert_eq!(
            Drawable::wrap(&frame).unwrap_err(),
            WrapError::Empty {
                width: 0,
                height: 10
            }
        );
    }

    #[test]
    fn test_short_stride_is_refused() {
        let frame = snapshot(vec![0; 64], 4, 4, 32, 12);
        assert_eq!(
            Drawable::wrap(&frame).unwrap_err(),
            WrapError::StrideTooSmall {
                stride: 12,
                row_bytes: 16
            }
        );
    }

    #[test]
    fn test_short_buffer_is_refused() {
        let frame = snapshot(vec![0; 30], 4, 2, 32, 16);
        assert_eq!(
            Drawable::wrap(&frame).unwrap_err(),
            WrapError::BufferTooShort {
                len: 30,
                required: 32
            }
        );
    }

    #[test]
    fn test_last_row_needs_no_padding() {
        let frame = snapshot(vec![0; 24], 2, 2, 32, 16);
        assert!(Drawable::wrap(&frame).is_ok());
    }

    #[test]
    fn test_out_of_range_pixel_reads_black() {
        let frame = snapshot(vec![0xFF; 4], 1, 1, 32, 4);
        let drawable = Drawable::wrap(&frame).unwrap();
        assert_eq!(drawable.pixel(1, 0), 0);
        assert_eq!(drawable.pixel(0, 1), 0);
    }

    #[test]
    fn test_stretch_doubles_each_pixel() {
        let src = [1, 2, 3, 4];
        let mut dst = [0u32; 16];

        stretch_nearest(&src, 2, 2, &mut dst, 4, 4);

        assert_eq!(dst, [1, 1, 2, 2, 1, 1, 2, 2, 3, 3, 4, 4, 3, 3, 4, 4]);
    }

    #[test]
    fn test_stretch_halves_by_sampling() {
        let src: Vec<u32> = (0..16).collect();
        let mut dst = [0u32; 4];

        stretch_nearest(&src, 4, 4, &mut dst, 2, 2);

        assert_eq!(dst, [0, 2, 8, 10]);
    }

    #[test]
    fn test_stretch_ignores_undersized_destination() {
        let src = [7u32; 4];
        let mut dst = [0u32; 3];

        stretch_nearest(&src, 2, 2, &mut dst, 2, 2);

        assert_eq!(dst, [0, 0, 0]);
    }
}
