//! Linux X11 target display: XGetImage capture and XTest input synthesis.
//!
//! # What is XTest? (for beginners)
//!
//! XTest is an X11 protocol extension that lets a client synthesize keyboard
//! and pointer events as if they came from real hardware.  The receiving
//! applications cannot tell them apart from physical input.
//!
//! | call                                         | effect                          |
//! |----------------------------------------------|---------------------------------|
//! | `XTestFakeKeyEvent(dpy, keycode, press, 0)`  | press / release one key         |
//! | `XTestFakeButtonEvent(dpy, button, press, 0)`| press / release one button      |
//! | `XWarpPointer(dpy, 0, root, .., x, y)`       | move the pointer to `(x, y)`    |
//! | `XFlush(dpy)`                                | send everything queued so far   |
//!
//! `XTestFakeKeyEvent` takes a hardware *keycode*, not a KeySym.  The server's
//! keyboard mapping decides which keycode (if any) produces a KeySym:
//!
//! ```text
//! LocalKey → KeySym (mirror-core table) → XKeysymToKeycode(dpy, keysym) → keycode
//! ```
//!
//! A keycode of 0 means the target's keymap cannot produce that KeySym; it is
//! reported as [`EmulationError::UnsupportedKey`] and treated like an
//! unmapped key.
//!
//! # Capture
//!
//! `XGetImage(.., ZPixmap)` copies the whole root window into a client-side
//! `XImage`.  The image is wrapped in [`XImageBuffer`], which owns it and
//! calls `XDestroyImage` on drop, so a snapshot releases its pixels the moment
//! it goes out of scope.

use std::ffi::CString;
use std::os::raw::{c_int, c_uint};

use mirror_core::{ByteOrder, FrameSnapshot, KeySym, TargetButton};
use tracing::info;
use x11::{xlib, xtest};

use super::TargetError;
use crate::application::present_frame::{CaptureError, FrameSource};
use crate::application::translate_input::{EmulationError, InputSynthesizer};

/// `CurrentTime` / zero delay for XTest calls.
const NO_DELAY: std::os::raw::c_ulong = 0;

/// An open connection to an X display with XTest available.
pub struct X11TargetDisplay {
    display: *mut xlib::Display,
    root: xlib::Window,
    width: u32,
    height: u32,
}

impl X11TargetDisplay {
    /// Opens `name` (e.g. `":99"`) and checks for XTest.
    ///
    /// # Errors
    ///
    /// Returns [`TargetError`] if the name contains a NUL byte, the display
    /// cannot be opened, XTest is missing, or the screen is empty.
    pub fn open(name: &str) -> Result<Self, TargetError> {
        let c_name = CString::new(name).map_err(|_| TargetError::InvalidName(name.to_string()))?;

        // SAFETY: `c_name` is a valid NUL-terminated string for the duration
        // of the call.  A non-null result must be closed with XCloseDisplay,
        // which `Drop` does.
        let display = unsafe { xlib::XOpenDisplay(c_name.as_ptr()) };
        if display.is_null() {
            return Err(TargetError::Open(name.to_string()));
        }

        // From here on `target` owns the connection and closes it on any early return.
        let mut target = Self {
            display,
            root: 0,
            width: 0,
            height: 0,
        };

        let (mut event_base, mut error_base, mut major, mut minor) = (0, 0, 0, 0);
        // SAFETY: `display` is valid; the out-pointers reference live locals.
        let has_xtest = unsafe {
            xtest::XTestQueryExtension(
                display,
                &mut event_base,
                &mut error_base,
                &mut major,
                &mut minor,
            )
        };
        if has_xtest == 0 {
            return Err(TargetError::MissingXTest(name.to_string()));
        }

        // SAFETY: `display` is valid; the default screen index comes from the server.
        let (width, height, root) = unsafe {
            let screen = xlib::XDefaultScreen(display);
            (
                xlib::XDisplayWidth(display, screen),
                xlib::XDisplayHeight(display, screen),
                xlib::XDefaultRootWindow(display),
            )
        };
        if width <= 0 || height <= 0 {
            return Err(TargetError::EmptyScreen(name.to_string()));
        }

        target.root = root;
        target.width = width as u32;
        target.height = height as u32;
        info!(
            display = name,
            width = target.width,
            height = target.height,
            xtest_major = major,
            xtest_minor = minor,
            "target display opened"
        );
        Ok(target)
    }

    fn check(status: c_int, what: &str) -> Result<(), EmulationError> {
        if status == 0 {
            Err(EmulationError::Platform(format!("{what} was rejected")))
        } else {
            Ok(())
        }
    }
}

impl Drop for X11TargetDisplay {
    fn drop(&mut self) {
        // SAFETY: `display` came from XOpenDisplay and is closed exactly once.
        unsafe { xlib::XCloseDisplay(self.display) };
    }
}

impl InputSynthesizer for X11TargetDisplay {
    fn key_event(&self, keysym: KeySym, pressed: bool) -> Result<(), EmulationError> {
        // SAFETY: `display` is valid for the lifetime of `self`.
        let keycode =
            unsafe { xlib::XKeysymToKeycode(self.display, xlib::KeySym::from(keysym.0)) };
        if keycode == 0 {
            return Err(EmulationError::UnsupportedKey(keysym));
        }
        // SAFETY: as above; `keycode` is one the server just reported.
        let status = unsafe {
            xtest::XTestFakeKeyEvent(
                self.display,
                c_uint::from(keycode),
                c_int::from(pressed),
                NO_DELAY,
            )
        };
        Self::check(status, "XTestFakeKeyEvent")
    }

    fn button_event(&self, button: TargetButton, pressed: bool) -> Result<(), EmulationError> {
        // SAFETY: `display` is valid for the lifetime of `self`.
        let status = unsafe {
            xtest::XTestFakeButtonEvent(
                self.display,
                c_uint::from(button.0),
                c_int::from(pressed),
                NO_DELAY,
            )
        };
        Self::check(status, "XTestFakeButtonEvent")
    }

    fn warp_pointer(&self, x: i32, y: i32) -> Result<(), EmulationError> {
        // SAFETY: `display` and `root` are valid for the lifetime of `self`.
        // A zero source window warps relative to `root` unconditionally.
        unsafe { xlib::XWarpPointer(self.display, 0, self.root, 0, 0, 0, 0, x, y) };
        Ok(())
    }

    fn flush(&self) -> Result<(), EmulationError> {
        // SAFETY: `display` is valid for the lifetime of `self`.
        unsafe { xlib::XFlush(self.display) };
        Ok(())
    }
}

/// Owns an `XImage` returned by `XGetImage`.
pub struct XImageBuffer {
    image: *mut xlib::XImage,
    len: usize,
}

impl AsRef<[u8]> for XImageBuffer {
    fn as_ref(&self) -> &[u8] {
        // SAFETY: `image` is non-null and its `data` holds `len` bytes
        // (bytes_per_line * height) until XDestroyImage runs in `drop`.
        unsafe { std::slice::from_raw_parts((*self.image).data.cast::<u8>(), self.len) }
    }
}

impl Drop for XImageBuffer {
    fn drop(&mut self) {
        // SAFETY: `image` came from XGetImage and is destroyed exactly once.
        unsafe { xlib::XDestroyImage(self.image) };
    }
}

impl FrameSource for X11TargetDisplay {
    type Buffer = XImageBuffer;

    fn screen_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn capture(&self) -> Result<FrameSnapshot<XImageBuffer>, CaptureError> {
        // SAFETY: `display` and `root` are valid; the requested rectangle is
        // the full root window as reported at open time.
        let image = unsafe {
            xlib::XGetImage(
                self.display,
                self.root,
                0,
                0,
                self.width,
                self.height,
                xlib::XAllPlanes(),
                xlib::ZPixmap,
            )
        };
        if image.is_null() {
            return Err(CaptureError::NoImage);
        }

        // SAFETY: `image` is non-null and was just filled in by XGetImage.
        let (width, height, stride, bits_per_pixel, byte_order, has_data) = unsafe {
            let img = &*image;
            (
                img.width,
                img.height,
                img.bytes_per_line,
                img.bits_per_pixel,
                img.byte_order,
                !img.data.is_null(),
            )
        };
        let len = stride.max(0) as usize * height.max(0) as usize;
        // Owned from here so every error path below destroys the image.
        let buffer = XImageBuffer { image, len };

        if !has_data || width <= 0 || height <= 0 || stride <= 0 {
            return Err(CaptureError::Platform(format!(
                "XGetImage returned an unusable {width}x{height} image (stride {stride})"
            )));
        }

        Ok(FrameSnapshot {
            buffer,
            width: width as u32,
            height: height as u32,
            bits_per_pixel: bits_per_pixel.max(0) as u32,
            stride: stride as usize,
            byte_order: if byte_order == xlib::MSBFirst {
                ByteOrder::MsbFirst
            } else {
                ByteOrder::LsbFirst
            },
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
