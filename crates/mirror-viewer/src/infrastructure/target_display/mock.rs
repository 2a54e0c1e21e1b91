//! Mock target display for unit and integration testing.
//!
//! # Why a mock target?
//!
//! The real adapter talks to an X server: it needs a running display, it
//! actually moves the pointer and presses keys there, and what it did cannot
//! be read back from test code.
//!
//! `MockTargetDisplay` replaces every X call with in-memory recording.  All
//! synthesized actions, flushes included, go into one ordered log so tests can
//! assert exact ordering:
//!
//! ```ignore
//! let target = MockTargetDisplay::new(1920, 1080);
//! use_case.handle_key(&target, LocalKey::KeyA, true)?;
//! assert_eq!(target.actions(), vec![Key(KeySym(0x61), true), Flush]);
//! ```
//!
//! Captures return scripted snapshots when any were pushed, otherwise a mid
//! grey 32-bit frame of the screen size.  Every snapshot buffer increments a
//! shared live counter and decrements it on drop, so tests can prove no
//! capture outlives its tick.
//!
//! # Failure flags
//!
//! Set `should_fail = true` to make every input call return
//! `EmulationError::Platform`, `fail_flush = true` to fail only flushes, or
//! `fail_capture = true` to make every capture fail.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use mirror_core::{ByteOrder, FrameSnapshot, KeySym, TargetButton};

use crate::application::present_frame::{CaptureError, FrameSource};
use crate::application::translate_input::{EmulationError, InputSynthesizer};

/// One recorded call on the mock target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntheticAction {
    Key(KeySym, bool),
    Button(TargetButton, bool),
    Warp(i32, i32),
    Flush,
}

/// Pixel buffer handed out by [`MockTargetDisplay::capture`].
#[derive(Debug)]
pub struct MockFrameBuffer {
    bytes: Vec<u8>,
    live: Arc<AtomicUsize>,
}

impl MockFrameBuffer {
    fn new(bytes: Vec<u8>, live: &Arc<AtomicUsize>) -> Self {
        live.fetch_add(1, Ordering::SeqCst);
        Self {
            bytes,
            live: Arc::clone(live),
        }
    }
}

impl AsRef<[u8]> for MockFrameBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl Drop for MockFrameBuffer {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Geometry of one scripted snapshot.
#[derive(Debug, Clone, Copy)]
struct ScriptedFrame {
    width: u32,
    height: u32,
    bits_per_pixel: u32,
}

/// A mock target display that records every call without touching X.
#[derive(Debug)]
pub struct MockTargetDisplay {
    width: u32,
    height: u32,
    actions: Mutex<Vec<SyntheticAction>>,
    unsupported: Mutex<Vec<KeySym>>,
    scripted: Mutex<VecDeque<ScriptedFrame>>,
    captures: AtomicUsize,
    live_snapshots: Arc<AtomicUsize>,
    /// When `true`, every input method returns `EmulationError::Platform`.
    pub should_fail: bool,
    /// When `true`, every capture returns `CaptureError::NoImage`.
    pub fail_capture: bool,
    /// When `true`, only `flush` fails; other calls are still recorded.
    pub fail_flush: bool,
}

impl MockTargetDisplay {
    /// Creates a mock with a `width` x `height` screen and empty records.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            actions: Mutex::new(Vec::new()),
            unsupported: Mutex::new(Vec::new()),
            scripted: Mutex::new(VecDeque::new()),
            captures: AtomicUsize::new(0),
            live_snapshots: Arc::new(AtomicUsize::new(0)),
            should_fail: false,
            fail_capture: false,
            fail_flush: false,
        }
    }

    /// Every recorded action, in call order.
    pub fn actions(&self) -> Vec<SyntheticAction> {
        self.actions.lock().unwrap().clone()
    }

    pub fn clear_actions(&self) {
        self.actions.lock().unwrap().clear();
    }

    /// Makes `key_event` report these KeySyms as having no keycode.
    pub fn set_unsupported_keysyms(&self, keysyms: Vec<KeySym>) {
        *self.unsupported.lock().unwrap() = keysyms;
    }

    /// Queues a snapshot geometry for the next capture.  Buffers are sized
    /// exactly for the geometry with no row padding.
    pub fn push_snapshot(&self, width: u32, height: u32, bits_per_pixel: u32) {
        self.scripted.lock().unwrap().push_back(ScriptedFrame {
            width,
            height,
            bits_per_pixel,
        });
    }

    /// Number of capture calls so far, failed ones included.
    pub fn captures(&self) -> usize {
        self.captures.load(Ordering::SeqCst)
    }

    /// Snapshot buffers currently alive.
    pub fn live_snapshots(&self) -> usize {
        self.live_snapshots.load(Ordering::SeqCst)
    }

    fn record(&self, action: SyntheticAction) -> Result<(), EmulationError> {
        if self.should_fail {
            return Err(EmulationError::Platform("injected failure".to_string()));
        }
        self.actions.lock().unwrap().push(action);
        Ok(())
    }
}

impl InputSynthesizer for MockTargetDisplay {
    fn key_event(&self, keysym: KeySym, pressed: bool) -> Result<(), EmulationError> {
        if self.unsupported.lock().unwrap().contains(&keysym) {
            return Err(EmulationError::UnsupportedKey(keysym));
        }
        self.record(SyntheticAction::Key(keysym, pressed))
    }

    fn button_event(&self, button: TargetButton, pressed: bool) -> Result<(), EmulationError> {
        self.record(SyntheticAction::Button(button, pressed))
    }

    fn warp_pointer(&self, x: i32, y: i32) -> Result<(), EmulationError> {
        self.record(SyntheticAction::Warp(x, y))
    }

    fn flush(&self) -> Result<(), EmulationError> {
        if self.fail_flush {
            return Err(EmulationError::Platform("injected flush failure".to_string()));
        }
        self.record(SyntheticAction::Flush)
    }
}

impl FrameSource for MockTargetDisplay {
    type Buffer = MockFrameBuffer;

    fn screen_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn capture(&self) -> Result<FrameSnapshot<MockFrameBuffer>, CaptureError> {
        self.captures.fetch_add(1, Ordering::SeqCst);
        if self.fail_capture {
            return Err(CaptureError::NoImage);
        }

        let frame = self.scripted.lock().unwrap().pop_front().unwrap_or(ScriptedFrame {
            width: self.width,
            height: self.height,
            bits_per_pixel: 32,
        });
        let bytes_per_pixel = mirror_core::bytes_per_pixel(frame.bits_per_pixel);
        let stride = frame.width as usize * bytes_per_pixel;
        let bytes = vec![0x80; stride * frame.height as usize];

        Ok(FrameSnapshot {
            buffer: MockFrameBuffer::new(bytes, &self.live_snapshots),
            width: frame.width,
            height: frame.height,
            bits_per_pixel: frame.bits_per_pixel,
            stride,
            byte_order: ByteOrder::LsbFirst,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
