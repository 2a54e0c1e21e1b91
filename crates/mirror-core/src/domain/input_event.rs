//! Events reported by the local display surface.

use crate::keymap::local::{LocalButton, LocalKey};

/// One local input or window event, already decoded from the windowing
/// toolkit.  Pointer positions are in window client-area pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalEvent {
    /// The user closed the window or the toolkit asked the application to exit.
    Quit,
    /// The client area changed size.
    Resized { width: u32, height: u32 },
    Key { key: LocalKey, pressed: bool },
    PointerMoved { x: i32, y: i32 },
    Button {
        button: LocalButton,
        pressed: bool,
        x: i32,
        y: i32,
    },
    /// Whole wheel notches; positive is away from the user (scroll up).
    Wheel { notches: i32 },
}
