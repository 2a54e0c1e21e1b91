//! Local key / button to X11 KeySym and button-number translation tables.
//!
//! X11 KeySym values are defined in X11/keysymdef.h.
//! Reference: https://gitlab.freedesktop.org/xorg/proto/xorgproto/-/blob/master/include/X11/keysymdef.h
//!
//! # What is an X11 KeySym? (for beginners)
//!
//! X11 identifies keys by **KeySym** (Key Symbol).  A KeySym names the symbol
//! printed on a key, not its position; the X server owns a keyboard mapping
//! that turns a KeySym into the hardware *keycode* XTest actually presses.
//!
//! | KeySym name    | Value  | Meaning         |
//! |----------------|--------|-----------------|
//! | `XK_a`         | 0x0061 | lowercase 'a'   |
//! | `XK_Return`    | 0xFF0D | Enter key       |
//! | `XK_Escape`    | 0xFF1B | Escape key      |
//! | `XK_Control_L` | 0xFFE3 | left Control    |
//!
//! Letters use their lowercase ASCII value.  The target applies Shift itself
//! when a Shift key is also held, so the base form is always sent.
//!
//! # Pointer buttons
//!
//! X11 numbers pointer buttons from 1.  Buttons 4 and 5 are not physical
//! buttons at all: a wheel notch up is a press+release of button 4, a notch
//! down is the same on button 5.
//!
//! The table is deliberately small.  Keys outside it are dropped before they
//! reach the key-state tracker, so they are never sent and never take part in
//! combo detection.

use super::local::{LocalButton, LocalKey};

/// Wheel-up logical button.
pub const SCROLL_UP_BUTTON: u8 = 4;
/// Wheel-down logical button.
pub const SCROLL_DOWN_BUTTON: u8 = 5;

/// The supported key set, as `(local key, X11 KeySym)` pairs.
pub static KEYSYM_TABLE: &[(LocalKey, u32)] = &[
    // Letters (X11 lowercase keysyms 0x61-0x7A)
    (LocalKey::KeyA, 0x0061), // XK_a
    (LocalKey::KeyB, 0x0062), // XK_b
    (LocalKey::KeyC, 0x0063), // XK_c
    (LocalKey::KeyD, 0x0064), // XK_d
    (LocalKey::KeyE, 0x0065), // XK_e
    (LocalKey::KeyF, 0x0066), // XK_f
    (LocalKey::KeyG, 0x0067), // XK_g
    (LocalKey::KeyH, 0x0068), // XK_h
    (LocalKey::KeyI, 0x0069), // XK_i
    (LocalKey::KeyJ, 0x006A), // XK_j
    (LocalKey::KeyK, 0x006B), // XK_k
    (LocalKey::KeyL, 0x006C), // XK_l
    (LocalKey::KeyM, 0x006D), // XK_m
    (LocalKey::KeyN, 0x006E), // XK_n
    (LocalKey::KeyO, 0x006F), // XK_o
    (LocalKey::KeyP, 0x0070), // XK_p
    (LocalKey::KeyQ, 0x0071), // XK_q
    (LocalKey::KeyR, 0x0072), // XK_r
    (LocalKey::KeyS, 0x0073), // XK_s
    (LocalKey::KeyT, 0x0074), // XK_t
    (LocalKey::KeyU, 0x0075), // XK_u
    (LocalKey::KeyV, 0x0076), // XK_v
    (LocalKey::KeyW, 0x0077), // XK_w
    (LocalKey::KeyX, 0x0078), // XK_x
    (LocalKey::KeyY, 0x0079), // XK_y
    (LocalKey::KeyZ, 0x007A), // XK_z
    // Digits (ASCII 0x30-0x39)
    (LocalKey::Digit0, 0x0030), // XK_0
    (LocalKey::Digit1, 0x0031), // XK_1
    (LocalKey::Digit2, 0x0032), // XK_2
    (LocalKey::Digit3, 0x0033), // XK_3
    (LocalKey::Digit4, 0x0034), // XK_4
    (LocalKey::Digit5, 0x0035), // XK_5
    (LocalKey::Digit6, 0x0036), // XK_6
    (LocalKey::Digit7, 0x0037), // XK_7
    (LocalKey::Digit8, 0x0038), // XK_8
    (LocalKey::Digit9, 0x0039), // XK_9
    // Editing
    (LocalKey::Space, 0x0020),     // XK_space
    (LocalKey::Enter, 0xFF0D),     // XK_Return
    (LocalKey::Escape, 0xFF1B),    // XK_Escape
    (LocalKey::Backspace, 0xFF08), // XK_BackSpace
    (LocalKey::Delete, 0xFFFF),    // XK_Delete
    (LocalKey::Tab, 0xFF09),       // XK_Tab
    // Modifiers
    (LocalKey::ControlLeft, 0xFFE3),  // XK_Control_L
    (LocalKey::ControlRight, 0xFFE4), // XK_Control_R
    (LocalKey::ShiftLeft, 0xFFE1),    // XK_Shift_L
    (LocalKey::ShiftRight, 0xFFE2),   // XK_Shift_R
    (LocalKey::AltLeft, 0xFFE9),      // XK_Alt_L
    (LocalKey::AltRight, 0xFFEA),     // XK_Alt_R
];

/// Translates a [`LocalKey`] to an X11 KeySym value.
///
/// Returns `None` if the key is outside [`KEYSYM_TABLE`].
pub fn key_to_keysym(key: LocalKey) -> Option<u32> {
    KEYSYM_TABLE
        .iter()
        .find(|(local, _)| *local == key)
        .map(|&(_, keysym)| keysym)
}

/// Translates a [`LocalButton`] to an X11 button number.
///
/// Only left, middle and right are forwarded; everything else returns `None`.
pub fn button_to_x11(button: LocalButton) -> Option<u8> {
    match button {
        LocalButton::Left => Some(1),
        LocalButton::Middle => Some(2),
        LocalButton::Right => Some(3),
        LocalButton::Back | LocalButton::Forward | LocalButton::Other(_) => None,
    }
}
