//! Key and button translation tables.
//!
//! The local side speaks [`LocalKey`] / [`LocalButton`]; the target side
//! speaks X11 KeySyms and button numbers.  Translation happens exactly once,
//! in the event translator, right before synthesis.

pub mod linux_x11;
pub mod local;

use std::fmt;

pub use local::{LocalButton, LocalKey};

/// An X11 KeySym value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySym(pub u32);

impl fmt::Display for KeySym {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06X}", self.0)
    }
}

/// An X11 pointer button number (1 = left, 2 = middle, 3 = right,
/// 4 / 5 = wheel up / down).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetButton(pub u8);

impl TargetButton {
    pub const SCROLL_UP: TargetButton = TargetButton(linux_x11::SCROLL_UP_BUTTON);
    pub const SCROLL_DOWN: TargetButton = TargetButton(linux_x11::SCROLL_DOWN_BUTTON);
}

/// Unified key mapper providing both translation directions the mirror needs.
pub struct KeyMapper;

impl KeyMapper {
    /// Translates a [`LocalKey`] to the KeySym sent to the target.
    ///
    /// Returns `None` for any key outside the supported table.
    pub fn translate(key: LocalKey) -> Option<KeySym> {
        linux_x11::key_to_keysym(key).map(KeySym)
    }

    /// Translates a [`LocalButton`] to the target's button number.
    ///
    /// Returns `None` for anything other than left, middle or right.
    pub fn translate_button(button: LocalButton) -> Option<TargetButton> {
        linux_x11::button_to_x11(button).map(TargetButton)
    }
}
