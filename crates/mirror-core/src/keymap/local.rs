//! Local input identifiers as reported by the display surface.
//!
//! [`LocalKey`] names physical key positions on the *viewer's* keyboard.  The
//! windowing adapter converts whatever its toolkit reports into these values;
//! keys the adapter recognises but the mirror has no name for are carried as
//! [`LocalKey::Other`] with the platform scan code, so they can still be
//! tracked and logged even though they never reach the target.
//!
//! Keys have a stable textual name (`"A"`, `"Escape"`, `"ShiftLeft"`) used in
//! combo notifications and in the configuration file.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a key name in configuration is not recognised.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown key name: {0:?}")]
pub struct KeyNameError(pub String);

/// A key on the local keyboard, identified by its physical position.
///
/// The `Ord` impl follows declaration order and is used only to keep combo
/// notifications in a stable order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LocalKey {
    KeyA,
    KeyB,
    KeyC,
    KeyD,
    KeyE,
    KeyF,
    KeyG,
    KeyH,
    KeyI,
    KeyJ,
    KeyK,
    KeyL,
    KeyM,
    KeyN,
    KeyO,
    KeyP,
    KeyQ,
    KeyR,
    KeyS,
    KeyT,
    KeyU,
    KeyV,
    KeyW,
    KeyX,
    KeyY,
    KeyZ,

    Digit0,
    Digit1,
    Digit2,
    Digit3,
    Digit4,
    Digit5,
    Digit6,
    Digit7,
    Digit8,
    Digit9,

    Space,
    Enter,
    Escape,
    Backspace,
    Delete,
    Tab,

    ControlLeft,
    ControlRight,
    ShiftLeft,
    ShiftRight,
    AltLeft,
    AltRight,

    // Recognised by the surface but outside the mapping table.
    MetaLeft,
    MetaRight,
    CapsLock,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,

    /// Any other key, identified by the platform scan code.
    Other(u32),
}

/// Every named key, in declaration order.  `Other` is not included.
const NAMED_KEYS: &[LocalKey] = &[
    LocalKey::KeyA,
    LocalKey::KeyB,
    LocalKey::KeyC,
    LocalKey::KeyD,
    LocalKey::KeyE,
    LocalKey::KeyF,
    LocalKey::KeyG,
    LocalKey::KeyH,
    LocalKey::KeyI,
    LocalKey::KeyJ,
    LocalKey::KeyK,
    LocalKey::KeyL,
    LocalKey::KeyM,
    LocalKey::KeyN,
    LocalKey::KeyO,
    LocalKey::KeyP,
    LocalKey::KeyQ,
    LocalKey::KeyR,
    LocalKey::KeyS,
    LocalKey::KeyT,
    LocalKey::KeyU,
    LocalKey::KeyV,
    LocalKey::KeyW,
    LocalKey::KeyX,
    LocalKey::KeyY,
    LocalKey::KeyZ,
    LocalKey::Digit0,
    LocalKey::Digit1,
    LocalKey::Digit2,
    LocalKey::Digit3,
    LocalKey::Digit4,
    LocalKey::Digit5,
    LocalKey::Digit6,
    LocalKey::Digit7,
    LocalKey::Digit8,
    LocalKey::Digit9,
    LocalKey::Space,
    LocalKey::Enter,
    LocalKey::Escape,
    LocalKey::Backspace,
    LocalKey::Delete,
    LocalKey::Tab,
    LocalKey::ControlLeft,
    LocalKey::ControlRight,
    LocalKey::ShiftLeft,
    LocalKey::ShiftRight,
    LocalKey::AltLeft,
    LocalKey::AltRight,
    LocalKey::MetaLeft,
    LocalKey::MetaRight,
    LocalKey::CapsLock,
    LocalKey::ArrowLeft,
    LocalKey::ArrowRight,
    LocalKey::ArrowUp,
    LocalKey::ArrowDown,
    LocalKey::F1,
    LocalKey::F2,
    LocalKey::F3,
    LocalKey::F4,
    LocalKey::F5,
    LocalKey::F6,
    LocalKey::F7,
    LocalKey::F8,
    LocalKey::F9,
    LocalKey::F10,
    LocalKey::F11,
    LocalKey::F12,
];

impl LocalKey {
    /// Returns `true` for the six keys that feed the [`ModifierSnapshot`].
    ///
    /// [`ModifierSnapshot`]: crate::domain::input_state::ModifierSnapshot
    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            LocalKey::ControlLeft
                | LocalKey::ControlRight
                | LocalKey::ShiftLeft
                | LocalKey::ShiftRight
                | LocalKey::AltLeft
                | LocalKey::AltRight
        )
    }

    /// Iterates over every named key (everything except [`LocalKey::Other`]).
    pub fn named() -> impl Iterator<Item = LocalKey> {
        NAMED_KEYS.iter().copied()
    }

    /// The stable name of a named key, or `None` for [`LocalKey::Other`].
    fn name(self) -> Option<&'static str> {
        let name = match self {
            LocalKey::KeyA => "A",
            LocalKey::KeyB => "B",
            LocalKey::KeyC => "C",
            LocalKey::KeyD => "D",
            LocalKey::KeyE => "E",
            LocalKey::KeyF => "F",
            LocalKey::KeyG => "G",
            LocalKey::KeyH => "H",
            LocalKey::KeyI => "I",
            LocalKey::KeyJ => "J",
            LocalKey::KeyK => "K",
            LocalKey::KeyL => "L",
            LocalKey::KeyM => "M",
            LocalKey::KeyN => "N",
            LocalKey::KeyO => "O",
            LocalKey::KeyP => "P",
            LocalKey::KeyQ => "Q",
            LocalKey::KeyR => "R",
            LocalKey::KeyS => "S",
            LocalKey::KeyT => "T",
            LocalKey::KeyU => "U",
            LocalKey::KeyV => "V",
            LocalKey::KeyW => "W",
            LocalKey::KeyX => "X",
            LocalKey::KeyY => "Y",
            LocalKey::KeyZ => "Z",
            LocalKey::Digit0 => "0",
            LocalKey::Digit1 => "1",
            LocalKey::Digit2 => "2",
            LocalKey::Digit3 => "3",
            LocalKey::Digit4 => "4",
            LocalKey::Digit5 => "5",
            LocalKey::Digit6 => "6",
            LocalKey::Digit7 => "7",
            LocalKey::Digit8 => "8",
            LocalKey::Digit9 => "9",
            LocalKey::Space => "Space",
            LocalKey::Enter => "Enter",
            LocalKey::Escape => "Escape",
            LocalKey::Backspace => "Backspace",
            LocalKey::Delete => "Delete",
            LocalKey::Tab => "Tab",
            LocalKey::ControlLeft => "ControlLeft",
            LocalKey::ControlRight => "ControlRight",
            LocalKey::ShiftLeft => "ShiftLeft",
            LocalKey::ShiftRight => "ShiftRight",
            LocalKey::AltLeft => "AltLeft",
            LocalKey::AltRight => "AltRight",
            LocalKey::MetaLeft => "MetaLeft",
            LocalKey::MetaRight => "MetaRight",
            LocalKey::CapsLock => "CapsLock",
            LocalKey::ArrowLeft => "ArrowLeft",
            LocalKey::ArrowRight => "ArrowRight",
            LocalKey::ArrowUp => "ArrowUp",
            LocalKey::ArrowDown => "ArrowDown",
            LocalKey::F1 => "F1",
            LocalKey::F2 => "F2",
            LocalKey::F3 => "F3",
            LocalKey::F4 => "F4",
            LocalKey::F5 => "F5",
            LocalKey::F6 => "F6",
            LocalKey::F7 => "F7",
            LocalKey::F8 => "F8",
            LocalKey::F9 => "F9",
            LocalKey::F10 => "F10",
            LocalKey::F11 => "F11",
            LocalKey::F12 => "F12",
            LocalKey::Other(_) => return None,
        };
        Some(name)
    }
}

impl fmt::Display for LocalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.name(), self) {
            (Some(name), _) => f.write_str(name),
            (None, LocalKey::Other(code)) => write!(f, "Scan{code:#06X}"),
            (None, _) => unreachable!("only Other has no name"),
        }
    }
}

impl FromStr for LocalKey {
    type Err = KeyNameError;

    /// Parses a key name case-insensitively.  Letters and digits may also be
    /// written as `"KeyA"` / `"Digit1"`; `"Return"` and `"Esc"` are accepted
    /// as aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let normalised = match trimmed.to_ascii_lowercase().as_str() {
            "return" => "enter".to_string(),
            "esc" => "escape".to_string(),
            other => other
                .strip_prefix("key")
                .or_else(|| other.strip_prefix("digit"))
                .filter(|rest| rest.len() == 1)
                .unwrap_or(other)
                .to_string(),
        };

        NAMED_KEYS
            .iter()
            .copied()
            .find(|key| {
                key.name()
                    .is_some_and(|name| name.eq_ignore_ascii_case(&normalised))
            })
            .ok_or_else(|| KeyNameError(trimmed.to_string()))
    }
}

impl TryFrom<String> for LocalKey {
    type Error = KeyNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LocalKey> for String {
    fn from(key: LocalKey) -> Self {
        key.to_string()
    }
}

/// A button on the local pointing device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocalButton {
    Left,
    Middle,
    Right,
    Back,
    Forward,
    /// Any other button, by toolkit index.
    Other(u16),
}
