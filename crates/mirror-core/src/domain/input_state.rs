//! Press/release state for keys and pointer buttons.
//!
//! # The dedup rule (for beginners)
//!
//! Windowing systems repeat key-down events while a key is held (auto-repeat)
//! and occasionally deliver a release for a key the application never saw go
//! down (for example when focus changes mid-press).  Forwarding those blindly
//! would make the target see "A down, A down, A down" or a stray "A up".
//!
//! The tracker remembers the last state forwarded for every key.  The event
//! translator only forwards an event when it *changes* that state:
//!
//! | tracked | event | forwarded? |
//! |---------|-------|------------|
//! | up      | down  | yes        |
//! | down    | down  | no         |
//! | down    | up    | yes        |
//! | up      | up    | no         |
//!
//! Pointer buttons follow the same rule with a fixed three-slot state.

use std::collections::HashMap;
use std::fmt;

use crate::keymap::local::{LocalButton, LocalKey};

/// Per-key pressed flags, created lazily on first observation.
///
/// Lookups of a key that was never observed report "released".
#[derive(Debug, Default)]
pub struct KeyStateTracker {
    states: HashMap<LocalKey, bool>,
}

impl KeyStateTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `pressed` for `key`, inserting or overwriting the entry.
    pub fn set(&mut self, key: LocalKey, pressed: bool) {
        self.states.insert(key, pressed);
    }

    /// Returns the tracked state, or `false` if `key` was never observed.
    pub fn get(&self, key: LocalKey) -> bool {
        self.states.get(&key).copied().unwrap_or(false)
    }

    /// Iterates over keys currently tracked as pressed, in no particular order.
    pub fn pressed_keys(&self) -> impl Iterator<Item = LocalKey> + '_ {
        self.states
            .iter()
            .filter(|&(_, &pressed)| pressed)
            .map(|(&key, _)| key)
    }

    /// Every key still held, sorted so callers get a deterministic release order.
    pub fn held_keys(&self) -> Vec<LocalKey> {
        let mut keys: Vec<LocalKey> = self.pressed_keys().collect();
        keys.sort_unstable();
        keys
    }

    /// Derives the current ctrl/shift/alt state (left OR right).
    pub fn modifiers(&self) -> ModifierSnapshot {
        ModifierSnapshot {
            ctrl: self.get(LocalKey::ControlLeft) || self.get(LocalKey::ControlRight),
            shift: self.get(LocalKey::ShiftLeft) || self.get(LocalKey::ShiftRight),
            alt: self.get(LocalKey::AltLeft) || self.get(LocalKey::AltRight),
        }
    }

    /// Lists modifier combos currently held.
    ///
    /// For every pressed non-modifier key, `ctrl+shift+<key>` is reported when
    /// ctrl and shift are both held, and independently `ctrl+alt+<key>` when
    /// ctrl and alt are both held.  Results are ordered by key, then kind.
    pub fn active_combos(&self) -> Vec<ComboNotification> {
        let mods = self.modifiers();
        if !mods.ctrl || !(mods.shift || mods.alt) {
            return Vec::new();
        }

        let mut keys: Vec<LocalKey> = self.pressed_keys().filter(|k| !k.is_modifier()).collect();
        keys.sort_unstable();

        let mut combos = Vec::new();
        for key in keys {
            if mods.shift {
                combos.push(ComboNotification {
                    kind: ComboKind::CtrlShift,
                    key,
                });
            }
            if mods.alt {
                combos.push(ComboNotification {
                    kind: ComboKind::CtrlAlt,
                    key,
                });
            }
        }
        combos
    }

    /// Number of distinct keys observed so far.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns `true` if no key has been observed.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.states.clear();
    }
}

/// Ctrl/shift/alt state at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModifierSnapshot {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

/// Which modifier pair a combo notification was raised for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComboKind {
    CtrlShift,
    CtrlAlt,
}

/// An observational "ctrl+shift+A"-style notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComboNotification {
    pub kind: ComboKind,
    pub key: LocalKey,
}

impl fmt::Display for ComboNotification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.kind {
            ComboKind::CtrlShift => "ctrl+shift",
            ComboKind::CtrlAlt => "ctrl+alt",
        };
        write!(f, "{prefix}+{}", self.key)
    }
}

/// Pressed flags for the three forwarded pointer buttons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonState {
    pub left: bool,
    pub middle: bool,
    pub right: bool,
}

impl ButtonState {
    /// Returns the tracked state of `button`; buttons outside the three
    /// forwarded ones always read as released.
    pub fn get(&self, button: LocalButton) -> bool {
        match button {
            LocalButton::Left => self.left,
            LocalButton::Middle => self.middle,
            LocalButton::Right => self.right,
            _ => false,
        }
    }

    /// Records `pressed` for `button`.
    ///
    /// Returns `true` if the stored state changed.  Untracked buttons never
    /// change state.
    pub fn set(&mut self, button: LocalButton, pressed: bool) -> bool {
        let slot = match button {
            LocalButton::Left => &mut self.left,
            LocalButton::Middle => &mut self.middle,
            LocalButton::Right => &mut self.right,
            _ => return false,
        };
        let changed = *slot != pressed;
        *slot = pressed;
        changed
    }

    /// Returns `true` while at least one button is held.
    pub fn any_pressed(&self) -> bool {
        self.left || self.middle || self.right
    }

    /// The buttons currently held, left to right.
    pub fn held(&self) -> Vec<LocalButton> {
        [
            (LocalButton::Left, self.left),
            (LocalButton::Middle, self.middle),
            (LocalButton::Right, self.right),
        ]
        .into_iter()
        .filter_map(|(button, pressed)| pressed.then_some(button))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn combo(kind: ComboKind, key: LocalKey) -> ComboNotification {
        ComboNotification { kind, key }
    }

    #[test]
    fn test_unobserved_key_reads_released() {
        let tracker = KeyStateTracker::new();
        assert!(!tracker.get(LocalKey::KeyA));
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_set_overwrites_existing_entry() {
        // Arrange
        let mut tracker = KeyStateTracker::new();

        // Act
        tracker.set(LocalKey::KeyA, true);
        tracker.set(LocalKey::KeyA, false);

        // Assert
        assert!(!tracker.get(LocalKey::KeyA));
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_held_keys_lists_only_pressed_keys_in_order() {
        let mut tracker = KeyStateTracker::new();
        tracker.set(LocalKey::ShiftLeft, true);
        tracker.set(LocalKey::KeyB, true);
        tracker.set(LocalKey::KeyA, true);
        tracker.set(LocalKey::KeyC, false);

        assert_eq!(
            tracker.held_keys(),
            vec![LocalKey::KeyA, LocalKey::KeyB, LocalKey::ShiftLeft]
        );
    }

    #[test]
    fn test_modifiers_accept_either_side() {
        let mut tracker = KeyStateTracker::new();
        tracker.set(LocalKey::ControlRight, true);
        tracker.set(LocalKey::AltLeft, true);

        assert_eq!(
            tracker.modifiers(),
            ModifierSnapshot {
                ctrl: true,
                shift: false,
                alt: true
            }
        );
    }

    #[test]
    fn test_ctrl_shift_a_yields_only_ctrl_shift_combo() {
        // Arrange
        let mut tracker = KeyStateTracker::new();
        tracker.set(LocalKey::ControlLeft, true);
        tracker.set(LocalKey::ShiftLeft, true);
        tracker.set(LocalKey::KeyA, true);

        // Act
        let combos = tracker.active_combos();

        // Assert
        assert_eq!(combos, vec![combo(ComboKind::CtrlShift, LocalKey::KeyA)]);
        assert_eq!(combos[0].to_string(), "ctrl+shift+A");
    }

    #[test]
    fn test_ctrl_shift_alt_a_yields_both_combos() {
        let mut tracker = KeyStateTracker::new();
        for key in [
            LocalKey::ControlLeft,
            LocalKey::ShiftRight,
            LocalKey::AltLeft,
            LocalKey::KeyA,
        ] {
            tracker.set(key, true);
        }

        let combos = tracker.active_combos();

        assert_eq!(
            combos,
            vec![
                combo(ComboKind::CtrlShift, LocalKey::KeyA),
                combo(ComboKind::CtrlAlt, LocalKey::KeyA),
            ]
        );
        assert_eq!(combos[1].to_string(), "ctrl+alt+A");
    }

    #[test]
    fn test_no_combo_without_ctrl() {
        let mut tracker = KeyStateTracker::new();
        tracker.set(LocalKey::ShiftLeft, true);
        tracker.set(LocalKey::AltLeft, true);
        tracker.set(LocalKey::KeyA, true);

        assert!(tracker.active_combos().is_empty());
    }

    #[test]
    fn test_modifiers_alone_produce_no_combo() {
        let mut tracker = KeyStateTracker::new();
        tracker.set(LocalKey::ControlLeft, true);
        tracker.set(LocalKey::ShiftLeft, true);

        assert!(tracker.active_combos().is_empty());
    }

    #[test]
    fn test_right_alt_counts_as_alt() {
        let mut tracker = KeyStateTracker::new();
        tracker.set(LocalKey::ControlLeft, true);
        tracker.set(LocalKey::AltRight, true);
        tracker.set(LocalKey::Delete, true);

        let combos = tracker.active_combos();

        assert_eq!(combos, vec![combo(ComboKind::CtrlAlt, LocalKey::Delete)]);
        assert_eq!(combos[0].to_string(), "ctrl+alt+Delete");
    }

    #[test]
    fn test_clear_drops_every_entry() {
        let mut tracker = KeyStateTracker::new();
        tracker.set(LocalKey::KeyA, true);
        tracker.set(LocalKey::KeyB, false);

        tracker.clear();

        assert!(tracker.is_empty());
        assert!(!tracker.get(LocalKey::KeyA));
    }

    #[test]
    fn test_button_set_reports_transitions_only() {
        let mut buttons = ButtonState::default();

        assert!(buttons.set(LocalButton::Left, true));
        assert!(!buttons.set(LocalButton::Left, true));
        assert!(buttons.set(LocalButton::Left, false));
        assert!(!buttons.set(LocalButton::Left, false));
    }

    #[test]
    fn test_untracked_buttons_never_change_state() {
        let mut buttons = ButtonState::default();

        assert!(!buttons.set(LocalButton::Back, true));
        assert!(!buttons.get(LocalButton::Back));
        assert!(!buttons.any_pressed());
    }

    #[test]
    fn test_held_buttons_are_listed_left_to_right() {
        let mut buttons = ButtonState::default();
        buttons.set(LocalButton::Right, true);
        buttons.set(LocalButton::Left, true);

        assert!(buttons.any_pressed());
        assert_eq!(buttons.held(), vec![LocalButton::Left, LocalButton::Right]);
    }
}
