//! TranslateInputUseCase: turns local input events into synthesized target input.
//!
//! This use case sits at the application layer and delegates to an
//! [`InputSynthesizer`] for the actual injection.  The X11/XTest
//! implementation lives in the infrastructure layer.
//!
//! # Ordering and flushing
//!
//! Every group of synthesized actions is flushed before the handler returns,
//! so the target has received the event by the time the next local event is
//! looked at:
//!
//! | local event        | synthesized, in order                         |
//! |--------------------|-----------------------------------------------|
//! | key down / up      | key, flush                                    |
//! | pointer motion     | warp, flush                                   |
//! | button down / up   | warp, button, flush                           |
//! | wheel `n` notches  | `n` x (press, release, flush) on button 4 / 5 |
//! | drag re-issue      | warp, flush                                   |

use mirror_core::{
    ButtonState, ComboNotification, KeyMapper, KeyStateTracker, KeySym, LocalButton, LocalKey,
    TargetButton, ViewportGeometry,
};
use thiserror::Error;
use tracing::{debug, info, trace};

/// Error type for input synthesis operations.
#[derive(Debug, Error)]
pub enum EmulationError {
    /// The target has no keycode for this KeySym in its current keymap.
    #[error("target keymap has no keycode for keysym {0}")]
    UnsupportedKey(KeySym),
    #[error("platform error: {0}")]
    Platform(String),
}

/// Target-side input injection.
///
/// Implementations queue actions; nothing is guaranteed to reach the target
/// until [`flush`](InputSynthesizer::flush) returns.
pub trait InputSynthesizer {
    /// Synthesizes a key press or release.
    fn key_event(&self, keysym: KeySym, pressed: bool) -> Result<(), EmulationError>;

    /// Synthesizes a pointer button press or release at the current pointer position.
    fn button_event(&self, button: TargetButton, pressed: bool) -> Result<(), EmulationError>;

    /// Moves the pointer to absolute target screen coordinates.
    fn warp_pointer(&self, x: i32, y: i32) -> Result<(), EmulationError>;

    /// Delivers every queued action.
    fn flush(&self) -> Result<(), EmulationError>;
}

/// What happened to one local key or button event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The event changed tracked state and was synthesized.
    Forwarded,
    /// The tracked state already matched; nothing was sent.
    Redundant,
    /// No target mapping exists; nothing was sent and no state changed.
    Unmapped,
}

/// Result of one keyboard event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDispatch {
    pub dispatch: Dispatch,
    /// Modifier combos active after the event.
    pub combos: Vec<ComboNotification>,
}

/// The Translate Input use case.
///
/// Owns the key and button trackers and the last pointer position seen in
/// window coordinates.
#[derive(Debug, Default)]
pub struct TranslateInputUseCase {
    keys: KeyStateTracker,
    buttons: ButtonState,
    last_pointer: Option<(i32, i32)>,
}

impl TranslateInputUseCase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> &KeyStateTracker {
        &self.keys
    }

    pub fn buttons(&self) -> ButtonState {
        self.buttons
    }

    /// Handles a local key press or release.
    ///
    /// Combos are computed and logged after every keyboard event, including
    /// redundant and unmapped ones.
    ///
    /// # Errors
    ///
    /// Returns [`EmulationError::Platform`] if injection fails.  A rejected key
    /// event leaves the tracker unchanged; once the event is queued the
    /// tracker records it even if the flush then fails.
    pub fn handle_key<E: InputSynthesizer + ?Sized>(
        &mut self,
        emulator: &E,
        key: LocalKey,
        pressed: bool,
    ) -> Result<KeyDispatch, EmulationError> {
        let dispatch = self.forward_key(emulator, key, pressed)?;

        let combos = self.keys.active_combos();
        for combo in &combos {
            info!(%combo, "modifier combo active");
        }

        Ok(KeyDispatch { dispatch, combos })
    }

    fn forward_key<E: InputSynthesizer + ?Sized>(
        &mut self,
        emulator: &E,
        key: LocalKey,
        pressed: bool,
    ) -> Result<Dispatch, EmulationError> {
        if self.keys.get(key) == pressed {
            trace!(%key, pressed, "redundant key event suppressed");
            return Ok(Dispatch::Redundant);
        }
        let Some(keysym) = KeyMapper::translate(key) else {
            debug!(%key, "key has no target mapping; dropped");
            return Ok(Dispatch::Unmapped);
        };

        match emulator.key_event(keysym, pressed) {
            Ok(()) => {}
            Err(EmulationError::UnsupportedKey(sym)) => {
                debug!(%key, keysym = %sym, "target cannot type this key; dropped");
                return Ok(Dispatch::Unmapped);
            }
            Err(e) => return Err(e),
        }
        self.keys.set(key, pressed);
        emulator.flush()?;
        Ok(Dispatch::Forwarded)
    }

    /// Handles a local button press or release at window position `(x, y)`.
    ///
    /// The pointer is warped to the mapped position first.  When the viewport
    /// is unusable the warp is skipped and the button still goes out at the
    /// target's current pointer position.
    ///
    /// # Errors
    ///
    /// Returns [`EmulationError`] if injection fails.
    pub fn handle_button<E: InputSynthesizer + ?Sized>(
        &mut self,
        emulator: &E,
        viewport: &ViewportGeometry,
        button: LocalButton,
        pressed: bool,
        x: i32,
        y: i32,
    ) -> Result<Dispatch, EmulationError> {
        self.last_pointer = Some((x, y));

        let Some(target_button) = KeyMapper::translate_button(button) else {
            debug!(?button, "button has no target mapping; dropped");
            return Ok(Dispatch::Unmapped);
        };
        if !self.buttons.set(button, pressed) {
            trace!(?button, pressed, "redundant button event suppressed");
            return Ok(Dispatch::Redundant);
        }

        self.warp_mapped(emulator, viewport, x, y)?;
        emulator.button_event(target_button, pressed)?;
        emulator.flush()?;
        Ok(Dispatch::Forwarded)
    }

    /// Handles pointer motion to window position `(x, y)`.
    ///
    /// Returns `true` if a warp was synthesized.
    ///
    /// # Errors
    ///
    /// Returns [`EmulationError`] if injection fails.
    pub fn handle_motion<E: InputSynthesizer + ?Sized>(
        &mut self,
        emulator: &E,
        viewport: &ViewportGeometry,
        x: i32,
        y: i32,
    ) -> Result<bool, EmulationError> {
        self.last_pointer = Some((x, y));
        let warped = self.warp_mapped(emulator, viewport, x, y)?;
        if warped {
            emulator.flush()?;
        }
        Ok(warped)
    }

    /// Handles `notches` wheel steps; positive scrolls up.
    ///
    /// Each notch is a press+release pair followed by a flush.
    ///
    /// # Errors
    ///
    /// Returns [`EmulationError`] if injection fails; notches already sent stay sent.
    pub fn handle_wheel<E: InputSynthesizer + ?Sized>(
        &mut self,
        emulator: &E,
        notches: i32,
    ) -> Result<(), EmulationError> {
        let button = if notches > 0 {
            TargetButton::SCROLL_UP
        } else {
            TargetButton::SCROLL_DOWN
        };
        for _ in 0..notches.unsigned_abs() {
            emulator.button_event(button, true)?;
            emulator.button_event(button, false)?;
            emulator.flush()?;
        }
        Ok(())
    }

    /// Re-sends the last pointer position while any button is held, so drags
    /// keep tracking even without new motion.
    ///
    /// Returns `true` if a warp was synthesized.
    ///
    /// # Errors
    ///
    /// Returns [`EmulationError`] if injection fails.
    pub fn reissue_drag<E: InputSynthesizer + ?Sized>(
        &mut self,
        emulator: &E,
        viewport: &ViewportGeometry,
    ) -> Result<bool, EmulationError> {
        if !self.buttons.any_pressed() {
            return Ok(false);
        }
        let Some((x, y)) = self.last_pointer else {
            return Ok(false);
        };
        let warped = self.warp_mapped(emulator, viewport, x, y)?;
        if warped {
            emulator.flush()?;
        }
        Ok(warped)
    }

    /// Releases every key and button still tracked as pressed.
    ///
    /// Keys go first (in a stable order), then buttons left to right, then a
    /// single flush.  Returns how many releases were synthesized.
    ///
    /// # Errors
    ///
    /// Returns [`EmulationError`] on the first injection failure.
    pub fn release_held<E: InputSynthesizer + ?Sized>(
        &mut self,
        emulator: &E,
    ) -> Result<usize, EmulationError> {
        let mut released = 0;

        for key in self.keys.held_keys() {
            if let Some(keysym) = KeyMapper::translate(key) {
                emulator.key_event(keysym, false)?;
                released += 1;
            }
            self.keys.set(key, false);
        }

        for button in self.buttons.held() {
            if let Some(target_button) = KeyMapper::translate_button(button) {
                emulator.button_event(target_button, false)?;
                released += 1;
            }
            self.buttons.set(button, false);
        }

        if released > 0 {
            emulator.flush()?;
        }
        self.reset();
        Ok(released)
    }

    /// Forgets every tracked key, button and pointer position without
    /// synthesizing anything.
    pub fn reset(&mut self) {
        self.keys.clear();
        self.buttons = ButtonState::default();
        self.last_pointer = None;
    }

    fn warp_mapped<E: InputSynthesizer + ?Sized>(
        &self,
        emulator: &E,
        viewport: &ViewportGeometry,
        x: i32,
        y: i32,
    ) -> Result<bool, EmulationError> {
        match viewport.map(x, y) {
            Ok((tx, ty)) => {
                emulator.warp_pointer(tx, ty)?;
                Ok(true)
            }
            Err(e) => {
                debug!(x, y, reason = %e, "pointer warp skipped");
                Ok(false)
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
