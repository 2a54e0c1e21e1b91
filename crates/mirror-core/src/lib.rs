//! # mirror-core
//!
//! Platform-independent core of the display mirror: local input identifiers,
//! the key/button translation tables, press/release state tracking, viewport
//! coordinate mapping, and the pixel-format rules used to turn a captured
//! framebuffer into something a window can show.
//!
//! This crate has zero dependencies on OS APIs, windowing toolkits, or the X
//! protocol.  The viewer crate supplies those at the edges.
//!
//! # Architecture overview
//!
//! The mirror runs two one-way data flows per tick:
//!
//! ```text
//! write side:  local events -> KeyStateTracker / ButtonState -> KeyMapper -> target display
//! read side:   target display -> FrameSnapshot -> Drawable -> local window
//! ```
//!
//! - **`keymap`** – The finite, data-driven tables that translate local key and
//!   button identifiers into X11 KeySyms and button numbers.  Anything outside
//!   the tables is silently unsupported.
//!
//! - **`domain`** – Pure state and arithmetic: the press/release tracker with
//!   its dedup rule, modifier-combo detection, the viewport mapper, and the
//!   frame snapshot / drawable types.

pub mod domain;
pub mod keymap;

pub use domain::frame::{stretch_nearest, ByteOrder, Drawable, FrameSnapshot, WrapError};
pub use domain::input_event::LocalEvent;
pub use domain::input_state::{
    ButtonState, ComboKind, ComboNotification, KeyStateTracker, ModifierSnapshot,
};
pub use domain::pixel_format::{bytes_per_pixel, layout_for_depth, ChannelLayout};
pub use domain::viewport::{map_coordinates, ViewportError, ViewportGeometry};
pub use keymap::local::{KeyNameError, LocalButton, LocalKey};
pub use keymap::{KeyMapper, KeySym, TargetButton};
