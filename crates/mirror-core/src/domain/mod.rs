//! Domain entities for display mirroring.
//!
//! This module contains pure logic with no infrastructure dependencies.
//!
//! # What is "domain" in Clean Architecture? (for beginners)
//!
//! The innermost layer of a Clean Architecture codebase is the **domain**.
//! Domain code has **no** imports from OS APIs, windowing libraries or display
//! protocols, and can be compiled and tested on any machine.  Here it holds
//! the rules that make the mirror behave correctly regardless of which window
//! system draws the frames or which display receives the input: which events
//! reach the target, where the pointer lands, and how pixels are read.

/// Events delivered by the local display surface.
pub mod input_event;

/// Key and button press/release tracking with redundant-event suppression.
pub mod input_state;

/// Window-to-target coordinate mapping.
pub mod viewport;

/// Channel layouts by framebuffer depth.
pub mod pixel_format;

/// Frame snapshots and drawables.
pub mod frame;
