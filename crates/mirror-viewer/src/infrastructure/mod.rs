//! Infrastructure layer for the viewer.
//!
//! Contains OS-facing adapters: the X11 target display, the local winit
//! window, and file-system storage for settings.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `mirror_core`, but MUST NOT be imported by the `application` or domain
//! layers.

pub mod display_surface;
pub mod storage;
pub mod target_display;
