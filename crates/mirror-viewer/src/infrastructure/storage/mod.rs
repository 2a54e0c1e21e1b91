//! Storage infrastructure: configuration file persistence.
//!
//! The `config` sub-module reads the viewer's TOML settings from the
//! platform config directory (or an explicit path), falls back to defaults
//! on first run, and can write a settings file back for the user to edit.

pub mod config;
