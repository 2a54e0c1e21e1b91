//! Target display adapters.
//!
//! A target display is both an [`InputSynthesizer`] (write side) and a
//! [`FrameSource`] (read side).  The X11 implementation is compiled only on
//! Linux; the mock is always available for tests.
//!
//! [`InputSynthesizer`]: crate::application::translate_input::InputSynthesizer
//! [`FrameSource`]: crate::application::present_frame::FrameSource

use thiserror::Error;

pub mod mock;

#[cfg(target_os = "linux")]
pub mod linux;

/// Fatal errors while connecting to the target display.
#[derive(Debug, Error)]
pub enum TargetError {
    #[error("invalid display name {0:?}")]
    InvalidName(String),

    #[error("cannot open display {0:?}")]
    Open(String),

    #[error("display {0:?} does not support the XTest extension")]
    MissingXTest(String),

    #[error("display {0:?} reports an empty screen")]
    EmptyScreen(String),

    #[error("X11 targets are not supported on this platform")]
    Unsupported,
}
