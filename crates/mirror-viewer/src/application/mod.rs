//! Application layer use cases for the viewer.
//!
//! # What use cases does the viewer have?
//!
//! - **`translate_input`** – Applies the dedup rule to local key and button
//!   events, maps them through the key table and the viewport, and drives an
//!   injected `InputSynthesizer` in strict order with a flush after every
//!   action group.
//!
//! - **`present_frame`** – One capture/present tick: snapshot, wrap, upload,
//!   present, with every resource released before the tick returns.
//!
//! - **`run_session`** – The cooperative main loop that owns all cross-tick
//!   state and ties the two halves together.

pub mod present_frame;
pub mod run_session;
pub mod translate_input;
