//! RunSessionUseCase: the single-threaded mirror loop.
//!
//! # One iteration (for beginners)
//!
//! ```text
//! ┌─ drain every pending local event ──────────────────────┐
//! │    Quit / exit key  -> state = Stopped                  │
//! │    Resized          -> viewport.resize                  │
//! │    Key / Button / Pointer / Wheel -> TranslateInput     │
//! ├─ drag re-issue (if a button is held) ──────────────────┤
//! ├─ one capture/present tick ─────────────────────────────┤
//! └─ sleep for what is left of the frame interval ────────┘
//! ```
//!
//! Events drained in an iteration are all handled even if one of them stops
//! the session; the stop takes effect before the next iteration starts.  A
//! synthesis failure is logged and the loop carries on.

use std::thread;
use std::time::{Duration, Instant};

use mirror_core::{LocalEvent, LocalKey, ViewportGeometry};
use tracing::{debug, error, info, warn};

use super::present_frame::{present_tick, FrameSource, PresentSurface, TickOutcome, TickStats};
use super::translate_input::{InputSynthesizer, TranslateInputUseCase};

/// Event side of the local display surface.
pub trait EventSource {
    /// Returns every event that arrived since the last call, in arrival order.
    /// Never blocks.
    fn drain_events(&mut self) -> Vec<LocalEvent>;

    /// Current client-area size in pixels.
    fn window_size(&self) -> (u32, u32);
}

/// Loop state.  `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Running,
    Stopped,
}

/// Tunables for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Target period of one loop iteration.
    pub frame_interval: Duration,
    /// Pressing this key stops the session.  The press is still forwarded.
    pub exit_key: LocalKey,
    /// Release keys and buttons still held on the target when the session stops.
    pub release_held_on_exit: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            frame_interval: Duration::from_millis(16),
            exit_key: LocalKey::Escape,
            release_held_on_exit: true,
        }
    }
}

/// A mirror session between one target display and one local surface.
pub struct RunSessionUseCase<T, S> {
    target: T,
    surface: S,
    config: SessionConfig,
    input: TranslateInputUseCase,
    viewport: ViewportGeometry,
    state: SessionState,
    stats: TickStats,
}

impl<T, S> RunSessionUseCase<T, S>
where
    T: InputSynthesizer + FrameSource,
    S: EventSource + PresentSurface,
{
    /// Creates a running session.  The viewport starts at the surface's
    /// current window size.
    pub fn new(target: T, surface: S, config: SessionConfig) -> Self {
        let (target_w, target_h) = target.screen_size();
        let mut viewport = ViewportGeometry::new(target_w, target_h);
        let (w, h) = surface.window_size();
        viewport.resize(w, h);

        Self {
            target,
            surface,
            config,
            input: TranslateInputUseCase::new(),
            viewport,
            state: SessionState::Running,
            stats: TickStats::default(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn stats(&self) -> TickStats {
        self.stats
    }

    pub fn viewport(&self) -> &ViewportGeometry {
        &self.viewport
    }

    pub fn input(&self) -> &TranslateInputUseCase {
        &self.input
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Runs one iteration without pacing.
    pub fn run_iteration(&mut self) -> TickOutcome {
        for event in self.surface.drain_events() {
            self.dispatch(event);
        }

        if let Err(e) = self.input.reissue_drag(&self.target, &self.viewport) {
            error!(error = %e, "drag re-issue failed");
        }

        let outcome = present_tick(&self.target, &mut self.surface, &self.viewport);
        self.stats.record(outcome);
        outcome
    }

    /// Loops until stopped, pacing each iteration to the frame interval, then
    /// shuts down.  Returns the tick statistics.
    pub fn run(&mut self) -> TickStats {
        info!(
            interval_ms = self.config.frame_interval.as_millis() as u64,
            exit_key = %self.config.exit_key,
            "session started"
        );

        while self.state == SessionState::Running {
            let started = Instant::now();
            self.run_iteration();
            if self.state != SessionState::Running {
                break;
            }
            let pause = remaining_interval(self.config.frame_interval, started.elapsed());
            if !pause.is_zero() {
                thread::sleep(pause);
            }
        }

        self.shutdown();
        self.stats
    }

    /// Releases anything still held on the target (if configured), drops all
    /// tracked input state and logs the tick statistics.
    pub fn shutdown(&mut self) {
        self.state = SessionState::Stopped;
        if self.config.release_held_on_exit {
            match self.input.release_held(&self.target) {
                Ok(0) => {}
                Ok(n) => debug!(released = n, "released held input on target"),
                Err(e) => warn!(error = %e, "could not release held input"),
            }
        }
        self.input.reset();
        info!(stats = %self.stats, "session stopped");
    }

    fn dispatch(&mut self, event: LocalEvent) {
        let result = match event {
            LocalEvent::Quit => {
                info!("quit requested");
                self.state = SessionState::Stopped;
                Ok(())
            }
            LocalEvent::Resized { width, height } => {
                debug!(width, height, "viewport resized");
                self.viewport.resize(width, height);
                Ok(())
            }
            LocalEvent::Key { key, pressed } => {
                if pressed && key == self.config.exit_key && self.state == SessionState::Running {
                    info!(%key, "exit key pressed");
                    self.state = SessionState::Stopped;
                }
                self.input
                    .handle_key(&self.target, key, pressed)
                    .map(|_| ())
            }
            LocalEvent::PointerMoved { x, y } => self
                .input
                .handle_motion(&self.target, &self.viewport, x, y)
                .map(|_| ()),
            LocalEvent::Button {
                button,
                pressed,
                x,
                y,
            } => self
                .input
                .handle_button(&self.target, &self.viewport, button, pressed, x, y)
                .map(|_| ()),
            LocalEvent::Wheel { notches } => self.input.handle_wheel(&self.target, notches),
        };

        if let Err(e) = result {
            error!(error = %e, ?event, "input synthesis failed");
        }
    }
}

/// Time left in the current frame interval after `elapsed` was spent working.
pub fn remaining_interval(interval: Duration, elapsed: Duration) -> Duration {
    interval.saturating_sub(elapsed)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
