//! winit 0.30 + softbuffer 0.4 display surface.
//!
//! # Pumped, not run
//!
//! winit normally owns the thread through `EventLoop::run_app`.  The mirror
//! loop has to stay in charge of pacing instead, so the surface uses
//! `pump_app_events(Some(Duration::ZERO), ..)`: each call delivers whatever the
//! OS has queued to an [`EventCollector`] and returns immediately.
//!
//! winit 0.30 only allows window creation inside `resumed()`, so [`open`]
//! pumps once with a short timeout and a one-shot `Creator` handler that
//! builds the window, the softbuffer context and the surface.
//!
//! # Drop order
//!
//! Fields drop in declaration order: the surface first, then the context,
//! then the window, and the event loop last.
//!
//! [`open`]: WinitDisplaySurface::open

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use mirror_core::{stretch_nearest, Drawable, LocalButton, LocalEvent, LocalKey};
use softbuffer::{Context, Surface};
use tracing::{debug, trace};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop, OwnedDisplayHandle};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowAttributes, WindowId};

use super::{WheelAccumulator, XrgbTexture};
use crate::application::present_frame::{PresentSurface, SurfaceError};
use crate::application::run_session::EventSource;

/// Pixels of smooth scrolling treated as one wheel line.
const PIXELS_PER_LINE: f64 = 40.0;

type SoftSurface = Surface<OwnedDisplayHandle, Arc<Window>>;

/// A resizable local window showing the target's frames.
pub struct WinitDisplaySurface {
    surface: SoftSurface,
    _context: Context<OwnedDisplayHandle>,
    window: Arc<Window>,
    collector: EventCollector,
    event_loop: EventLoop<()>,
}

impl WinitDisplaySurface {
    /// Creates the event loop and a `width` x `height` resizable window.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::Window`] if the event loop, window, or
    /// softbuffer surface cannot be created.
    pub fn open(title: &str, width: u32, height: u32) -> Result<Self, SurfaceError> {
        let mut event_loop =
            EventLoop::new().map_err(|e| SurfaceError::Window(format!("event loop: {e}")))?;

        let attrs = WindowAttributes::default()
            .with_title(title)
            .with_inner_size(PhysicalSize::new(width.max(1), height.max(1)))
            .with_resizable(true);

        let mut creator = Creator {
            attrs: Some(attrs),
            result: None,
        };
        // resumed() fires synchronously on the first pump on desktop platforms.
        let _ = event_loop.pump_app_events(Some(Duration::from_millis(100)), &mut creator);

        let (window, context, surface) = creator
            .result
            .unwrap_or_else(|| Err(SurfaceError::Window("window was never created".to_string())))?;

        let size = window.inner_size();
        debug!(width = size.width, height = size.height, "local window created");

        Ok(Self {
            surface,
            _context: context,
            window,
            collector: EventCollector::new(size.width as f64, size.height as f64),
            event_loop,
        })
    }
}

/// One-shot handler that creates the window inside `resumed()`.
struct Creator {
    attrs: Option<WindowAttributes>,
    result: Option<Result<(Arc<Window>, Context<OwnedDisplayHandle>, SoftSurface), SurfaceError>>,
}

impl ApplicationHandler for Creator {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(attrs) = self.attrs.take() else {
            return;
        };
        self.result = Some(create_window(event_loop, attrs));
    }

    fn window_event(&mut self, _: &ActiveEventLoop, _: WindowId, _: WindowEvent) {}
}

fn create_window(
    event_loop: &ActiveEventLoop,
    attrs: WindowAttributes,
) -> Result<(Arc<Window>, Context<OwnedDisplayHandle>, SoftSurface), SurfaceError> {
    let window = Arc::new(
        event_loop
            .create_window(attrs)
            .map_err(|e| SurfaceError::Window(format!("create_window: {e}")))?,
    );
    let context = Context::new(event_loop.owned_display_handle())
        .map_err(|e| SurfaceError::Window(format!("softbuffer context: {e}")))?;
    let surface = Surface::new(&context, Arc::clone(&window))
        .map_err(|e| SurfaceError::Window(format!("softbuffer surface: {e}")))?;
    Ok((window, context, surface))
}

/// Run-phase handler: converts window events into [`LocalEvent`]s.
#[derive(Debug)]
struct EventCollector {
    events: Vec<LocalEvent>,
    cursor: (f64, f64),
    wheel: WheelAccumulator,
}

impl EventCollector {
    fn new(width: f64, height: f64) -> Self {
        Self {
            events: Vec::new(),
            cursor: (width / 2.0, height / 2.0),
            wheel: WheelAccumulator::default(),
        }
    }

    fn cursor_i32(&self) -> (i32, i32) {
        (self.cursor.0 as i32, self.cursor.1 as i32)
    }
}

impl ApplicationHandler for EventCollector {
    fn resumed(&mut self, _: &ActiveEventLoop) {}

    fn window_event(&mut self, _: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                self.events.push(LocalEvent::Quit);
            }
            WindowEvent::Resized(size) => {
                self.events.push(LocalEvent::Resized {
                    width: size.width,
                    height: size.height,
                });
            }
            WindowEvent::KeyboardInput { event, .. } => {
                self.events.push(LocalEvent::Key {
                    key: local_key(event.physical_key),
                    pressed: event.state == ElementState::Pressed,
                });
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = (position.x, position.y);
                let (x, y) = self.cursor_i32();
                self.events.push(LocalEvent::PointerMoved { x, y });
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let (x, y) = self.cursor_i32();
                self.events.push(LocalEvent::Button {
                    button: local_button(button),
                    pressed: state == ElementState::Pressed,
                    x,
                    y,
                });
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => f64::from(y),
                    MouseScrollDelta::PixelDelta(p) => p.y / PIXELS_PER_LINE,
                };
                let notches = self.wheel.push(lines);
                if notches != 0 {
                    self.events.push(LocalEvent::Wheel { notches });
                }
            }
            other => trace!(event = ?other, "window event ignored"),
        }
    }
}

impl EventSource for WinitDisplaySurface {
    fn drain_events(&mut self) -> Vec<LocalEvent> {
        let status = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.collector);
        if let PumpStatus::Exit(code) = status {
            debug!(code, "event loop exited");
            self.collector.events.push(LocalEvent::Quit);
        }
        std::mem::take(&mut self.collector.events)
    }

    fn window_size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }
}

impl PresentSurface for WinitDisplaySurface {
    type Texture = XrgbTexture;

    fn upload(&mut self, drawable: &Drawable<'_>) -> Result<XrgbTexture, SurfaceError> {
        Ok(XrgbTexture {
            pixels: drawable.to_xrgb(),
            width: drawable.width(),
            height: drawable.height(),
        })
    }

    fn present(&mut self, texture: &XrgbTexture) -> Result<(), SurfaceError> {
        let size = self.window.inner_size();
        let (Some(w), Some(h)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) else {
            return Err(SurfaceError::Present("window has no client area".to_string()));
        };
        self.surface
            .resize(w, h)
            .map_err(|e| SurfaceError::Present(format!("resize: {e}")))?;

        let mut buffer = self
            .surface
            .buffer_mut()
            .map_err(|e| SurfaceError::Present(format!("buffer: {e}")))?;
        stretch_nearest(
            &texture.pixels,
            texture.width,
            texture.height,
            &mut buffer,
            size.width,
            size.height,
        );

        self.window.pre_present_notify();
        buffer
            .present()
            .map_err(|e| SurfaceError::Present(e.to_string()))
    }
}

/// Maps a winit physical key to a [`LocalKey`].
pub fn local_key(physical: PhysicalKey) -> LocalKey {
    let PhysicalKey::Code(code) = physical else {
        return LocalKey::Other(scancode(physical));
    };
    match code {
        KeyCode::KeyA => LocalKey::KeyA,
        KeyCode::KeyB => LocalKey::KeyB,
        KeyCode::KeyC => LocalKey::KeyC,
        KeyCode::KeyD => LocalKey::KeyD,
        KeyCode::KeyE => LocalKey::KeyE,
        KeyCode::KeyF => LocalKey::KeyF,
        KeyCode::KeyG => LocalKey::KeyG,
        KeyCode::KeyH => LocalKey::KeyH,
        KeyCode::KeyI => LocalKey::KeyI,
        KeyCode::KeyJ => LocalKey::KeyJ,
        KeyCode::KeyK => LocalKey::KeyK,
        KeyCode::KeyL => LocalKey::KeyL,
        KeyCode::KeyM => LocalKey::KeyM,
        KeyCode::KeyN => LocalKey::KeyN,
        KeyCode::KeyO => LocalKey::KeyO,
        KeyCode::KeyP => LocalKey::KeyP,
        KeyCode::KeyQ => LocalKey::KeyQ,
        KeyCode::KeyR => LocalKey::KeyR,
        KeyCode::KeyS => LocalKey::KeyS,
        KeyCode::KeyT => LocalKey::KeyT,
        KeyCode::KeyU => LocalKey::KeyU,
        KeyCode::KeyV => LocalKey::KeyV,
        KeyCode::KeyW => LocalKey::KeyW,
        KeyCode::KeyX => LocalKey::KeyX,
        KeyCode::KeyY => LocalKey::KeyY,
        KeyCode::KeyZ => LocalKey::KeyZ,
        KeyCode::Digit0 => LocalKey::Digit0,
        KeyCode::Digit1 => LocalKey::Digit1,
        KeyCode::Digit2 => LocalKey::Digit2,
        KeyCode::Digit3 => LocalKey::Digit3,
        KeyCode::Digit4 => LocalKey::Digit4,
        KeyCode::Digit5 => LocalKey::Digit5,
        KeyCode::Digit6 => LocalKey::Digit6,
        KeyCode::Digit7 => LocalKey::Digit7,
        KeyCode::Digit8 => LocalKey::Digit8,
        KeyCode::Digit9 => LocalKey::Digit9,
        KeyCode::Space => LocalKey::Space,
        KeyCode::Enter | KeyCode::NumpadEnter => LocalKey::Enter,
        KeyCode::Escape => LocalKey::Escape,
        KeyCode::Backspace => LocalKey::Backspace,
        KeyCode::Delete => LocalKey::Delete,
        KeyCode::Tab => LocalKey::Tab,
        KeyCode::ControlLeft => LocalKey::ControlLeft,
        KeyCode::ControlRight => LocalKey::ControlRight,
        KeyCode::ShiftLeft => LocalKey::ShiftLeft,
        KeyCode::ShiftRight => LocalKey::ShiftRight,
        KeyCode::AltLeft => LocalKey::AltLeft,
        KeyCode::AltRight => LocalKey::AltRight,
        KeyCode::SuperLeft => LocalKey::MetaLeft,
        KeyCode::SuperRight => LocalKey::MetaRight,
        KeyCode::CapsLock => LocalKey::CapsLock,
        KeyCode::ArrowLeft => LocalKey::ArrowLeft,
        KeyCode::ArrowRight => LocalKey::ArrowRight,
        KeyCode::ArrowUp => LocalKey::ArrowUp,
        KeyCode::ArrowDown => LocalKey::ArrowDown,
        KeyCode::F1 => LocalKey::F1,
        KeyCode::F2 => LocalKey::F2,
        KeyCode::F3 => LocalKey::F3,
        KeyCode::F4 => LocalKey::F4,
        KeyCode::F5 => LocalKey::F5,
        KeyCode::F6 => LocalKey::F6,
        KeyCode::F7 => LocalKey::F7,
        KeyCode::F8 => LocalKey::F8,
        KeyCode::F9 => LocalKey::F9,
        KeyCode::F10 => LocalKey::F10,
        KeyCode::F11 => LocalKey::F11,
        KeyCode::F12 => LocalKey::F12,
        _ => LocalKey::Other(scancode(physical)),
    }
}

#[cfg(any(target_os = "linux", target_os = "windows", target_os = "macos"))]
fn scancode(physical: PhysicalKey) -> u32 {
    use winit::platform::scancode::PhysicalKeyExtScancode;
    physical.to_scancode().unwrap_or(0)
}

#[cfg(not(any(target_os = "linux", target_os = "windows", target_os = "macos")))]
fn scancode(_: PhysicalKey) -> u32 {
    0
}

/// Maps a winit mouse button to a [`LocalButton`].
pub fn local_button(button: MouseButton) -> LocalButton {
    match button {
        MouseButton::Left => LocalButton::Left,
        MouseButton::Middle => LocalButton::Middle,
        MouseButton::Right => LocalButton::Right,
        MouseButton::Back => LocalButton::Back,
        MouseButton::Forward => LocalButton::Forward,
        MouseButton::Other(n) => LocalButton::Other(n),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
