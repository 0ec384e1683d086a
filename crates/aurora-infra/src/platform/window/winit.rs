// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A `winit`-based implementation of the [`Platform`] trait.

use crate::platform::input::translate_winit_input;
use anyhow::{anyhow, bail, Context};
use aurora_core::event::{EventContext, EventSystem, SystemEventCode};
use aurora_core::input::InputSystem;
use aurora_core::platform::{Platform, WindowSettings};
use std::time::Duration;
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalPosition};
use winit::error::OsError;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowId};

/// How many times `startup` pumps the event loop waiting for the window.
const STARTUP_PUMP_ATTEMPTS: u32 = 16;
const STARTUP_PUMP_TIMEOUT: Duration = Duration::from_millis(10);

/// A wrapper around a `winit::window::Window`.
#[derive(Debug)]
pub struct WinitWindow {
    inner: Window,
}

impl WinitWindow {
    /// Returns the physical dimensions (width, height) of the window's inner area.
    pub fn inner_size(&self) -> (u32, u32) {
        let size = self.inner.inner_size();
        (size.width, size.height)
    }

    /// Returns the display's scale factor.
    pub fn scale_factor(&self) -> f64 {
        self.inner.scale_factor()
    }

    /// Requests that the window be redrawn.
    pub fn request_redraw(&self) {
        self.inner.request_redraw();
    }

    /// The winit identifier of the window.
    pub fn id(&self) -> WindowId {
        self.inner.id()
    }
}

/// A builder for creating `WinitWindow` instances.
#[derive(Debug, Clone)]
pub struct WinitWindowBuilder {
    title: String,
    position: Option<(i32, i32)>,
    width: u32,
    height: u32,
}

impl WinitWindowBuilder {
    /// Creates a new `WinitWindowBuilder` with default settings.
    pub fn new() -> Self {
        Self {
            title: "Aurora Engine".to_string(),
            position: None,
            width: 1280,
            height: 720,
        }
    }

    /// Takes title, position and size from `settings`.
    pub fn from_settings(settings: &WindowSettings) -> Self {
        Self::new()
            .with_title(settings.title.clone())
            .with_position(settings.x, settings.y)
            .with_dimensions(settings.width, settings.height)
    }

    /// Sets the title of the window to be built.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the initial screen position of the window to be built.
    pub fn with_position(mut self, x: i32, y: i32) -> Self {
        self.position = Some((x, y));
        self
    }

    /// Sets the initial inner dimensions of the window to be built.
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Builds the `WinitWindow` using the provided `winit` event loop.
    ///
    /// # Errors
    /// Returns an `OsError` if the underlying `winit` window creation fails.
    pub fn build(self, event_loop: &ActiveEventLoop) -> Result<WinitWindow, OsError> {
        log::info!(
            "Building window with title: '{}' and size: {}x{}",
            self.title,
            self.width,
            self.height
        );

        let mut window_attributes = Window::default_attributes()
            .with_title(self.title)
            .with_inner_size(LogicalSize::new(self.width, self.height))
            .with_visible(true);
        if let Some((x, y)) = self.position {
            window_attributes = window_attributes.with_position(PhysicalPosition::new(x, y));
        }

        let window = event_loop.create_window(window_attributes)?;

        log::info!("Winit window created successfully (id: {:?}).", window.id());
        Ok(WinitWindow { inner: window })
    }
}

impl Default for WinitWindowBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Receives winit callbacks and queues window events until the platform
/// drains them.
#[derive(Default)]
struct WindowEventQueue {
    builder: Option<WinitWindowBuilder>,
    window: Option<WinitWindow>,
    creation_error: Option<OsError>,
    pending: Vec<WindowEvent>,
}

impl ApplicationHandler for WindowEventQueue {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Some(builder) = self.builder.take() {
            match builder.build(event_loop) {
                Ok(window) => self.window = Some(window),
                Err(e) => {
                    log::error!("Failed to create window: {e}");
                    self.creation_error = Some(e);
                }
            }
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        if self.window.as_ref().is_some_and(|window| window.id() == id) {
            self.pending.push(event);
        }
    }
}

/// The desktop platform: one `winit` window driven by pumping the event loop
/// once per frame.
pub struct WinitPlatform {
    event_loop: Option<EventLoop<()>>,
    queue: WindowEventQueue,
}

impl WinitPlatform {
    /// Creates the platform. No window exists until [`Platform::startup`].
    pub fn new() -> Self {
        Self {
            event_loop: None,
            queue: WindowEventQueue::default(),
        }
    }

    /// The main window, once created.
    pub fn window(&self) -> Option<&WinitWindow> {
        self.queue.window.as_ref()
    }

    fn dispatch(&mut self, input: &InputSystem, events: &EventSystem) {
        for event in std::mem::take(&mut self.queue.pending) {
            match event {
                WindowEvent::CloseRequested => {
                    log::info!("Window close requested.");
                    events.fire(
                        SystemEventCode::ApplicationQuit,
                        None,
                        EventContext::empty(),
                    );
                }
                WindowEvent::Resized(size) => {
                    let width = u16::try_from(size.width).unwrap_or(u16::MAX);
                    let height = u16::try_from(size.height).unwrap_or(u16::MAX);
                    events.fire(
                        SystemEventCode::Resized,
                        None,
                        EventContext::size(width, height),
                    );
                }
                other => {
                    if let Some(input_event) = translate_winit_input(&other) {
                        input.process_event(&input_event);
                    }
                }
            }
        }
    }
}

impl Default for WinitPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for WinitPlatform {
    fn startup(&mut self, settings: &WindowSettings) -> anyhow::Result<()> {
        let mut event_loop = EventLoop::new().context("Failed to create the event loop")?;
        self.queue.builder = Some(WinitWindowBuilder::from_settings(settings));

        for _ in 0..STARTUP_PUMP_ATTEMPTS {
            if let PumpStatus::Exit(code) =
                event_loop.pump_app_events(Some(STARTUP_PUMP_TIMEOUT), &mut self.queue)
            {
                bail!("Event loop exited during startup (code {code})");
            }
            if let Some(e) = self.queue.creation_error.take() {
                return Err(anyhow!("Failed to create the window: {e}"));
            }
            if self.queue.window.is_some() {
                break;
            }
        }

        if self.queue.window.is_none() {
            bail!("The window was not created after {STARTUP_PUMP_ATTEMPTS} pumps");
        }
        self.event_loop = Some(event_loop);
        Ok(())
    }

    fn pump_messages(&mut self, input: &InputSystem, events: &EventSystem) -> bool {
        let Some(event_loop) = self.event_loop.as_mut() else {
            log::error!("pump_messages called before the platform was started.");
            return false;
        };

        let status = event_loop.pump_app_events(Some(Duration::ZERO), &mut self.queue);
        self.dispatch(input, events);

        match status {
            PumpStatus::Continue => true,
            PumpStatus::Exit(code) => {
                log::info!("Event loop exited with code {code}.");
                false
            }
        }
    }

    fn shutdown(&mut self) {
        self.queue.pending.clear();
        if self.queue.window.take().is_some() {
            log::info!("Window destroyed.");
        }
        self.event_loop = None;
    }
}
