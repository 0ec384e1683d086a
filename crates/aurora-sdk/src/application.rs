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

//! The application frame loop.

use crate::config::ApplicationConfig;
use anyhow::{bail, Context, Result};
use aurora_core::event::{
    EventCode, EventContext, EventHandler, EventSystem, ListenerId, SenderId, SystemEventCode,
};
use aurora_core::input::{InputSystem, Key};
use aurora_core::memory::TaggedAllocator;
use aurora_core::platform::Platform;
use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

/// The listener identity the application registers its own handlers under.
pub const APPLICATION_LISTENER: ListenerId = ListenerId(0);

/// The engine subsystems a game can reach.
pub struct EngineContext {
    allocator: Arc<TaggedAllocator>,
    events: Rc<EventSystem>,
    input: Rc<InputSystem>,
}

impl EngineContext {
    fn new() -> Self {
        let allocator = Arc::new(TaggedAllocator::new());
        let events = Rc::new(EventSystem::new(allocator.clone()));
        let input = Rc::new(InputSystem::new(events.clone()));
        Self {
            allocator,
            events,
            input,
        }
    }

    /// The allocator every engine allocation is accounted against.
    pub fn allocator(&self) -> &Arc<TaggedAllocator> {
        &self.allocator
    }

    /// The event router.
    pub fn events(&self) -> &Rc<EventSystem> {
        &self.events
    }

    /// The input tracker.
    pub fn input(&self) -> &Rc<InputSystem> {
        &self.input
    }
}

/// The callbacks a game implements to be driven by an [`Application`].
pub trait Game {
    /// Called once after the engine subsystems and the window are up.
    fn initialize(&mut self, context: &EngineContext) -> Result<()>;

    /// Called every frame the application is not suspended.
    fn update(&mut self, context: &EngineContext, delta_time: f32) -> Result<()>;

    /// Called every frame after `update`.
    fn render(&mut self, context: &EngineContext, delta_time: f32) -> Result<()>;

    /// Called once after `initialize` with the configured size, then on every
    /// non-zero window resize.
    fn on_resize(&mut self, _context: &EngineContext, _width: u32, _height: u32) {}

    /// Called once when the loop ends, before the subsystems shut down.
    fn shutdown(&mut self, _context: &EngineContext) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    New,
    Created,
    Finished,
}

/// Loop state shared with the application's own event handlers.
#[derive(Default)]
struct LoopState {
    running: Cell<bool>,
    suspended: Cell<bool>,
    pending_resize: Cell<Option<(u32, u32)>>,
}

/// Owns the engine subsystems, a game and a platform, and runs the frame loop.
///
/// `create` brings everything up, `run` loops until the application quits and
/// tears everything down in reverse order.
pub struct Application<G: Game, P: Platform> {
    config: ApplicationConfig,
    game: G,
    platform: P,
    context: EngineContext,
    state: Rc<LoopState>,
    handlers: Vec<(SystemEventCode, Rc<dyn EventHandler>)>,
    width: u32,
    height: u32,
    lifecycle: Lifecycle,
}

impl<G: Game, P: Platform> Application<G, P> {
    /// Assembles an application. Nothing is started until [`create`](Self::create).
    pub fn new(config: ApplicationConfig, game: G, platform: P) -> Self {
        Self {
            width: config.start_width,
            height: config.start_height,
            config,
            game,
            platform,
            context: EngineContext::new(),
            state: Rc::new(LoopState::default()),
            handlers: Vec::new(),
            lifecycle: Lifecycle::New,
        }
    }

    /// Initializes the subsystems, opens the window and initializes the game.
    ///
    /// # Errors
    /// Fails if called more than once, or if the event system, the platform or
    /// the game fail to start. Whatever was started is shut down again.
    pub fn create(&mut self) -> Result<()> {
        if self.lifecycle != Lifecycle::New {
            log::error!("Application::create called more than once.");
            bail!("The application was already created");
        }

        let result = self.start();
        match result {
            Ok(()) => self.lifecycle = Lifecycle::Created,
            Err(_) => {
                self.teardown();
                self.lifecycle = Lifecycle::Finished;
            }
        }
        result
    }

    fn start(&mut self) -> Result<()> {
        self.context
            .events
            .initialize()
            .context("Event system failed initialization. Application cannot continue")?;
        self.register_handlers()?;
        self.context.input.initialize();

        self.state.running.set(true);
        self.state.suspended.set(false);

        let settings = self.config.window_settings();
        self.platform
            .startup(&settings)
            .context("Platform failed to start")?;

        self.game
            .initialize(&self.context)
            .context("Game failed to initialize")?;
        self.game
            .on_resize(&self.context, self.width, self.height);

        log::info!("Application '{}' created.", self.config.name);
        Ok(())
    }

    /// Runs the frame loop until the application quits, then shuts everything
    /// down.
    ///
    /// Each frame pumps platform messages, updates and renders the game, then
    /// closes the input frame.
    ///
    /// # Errors
    /// Fails if the application was not created, or with the error of the game
    /// callback that stopped the loop. Shutdown happens in every case.
    pub fn run(&mut self) -> Result<()> {
        if self.lifecycle != Lifecycle::Created {
            bail!("Application::run requires a successful create and runs only once");
        }

        log::info!("{}", self.context.allocator.usage_report());

        let mut outcome = Ok(());
        let mut last_frame = Instant::now();
        while self.state.running.get() {
            if !self.platform.pump_messages(&self.context.input, &self.context.events) {
                self.state.running.set(false);
            }
            self.apply_pending_resize();

            if self.state.suspended.get() {
                continue;
            }

            let now = Instant::now();
            let delta_time = now.duration_since(last_frame).as_secs_f32();
            last_frame = now;

            if let Err(e) = self.game.update(&self.context, delta_time) {
                log::error!("Game update failed, shutting down.");
                outcome = Err(e.context("Game update failed"));
                break;
            }

            if let Err(e) = self.game.render(&self.context, delta_time) {
                log::error!("Game render failed, shutting down.");
                outcome = Err(e.context("Game render failed"));
                break;
            }

            // Input is the last thing updated in a frame.
            self.context.input.end_of_frame_update();
        }

        self.state.running.set(false);
        self.game.shutdown(&self.context);
        self.teardown();
        self.lifecycle = Lifecycle::Finished;
        outcome
    }

    /// `true` while the frame loop should keep going.
    pub fn is_running(&self) -> bool {
        self.state.running.get()
    }

    /// `true` while the window has a zero-sized client area.
    pub fn is_suspended(&self) -> bool {
        self.state.suspended.get()
    }

    /// The current window size as last reported by the platform.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// The engine subsystems.
    pub fn context(&self) -> &EngineContext {
        &self.context
    }

    /// The game being driven.
    pub fn game(&self) -> &G {
        &self.game
    }

    /// The platform backend.
    pub fn platform(&self) -> &P {
        &self.platform
    }

    fn register_handlers(&mut self) -> Result<()> {
        let quit: Rc<dyn EventHandler> = Rc::new(QuitHandler {
            state: self.state.clone(),
        });
        let key: Rc<dyn EventHandler> = Rc::new(KeyHandler);
        let resize: Rc<dyn EventHandler> = Rc::new(ResizeHandler {
            state: self.state.clone(),
        });

        for (code, handler) in [
            (SystemEventCode::ApplicationQuit, quit),
            (SystemEventCode::KeyPressed, key.clone()),
            (SystemEventCode::KeyReleased, key),
            (SystemEventCode::Resized, resize),
        ] {
            self.context
                .events
                .register(code, APPLICATION_LISTENER, handler.clone())
                .with_context(|| format!("Failed to register the application for {code:?}"))?;
            self.handlers.push((code, handler));
        }
        Ok(())
    }

    fn apply_pending_resize(&mut self) {
        let Some((width, height)) = self.state.pending_resize.take() else {
            return;
        };
        if (width, height) == (self.width, self.height) {
            return;
        }
        self.width = width;
        self.height = height;

        if width == 0 || height == 0 {
            log::info!("Window minimized, suspending application.");
            self.state.suspended.set(true);
            return;
        }
        if self.state.suspended.get() {
            log::info!("Window restored, resuming application.");
            self.state.suspended.set(false);
        }
        self.game.on_resize(&self.context, width, height);
    }

    /// Stops input, unregisters the application's handlers, shuts the event
    /// system down and closes the window. Safe to call in any state.
    fn teardown(&mut self) {
        self.context.input.shutdown();

        if self.context.events.is_initialized() {
            for (code, handler) in self.handlers.drain(..) {
                if let Err(e) = self
                    .context
                    .events
                    .unregister(code, APPLICATION_LISTENER, &handler)
                {
                    log::warn!("Failed to unregister the application handler: {e}");
                }
            }
        }
        self.handlers.clear();
        self.context.events.shutdown();
        self.platform.shutdown();

        let stats = self.context.allocator.stats();
        if stats.total_bytes != 0 {
            log::warn!(
                "{} bytes still allocated at shutdown.\n{}",
                stats.total_bytes,
                self.context.allocator.usage_report()
            );
        }
        log::info!("Application shut down.");
    }
}

struct QuitHandler {
    state: Rc<LoopState>,
}

impl EventHandler for QuitHandler {
    fn on_event(
        &self,
        _events: &EventSystem,
        _code: EventCode,
        _sender: Option<SenderId>,
        _listener: ListenerId,
        _context: &EventContext,
    ) -> bool {
        log::info!("Application quit requested, shutting down.");
        self.state.running.set(false);
        true
    }
}

/// Escape quits. Every other key is only logged.
struct KeyHandler;

impl EventHandler for KeyHandler {
    fn on_event(
        &self,
        events: &EventSystem,
        code: EventCode,
        _sender: Option<SenderId>,
        _listener: ListenerId,
        context: &EventContext,
    ) -> bool {
        let key = context.key_code();
        match SystemEventCode::try_from(code) {
            Ok(SystemEventCode::KeyPressed) if key == Key::ESCAPE => {
                // Other listeners may also react to the quit event.
                events.fire(SystemEventCode::ApplicationQuit, None, EventContext::empty());
                return true;
            }
            Ok(SystemEventCode::KeyPressed) => log::debug!("'{key}' key pressed in window."),
            Ok(SystemEventCode::KeyReleased) => log::debug!("'{key}' key released in window."),
            _ => {}
        }
        false
    }
}

/// Records the new size; the loop applies it after the pump.
struct ResizeHandler {
    state: Rc<LoopState>,
}

impl EventHandler for ResizeHandler {
    fn on_event(
        &self,
        _events: &EventSystem,
        _code: EventCode,
        _sender: Option<SenderId>,
        _listener: ListenerId,
        context: &EventContext,
    ) -> bool {
        let (width, height) = context.dimensions();
        log::debug!("Window resized to {width}x{height}.");
        self.state
            .pending_resize
            .set(Some((u32::from(width), u32::from(height))));
        false
    }
}
