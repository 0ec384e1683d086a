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

use anyhow::{Context, Result};
use aurora_infra::WinitPlatform;
use aurora_sdk::prelude::*;
use aurora_sdk::{HeadlessPlatform, PlatformEvent};
use clap::Parser;
use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

/// Listener identity of the testbed game.
const TESTBED_LISTENER: ListenerId = ListenerId(1);

#[derive(Parser, Debug)]
#[command(version, about = "Aurora Engine testbed")]
struct Args {
    /// JSON application config. Missing fields use the defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run a scripted session without opening a window.
    #[arg(long)]
    headless: bool,

    /// Idle frames the headless session runs before pressing Escape.
    #[arg(long, default_value_t = 120)]
    frames: usize,
}

/// The demo game: logs its callbacks and reacts to a few inputs.
#[derive(Default)]
struct TestbedGame {
    frame: u64,
    wheel_ticks: Rc<Cell<i64>>,
}

impl Game for TestbedGame {
    fn initialize(&mut self, context: &EngineContext) -> Result<()> {
        log::debug!("TestbedGame::initialize() called.");

        let wheel_ticks = self.wheel_ticks.clone();
        let on_wheel: Rc<dyn EventHandler> = Rc::new(
            move |_: &EventSystem,
                  _: EventCode,
                  _: Option<SenderId>,
                  _: ListenerId,
                  context: &EventContext| {
                wheel_ticks.set(wheel_ticks.get() + i64::from(context.wheel_delta()));
                log::debug!("Wheel position: {}", wheel_ticks.get());
                true
            },
        );
        context
            .events()
            .register(SystemEventCode::MouseWheel, TESTBED_LISTENER, on_wheel)?;
        Ok(())
    }

    fn update(&mut self, context: &EngineContext, delta_time: f32) -> Result<()> {
        self.frame += 1;
        let input = context.input();

        if input.is_key_down(Key::A) && input.was_key_up(Key::A) {
            log::debug!("Explicit - A key pressed!");
        }
        if input.is_key_up(Key::B) && input.was_key_down(Key::B) {
            log::debug!("Explicit - B key released!");
        }
        if input.is_button_down(MouseButton::Left) && input.was_button_up(MouseButton::Left) {
            let (x, y) = input.mouse_position();
            log::info!("Left click at ({x}, {y}).");
        }
        if self.frame % 600 == 0 {
            log::trace!("Frame {} ({:.3} ms).", self.frame, delta_time * 1000.0);
        }
        Ok(())
    }

    fn render(&mut self, _context: &EngineContext, _delta_time: f32) -> Result<()> {
        Ok(())
    }

    fn on_resize(&mut self, _context: &EngineContext, width: u32, height: u32) {
        log::debug!("TestbedGame::on_resize({width}, {height}) called.");
    }

    fn shutdown(&mut self, _context: &EngineContext) {
        log::info!(
            "Testbed ran {} frames, wheel ended at {}.",
            self.frame,
            self.wheel_ticks.get()
        );
    }
}

fn headless_script(idle_frames: usize) -> HeadlessPlatform {
    let edge = |key: Key, pressed: bool| {
        PlatformEvent::Input(if pressed {
            InputEvent::KeyPressed { key }
        } else {
            InputEvent::KeyReleased { key }
        })
    };

    HeadlessPlatform::new()
        .with_frame([edge(Key::A, true)])
        .with_frame([
            edge(Key::A, false),
            edge(Key::B, true),
            PlatformEvent::Input(InputEvent::MouseWheelScrolled { delta: 1 }),
        ])
        .with_frame([edge(Key::B, false)])
        .with_idle_frames(idle_frames)
        .with_frame([edge(Key::ESCAPE, true)])
}

fn run<P: Platform>(config: ApplicationConfig, platform: P) -> Result<()> {
    let mut app = Application::new(config, TestbedGame::default(), platform);
    app.create().context("Application failed to create")?;
    app.run().context("Application did not shut down gracefully")
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ApplicationConfig::load(path)?,
        None => ApplicationConfig::default(),
    };

    if args.headless {
        run(config, headless_script(args.frames))
    } else {
        run(config, WinitPlatform::new())
    }
}
