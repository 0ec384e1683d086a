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

use anyhow::{anyhow, Result};
use aurora_sdk::prelude::*;
use aurora_sdk::{HeadlessPlatform, PlatformEvent};
use std::cell::RefCell;
use std::rc::Rc;

// --- A GAME THAT RECORDS WHAT THE APPLICATION DOES TO IT ---
#[derive(Default)]
struct RecordingGame {
    initialized: bool,
    updates: u32,
    renders: u32,
    resizes: Vec<(u32, u32)>,
    shut_down: bool,
    fail_update_at: Option<u32>,
    key_a_samples: Vec<(bool, bool)>,
    keys_seen: Rc<RefCell<Vec<Key>>>,
}

impl Game for RecordingGame {
    fn initialize(&mut self, context: &EngineContext) -> Result<()> {
        self.initialized = true;
        let keys_seen = self.keys_seen.clone();
        let handler: Rc<dyn EventHandler> = Rc::new(
            move |_: &EventSystem,
                  _: EventCode,
                  _: Option<SenderId>,
                  _: ListenerId,
                  context: &EventContext| {
                keys_seen.borrow_mut().push(context.key_code());
                false
            },
        );
        context
            .events()
            .register(SystemEventCode::KeyPressed, ListenerId(1), handler)?;
        Ok(())
    }

    fn update(&mut self, context: &EngineContext, _delta_time: f32) -> Result<()> {
        self.updates += 1;
        if self.fail_update_at == Some(self.updates) {
            return Err(anyhow!("scripted update failure"));
        }
        let input = context.input();
        self.key_a_samples
            .push((input.is_key_down(Key::A), input.was_key_down(Key::A)));
        Ok(())
    }

    fn render(&mut self, _context: &EngineContext, _delta_time: f32) -> Result<()> {
        self.renders += 1;
        Ok(())
    }

    fn on_resize(&mut self, _context: &EngineContext, width: u32, height: u32) {
        self.resizes.push((width, height));
    }

    fn shutdown(&mut self, _context: &EngineContext) {
        self.shut_down = true;
    }
}

fn key_pressed(key: Key) -> PlatformEvent {
    PlatformEvent::Input(InputEvent::KeyPressed { key })
}

fn key_released(key: Key) -> PlatformEvent {
    PlatformEvent::Input(InputEvent::KeyReleased { key })
}

fn application(
    game: RecordingGame,
    platform: HeadlessPlatform,
) -> Application<RecordingGame, HeadlessPlatform> {
    Application::new(ApplicationConfig::default(), game, platform)
}

#[test]
fn test_escape_quits_after_finishing_the_frame() {
    // --- 1. ARRANGE ---
    let platform = HeadlessPlatform::new()
        .with_idle_frames(1)
        .with_frame([key_pressed(Key::ESCAPE)])
        .with_idle_frames(3);
    let mut app = application(RecordingGame::default(), platform);
    app.create().unwrap();

    // --- 2. ACT ---
    app.run().unwrap();

    // --- 3. ASSERT ---
    assert!(!app.is_running());
    assert_eq!(app.game().updates, 2);
    assert_eq!(app.game().renders, 2);
    assert_eq!(app.platform().frames_remaining(), 3);
    assert!(
        app.game().keys_seen.borrow().is_empty(),
        "Escape is claimed by the application before the game sees it"
    );
    assert!(app.game().shut_down);
}

#[test]
fn test_other_keys_reach_game_listeners() {
    let platform = HeadlessPlatform::new()
        .with_frame([key_pressed(Key::W), key_pressed(Key::D)])
        .with_frame([PlatformEvent::Close]);
    let mut app = application(RecordingGame::default(), platform);
    app.create().unwrap();
    app.run().unwrap();

    assert_eq!(*app.game().keys_seen.borrow(), vec![Key::W, Key::D]);
}

#[test]
fn test_close_request_stops_the_loop() {
    let platform = HeadlessPlatform::new()
        .with_frame([PlatformEvent::Close])
        .with_idle_frames(5);
    let mut app = application(RecordingGame::default(), platform);
    app.create().unwrap();
    app.run().unwrap();

    assert_eq!(app.game().updates, 1);
    assert_eq!(app.platform().frames_pumped(), 1);
}

#[test]
fn test_exhausted_platform_ends_the_loop() {
    let platform = HeadlessPlatform::new().with_idle_frames(2);
    let mut app = application(RecordingGame::default(), platform);
    app.create().unwrap();
    app.run().unwrap();

    // Two scripted frames plus the frame whose pump reported the end.
    assert_eq!(app.game().updates, 3);
}

#[test]
fn test_create_initializes_game_and_sends_initial_size() {
    let config = ApplicationConfig {
        name: "Sized".to_string(),
        start_width: 640,
        start_height: 480,
        ..ApplicationConfig::default()
    };
    let mut app = Application::new(config, RecordingGame::default(), HeadlessPlatform::new());
    app.create().unwrap();

    assert!(app.game().initialized);
    assert_eq!(app.game().resizes, vec![(640, 480)]);
    assert_eq!(
        app.platform().settings().map(|settings| settings.title.as_str()),
        Some("Sized")
    );
    assert!(app.context().events().is_initialized());
    assert!(app.context().input().is_initialized());
    assert!(app.is_running());
}

#[test]
fn test_second_create_is_rejected() {
    let mut app = application(RecordingGame::default(), HeadlessPlatform::new());
    app.create().unwrap();
    assert!(app.create().is_err());
    assert!(app.context().events().is_initialized());
}

#[test]
fn test_run_requires_create() {
    let mut app = application(RecordingGame::default(), HeadlessPlatform::new());
    assert!(app.run().is_err());
    assert_eq!(app.game().updates, 0);
}

#[test]
fn test_zero_size_suspends_until_restored() {
    // --- 1. ARRANGE ---
    let platform = HeadlessPlatform::new()
        .with_frame([PlatformEvent::Resize {
            width: 0,
            height: 0,
        }])
        .with_idle_frames(1)
        .with_frame([PlatformEvent::Resize {
            width: 800,
            height: 600,
        }])
        .with_frame([PlatformEvent::Close]);
    let mut app = application(RecordingGame::default(), platform);
    app.create().unwrap();

    // --- 2. ACT ---
    app.run().unwrap();

    // --- 3. ASSERT ---
    assert_eq!(app.game().updates, 2, "No update while suspended");
    assert_eq!(app.game().resizes, vec![(1280, 720), (800, 600)]);
    assert!(!app.is_suspended());
    assert_eq!(app.size(), (800, 600));
}

#[test]
fn test_input_frames_are_double_buffered() {
    let platform = HeadlessPlatform::new()
        .with_frame([key_pressed(Key::A)])
        .with_idle_frames(1)
        .with_frame([key_released(Key::A)]);
    let mut app = application(RecordingGame::default(), platform);
    app.create().unwrap();
    app.run().unwrap();

    assert_eq!(
        app.game().key_a_samples,
        vec![(true, false), (true, true), (false, true), (false, false)]
    );
}

#[test]
fn test_update_failure_stops_and_shuts_down() {
    let game = RecordingGame {
        fail_update_at: Some(2),
        ..RecordingGame::default()
    };
    let platform = HeadlessPlatform::new().with_idle_frames(10);
    let mut app = application(game, platform);
    app.create().unwrap();

    let error = app.run().unwrap_err();
    assert!(format!("{error:#}").contains("scripted update failure"));
    assert_eq!(app.game().renders, 1);
    assert!(app.game().shut_down);
    assert!(!app.context().events().is_initialized());
    assert!(!app.context().input().is_initialized());
}

#[test]
fn test_startup_failure_is_reported_and_cleaned_up() {
    let mut app = application(
        RecordingGame::default(),
        HeadlessPlatform::new().failing_startup(),
    );

    let error = app.create().unwrap_err();
    assert!(format!("{error:#}").contains("Platform failed to start"));
    assert!(!app.game().initialized);
    assert!(!app.context().events().is_initialized());
    assert!(app.run().is_err());
}

#[test]
fn test_all_engine_memory_is_released_after_run() {
    let platform = HeadlessPlatform::new()
        .with_frame([key_pressed(Key::B), key_released(Key::B)])
        .with_frame([PlatformEvent::Close]);
    let mut app = application(RecordingGame::default(), platform);
    app.create().unwrap();
    let in_use_after_create = app.context().allocator().total_usage();

    app.run().unwrap();

    assert!(in_use_after_create > 0, "Listener lists live in tagged memory");
    assert_eq!(app.context().allocator().total_usage(), 0);
    assert_eq!(app.context().allocator().tag_usage(MemoryTag::DArray), 0);
}
