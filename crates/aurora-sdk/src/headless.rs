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

//! A windowless [`Platform`] that replays a scripted sequence of frames.

use anyhow::{bail, Result};
use aurora_core::event::{EventContext, EventSystem, SystemEventCode};
use aurora_core::input::{InputEvent, InputSystem};
use aurora_core::platform::{Platform, WindowSettings};
use std::collections::VecDeque;

/// One message a scripted frame delivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformEvent {
    /// An input edge, fed to the input tracker.
    Input(InputEvent),
    /// The window was resized.
    Resize {
        /// New width.
        width: u16,
        /// New height.
        height: u16,
    },
    /// The user asked to close the window.
    Close,
}

/// Replays one scripted frame per pump. Once the script runs out,
/// `pump_messages` reports that the platform is done.
#[derive(Debug, Default)]
pub struct HeadlessPlatform {
    frames: VecDeque<Vec<PlatformEvent>>,
    settings: Option<WindowSettings>,
    frames_pumped: usize,
    fail_startup: bool,
}

impl HeadlessPlatform {
    /// A platform with an empty script: the first pump ends the loop.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a frame delivering `events`.
    pub fn with_frame(mut self, events: impl IntoIterator<Item = PlatformEvent>) -> Self {
        self.frames.push_back(events.into_iter().collect());
        self
    }

    /// Appends `count` frames without messages.
    pub fn with_idle_frames(mut self, count: usize) -> Self {
        self.frames
            .extend(std::iter::repeat_with(Vec::new).take(count));
        self
    }

    /// Makes `startup` fail, for exercising error paths.
    pub fn failing_startup(mut self) -> Self {
        self.fail_startup = true;
        self
    }

    /// The settings received by `startup`, while started.
    pub fn settings(&self) -> Option<&WindowSettings> {
        self.settings.as_ref()
    }

    /// Number of pumps that delivered a scripted frame.
    pub fn frames_pumped(&self) -> usize {
        self.frames_pumped
    }

    /// Number of scripted frames not yet delivered.
    pub fn frames_remaining(&self) -> usize {
        self.frames.len()
    }
}

impl Platform for HeadlessPlatform {
    fn startup(&mut self, settings: &WindowSettings) -> Result<()> {
        if self.fail_startup {
            bail!("Headless platform configured to fail startup");
        }
        log::info!(
            "Headless platform started for '{}' ({}x{}, {} scripted frames).",
            settings.title,
            settings.width,
            settings.height,
            self.frames.len()
        );
        self.settings = Some(settings.clone());
        Ok(())
    }

    fn pump_messages(&mut self, input: &InputSystem, events: &EventSystem) -> bool {
        let Some(frame) = self.frames.pop_front() else {
            log::debug!("Headless script exhausted.");
            return false;
        };
        self.frames_pumped += 1;

        for message in frame {
            match message {
                PlatformEvent::Input(event) => input.process_event(&event),
                PlatformEvent::Resize { width, height } => {
                    events.fire(
                        SystemEventCode::Resized,
                        None,
                        EventContext::size(width, height),
                    );
                }
                PlatformEvent::Close => {
                    events.fire(
                        SystemEventCode::ApplicationQuit,
                        None,
                        EventContext::empty(),
                    );
                }
            }
        }
        true
    }

    fn shutdown(&mut self) {
        if self.settings.take().is_some() {
            log::info!("Headless platform shut down.");
        }
    }
}
