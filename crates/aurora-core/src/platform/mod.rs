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

//! The contract between the engine and a windowing backend.
//!
//! A backend owns the native window and its message queue. Each frame the
//! application asks it to pump pending messages; the backend feeds input
//! edges into the [`InputSystem`] and reports window-level happenings (close
//! requests, resizes) through the [`EventSystem`].

use crate::event::EventSystem;
use crate::input::InputSystem;

/// Where and how large the main window should be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSettings {
    /// The window title.
    pub title: String,
    /// Initial x-position of the window, in screen pixels.
    pub x: i32,
    /// Initial y-position of the window, in screen pixels.
    pub y: i32,
    /// Initial client-area width, in pixels.
    pub width: u32,
    /// Initial client-area height, in pixels.
    pub height: u32,
}

/// A windowing backend (winit, a headless script, ...).
pub trait Platform {
    /// Creates the main window.
    fn startup(&mut self, settings: &WindowSettings) -> anyhow::Result<()>;

    /// Processes every pending window message.
    ///
    /// Returns `false` once the backend can no longer deliver messages, which
    /// ends the application loop.
    fn pump_messages(&mut self, input: &InputSystem, events: &EventSystem) -> bool;

    /// Destroys the window. Called once at teardown, also after a failed
    /// `startup`.
    fn shutdown(&mut self);
}
