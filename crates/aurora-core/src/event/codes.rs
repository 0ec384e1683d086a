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

/// Identifies a kind of event. Valid codes are below [`MAX_MESSAGE_CODES`].
pub type EventCode = u16;

/// Number of distinct event codes the router accepts.
pub const MAX_MESSAGE_CODES: usize = 16384;

/// Event codes reserved by the engine. Application codes start above
/// [`SystemEventCode::MAX`].
///
/// Each variant documents the [`EventContext`](super::EventContext) layout it
/// carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum SystemEventCode {
    /// Shuts the application down on the next frame. No payload.
    ApplicationQuit = 0x01,
    /// A keyboard key was pressed. `u16[0]` holds the key code.
    KeyPressed = 0x02,
    /// A keyboard key was released. `u16[0]` holds the key code.
    KeyReleased = 0x03,
    /// A mouse button was pressed. `u16[0]` holds the button.
    ButtonPressed = 0x04,
    /// A mouse button was released. `u16[0]` holds the button.
    ButtonReleased = 0x05,
    /// The mouse moved. `i16[0]` is x, `i16[1]` is y.
    MouseMoved = 0x06,
    /// The mouse wheel turned. `i8[0]` holds the normalized delta.
    MouseWheel = 0x07,
    /// The window was resized. `u16[0]` is the width, `u16[1]` the height.
    Resized = 0x08,
}

impl SystemEventCode {
    /// The highest code reserved for the engine.
    pub const MAX: EventCode = 0xFF;

    /// The raw code of this event.
    pub const fn code(self) -> EventCode {
        self as EventCode
    }
}

impl From<SystemEventCode> for EventCode {
    fn from(code: SystemEventCode) -> Self {
        code.code()
    }
}

impl TryFrom<EventCode> for SystemEventCode {
    type Error = EventCode;

    fn try_from(code: EventCode) -> Result<Self, Self::Error> {
        match code {
            0x01 => Ok(SystemEventCode::ApplicationQuit),
            0x02 => Ok(SystemEventCode::KeyPressed),
            0x03 => Ok(SystemEventCode::KeyReleased),
            0x04 => Ok(SystemEventCode::ButtonPressed),
            0x05 => Ok(SystemEventCode::ButtonReleased),
            0x06 => Ok(SystemEventCode::MouseMoved),
            0x07 => Ok(SystemEventCode::MouseWheel),
            0x08 => Ok(SystemEventCode::Resized),
            other => Err(other),
        }
    }
}
