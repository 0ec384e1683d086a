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

use crate::input::{Key, MouseButton};
use bytemuck::{Pod, Zeroable};
use std::fmt;

/// The fixed-size payload carried by every event.
///
/// The 16 bytes can be read through any of the typed views below. Which view
/// is meaningful depends on the event code; for engine events the typed
/// constructors and readers (`key`, `mouse_position`, ...) encode the layout
/// documented on [`SystemEventCode`](super::SystemEventCode). Larger payloads
/// must be passed by reference outside the event mechanism.
#[repr(C)]
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct EventContext {
    data: [u8; 16],
}

macro_rules! context_views {
    ($($from:ident, $view:ident: [$ty:ty; $n:literal];)*) => {
        impl EventContext {
            $(
                #[doc = concat!("Builds a payload from `", stringify!($n), "` values of `", stringify!($ty), "`.")]
                pub fn $from(values: [$ty; $n]) -> Self {
                    Self { data: bytemuck::cast(values) }
                }

                #[doc = concat!("Reads the payload as `", stringify!($n), "` values of `", stringify!($ty), "`.")]
                pub fn $view(&self) -> [$ty; $n] {
                    bytemuck::cast(self.data)
                }
            )*
        }
    };
}

context_views! {
    from_i64, as_i64: [i64; 2];
    from_u64, as_u64: [u64; 2];
    from_f64, as_f64: [f64; 2];
    from_i32, as_i32: [i32; 4];
    from_u32, as_u32: [u32; 4];
    from_f32, as_f32: [f32; 4];
    from_i16, as_i16: [i16; 8];
    from_u16, as_u16: [u16; 8];
    from_i8, as_i8: [i8; 16];
    from_u8, as_u8: [u8; 16];
}

impl EventContext {
    /// An all-zero payload, used by events that carry no data.
    pub const fn empty() -> Self {
        Self { data: [0; 16] }
    }

    /// Payload for `KeyPressed`/`KeyReleased`.
    pub fn key(key: Key) -> Self {
        let mut values = [0u16; 8];
        values[0] = key.code() as u16;
        Self::from_u16(values)
    }

    /// Payload for `ButtonPressed`/`ButtonReleased`.
    pub fn button(button: MouseButton) -> Self {
        let mut values = [0u16; 8];
        values[0] = button.index() as u16;
        Self::from_u16(values)
    }

    /// Payload for `MouseMoved`.
    pub fn mouse_position(x: i16, y: i16) -> Self {
        let mut values = [0i16; 8];
        values[0] = x;
        values[1] = y;
        Self::from_i16(values)
    }

    /// Payload for `MouseWheel`.
    pub fn wheel(delta: i8) -> Self {
        let mut values = [0i8; 16];
        values[0] = delta;
        Self::from_i8(values)
    }

    /// Payload for `Resized`.
    pub fn size(width: u16, height: u16) -> Self {
        let mut values = [0u16; 8];
        values[0] = width;
        values[1] = height;
        Self::from_u16(values)
    }

    /// Reads the key of a `KeyPressed`/`KeyReleased` payload.
    pub fn key_code(&self) -> Key {
        Key(self.as_u16()[0] as u8)
    }

    /// Reads the button of a `ButtonPressed`/`ButtonReleased` payload.
    pub fn mouse_button(&self) -> Option<MouseButton> {
        MouseButton::from_index(self.as_u16()[0] as usize)
    }

    /// Reads the `(x, y)` of a `MouseMoved` payload.
    pub fn position(&self) -> (i16, i16) {
        let values = self.as_i16();
        (values[0], values[1])
    }

    /// Reads the delta of a `MouseWheel` payload.
    pub fn wheel_delta(&self) -> i8 {
        self.as_i8()[0]
    }

    /// Reads the `(width, height)` of a `Resized` payload.
    pub fn dimensions(&self) -> (u16, u16) {
        let values = self.as_u16();
        (values[0], values[1])
    }
}

impl fmt::Debug for EventContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EventContext").field(&self.as_u16()).finish()
    }
}
