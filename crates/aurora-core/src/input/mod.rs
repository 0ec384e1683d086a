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

//! Double-buffered keyboard and mouse state.
//!
//! The platform layer feeds raw input edges into the [`InputSystem`], which
//! keeps a "current" snapshot updated and fires the matching engine event on
//! every change. Once per frame, [`InputSystem::end_of_frame_update`] copies
//! the current snapshot into the "previous" one, so queries can compare this
//! frame against the last.

mod keys;
mod system;

pub use self::keys::{Key, MouseButton, KEY_COUNT};
pub use self::system::{InputEvent, InputSystem};
