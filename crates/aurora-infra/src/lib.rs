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

//! # Aurora Infra
//!
//! Concrete backends for the contracts defined in `aurora-core`. The desktop
//! backend is built on `winit`.

#![warn(missing_docs)]

pub mod platform;

pub use platform::input::translate_winit_input;
pub use platform::window::{WinitPlatform, WinitWindow, WinitWindowBuilder};
