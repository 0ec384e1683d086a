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

//! The public-facing SDK of the Aurora runtime.
//!
//! A game implements [`Game`], picks a [`Platform`](aurora_core::platform::Platform)
//! and hands both to an [`Application`] together with an [`ApplicationConfig`].

#![warn(missing_docs)]

mod application;
mod config;
mod headless;

pub use application::{Application, EngineContext, Game, APPLICATION_LISTENER};
pub use config::ApplicationConfig;
pub use headless::{HeadlessPlatform, PlatformEvent};

/// The types most games need.
pub mod prelude {
    pub use crate::{Application, ApplicationConfig, EngineContext, Game};
    pub use aurora_core::event::{
        EventCode, EventContext, EventHandler, EventSystem, ListenerId, SenderId, SystemEventCode,
    };
    pub use aurora_core::input::{InputEvent, Key, MouseButton};
    pub use aurora_core::memory::{MemoryTag, TaggedAllocator};
    pub use aurora_core::platform::{Platform, WindowSettings};
}
