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

//! # Aurora Core
//!
//! Foundational runtime substrate of the engine. Every higher-level subsystem
//! builds on the primitives defined here:
//!
//! - [`memory`]: the tagged allocator through which all engine heap traffic flows.
//! - [`containers`]: the growable array built on top of the tagged allocator.
//! - [`event`]: the code-indexed publish/subscribe router.
//! - [`input`]: the double-buffered keyboard and mouse state tracker.
//! - [`platform`]: the contract a windowing backend implements.
//!
//! The core is single-threaded. Subsystems are explicit context
//! objects with `initialize`/`shutdown` lifecycles, shared by reference.

#![warn(missing_docs)]

pub mod containers;
pub mod event;
pub mod input;
pub mod memory;
pub mod platform;

pub use containers::{DArray, DArrayError, RawDArray};
pub use event::{
    EventCode, EventContext, EventError, EventHandler, EventSystem, ListenerId, SenderId,
    SystemEventCode,
};
pub use input::{InputEvent, InputSystem, Key, MouseButton};
pub use memory::{MemoryBlock, MemoryStats, MemoryTag, TaggedAllocator};
pub use platform::{Platform, WindowSettings};
