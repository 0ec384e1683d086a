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

//! Code-indexed publish/subscribe event routing.
//!
//! Listeners register an [`EventHandler`] for an [`EventCode`]. Firing a code
//! calls the handlers in registration order and stops at the first one that
//! reports the event as handled, so at most one handler claims each event.
//!
//! Every payload is a fixed 16-byte [`EventContext`]; the layout expected for
//! each system code is documented on [`SystemEventCode`].

mod codes;
mod context;
mod error;
mod system;

pub use self::codes::{EventCode, SystemEventCode, MAX_MESSAGE_CODES};
pub use self::context::EventContext;
pub use self::error::EventError;
pub use self::system::{EventHandler, EventSystem, ListenerId, SenderId};
