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

use super::codes::{EventCode, MAX_MESSAGE_CODES};
use super::system::ListenerId;
use std::fmt;

/// A rejected event-router operation. The router state is left unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventError {
    /// The event system was used before `initialize` or after `shutdown`.
    NotInitialized {
        /// The code the operation targeted.
        code: EventCode,
    },
    /// `initialize` was called on a running event system.
    AlreadyInitialized,
    /// The code is outside `0..MAX_MESSAGE_CODES`.
    CodeOutOfRange {
        /// The rejected code.
        code: EventCode,
    },
    /// The listener is already registered for this code.
    DuplicateListener {
        /// The code the listener is registered for.
        code: EventCode,
        /// The listener.
        listener: ListenerId,
    },
    /// Nothing was ever registered for this code.
    NoListeners {
        /// The code.
        code: EventCode,
    },
    /// No registration matches the listener and handler pair.
    NotRegistered {
        /// The code.
        code: EventCode,
        /// The listener.
        listener: ListenerId,
    },
}

impl fmt::Display for EventError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventError::NotInitialized { code } => {
                write!(f, "Event {code} used before the event system was initialized")
            }
            EventError::AlreadyInitialized => write!(f, "Event system is already initialized"),
            EventError::CodeOutOfRange { code } => {
                write!(f, "Event code {code} is out of range (max {MAX_MESSAGE_CODES})")
            }
            EventError::DuplicateListener { code, listener } => {
                write!(
                    f,
                    "Listener {listener:?} is already registered for event {code}"
                )
            }
            EventError::NoListeners { code } => {
                write!(f, "No listener was ever registered for event {code}")
            }
            EventError::NotRegistered { code, listener } => {
                write!(
                    f,
                    "Listener {listener:?} has no matching registration for event {code}"
                )
            }
        }
    }
}

impl std::error::Error for EventError {}
