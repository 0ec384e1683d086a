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
use super::context::EventContext;
use super::error::EventError;
use crate::containers::DArray;
use crate::memory::TaggedAllocator;
use bytemuck::{Pod, Zeroable};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

/// Opaque identity of a registered listener.
///
/// The router only compares identities; it never interprets them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Opaque identity of the object firing an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SenderId(pub u64);

/// The capability a listener registers with the router.
pub trait EventHandler {
    /// Handles one event.
    ///
    /// `events` is the router dispatching the event, so handlers may fire
    /// follow-up events. Returning `true` claims the event: no later listener
    /// for the same code receives it.
    fn on_event(
        &self,
        events: &EventSystem,
        code: EventCode,
        sender: Option<SenderId>,
        listener: ListenerId,
        context: &EventContext,
    ) -> bool;
}

impl<F> EventHandler for F
where
    F: Fn(&EventSystem, EventCode, Option<SenderId>, ListenerId, &EventContext) -> bool,
{
    fn on_event(
        &self,
        events: &EventSystem,
        code: EventCode,
        sender: Option<SenderId>,
        listener: ListenerId,
        context: &EventContext,
    ) -> bool {
        self(events, code, sender, listener, context)
    }
}

/// One entry of a code's listener list. The handler lives in the router's
/// handler table at `handler_slot`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct RegisteredEvent {
    listener: u64,
    handler_slot: u32,
    _padding: u32,
}

struct EventSystemState {
    registered: HashMap<EventCode, DArray<RegisteredEvent>>,
    handlers: Vec<Option<Rc<dyn EventHandler>>>,
    free_slots: Vec<u32>,
}

impl EventSystemState {
    fn store_handler(&mut self, handler: Rc<dyn EventHandler>) -> u32 {
        match self.free_slots.pop() {
            Some(slot) => {
                self.handlers[slot as usize] = Some(handler);
                slot
            }
            None => {
                self.handlers.push(Some(handler));
                (self.handlers.len() - 1) as u32
            }
        }
    }

    fn release_handler(&mut self, slot: u32) {
        self.handlers[slot as usize] = None;
        self.free_slots.push(slot);
    }

    fn handler(&self, slot: u32) -> Option<Rc<dyn EventHandler>> {
        self.handlers.get(slot as usize).cloned().flatten()
    }

    fn position(&self, code: EventCode, entry: RegisteredEvent) -> Option<usize> {
        self.registered.get(&code)?.iter().position(|registered| {
            registered.listener == entry.listener && registered.handler_slot == entry.handler_slot
        })
    }

    /// Index to dispatch after `current` returned unhandled. Handlers may
    /// have removed or added entries, so the walk resumes from where
    /// `follower` (or else `current`) sits now.
    fn resume_index(
        &self,
        code: EventCode,
        index: usize,
        current: RegisteredEvent,
        follower: Option<RegisteredEvent>,
    ) -> usize {
        if let Some(position) = follower.and_then(|entry| self.position(code, entry)) {
            return position;
        }
        match self.position(code, current) {
            Some(position) => position + 1,
            None => index,
        }
    }
}

/// The engine's event router.
///
/// Listener lists are created lazily, one growable array per code, and all of
/// them are destroyed by [`shutdown`](Self::shutdown). Dispatch never holds
/// the router borrowed while a handler runs: handlers may fire other events
/// and may even register or unregister listeners. After each handler the walk
/// resumes at the entry that followed it, wherever that entry now sits, so
/// removals never cause a remaining listener to be skipped. Listeners added
/// during dispatch are reached when they land after that point.
///
/// Only the per-code listener arrays go through the [`TaggedAllocator`]
/// (under [`MemoryTag::DArray`](crate::memory::MemoryTag::DArray)). The code
/// map and the handler slot table are ordinary heap collections and do not
/// show up in the tag counters.
pub struct EventSystem {
    allocator: Arc<TaggedAllocator>,
    state: RefCell<Option<EventSystemState>>,
}

impl EventSystem {
    /// Creates an uninitialized event system whose listener lists are
    /// allocated through `allocator`.
    pub fn new(allocator: Arc<TaggedAllocator>) -> Self {
        Self {
            allocator,
            state: RefCell::new(None),
        }
    }

    /// Brings the event system up with no registrations.
    pub fn initialize(&self) -> Result<(), EventError> {
        let mut state = self.state.borrow_mut();
        if state.is_some() {
            log::warn!("Event system initialize called more than once.");
            return Err(EventError::AlreadyInitialized);
        }

        *state = Some(EventSystemState {
            registered: HashMap::new(),
            handlers: Vec::new(),
            free_slots: Vec::new(),
        });
        log::info!("Event subsystem initialized.");
        Ok(())
    }

    /// Destroys every listener list. The event system can be initialized again.
    pub fn shutdown(&self) {
        // Dropped outside the borrow: handlers may own references back to us.
        let state = self.state.borrow_mut().take();
        if let Some(state) = state {
            let lists = state.registered.len();
            drop(state);
            log::info!("Event subsystem shut down ({lists} listener lists destroyed).");
        }
    }

    /// Returns `true` between `initialize` and `shutdown`.
    pub fn is_initialized(&self) -> bool {
        self.state.borrow().is_some()
    }

    /// Registers `handler` for `code` under the identity `listener`.
    ///
    /// A listener can be registered at most once per code.
    pub fn register(
        &self,
        code: impl Into<EventCode>,
        listener: ListenerId,
        handler: Rc<dyn EventHandler>,
    ) -> Result<(), EventError> {
        let code = code.into();
        let mut guard = self.state.borrow_mut();
        let Some(state) = guard.as_mut() else {
            log::error!("event register for event {code} is called before initialization.");
            return Err(EventError::NotInitialized { code });
        };
        check_code(code)?;

        if let Some(listeners) = state.registered.get(&code) {
            if listeners.iter().any(|entry| entry.listener == listener.0) {
                log::warn!("Trying to register an already registered listener for event {code}.");
                return Err(EventError::DuplicateListener { code, listener });
            }
        }

        let handler_slot = state.store_handler(handler);
        let allocator = &self.allocator;
        state
            .registered
            .entry(code)
            .or_insert_with(|| DArray::new(allocator.clone()))
            .push(RegisteredEvent {
                listener: listener.0,
                handler_slot,
                _padding: 0,
            });

        log::trace!("Listener {listener:?} registered for event {code}.");
        Ok(())
    }

    /// Removes the registration of exactly this `listener` and `handler` for `code`.
    ///
    /// The remaining listeners keep their relative order.
    pub fn unregister(
        &self,
        code: impl Into<EventCode>,
        listener: ListenerId,
        handler: &Rc<dyn EventHandler>,
    ) -> Result<(), EventError> {
        let code = code.into();
        let removed = {
            let mut guard = self.state.borrow_mut();
            let Some(state) = guard.as_mut() else {
                log::error!("event unregister for event {code} is called before initialization.");
                return Err(EventError::NotInitialized { code });
            };
            check_code(code)?;

            let Some(listeners) = state.registered.get(&code) else {
                log::warn!("Trying to unregister from event {code} but no listener was registered.");
                return Err(EventError::NoListeners { code });
            };

            let position = listeners.iter().position(|entry| {
                entry.listener == listener.0
                    && state
                        .handler(entry.handler_slot)
                        .is_some_and(|stored| Rc::ptr_eq(&stored, handler))
            });
            let Some(index) = position else {
                log::warn!("Listener {listener:?} has no matching registration for event {code}.");
                return Err(EventError::NotRegistered { code, listener });
            };

            let entry = state
                .registered
                .get_mut(&code)
                .and_then(|listeners| listeners.pop_at(index).ok());
            entry.map(|entry| {
                let handler = state.handler(entry.handler_slot);
                state.release_handler(entry.handler_slot);
                handler
            })
        };

        // The handler may be the last owner of state that refers back to us.
        drop(removed);
        log::trace!("Listener {listener:?} unregistered from event {code}.");
        Ok(())
    }

    /// Dispatches an event to the listeners of `code` in registration order.
    ///
    /// Returns `true` as soon as one handler claims the event. Returns `false`
    /// if nobody claimed it, including when no listener is registered.
    pub fn fire(
        &self,
        code: impl Into<EventCode>,
        sender: Option<SenderId>,
        context: EventContext,
    ) -> bool {
        let code = code.into();
        {
            let state = self.state.borrow();
            if state.is_none() {
                log::error!("An event {code} is fired before the event subsystem was initialized.");
                return false;
            }
        }
        if check_code(code).is_err() {
            return false;
        }

        let mut index = 0;
        loop {
            let next = {
                let guard = self.state.borrow();
                guard.as_ref().and_then(|state| {
                    let list = state.registered.get(&code)?;
                    let entry = list.get(index)?;
                    Some((entry, list.get(index + 1), state.handler(entry.handler_slot)))
                })
            };

            let Some((current, follower, handler)) = next else {
                return false;
            };

            if let Some(handler) = handler {
                let listener = ListenerId(current.listener);
                if handler.on_event(self, code, sender, listener, &context) {
                    log::trace!("Event {code} handled by listener {listener:?}.");
                    return true;
                }
            }

            index = match self.state.borrow().as_ref() {
                Some(state) => state.resume_index(code, index, current, follower),
                None => return false,
            };
        }
    }

    /// Number of listeners currently registered for `code`.
    pub fn listener_count(&self, code: impl Into<EventCode>) -> usize {
        let code = code.into();
        self.state
            .borrow()
            .as_ref()
            .and_then(|state| state.registered.get(&code).map(DArray::len))
            .unwrap_or(0)
    }

    /// Returns `true` once a listener list exists for `code`, even if every
    /// listener has since been removed.
    pub fn has_listener_list(&self, code: impl Into<EventCode>) -> bool {
        let code = code.into();
        self.state
            .borrow()
            .as_ref()
            .is_some_and(|state| state.registered.contains_key(&code))
    }
}

impl std::fmt::Debug for EventSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("EventSystem")
            .field("initialized", &state.is_some())
            .field(
                "listener_lists",
                &state.as_ref().map_or(0, |state| state.registered.len()),
            )
            .finish()
    }
}

fn check_code(code: EventCode) -> Result<(), EventError> {
    if (code as usize) < MAX_MESSAGE_CODES {
        Ok(())
    } else {
        log::warn!("Event code {code} is out of range (max {MAX_MESSAGE_CODES}).");
        Err(EventError::CodeOutOfRange { code })
    }
}
