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

use aurora_core::memory::format_bytes;
use aurora_core::{
    DArray, EventCode, EventContext, EventHandler, EventSystem, InputEvent, InputSystem, Key,
    ListenerId, MemoryTag, SenderId, SystemEventCode, TaggedAllocator,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

/// Builds a handler that counts its calls and answers with `handled`.
fn counting_handler(calls: &Rc<Cell<u32>>, handled: bool) -> Rc<dyn EventHandler> {
    let calls = calls.clone();
    Rc::new(
        move |_: &EventSystem,
              _: EventCode,
              _: Option<SenderId>,
              _: ListenerId,
              _: &EventContext| {
            calls.set(calls.get() + 1);
            handled
        },
    )
}

#[test]
fn test_darray_int_scenario() {
    // --- 1. ARRANGE ---
    let allocator = Arc::new(TaggedAllocator::new());
    let mut array = DArray::<i32>::with_capacity(allocator.clone(), 1);
    assert_eq!(array.stride(), 4);

    // --- 2. ACT ---
    for value in [10, 20, 30, 40] {
        array.push(value);
    }
    let removed = array.pop_at(1);

    // --- 3. ASSERT ---
    assert_eq!(removed, Ok(20));
    assert_eq!(array.as_slice(), &[10, 30, 40]);
    assert_eq!(array.len(), 3);
    assert!(array.capacity() >= 4);

    array.destroy();
    assert_eq!(
        allocator.tag_usage(MemoryTag::DArray),
        0,
        "Destroying the array must return every byte to the DArray tag"
    );
}

#[test]
fn test_darray_capacity_doubles_from_one() {
    let allocator = Arc::new(TaggedAllocator::new());
    let mut array = DArray::<u16>::with_capacity(allocator, 1);

    for pushes in 1..=33usize {
        array.push(pushes as u16);
        assert_eq!(array.capacity(), pushes.next_power_of_two());
        assert_eq!(array.len(), pushes);
    }

    for remaining in (30..33usize).rev() {
        assert!(array.pop().is_some());
        assert_eq!(array.len(), remaining);
    }
    assert_eq!(array.capacity(), 64, "Capacity never shrinks");
}

#[test]
fn test_darray_insert_then_pop_restores_sequence() {
    let allocator = Arc::new(TaggedAllocator::new());
    let mut array = DArray::<u64>::new(allocator);
    array.extend_from_slice(&[1, 2, 3, 4, 5]);
    let original = array.as_slice().to_vec();

    for index in 0..original.len() {
        array.insert_at(index, 99).unwrap();
        assert_eq!(array.len(), original.len() + 1);
        assert_eq!(array.pop_at(index), Ok(99));
        assert_eq!(array.as_slice(), original.as_slice());
    }
}

#[test]
fn test_tagged_accounting_round_trip() {
    let allocator = TaggedAllocator::new();
    let before = allocator.tag_usage(MemoryTag::Texture);

    let block = allocator.allocate(100, MemoryTag::Texture);
    assert_eq!(allocator.tag_usage(MemoryTag::Texture), before + 100);
    allocator.free(block, 100, MemoryTag::Texture);

    assert_eq!(allocator.tag_usage(MemoryTag::Texture), before);
    assert_eq!(allocator.total_usage(), 0);
    assert!(allocator.usage_report().contains(&format_bytes(0)));
}

#[test]
fn test_duplicate_listener_is_called_once() {
    // --- 1. ARRANGE ---
    let events = EventSystem::new(Arc::new(TaggedAllocator::new()));
    events.initialize().unwrap();
    let calls = Rc::new(Cell::new(0));
    let handler = counting_handler(&calls, false);

    // --- 2. ACT ---
    let first = events.register(SystemEventCode::KeyPressed, ListenerId(7), handler.clone());
    let second = events.register(SystemEventCode::KeyPressed, ListenerId(7), handler);
    events.fire(SystemEventCode::KeyPressed, None, EventContext::key(Key::A));

    // --- 3. ASSERT ---
    assert!(first.is_ok());
    assert!(second.is_err());
    assert_eq!(events.listener_count(SystemEventCode::KeyPressed), 1);
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_first_handler_to_claim_stops_dispatch() {
    let events = EventSystem::new(Arc::new(TaggedAllocator::new()));
    events.initialize().unwrap();
    let (a, b, c) = (
        Rc::new(Cell::new(0)),
        Rc::new(Cell::new(0)),
        Rc::new(Cell::new(0)),
    );
    let code: EventCode = 0x1000;
    events
        .register(code, ListenerId(1), counting_handler(&a, false))
        .unwrap();
    events
        .register(code, ListenerId(2), counting_handler(&b, true))
        .unwrap();
    events
        .register(code, ListenerId(3), counting_handler(&c, false))
        .unwrap();

    assert!(events.fire(code, Some(SenderId(0)), EventContext::empty()));
    assert_eq!((a.get(), b.get(), c.get()), (1, 1, 0));
}

#[test]
fn test_input_edges_and_frame_boundary() {
    // --- 1. ARRANGE ---
    let events = Rc::new(EventSystem::new(Arc::new(TaggedAllocator::new())));
    events.initialize().unwrap();
    let input = InputSystem::new(events.clone());
    input.initialize();

    let pressed = Rc::new(Cell::new(0));
    events
        .register(
            SystemEventCode::KeyPressed,
            ListenerId(1),
            counting_handler(&pressed, true),
        )
        .unwrap();

    // --- 2. ACT ---
    input.process_event(&InputEvent::KeyPressed { key: Key::Q });
    input.process_event(&InputEvent::KeyPressed { key: Key::Q });

    // --- 3. ASSERT ---
    assert_eq!(pressed.get(), 1, "A held key must fire exactly once");
    assert!(input.is_key_down(Key::Q));
    assert!(!input.was_key_down(Key::Q));

    input.end_of_frame_update();
    assert!(input.was_key_down(Key::Q));
    assert!(input.is_key_down(Key::Q));

    input.process_event(&InputEvent::KeyReleased { key: Key::Q });
    assert!(input.was_key_down(Key::Q));
    assert!(input.is_key_up(Key::Q));
}

#[test]
fn test_shutdown_returns_all_event_memory() {
    let allocator = Arc::new(TaggedAllocator::new());
    let events = EventSystem::new(allocator.clone());
    events.initialize().unwrap();

    let log = Rc::new(RefCell::new(Vec::new()));
    for code in 0x100..0x140u16 {
        let sink = log.clone();
        let handler: Rc<dyn EventHandler> = Rc::new(
            move |_: &EventSystem,
                  code: EventCode,
                  _: Option<SenderId>,
                  _: ListenerId,
                  _: &EventContext| {
                sink.borrow_mut().push(code);
                false
            },
        );
        events.register(code, ListenerId(1), handler).unwrap();
    }
    events.fire(0x120u16, None, EventContext::empty());
    assert_eq!(*log.borrow(), vec![0x120]);

    events.shutdown();
    let stats = allocator.stats();
    assert_eq!(stats.total_bytes, 0);
    assert_eq!(stats.live_allocations(), 0);
}
