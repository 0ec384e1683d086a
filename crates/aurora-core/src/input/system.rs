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

use super::keys::{Key, MouseButton, KEY_COUNT};
use crate::event::{EventContext, EventSystem, SystemEventCode};
use std::cell::RefCell;
use std::rc::Rc;

/// A backend-agnostic input edge, as produced by a platform layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// A keyboard key went down.
    KeyPressed {
        /// The key.
        key: Key,
    },
    /// A keyboard key went up.
    KeyReleased {
        /// The key.
        key: Key,
    },
    /// A mouse button went down.
    MouseButtonPressed {
        /// The button.
        button: MouseButton,
    },
    /// A mouse button went up.
    MouseButtonReleased {
        /// The button.
        button: MouseButton,
    },
    /// The cursor moved, in window coordinates.
    MouseMoved {
        /// The new x-coordinate.
        x: i16,
        /// The new y-coordinate.
        y: i16,
    },
    /// The wheel turned. Positive is away from the user.
    MouseWheelScrolled {
        /// The delta, normalized to -1 or 1.
        delta: i8,
    },
}

#[derive(Clone, Copy)]
struct KeyboardState {
    keys: [bool; KEY_COUNT],
}

impl Default for KeyboardState {
    fn default() -> Self {
        Self {
            keys: [false; KEY_COUNT],
        }
    }
}

#[derive(Clone, Copy, Default)]
struct MouseState {
    x: i16,
    y: i16,
    buttons: [bool; MouseButton::COUNT],
}

#[derive(Default)]
struct InputState {
    keyboard_current: KeyboardState,
    keyboard_previous: KeyboardState,
    mouse_current: MouseState,
    mouse_previous: MouseState,
}

/// Tracks keyboard and mouse state for the current and previous frame.
///
/// Every `process_*` call fires its engine event synchronously through the
/// shared [`EventSystem`] before returning. Queries made before
/// [`initialize`](Self::initialize) report nothing pressed at `(0, 0)`.
pub struct InputSystem {
    events: Rc<EventSystem>,
    state: RefCell<Option<InputState>>,
}

impl InputSystem {
    /// Creates an uninitialized input system that reports through `events`.
    pub fn new(events: Rc<EventSystem>) -> Self {
        Self {
            events,
            state: RefCell::new(None),
        }
    }

    /// Resets both snapshots and starts accepting input.
    pub fn initialize(&self) {
        *self.state.borrow_mut() = Some(InputState::default());
        log::info!("Input subsystem initialized.");
    }

    /// Stops accepting input.
    pub fn shutdown(&self) {
        if self.state.borrow_mut().take().is_some() {
            log::info!("Input subsystem shut down.");
        }
    }

    /// Returns `true` between `initialize` and `shutdown`.
    pub fn is_initialized(&self) -> bool {
        self.state.borrow().is_some()
    }

    /// The event system input events are fired through.
    pub fn events(&self) -> &Rc<EventSystem> {
        &self.events
    }

    /// Copies the current snapshots into the previous ones. Call once per
    /// frame after all input for the frame has been processed.
    pub fn end_of_frame_update(&self) {
        if let Some(state) = self.state.borrow_mut().as_mut() {
            state.keyboard_previous = state.keyboard_current;
            state.mouse_previous = state.mouse_current;
        }
    }

    /// Records a key edge, firing `KeyPressed` or `KeyReleased` if the key
    /// changed state.
    pub fn process_key(&self, key: Key, pressed: bool) {
        let changed = self.update(|state| {
            let slot = &mut state.keyboard_current.keys[key.index()];
            let changed = *slot != pressed;
            *slot = pressed;
            changed
        });

        if changed {
            let code = if pressed {
                SystemEventCode::KeyPressed
            } else {
                SystemEventCode::KeyReleased
            };
            self.events.fire(code, None, EventContext::key(key));
        }
    }

    /// Records a button edge, firing `ButtonPressed` or `ButtonReleased` if the
    /// button changed state.
    pub fn process_mouse_button(&self, button: MouseButton, pressed: bool) {
        let changed = self.update(|state| {
            let slot = &mut state.mouse_current.buttons[button.index()];
            let changed = *slot != pressed;
            *slot = pressed;
            changed
        });

        if changed {
            let code = if pressed {
                SystemEventCode::ButtonPressed
            } else {
                SystemEventCode::ButtonReleased
            };
            self.events.fire(code, None, EventContext::button(button));
        }
    }

    /// Records the cursor position, firing `MouseMoved` if it changed.
    pub fn process_mouse_move(&self, x: i16, y: i16) {
        let changed = self.update(|state| {
            let mouse = &mut state.mouse_current;
            let changed = mouse.x != x || mouse.y != y;
            mouse.x = x;
            mouse.y = y;
            changed
        });

        if changed {
            self.events.fire(
                SystemEventCode::MouseMoved,
                None,
                EventContext::mouse_position(x, y),
            );
        }
    }

    /// Fires `MouseWheel`. The wheel has no persisted state, so every call fires.
    pub fn process_mouse_wheel(&self, delta: i8) {
        if !self.is_initialized() {
            log::warn!("Mouse wheel input received before the input subsystem was initialized.");
            return;
        }
        self.events
            .fire(SystemEventCode::MouseWheel, None, EventContext::wheel(delta));
    }

    /// Routes a platform input edge to the matching `process_*` call.
    pub fn process_event(&self, event: &InputEvent) {
        match *event {
            InputEvent::KeyPressed { key } => self.process_key(key, true),
            InputEvent::KeyReleased { key } => self.process_key(key, false),
            InputEvent::MouseButtonPressed { button } => self.process_mouse_button(button, true),
            InputEvent::MouseButtonReleased { button } => {
                self.process_mouse_button(button, false)
            }
            InputEvent::MouseMoved { x, y } => self.process_mouse_move(x, y),
            InputEvent::MouseWheelScrolled { delta } => self.process_mouse_wheel(delta),
        }
    }

    /// `true` if `key` is down this frame.
    pub fn is_key_down(&self, key: Key) -> bool {
        self.read(|state| state.keyboard_current.keys[key.index()])
    }

    /// `true` if `key` is up this frame. `false` before initialization.
    pub fn is_key_up(&self, key: Key) -> bool {
        self.read_or(false, |state| !state.keyboard_current.keys[key.index()])
    }

    /// `true` if `key` was down at the end of the previous frame.
    pub fn was_key_down(&self, key: Key) -> bool {
        self.read(|state| state.keyboard_previous.keys[key.index()])
    }

    /// `true` if `key` was up at the end of the previous frame. `false` before
    /// initialization.
    pub fn was_key_up(&self, key: Key) -> bool {
        self.read_or(false, |state| !state.keyboard_previous.keys[key.index()])
    }

    /// `true` if `button` is down this frame.
    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.read(|state| state.mouse_current.buttons[button.index()])
    }

    /// `true` if `button` is up this frame. `false` before initialization.
    pub fn is_button_up(&self, button: MouseButton) -> bool {
        self.read_or(false, |state| !state.mouse_current.buttons[button.index()])
    }

    /// `true` if `button` was down at the end of the previous frame.
    pub fn was_button_down(&self, button: MouseButton) -> bool {
        self.read(|state| state.mouse_previous.buttons[button.index()])
    }

    /// `true` if `button` was up at the end of the previous frame. `false`
    /// before initialization.
    pub fn was_button_up(&self, button: MouseButton) -> bool {
        self.read_or(false, |state| !state.mouse_previous.buttons[button.index()])
    }

    /// The cursor position this frame, `(0, 0)` before initialization.
    pub fn mouse_position(&self) -> (i32, i32) {
        self.read_or((0, 0), |state| {
            (i32::from(state.mouse_current.x), i32::from(state.mouse_current.y))
        })
    }

    /// The cursor position at the end of the previous frame.
    pub fn previous_mouse_position(&self) -> (i32, i32) {
        self.read_or((0, 0), |state| {
            (
                i32::from(state.mouse_previous.x),
                i32::from(state.mouse_previous.y),
            )
        })
    }

    /// Applies `change` to the state and releases the borrow before any event
    /// is fired, so listeners can query the input system.
    fn update(&self, change: impl FnOnce(&mut InputState) -> bool) -> bool {
        match self.state.borrow_mut().as_mut() {
            Some(state) => change(state),
            None => {
                log::warn!("Input received before the input subsystem was initialized.");
                false
            }
        }
    }

    fn read(&self, query: impl FnOnce(&InputState) -> bool) -> bool {
        self.read_or(false, query)
    }

    fn read_or<T>(&self, neutral: T, query: impl FnOnce(&InputState) -> T) -> T {
        self.state.borrow().as_ref().map_or(neutral, query)
    }
}

impl std::fmt::Debug for InputSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputSystem")
            .field("initialized", &self.is_initialized())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventCode, EventHandler, ListenerId, SenderId};
    use crate::memory::TaggedAllocator;
    use std::cell::RefCell;
    use std::sync::Arc;

    type Fired = Rc<RefCell<Vec<(EventCode, EventContext)>>>;

    fn input_system() -> (InputSystem, Fired) {
        let events = Rc::new(EventSystem::new(Arc::new(TaggedAllocator::new())));
        events.initialize().unwrap();

        let fired: Fired = Rc::new(RefCell::new(Vec::new()));
        let sink = fired.clone();
        let handler: Rc<dyn EventHandler> = Rc::new(
            move |_: &EventSystem,
                  code: EventCode,
                  _: Option<SenderId>,
                  _: ListenerId,
                  context: &EventContext| {
                sink.borrow_mut().push((code, *context));
                false
            },
        );
        for code in [
            SystemEventCode::KeyPressed,
            SystemEventCode::KeyReleased,
            SystemEventCode::ButtonPressed,
            SystemEventCode::ButtonReleased,
            SystemEventCode::MouseMoved,
            SystemEventCode::MouseWheel,
        ] {
            events.register(code, ListenerId(1), handler.clone()).unwrap();
        }

        let input = InputSystem::new(events);
        input.initialize();
        (input, fired)
    }

    #[test]
    fn queries_before_initialize_are_neutral() {
        let events = Rc::new(EventSystem::new(Arc::new(TaggedAllocator::new())));
        let input = InputSystem::new(events);

        input.process_key(Key::A, true);
        assert!(!input.is_key_down(Key::A));
        assert!(!input.is_key_up(Key::A));
        assert!(!input.was_key_down(Key::A));
        assert!(!input.was_key_up(Key::A));
        assert!(!input.is_button_down(MouseButton::Left));
        assert_eq!(input.mouse_position(), (0, 0));
        assert_eq!(input.previous_mouse_position(), (0, 0));
    }

    #[test]
    fn repeated_key_press_fires_once() {
        let (input, fired) = input_system();
        input.process_key(Key::W, true);
        input.process_key(Key::W, true);

        let fired = fired.borrow();
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].0, SystemEventCode::KeyPressed.code());
        assert_eq!(fired[0].1.key_code(), Key::W);
    }

    #[test]
    fn end_of_frame_moves_current_into_previous() {
        let (input, _fired) = input_system();
        input.process_key(Key::SPACE, true);
        assert!(input.is_key_down(Key::SPACE));
        assert!(input.was_key_up(Key::SPACE));

        input.end_of_frame_update();
        input.process_key(Key::SPACE, false);
        assert!(input.was_key_down(Key::SPACE));
        assert!(input.is_key_up(Key::SPACE));
    }

    #[test]
    fn mouse_buttons_track_edges() {
        let (input, fired) = input_system();
        input.process_mouse_button(MouseButton::Right, true);
        input.process_mouse_button(MouseButton::Right, true);
        input.process_mouse_button(MouseButton::Right, false);

        let fired = fired.borrow();
        let codes: Vec<_> = fired.iter().map(|(code, _)| *code).collect();
        assert_eq!(
            codes,
            vec![
                SystemEventCode::ButtonPressed.code(),
                SystemEventCode::ButtonReleased.code()
            ]
        );
        assert_eq!(fired[0].1.mouse_button(), Some(MouseButton::Right));
        assert!(input.is_button_up(MouseButton::Right));
    }

    #[test]
    fn mouse_move_fires_only_on_change() {
        let (input, fired) = input_system();
        input.process_mouse_move(12, -4);
        input.process_mouse_move(12, -4);
        assert_eq!(input.mouse_position(), (12, -4));
        assert_eq!(input.previous_mouse_position(), (0, 0));

        input.end_of_frame_update();
        assert_eq!(input.previous_mouse_position(), (12, -4));

        let fired = fired.borrow();
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].1.position(), (12, -4));
    }

    #[test]
    fn mouse_wheel_always_fires() {
        let (input, fired) = input_system();
        input.process_mouse_wheel(1);
        input.process_mouse_wheel(1);

        let fired = fired.borrow();
        assert_eq!(fired.len(), 2);
        assert!(fired
            .iter()
            .all(|(code, context)| *code == SystemEventCode::MouseWheel.code()
                && context.wheel_delta() == 1));
    }

    #[test]
    fn listener_can_query_input_during_dispatch() {
        let events = Rc::new(EventSystem::new(Arc::new(TaggedAllocator::new())));
        events.initialize().unwrap();
        let input = Rc::new(InputSystem::new(events.clone()));
        input.initialize();

        let observed = Rc::new(RefCell::new(None));
        let sink = observed.clone();
        let probe = Rc::downgrade(&input);
        let handler: Rc<dyn EventHandler> = Rc::new(
            move |_: &EventSystem,
                  _: EventCode,
                  _: Option<SenderId>,
                  _: ListenerId,
                  context: &EventContext| {
                if let Some(input) = probe.upgrade() {
                    *sink.borrow_mut() = Some(input.is_key_down(context.key_code()));
                }
                true
            },
        );
        events
            .register(SystemEventCode::KeyPressed, ListenerId(2), handler)
            .unwrap();

        input.process_event(&InputEvent::KeyPressed { key: Key::ENTER });
        assert_eq!(*observed.borrow(), Some(true));
    }
}
