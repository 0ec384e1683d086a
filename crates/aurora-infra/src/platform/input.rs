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

//! Translates `winit` window events into the engine's [`InputEvent`]s.
//!
//! This module is the adapter layer between the windowing crate and the input
//! tracker; nothing outside it needs to know winit's event format.

use aurora_core::input::{InputEvent, Key, MouseButton};
use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Translates a `winit::event::WindowEvent` into an engine [`InputEvent`].
///
/// Returns `None` for events that are not user input (resize, focus, close,
/// ...), for key repeats, for keys and buttons the engine does not track, and
/// for wheel events without a vertical component.
pub fn translate_winit_input(event: &WindowEvent) -> Option<InputEvent> {
    match event {
        WindowEvent::KeyboardInput {
            event: key_event, ..
        } => {
            let PhysicalKey::Code(keycode) = key_event.physical_key else {
                return None;
            };
            let key = map_keycode(keycode)?;
            match key_event.state {
                ElementState::Pressed if !key_event.repeat => Some(InputEvent::KeyPressed { key }),
                ElementState::Released => Some(InputEvent::KeyReleased { key }),
                _ => None,
            }
        }
        WindowEvent::CursorMoved { position, .. } => Some(InputEvent::MouseMoved {
            x: clamp_coordinate(position.x),
            y: clamp_coordinate(position.y),
        }),
        WindowEvent::MouseInput { state, button, .. } => {
            let button = map_mouse_button(*button)?;
            match state {
                ElementState::Pressed => Some(InputEvent::MouseButtonPressed { button }),
                ElementState::Released => Some(InputEvent::MouseButtonReleased { button }),
            }
        }
        WindowEvent::MouseWheel { delta, .. } => {
            let dy = match delta {
                MouseScrollDelta::LineDelta(_, y) => f64::from(*y),
                MouseScrollDelta::PixelDelta(position) => position.y,
            };
            normalize_wheel(dy).map(|delta| InputEvent::MouseWheelScrolled { delta })
        }
        _ => None,
    }
}

// --- Private Helper Functions ---

/// Wheel deltas are reduced to their direction.
fn normalize_wheel(delta: f64) -> Option<i8> {
    if delta > 0.0 {
        Some(1)
    } else if delta < 0.0 {
        Some(-1)
    } else {
        None
    }
}

fn clamp_coordinate(value: f64) -> i16 {
    value.clamp(f64::from(i16::MIN), f64::from(i16::MAX)) as i16
}

/// (Internal) Maps a `winit::keyboard::KeyCode` to the engine's virtual-key code.
fn map_keycode(keycode: KeyCode) -> Option<Key> {
    let key = match keycode {
        KeyCode::Backspace => Key::BACKSPACE,
        KeyCode::Tab => Key::TAB,
        KeyCode::Enter | KeyCode::NumpadEnter => Key::ENTER,
        KeyCode::Pause => Key::PAUSE,
        KeyCode::CapsLock => Key::CAPITAL,
        KeyCode::Escape => Key::ESCAPE,
        KeyCode::Convert => Key::CONVERT,
        KeyCode::NonConvert => Key::NONCONVERT,
        KeyCode::Space => Key::SPACE,
        KeyCode::PageUp => Key::PAGE_UP,
        KeyCode::PageDown => Key::PAGE_DOWN,
        KeyCode::End => Key::END,
        KeyCode::Home => Key::HOME,
        KeyCode::ArrowLeft => Key::LEFT,
        KeyCode::ArrowUp => Key::UP,
        KeyCode::ArrowRight => Key::RIGHT,
        KeyCode::ArrowDown => Key::DOWN,
        KeyCode::Select => Key::SELECT,
        KeyCode::PrintScreen => Key::PRINT_SCREEN,
        KeyCode::Insert => Key::INSERT,
        KeyCode::Delete => Key::DELETE,
        KeyCode::Help => Key::HELP,
        KeyCode::Digit0 => Key::DIGIT_0,
        KeyCode::Digit1 => Key::DIGIT_1,
        KeyCode::Digit2 => Key::DIGIT_2,
        KeyCode::Digit3 => Key::DIGIT_3,
        KeyCode::Digit4 => Key::DIGIT_4,
        KeyCode::Digit5 => Key::DIGIT_5,
        KeyCode::Digit6 => Key::DIGIT_6,
        KeyCode::Digit7 => Key::DIGIT_7,
        KeyCode::Digit8 => Key::DIGIT_8,
        KeyCode::Digit9 => Key::DIGIT_9,
        KeyCode::KeyA => Key::A,
        KeyCode::KeyB => Key::B,
        KeyCode::KeyC => Key::C,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyE => Key::E,
        KeyCode::KeyF => Key::F,
        KeyCode::KeyG => Key::G,
        KeyCode::KeyH => Key::H,
        KeyCode::KeyI => Key::I,
        KeyCode::KeyJ => Key::J,
        KeyCode::KeyK => Key::K,
        KeyCode::KeyL => Key::L,
        KeyCode::KeyM => Key::M,
        KeyCode::KeyN => Key::N,
        KeyCode::KeyO => Key::O,
        KeyCode::KeyP => Key::P,
        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyR => Key::R,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyT => Key::T,
        KeyCode::KeyU => Key::U,
        KeyCode::KeyV => Key::V,
        KeyCode::KeyW => Key::W,
        KeyCode::KeyX => Key::X,
        KeyCode::KeyY => Key::Y,
        KeyCode::KeyZ => Key::Z,
        KeyCode::SuperLeft => Key::LWIN,
        KeyCode::SuperRight => Key::RWIN,
        KeyCode::ContextMenu => Key::APPS,
        KeyCode::Sleep => Key::SLEEP,
        KeyCode::Numpad0 => Key::NUMPAD0,
        KeyCode::Numpad1 => Key::NUMPAD1,
        KeyCode::Numpad2 => Key::NUMPAD2,
        KeyCode::Numpad3 => Key::NUMPAD3,
        KeyCode::Numpad4 => Key::NUMPAD4,
        KeyCode::Numpad5 => Key::NUMPAD5,
        KeyCode::Numpad6 => Key::NUMPAD6,
        KeyCode::Numpad7 => Key::NUMPAD7,
        KeyCode::Numpad8 => Key::NUMPAD8,
        KeyCode::Numpad9 => Key::NUMPAD9,
        KeyCode::NumpadMultiply => Key::MULTIPLY,
        KeyCode::NumpadAdd => Key::ADD,
        KeyCode::NumpadComma => Key::SEPARATOR,
        KeyCode::NumpadSubtract => Key::SUBTRACT,
        KeyCode::NumpadDecimal => Key::DECIMAL,
        KeyCode::NumpadDivide => Key::DIVIDE,
        KeyCode::NumpadEqual => Key::NUMPAD_EQUAL,
        KeyCode::F1 => Key::F1,
        KeyCode::F2 => Key::F2,
        KeyCode::F3 => Key::F3,
        KeyCode::F4 => Key::F4,
        KeyCode::F5 => Key::F5,
        KeyCode::F6 => Key::F6,
        KeyCode::F7 => Key::F7,
        KeyCode::F8 => Key::F8,
        KeyCode::F9 => Key::F9,
        KeyCode::F10 => Key::F10,
        KeyCode::F11 => Key::F11,
        KeyCode::F12 => Key::F12,
        KeyCode::F13 => Key::F13,
        KeyCode::F14 => Key::F14,
        KeyCode::F15 => Key::F15,
        KeyCode::F16 => Key::F16,
        KeyCode::F17 => Key::F17,
        KeyCode::F18 => Key::F18,
        KeyCode::F19 => Key::F19,
        KeyCode::F20 => Key::F20,
        KeyCode::F21 => Key::F21,
        KeyCode::F22 => Key::F22,
        KeyCode::F23 => Key::F23,
        KeyCode::F24 => Key::F24,
        KeyCode::NumLock => Key::NUMLOCK,
        KeyCode::ScrollLock => Key::SCROLL,
        KeyCode::ShiftLeft => Key::LSHIFT,
        KeyCode::ShiftRight => Key::RSHIFT,
        KeyCode::ControlLeft => Key::LCONTROL,
        KeyCode::ControlRight => Key::RCONTROL,
        KeyCode::AltLeft => Key::LMENU,
        KeyCode::AltRight => Key::RMENU,
        KeyCode::Semicolon => Key::SEMICOLON,
        KeyCode::Equal => Key::PLUS,
        KeyCode::Comma => Key::COMMA,
        KeyCode::Minus => Key::MINUS,
        KeyCode::Period => Key::PERIOD,
        KeyCode::Slash => Key::SLASH,
        KeyCode::Backquote => Key::GRAVE,
        _ => return None,
    };
    Some(key)
}

/// (Internal) Maps a `winit::event::MouseButton` to the engine's `MouseButton`.
fn map_mouse_button(button: WinitMouseButton) -> Option<MouseButton> {
    match button {
        WinitMouseButton::Left => Some(MouseButton::Left),
        WinitMouseButton::Right => Some(MouseButton::Right),
        WinitMouseButton::Middle => Some(MouseButton::Middle),
        WinitMouseButton::Back => Some(MouseButton::Back),
        WinitMouseButton::Forward => Some(MouseButton::Forward),
        WinitMouseButton::Other(_) => None,
    }
}

// --- Unit Tests for Input Translation ---
#[cfg(test)]
mod tests {
    use super::*;
    use winit::{dpi::PhysicalPosition, event::WindowEvent, keyboard::KeyCode};

    #[test]
    fn test_map_keycode_letters_and_digits() {
        assert_eq!(map_keycode(KeyCode::KeyA), Some(Key::A));
        assert_eq!(map_keycode(KeyCode::KeyZ), Some(Key::Z));
        assert_eq!(map_keycode(KeyCode::Digit1), Some(Key::DIGIT_1));
        assert_eq!(map_keycode(KeyCode::Space), Some(Key::SPACE));
    }

    #[test]
    fn test_map_keycode_sided_modifiers() {
        assert_eq!(map_keycode(KeyCode::ShiftLeft), Some(Key::LSHIFT));
        assert_eq!(map_keycode(KeyCode::ControlRight), Some(Key::RCONTROL));
        assert_eq!(map_keycode(KeyCode::AltLeft), Some(Key::LMENU));
        assert_eq!(map_keycode(KeyCode::Escape), Some(Key::ESCAPE));
    }

    #[test]
    fn test_map_keycode_unknown_is_none() {
        assert_eq!(map_keycode(KeyCode::MediaPlayPause), None);
        assert_eq!(map_keycode(KeyCode::F35), None);
    }

    #[test]
    fn test_map_mouse_button_standard() {
        assert_eq!(map_mouse_button(WinitMouseButton::Left), Some(MouseButton::Left));
        assert_eq!(map_mouse_button(WinitMouseButton::Right), Some(MouseButton::Right));
        assert_eq!(map_mouse_button(WinitMouseButton::Middle), Some(MouseButton::Middle));
        assert_eq!(map_mouse_button(WinitMouseButton::Back), Some(MouseButton::Back));
        assert_eq!(map_mouse_button(WinitMouseButton::Forward), Some(MouseButton::Forward));
        assert_eq!(map_mouse_button(WinitMouseButton::Other(8)), None);
    }

    #[test]
    fn test_translate_mouse_button_pressed() {
        let winit_event = WindowEvent::MouseInput {
            device_id: winit::event::DeviceId::dummy(),
            state: ElementState::Pressed,
            button: WinitMouseButton::Left,
        };
        let expected = Some(InputEvent::MouseButtonPressed {
            button: MouseButton::Left,
        });
        assert_eq!(translate_winit_input(&winit_event), expected);
    }

    #[test]
    fn test_translate_mouse_button_released() {
        let winit_event = WindowEvent::MouseInput {
            device_id: winit::event::DeviceId::dummy(),
            state: ElementState::Released,
            button: WinitMouseButton::Right,
        };
        let expected = Some(InputEvent::MouseButtonReleased {
            button: MouseButton::Right,
        });
        assert_eq!(translate_winit_input(&winit_event), expected);
    }

    #[test]
    fn test_translate_cursor_moved_truncates_and_clamps() {
        let winit_event = WindowEvent::CursorMoved {
            device_id: winit::event::DeviceId::dummy(),
            position: PhysicalPosition::new(100.5, 200.75),
        };
        assert_eq!(
            translate_winit_input(&winit_event),
            Some(InputEvent::MouseMoved { x: 100, y: 200 })
        );

        let far_away = WindowEvent::CursorMoved {
            device_id: winit::event::DeviceId::dummy(),
            position: PhysicalPosition::new(-70_000.0, 70_000.0),
        };
        assert_eq!(
            translate_winit_input(&far_away),
            Some(InputEvent::MouseMoved {
                x: i16::MIN,
                y: i16::MAX
            })
        );
    }

    #[test]
    fn test_translate_mouse_wheel_is_normalized() {
        let lines = WindowEvent::MouseWheel {
            device_id: winit::event::DeviceId::dummy(),
            delta: MouseScrollDelta::LineDelta(-1.0, 3.0),
            phase: winit::event::TouchPhase::Moved,
        };
        assert_eq!(
            translate_winit_input(&lines),
            Some(InputEvent::MouseWheelScrolled { delta: 1 })
        );

        let pixels = WindowEvent::MouseWheel {
            device_id: winit::event::DeviceId::dummy(),
            delta: MouseScrollDelta::PixelDelta(PhysicalPosition::new(5.5, -10.0)),
            phase: winit::event::TouchPhase::Moved,
        };
        assert_eq!(
            translate_winit_input(&pixels),
            Some(InputEvent::MouseWheelScrolled { delta: -1 })
        );
    }

    #[test]
    fn test_translate_horizontal_wheel_is_ignored() {
        let winit_event = WindowEvent::MouseWheel {
            device_id: winit::event::DeviceId::dummy(),
            delta: MouseScrollDelta::LineDelta(2.0, 0.0),
            phase: winit::event::TouchPhase::Moved,
        };
        assert_eq!(translate_winit_input(&winit_event), None);
    }

    #[test]
    fn test_translate_non_input_returns_none() {
        let winit_event_resize = WindowEvent::Resized(winit::dpi::PhysicalSize::new(100, 100));
        let winit_event_focus = WindowEvent::Focused(true);
        let winit_event_close = WindowEvent::CloseRequested;
        assert_eq!(translate_winit_input(&winit_event_resize), None);
        assert_eq!(translate_winit_input(&winit_event_focus), None);
        assert_eq!(translate_winit_input(&winit_event_close), None);
    }
}
