// Platform backend interface and an in-memory scripted backend

use super::control::{GamepadAxis, GamepadButton};
use super::gamepad::GamepadDevice;
use super::InputError;
use glam::Vec2;
use std::collections::{HashMap, HashSet};
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

/// Raw per-frame device signals supplied by the platform layer
///
/// Implementations refresh their snapshot in `poll` once per frame; every
/// other query reads that snapshot and must not block.
pub trait InputBackend {
    /// Refresh the raw snapshot for a new frame
    fn poll(&mut self) -> Result<(), InputError> {
        Ok(())
    }

    fn is_key_down(&self, key: KeyCode) -> bool;

    fn any_key_down(&self) -> bool;

    fn is_mouse_button_down(&self, button: MouseButton) -> bool;

    fn any_mouse_button_down(&self) -> bool;

    /// Cursor position in window coordinates
    fn mouse_position(&self) -> Vec2;

    /// Cursor movement since the previous frame
    fn mouse_delta(&self) -> Vec2;

    /// Wheel movement since the previous frame
    fn mouse_wheel(&self) -> Vec2;

    fn is_gamepad_present(&self, index: usize) -> bool;

    fn is_gamepad_button_down(&self, index: usize, button: GamepadButton) -> bool;

    /// Raw axis value; sticks report [-1, 1], triggers [0, 1]
    fn gamepad_axis(&self, index: usize, axis: GamepadAxis) -> f32;

    fn gamepad_name(&self, index: usize) -> Option<String>;

    fn gamepad_axis_count(&self, index: usize) -> usize;
}

/// Borrowed view handed to bindings and modifiers while sampling
#[derive(Clone, Copy)]
pub struct InputContext<'a> {
    pub backend: &'a dyn InputBackend,
    /// Gamepad the sampling consumer owns, if any
    pub gamepad: Option<&'a GamepadDevice>,
}

impl<'a> InputContext<'a> {
    /// Context without a gamepad; gamepad controls read as neutral
    pub fn new(backend: &'a dyn InputBackend) -> Self {
        Self {
            backend,
            gamepad: None,
        }
    }

    pub fn with_gamepad(backend: &'a dyn InputBackend, gamepad: Option<&'a GamepadDevice>) -> Self {
        Self { backend, gamepad }
    }

    /// Slot index of the context gamepad, only while it is connected
    pub fn gamepad_index(&self) -> Option<usize> {
        self.gamepad
            .filter(|gamepad| gamepad.is_connected())
            .map(|gamepad| gamepad.index())
    }
}

/// Raw state of one scripted gamepad
#[derive(Debug, Clone, Default)]
pub struct ScriptedGamepad {
    pub name: String,
    pub axis_count: usize,
    pub buttons: HashSet<GamepadButton>,
    pub axes: HashMap<GamepadAxis, f32>,
}

/// Backend whose raw state is set directly by the caller
///
/// Used by the demo binary and as the test fixture for every module.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    keys: HashSet<KeyCode>,
    mouse_buttons: HashSet<MouseButton>,
    mouse_position: Vec2,
    mouse_delta: Vec2,
    mouse_wheel: Vec2,
    gamepads: HashMap<usize, ScriptedGamepad>,
    fail_next_poll: Option<String>,
    polls: u64,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press_key(&mut self, key: KeyCode) {
        self.keys.insert(key);
    }

    pub fn release_key(&mut self, key: KeyCode) {
        self.keys.remove(&key);
    }

    pub fn press_mouse_button(&mut self, button: MouseButton) {
        self.mouse_buttons.insert(button);
    }

    pub fn release_mouse_button(&mut self, button: MouseButton) {
        self.mouse_buttons.remove(&button);
    }

    /// Move the cursor, recording the delta from its previous position
    pub fn move_mouse_to(&mut self, position: Vec2) {
        self.mouse_delta = position - self.mouse_position;
        self.mouse_position = position;
    }

    pub fn set_mouse_delta(&mut self, delta: Vec2) {
        self.mouse_delta = delta;
    }

    pub fn set_mouse_wheel(&mut self, wheel: Vec2) {
        self.mouse_wheel = wheel;
    }

    /// Plug a gamepad into a slot
    pub fn connect_gamepad(&mut self, index: usize, name: &str) {
        self.gamepads.insert(
            index,
            ScriptedGamepad {
                name: name.to_string(),
                axis_count: GamepadAxis::ALL.len(),
                ..ScriptedGamepad::default()
            },
        );
    }

    pub fn disconnect_gamepad(&mut self, index: usize) {
        self.gamepads.remove(&index);
    }

    pub fn press_gamepad_button(&mut self, index: usize, button: GamepadButton) {
        if let Some(gamepad) = self.gamepads.get_mut(&index) {
            gamepad.buttons.insert(button);
        }
    }

    pub fn release_gamepad_button(&mut self, index: usize, button: GamepadButton) {
        if let Some(gamepad) = self.gamepads.get_mut(&index) {
            gamepad.buttons.remove(&button);
        }
    }

    pub fn set_gamepad_axis(&mut self, index: usize, axis: GamepadAxis, value: f32) {
        if let Some(gamepad) = self.gamepads.get_mut(&index) {
            gamepad.axes.insert(axis, value);
        }
    }

    /// Make the next `poll` fail with the given reason
    pub fn fail_next_poll(&mut self, reason: &str) {
        self.fail_next_poll = Some(reason.to_string());
    }

    /// Number of successful polls so far
    pub fn poll_count(&self) -> u64 {
        self.polls
    }
}

impl InputBackend for ScriptedBackend {
    fn poll(&mut self) -> Result<(), InputError> {
        if let Some(reason) = self.fail_next_poll.take() {
            return Err(InputError::Poll(reason));
        }
        self.polls += 1;
        Ok(())
    }

    fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys.contains(&key)
    }

    fn any_key_down(&self) -> bool {
        !self.keys.is_empty()
    }

    fn is_mouse_button_down(&self, button: MouseButton) -> bool {
        self.mouse_buttons.contains(&button)
    }

    fn any_mouse_button_down(&self) -> bool {
        !self.mouse_buttons.is_empty()
    }

    fn mouse_position(&self) -> Vec2 {
        self.mouse_position
    }

    fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    fn mouse_wheel(&self) -> Vec2 {
        self.mouse_wheel
    }

    fn is_gamepad_present(&self, index: usize) -> bool {
        self.gamepads.contains_key(&index)
    }

    fn is_gamepad_button_down(&self, index: usize, button: GamepadButton) -> bool {
        self.gamepads
            .get(&index)
            .is_some_and(|gamepad| gamepad.buttons.contains(&button))
    }

    fn gamepad_axis(&self, index: usize, axis: GamepadAxis) -> f32 {
        self.gamepads
            .get(&index)
            .and_then(|gamepad| gamepad.axes.get(&axis).copied())
            .unwrap_or(0.0)
    }

    fn gamepad_name(&self, index: usize) -> Option<String> {
        self.gamepads.get(&index).map(|gamepad| gamepad.name.clone())
    }

    fn gamepad_axis_count(&self, index: usize) -> usize {
        self.gamepads
            .get(&index)
            .map(|gamepad| gamepad.axis_count)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys() {
        let mut backend = ScriptedBackend::new();
        assert!(!backend.any_key_down());

        backend.press_key(KeyCode::KeyA);
        assert!(backend.is_key_down(KeyCode::KeyA));
        assert!(backend.any_key_down());

        backend.release_key(KeyCode::KeyA);
        assert!(!backend.is_key_down(KeyCode::KeyA));
    }

    #[test]
    fn test_mouse_motion_records_delta() {
        let mut backend = ScriptedBackend::new();
        backend.move_mouse_to(Vec2::new(10.0, 5.0));
        backend.move_mouse_to(Vec2::new(12.0, 1.0));
        assert_eq!(backend.mouse_position(), Vec2::new(12.0, 1.0));
        assert_eq!(backend.mouse_delta(), Vec2::new(2.0, -4.0));
    }

    #[test]
    fn test_gamepad_presence_and_axes() {
        let mut backend = ScriptedBackend::new();
        assert!(!backend.is_gamepad_present(0));
        assert_eq!(backend.gamepad_axis(0, GamepadAxis::LeftStickX), 0.0);

        backend.connect_gamepad(0, "Pad");
        backend.set_gamepad_axis(0, GamepadAxis::LeftStickX, -0.5);
        backend.press_gamepad_button(0, GamepadButton::South);

        assert!(backend.is_gamepad_present(0));
        assert_eq!(backend.gamepad_name(0).as_deref(), Some("Pad"));
        assert_eq!(backend.gamepad_axis(0, GamepadAxis::LeftStickX), -0.5);
        assert!(backend.is_gamepad_button_down(0, GamepadButton::South));

        backend.disconnect_gamepad(0);
        assert!(!backend.is_gamepad_button_down(0, GamepadButton::South));
    }

    #[test]
    fn test_poll_failure_is_one_shot() {
        let mut backend = ScriptedBackend::new();
        backend.fail_next_poll("device lost");
        assert!(backend.poll().is_err());
        assert!(backend.poll().is_ok());
        assert_eq!(backend.poll_count(), 1);
    }

    #[test]
    fn test_context_without_gamepad() {
        let backend = ScriptedBackend::new();
        let ctx = InputContext::new(&backend);
        assert_eq!(ctx.gamepad_index(), None);
    }
}
