// Input handling system
//
// Device-agnostic input: raw controls are read through an `InputBackend`,
// turned into per-frame `InputState`s by bindings, and combined into named
// actions owned by players. Gamepads are claimed exclusively through the
// `GamepadDeviceManager`.
//
// ## Architecture
//
// - `state`: Per-frame input state and its transforms (fold, accumulate, consume)
// - `backend`: Raw input source trait and a scripted in-memory backend
// - `control`: Gamepad identifiers and the controls bindings read
// - `modifier`: Modifier gates (e.g. Shift held) in front of bindings
// - `binding`: Binding variants producing raw states
// - `device`: Device identity, priority, lock/activation and usage detection
// - `gamepad`: A single gamepad slot
// - `gamepad_manager`: Connection, claim and usage tracking for all slots
// - `action`: Named actions with hold and multi-tap detection
// - `player`: Per-player actions and gamepad ownership
// - `config`: Input settings
// - `manager`: Main input system coordinating everything
//
// ## Usage Example
//
// ```rust
// use rusted_input::engine::input::{Binding, ButtonControl, InputSystem, ScriptedBackend};
//
// let mut input = InputSystem::new(2);
// let jump = input
//     .create_action("jump")
//     .with_binding(Binding::button(ButtonControl::key(KeyCode::Space)));
// input.player_mut(0).unwrap().add_action(jump);
//
// // Once per frame
// input.update(&mut backend, dt);
//
// if input.player(0).unwrap().just_pressed("jump") {
//     // Player 0 just pressed jump!
// }
// ```

pub mod action;
pub mod backend;
pub mod binding;
pub mod config;
pub mod control;
pub mod device;
pub mod gamepad;
pub mod gamepad_manager;
pub mod manager;
pub mod modifier;
pub mod player;
pub mod state;

// Re-export commonly used types
pub use action::InputAction;
pub use backend::{InputBackend, InputContext, ScriptedBackend};
pub use binding::{Binding, BindingKind, PositionAxis};
pub use config::{GamepadUsage, InputSettings, MouseUsage};
pub use control::{AxisControl, ButtonControl, GamepadAxis, GamepadButton, MouseAxis, WheelAxis};
pub use device::{DeviceId, DeviceIdAllocator, InputDevice, KeyboardDevice, MouseDevice};
pub use gamepad::GamepadDevice;
pub use gamepad_manager::{GamepadDeviceManager, GamepadEvent, GamepadListener, ListenerId};
pub use manager::InputSystem;
pub use modifier::{Modifier, ModifierOperator, ModifierSet};
pub use player::PlayerInput;
pub use state::{AxisSmoothing, InputDeviceType, InputState, PressedType, ProgressState};

/// Input errors
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Input backend poll failed: {0}")]
    Poll(String),

    #[error("Unknown gamepad slot: {0}")]
    UnknownGamepad(usize),

    #[error("Gamepad {0} is disconnected or already claimed")]
    GamepadUnavailable(usize),

    #[error("Unknown player: {0}")]
    UnknownPlayer(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_error_display() {
        let err = InputError::Poll("device lost".to_string());
        assert_eq!(err.to_string(), "Input backend poll failed: device lost");

        let err = InputError::GamepadUnavailable(2);
        assert_eq!(err.to_string(), "Gamepad 2 is disconnected or already claimed");
    }
}
