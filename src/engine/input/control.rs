// Physical control identifiers and raw sampling

use super::backend::InputContext;
use super::state::InputDeviceType;
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

/// Gamepad buttons, named by position on a standard layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GamepadButton {
    South,
    East,
    North,
    West,
    LeftBumper,
    RightBumper,
    LeftTrigger,
    RightTrigger,
    Select,
    Start,
    Mode,
    LeftThumb,
    RightThumb,
    DPadUp,
    DPadDown,
    DPadLeft,
    DPadRight,
}

impl GamepadButton {
    pub const ALL: [GamepadButton; 17] = [
        Self::South,
        Self::East,
        Self::North,
        Self::West,
        Self::LeftBumper,
        Self::RightBumper,
        Self::LeftTrigger,
        Self::RightTrigger,
        Self::Select,
        Self::Start,
        Self::Mode,
        Self::LeftThumb,
        Self::RightThumb,
        Self::DPadUp,
        Self::DPadDown,
        Self::DPadLeft,
        Self::DPadRight,
    ];

    pub fn short_name(&self) -> &'static str {
        match self {
            Self::South => "A",
            Self::East => "B",
            Self::North => "Y",
            Self::West => "X",
            Self::LeftBumper => "LB",
            Self::RightBumper => "RB",
            Self::LeftTrigger => "LT",
            Self::RightTrigger => "RT",
            Self::Select => "Sel",
            Self::Start => "Start",
            Self::Mode => "Mode",
            Self::LeftThumb => "LS",
            Self::RightThumb => "RS",
            Self::DPadUp => "Up",
            Self::DPadDown => "Down",
            Self::DPadLeft => "Left",
            Self::DPadRight => "Right",
        }
    }
}

/// Gamepad analog axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GamepadAxis {
    LeftStickX,
    LeftStickY,
    RightStickX,
    RightStickY,
    LeftTrigger,
    RightTrigger,
}

impl GamepadAxis {
    pub const ALL: [GamepadAxis; 6] = [
        Self::LeftStickX,
        Self::LeftStickY,
        Self::RightStickX,
        Self::RightStickY,
        Self::LeftTrigger,
        Self::RightTrigger,
    ];

    /// Triggers rest at 0 and only report positive values
    pub fn is_trigger(&self) -> bool {
        matches!(self, Self::LeftTrigger | Self::RightTrigger)
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            Self::LeftStickX => "LSx",
            Self::LeftStickY => "LSy",
            Self::RightStickX => "RSx",
            Self::RightStickY => "RSy",
            Self::LeftTrigger => "LT",
            Self::RightTrigger => "RT",
        }
    }
}

/// Mouse movement axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseAxis {
    Horizontal,
    Vertical,
}

/// Mouse wheel axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WheelAxis {
    Horizontal,
    Vertical,
}

/// A digital control, or an analog one read in a single direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonControl {
    Key(KeyCode),
    Mouse(MouseButton),
    Gamepad(GamepadButton),
    /// Held while the axis value in the given direction exceeds the deadzone
    GamepadAxisDirection { axis: GamepadAxis, positive: bool },
}

impl ButtonControl {
    pub fn key(code: KeyCode) -> Self {
        Self::Key(code)
    }

    pub fn mouse(button: MouseButton) -> Self {
        Self::Mouse(button)
    }

    pub fn gamepad(button: GamepadButton) -> Self {
        Self::Gamepad(button)
    }

    pub fn device_type(&self) -> InputDeviceType {
        match self {
            Self::Key(_) => InputDeviceType::Keyboard,
            Self::Mouse(_) => InputDeviceType::Mouse,
            Self::Gamepad(_) | Self::GamepadAxisDirection { .. } => InputDeviceType::Gamepad,
        }
    }

    /// Whether the control is held; gamepad controls need a connected context gamepad
    pub fn is_down(&self, ctx: &InputContext, deadzone: f32) -> bool {
        match *self {
            Self::Key(code) => ctx.backend.is_key_down(code),
            Self::Mouse(button) => ctx.backend.is_mouse_button_down(button),
            Self::Gamepad(button) => ctx
                .gamepad_index()
                .is_some_and(|index| ctx.backend.is_gamepad_button_down(index, button)),
            Self::GamepadAxisDirection { axis, positive } => {
                ctx.gamepad_index().is_some_and(|index| {
                    let value = ctx.backend.gamepad_axis(index, axis);
                    let directed = if positive { value } else { -value };
                    directed > deadzone
                })
            }
        }
    }

    pub fn name(&self, shorthand: bool) -> String {
        match self {
            Self::Key(code) if shorthand => format!("{:?}", code).trim_start_matches("Key").to_string(),
            Self::Key(code) => format!("{:?}", code),
            Self::Mouse(button) if shorthand => format!("M{:?}", button),
            Self::Mouse(button) => format!("Mouse {:?}", button),
            Self::Gamepad(button) if shorthand => button.short_name().to_string(),
            Self::Gamepad(button) => format!("Gamepad {:?}", button),
            Self::GamepadAxisDirection { axis, positive } => {
                let sign = if *positive { "+" } else { "-" };
                if shorthand {
                    format!("{}{}", axis.short_name(), sign)
                } else {
                    format!("Gamepad {:?}{}", axis, sign)
                }
            }
        }
    }
}

/// A continuous control read as a signed value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisControl {
    Gamepad(GamepadAxis),
    MouseMotion(MouseAxis),
}

impl AxisControl {
    pub fn device_type(&self) -> InputDeviceType {
        match self {
            Self::Gamepad(_) => InputDeviceType::Gamepad,
            Self::MouseMotion(_) => InputDeviceType::Mouse,
        }
    }

    /// Raw value, or `None` when a gamepad axis has no connected context gamepad
    pub fn sample(&self, ctx: &InputContext) -> Option<f32> {
        match *self {
            Self::Gamepad(axis) => ctx
                .gamepad_index()
                .map(|index| ctx.backend.gamepad_axis(index, axis)),
            Self::MouseMotion(axis) => {
                let delta = ctx.backend.mouse_delta();
                Some(match axis {
                    MouseAxis::Horizontal => delta.x,
                    MouseAxis::Vertical => delta.y,
                })
            }
        }
    }

    pub fn name(&self, shorthand: bool) -> String {
        match self {
            Self::Gamepad(axis) if shorthand => axis.short_name().to_string(),
            Self::Gamepad(axis) => format!("Gamepad {:?}", axis),
            Self::MouseMotion(axis) if shorthand => format!("M{:?}", axis),
            Self::MouseMotion(axis) => format!("Mouse {:?}", axis),
        }
    }
}
