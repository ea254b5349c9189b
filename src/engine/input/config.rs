// Input configuration: deadzones, smoothing, hold/multi-tap timing and usage thresholds

use super::control::GamepadButton;
use super::state::{AxisSmoothing, InputDeviceType};
use crate::core::math::clamp_unit;

/// Default deadzone for keyboard bindings
pub const KEYBOARD_DEADZONE: f32 = 0.0;
/// Default deadzone for mouse bindings
pub const MOUSE_DEADZONE: f32 = 0.05;
/// Default deadzone for gamepad bindings
pub const GAMEPAD_DEADZONE: f32 = 0.1;

/// When a gamepad counts as "used" this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GamepadUsage {
    /// Stick deflection that counts as use
    pub axis_threshold: f32,
    /// Trigger pull that counts as use
    pub trigger_threshold: f32,
    /// Whether any held button counts as use
    pub buttons: bool,
}

impl GamepadUsage {
    pub fn new(axis_threshold: f32, trigger_threshold: f32, buttons: bool) -> Self {
        Self {
            axis_threshold: clamp_unit(axis_threshold),
            trigger_threshold: clamp_unit(trigger_threshold),
            buttons,
        }
    }
}

impl Default for GamepadUsage {
    fn default() -> Self {
        Self::new(0.25, 0.25, true)
    }
}

/// When the mouse counts as "used" this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseUsage {
    /// Cursor travel per frame, in pixels
    pub move_threshold: f32,
    pub wheel_threshold: f32,
    pub buttons: bool,
}

impl MouseUsage {
    pub fn new(move_threshold: f32, wheel_threshold: f32, buttons: bool) -> Self {
        Self {
            move_threshold: move_threshold.max(0.0),
            wheel_threshold: wheel_threshold.max(0.0),
            buttons,
        }
    }
}

impl Default for MouseUsage {
    fn default() -> Self {
        Self::new(2.0, 0.0, true)
    }
}

/// Settings shared by the input system, its devices and newly created actions
///
/// Every setter clamps out-of-range values instead of rejecting them.
#[derive(Debug, Clone)]
pub struct InputSettings {
    smoothing: AxisSmoothing,
    hold_duration: f32,
    multi_tap_target: u32,
    multi_tap_window: f32,
    gamepad_slots: usize,
    claim_button: Option<GamepadButton>,
    gamepad_usage: GamepadUsage,
    mouse_usage: MouseUsage,
}

impl InputSettings {
    pub fn new() -> Self {
        Self {
            smoothing: AxisSmoothing::default(),
            hold_duration: 1.0,
            multi_tap_target: 2,
            multi_tap_window: 0.25,
            gamepad_slots: 4,
            claim_button: Some(GamepadButton::South),
            gamepad_usage: GamepadUsage::default(),
            mouse_usage: MouseUsage::default(),
        }
    }

    /// Deadzone a new binding starts with, by the device it reads
    pub fn default_deadzone(device_type: InputDeviceType) -> f32 {
        match device_type {
            InputDeviceType::Keyboard | InputDeviceType::None => KEYBOARD_DEADZONE,
            InputDeviceType::Mouse => MOUSE_DEADZONE,
            InputDeviceType::Gamepad => GAMEPAD_DEADZONE,
        }
    }

    pub fn smoothing(&self) -> AxisSmoothing {
        self.smoothing
    }

    pub fn set_smoothing(&mut self, sensitivity: f32, gravity: f32) {
        self.smoothing = AxisSmoothing::new(sensitivity, gravity);
    }

    /// Seconds a press must be held to complete a hold; 0 disables hold tracking
    pub fn hold_duration(&self) -> f32 {
        self.hold_duration
    }

    pub fn set_hold_duration(&mut self, seconds: f32) {
        self.hold_duration = seconds.max(0.0);
    }

    /// Taps needed to complete a multi-tap; below 2 disables multi-tap tracking
    pub fn multi_tap_target(&self) -> u32 {
        self.multi_tap_target
    }

    pub fn set_multi_tap_target(&mut self, taps: u32) {
        self.multi_tap_target = taps;
    }

    /// Maximum seconds between two taps of a multi-tap
    pub fn multi_tap_window(&self) -> f32 {
        self.multi_tap_window
    }

    pub fn set_multi_tap_window(&mut self, seconds: f32) {
        self.multi_tap_window = seconds.max(0.0);
    }

    pub fn gamepad_slots(&self) -> usize {
        self.gamepad_slots
    }

    pub fn set_gamepad_slots(&mut self, slots: usize) {
        self.gamepad_slots = slots;
    }

    /// Button that claims an available gamepad when pressed on it
    pub fn claim_button(&self) -> Option<GamepadButton> {
        self.claim_button
    }

    pub fn set_claim_button(&mut self, button: Option<GamepadButton>) {
        self.claim_button = button;
    }

    pub fn gamepad_usage(&self) -> GamepadUsage {
        self.gamepad_usage
    }

    pub fn set_gamepad_usage(&mut self, usage: GamepadUsage) {
        self.gamepad_usage = GamepadUsage::new(
            usage.axis_threshold,
            usage.trigger_threshold,
            usage.buttons,
        );
    }

    pub fn mouse_usage(&self) -> MouseUsage {
        self.mouse_usage
    }

    pub fn set_mouse_usage(&mut self, usage: MouseUsage) {
        self.mouse_usage = MouseUsage::new(usage.move_threshold, usage.wheel_threshold, usage.buttons);
    }
}

impl Default for InputSettings {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = InputSettings::default();
        assert_eq!(settings.gamepad_slots(), 4);
        assert_eq!(settings.claim_button(), Some(GamepadButton::South));
        assert_eq!(settings.multi_tap_target(), 2);
        assert!(settings.hold_duration() > 0.0);
    }

    #[test]
    fn test_default_deadzones() {
        assert_eq!(InputSettings::default_deadzone(InputDeviceType::Keyboard), KEYBOARD_DEADZONE);
        assert_eq!(InputSettings::default_deadzone(InputDeviceType::Mouse), MOUSE_DEADZONE);
        assert_eq!(InputSettings::default_deadzone(InputDeviceType::Gamepad), GAMEPAD_DEADZONE);
    }

    #[test]
    fn test_negative_durations_clamped() {
        let mut settings = InputSettings::new();
        settings.set_hold_duration(-2.0);
        settings.set_multi_tap_window(-0.5);
        assert_eq!(settings.hold_duration(), 0.0);
        assert_eq!(settings.multi_tap_window(), 0.0);
    }

    #[test]
    fn test_smoothing_clamped() {
        let mut settings = InputSettings::new();
        settings.set_smoothing(-1.0, 3.0);
        assert_eq!(settings.smoothing().sensitivity, 0.0);
        assert_eq!(settings.smoothing().gravity, 3.0);
    }

    #[test]
    fn test_usage_thresholds_clamped() {
        let mut settings = InputSettings::new();
        settings.set_gamepad_usage(GamepadUsage {
            axis_threshold: 2.0,
            trigger_threshold: -1.0,
            buttons: false,
        });
        let usage = settings.gamepad_usage();
        assert_eq!(usage.axis_threshold, 1.0);
        assert_eq!(usage.trigger_threshold, 0.0);
        assert!(!usage.buttons);

        settings.set_mouse_usage(MouseUsage {
            move_threshold: -4.0,
            wheel_threshold: 0.5,
            buttons: true,
        });
        assert_eq!(settings.mouse_usage().move_threshold, 0.0);
    }

    #[test]
    fn test_claim_button_can_be_disabled() {
        let mut settings = InputSettings::new();
        settings.set_claim_button(None);
        assert_eq!(settings.claim_button(), None);
    }
}
