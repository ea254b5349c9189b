// Bindings: configured mappings from physical controls to raw input state

use super::backend::InputContext;
use super::config::InputSettings;
use super::control::{AxisControl, ButtonControl, GamepadAxis, WheelAxis};
use super::modifier::ModifierSet;
use super::state::{AxisSmoothing, InputDeviceType, InputState};
use crate::core::math::{apply_deadzone, clamp_axis, clamp_unit};
use glam::Vec2;
use std::hash::{Hash, Hasher};

/// Component of the cursor position read by a position-delta binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PositionAxis {
    X,
    Y,
}

/// Reference point and full-scale distance for a position-delta binding
#[derive(Debug, Clone, Copy)]
pub struct PositionTarget {
    pub target: Vec2,
    /// Distance from the target that maps to a full axis deflection
    pub range: f32,
}

impl PositionTarget {
    pub fn new(target: Vec2, range: f32) -> Self {
        Self {
            target,
            range: range.max(f32::EPSILON),
        }
    }
}

impl PartialEq for PositionTarget {
    fn eq(&self, other: &Self) -> bool {
        self.target.x.to_bits() == other.target.x.to_bits()
            && self.target.y.to_bits() == other.target.y.to_bits()
            && self.range.to_bits() == other.range.to_bits()
    }
}

impl Eq for PositionTarget {}

impl Hash for PositionTarget {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.target.x.to_bits().hash(state);
        self.target.y.to_bits().hash(state);
        self.range.to_bits().hash(state);
    }
}

/// Which physical control(s) a binding reads and how
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingKind {
    /// Digital control; down while held
    Button(ButtonControl),
    /// Signed analog control
    Axis { control: AxisControl, inverted: bool },
    /// Two digital controls emulating an axis: `positive - negative`
    ButtonPair {
        negative: ButtonControl,
        positive: ButtonControl,
    },
    /// Analog trigger in [0, 1]; inverted triggers drive the negative direction
    Trigger { axis: GamepadAxis, inverted: bool },
    /// Offset of the cursor from a target position
    PositionDelta {
        axis: PositionAxis,
        target: PositionTarget,
    },
    /// Mouse wheel movement
    Wheel { axis: WheelAxis, inverted: bool },
}

impl BindingKind {
    /// Device type reported for states produced by this kind
    ///
    /// A pair reports its positive side; sampled pair states report the side held.
    pub fn device_type(&self) -> InputDeviceType {
        match self {
            Self::Button(control) => control.device_type(),
            Self::Axis { control, .. } => control.device_type(),
            Self::ButtonPair { positive, .. } => positive.device_type(),
            Self::Trigger { .. } => InputDeviceType::Gamepad,
            Self::PositionDelta { .. } | Self::Wheel { .. } => InputDeviceType::Mouse,
        }
    }
}

/// A binding: control identity, deadzone and an optional modifier gate
///
/// Equality and hashing are structural over the kind and modifier set;
/// deadzone and position offset are tuning and do not take part.
#[derive(Debug, Clone)]
pub struct Binding {
    kind: BindingKind,
    deadzone: f32,
    offset: Vec2,
    modifiers: ModifierSet,
}

impl Binding {
    pub fn new(kind: BindingKind) -> Self {
        Self {
            kind,
            deadzone: InputSettings::default_deadzone(kind.device_type()),
            offset: Vec2::ZERO,
            modifiers: ModifierSet::default(),
        }
    }

    pub fn button(control: ButtonControl) -> Self {
        Self::new(BindingKind::Button(control))
    }

    pub fn axis(control: AxisControl) -> Self {
        Self::new(BindingKind::Axis {
            control,
            inverted: false,
        })
    }

    pub fn button_pair(negative: ButtonControl, positive: ButtonControl) -> Self {
        Self::new(BindingKind::ButtonPair { negative, positive })
    }

    pub fn trigger(axis: GamepadAxis) -> Self {
        Self::new(BindingKind::Trigger {
            axis,
            inverted: false,
        })
    }

    pub fn position_delta(axis: PositionAxis, target: Vec2, range: f32) -> Self {
        Self::new(BindingKind::PositionDelta {
            axis,
            target: PositionTarget::new(target, range),
        })
    }

    pub fn wheel(axis: WheelAxis) -> Self {
        Self::new(BindingKind::Wheel {
            axis,
            inverted: false,
        })
    }

    /// Builder form of [`Binding::set_deadzone`]
    pub fn with_deadzone(mut self, deadzone: f32) -> Self {
        self.set_deadzone(deadzone);
        self
    }

    pub fn with_modifiers(mut self, modifiers: ModifierSet) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn kind(&self) -> &BindingKind {
        &self.kind
    }

    pub fn modifiers(&self) -> &ModifierSet {
        &self.modifiers
    }

    pub fn device_type(&self) -> InputDeviceType {
        self.kind.device_type()
    }

    pub fn deadzone(&self) -> f32 {
        self.deadzone
    }

    /// Set the deadzone, clamped to [0, 1]
    pub fn set_deadzone(&mut self, deadzone: f32) {
        self.deadzone = clamp_unit(deadzone);
    }

    pub fn position_offset(&self) -> Vec2 {
        self.offset
    }

    /// Shift the target of a position-delta binding at runtime
    pub fn set_position_offset(&mut self, offset: Vec2) {
        self.offset = offset;
    }

    /// First-sample state, without edge information
    pub fn state(&self, ctx: &InputContext) -> InputState {
        let device_type = self.device_type();
        let gamepad = gamepad_for(device_type, ctx);

        if !self.modifiers.is_active(ctx) {
            return InputState::neutral_from(device_type, gamepad);
        }

        match self.kind {
            BindingKind::Button(control) => {
                InputState::from_button(control.is_down(ctx, self.deadzone), device_type, gamepad)
            }
            BindingKind::ButtonPair { negative, positive } => {
                let negative_down = negative.is_down(ctx, self.deadzone);
                let positive_down = positive.is_down(ctx, self.deadzone);
                let device_type = if negative_down && !positive_down {
                    negative.device_type()
                } else {
                    device_type
                };
                let negative = if negative_down { 1.0 } else { 0.0 };
                let positive = if positive_down { 1.0 } else { 0.0 };
                let gamepad = gamepad_for(device_type, ctx);
                InputState::from_axis(positive - negative, device_type, gamepad)
            }
            _ => match self.analog_value(ctx) {
                Some(value) => InputState::from_axis(
                    apply_deadzone(value, self.deadzone),
                    device_type,
                    gamepad,
                ),
                None => InputState::neutral_from(device_type, gamepad),
            },
        }
    }

    /// Edge-aware state folded against the previous frame
    pub fn state_from(
        &self,
        prev: &InputState,
        ctx: &InputContext,
        smoothing: AxisSmoothing,
        dt: f32,
    ) -> InputState {
        InputState::fold(prev, &self.state(ctx), smoothing, dt)
    }

    fn analog_value(&self, ctx: &InputContext) -> Option<f32> {
        match self.kind {
            BindingKind::Axis { control, inverted } => {
                let value = clamp_axis(control.sample(ctx)?);
                Some(if inverted { -value } else { value })
            }
            BindingKind::Trigger { axis, inverted } => {
                let index = ctx.gamepad_index()?;
                let value = clamp_unit(ctx.backend.gamepad_axis(index, axis));
                Some(if inverted { -value } else { value })
            }
            BindingKind::PositionDelta { axis, target } => {
                let anchor = target.target + self.offset;
                let delta = (ctx.backend.mouse_position() - anchor) / target.range;
                Some(clamp_axis(match axis {
                    PositionAxis::X => delta.x,
                    PositionAxis::Y => delta.y,
                }))
            }
            BindingKind::Wheel { axis, inverted } => {
                let wheel = ctx.backend.mouse_wheel();
                let value = clamp_axis(match axis {
                    WheelAxis::Horizontal => wheel.x,
                    WheelAxis::Vertical => wheel.y,
                });
                Some(if inverted { -value } else { value })
            }
            BindingKind::Button(_) | BindingKind::ButtonPair { .. } => None,
        }
    }

    /// Display name, e.g. `"ShiftLeft+KeyA"` or `"Shift+A"` in shorthand
    pub fn name(&self, shorthand: bool) -> String {
        let inverted_suffix = |inverted: bool| if inverted { " inv" } else { "" };
        let body = match &self.kind {
            BindingKind::Button(control) => control.name(shorthand),
            BindingKind::Axis { control, inverted } => {
                format!("{}{}", control.name(shorthand), inverted_suffix(*inverted))
            }
            BindingKind::ButtonPair { negative, positive } => {
                format!("{}/{}", negative.name(shorthand), positive.name(shorthand))
            }
            BindingKind::Trigger { axis, inverted } => {
                let name = if shorthand {
                    axis.short_name().to_string()
                } else {
                    format!("Gamepad {:?}", axis)
                };
                format!("{}{}", name, inverted_suffix(*inverted))
            }
            BindingKind::PositionDelta { axis, .. } => {
                if shorthand {
                    format!("Pos{:?}", axis)
                } else {
                    format!("Mouse Position {:?}", axis)
                }
            }
            BindingKind::Wheel { axis, inverted } => {
                let name = if shorthand {
                    format!("MW{:?}", axis)
                } else {
                    format!("Mouse Wheel {:?}", axis)
                };
                format!("{}{}", name, inverted_suffix(*inverted))
            }
        };
        format!("{}{}", self.modifiers.prefix(shorthand), body)
    }
}

fn gamepad_for(device_type: InputDeviceType, ctx: &InputContext) -> Option<usize> {
    match device_type {
        InputDeviceType::Gamepad => ctx.gamepad_index(),
        _ => None,
    }
}

impl PartialEq for Binding {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.modifiers == other.modifiers
    }
}

impl Eq for Binding {}

impl Hash for Binding {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.modifiers.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::backend::ScriptedBackend;
    use crate::engine::input::control::{GamepadButton, MouseAxis};
    use crate::engine::input::device::DeviceIdAllocator;
    use crate::engine::input::gamepad::GamepadDevice;
    use crate::engine::input::modifier::Modifier;
    use std::collections::HashSet;
    use winit::keyboard::KeyCode;

    fn connected_pad(backend: &mut ScriptedBackend) -> GamepadDevice {
        backend.connect_gamepad(0, "Pad");
        let mut ids = DeviceIdAllocator::new();
        let mut gamepad = GamepadDevice::new(0, &mut ids);
        gamepad.connect("Pad".to_string(), 6);
        gamepad
    }

    #[test]
    fn test_button_binding() {
        let mut backend = ScriptedBackend::new();
        let binding = Binding::button(ButtonControl::key(KeyCode::Space));

        let state = binding.state(&InputContext::new(&backend));
        assert!(!state.down);
        assert!(state.up);

        backend.press_key(KeyCode::Space);
        let state = binding.state(&InputContext::new(&backend));
        assert!(state.down);
        assert_eq!(state.axis_raw, 1.0);
        assert_eq!(state.device_type, InputDeviceType::Keyboard);
        assert_eq!(state.gamepad, None);
    }

    #[test]
    fn test_axis_deadzone_suppression() {
        let mut backend = ScriptedBackend::new();
        let gamepad = connected_pad(&mut backend);
        let binding = Binding::axis(AxisControl::Gamepad(GamepadAxis::LeftStickX)).with_deadzone(0.2);

        backend.set_gamepad_axis(0, GamepadAxis::LeftStickX, 0.15);
        let state = binding.state(&InputContext::with_gamepad(&backend, Some(&gamepad)));
        assert_eq!(state.axis_raw, 0.0);
        assert!(!state.down);

        backend.set_gamepad_axis(0, GamepadAxis::LeftStickX, 0.25);
        let state = binding.state(&InputContext::with_gamepad(&backend, Some(&gamepad)));
        assert!(state.down);
        assert_eq!(state.axis_raw, 0.25);
        assert_eq!(state.gamepad, Some(0));
    }

    #[test]
    fn test_inverted_axis() {
        let mut backend = ScriptedBackend::new();
        let gamepad = connected_pad(&mut backend);
        backend.set_gamepad_axis(0, GamepadAxis::LeftStickY, 0.5);
        let binding = Binding::new(BindingKind::Axis {
            control: AxisControl::Gamepad(GamepadAxis::LeftStickY),
            inverted: true,
        });
        let state = binding.state(&InputContext::with_gamepad(&backend, Some(&gamepad)));
        assert_eq!(state.axis_raw, -0.5);
    }

    #[test]
    fn test_gamepad_binding_without_context_is_neutral() {
        let mut backend = ScriptedBackend::new();
        backend.connect_gamepad(0, "Pad");
        backend.press_gamepad_button(0, GamepadButton::South);
        backend.set_gamepad_axis(0, GamepadAxis::RightTrigger, 1.0);
        let ctx = InputContext::new(&backend);

        let state = Binding::button(ButtonControl::gamepad(GamepadButton::South)).state(&ctx);
        assert!(!state.down);
        assert_eq!(state.axis_raw, 0.0);

        let state = Binding::trigger(GamepadAxis::RightTrigger).state(&ctx);
        assert!(!state.down);
        assert_eq!(state.gamepad, None);
    }

    #[test]
    fn test_button_pair_axis() {
        let mut backend = ScriptedBackend::new();
        let binding = Binding::button_pair(
            ButtonControl::key(KeyCode::KeyA),
            ButtonControl::key(KeyCode::KeyD),
        );

        backend.press_key(KeyCode::KeyA);
        assert_eq!(binding.state(&InputContext::new(&backend)).axis_raw, -1.0);

        backend.press_key(KeyCode::KeyD);
        let state = binding.state(&InputContext::new(&backend));
        assert_eq!(state.axis_raw, 0.0);
        assert!(!state.down);

        backend.release_key(KeyCode::KeyA);
        assert_eq!(binding.state(&InputContext::new(&backend)).axis_raw, 1.0);
    }

    #[test]
    fn test_mixed_button_pair_reports_held_device() {
        let mut backend = ScriptedBackend::new();
        let gamepad = connected_pad(&mut backend);
        let binding = Binding::button_pair(
            ButtonControl::key(KeyCode::ArrowLeft),
            ButtonControl::gamepad(GamepadButton::DPadRight),
        );

        backend.press_key(KeyCode::ArrowLeft);
        let state = binding.state(&InputContext::with_gamepad(&backend, Some(&gamepad)));
        assert_eq!(state.axis_raw, -1.0);
        assert_eq!(state.device_type, InputDeviceType::Keyboard);
        assert_eq!(state.gamepad, None);

        backend.release_key(KeyCode::ArrowLeft);
        backend.press_gamepad_button(0, GamepadButton::DPadRight);
        let state = binding.state(&InputContext::with_gamepad(&backend, Some(&gamepad)));
        assert_eq!(state.axis_raw, 1.0);
        assert_eq!(state.device_type, InputDeviceType::Gamepad);
        assert_eq!(state.gamepad, Some(0));
    }

    #[test]
    fn test_button_pair_on_stick_uses_deadzone() {
        let mut backend = ScriptedBackend::new();
        let gamepad = connected_pad(&mut backend);
        let binding = Binding::button_pair(
            ButtonControl::GamepadAxisDirection {
                axis: GamepadAxis::LeftStickX,
                positive: false,
            },
            ButtonControl::GamepadAxisDirection {
                axis: GamepadAxis::LeftStickX,
                positive: true,
            },
        )
        .with_deadzone(0.3);

        backend.set_gamepad_axis(0, GamepadAxis::LeftStickX, 0.2);
        let state = binding.state(&InputContext::with_gamepad(&backend, Some(&gamepad)));
        assert_eq!(state.axis_raw, 0.0);

        backend.set_gamepad_axis(0, GamepadAxis::LeftStickX, -0.6);
        let state = binding.state(&InputContext::with_gamepad(&backend, Some(&gamepad)));
        assert_eq!(state.axis_raw, -1.0);
    }

    #[test]
    fn test_trigger_binding() {
        let mut backend = ScriptedBackend::new();
        let gamepad = connected_pad(&mut backend);
        backend.set_gamepad_axis(0, GamepadAxis::LeftTrigger, 0.7);
        let ctx = InputContext::with_gamepad(&backend, Some(&gamepad));

        let state = Binding::trigger(GamepadAxis::LeftTrigger).state(&ctx);
        assert_eq!(state.axis_raw, 0.7);
        assert!(state.down);

        let inverted = Binding::new(BindingKind::Trigger {
            axis: GamepadAxis::LeftTrigger,
            inverted: true,
        });
        assert_eq!(inverted.state(&ctx).axis_raw, -0.7);
    }

    #[test]
    fn test_position_delta_with_offset() {
        let mut backend = ScriptedBackend::new();
        backend.move_mouse_to(Vec2::new(150.0, 100.0));
        let mut binding =
            Binding::position_delta(PositionAxis::X, Vec2::new(100.0, 100.0), 100.0).with_deadzone(0.1);

        let state = binding.state(&InputContext::new(&backend));
        assert_eq!(state.axis_raw, 0.5);

        binding.set_position_offset(Vec2::new(45.0, 0.0));
        let state = binding.state(&InputContext::new(&backend));
        assert_eq!(state.axis_raw, 0.0);
        assert!(!state.down);

        backend.move_mouse_to(Vec2::new(-500.0, 100.0));
        assert_eq!(binding.state(&InputContext::new(&backend)).axis_raw, -1.0);
    }

    #[test]
    fn test_wheel_binding() {
        let mut backend = ScriptedBackend::new();
        backend.set_mouse_wheel(Vec2::new(0.0, 3.0));
        let binding = Binding::wheel(WheelAxis::Vertical);
        let state = binding.state(&InputContext::new(&backend));
        assert_eq!(state.axis_raw, 1.0);
        assert_eq!(state.device_type, InputDeviceType::Mouse);
    }

    #[test]
    fn test_mouse_motion_binding() {
        let mut backend = ScriptedBackend::new();
        backend.set_mouse_delta(Vec2::new(0.02, 0.0));
        let binding = Binding::axis(AxisControl::MouseMotion(MouseAxis::Horizontal)).with_deadzone(0.05);
        assert_eq!(binding.state(&InputContext::new(&backend)).axis_raw, 0.0);
    }

    #[test]
    fn test_modifier_gates_binding() {
        let mut backend = ScriptedBackend::new();
        let binding = Binding::button(ButtonControl::key(KeyCode::KeyS))
            .with_modifiers(ModifierSet::all(vec![Modifier::key(KeyCode::ControlLeft)]));

        backend.press_key(KeyCode::KeyS);
        let state = binding.state(&InputContext::new(&backend));
        assert!(!state.down);
        assert_eq!(state.axis, 0.0);

        backend.press_key(KeyCode::ControlLeft);
        assert!(binding.state(&InputContext::new(&backend)).down);
    }

    #[test]
    fn test_end_to_end_shift_gate_on_gamepad_binding() {
        let mut backend = ScriptedBackend::new();
        let gamepad = connected_pad(&mut backend);
        let binding = Binding::button(ButtonControl::gamepad(GamepadButton::West))
            .with_modifiers(ModifierSet::all(vec![Modifier::key(KeyCode::ShiftLeft)]));

        backend.press_gamepad_button(0, GamepadButton::West);
        let state = binding.state(&InputContext::with_gamepad(&backend, Some(&gamepad)));
        assert!(!state.down);

        backend.press_key(KeyCode::ShiftLeft);
        let state = binding.state(&InputContext::with_gamepad(&backend, Some(&gamepad)));
        assert!(state.down);
        assert_eq!(state.gamepad, Some(0));
    }

    #[test]
    fn test_state_from_detects_edges() {
        let mut backend = ScriptedBackend::new();
        let binding = Binding::button(ButtonControl::key(KeyCode::Enter));
        let smoothing = AxisSmoothing::default();

        let first = binding.state(&InputContext::new(&backend));
        backend.press_key(KeyCode::Enter);
        let second = binding.state_from(&first, &InputContext::new(&backend), smoothing, 0.016);
        assert!(second.pressed);

        let third = binding.state_from(&second, &InputContext::new(&backend), smoothing, 0.016);
        assert!(!third.pressed);
        assert!(third.down);
    }

    #[test]
    fn test_deadzone_clamped() {
        let mut binding = Binding::axis(AxisControl::Gamepad(GamepadAxis::LeftStickX));
        binding.set_deadzone(-1.0);
        assert_eq!(binding.deadzone(), 0.0);
        binding.set_deadzone(4.0);
        assert_eq!(binding.deadzone(), 1.0);
    }

    #[test]
    fn test_structural_equality_ignores_deadzone() {
        let a = Binding::button(ButtonControl::key(KeyCode::KeyQ)).with_deadzone(0.1);
        let b = Binding::button(ButtonControl::key(KeyCode::KeyQ)).with_deadzone(0.9);
        let c = b
            .clone()
            .with_modifiers(ModifierSet::all(vec![Modifier::key(KeyCode::AltLeft)]));
        assert_eq!(a, b);
        assert_ne!(b, c);

        let mut set = HashSet::new();
        set.insert(a);
        set.insert(b);
        set.insert(c);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_copy_is_deep() {
        let original = Binding::button(ButtonControl::key(KeyCode::KeyE))
            .with_modifiers(ModifierSet::all(vec![Modifier::key(KeyCode::ShiftLeft)]));
        let mut copy = original.clone();
        copy.set_deadzone(0.5);
        assert_eq!(copy, original);
        assert_eq!(copy.modifiers().modifiers().len(), 1);
        assert_ne!(copy.deadzone(), original.deadzone());
    }

    #[test]
    fn test_names() {
        let binding = Binding::button(ButtonControl::key(KeyCode::KeyA))
            .with_modifiers(ModifierSet::all(vec![Modifier::key(KeyCode::ShiftLeft)]));
        assert_eq!(binding.name(false), "ShiftLeft+KeyA");
        assert_eq!(binding.name(true), "ShiftLeft+A");

        let pair = Binding::button_pair(
            ButtonControl::key(KeyCode::KeyA),
            ButtonControl::key(KeyCode::KeyD),
        );
        assert_eq!(pair.name(true), "A/D");
        assert_eq!(Binding::wheel(WheelAxis::Vertical).name(true), "MWVertical");
    }
}
