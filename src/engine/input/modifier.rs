// Modifier gates: auxiliary controls that must hold for a binding to report activity

use super::backend::InputContext;
use super::control::{ButtonControl, GamepadAxis, GamepadButton};
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

/// Threshold past which a gamepad axis counts as a held modifier
const AXIS_MODIFIER_THRESHOLD: f32 = 0.5;

/// How the modifiers of a set combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ModifierOperator {
    #[default]
    And,
    Or,
}

/// A single modifier predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Modifier {
    control: ButtonControl,
    /// Active while the control is *not* held
    reversed: bool,
}

impl Modifier {
    pub fn new(control: ButtonControl) -> Self {
        Self {
            control,
            reversed: false,
        }
    }

    /// Modifier that is active while the control is released
    pub fn reversed(control: ButtonControl) -> Self {
        Self {
            control,
            reversed: true,
        }
    }

    pub fn key(code: KeyCode) -> Self {
        Self::new(ButtonControl::Key(code))
    }

    pub fn mouse(button: MouseButton) -> Self {
        Self::new(ButtonControl::Mouse(button))
    }

    pub fn gamepad(button: GamepadButton) -> Self {
        Self::new(ButtonControl::Gamepad(button))
    }

    pub fn gamepad_axis(axis: GamepadAxis, positive: bool) -> Self {
        Self::new(ButtonControl::GamepadAxisDirection { axis, positive })
    }

    pub fn control(&self) -> ButtonControl {
        self.control
    }

    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    fn is_gamepad(&self) -> bool {
        matches!(
            self.control,
            ButtonControl::Gamepad(_) | ButtonControl::GamepadAxisDirection { .. }
        )
    }

    /// Evaluate the predicate against current device state
    ///
    /// Gamepad modifiers are never active without a connected context
    /// gamepad, reversed or not.
    pub fn is_active(&self, ctx: &InputContext) -> bool {
        if self.is_gamepad() && ctx.gamepad_index().is_none() {
            return false;
        }
        let held = self.control.is_down(ctx, AXIS_MODIFIER_THRESHOLD);
        held != self.reversed
    }

    pub fn name(&self, shorthand: bool) -> String {
        let name = self.control.name(shorthand);
        if self.reversed {
            format!("!{}", name)
        } else {
            name
        }
    }
}

/// Ordered modifier predicates combined with AND or OR
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ModifierSet {
    operator: ModifierOperator,
    modifiers: Vec<Modifier>,
}

impl ModifierSet {
    pub fn new(operator: ModifierOperator, modifiers: Vec<Modifier>) -> Self {
        Self {
            operator,
            modifiers,
        }
    }

    /// All modifiers must be active
    pub fn all(modifiers: Vec<Modifier>) -> Self {
        Self::new(ModifierOperator::And, modifiers)
    }

    /// At least one modifier must be active
    pub fn any(modifiers: Vec<Modifier>) -> Self {
        Self::new(ModifierOperator::Or, modifiers)
    }

    pub fn operator(&self) -> ModifierOperator {
        self.operator
    }

    pub fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
    }

    pub fn push(&mut self, modifier: Modifier) {
        self.modifiers.push(modifier);
    }

    /// Whether the gate lets the owning binding through; an empty set always does
    pub fn is_active(&self, ctx: &InputContext) -> bool {
        if self.modifiers.is_empty() {
            return true;
        }
        match self.operator {
            ModifierOperator::And => self.modifiers.iter().all(|m| m.is_active(ctx)),
            ModifierOperator::Or => self.modifiers.iter().any(|m| m.is_active(ctx)),
        }
    }

    /// Prefix such as `"Shift+"` or `"Ctrl|Alt+"`, empty for an empty set
    pub fn prefix(&self, shorthand: bool) -> String {
        if self.modifiers.is_empty() {
            return String::new();
        }
        let separator = match self.operator {
            ModifierOperator::And => "+",
            ModifierOperator::Or => "|",
        };
        let names: Vec<String> = self.modifiers.iter().map(|m| m.name(shorthand)).collect();
        format!("{}+", names.join(separator))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::backend::ScriptedBackend;
    use crate::engine::input::device::DeviceIdAllocator;
    use crate::engine::input::gamepad::GamepadDevice;

    #[test]
    fn test_empty_set_is_active() {
        let backend = ScriptedBackend::new();
        let set = ModifierSet::default();
        assert!(set.is_active(&InputContext::new(&backend)));
        assert!(ModifierSet::any(Vec::new()).is_active(&InputContext::new(&backend)));
    }

    #[test]
    fn test_and_requires_all() {
        let mut backend = ScriptedBackend::new();
        let set = ModifierSet::all(vec![
            Modifier::key(KeyCode::ShiftLeft),
            Modifier::key(KeyCode::ControlLeft),
        ]);

        backend.press_key(KeyCode::ShiftLeft);
        assert!(!set.is_active(&InputContext::new(&backend)));

        backend.press_key(KeyCode::ControlLeft);
        assert!(set.is_active(&InputContext::new(&backend)));
    }

    #[test]
    fn test_or_requires_one() {
        let mut backend = ScriptedBackend::new();
        let set = ModifierSet::any(vec![
            Modifier::key(KeyCode::ShiftLeft),
            Modifier::key(KeyCode::ShiftRight),
        ]);
        assert!(!set.is_active(&InputContext::new(&backend)));

        backend.press_key(KeyCode::ShiftRight);
        assert!(set.is_active(&InputContext::new(&backend)));
    }

    #[test]
    fn test_reversed_modifier() {
        let mut backend = ScriptedBackend::new();
        let modifier = Modifier::reversed(ButtonControl::Key(KeyCode::AltLeft));
        assert!(modifier.is_active(&InputContext::new(&backend)));

        backend.press_key(KeyCode::AltLeft);
        assert!(!modifier.is_active(&InputContext::new(&backend)));
    }

    #[test]
    fn test_gamepad_modifier_inert_without_gamepad() {
        let mut backend = ScriptedBackend::new();
        backend.connect_gamepad(0, "Pad");
        backend.press_gamepad_button(0, GamepadButton::LeftBumper);

        let held = Modifier::gamepad(GamepadButton::LeftBumper);
        let reversed = Modifier::reversed(ButtonControl::Gamepad(GamepadButton::RightBumper));
        let ctx = InputContext::new(&backend);
        assert!(!held.is_active(&ctx));
        assert!(!reversed.is_active(&ctx));

        let mut ids = DeviceIdAllocator::new();
        let mut gamepad = GamepadDevice::new(0, &mut ids);
        gamepad.connect("Pad".to_string(), 6);
        let ctx = InputContext::with_gamepad(&backend, Some(&gamepad));
        assert!(held.is_active(&ctx));
        assert!(reversed.is_active(&ctx));
    }

    #[test]
    fn test_gamepad_axis_modifier() {
        let mut backend = ScriptedBackend::new();
        backend.connect_gamepad(0, "Pad");
        let mut ids = DeviceIdAllocator::new();
        let mut gamepad = GamepadDevice::new(0, &mut ids);
        gamepad.connect("Pad".to_string(), 6);
        let modifier = Modifier::gamepad_axis(GamepadAxis::LeftTrigger, true);

        backend.set_gamepad_axis(0, GamepadAxis::LeftTrigger, 0.4);
        assert!(!modifier.is_active(&InputContext::with_gamepad(&backend, Some(&gamepad))));

        backend.set_gamepad_axis(0, GamepadAxis::LeftTrigger, 0.9);
        assert!(modifier.is_active(&InputContext::with_gamepad(&backend, Some(&gamepad))));
    }

    #[test]
    fn test_prefix() {
        let set = ModifierSet::all(vec![Modifier::key(KeyCode::ShiftLeft)]);
        assert_eq!(set.prefix(false), "ShiftLeft+");

        let set = ModifierSet::any(vec![
            Modifier::key(KeyCode::ControlLeft),
            Modifier::key(KeyCode::AltLeft),
        ]);
        assert_eq!(set.prefix(false), "ControlLeft|AltLeft+");
        assert_eq!(ModifierSet::default().prefix(true), "");
    }

    #[test]
    fn test_structural_equality() {
        let a = ModifierSet::all(vec![Modifier::key(KeyCode::ShiftLeft)]);
        let b = ModifierSet::all(vec![Modifier::key(KeyCode::ShiftLeft)]);
        let c = ModifierSet::any(vec![Modifier::key(KeyCode::ShiftLeft)]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
