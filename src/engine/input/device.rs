// Input devices: identity, activation/lock state, ordering and usage detection

use super::backend::InputBackend;
use super::config::MouseUsage;
use super::state::InputDeviceType;
use log::trace;

/// Default processing priority of the keyboard
pub const KEYBOARD_PRIORITY: u32 = 100;
/// Default processing priority of the mouse
pub const MOUSE_PRIORITY: u32 = 200;
/// Default processing priority of gamepads
pub const GAMEPAD_PRIORITY: u32 = 300;

/// Unique device identifier, assigned in construction order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId(u32);

impl DeviceId {
    pub fn value(&self) -> u32 {
        self.0
    }
}

/// Hands out monotonically increasing device ids
///
/// Owned by whoever constructs devices so tests can start from a known state.
#[derive(Debug, Default)]
pub struct DeviceIdAllocator {
    next: u32,
}

impl DeviceIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> DeviceId {
        let id = DeviceId(self.next);
        self.next += 1;
        id
    }

    /// Number of ids handed out so far
    pub fn allocated(&self) -> u32 {
        self.next
    }
}

/// Processing order of a device: by priority, then by id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceOrder {
    pub priority: u32,
    pub id: DeviceId,
}

/// State shared by every device kind
#[derive(Debug, Clone)]
pub struct DeviceCore {
    id: DeviceId,
    priority: u32,
    active: bool,
    locked: bool,
    used: bool,
}

impl DeviceCore {
    pub fn new(ids: &mut DeviceIdAllocator, priority: u32) -> Self {
        Self {
            id: ids.allocate(),
            priority,
            active: true,
            locked: false,
            used: false,
        }
    }

    /// Whether the device may report usage this frame
    pub fn can_report(&self) -> bool {
        self.active && !self.locked
    }

    pub(crate) fn clear_used(&mut self) {
        self.used = false;
    }
}

/// A physical or logical input source
///
/// Implementors expose their [`DeviceCore`]; everything else has defaults.
pub trait InputDevice {
    fn core(&self) -> &DeviceCore;

    fn core_mut(&mut self) -> &mut DeviceCore;

    fn device_type(&self) -> InputDeviceType;

    /// Sample the backend and report whether the device was used this frame
    fn detect_usage(&mut self, backend: &dyn InputBackend) -> bool;

    fn id(&self) -> DeviceId {
        self.core().id
    }

    /// Lower priorities are processed first
    fn priority(&self) -> u32 {
        self.core().priority
    }

    fn set_priority(&mut self, priority: u32) {
        self.core_mut().priority = priority;
    }

    fn order(&self) -> DeviceOrder {
        DeviceOrder {
            priority: self.priority(),
            id: self.id(),
        }
    }

    fn is_active(&self) -> bool {
        self.core().active
    }

    fn activate(&mut self) {
        self.core_mut().active = true;
    }

    fn deactivate(&mut self) {
        let core = self.core_mut();
        core.active = false;
        core.used = false;
    }

    fn is_locked(&self) -> bool {
        self.core().locked
    }

    /// Locked devices report no usage until unlocked
    fn lock(&mut self) {
        let core = self.core_mut();
        core.locked = true;
        core.used = false;
    }

    fn unlock(&mut self) {
        self.core_mut().locked = false;
    }

    fn was_used(&self) -> bool {
        self.core().used
    }

    /// Per-frame update; returns whether the device was used
    fn update(&mut self, backend: &dyn InputBackend, _dt: f32) -> bool {
        let used = self.core().can_report() && self.detect_usage(backend);
        self.core_mut().used = used;
        if used {
            trace!("{:?} device {} used", self.device_type(), self.id().value());
        }
        used
    }
}

/// The system keyboard
#[derive(Debug, Clone)]
pub struct KeyboardDevice {
    core: DeviceCore,
}

impl KeyboardDevice {
    pub fn new(ids: &mut DeviceIdAllocator) -> Self {
        Self {
            core: DeviceCore::new(ids, KEYBOARD_PRIORITY),
        }
    }
}

impl InputDevice for KeyboardDevice {
    fn core(&self) -> &DeviceCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut DeviceCore {
        &mut self.core
    }

    fn device_type(&self) -> InputDeviceType {
        InputDeviceType::Keyboard
    }

    fn detect_usage(&mut self, backend: &dyn InputBackend) -> bool {
        backend.any_key_down()
    }
}

/// The system mouse
#[derive(Debug, Clone)]
pub struct MouseDevice {
    core: DeviceCore,
    usage: MouseUsage,
}

impl MouseDevice {
    pub fn new(ids: &mut DeviceIdAllocator, usage: MouseUsage) -> Self {
        Self {
            core: DeviceCore::new(ids, MOUSE_PRIORITY),
            usage,
        }
    }

    pub fn usage(&self) -> MouseUsage {
        self.usage
    }

    pub fn set_usage(&mut self, usage: MouseUsage) {
        self.usage = usage;
    }
}

impl InputDevice for MouseDevice {
    fn core(&self) -> &DeviceCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut DeviceCore {
        &mut self.core
    }

    fn device_type(&self) -> InputDeviceType {
        InputDeviceType::Mouse
    }

    fn detect_usage(&mut self, backend: &dyn InputBackend) -> bool {
        if self.usage.buttons && backend.any_mouse_button_down() {
            return true;
        }
        let moved = backend.mouse_delta().length() > self.usage.move_threshold;
        let wheel = backend.mouse_wheel();
        let scrolled = wheel != glam::Vec2::ZERO && wheel.length() > self.usage.wheel_threshold;
        moved || scrolled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::backend::ScriptedBackend;
    use glam::Vec2;
    use winit::event::MouseButton;
    use winit::keyboard::KeyCode;

    #[test]
    fn test_ids_are_monotonic() {
        let mut ids = DeviceIdAllocator::new();
        let a = ids.allocate();
        let b = ids.allocate();
        assert!(a < b);
        assert_eq!(ids.allocated(), 2);
    }

    #[test]
    fn test_allocators_are_independent() {
        let mut first = DeviceIdAllocator::new();
        first.allocate();
        let mut second = DeviceIdAllocator::new();
        assert_eq!(second.allocate().value(), 0);
    }

    #[test]
    fn test_order_is_priority_then_id() {
        let mut ids = DeviceIdAllocator::new();
        let mouse = MouseDevice::new(&mut ids, MouseUsage::default());
        let mut keyboard = KeyboardDevice::new(&mut ids);
        assert!(keyboard.order() < mouse.order());

        keyboard.set_priority(MOUSE_PRIORITY);
        // Same priority: the older device (lower id) goes first
        assert!(mouse.order() < keyboard.order());
    }

    #[test]
    fn test_keyboard_usage() {
        let mut ids = DeviceIdAllocator::new();
        let mut keyboard = KeyboardDevice::new(&mut ids);
        let mut backend = ScriptedBackend::new();

        assert!(!keyboard.update(&backend, 0.016));
        backend.press_key(KeyCode::KeyZ);
        assert!(keyboard.update(&backend, 0.016));
        assert!(keyboard.was_used());
    }

    #[test]
    fn test_locked_device_reports_nothing() {
        let mut ids = DeviceIdAllocator::new();
        let mut keyboard = KeyboardDevice::new(&mut ids);
        let mut backend = ScriptedBackend::new();
        backend.press_key(KeyCode::KeyZ);

        keyboard.lock();
        assert!(keyboard.is_locked());
        assert!(!keyboard.update(&backend, 0.016));

        keyboard.unlock();
        assert!(keyboard.update(&backend, 0.016));
    }

    #[test]
    fn test_deactivated_device_reports_nothing() {
        let mut ids = DeviceIdAllocator::new();
        let mut keyboard = KeyboardDevice::new(&mut ids);
        let mut backend = ScriptedBackend::new();
        backend.press_key(KeyCode::KeyZ);

        keyboard.deactivate();
        assert!(!keyboard.is_active());
        assert!(!keyboard.update(&backend, 0.016));

        keyboard.activate();
        assert!(keyboard.update(&backend, 0.016));
    }

    #[test]
    fn test_mouse_usage_thresholds() {
        let mut ids = DeviceIdAllocator::new();
        let mut mouse = MouseDevice::new(&mut ids, MouseUsage::new(2.0, 0.0, true));
        let mut backend = ScriptedBackend::new();

        backend.set_mouse_delta(Vec2::new(1.0, 1.0));
        assert!(!mouse.update(&backend, 0.016));

        backend.set_mouse_delta(Vec2::new(3.0, 0.0));
        assert!(mouse.update(&backend, 0.016));

        backend.set_mouse_delta(Vec2::ZERO);
        backend.set_mouse_wheel(Vec2::new(0.0, -1.0));
        assert!(mouse.update(&backend, 0.016));

        backend.set_mouse_wheel(Vec2::ZERO);
        backend.press_mouse_button(MouseButton::Left);
        assert!(mouse.update(&backend, 0.016));
    }
}
