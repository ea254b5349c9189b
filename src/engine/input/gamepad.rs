// A single gamepad slot: connection, exclusive claim and usage detection

use super::backend::InputBackend;
use super::config::GamepadUsage;
use super::control::{GamepadAxis, GamepadButton};
use super::device::{DeviceCore, DeviceIdAllocator, InputDevice, GAMEPAD_PRIORITY};
use super::state::InputDeviceType;
use std::collections::HashSet;

/// One gamepad slot owned by the [`GamepadDeviceManager`](super::gamepad_manager::GamepadDeviceManager)
///
/// Connection and claim transitions are driven through the manager so its
/// bookkeeping stays in sync; the device itself only guards each transition.
#[derive(Debug, Clone)]
pub struct GamepadDevice {
    core: DeviceCore,
    index: usize,
    connected: bool,
    /// Not claimed by anyone; only meaningful while connected
    unclaimed: bool,
    name: String,
    axis_count: usize,
    buttons_down: HashSet<GamepadButton>,
    usage: GamepadUsage,
}

impl GamepadDevice {
    pub fn new(index: usize, ids: &mut DeviceIdAllocator) -> Self {
        Self {
            core: DeviceCore::new(ids, GAMEPAD_PRIORITY),
            index,
            connected: false,
            unclaimed: true,
            name: String::new(),
            axis_count: 0,
            buttons_down: HashSet::new(),
            usage: GamepadUsage::default(),
        }
    }

    /// Stable slot index in the manager
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Connected and not claimed
    pub fn is_available(&self) -> bool {
        self.connected && self.unclaimed
    }

    pub fn is_claimed(&self) -> bool {
        self.connected && !self.unclaimed
    }

    /// Name reported by the backend at connection time
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn axis_count(&self) -> usize {
        self.axis_count
    }

    pub fn usage(&self) -> GamepadUsage {
        self.usage
    }

    pub fn set_usage(&mut self, usage: GamepadUsage) {
        self.usage = usage;
    }

    /// Buttons held as of the last update
    pub fn buttons_down(&self) -> &HashSet<GamepadButton> {
        &self.buttons_down
    }

    pub(crate) fn connect(&mut self, name: String, axis_count: usize) -> bool {
        if self.connected {
            return false;
        }
        self.connected = true;
        self.unclaimed = true;
        self.name = name;
        self.axis_count = axis_count;
        self.buttons_down.clear();
        true
    }

    /// Disconnecting also drops any claim
    pub(crate) fn disconnect(&mut self) -> bool {
        if !self.connected {
            return false;
        }
        self.connected = false;
        self.unclaimed = true;
        self.buttons_down.clear();
        self.core.clear_used();
        true
    }

    pub(crate) fn claim(&mut self) -> bool {
        if !self.is_available() {
            return false;
        }
        self.unclaimed = false;
        true
    }

    pub(crate) fn free(&mut self) -> bool {
        if !self.is_claimed() {
            return false;
        }
        self.unclaimed = true;
        true
    }

    /// Refresh held buttons and return this frame's (pressed, released) edges
    ///
    /// A locked gamepad keeps tracking its buttons but reports no edges.
    pub(crate) fn poll_buttons(
        &mut self,
        backend: &dyn InputBackend,
    ) -> (Vec<GamepadButton>, Vec<GamepadButton>) {
        let current: HashSet<GamepadButton> = GamepadButton::ALL
            .iter()
            .copied()
            .filter(|button| backend.is_gamepad_button_down(self.index, *button))
            .collect();

        let (mut pressed, mut released) = (Vec::new(), Vec::new());
        if self.core().can_report() {
            pressed = GamepadButton::ALL
                .iter()
                .copied()
                .filter(|b| current.contains(b) && !self.buttons_down.contains(b))
                .collect();
            released = GamepadButton::ALL
                .iter()
                .copied()
                .filter(|b| !current.contains(b) && self.buttons_down.contains(b))
                .collect();
        }
        self.buttons_down = current;
        (pressed, released)
    }
}

impl InputDevice for GamepadDevice {
    fn core(&self) -> &DeviceCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut DeviceCore {
        &mut self.core
    }

    fn device_type(&self) -> InputDeviceType {
        InputDeviceType::Gamepad
    }

    fn detect_usage(&mut self, backend: &dyn InputBackend) -> bool {
        if !self.connected {
            return false;
        }
        if self.usage.buttons
            && GamepadButton::ALL
                .iter()
                .any(|button| backend.is_gamepad_button_down(self.index, *button))
        {
            return true;
        }
        GamepadAxis::ALL.iter().any(|axis| {
            let value = backend.gamepad_axis(self.index, *axis);
            let threshold = if axis.is_trigger() {
                self.usage.trigger_threshold
            } else {
                self.usage.axis_threshold
            };
            value.abs() > threshold
        })
    }
}
