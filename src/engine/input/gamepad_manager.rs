// Gamepad slot manager: connection tracking, exclusive ownership and usage tracking

use super::backend::InputBackend;
use super::config::GamepadUsage;
use super::control::GamepadButton;
use super::device::{DeviceIdAllocator, DeviceOrder, InputDevice, GAMEPAD_PRIORITY};
use super::gamepad::GamepadDevice;
use log::{debug, info, warn};

/// Notifications emitted by the manager, always synchronously
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamepadEvent {
    ConnectionChanged(bool),
    Claimed,
    Freed,
    ButtonPressed(GamepadButton),
    ButtonReleased(GamepadButton),
}

/// Observer of gamepad events
pub trait GamepadListener {
    /// Lower priorities are notified first; ties keep registration order
    fn priority(&self) -> u32 {
        0
    }

    fn on_gamepad_event(&mut self, gamepad: &GamepadDevice, event: GamepadEvent);
}

/// Handle returned when registering a listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listeners = Vec<(ListenerId, Box<dyn GamepadListener>)>;

fn emit(listeners: &mut Listeners, gamepad: &GamepadDevice, event: GamepadEvent) {
    for (_, listener) in listeners.iter_mut() {
        listener.on_gamepad_event(gamepad, event);
    }
}

/// Owns every gamepad slot and arbitrates which consumer owns which gamepad
///
/// Slots are identified by their index, which never changes for as long as the
/// slot exists. Claimed and last-used lists hold slot indices in the order the
/// gamepads were claimed or used.
pub struct GamepadDeviceManager {
    gamepads: Vec<GamepadDevice>,
    claimed: Vec<usize>,
    last_claimed: Option<usize>,
    auto_claimed: Vec<usize>,
    last_used: Vec<usize>,
    last_used_gamepad: Option<usize>,
    claim_button: Option<GamepadButton>,
    usage: GamepadUsage,
    priority: u32,
    listeners: Listeners,
    next_listener: u64,
}

impl GamepadDeviceManager {
    /// Create a manager with `slots` disconnected gamepads
    pub fn new(slots: usize, ids: &mut DeviceIdAllocator) -> Self {
        let gamepads = (0..slots).map(|index| GamepadDevice::new(index, ids)).collect();
        Self {
            gamepads,
            claimed: Vec::new(),
            last_claimed: None,
            auto_claimed: Vec::new(),
            last_used: Vec::new(),
            last_used_gamepad: None,
            claim_button: Some(GamepadButton::South),
            usage: GamepadUsage::default(),
            priority: GAMEPAD_PRIORITY,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    /// Number of slots
    pub fn slot_count(&self) -> usize {
        self.gamepads.len()
    }

    pub fn claim_button(&self) -> Option<GamepadButton> {
        self.claim_button
    }

    /// Button that claims an available gamepad when pressed on it; `None` disables auto-claim
    pub fn set_claim_button(&mut self, button: Option<GamepadButton>) {
        self.claim_button = button;
    }

    /// Usage thresholds applied to every slot, current and future
    pub fn set_usage(&mut self, usage: GamepadUsage) {
        self.usage = usage;
        for gamepad in &mut self.gamepads {
            gamepad.set_usage(usage);
        }
    }

    /// Processing priority shared by every slot
    pub fn set_priority(&mut self, priority: u32) {
        self.priority = priority;
        for gamepad in &mut self.gamepads {
            gamepad.set_priority(priority);
        }
    }

    /// Earliest processing order among the slots, `None` without slots
    pub fn order(&self) -> Option<DeviceOrder> {
        self.gamepads.iter().map(|gamepad| gamepad.order()).min()
    }

    /// Register a listener; it is placed after existing listeners of equal priority
    pub fn add_listener(&mut self, listener: Box<dyn GamepadListener>) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, listener));
        // Stable sort keeps registration order within a priority
        self.listeners.sort_by_key(|(_, listener)| listener.priority());
        id
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Per-frame update, visiting slots in index order
    pub fn update(&mut self, backend: &dyn InputBackend, dt: f32) {
        self.last_used.clear();
        self.auto_claimed.clear();

        for index in 0..self.gamepads.len() {
            let present = backend.is_gamepad_present(index);
            let connected = self.gamepads[index].is_connected();

            if present && !connected {
                let name = backend
                    .gamepad_name(index)
                    .unwrap_or_else(|| format!("Gamepad {}", index));
                let axis_count = backend.gamepad_axis_count(index);
                self.connect_slot(index, name, axis_count);
            } else if !present && connected {
                self.disconnect_slot(index);
                continue;
            } else if !present {
                continue;
            }

            let (pressed, released) = self.gamepads[index].poll_buttons(backend);
            for button in pressed {
                emit(
                    &mut self.listeners,
                    &self.gamepads[index],
                    GamepadEvent::ButtonPressed(button),
                );
                if Some(button) == self.claim_button && self.gamepads[index].is_available() {
                    debug!("Claim button pressed on gamepad {}", index);
                    if self.claim_gamepad(index) {
                        self.auto_claimed.push(index);
                    }
                }
            }
            for button in released {
                emit(
                    &mut self.listeners,
                    &self.gamepads[index],
                    GamepadEvent::ButtonReleased(button),
                );
            }

            if self.gamepads[index].update(backend, dt) {
                self.last_used.push(index);
                self.last_used_gamepad = Some(index);
            }
        }
    }

    fn connect_slot(&mut self, index: usize, name: String, axis_count: usize) {
        let gamepad = &mut self.gamepads[index];
        if !gamepad.connect(name, axis_count) {
            return;
        }
        gamepad.set_usage(self.usage);
        info!(
            "Gamepad {} connected: {} ({} axes)",
            index,
            gamepad.name(),
            gamepad.axis_count()
        );
        emit(
            &mut self.listeners,
            &self.gamepads[index],
            GamepadEvent::ConnectionChanged(true),
        );
    }

    fn disconnect_slot(&mut self, index: usize) {
        if !self.gamepads[index].disconnect() {
            return;
        }
        info!("Gamepad {} disconnected", index);

        self.last_used.retain(|&slot| slot != index);
        self.claimed.retain(|&slot| slot != index);
        if self.last_used_gamepad == Some(index) {
            self.last_used_gamepad = self.last_used.last().copied();
        }
        if self.last_claimed == Some(index) {
            self.last_claimed = self.claimed.last().copied();
        }

        emit(
            &mut self.listeners,
            &self.gamepads[index],
            GamepadEvent::ConnectionChanged(false),
        );
    }

    /// Claim a specific slot; fails if it is disconnected or already claimed
    pub fn claim_gamepad(&mut self, index: usize) -> bool {
        let Some(gamepad) = self.gamepads.get_mut(index) else {
            return false;
        };
        if !gamepad.claim() {
            return false;
        }
        self.claimed.push(index);
        self.last_claimed = Some(index);
        info!("Gamepad {} claimed", index);
        emit(&mut self.listeners, &self.gamepads[index], GamepadEvent::Claimed);
        true
    }

    /// Free a claimed slot; a no-op returning false when it is not claimed
    pub fn return_gamepad(&mut self, index: usize) -> bool {
        let Some(gamepad) = self.gamepads.get_mut(index) else {
            return false;
        };
        if !gamepad.free() {
            return false;
        }
        self.claimed.retain(|&slot| slot != index);
        if self.last_claimed == Some(index) {
            self.last_claimed = self.claimed.last().copied();
        }
        debug!("Gamepad {} freed", index);
        emit(&mut self.listeners, &self.gamepads[index], GamepadEvent::Freed);
        true
    }

    /// Free the slot held by `gamepad`, provided it is this manager's device
    pub fn return_device(&mut self, gamepad: &GamepadDevice) -> bool {
        let owned = self
            .gamepads
            .get(gamepad.index())
            .is_some_and(|slot| slot.id() == gamepad.id());
        if !owned {
            warn!("Gamepad {} is not managed here", gamepad.index());
            return false;
        }
        self.return_gamepad(gamepad.index())
    }

    /// Claim the preferred slot if available, otherwise the first available slot
    pub fn request_gamepad(&mut self, preferred: Option<usize>) -> Option<&GamepadDevice> {
        let index = preferred
            .filter(|&index| self.gamepads.get(index).is_some_and(|g| g.is_available()))
            .or_else(|| self.gamepads.iter().position(|g| g.is_available()))?;
        debug!("Gamepad {} requested (preferred {:?})", index, preferred);
        if self.claim_gamepad(index) {
            self.gamepads.get(index)
        } else {
            None
        }
    }

    /// Change the number of slots, keeping retained slots untouched
    ///
    /// Trailing slots are disconnected before being dropped.
    pub fn resize(&mut self, slots: usize, ids: &mut DeviceIdAllocator) {
        let current = self.gamepads.len();
        if slots == current {
            return;
        }
        if slots < current {
            for index in slots..current {
                self.disconnect_slot(index);
            }
            self.gamepads.truncate(slots);
            self.auto_claimed.retain(|&slot| slot < slots);
        } else {
            for index in current..slots {
                let mut gamepad = GamepadDevice::new(index, ids);
                gamepad.set_usage(self.usage);
                gamepad.set_priority(self.priority);
                self.gamepads.push(gamepad);
            }
        }
        info!("Gamepad slots resized from {} to {}", current, slots);
    }

    /// Lock a slot so it reports neither usage nor button events
    pub fn lock_gamepad(&mut self, index: usize) -> bool {
        match self.gamepads.get_mut(index) {
            Some(gamepad) => {
                gamepad.lock();
                true
            }
            None => false,
        }
    }

    pub fn unlock_gamepad(&mut self, index: usize) -> bool {
        match self.gamepads.get_mut(index) {
            Some(gamepad) => {
                gamepad.unlock();
                true
            }
            None => false,
        }
    }

    pub fn gamepad(&self, index: usize) -> Option<&GamepadDevice> {
        self.gamepads.get(index)
    }

    pub fn all_gamepads(&self) -> &[GamepadDevice] {
        &self.gamepads
    }

    pub fn connected_gamepads(&self) -> Vec<&GamepadDevice> {
        self.gamepads.iter().filter(|g| g.is_connected()).collect()
    }

    pub fn available_gamepads(&self) -> Vec<&GamepadDevice> {
        self.gamepads.iter().filter(|g| g.is_available()).collect()
    }

    /// Claimed gamepads, oldest claim first
    pub fn claimed_gamepads(&self) -> Vec<&GamepadDevice> {
        self.claimed.iter().map(|&index| &self.gamepads[index]).collect()
    }

    pub fn last_claimed_gamepad(&self) -> Option<&GamepadDevice> {
        self.last_claimed.map(|index| &self.gamepads[index])
    }

    /// Slots claimed by the claim button during the last update, still unowned by a player
    pub fn auto_claimed(&self) -> &[usize] {
        &self.auto_claimed
    }

    /// Mark an auto-claimed slot as handed over to its new owner
    pub fn take_auto_claimed(&mut self, index: usize) -> bool {
        let before = self.auto_claimed.len();
        self.auto_claimed.retain(|&slot| slot != index);
        self.auto_claimed.len() != before
    }

    /// Gamepads used this frame, in slot order
    pub fn last_used_gamepads(&self) -> Vec<&GamepadDevice> {
        self.last_used.iter().map(|&index| &self.gamepads[index]).collect()
    }

    pub fn last_used_gamepad(&self) -> Option<&GamepadDevice> {
        self.last_used_gamepad.map(|index| &self.gamepads[index])
    }

    pub fn has_connected_gamepad(&self) -> bool {
        self.gamepads.iter().any(|g| g.is_connected())
    }
}
