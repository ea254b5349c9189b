// Input system - Main coordination of devices, gamepad ownership and players

use super::action::InputAction;
use super::backend::InputBackend;
use super::config::InputSettings;
use super::device::{
    DeviceId, DeviceIdAllocator, DeviceOrder, InputDevice, KeyboardDevice, MouseDevice,
};
use super::gamepad_manager::GamepadDeviceManager;
use super::player::PlayerInput;
use super::state::InputDeviceType;
use super::InputError;
use log::{debug, info, warn};

/// Entry in the per-frame processing order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeviceSlot {
    Keyboard,
    Mouse,
    Extra(usize),
    Gamepads,
}

/// Main input system that coordinates all devices for all players
pub struct InputSystem {
    settings: InputSettings,

    /// Source of every device id handed out by this system
    ids: DeviceIdAllocator,

    keyboard: KeyboardDevice,
    mouse: MouseDevice,

    /// Devices registered by the application
    extra_devices: Vec<Box<dyn InputDevice>>,

    gamepads: GamepadDeviceManager,

    /// Input state for each player
    players: Vec<PlayerInput>,

    /// Type of the most recently used device
    current_device_type: InputDeviceType,

    frame: u64,
}

impl InputSystem {
    /// Create an input system with default settings
    pub fn new(max_players: usize) -> Self {
        Self::with_settings(max_players, InputSettings::default())
    }

    pub fn with_settings(max_players: usize, settings: InputSettings) -> Self {
        let mut ids = DeviceIdAllocator::new();
        let keyboard = KeyboardDevice::new(&mut ids);
        let mouse = MouseDevice::new(&mut ids, settings.mouse_usage());
        let mut gamepads = GamepadDeviceManager::new(settings.gamepad_slots(), &mut ids);
        gamepads.set_claim_button(settings.claim_button());
        gamepads.set_usage(settings.gamepad_usage());

        let players = (0..max_players).map(PlayerInput::new).collect();

        info!(
            "Input system ready: {} players, {} gamepad slots",
            max_players,
            settings.gamepad_slots()
        );

        Self {
            settings,
            ids,
            keyboard,
            mouse,
            extra_devices: Vec::new(),
            gamepads,
            players,
            current_device_type: InputDeviceType::None,
            frame: 0,
        }
    }

    /// Poll the backend and advance one frame
    ///
    /// A failed poll is logged and the frame is treated as idle.
    pub fn update(&mut self, backend: &mut dyn InputBackend, dt: f32) {
        if let Err(err) = self.try_update(backend, dt) {
            warn!("{}; treating frame {} as idle", err, self.frame);
            self.idle_frame(dt);
        }
    }

    /// Like [`update`](Self::update), but a failed poll is returned and nothing advances
    pub fn try_update(&mut self, backend: &mut dyn InputBackend, dt: f32) -> Result<(), InputError> {
        backend.poll()?;
        self.process(&*backend, dt);
        Ok(())
    }

    fn process(&mut self, backend: &dyn InputBackend, dt: f32) {
        self.frame += 1;

        let mut first_used = None;
        for slot in self.processing_order() {
            let used = match slot {
                DeviceSlot::Keyboard => self
                    .keyboard
                    .update(backend, dt)
                    .then_some(InputDeviceType::Keyboard),
                DeviceSlot::Mouse => self.mouse.update(backend, dt).then_some(InputDeviceType::Mouse),
                DeviceSlot::Extra(index) => {
                    let device = &mut self.extra_devices[index];
                    let used = device.update(backend, dt);
                    used.then(|| device.device_type())
                }
                DeviceSlot::Gamepads => {
                    self.gamepads.update(backend, dt);
                    (!self.gamepads.last_used_gamepads().is_empty())
                        .then_some(InputDeviceType::Gamepad)
                }
            };
            if first_used.is_none() {
                first_used = used;
            }
        }

        if let Some(device_type) = first_used {
            if device_type != self.current_device_type {
                debug!(
                    "Current device changed from {:?} to {:?}",
                    self.current_device_type, device_type
                );
            }
            self.current_device_type = device_type;
        }

        self.hand_over_auto_claimed();

        for player in &mut self.players {
            player.update(backend, &mut self.gamepads, dt);
        }
    }

    /// Give gamepads claimed by the claim button to players waiting for one
    fn hand_over_auto_claimed(&mut self) {
        let claimed = self.gamepads.auto_claimed().to_vec();
        for index in claimed {
            let Some(player) = self.players.iter_mut().find(|p| p.wants_gamepad()) else {
                break;
            };
            if player.adopt_gamepad(index, &self.gamepads) {
                self.gamepads.take_auto_claimed(index);
            }
        }
    }

    fn idle_frame(&mut self, dt: f32) {
        self.frame += 1;
        for player in &mut self.players {
            player.update_idle(dt);
        }
    }

    /// Devices sorted by (priority, id); gamepads are processed as one group
    fn processing_order(&self) -> Vec<DeviceSlot> {
        let mut slots: Vec<(DeviceOrder, DeviceSlot)> = vec![
            (self.keyboard.order(), DeviceSlot::Keyboard),
            (self.mouse.order(), DeviceSlot::Mouse),
        ];
        slots.extend(
            self.extra_devices
                .iter()
                .enumerate()
                .map(|(index, device)| (device.order(), DeviceSlot::Extra(index))),
        );
        if let Some(order) = self.gamepads.order() {
            slots.push((order, DeviceSlot::Gamepads));
        }
        slots.sort_by_key(|(order, _)| *order);
        slots.into_iter().map(|(_, slot)| slot).collect()
    }

    /// Type of the device that was used most recently
    ///
    /// When several devices are used in one frame, the first in processing order wins.
    pub fn current_device_type(&self) -> InputDeviceType {
        self.current_device_type
    }

    /// Frames advanced so far, idle ones included
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    pub fn settings(&self) -> &InputSettings {
        &self.settings
    }

    /// Apply new settings to the devices and gamepad slots
    ///
    /// Existing actions keep their timing; actions created afterwards use the new values.
    pub fn apply_settings(&mut self, settings: InputSettings) {
        self.mouse.set_usage(settings.mouse_usage());
        self.gamepads.set_usage(settings.gamepad_usage());
        self.gamepads.set_claim_button(settings.claim_button());
        self.gamepads.resize(settings.gamepad_slots(), &mut self.ids);
        self.settings = settings;
    }

    /// Resize the gamepad slot table
    pub fn set_gamepad_slots(&mut self, slots: usize) {
        self.settings.set_gamepad_slots(slots);
        self.gamepads.resize(slots, &mut self.ids);
    }

    /// New action using the current smoothing and timing settings
    pub fn create_action(&self, name: &str) -> InputAction {
        InputAction::from_settings(name, &self.settings)
    }

    pub fn keyboard(&self) -> &KeyboardDevice {
        &self.keyboard
    }

    pub fn keyboard_mut(&mut self) -> &mut KeyboardDevice {
        &mut self.keyboard
    }

    pub fn mouse(&self) -> &MouseDevice {
        &self.mouse
    }

    pub fn mouse_mut(&mut self) -> &mut MouseDevice {
        &mut self.mouse
    }

    pub fn gamepads(&self) -> &GamepadDeviceManager {
        &self.gamepads
    }

    pub fn gamepads_mut(&mut self) -> &mut GamepadDeviceManager {
        &mut self.gamepads
    }

    /// Register an application device; `build` receives this system's id allocator
    pub fn add_device<F>(&mut self, build: F) -> DeviceId
    where
        F: FnOnce(&mut DeviceIdAllocator) -> Box<dyn InputDevice>,
    {
        let device = build(&mut self.ids);
        let id = device.id();
        debug!("Registered {:?} device {}", device.device_type(), id.value());
        self.extra_devices.push(device);
        id
    }

    pub fn remove_device(&mut self, id: DeviceId) -> bool {
        let before = self.extra_devices.len();
        self.extra_devices.retain(|device| device.id() != id);
        self.extra_devices.len() != before
    }

    /// Keyboard, mouse or application device by id; gamepads live in [`gamepads`](Self::gamepads)
    pub fn device(&self, id: DeviceId) -> Option<&dyn InputDevice> {
        if self.keyboard.id() == id {
            return Some(&self.keyboard);
        }
        if self.mouse.id() == id {
            return Some(&self.mouse);
        }
        for device in &self.extra_devices {
            if device.id() == id {
                return Some(device.as_ref());
            }
        }
        None
    }

    fn device_mut(&mut self, id: DeviceId) -> Option<&mut dyn InputDevice> {
        if self.keyboard.id() == id {
            return Some(&mut self.keyboard);
        }
        if self.mouse.id() == id {
            return Some(&mut self.mouse);
        }
        for device in &mut self.extra_devices {
            if device.id() == id {
                return Some(device.as_mut());
            }
        }
        None
    }

    fn with_device(&mut self, id: DeviceId, f: impl FnOnce(&mut dyn InputDevice)) -> bool {
        match self.device_mut(id) {
            Some(device) => {
                f(device);
                true
            }
            None => false,
        }
    }

    /// Locked devices report no usage until unlocked
    pub fn lock_device(&mut self, id: DeviceId) -> bool {
        self.with_device(id, |device| device.lock())
    }

    pub fn unlock_device(&mut self, id: DeviceId) -> bool {
        self.with_device(id, |device| device.unlock())
    }

    pub fn activate_device(&mut self, id: DeviceId) -> bool {
        self.with_device(id, |device| device.activate())
    }

    pub fn deactivate_device(&mut self, id: DeviceId) -> bool {
        self.with_device(id, |device| device.deactivate())
    }

    /// Get input state for a specific player
    pub fn player(&self, player_id: usize) -> Option<&PlayerInput> {
        self.players.get(player_id)
    }

    /// Get mutable input state for a specific player
    pub fn player_mut(&mut self, player_id: usize) -> Option<&mut PlayerInput> {
        self.players.get_mut(player_id)
    }

    /// Get the number of players
    pub fn num_players(&self) -> usize {
        self.players.len()
    }

    /// Claim a gamepad for a player, preferring the slot matching its id
    pub fn request_gamepad(&mut self, player_id: usize) -> Option<usize> {
        let player = self.players.get_mut(player_id)?;
        player.request_gamepad(&mut self.gamepads)
    }

    pub fn assign_gamepad(&mut self, player_id: usize, index: usize) -> Result<(), InputError> {
        let player = self
            .players
            .get_mut(player_id)
            .ok_or(InputError::UnknownPlayer(player_id))?;
        player.assign_gamepad(index, &mut self.gamepads)
    }

    pub fn release_gamepad(&mut self, player_id: usize) -> bool {
        match self.players.get_mut(player_id) {
            Some(player) => player.release_gamepad(&mut self.gamepads),
            None => false,
        }
    }

    /// Check if any player pressed a specific action this frame
    pub fn any_player_just_pressed(&self, action: &str) -> bool {
        self.players.iter().any(|p| p.just_pressed(action))
    }

    /// Check if any player is holding a specific action
    pub fn any_player_down(&self, action: &str) -> bool {
        self.players.iter().any(|p| p.is_down(action))
    }

    /// Get a list of all players who just pressed an action
    pub fn players_who_pressed(&self, action: &str) -> Vec<usize> {
        self.players
            .iter()
            .filter(|p| p.just_pressed(action))
            .map(|p| p.player_id())
            .collect()
    }

    /// Reset all player input states
    pub fn reset_all(&mut self) {
        for player in &mut self.players {
            player.reset();
        }
    }
}

impl Default for InputSystem {
    fn default() -> Self {
        Self::new(4) // Default to 4 players
    }
}
