// Per-player input: owned actions and an exclusively claimed gamepad

use super::action::InputAction;
use super::backend::{InputBackend, InputContext};
use super::gamepad_manager::GamepadDeviceManager;
use super::state::InputState;
use super::InputError;
use log::{debug, info};

/// Input state for a single player
///
/// A player owns its actions and, optionally, one gamepad claimed through the
/// [`GamepadDeviceManager`]. Gamepad bindings of its actions only read that gamepad.
#[derive(Debug)]
pub struct PlayerInput {
    /// Player ID, also the preferred gamepad slot
    player_id: usize,

    /// Claimed gamepad slot
    gamepad: Option<usize>,

    /// Keep requesting a gamepad when none is held
    wants_gamepad: bool,

    actions: Vec<InputAction>,
}

impl PlayerInput {
    /// Create a new player input state
    pub fn new(player_id: usize) -> Self {
        Self {
            player_id,
            gamepad: None,
            wants_gamepad: false,
            actions: Vec::new(),
        }
    }

    /// Get the player ID
    pub fn player_id(&self) -> usize {
        self.player_id
    }

    /// Slot of the claimed gamepad, if any
    pub fn gamepad(&self) -> Option<usize> {
        self.gamepad
    }

    /// Claim a gamepad, preferring the slot matching the player ID
    ///
    /// If nothing is available now the player keeps asking on every update.
    pub fn request_gamepad(&mut self, manager: &mut GamepadDeviceManager) -> Option<usize> {
        self.wants_gamepad = true;
        if self.gamepad.is_none() {
            self.gamepad = manager
                .request_gamepad(Some(self.player_id))
                .map(|gamepad| gamepad.index());
            if let Some(index) = self.gamepad {
                info!("Player {} took gamepad {}", self.player_id, index);
            }
        }
        self.gamepad
    }

    /// Claim a specific slot, returning any gamepad held before
    pub fn assign_gamepad(
        &mut self,
        index: usize,
        manager: &mut GamepadDeviceManager,
    ) -> Result<(), InputError> {
        if self.gamepad == Some(index) {
            return Ok(());
        }
        if manager.gamepad(index).is_none() {
            return Err(InputError::UnknownGamepad(index));
        }
        if !manager.claim_gamepad(index) {
            return Err(InputError::GamepadUnavailable(index));
        }
        self.release_gamepad(manager);
        self.gamepad = Some(index);
        self.wants_gamepad = true;
        info!("Player {} assigned gamepad {}", self.player_id, index);
        Ok(())
    }

    /// Whether the player is waiting for a gamepad
    pub fn wants_gamepad(&self) -> bool {
        self.wants_gamepad && self.gamepad.is_none()
    }

    /// Take over a slot already claimed on the player's behalf
    ///
    /// Fails if the player holds a gamepad or the slot is not claimed.
    pub fn adopt_gamepad(&mut self, index: usize, manager: &GamepadDeviceManager) -> bool {
        if self.gamepad.is_some() || !manager.gamepad(index).is_some_and(|g| g.is_claimed()) {
            return false;
        }
        self.gamepad = Some(index);
        self.wants_gamepad = true;
        info!("Player {} joined with gamepad {}", self.player_id, index);
        true
    }

    /// Give the claimed gamepad back and stop asking for one
    pub fn release_gamepad(&mut self, manager: &mut GamepadDeviceManager) -> bool {
        self.wants_gamepad = false;
        match self.gamepad.take() {
            Some(index) => {
                debug!("Player {} released gamepad {}", self.player_id, index);
                manager.return_gamepad(index)
            }
            None => false,
        }
    }

    /// Add an action; returns false if one with the same name exists
    pub fn add_action(&mut self, action: InputAction) -> bool {
        if self.action(action.name()).is_some() {
            return false;
        }
        self.actions.push(action);
        true
    }

    pub fn remove_action(&mut self, name: &str) -> Option<InputAction> {
        let position = self.actions.iter().position(|action| action.name() == name)?;
        Some(self.actions.remove(position))
    }

    pub fn action(&self, name: &str) -> Option<&InputAction> {
        self.actions.iter().find(|action| action.name() == name)
    }

    pub fn action_mut(&mut self, name: &str) -> Option<&mut InputAction> {
        self.actions.iter_mut().find(|action| action.name() == name)
    }

    pub fn actions(&self) -> &[InputAction] {
        &self.actions
    }

    /// Check if an action is currently held
    pub fn is_down(&self, name: &str) -> bool {
        self.action(name).is_some_and(|action| action.is_down())
    }

    /// Check if an action was just pressed this frame
    pub fn just_pressed(&self, name: &str) -> bool {
        self.action(name).is_some_and(|action| action.just_pressed())
    }

    /// Check if an action was just released this frame
    pub fn just_released(&self, name: &str) -> bool {
        self.action(name).is_some_and(|action| action.just_released())
    }

    /// Smoothed axis of an action, 0 for unknown actions
    pub fn axis(&self, name: &str) -> f32 {
        self.action(name).map_or(0.0, |action| action.axis())
    }

    /// Take an action's state for this frame
    pub fn consume(&mut self, name: &str) -> Option<InputState> {
        self.action_mut(name)?.consume()
    }

    /// Drop a gamepad that is no longer ours, re-request if wanted, then update every action
    pub fn update(
        &mut self,
        backend: &dyn InputBackend,
        manager: &mut GamepadDeviceManager,
        dt: f32,
    ) {
        if let Some(index) = self.gamepad {
            let still_claimed = manager.gamepad(index).is_some_and(|g| g.is_claimed());
            if !still_claimed {
                info!("Player {} lost gamepad {}", self.player_id, index);
                self.gamepad = None;
            }
        }
        if self.wants_gamepad && self.gamepad.is_none() {
            self.request_gamepad(manager);
        }

        let gamepad = self.gamepad.and_then(|index| manager.gamepad(index));
        let ctx = InputContext::with_gamepad(backend, gamepad);
        for action in &mut self.actions {
            action.update(&ctx, dt);
        }
    }

    /// Advance every action as if nothing were held
    pub fn update_idle(&mut self, dt: f32) {
        for action in &mut self.actions {
            action.release(dt);
        }
    }

    /// Reset all input state
    pub fn reset(&mut self) {
        for action in &mut self.actions {
            action.clear();
        }
    }
}
