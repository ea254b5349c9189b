// Named actions: bindings, hold and multi-tap bookkeeping, per-frame folding

use super::backend::InputContext;
use super::binding::Binding;
use super::config::InputSettings;
use super::state::{AxisSmoothing, InputState, PressedType};
use crate::core::math::clamp_unit;
use log::debug;

/// A logical input fed by any number of bindings
///
/// Bindings are OR-combined every frame, then folded against the previous
/// frame's state. Hold and multi-tap progress are produced here so the folded
/// state carries the matching transitions.
#[derive(Debug, Clone)]
pub struct InputAction {
    name: String,
    bindings: Vec<Binding>,
    smoothing: AxisSmoothing,
    hold_duration: f32,
    multi_tap_target: u32,
    multi_tap_window: f32,
    hold_timer: f32,
    /// Hold already completed for the current press
    hold_done: bool,
    tap_count: u32,
    since_last_tap: f32,
    state: InputState,
    enabled: bool,
}

impl InputAction {
    /// Create an action with default settings
    pub fn new(name: &str) -> Self {
        Self::from_settings(name, &InputSettings::default())
    }

    /// Create an action using the smoothing and timing of `settings`
    pub fn from_settings(name: &str, settings: &InputSettings) -> Self {
        Self {
            name: name.to_string(),
            bindings: Vec::new(),
            smoothing: settings.smoothing(),
            hold_duration: settings.hold_duration(),
            multi_tap_target: settings.multi_tap_target(),
            multi_tap_window: settings.multi_tap_window(),
            hold_timer: 0.0,
            hold_done: false,
            tap_count: 0,
            since_last_tap: 0.0,
            state: InputState::neutral(),
            enabled: true,
        }
    }

    /// Builder form of [`add_binding`](Self::add_binding)
    pub fn with_binding(mut self, binding: Binding) -> Self {
        self.add_binding(binding);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Add a binding; returns false if an equal binding is already present
    pub fn add_binding(&mut self, binding: Binding) -> bool {
        if self.bindings.contains(&binding) {
            debug!("Action '{}' already has binding {}", self.name, binding.name(false));
            return false;
        }
        self.bindings.push(binding);
        true
    }

    pub fn remove_binding(&mut self, binding: &Binding) -> bool {
        let before = self.bindings.len();
        self.bindings.retain(|existing| existing != binding);
        self.bindings.len() != before
    }

    pub fn clear_bindings(&mut self) {
        self.bindings.clear();
    }

    pub fn smoothing(&self) -> AxisSmoothing {
        self.smoothing
    }

    pub fn set_smoothing(&mut self, smoothing: AxisSmoothing) {
        self.smoothing = smoothing;
    }

    pub fn hold_duration(&self) -> f32 {
        self.hold_duration
    }

    /// Seconds a press must last to complete a hold; 0 disables hold tracking
    pub fn set_hold_duration(&mut self, seconds: f32) {
        self.hold_duration = seconds.max(0.0);
    }

    /// Taps and maximum gap between taps; a target below 2 disables multi-tap tracking
    pub fn set_multi_tap(&mut self, target: u32, window: f32) {
        self.multi_tap_target = target;
        self.multi_tap_window = window.max(0.0);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Disabled actions read as released until re-enabled
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Sample every binding and advance one frame
    pub fn update(&mut self, ctx: &InputContext, dt: f32) {
        let raw = if self.enabled {
            self.bindings
                .iter()
                .fold(InputState::neutral(), |acc, binding| {
                    InputState::accumulate(&acc, &binding.state(ctx))
                })
        } else {
            InputState::neutral()
        };
        self.advance(raw, dt);
    }

    /// Advance one frame with every binding idle
    pub fn release(&mut self, dt: f32) {
        let raw = InputState::neutral_from(self.state.device_type, self.state.gamepad);
        self.advance(raw, dt);
    }

    fn advance(&mut self, raw: InputState, dt: f32) {
        let dt = dt.max(0.0);
        let pressed_now = raw.down && !self.state.down;
        let hold = self.hold_progress(raw.down, dt);
        let taps = self.multi_tap_progress(pressed_now, dt);
        let raw = raw.with_progress(hold, taps);
        self.state = InputState::fold(&self.state, &raw, self.smoothing, dt);
    }

    fn hold_progress(&mut self, down: bool, dt: f32) -> f32 {
        if !down || self.hold_duration <= 0.0 {
            self.hold_timer = 0.0;
            self.hold_done = false;
            return 0.0;
        }
        if self.hold_done {
            return 0.0;
        }
        let first_frame = self.hold_timer <= 0.0;
        self.hold_timer += dt;
        let mut progress = clamp_unit(self.hold_timer / self.hold_duration);
        // Completion needs a mid-flight frame before it
        if first_frame {
            progress = progress.min(1.0 - f32::EPSILON);
        }
        if progress >= 1.0 {
            self.hold_done = true;
        }
        progress
    }

    fn multi_tap_progress(&mut self, pressed_now: bool, dt: f32) -> f32 {
        if self.multi_tap_target < 2 {
            self.tap_count = 0;
            return 0.0;
        }
        if self.tap_count > 0 {
            self.since_last_tap += dt;
            if self.since_last_tap > self.multi_tap_window {
                self.tap_count = 0;
            }
        }
        if pressed_now {
            self.tap_count += 1;
            self.since_last_tap = 0.0;
        }
        let progress = self.tap_count as f32 / self.multi_tap_target as f32;
        if self.tap_count >= self.multi_tap_target {
            self.tap_count = 0;
        }
        clamp_unit(progress)
    }

    /// State folded during the last update
    pub fn state(&self) -> &InputState {
        &self.state
    }

    pub fn is_down(&self) -> bool {
        self.state.is_active()
    }

    pub fn just_pressed(&self) -> bool {
        self.state.pressed && !self.state.consumed
    }

    pub fn just_released(&self) -> bool {
        self.state.released && !self.state.consumed
    }

    pub fn axis(&self) -> f32 {
        self.state.axis
    }

    pub fn axis_raw(&self) -> f32 {
        self.state.axis_raw
    }

    pub fn pressed_type(&self) -> PressedType {
        self.state.pressed_type()
    }

    /// Take this frame's state; `None` once it was already consumed
    pub fn consume(&mut self) -> Option<InputState> {
        if self.state.consumed {
            return None;
        }
        let state = self.state;
        self.state = self.state.consume();
        Some(state)
    }

    /// Drop all per-press bookkeeping and return to neutral
    pub fn clear(&mut self) {
        self.state = InputState::neutral();
        self.hold_timer = 0.0;
        self.hold_done = false;
        self.tap_count = 0;
        self.since_last_tap = 0.0;
    }

    /// Binding names joined for display, e.g. `"KeyA, A"`
    pub fn describe(&self, shorthand: bool) -> String {
        self.bindings
            .iter()
            .map(|binding| binding.name(shorthand))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
