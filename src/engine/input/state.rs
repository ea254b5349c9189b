// Per-frame input state: edge detection, axis smoothing, hold and multi-tap transitions

use crate::core::math::{clamp_axis, clamp_unit, move_towards};

/// Kind of physical device that produced a state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InputDeviceType {
    #[default]
    None,
    Keyboard,
    Mouse,
    Gamepad,
}

/// Progress of a hold or multi-tap attempt, classified per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProgressState {
    #[default]
    None,
    InProgress,
    Completed,
    Failed,
}

impl ProgressState {
    /// Classify the transition between two progress samples
    ///
    /// Only an attempt that was mid-flight in the previous frame
    /// (progress strictly between 0 and 1) can complete, fail or continue.
    pub fn from_progress(prev: f32, cur: f32) -> Self {
        if prev > 0.0 && prev < 1.0 {
            if cur >= 1.0 {
                Self::Completed
            } else if cur <= 0.0 {
                Self::Failed
            } else {
                Self::InProgress
            }
        } else {
            Self::None
        }
    }

    fn rank(self) -> u8 {
        match self {
            Self::None => 0,
            Self::InProgress => 1,
            Self::Failed => 2,
            Self::Completed => 3,
        }
    }
}

/// How a press resolved once hold and multi-tap tracking are taken into account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PressedType {
    #[default]
    None,
    SingleTap,
    MultiTap,
    Hold,
}

/// Rates used to smooth `axis` toward `axis_raw`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisSmoothing {
    /// Approach speed toward +-1 while the raw axis is non-zero (units per second)
    pub sensitivity: f32,
    /// Relaxation speed toward 0 while the raw axis is zero (units per second)
    pub gravity: f32,
}

impl AxisSmoothing {
    pub fn new(sensitivity: f32, gravity: f32) -> Self {
        Self {
            sensitivity: sensitivity.max(0.0),
            gravity: gravity.max(0.0),
        }
    }

    /// Smoothing that snaps `axis` straight to `axis_raw`
    pub fn instant() -> Self {
        Self::new(f32::INFINITY, f32::INFINITY)
    }
}

impl Default for AxisSmoothing {
    fn default() -> Self {
        Self::new(4.0, 6.0)
    }
}

/// Snapshot of one logical input for a single frame
///
/// Values are immutable once produced; every transform returns a new state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputState {
    pub down: bool,
    pub up: bool,
    pub pressed: bool,
    pub released: bool,
    pub axis: f32,
    pub axis_raw: f32,
    pub gamepad: Option<usize>,
    pub device_type: InputDeviceType,
    pub consumed: bool,
    pub hold_progress: f32,
    pub multi_tap_progress: f32,
    pub hold_state: ProgressState,
    pub multi_tap_state: ProgressState,
}

impl Default for InputState {
    fn default() -> Self {
        Self::neutral()
    }
}

impl InputState {
    /// Fully neutral state: up, no axis, no device
    pub fn neutral() -> Self {
        Self {
            down: false,
            up: true,
            pressed: false,
            released: false,
            axis: 0.0,
            axis_raw: 0.0,
            gamepad: None,
            device_type: InputDeviceType::None,
            consumed: false,
            hold_progress: 0.0,
            multi_tap_progress: 0.0,
            hold_state: ProgressState::None,
            multi_tap_state: ProgressState::None,
        }
    }

    /// Neutral state attributed to a device
    pub fn neutral_from(device_type: InputDeviceType, gamepad: Option<usize>) -> Self {
        Self {
            device_type,
            gamepad,
            ..Self::neutral()
        }
    }

    /// Raw digital sample
    pub fn from_button(down: bool, device_type: InputDeviceType, gamepad: Option<usize>) -> Self {
        let axis = if down { 1.0 } else { 0.0 };
        Self {
            down,
            up: !down,
            axis,
            axis_raw: axis,
            device_type,
            gamepad,
            ..Self::neutral()
        }
    }

    /// Raw analog sample; any non-zero value counts as down
    pub fn from_axis(value: f32, device_type: InputDeviceType, gamepad: Option<usize>) -> Self {
        let value = clamp_axis(value);
        let down = value != 0.0;
        Self {
            down,
            up: !down,
            axis: value,
            axis_raw: value,
            device_type,
            gamepad,
            ..Self::neutral()
        }
    }

    /// Attach upstream hold and multi-tap progress to a raw sample
    pub fn with_progress(self, hold_progress: f32, multi_tap_progress: f32) -> Self {
        Self {
            hold_progress: clamp_unit(hold_progress),
            multi_tap_progress: clamp_unit(multi_tap_progress),
            ..self
        }
    }

    /// Fold the previous frame's state with a fresh raw sample
    pub fn fold(prev: &InputState, cur: &InputState, smoothing: AxisSmoothing, dt: f32) -> Self {
        Self {
            down: cur.down,
            up: cur.up,
            pressed: prev.up && cur.down,
            released: prev.down && cur.up,
            axis: smooth_axis(prev.axis, cur.axis_raw, smoothing, dt),
            axis_raw: cur.axis_raw,
            gamepad: cur.gamepad,
            device_type: cur.device_type,
            consumed: false,
            hold_progress: cur.hold_progress,
            multi_tap_progress: cur.multi_tap_progress,
            hold_state: ProgressState::from_progress(prev.hold_progress, cur.hold_progress),
            multi_tap_state: ProgressState::from_progress(
                prev.multi_tap_progress,
                cur.multi_tap_progress,
            ),
        }
    }

    /// OR-combine two states feeding the same logical action
    ///
    /// Order matters: on equal axis magnitude the left operand wins.
    pub fn accumulate(a: &InputState, b: &InputState) -> Self {
        let down = a.down || b.down;
        let axis_raw = if b.axis_raw.abs() > a.axis_raw.abs() {
            b.axis_raw
        } else {
            a.axis_raw
        };
        let axis = if b.axis.abs() > a.axis.abs() {
            b.axis
        } else {
            a.axis
        };

        let b_drives = b.down && (!a.down || b.axis_raw.abs() > a.axis_raw.abs());
        let (device_type, gamepad) = if b_drives {
            (b.device_type, b.gamepad)
        } else {
            (a.device_type, a.gamepad)
        };

        Self {
            down,
            up: !down,
            pressed: a.pressed || b.pressed,
            released: a.released || b.released,
            axis,
            axis_raw,
            gamepad,
            device_type,
            consumed: a.consumed && b.consumed,
            hold_progress: a.hold_progress.max(b.hold_progress),
            multi_tap_progress: a.multi_tap_progress.max(b.multi_tap_progress),
            hold_state: max_progress_state(a.hold_state, b.hold_state),
            multi_tap_state: max_progress_state(a.multi_tap_state, b.multi_tap_state),
        }
    }

    /// Copy of this state marked as handled
    pub fn consume(&self) -> Self {
        Self {
            consumed: true,
            ..*self
        }
    }

    /// Copy of this state with a replaced axis value
    pub fn adjust_axis(&self, value: f32) -> Self {
        let value = clamp_axis(value);
        let down = value != 0.0;
        Self {
            down,
            up: !down,
            axis: value,
            ..*self
        }
    }

    /// How the current press resolved
    pub fn pressed_type(&self) -> PressedType {
        if self.hold_state == ProgressState::Completed {
            PressedType::Hold
        } else if self.multi_tap_state == ProgressState::Completed {
            PressedType::MultiTap
        } else if self.hold_progress <= 0.0
            && self.multi_tap_progress <= 0.0
            && (self.hold_state == ProgressState::Failed
                || self.multi_tap_state == ProgressState::Failed)
        {
            PressedType::SingleTap
        } else {
            PressedType::None
        }
    }

    /// True when down and not already consumed
    pub fn is_active(&self) -> bool {
        self.down && !self.consumed
    }
}

fn smooth_axis(prev_axis: f32, axis_raw: f32, smoothing: AxisSmoothing, dt: f32) -> f32 {
    if dt <= 0.0 {
        return clamp_axis(prev_axis);
    }
    let next = if axis_raw != 0.0 {
        let rate = smoothing.sensitivity * dt;
        move_towards(prev_axis, axis_raw.signum(), rate)
    } else {
        let rate = smoothing.gravity * dt;
        move_towards(prev_axis, 0.0, rate)
    };
    clamp_axis(next)
}

fn max_progress_state(a: ProgressState, b: ProgressState) -> ProgressState {
    if b.rank() > a.rank() {
        b
    } else {
        a
    }
}
