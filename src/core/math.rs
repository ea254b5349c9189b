// Scalar helpers shared by the input engine

/// Clamp a value into the unit axis range [-1, 1]
pub fn clamp_axis(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-1.0, 1.0)
    }
}

/// Clamp a value into [0, 1]
pub fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Move `current` toward `target` by at most `max_delta`, never overshooting
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    let diff = target - current;
    if diff.abs() <= max_delta {
        target
    } else {
        current + diff.signum() * max_delta
    }
}

/// Zero out values whose magnitude does not exceed the deadzone
///
/// Values above the deadzone pass through unscaled.
pub fn apply_deadzone(value: f32, deadzone: f32) -> f32 {
    if value.abs() > deadzone {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_axis() {
        assert_eq!(clamp_axis(0.5), 0.5);
        assert_eq!(clamp_axis(-5.0), -1.0);
        assert_eq!(clamp_axis(15.0), 1.0);
        assert_eq!(clamp_axis(f32::NAN), 0.0);
    }

    #[test]
    fn test_clamp_unit() {
        assert_eq!(clamp_unit(-0.1), 0.0);
        assert_eq!(clamp_unit(1.1), 1.0);
        assert_eq!(clamp_unit(0.3), 0.3);
    }

    #[test]
    fn test_move_towards() {
        assert_eq!(move_towards(0.0, 1.0, 0.25), 0.25);
        assert_eq!(move_towards(0.9, 1.0, 0.25), 1.0);
        assert_eq!(move_towards(0.1, 0.0, 0.5), 0.0);
        assert_eq!(move_towards(-0.5, 0.0, 0.25), -0.25);
    }

    #[test]
    fn test_apply_deadzone() {
        assert_eq!(apply_deadzone(0.15, 0.2), 0.0);
        assert_eq!(apply_deadzone(0.2, 0.2), 0.0);
        assert_eq!(apply_deadzone(0.25, 0.2), 0.25);
        assert_eq!(apply_deadzone(-0.25, 0.2), -0.25);
    }
}
