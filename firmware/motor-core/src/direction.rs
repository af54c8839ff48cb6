use crate::error::DutyOutOfRange;
use crate::DUTY_MAX;

/// H-bridge drive direction.
///
/// Only two states are reachable from a signed duty; zero drives forward at
/// zero magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Reverse,
}

impl Direction {
    /// Levels of direction lines A and B. Never both high.
    pub fn levels(self) -> (bool, bool) {
        match self {
            Direction::Forward => (true, false),
            Direction::Reverse => (false, true),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Reverse => "reverse",
        }
    }
}

/// Direction plus unsigned PWM magnitude, ready for the hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Drive {
    pub direction: Direction,
    pub magnitude: u16,
}

impl Drive {
    /// Split a signed duty into direction and magnitude.
    ///
    /// Non-negative values (including zero) map to [`Direction::Forward`].
    pub fn decompose(duty: i16) -> Self {
        let direction = if duty >= 0 {
            Direction::Forward
        } else {
            Direction::Reverse
        };
        Self {
            direction,
            magnitude: duty.unsigned_abs(),
        }
    }
}

/// Signed duty checked against `[-DUTY_MAX, DUTY_MAX]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Duty(i16);

impl Duty {
    pub const ZERO: Duty = Duty(0);
    pub const MAX: Duty = Duty(DUTY_MAX);

    pub fn new(value: i32) -> Result<Self, DutyOutOfRange> {
        if (-(DUTY_MAX as i32)..=DUTY_MAX as i32).contains(&value) {
            Ok(Duty(value as i16))
        } else {
            Err(DutyOutOfRange(value))
        }
    }

    pub fn get(self) -> i16 {
        self.0
    }
}

impl From<Duty> for i16 {
    fn from(duty: Duty) -> Self {
        duty.0
    }
}

/// Panics if `duty` is outside the representable range.
pub(crate) fn assert_duty(duty: i16) {
    assert!(
        (-DUTY_MAX..=DUTY_MAX).contains(&duty),
        "duty {} is outside [-{}, {}]",
        duty,
        DUTY_MAX,
        DUTY_MAX
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_duty_is_forward() {
        let drive = Drive::decompose(500);
        assert_eq!(drive.direction, Direction::Forward);
        assert_eq!(drive.magnitude, 500);
    }

    #[test]
    fn test_zero_duty_is_forward() {
        let drive = Drive::decompose(0);
        assert_eq!(drive.direction, Direction::Forward);
        assert_eq!(drive.magnitude, 0);
    }

    #[test]
    fn test_negative_full_scale_is_reverse() {
        let drive = Drive::decompose(-1023);
        assert_eq!(drive.direction, Direction::Reverse);
        assert_eq!(drive.magnitude, 1023);
    }

    #[test]
    fn test_lines_are_mutually_exclusive() {
        assert_eq!(Direction::Forward.levels(), (true, false));
        assert_eq!(Direction::Reverse.levels(), (false, true));
        for duty in -DUTY_MAX..=DUTY_MAX {
            let (a, b) = Drive::decompose(duty).direction.levels();
            assert!(a != b, "duty {} drives both lines alike", duty);
        }
    }

    #[test]
    fn test_duty_new_bounds() {
        assert_eq!(Duty::new(1023).map(Duty::get), Ok(1023));
        assert_eq!(Duty::new(-1023).map(Duty::get), Ok(-1023));
        assert_eq!(Duty::new(1024), Err(DutyOutOfRange(1024)));
        assert_eq!(Duty::new(-1024), Err(DutyOutOfRange(-1024)));
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn test_assert_duty_rejects_overflow() {
        assert_duty(1024);
    }
}
