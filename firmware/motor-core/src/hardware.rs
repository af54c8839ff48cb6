//! Hardware seams implemented by the platform crate.

use crate::direction::{Direction, Drive};

/// One H-bridge channel: two direction lines and a PWM enable line.
pub trait MotorOutput {
    type Error: core::fmt::Debug;

    /// Drive the direction lines to the pattern for `direction`.
    fn set_direction(&mut self, direction: Direction) -> Result<(), Self::Error>;

    /// Set PWM magnitude on the enable line (0..=1023).
    fn set_magnitude(&mut self, magnitude: u16) -> Result<(), Self::Error>;

    /// Apply direction first, then magnitude.
    fn apply(&mut self, drive: Drive) -> Result<(), Self::Error> {
        log::debug!(
            "drive: direction {}, duty {}",
            drive.direction.as_str(),
            drive.magnitude
        );
        self.set_direction(drive.direction)?;
        self.set_magnitude(drive.magnitude)
    }
}

/// Scheduler tick frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickRate {
    pub hz: u32,
}

impl TickRate {
    pub const fn new(hz: u32) -> Self {
        Self { hz }
    }

    /// Milliseconds to ticks, rounding down.
    pub fn ms_to_ticks(&self, ms: u16) -> u32 {
        (u64::from(ms) * u64::from(self.hz) / 1000) as u32
    }

    /// Ticks a phase of `ms` holds for; never less than one.
    pub fn phase_ticks(&self, ms: u16) -> u32 {
        self.ms_to_ticks(ms).max(1)
    }
}

/// Blocking wait that yields to other tasks.
pub trait TickDelay {
    fn tick_rate(&self) -> TickRate;

    fn delay_ticks(&mut self, ticks: u32);
}
