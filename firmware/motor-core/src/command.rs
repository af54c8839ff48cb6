//! Single-byte commands received over the serial link.

use crate::error::CommandError;

/// Duty that holds the mouth fully open.
pub const MOUTH_OPEN_DUTY: i16 = 1023;
/// Duty with the mouth released to its spring.
pub const MOUTH_CLOSED_DUTY: i16 = 0;

/// Lowest duty that still moves the mouth; position 0 maps here.
const MOUTH_POSITION_BASE: i16 = 388;
const MOUTH_POSITION_STEP: i16 = 5;
/// Largest encodable mouth position.
pub const MOUTH_POSITION_MAX: u8 = 127;

/// Flag bit marking a mouth-position byte; the low seven bits carry the position.
const POSITION_FLAG: u8 = 0x80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    OpenMouth,
    CloseMouth,
    /// Partial opening, 0 (barely open) to 127 (fully open).
    MouthPosition(u8),
    WiggleHead,
    WiggleTail,
    StopWiggle,
}

/// Body motor motion; plain on/off, no boost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyMotion {
    Head,
    Tail,
    Stop,
}

/// Where a command ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Target duty for the mouth actuator.
    Mouth(i16),
    Body(BodyMotion),
}

impl Command {
    pub fn from_byte(byte: u8) -> Result<Self, CommandError> {
        match byte {
            b'o' => Ok(Command::OpenMouth),
            b'c' => Ok(Command::CloseMouth),
            b'h' => Ok(Command::WiggleHead),
            b't' => Ok(Command::WiggleTail),
            b's' => Ok(Command::StopWiggle),
            b if b & POSITION_FLAG != 0 => Ok(Command::MouthPosition(b & !POSITION_FLAG)),
            other => Err(CommandError::UnknownToken(other)),
        }
    }

    pub fn route(self) -> Route {
        match self {
            Command::OpenMouth => Route::Mouth(MOUTH_OPEN_DUTY),
            Command::CloseMouth => Route::Mouth(MOUTH_CLOSED_DUTY),
            Command::MouthPosition(pos) => Route::Mouth(mouth_position_duty(pos)),
            Command::WiggleHead => Route::Body(BodyMotion::Head),
            Command::WiggleTail => Route::Body(BodyMotion::Tail),
            Command::StopWiggle => Route::Body(BodyMotion::Stop),
        }
    }
}

/// Map a mouth position (0..=127) onto duty 388..=1023. Larger positions
/// saturate at 127.
pub fn mouth_position_duty(pos: u8) -> i16 {
    let pos = pos.min(MOUTH_POSITION_MAX) as i16;
    MOUTH_POSITION_BASE + pos * MOUTH_POSITION_STEP
}
