#![cfg_attr(not(feature = "std"), no_std)]

//! Hysteresis-compensated duty control for the Billy mouth and body motors.
//!
//! A duty change is never applied in one step. The [`BoostSequencer`] picks a
//! [`BoostParams`] record from the [`BoostTables`] and drives the H-bridge
//! through three timed phases (charge, boost, settle) before the new duty is
//! recorded on the [`ActuatorContext`].

extern crate alloc;

pub mod actuator;
pub mod command;
pub mod direction;
pub mod error;
pub mod hardware;
#[cfg(feature = "std")]
pub mod mailbox;
pub mod params;
pub mod sequencer;

#[cfg(all(test, feature = "std"))]
pub(crate) mod mock;

pub use actuator::{ActuatorContext, MotorDriver, PinAssignment};
pub use command::{BodyMotion, Command, Route};
pub use direction::{Direction, Drive, Duty};
#[cfg(feature = "std")]
pub use error::MailboxError;
pub use error::{CommandError, ConfigError, DutyOutOfRange};
pub use hardware::{MotorOutput, TickDelay, TickRate};
#[cfg(feature = "std")]
pub use mailbox::{mailbox, ActuatorInbox, ActuatorMailbox};
pub use params::{BoostParams, BoostTables, Selection, TableKind};
pub use sequencer::{
    BoostSequencer, Phase, PhaseStep, Transition, TransitionPlan, TransitionState,
};

/// Largest PWM magnitude at 10-bit resolution.
pub const DUTY_MAX: i16 = 1023;

/// LEDC carrier frequency for the motor enable line.
pub const PWM_FREQUENCY_HZ: u32 = 32_000;

/// LEDC duty resolution; gives the 0..=1023 magnitude range.
pub const PWM_RESOLUTION_BITS: u32 = 10;
