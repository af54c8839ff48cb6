use log::info;

use crate::direction::{Direction, Drive};
use crate::hardware::{MotorOutput, TickDelay};
use crate::params::BoostTables;
use crate::sequencer::{BoostSequencer, TransitionPlan};

/// GPIO numbers and LEDC channel/timer backing one actuator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PinAssignment {
    pub enable: u8,
    pub dir_a: u8,
    pub dir_b: u8,
    pub channel: u8,
    pub timer: u8,
}

/// Hardware handle plus the last duty that was fully applied.
#[derive(Debug)]
pub struct ActuatorContext<M> {
    pins: PinAssignment,
    output: M,
    duty: i16,
}

impl<M> ActuatorContext<M> {
    pub fn pins(&self) -> &PinAssignment {
        &self.pins
    }

    /// Last duty committed by a completed transition.
    pub fn duty(&self) -> i16 {
        self.duty
    }

    pub fn output(&self) -> &M {
        &self.output
    }

    pub(crate) fn output_mut(&mut self) -> &mut M {
        &mut self.output
    }

    pub(crate) fn commit(&mut self, duty: i16) {
        self.duty = duty;
    }
}

impl<M: MotorOutput> ActuatorContext<M> {
    /// Take ownership of configured lines, drive forward at zero and record
    /// a duty of zero.
    pub fn init(pins: PinAssignment, mut output: M) -> Result<Self, M::Error> {
        info!(
            "motor init, enable: {}, dira: {}, dirb: {}, channel: {}, timer: {}",
            pins.enable, pins.dir_a, pins.dir_b, pins.channel, pins.timer
        );
        output.apply(Drive {
            direction: Direction::Forward,
            magnitude: 0,
        })?;
        Ok(Self {
            pins,
            output,
            duty: 0,
        })
    }
}

/// Single-owner driver for one actuator.
///
/// Every duty change goes through [`MotorDriver::set_duty`], which needs
/// `&mut self`; share it between tasks only through
/// [`ActuatorMailbox`](crate::mailbox::ActuatorMailbox) or a lock.
pub struct MotorDriver<'t, M, D> {
    ctx: ActuatorContext<M>,
    sequencer: BoostSequencer<'t, D>,
}

impl<'t, M: MotorOutput, D: TickDelay> MotorDriver<'t, M, D> {
    pub fn init(
        pins: PinAssignment,
        output: M,
        tables: &'t BoostTables,
        delay: D,
    ) -> Result<Self, M::Error> {
        Ok(Self {
            ctx: ActuatorContext::init(pins, output)?,
            sequencer: BoostSequencer::new(tables, delay),
        })
    }

    /// Move to `target` with a full boost transition. Blocks until done.
    ///
    /// Panics if `target` is outside `[-1023, 1023]`.
    pub fn set_duty(&mut self, target: i16) -> Result<TransitionPlan, M::Error> {
        self.sequencer.apply_transition(&mut self.ctx, target)
    }

    pub fn duty(&self) -> i16 {
        self.ctx.duty()
    }

    pub fn context(&self) -> &ActuatorContext<M> {
        &self.ctx
    }
}
