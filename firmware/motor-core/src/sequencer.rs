//! Charge/boost/settle transitions.
//!
//! Raising mechanical force from rest needs power removed briefly, then a
//! full-scale kick to break static friction, before settling at the requested
//! level. Lowering it needs a short full-scale reversal against coasting. Both
//! are the same three-phase shape with different parameters.
//!
//! Each phase drives the hardware (or not, for a zero charge or boost
//! duration) and then holds for at least one scheduler tick, so every
//! transition has exactly three waits.
//!
//! Two ways to run a plan:
//! - [`BoostSequencer::apply_transition`] blocks the calling task for the
//!   whole transition.
//! - [`Transition`] is advanced by an external tick source, for event loops
//!   that drive several actuators from one task.

use log::info;

use crate::actuator::ActuatorContext;
use crate::direction::{assert_duty, Drive};
use crate::hardware::{MotorOutput, TickDelay, TickRate};
use crate::params::{BoostTables, Selection};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Charge,
    Boost,
    Settle,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Charge => "charge",
            Phase::Boost => "boost",
            Phase::Settle => "settle",
        }
    }
}

/// What one phase does: an optional drive, then a hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseStep {
    pub phase: Phase,
    /// `None` keeps whatever the previous phase left on the hardware.
    pub drive: Option<Drive>,
    pub hold_ticks: u32,
}

/// The three steps of a transition, computed without touching hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionPlan {
    pub selection: Selection,
    pub target: i16,
    steps: [PhaseStep; 3],
}

impl TransitionPlan {
    pub fn new(selection: Selection, target: i16, rate: TickRate) -> Self {
        let params = &selection.params;
        let charge = PhaseStep {
            phase: Phase::Charge,
            drive: (params.charge_duration > 0).then(|| Drive::decompose(0)),
            hold_ticks: rate.phase_ticks(params.charge_duration),
        };
        let boost = PhaseStep {
            phase: Phase::Boost,
            drive: (params.boost_duration > 0).then(|| Drive::decompose(params.boost_value)),
            hold_ticks: rate.phase_ticks(params.boost_duration),
        };
        let settle = PhaseStep {
            phase: Phase::Settle,
            drive: Some(Drive::decompose(target)),
            hold_ticks: rate.phase_ticks(params.settle_duration),
        };
        Self {
            selection,
            target,
            steps: [charge, boost, settle],
        }
    }

    pub fn steps(&self) -> &[PhaseStep; 3] {
        &self.steps
    }

    pub fn total_ticks(&self) -> u32 {
        self.steps.iter().map(|s| s.hold_ticks).sum()
    }

    fn log(&self) {
        let p = &self.selection.params;
        info!(
            "boost: {}[{}] charge {} ms, boost {} ms at {}, target {}, settle {} ms, total {} ticks",
            self.selection.kind.as_str(),
            self.selection.index,
            p.charge_duration,
            p.boost_duration,
            p.boost_value,
            self.target,
            p.settle_duration,
            self.total_ticks()
        );
    }
}

/// Runs blocking transitions against shared boost tables.
pub struct BoostSequencer<'t, D> {
    tables: &'t BoostTables,
    delay: D,
}

impl<'t, D: TickDelay> BoostSequencer<'t, D> {
    pub fn new(tables: &'t BoostTables, delay: D) -> Self {
        Self { tables, delay }
    }

    pub fn tables(&self) -> &'t BoostTables {
        self.tables
    }

    pub fn tick_rate(&self) -> TickRate {
        self.delay.tick_rate()
    }

    /// Plan a move from `previous` to `target` without running it.
    pub fn plan(&self, previous: i16, target: i16) -> TransitionPlan {
        let selection = self.tables.select(previous, target);
        TransitionPlan::new(selection, target, self.delay.tick_rate())
    }

    /// Drive `ctx` to `target` through all three phases, blocking until done.
    ///
    /// Panics if `target` is outside `[-1023, 1023]`. Hardware errors abort
    /// the transition and leave the stored duty unchanged.
    pub fn apply_transition<M: MotorOutput>(
        &mut self,
        ctx: &mut ActuatorContext<M>,
        target: i16,
    ) -> Result<TransitionPlan, M::Error> {
        assert_duty(target);
        let plan = self.plan(ctx.duty(), target);
        plan.log();

        for step in plan.steps() {
            if let Some(drive) = step.drive {
                ctx.output_mut().apply(drive)?;
            }
            self.delay.delay_ticks(step.hold_ticks);
        }

        ctx.commit(target);
        Ok(plan)
    }
}

/// Progress reported by [`Transition::poll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionState {
    /// `phase` is holding until tick `deadline`.
    Holding { phase: Phase, deadline: u32 },
    Complete,
    /// A hardware write failed; the stored duty was left unchanged.
    Aborted,
}

/// A transition advanced by an external tick source.
///
/// Carries the phase index and the current phase deadline. Hardware effects
/// and timing match [`BoostSequencer::apply_transition`], including a
/// hardware error ending the transition for good.
#[derive(Debug, Clone)]
pub struct Transition {
    plan: TransitionPlan,
    next: usize,
    deadline: Option<u32>,
    complete: bool,
    aborted: bool,
}

impl Transition {
    /// Plan a transition from the context's current duty.
    ///
    /// Panics if `target` is outside `[-1023, 1023]`.
    pub fn begin<M>(
        ctx: &ActuatorContext<M>,
        tables: &BoostTables,
        rate: TickRate,
        target: i16,
    ) -> Self {
        assert_duty(target);
        let selection = tables.select(ctx.duty(), target);
        let plan = TransitionPlan::new(selection, target, rate);
        plan.log();
        Self {
            plan,
            next: 0,
            deadline: None,
            complete: false,
            aborted: false,
        }
    }

    pub fn plan(&self) -> &TransitionPlan {
        &self.plan
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    /// Advance to tick `now`.
    ///
    /// Starts the next phase once the current one has elapsed, and commits the
    /// target duty to `ctx` after the settle hold. A failed hardware write is
    /// returned once; every later poll reports [`TransitionState::Aborted`]
    /// without touching `ctx`.
    pub fn poll<M: MotorOutput>(
        &mut self,
        ctx: &mut ActuatorContext<M>,
        now: u32,
    ) -> Result<TransitionState, M::Error> {
        if self.aborted {
            return Ok(TransitionState::Aborted);
        }
        if self.complete {
            return Ok(TransitionState::Complete);
        }
        if let Some(deadline) = self.deadline {
            if !tick_reached(now, deadline) {
                return Ok(TransitionState::Holding {
                    phase: self.plan.steps[self.next - 1].phase,
                    deadline,
                });
            }
        }
        let Some(step) = self.plan.steps.get(self.next).copied() else {
            ctx.commit(self.plan.target);
            self.complete = true;
            return Ok(TransitionState::Complete);
        };

        if let Some(drive) = step.drive {
            if let Err(e) = ctx.output_mut().apply(drive) {
                self.aborted = true;
                return Err(e);
            }
        }
        let deadline = now.wrapping_add(step.hold_ticks);
        self.deadline = Some(deadline);
        self.next += 1;
        Ok(TransitionState::Holding {
            phase: step.phase,
            deadline,
        })
    }
}

fn tick_reached(now: u32, deadline: u32) -> bool {
    (now.wrapping_sub(deadline) as i32) >= 0
}
