//! Single-writer access to an actuator owned by one task.
//!
//! Any number of [`ActuatorMailbox`] handles may queue duty requests; the task
//! holding the [`ActuatorInbox`] applies them one full transition at a time,
//! in the order they were queued.

use std::sync::mpsc::{sync_channel, Receiver, SyncSender, TrySendError};

use log::{debug, info};

use crate::actuator::MotorDriver;
use crate::direction::Duty;
use crate::error::MailboxError;
use crate::hardware::{MotorOutput, TickDelay};

/// Create a bounded mailbox for one actuator.
pub fn mailbox(name: &'static str, capacity: usize) -> (ActuatorMailbox, ActuatorInbox) {
    let (tx, rx) = sync_channel(capacity);
    (ActuatorMailbox { name, tx }, ActuatorInbox { name, rx })
}

/// Sending side; cheap to clone.
#[derive(Debug, Clone)]
pub struct ActuatorMailbox {
    name: &'static str,
    tx: SyncSender<Duty>,
}

impl ActuatorMailbox {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Queue a duty request, blocking while the mailbox is full.
    pub fn set_duty(&self, target: i32) -> Result<(), MailboxError> {
        let duty = Duty::new(target)?;
        self.tx.send(duty).map_err(|_| MailboxError::Closed)
    }

    /// Queue a duty request without blocking. Returns `Ok(false)` when full.
    pub fn try_set_duty(&self, target: i32) -> Result<bool, MailboxError> {
        let duty = Duty::new(target)?;
        match self.tx.try_send(duty) {
            Ok(()) => Ok(true),
            Err(TrySendError::Full(_)) => Ok(false),
            Err(TrySendError::Disconnected(_)) => Err(MailboxError::Closed),
        }
    }
}

/// Receiving side, held by the task that owns the actuator.
#[derive(Debug)]
pub struct ActuatorInbox {
    name: &'static str,
    rx: Receiver<Duty>,
}

impl ActuatorInbox {
    /// Apply queued requests until every mailbox handle is dropped.
    ///
    /// Returns the number of transitions run, or the first hardware error.
    pub fn serve<M, D>(self, driver: &mut MotorDriver<'_, M, D>) -> Result<usize, M::Error>
    where
        M: MotorOutput,
        D: TickDelay,
    {
        info!("{}: serving duty requests", self.name);
        let mut served = 0;
        for duty in self.rx.iter() {
            debug!("{}: {} -> {}", self.name, driver.duty(), duty.get());
            driver.set_duty(duty.get())?;
            served += 1;
        }
        info!("{}: all mailboxes closed after {} transitions", self.name, served);
        Ok(served)
    }
}
