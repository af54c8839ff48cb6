//! Recording doubles for the hardware seams.

use std::sync::{Arc, Mutex};
use std::vec::Vec;

use crate::direction::Direction;
use crate::hardware::{MotorOutput, TickDelay, TickRate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Direction(Direction),
    Magnitude(u16),
    Hold(u32),
}

/// Ordered log shared by an output and a delay.
#[derive(Debug, Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<Event>>>);

impl EventLog {
    pub fn push(&self, event: Event) {
        self.0.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }

    pub fn holds(&self) -> Vec<u32> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Hold(t) => Some(t),
                _ => None,
            })
            .collect()
    }

    pub fn last_direction(&self) -> Option<Direction> {
        self.events().into_iter().rev().find_map(|e| match e {
            Event::Direction(d) => Some(d),
            _ => None,
        })
    }

    pub fn last_magnitude(&self) -> Option<u16> {
        self.events().into_iter().rev().find_map(|e| match e {
            Event::Magnitude(m) => Some(m),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockFault;

#[derive(Debug, Clone, Copy)]
enum FailMode {
    Never,
    /// Every write from this index on fails.
    From(usize),
    /// Only the write at this index fails.
    Once(usize),
}

#[derive(Debug)]
pub struct MockOutput {
    log: EventLog,
    fail: FailMode,
    attempts: usize,
}

impl MockOutput {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            fail: FailMode::Never,
            attempts: 0,
        }
    }

    pub fn failing_after(log: EventLog, writes: usize) -> Self {
        Self {
            log,
            fail: FailMode::From(writes),
            attempts: 0,
        }
    }

    pub fn failing_once_at(log: EventLog, write: usize) -> Self {
        Self {
            log,
            fail: FailMode::Once(write),
            attempts: 0,
        }
    }

    fn record(&mut self, event: Event) -> Result<(), MockFault> {
        let attempt = self.attempts;
        self.attempts += 1;
        let fails = match self.fail {
            FailMode::Never => false,
            FailMode::From(n) => attempt >= n,
            FailMode::Once(n) => attempt == n,
        };
        if fails {
            return Err(MockFault);
        }
        self.log.push(event);
        Ok(())
    }
}

impl MotorOutput for MockOutput {
    type Error = MockFault;

    fn set_direction(&mut self, direction: Direction) -> Result<(), MockFault> {
        self.record(Event::Direction(direction))
    }

    fn set_magnitude(&mut self, magnitude: u16) -> Result<(), MockFault> {
        self.record(Event::Magnitude(magnitude))
    }
}

#[derive(Debug)]
pub struct MockDelay {
    log: EventLog,
    rate: TickRate,
}

impl MockDelay {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            rate: TickRate::new(1000),
        }
    }

    pub fn with_rate(log: EventLog, hz: u32) -> Self {
        Self {
            log,
            rate: TickRate::new(hz),
        }
    }
}

impl TickDelay for MockDelay {
    fn tick_rate(&self) -> TickRate {
        self.rate
    }

    fn delay_ticks(&mut self, ticks: u32) {
        self.log.push(Event::Hold(ticks));
    }
}
