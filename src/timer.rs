use std::time::{Duration, Instant};

use log::{debug, info};

use crate::error::TimerError;

/// Countdown used on load and after every expiry
pub const DEFAULT_SECS: u32 = 10;

/// Durations offered by the duration selector
pub const PRESET_SECS: [u32; 4] = [10, 30, 60, 120];

const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running,
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The countdown is not running; nothing changed
    Dormant,
    Counting(u32),
    Expired,
}

/// One-second countdown with a single recurring tick handle.
///
/// The handle is just the instant the next tick is due. Starting again while
/// running replaces it, so there is never more than one tick source.
#[derive(Debug, Clone)]
pub struct Countdown {
    state: TimerState,
    remaining_secs: u32,
    next_due: Option<Instant>,
    period: Duration,
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(DEFAULT_SECS)
    }
}

impl Countdown {
    pub fn new(secs: u32) -> Self {
        Self {
            state: TimerState::Idle,
            remaining_secs: secs,
            next_due: None,
            period: TICK_PERIOD,
        }
    }

    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.next_due
    }

    pub fn set_duration(&mut self, secs: u32) -> Result<(), TimerError> {
        if self.is_running() {
            return Err(TimerError::Running);
        }
        if secs == 0 {
            return Err(TimerError::ZeroDuration);
        }
        self.remaining_secs = secs;
        self.state = TimerState::Idle;
        Ok(())
    }

    pub fn start(&mut self, now: Instant) {
        if self.next_due.is_some() {
            debug!("replacing pending tick handle");
        }
        self.next_due = Some(now + self.period);
        self.state = TimerState::Running;
        info!("countdown started at {}s", self.remaining_secs);
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
        self.state = TimerState::Idle;
    }

    /// Restore the load-time state: idle, default duration, no handle
    pub fn reset(&mut self) {
        self.cancel();
        self.remaining_secs = DEFAULT_SECS;
    }

    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_running() {
            return TickOutcome::Dormant;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);

        if self.remaining_secs == 0 {
            self.next_due = None;
            self.remaining_secs = DEFAULT_SECS;
            self.state = TimerState::Expired;
            info!("countdown expired");
            TickOutcome::Expired
        } else {
            TickOutcome::Counting(self.remaining_secs)
        }
    }

    /// Fire every tick that has come due by `now`.
    /// Returns the outcome of the last tick fired, if any.
    pub fn poll(&mut self, now: Instant) -> Option<TickOutcome> {
        let mut last = None;

        while let Some(due) = self.next_due {
            if due > now {
                break;
            }
            let outcome = self.tick();
            last = Some(outcome);
            match outcome {
                TickOutcome::Counting(_) => self.next_due = Some(due + self.period),
                TickOutcome::Expired | TickOutcome::Dormant => break,
            }
        }

        last
    }
}
