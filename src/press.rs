//! Press-timing state machine for the primary control.
//!
//! Tells a tap apart from a long press. It is driven by wall-clock instants
//! supplied by the caller and owns no threads; whoever owns it calls
//! [`PressTimer::advance`] when [`PressTimer::next_deadline`] passes.
//!
//! ```text
//! Idle -> Pending -> Idle            (released before the threshold)
//! Idle -> Pending -> AutoRepeating   (threshold elapsed while pressed)
//! AutoRepeating -> Idle              (release, leave or cancel)
//! ```

use serde::Serialize;
use std::time::{Duration, Instant};

pub const DEFAULT_HOLD_THRESHOLD: Duration = Duration::from_millis(300);
pub const DEFAULT_REPEAT_INTERVAL: Duration = Duration::from_millis(150);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PressTiming {
    pub hold_threshold: Duration,
    pub repeat_interval: Duration,
}

impl Default for PressTiming {
    fn default() -> Self {
        Self {
            hold_threshold: DEFAULT_HOLD_THRESHOLD,
            repeat_interval: DEFAULT_REPEAT_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressState {
    Idle,
    /// Hold timer running.
    Pending { deadline: Instant },
    AutoRepeating { next_fire: Instant },
}

/// Flags reported to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PressFlags {
    pub hold_timer_active: bool,
    pub auto_repeat_active: bool,
    pub suppress_next_primary_action: bool,
}

#[derive(Debug, Clone)]
pub struct PressTimer {
    timing: PressTiming,
    state: PressState,
    suppress_next_primary: bool,
}

impl PressTimer {
    pub fn new(timing: PressTiming) -> Self {
        Self {
            timing,
            state: PressState::Idle,
            suppress_next_primary: false,
        }
    }

    pub fn state(&self) -> PressState {
        self.state
    }

    pub fn flags(&self) -> PressFlags {
        PressFlags {
            hold_timer_active: matches!(self.state, PressState::Pending { .. }),
            auto_repeat_active: matches!(self.state, PressState::AutoRepeating { .. }),
            suppress_next_primary_action: self.suppress_next_primary,
        }
    }

    /// Press begins. Any earlier hold or repeat is dropped. A pending
    /// suppression is kept: emulated mouse events after a touch long press
    /// start a second press before the click arrives.
    pub fn begin(&mut self, now: Instant) {
        self.state = PressState::Pending {
            deadline: now + self.timing.hold_threshold,
        };
    }

    /// Returns the number of increments that became due at `now`.
    ///
    /// Crossing the threshold yields one increment and arms the repeat;
    /// every full interval after that yields one more.
    pub fn advance(&mut self, now: Instant) -> u32 {
        let mut due = 0;

        if let PressState::Pending { deadline } = self.state {
            if now < deadline {
                return 0;
            }
            self.suppress_next_primary = true;
            self.state = PressState::AutoRepeating {
                next_fire: deadline + self.timing.repeat_interval,
            };
            due += 1;
        }

        if let PressState::AutoRepeating { mut next_fire } = self.state {
            while now >= next_fire {
                due += 1;
                next_fire += self.timing.repeat_interval;
            }
            self.state = PressState::AutoRepeating { next_fire };
        }

        due
    }

    /// Press ends normally. A pending primary-action suppression survives
    /// so the synthesized click that follows is swallowed.
    pub fn release(&mut self) {
        self.state = PressState::Idle;
    }

    /// Touch-cancel or the pointer leaving the control. No primary action
    /// follows, so suppression is dropped too.
    pub fn cancel(&mut self) {
        self.state = PressState::Idle;
        self.suppress_next_primary = false;
    }

    /// Consumes a primary action. Returns whether it should count.
    pub fn take_primary_action(&mut self) -> bool {
        if self.suppress_next_primary {
            self.suppress_next_primary = false;
            return false;
        }
        true
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        match self.state {
            PressState::Idle => None,
            PressState::Pending { deadline } => Some(deadline),
            PressState::AutoRepeating { next_fire } => Some(next_fire),
        }
    }
}

impl Default for PressTimer {
    fn default() -> Self {
        Self::new(PressTiming::default())
    }
}
